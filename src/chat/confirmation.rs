//! Confirmation protocol for destructive operations.
//!
//! A deletion never executes on first request: the translator parks a
//! [`PendingAction`] and the session moves to `AwaitingConfirmation`.
//! The next reply is matched against fixed affirmative and negative
//! token sets; anything else re-prompts without touching the state.
//!
//! The state machine is a plain value so transitions can be tested
//! without an orchestrator around them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chat::types::UserIntent;

const AFFIRMATIVE_TOKENS: &[&str] = &[
    "yes", "y", "confirm", "ok", "sure", "please", "yeah", "yep", "go ahead",
];

const NEGATIVE_TOKENS: &[&str] = &[
    "no",
    "n",
    "cancel",
    "no thanks",
    "stop",
    "nope",
    "never mind",
    "nevermind",
];

/// What kind of operation is waiting on the user's go-ahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingActionKind {
    DeleteTask,
}

impl PendingActionKind {
    pub fn describe(self) -> &'static str {
        match self {
            PendingActionKind::DeleteTask => "the deletion",
        }
    }
}

/// A parked operation awaiting confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingAction {
    pub kind: PendingActionKind,
    pub task_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_title: Option<String>,
    /// The intent that triggered the confirmation, for re-execution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_intent: Option<UserIntent>,
    pub created_at: DateTime<Utc>,
}

impl PendingAction {
    pub fn delete_task(task_id: i64, task_title: impl Into<String>) -> Self {
        Self {
            kind: PendingActionKind::DeleteTask,
            task_id,
            task_title: Some(task_title.into()),
            original_intent: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_intent(mut self, intent: UserIntent) -> Self {
        self.original_intent = Some(intent);
        self
    }
}

/// The two-state confirmation machine carried by each session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ConfirmationState {
    #[default]
    Idle,
    AwaitingConfirmation {
        action: PendingAction,
    },
}

impl ConfirmationState {
    pub fn is_awaiting(&self) -> bool {
        matches!(self, ConfirmationState::AwaitingConfirmation { .. })
    }

    pub fn pending(&self) -> Option<&PendingAction> {
        match self {
            ConfirmationState::Idle => None,
            ConfirmationState::AwaitingConfirmation { action } => Some(action),
        }
    }

    /// Park an action. A previous pending action is silently replaced;
    /// last writer wins.
    pub fn begin(&mut self, action: PendingAction) {
        *self = ConfirmationState::AwaitingConfirmation { action };
    }

    /// Resolve the protocol, returning the parked action if there was one.
    pub fn take(&mut self) -> Option<PendingAction> {
        match std::mem::take(self) {
            ConfirmationState::Idle => None,
            ConfirmationState::AwaitingConfirmation { action } => Some(action),
        }
    }

    pub fn clear(&mut self) {
        *self = ConfirmationState::Idle;
    }
}

/// How a user reply reads as a confirmation answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationDecision {
    Affirm,
    Decline,
    Unclear,
}

impl ConfirmationDecision {
    /// Classify a reply against the fixed token sets. Only an exact
    /// (trimmed, lowercased) token counts; a longer sentence is
    /// unclear and re-prompts.
    pub fn parse(reply: &str) -> Self {
        let normalized = reply.trim().to_lowercase();
        if AFFIRMATIVE_TOKENS.contains(&normalized.as_str()) {
            ConfirmationDecision::Affirm
        } else if NEGATIVE_TOKENS.contains(&normalized.as_str()) {
            ConfirmationDecision::Decline
        } else {
            ConfirmationDecision::Unclear
        }
    }
}
