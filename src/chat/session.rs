//! Conversation state and the session store seam.
//!
//! Per-session state is a plain value; where it lives is behind the
//! [`SessionStore`] trait so a deployment can swap the in-memory map
//! for a shared store without touching the orchestrator. Idle sessions
//! are found via `list_expired` and evicted explicitly.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chat::confirmation::ConfirmationState;
use crate::chat::types::{IntentKind, OperationResult, ResponseType};

/// One completed turn, as remembered by the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRecord {
    pub timestamp: DateTime<Utc>,
    pub intent: IntentKind,
    pub success: bool,
    pub response_type: ResponseType,
}

/// All conversation state for one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationState {
    pub session_id: String,
    pub user_id: String,
    pub turn_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_intent: Option<IntentKind>,
    #[serde(default)]
    pub confirmation: ConfirmationState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_referenced_task_id: Option<i64>,
    /// Bounded recent-turn window, oldest first.
    #[serde(default)]
    pub history: VecDeque<TurnRecord>,
    pub created_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
}

impl ConversationState {
    pub fn new(session_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            user_id: user_id.into(),
            turn_count: 0,
            last_intent: None,
            confirmation: ConfirmationState::default(),
            last_referenced_task_id: None,
            history: VecDeque::new(),
            created_at: now,
            last_active_at: now,
        }
    }

    /// Record a completed turn: bump the counters, remember the intent
    /// and result shape, track the referenced task, trim the window.
    pub fn record_turn(
        &mut self,
        intent: IntentKind,
        result: &OperationResult,
        history_limit: usize,
    ) {
        self.turn_count += 1;
        self.last_intent = Some(intent);
        self.history.push_back(TurnRecord {
            timestamp: Utc::now(),
            intent,
            success: result.success,
            response_type: result.response_type,
        });
        while self.history.len() > history_limit {
            self.history.pop_front();
        }
        if let Some(task_id) = result.task_id {
            self.last_referenced_task_id = Some(task_id);
        }
        self.last_active_at = Utc::now();
    }

    pub fn idle_for(&self, now: DateTime<Utc>) -> Duration {
        now - self.last_active_at
    }
}

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// Where conversation state lives between turns.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, session_id: &str) -> Result<Option<ConversationState>, SessionStoreError>;
    async fn put(&self, state: ConversationState) -> Result<(), SessionStoreError>;
    async fn delete(&self, session_id: &str) -> Result<(), SessionStoreError>;
    /// Session ids idle for longer than `idle_timeout`.
    async fn list_expired(&self, idle_timeout: Duration)
        -> Result<Vec<String>, SessionStoreError>;
}

/// Process-local store for tests and single-instance deployments.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, ConversationState>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, ConversationState>>, SessionStoreError> {
        self.sessions
            .lock()
            .map_err(|_| SessionStoreError::Unavailable("poisoned session map".to_string()))
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, session_id: &str) -> Result<Option<ConversationState>, SessionStoreError> {
        Ok(self.lock()?.get(session_id).cloned())
    }

    async fn put(&self, state: ConversationState) -> Result<(), SessionStoreError> {
        self.lock()?.insert(state.session_id.clone(), state);
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> Result<(), SessionStoreError> {
        self.lock()?.remove(session_id);
        Ok(())
    }

    async fn list_expired(
        &self,
        idle_timeout: Duration,
    ) -> Result<Vec<String>, SessionStoreError> {
        let now = Utc::now();
        Ok(self
            .lock()?
            .values()
            .filter(|s| s.idle_for(now) > idle_timeout)
            .map(|s| s.session_id.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::types::OperationResult;

    #[test]
    fn test_history_is_bounded_fifo() {
        let mut state = ConversationState::new("s1", "u1");
        for i in 0..15 {
            let result = OperationResult::success(format!("turn {i}"));
            state.record_turn(IntentKind::ListTasks, &result, 10);
        }
        assert_eq!(state.turn_count, 15);
        assert_eq!(state.history.len(), 10);
        // Oldest five were evicted; the window starts at turn 5.
        assert_eq!(state.history.front().map(|t| t.success), Some(true));
    }

    #[test]
    fn test_last_referenced_task_tracked() {
        let mut state = ConversationState::new("s1", "u1");
        let result = OperationResult::success("made").with_task(42, "Laundry");
        state.record_turn(IntentKind::CreateTask, &result, 10);
        assert_eq!(state.last_referenced_task_id, Some(42));

        // A result without a task id leaves the reference alone.
        let result = OperationResult::success("listed");
        state.record_turn(IntentKind::ListTasks, &result, 10);
        assert_eq!(state.last_referenced_task_id, Some(42));
    }

    #[tokio::test]
    async fn test_in_memory_store_roundtrip() {
        let store = InMemorySessionStore::new();
        let state = ConversationState::new("s1", "u1");
        store.put(state).await.unwrap();

        let loaded = store.get("s1").await.unwrap().expect("stored session");
        assert_eq!(loaded.user_id, "u1");

        store.delete("s1").await.unwrap();
        assert!(store.get("s1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_expired_by_idle_time() {
        let store = InMemorySessionStore::new();
        let mut stale = ConversationState::new("stale", "u1");
        stale.last_active_at = Utc::now() - Duration::hours(2);
        store.put(stale).await.unwrap();
        store.put(ConversationState::new("fresh", "u1")).await.unwrap();

        let expired = store.list_expired(Duration::minutes(30)).await.unwrap();
        assert_eq!(expired, vec!["stale".to_string()]);
    }
}
