//! Core data model for the chat pipeline.
//!
//! Everything that flows between the classifier, extractor, translator,
//! guard and composer lives here. Intents and entity kinds are closed
//! sum types so the downstream dispatch is an exhaustive match rather
//! than string comparison.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::chat::confirmation::PendingAction;

// ============================================================
// Intents
// ============================================================

/// The category of domain action a message requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    CreateTask,
    UpdateTask,
    DeleteTask,
    ListTasks,
    SearchTasks,
    GetUserInfo,
    Unknown,
}

impl IntentKind {
    /// Intents that operate on task content (title/description extraction applies).
    pub fn takes_task_content(self) -> bool {
        matches!(self, IntentKind::CreateTask | IntentKind::UpdateTask)
    }

    /// Intents for which reference words ("this", "first", ...) are meaningful.
    pub fn takes_references(self) -> bool {
        matches!(
            self,
            IntentKind::UpdateTask | IntentKind::DeleteTask | IntentKind::ListTasks
        )
    }
}

/// Metadata recorded alongside a classified intent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntentParameters {
    /// The raw message as typed by the user, original casing preserved.
    pub original_message: String,
    /// The regex pattern text that produced the classification, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_pattern: Option<String>,
    /// True when the message carried more than one recognizable intent.
    #[serde(default)]
    pub compound_request: bool,
    /// How many distinct intents were detected in a compound message.
    #[serde(default)]
    pub total_intents_detected: usize,
    /// All intents detected in a compound message, in detection order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub all_intents: Vec<IntentKind>,
}

/// A fully classified user intent with its extracted entities.
///
/// Immutable once produced: the orchestrator assembles it and every
/// later stage only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserIntent {
    pub kind: IntentKind,
    /// Classification confidence in `[0.0, 1.0]`.
    pub confidence: f32,
    pub entities: Vec<ExtractedEntity>,
    pub parameters: IntentParameters,
}

impl UserIntent {
    pub fn new(kind: IntentKind, confidence: f32) -> Self {
        Self {
            kind,
            confidence,
            entities: Vec::new(),
            parameters: IntentParameters::default(),
        }
    }

    /// All entities of one kind, in extraction order.
    pub fn entities_of(&self, kind: EntityKind) -> impl Iterator<Item = &ExtractedEntity> {
        self.entities.iter().filter(move |e| e.kind == kind)
    }

    /// First entity value of one kind, if any.
    pub fn first_value(&self, kind: EntityKind) -> Option<&str> {
        self.entities_of(kind).next().map(|e| e.value.as_str())
    }

    pub fn has_entity(&self, kind: EntityKind) -> bool {
        self.entities.iter().any(|e| e.kind == kind)
    }
}

// ============================================================
// Entities
// ============================================================

/// The kind of a typed text fragment pulled out of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    TaskTitle,
    TaskDescription,
    Keyword,
    StatusIndicator,
    ReferenceDemonstrative,
    DateReference,
    TaskId,
    UpdateValue,
}

/// One extracted entity with its confidence and, where known, the
/// character span it was found at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedEntity {
    pub kind: EntityKind,
    pub value: String,
    pub confidence: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<(usize, usize)>,
}

impl ExtractedEntity {
    pub fn new(kind: EntityKind, value: impl Into<String>, confidence: f32) -> Self {
        Self {
            kind,
            value: value.into(),
            confidence,
            span: None,
        }
    }

    pub fn with_span(mut self, start: usize, end: usize) -> Self {
        self.span = Some((start, end));
        self
    }
}

// ============================================================
// Operation results
// ============================================================

/// The five user-visible reply categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    Success,
    ClarificationNeeded,
    ConfirmationRequired,
    Error,
    TaskDeleted,
}

/// Status filter for list and search operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    Completed,
    Pending,
}

impl StatusFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::Completed => "completed",
            StatusFilter::Pending => "pending",
        }
    }
}

/// A task as reported by the task-data collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Outcome of translating and executing one intent.
///
/// Produced by the translator; the composer and guard only read it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResult {
    pub success: bool,
    pub response_type: ResponseType,
    /// Pre-composed response text; the composer passes it through verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_title: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<TaskRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matching_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_status: Option<StatusFilter>,
    /// Completion flag applied by an update, for response wording.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Set when a delete is being routed through the confirmation
    /// protocol; deletion wording in a response is only legitimate
    /// when this is true.
    #[serde(default)]
    pub confirmed: bool,
    /// Action descriptor accompanying `confirmation_required` results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_action: Option<PendingAction>,
    /// Sanitized collaborator error, when one occurred.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The user asked to see the task list itself (dashboard hint).
    #[serde(default)]
    pub dashboard_hint: bool,
}

impl OperationResult {
    fn base(success: bool, response_type: ResponseType) -> Self {
        Self {
            success,
            response_type,
            response: None,
            task_id: None,
            task_title: None,
            tasks: Vec::new(),
            task_count: None,
            matching_count: None,
            keyword: None,
            filter_status: None,
            completed: None,
            user_id: None,
            email: None,
            confirmed: false,
            pending_action: None,
            error: None,
            dashboard_hint: false,
        }
    }

    pub fn success(response: impl Into<String>) -> Self {
        let mut r = Self::base(true, ResponseType::Success);
        r.response = Some(response.into());
        r
    }

    pub fn error(response: impl Into<String>) -> Self {
        let mut r = Self::base(false, ResponseType::Error);
        r.response = Some(response.into());
        r
    }

    pub fn clarification(response: impl Into<String>) -> Self {
        let mut r = Self::base(false, ResponseType::ClarificationNeeded);
        r.response = Some(response.into());
        r
    }

    pub fn confirmation(response: impl Into<String>, action: PendingAction) -> Self {
        let mut r = Self::base(false, ResponseType::ConfirmationRequired);
        r.response = Some(response.into());
        r.task_id = Some(action.task_id);
        r.confirmed = true;
        r.pending_action = Some(action);
        r
    }

    pub fn with_task(mut self, id: i64, title: impl Into<String>) -> Self {
        self.task_id = Some(id);
        self.task_title = Some(title.into());
        self
    }

    pub fn with_error_detail(mut self, detail: impl Into<String>) -> Self {
        self.error = Some(detail.into());
        self
    }
}

// ============================================================
// User context and replies
// ============================================================

/// Identity and permissions of the requesting user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserContext {
    pub user_id: String,
    pub permissions: Vec<String>,
}

impl UserContext {
    /// A context carrying the standard own-data permission set.
    pub fn with_default_permissions(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            permissions: vec![
                "create_own_tasks".to_string(),
                "read_own_tasks".to_string(),
                "update_own_tasks".to_string(),
                "delete_own_tasks".to_string(),
                "read_own_profile".to_string(),
            ],
        }
    }
}

/// The reply shape exposed to the surrounding system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    pub response_type: ResponseType,
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_type_wire_names() {
        let json = serde_json::to_string(&ResponseType::ClarificationNeeded).unwrap();
        assert_eq!(json, "\"clarification_needed\"");
        let json = serde_json::to_string(&ResponseType::TaskDeleted).unwrap();
        assert_eq!(json, "\"task_deleted\"");
    }

    #[test]
    fn test_intent_kind_wire_names() {
        let json = serde_json::to_string(&IntentKind::GetUserInfo).unwrap();
        assert_eq!(json, "\"get_user_info\"");
        let back: IntentKind = serde_json::from_str("\"delete_task\"").unwrap();
        assert_eq!(back, IntentKind::DeleteTask);
    }

    #[test]
    fn test_operation_result_builders() {
        let r = OperationResult::success("done").with_task(7, "Laundry");
        assert!(r.success);
        assert_eq!(r.task_id, Some(7));
        assert_eq!(r.task_title.as_deref(), Some("Laundry"));

        let r = OperationResult::clarification("which one?");
        assert!(!r.success);
        assert_eq!(r.response_type, ResponseType::ClarificationNeeded);
    }

    #[test]
    fn test_intent_entity_helpers() {
        let mut intent = UserIntent::new(IntentKind::UpdateTask, 0.9);
        intent
            .entities
            .push(ExtractedEntity::new(EntityKind::TaskId, "42", 0.95));
        intent
            .entities
            .push(ExtractedEntity::new(EntityKind::UpdateValue, "Read", 0.9));

        assert_eq!(intent.first_value(EntityKind::TaskId), Some("42"));
        assert!(intent.has_entity(EntityKind::UpdateValue));
        assert!(!intent.has_entity(EntityKind::Keyword));
    }
}
