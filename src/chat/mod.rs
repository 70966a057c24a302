//! Deterministic natural-language command interpretation for tasks.
//!
//! The pipeline runs a message through fixed stages: intent
//! classification, entity extraction, translation into a typed backend
//! operation, response composition, and a safety gate, then updates the
//! session's conversation state. Same input, same session state, same
//! answer; there is no statistical model anywhere in the path.

pub mod backend;
pub mod composer;
pub mod confirmation;
pub mod entity_extractor;
pub mod intent_classifier;
pub mod orchestrator;
pub mod response_guard;
mod rules;
pub mod session;
pub mod task_control;
pub mod types;

pub use backend::{
    BackendError, MemoryTaskBackend, TaskBackend, TaskOperation, TaskOutcome, UserRecord,
};
pub use composer::ResponseComposer;
pub use confirmation::{
    ConfirmationDecision, ConfirmationState, PendingAction, PendingActionKind,
};
pub use entity_extractor::EntityExtractor;
pub use intent_classifier::IntentClassifier;
pub use orchestrator::ChatOrchestrator;
pub use response_guard::{ResponseGuard, ValidationIssue, ValidationReport};
pub use session::{ConversationState, InMemorySessionStore, SessionStore, SessionStoreError};
pub use task_control::{TaskControl, TranslationContext};
pub use types::{
    ChatReply, EntityKind, ExtractedEntity, IntentKind, OperationResult, ResponseType,
    StatusFilter, TaskRecord, UserContext, UserIntent,
};
