//! Pipeline orchestration.
//!
//! One entry point per user message: classify, extract, gate on
//! confidence, translate, compose, guard, then update session state.
//! The orchestrator owns no business logic of its own; it sequences the
//! stages and carries session state between them.
//!
//! A session awaiting confirmation intercepts the next message before
//! classification: a recognized yes resumes the parked action with the
//! confirmation flag set, a recognized no cancels it, anything else
//! re-prompts without touching the state.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::chat::backend::TaskBackend;
use crate::chat::composer::ResponseComposer;
use crate::chat::confirmation::{ConfirmationDecision, PendingAction};
use crate::chat::entity_extractor::EntityExtractor;
use crate::chat::intent_classifier::IntentClassifier;
use crate::chat::response_guard::{validate_permissions, ResponseGuard};
use crate::chat::session::{ConversationState, SessionStore};
use crate::chat::task_control::{TaskControl, TranslationContext};
use crate::chat::types::{
    ChatReply, EntityKind, ExtractedEntity, IntentKind, OperationResult, ResponseType,
    UserContext, UserIntent,
};
use crate::config::ChatConfig;
use crate::error::ChatError;

pub struct ChatOrchestrator<B, S> {
    config: ChatConfig,
    classifier: IntentClassifier,
    extractor: EntityExtractor,
    control: TaskControl<B>,
    guard: ResponseGuard,
    composer: ResponseComposer,
    sessions: Arc<S>,
}

impl<B: TaskBackend, S: SessionStore> ChatOrchestrator<B, S> {
    pub fn new(config: ChatConfig, backend: Arc<B>, sessions: Arc<S>) -> Self {
        let composer = ResponseComposer::new(config.list_preview_limit);
        Self {
            config,
            classifier: IntentClassifier::new(),
            extractor: EntityExtractor::new(),
            control: TaskControl::new(backend),
            guard: ResponseGuard::new(),
            composer,
            sessions,
        }
    }

    /// Process one user message end to end.
    #[instrument(skip(self, ctx, message), fields(user_id = %ctx.user_id))]
    pub async fn process_message(
        &self,
        ctx: &UserContext,
        message: &str,
        session_id: Option<&str>,
    ) -> Result<ChatReply, ChatError> {
        let session_id = session_id
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let mut state = match self.sessions.get(&session_id).await? {
            Some(state) => state,
            None => ConversationState::new(session_id.clone(), ctx.user_id.clone()),
        };

        if !validate_permissions(ctx, "read_profile") {
            warn!(session_id = %session_id, "permission denied");
            return Ok(permission_denied_reply(session_id));
        }

        // A pending confirmation captures the next message entirely.
        if state.confirmation.is_awaiting() {
            return self.resolve_confirmation(ctx, state, message).await;
        }

        let mut intent = self.classifier.classify(message);
        intent.entities = self.extractor.extract(message, intent.kind);
        debug!(
            kind = ?intent.kind,
            confidence = intent.confidence,
            entity_count = intent.entities.len(),
            "intent resolved"
        );

        if intent.confidence < self.config.confidence_threshold {
            let result = OperationResult::clarification(format!(
                "I'm not sure what you mean by '{message}'. Could you rephrase that?"
            ));
            return self
                .finish_turn(ctx, state, &intent, result)
                .await;
        }

        let translation_ctx = TranslationContext {
            last_referenced_task_id: state.last_referenced_task_id,
            delete_confirmed: false,
        };
        let result = self
            .control
            .translate(&ctx.user_id, &intent, &translation_ctx)
            .await;

        self.finish_turn(ctx, state, &intent, result).await
    }

    /// Resolve a confirmation reply addressed by session id. The
    /// normal flow intercepts these inside `process_message`; this
    /// entry serves callers that route confirmation replies on a
    /// separate path. An unknown session has nothing pending.
    pub async fn handle_confirmation(
        &self,
        ctx: &UserContext,
        session_id: &str,
        user_response: &str,
    ) -> Result<ChatReply, ChatError> {
        if !validate_permissions(ctx, "read_profile") {
            warn!(session_id = %session_id, "permission denied");
            return Ok(permission_denied_reply(session_id.to_string()));
        }
        let state = match self.sessions.get(session_id).await? {
            Some(state) => state,
            None => return Ok(no_pending_reply(session_id.to_string())),
        };
        self.resolve_confirmation(ctx, state, user_response).await
    }

    /// Resolve a reply sent while a destructive action is parked.
    async fn resolve_confirmation(
        &self,
        ctx: &UserContext,
        mut state: ConversationState,
        reply: &str,
    ) -> Result<ChatReply, ChatError> {
        let session_id = state.session_id.clone();
        let action = match state.confirmation.pending() {
            Some(action) => action.clone(),
            None => return Ok(no_pending_reply(session_id)),
        };

        match ConfirmationDecision::parse(reply) {
            ConfirmationDecision::Affirm => {
                info!(task_id = action.task_id, "confirmation affirmed");
                state.confirmation.clear();
                let intent = action
                    .original_intent
                    .clone()
                    .unwrap_or_else(|| synthesize_delete_intent(&action));
                let translation_ctx = TranslationContext {
                    last_referenced_task_id: state.last_referenced_task_id,
                    delete_confirmed: true,
                };
                let result = self
                    .control
                    .translate(&ctx.user_id, &intent, &translation_ctx)
                    .await;
                self.finish_turn(ctx, state, &intent, result).await
            }
            ConfirmationDecision::Decline => {
                info!(task_id = action.task_id, "confirmation declined");
                state.confirmation.clear();
                let intent = action
                    .original_intent
                    .clone()
                    .unwrap_or_else(|| synthesize_delete_intent(&action));
                let result = OperationResult::success("I've canceled that action.");
                self.finish_turn(ctx, state, &intent, result).await
            }
            ConfirmationDecision::Unclear => {
                debug!(task_id = action.task_id, "confirmation reply unclear");
                // State stays parked; only the prompt repeats.
                Ok(ChatReply {
                    response: format!(
                        "Please respond with yes to confirm {} or no to cancel.",
                        action.kind.describe()
                    ),
                    response_type: ResponseType::ClarificationNeeded,
                    session_id,
                    task_id: Some(action.task_id),
                    suggestions: Vec::new(),
                })
            }
        }
    }

    /// Compose, guard, update session state and store it, then reply.
    async fn finish_turn(
        &self,
        ctx: &UserContext,
        mut state: ConversationState,
        intent: &UserIntent,
        result: OperationResult,
    ) -> Result<ChatReply, ChatError> {
        let session_id = state.session_id.clone();
        let composed = self.composer.compose(&result);
        let report = self.guard.review(&composed, intent, ctx, &result);

        let response_type = if report.is_valid {
            result.response_type
        } else {
            ResponseType::Error
        };
        let suggestions = if report.is_valid {
            self.composer.suggestions(&result)
        } else {
            Vec::new()
        };

        // Park the confirmation only for a reply that actually reached
        // the user in confirmation form.
        if report.is_valid && result.response_type == ResponseType::ConfirmationRequired {
            if let Some(action) = result.pending_action.clone() {
                state.confirmation.begin(action);
            }
        }

        state.record_turn(intent.kind, &result, self.config.history_limit);
        self.sessions.put(state).await?;

        Ok(ChatReply {
            response: report.sanitized_response,
            response_type,
            session_id,
            task_id: result.task_id,
            suggestions,
        })
    }

    /// Drop a finished session's state.
    pub async fn cleanup_session(&self, session_id: &str) -> Result<(), ChatError> {
        self.sessions.delete(session_id).await?;
        Ok(())
    }

    /// Evict every session idle past the configured timeout. Returns
    /// how many were removed.
    pub async fn evict_idle_sessions(&self) -> Result<usize, ChatError> {
        let expired = self.sessions.list_expired(self.config.idle_timeout()).await?;
        for session_id in &expired {
            self.sessions.delete(session_id).await?;
        }
        if !expired.is_empty() {
            info!(count = expired.len(), "evicted idle sessions");
        }
        Ok(expired.len())
    }
}

fn permission_denied_reply(session_id: String) -> ChatReply {
    ChatReply {
        response: "You don't have permission to access this feature.".to_string(),
        response_type: ResponseType::Error,
        session_id,
        task_id: None,
        suggestions: Vec::new(),
    }
}

fn no_pending_reply(session_id: String) -> ChatReply {
    ChatReply {
        response: "I don't have any pending actions to confirm.".to_string(),
        response_type: ResponseType::Success,
        session_id,
        task_id: None,
        suggestions: Vec::new(),
    }
}

/// Minimal delete intent for a pending action that lost its original
/// intent, for example after deserializing an older session.
fn synthesize_delete_intent(action: &PendingAction) -> UserIntent {
    let mut intent = UserIntent::new(IntentKind::DeleteTask, 0.95);
    intent.parameters.original_message = format!("delete task id {}", action.task_id);
    intent.entities.push(ExtractedEntity::new(
        EntityKind::TaskId,
        action.task_id.to_string(),
        0.95,
    ));
    intent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::backend::MemoryTaskBackend;
    use crate::chat::session::InMemorySessionStore;

    fn orchestrator(
        backend: Arc<MemoryTaskBackend>,
    ) -> ChatOrchestrator<MemoryTaskBackend, InMemorySessionStore> {
        ChatOrchestrator::new(
            ChatConfig::default(),
            backend,
            Arc::new(InMemorySessionStore::new()),
        )
    }

    #[tokio::test]
    async fn test_generates_session_id_when_missing() {
        let orch = orchestrator(Arc::new(MemoryTaskBackend::new()));
        let ctx = UserContext::with_default_permissions("u1");
        let reply = orch
            .process_message(&ctx, "show me my tasks", None)
            .await
            .unwrap();
        assert!(!reply.session_id.is_empty());
    }

    #[tokio::test]
    async fn test_permission_denied() {
        let orch = orchestrator(Arc::new(MemoryTaskBackend::new()));
        let ctx = UserContext {
            user_id: "u1".to_string(),
            permissions: Vec::new(),
        };
        let reply = orch
            .process_message(&ctx, "show me my tasks", None)
            .await
            .unwrap();
        assert_eq!(reply.response_type, ResponseType::Error);
        assert_eq!(
            reply.response,
            "You don't have permission to access this feature."
        );
    }

    #[tokio::test]
    async fn test_low_confidence_asks_to_rephrase() {
        let orch = orchestrator(Arc::new(MemoryTaskBackend::new()));
        let ctx = UserContext::with_default_permissions("u1");
        let reply = orch
            .process_message(&ctx, "xyz123abc", None)
            .await
            .unwrap();
        assert_eq!(reply.response_type, ResponseType::ClarificationNeeded);
        assert_eq!(
            reply.response,
            "I'm not sure what you mean by 'xyz123abc'. Could you rephrase that?"
        );
    }

    #[tokio::test]
    async fn test_unclear_confirmation_reply_re_prompts() {
        let backend = Arc::new(MemoryTaskBackend::new());
        backend.seed_task("u1", "Groceries", "", false).unwrap();
        let orch = orchestrator(backend);
        let ctx = UserContext::with_default_permissions("u1");

        let reply = orch
            .process_message(&ctx, "delete the groceries task", Some("s1"))
            .await
            .unwrap();
        assert_eq!(reply.response_type, ResponseType::ConfirmationRequired);

        let reply = orch
            .process_message(&ctx, "hmm what", Some("s1"))
            .await
            .unwrap();
        assert_eq!(reply.response_type, ResponseType::ClarificationNeeded);
        assert_eq!(
            reply.response,
            "Please respond with yes to confirm the deletion or no to cancel."
        );

        // Still parked: a yes afterwards goes through.
        let reply = orch.process_message(&ctx, "yes", Some("s1")).await.unwrap();
        assert_eq!(reply.response_type, ResponseType::TaskDeleted);
    }

    #[tokio::test]
    async fn test_handle_confirmation_by_session_id() {
        let backend = Arc::new(MemoryTaskBackend::new());
        backend.seed_task("u1", "Groceries", "", false).unwrap();
        let orch = orchestrator(backend);
        let ctx = UserContext::with_default_permissions("u1");

        let reply = orch
            .process_message(&ctx, "delete the groceries task", Some("s1"))
            .await
            .unwrap();
        assert_eq!(reply.response_type, ResponseType::ConfirmationRequired);

        let reply = orch.handle_confirmation(&ctx, "s1", "yes").await.unwrap();
        assert_eq!(reply.response_type, ResponseType::TaskDeleted);
        assert_eq!(reply.response, "I've deleted the task 'Groceries'.");
    }

    #[tokio::test]
    async fn test_handle_confirmation_unknown_session() {
        let orch = orchestrator(Arc::new(MemoryTaskBackend::new()));
        let ctx = UserContext::with_default_permissions("u1");
        let reply = orch
            .handle_confirmation(&ctx, "never-seen", "yes")
            .await
            .unwrap();
        assert_eq!(reply.response_type, ResponseType::Success);
        assert_eq!(reply.response, "I don't have any pending actions to confirm.");
        assert_eq!(reply.session_id, "never-seen");
    }

    #[tokio::test]
    async fn test_handle_confirmation_requires_permission() {
        let orch = orchestrator(Arc::new(MemoryTaskBackend::new()));
        let ctx = UserContext {
            user_id: "u1".to_string(),
            permissions: Vec::new(),
        };
        let reply = orch.handle_confirmation(&ctx, "s1", "yes").await.unwrap();
        assert_eq!(reply.response_type, ResponseType::Error);
        assert_eq!(
            reply.response,
            "You don't have permission to access this feature."
        );
    }

    #[tokio::test]
    async fn test_evict_idle_sessions() {
        let orch = orchestrator(Arc::new(MemoryTaskBackend::new()));
        let ctx = UserContext::with_default_permissions("u1");
        orch.process_message(&ctx, "show me my tasks", Some("fresh"))
            .await
            .unwrap();
        assert_eq!(orch.evict_idle_sessions().await.unwrap(), 0);

        let mut stale = ConversationState::new("stale", "u1");
        stale.last_active_at = chrono::Utc::now() - chrono::Duration::hours(2);
        orch.sessions.put(stale).await.unwrap();
        assert_eq!(orch.evict_idle_sessions().await.unwrap(), 1);
    }
}
