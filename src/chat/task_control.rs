//! Intent-to-operation translation.
//!
//! One handler per intent kind turns a classified intent and its
//! entities into a typed [`TaskOperation`], executes it against the
//! collaborator and folds the outcome into an [`OperationResult`].
//! Target resolution is shared: an explicit task id wins, then a
//! title/description substring match, then demonstratives resolved
//! against the session's last referenced task.
//!
//! Deletion never executes directly. Unless the context says the user
//! already confirmed, the handler parks a [`PendingAction`] and returns
//! a `confirmation_required` result for the protocol to pick up.

use std::sync::Arc;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::chat::backend::{BackendError, TaskBackend, TaskOperation, TaskOutcome};
use crate::chat::confirmation::PendingAction;
use crate::chat::rules::{CREATE_TITLE_FALLBACK_PATTERNS, GENERIC_CREATE_PHRASES};
use crate::chat::types::{
    EntityKind, IntentKind, OperationResult, ResponseType, StatusFilter, TaskRecord, UserIntent,
};

/// Session-derived facts the translator needs for one turn.
#[derive(Debug, Clone, Default)]
pub struct TranslationContext {
    /// Task the conversation last talked about, for "this"/"that".
    pub last_referenced_task_id: Option<i64>,
    /// The user already confirmed the pending deletion this turn.
    pub delete_confirmed: bool,
}

const TARGET_CLARIFICATION: &str =
    "I couldn't find a task matching your request. Could you be more specific?";

pub struct TaskControl<B> {
    backend: Arc<B>,
    title_fallbacks: Vec<Regex>,
}

impl<B: TaskBackend> TaskControl<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            title_fallbacks: CREATE_TITLE_FALLBACK_PATTERNS
                .iter()
                .filter_map(|p| Regex::new(p).ok())
                .collect(),
        }
    }

    /// Translate and execute one intent. Collaborator failures come
    /// back as error results with sanitized text, never as panics.
    pub async fn translate(
        &self,
        user_id: &str,
        intent: &UserIntent,
        ctx: &TranslationContext,
    ) -> OperationResult {
        debug!(kind = ?intent.kind, user_id, "translating intent");
        match intent.kind {
            IntentKind::CreateTask => self.handle_create(user_id, intent).await,
            IntentKind::UpdateTask => self.handle_update(user_id, intent, ctx).await,
            IntentKind::DeleteTask => self.handle_delete(user_id, intent, ctx).await,
            IntentKind::ListTasks => self.handle_list(user_id, intent).await,
            IntentKind::SearchTasks => self.handle_search(user_id, intent).await,
            IntentKind::GetUserInfo => self.handle_user_info(user_id, intent).await,
            IntentKind::Unknown => {
                OperationResult::error("Sorry, I didn't understand that request.")
            }
        }
    }

    // ── create ───────────────────────────────────────────────────

    async fn handle_create(&self, user_id: &str, intent: &UserIntent) -> OperationResult {
        let mut title = None;
        let mut description = None;
        let mut due_date = None;
        for entity in &intent.entities {
            match entity.kind {
                EntityKind::TaskTitle if title.is_none() => title = Some(entity.value.clone()),
                EntityKind::TaskDescription => description = Some(entity.value.clone()),
                EntityKind::DateReference => due_date = Some(entity.value.clone()),
                _ => {}
            }
        }

        let title = title
            .unwrap_or_else(|| self.derive_create_title(&intent.parameters.original_message));

        let operation = TaskOperation::Create {
            title,
            description: description.unwrap_or_default(),
            due_date,
        };
        match self.backend.execute(user_id, operation).await {
            Ok(TaskOutcome::Created(task)) => {
                info!(task_id = task.id, user_id, "task created");
                OperationResult::success(format!("I've created a task '{}' for you.", task.title))
                    .with_task(task.id, task.title)
            }
            Ok(other) => unexpected_outcome("create the task", other),
            Err(e) => backend_failure("create the task", e),
        }
    }

    /// When no title entity was extracted, derive one from the raw
    /// message: a bare generic phrase becomes "New Task", otherwise
    /// strip the request framing and keep the user's casing.
    fn derive_create_title(&self, original: &str) -> String {
        let lowered = original.to_lowercase();
        let lowered = lowered.trim();
        if GENERIC_CREATE_PHRASES.contains(&lowered) {
            return "New Task".to_string();
        }
        for regex in &self.title_fallbacks {
            if let Some(content) = regex
                .captures(lowered)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().trim())
                .filter(|s| !s.is_empty())
            {
                // Recover the original casing of the extracted span.
                let full_lower = original.to_lowercase();
                return match full_lower.find(content) {
                    Some(pos) => original[pos..pos + content.len()].to_string(),
                    None => content.to_string(),
                };
            }
        }
        original.trim().to_string()
    }

    // ── update ───────────────────────────────────────────────────

    async fn handle_update(
        &self,
        user_id: &str,
        intent: &UserIntent,
        ctx: &TranslationContext,
    ) -> OperationResult {
        let mut task_id = None;
        let mut reference = None;
        let mut new_title = None;
        let mut new_description = None;
        let mut new_status = None;

        let lowered = intent.parameters.original_message.to_lowercase();
        for entity in &intent.entities {
            match entity.kind {
                EntityKind::TaskId => task_id = entity.value.parse::<i64>().ok(),
                EntityKind::TaskTitle => reference = Some(entity.value.clone()),
                EntityKind::UpdateValue => {
                    // The value targets whichever field the message
                    // names; title when it names neither.
                    if lowered.contains("title") {
                        new_title = Some(entity.value.clone());
                    } else if lowered.contains("description") {
                        new_description = Some(entity.value.clone());
                    } else {
                        new_title = Some(entity.value.clone());
                    }
                }
                EntityKind::TaskDescription => new_description = Some(entity.value.clone()),
                EntityKind::StatusIndicator => new_status = Some(entity.value == "complete"),
                _ => {}
            }
        }

        let target = match self
            .resolve_target(user_id, task_id, reference.as_deref(), intent, ctx)
            .await
        {
            Ok(target) => target,
            Err(e) => return backend_failure("retrieve your tasks", e),
        };
        let target = match target {
            Some(task) => task,
            None => return OperationResult::clarification(TARGET_CLARIFICATION),
        };

        let operation = TaskOperation::Update {
            task_id: target.id,
            title: new_title,
            description: new_description,
            completed: new_status,
        };
        match self.backend.execute(user_id, operation).await {
            Ok(TaskOutcome::Updated(task)) => {
                let status_str = if new_status.unwrap_or(task.completed) {
                    "completed"
                } else {
                    "incomplete"
                };
                info!(task_id = task.id, user_id, "task updated");
                let mut result = OperationResult::success(format!(
                    "I've updated the task '{}' to be {}.",
                    task.title, status_str
                ))
                .with_task(task.id, task.title);
                result.completed = new_status;
                result
            }
            Ok(other) => unexpected_outcome("update the task", other),
            Err(e) => backend_failure("update the task", e),
        }
    }

    // ── delete ───────────────────────────────────────────────────

    async fn handle_delete(
        &self,
        user_id: &str,
        intent: &UserIntent,
        ctx: &TranslationContext,
    ) -> OperationResult {
        let task_id = intent
            .first_value(EntityKind::TaskId)
            .and_then(|v| v.parse::<i64>().ok());
        let reference = intent.first_value(EntityKind::TaskTitle);

        let target = match self
            .resolve_target(user_id, task_id, reference, intent, ctx)
            .await
        {
            Ok(target) => target,
            Err(e) => return backend_failure("retrieve your tasks", e),
        };
        let target = match target {
            Some(task) => task,
            None => return OperationResult::clarification(TARGET_CLARIFICATION),
        };

        if !ctx.delete_confirmed {
            debug!(task_id = target.id, user_id, "deletion needs confirmation");
            return OperationResult::confirmation(
                format!(
                    "Are you sure you want to delete the task '{}'? \
                     Please respond with 'Yes' or 'No'.",
                    target.title
                ),
                PendingAction::delete_task(target.id, target.title.clone())
                    .with_intent(intent.clone()),
            );
        }

        let operation = TaskOperation::Delete { task_id: target.id };
        match self.backend.execute(user_id, operation).await {
            Ok(TaskOutcome::Deleted(task)) => {
                info!(task_id = task.id, user_id, "task deleted");
                let mut result =
                    OperationResult::success(format!("I've deleted the task '{}'.", task.title))
                        .with_task(task.id, task.title);
                result.response_type = ResponseType::TaskDeleted;
                result.confirmed = true;
                result
            }
            Ok(other) => unexpected_outcome("delete the task", other),
            Err(e) => backend_failure("delete the task", e),
        }
    }

    // ── list ─────────────────────────────────────────────────────

    async fn handle_list(&self, user_id: &str, intent: &UserIntent) -> OperationResult {
        let status = status_from_entities(intent);
        let operation = TaskOperation::List { status };
        let tasks = match self.backend.execute(user_id, operation).await {
            Ok(TaskOutcome::Listing(tasks)) => tasks,
            Ok(other) => return unexpected_outcome("retrieve your tasks", other),
            Err(e) => return backend_failure("retrieve your tasks", e),
        };

        let response = if tasks.is_empty() {
            match status {
                Some(s) => format!("You don't have any {} tasks.", s.as_str()),
                None => "You don't have any tasks yet.".to_string(),
            }
        } else {
            let heading = match (tasks.len() > 10, status) {
                (true, Some(s)) => {
                    format!("You have {} {} tasks. Here are the first 10:", tasks.len(), s.as_str())
                }
                (true, None) => format!("You have {} tasks. Here are the first 10:", tasks.len()),
                (false, Some(s)) => format!("You have {} {} tasks:", tasks.len(), s.as_str()),
                (false, None) => format!("You have {} tasks:", tasks.len()),
            };
            format!("{}\n{}", heading, glyph_list(&tasks))
        };

        info!(count = tasks.len(), user_id, "listed tasks");
        let mut result = OperationResult::success(response);
        result.task_count = Some(tasks.len());
        result.filter_status = status;
        result.dashboard_hint = wants_task_list(&intent.parameters.original_message);
        result.tasks = tasks;
        result
    }

    // ── search ───────────────────────────────────────────────────

    async fn handle_search(&self, user_id: &str, intent: &UserIntent) -> OperationResult {
        let keywords: Vec<&str> = intent
            .entities_of(EntityKind::Keyword)
            .map(|e| e.value.as_str())
            .collect();
        let keyword = match keywords.first() {
            Some(k) => k.to_string(),
            None => return OperationResult::clarification("What would you like to search for?"),
        };
        let status = status_from_entities(intent);

        let operation = TaskOperation::Search {
            term: keyword.clone(),
            status,
        };
        let matches = match self.backend.execute(user_id, operation).await {
            Ok(TaskOutcome::Matches(tasks)) => tasks,
            Ok(other) => return unexpected_outcome("search your tasks", other),
            Err(e) => return backend_failure("search your tasks", e),
        };

        let response = if matches.is_empty() {
            let joined = keywords.join(" or ");
            match status {
                Some(s) => format!("I couldn't find any {} tasks containing {}.", s.as_str(), joined),
                None => format!("I couldn't find any tasks containing {}.", joined),
            }
        } else {
            let heading = match (matches.len() > 10, status) {
                (true, Some(s)) => format!(
                    "I found {} {} tasks containing {}. Here are the first 10:",
                    matches.len(),
                    s.as_str(),
                    keyword
                ),
                (true, None) => format!(
                    "I found {} tasks containing {}. Here are the first 10:",
                    matches.len(),
                    keyword
                ),
                (false, Some(s)) => format!(
                    "I found {} {} tasks containing {}:",
                    matches.len(),
                    s.as_str(),
                    keyword
                ),
                (false, None) => {
                    format!("I found {} tasks containing {}:", matches.len(), keyword)
                }
            };
            format!("{}\n{}", heading, glyph_list(&matches))
        };

        info!(keyword = %keyword, count = matches.len(), user_id, "searched tasks");
        let mut result = OperationResult::success(response);
        result.matching_count = Some(matches.len());
        result.keyword = Some(keyword);
        result.filter_status = status;
        result.tasks = matches;
        result
    }

    // ── user info ────────────────────────────────────────────────

    async fn handle_user_info(&self, user_id: &str, intent: &UserIntent) -> OperationResult {
        if user_id.is_empty() {
            return OperationResult::error(
                "I'm sorry, but I encountered an error processing your request.",
            )
            .with_error_detail("missing user id");
        }

        let user = match self.backend.get_user_by_id(user_id).await {
            Ok(user) => user,
            Err(e) => {
                warn!(user_id, error = %e, "user lookup failed");
                return OperationResult::error(
                    "I'm sorry, but I encountered an error processing your request.",
                )
                .with_error_detail(e.to_string());
            }
        };

        let user = match user {
            Some(user) => user,
            None => {
                // The lookup itself worked, so this is not an error.
                let mut result = OperationResult::success(
                    "Sorry, I couldn't find your user information. \
                     You may need to log in again.",
                );
                result.user_id = Some(user_id.to_string());
                return result;
            }
        };

        let name = user.name.unwrap_or_else(|| format!("user_{user_id}"));
        let email = user
            .email
            .unwrap_or_else(|| format!("user_{user_id}@example.com"));
        let lowered = intent.parameters.original_message.to_lowercase();
        let response = if lowered.contains("name") || lowered.contains("username") {
            format!("Your name is {name} and your email is {email}")
        } else if lowered.contains("email") {
            format!("Your email is {email}")
        } else {
            format!("You are logged in as {name} ({email})")
        };

        info!(user_id, "retrieved user info");
        let mut result = OperationResult::success(response);
        result.user_id = Some(user_id.to_string());
        result.email = Some(email);
        result
    }

    // ── target resolution ────────────────────────────────────────

    /// Find the task an update or delete refers to. An explicit id is
    /// tried first; if it does not resolve, the reference text is
    /// matched as a substring of each task's title and description;
    /// demonstratives pick by position or by the session's last
    /// referenced task.
    async fn resolve_target(
        &self,
        user_id: &str,
        task_id: Option<i64>,
        reference: Option<&str>,
        intent: &UserIntent,
        ctx: &TranslationContext,
    ) -> Result<Option<TaskRecord>, BackendError> {
        if let Some(id) = task_id {
            match self
                .backend
                .execute(user_id, TaskOperation::GetById { task_id: id })
                .await
            {
                Ok(TaskOutcome::Fetched(task)) => return Ok(Some(task)),
                Ok(_) | Err(BackendError::TaskNotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }

        let tasks = match self
            .backend
            .execute(user_id, TaskOperation::List { status: None })
            .await?
        {
            TaskOutcome::Listing(tasks) => tasks,
            _ => Vec::new(),
        };

        if let Some(reference) = reference {
            let needle = reference.to_lowercase();
            if let Some(task) = tasks.iter().find(|t| {
                t.title.to_lowercase().contains(&needle)
                    || t.description.to_lowercase().contains(&needle)
            }) {
                return Ok(Some(task.clone()));
            }
        }

        for entity in intent.entities_of(EntityKind::ReferenceDemonstrative) {
            match entity.value.as_str() {
                "last" | "recent" => {
                    if let Some(task) = tasks.last() {
                        return Ok(Some(task.clone()));
                    }
                }
                "first" => {
                    if let Some(task) = tasks.first() {
                        return Ok(Some(task.clone()));
                    }
                }
                "this" | "that" => {
                    if let Some(id) = ctx.last_referenced_task_id {
                        if let Some(task) = tasks.iter().find(|t| t.id == id) {
                            return Ok(Some(task.clone()));
                        }
                    }
                    if let Some(task) = tasks.last() {
                        return Ok(Some(task.clone()));
                    }
                }
                _ => {}
            }
        }

        Ok(None)
    }
}

// ── shared helpers ───────────────────────────────────────────────

fn status_from_entities(intent: &UserIntent) -> Option<StatusFilter> {
    let mut status = None;
    for entity in intent.entities_of(EntityKind::StatusIndicator) {
        match entity.value.as_str() {
            "completed" | "done" | "finished" | "complete" => {
                status = Some(StatusFilter::Completed)
            }
            "pending" | "incomplete" | "not done" => status = Some(StatusFilter::Pending),
            _ => {}
        }
    }
    status
}

/// Checkmark list of at most ten tasks, one per line.
fn glyph_list(tasks: &[TaskRecord]) -> String {
    tasks
        .iter()
        .take(10)
        .map(|t| {
            let glyph = if t.completed { "✓" } else { "○" };
            format!("{glyph} {}", t.title)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The user asked to see the task list itself rather than a summary.
fn wants_task_list(original: &str) -> bool {
    let lowered = original.to_lowercase();
    lowered.contains("show")
        && (lowered.contains("task list")
            || (lowered.contains("task") && lowered.contains("list")))
}

fn backend_failure(action: &str, error: BackendError) -> OperationResult {
    warn!(action, error = %error, "collaborator call failed");
    OperationResult::error(format!("Sorry, I couldn't {action}: {error}"))
        .with_error_detail(error.to_string())
}

fn unexpected_outcome(action: &str, outcome: TaskOutcome) -> OperationResult {
    warn!(action, ?outcome, "collaborator returned unexpected outcome");
    OperationResult::error(format!("Sorry, I couldn't {action}: unexpected result"))
        .with_error_detail("unexpected outcome shape")
}
