//! Response composition.
//!
//! Turns an [`OperationResult`] into the final reply text. Handlers
//! that already wrote a response get it passed through verbatim,
//! except failures: an error result carrying a detail is rephrased
//! into user-facing wording keyed on the failure kind. Everything else
//! is filled in from the result's structured fields, with follow-up
//! suggestions per reply category.

use tracing::debug;

use crate::chat::types::{OperationResult, ResponseType, TaskRecord};

pub struct ResponseComposer {
    /// Most tasks ever shown in one reply.
    preview_limit: usize,
}

impl Default for ResponseComposer {
    fn default() -> Self {
        Self::new(10)
    }
}

impl ResponseComposer {
    pub fn new(preview_limit: usize) -> Self {
        Self { preview_limit }
    }

    /// Compose the reply text for one operation result.
    pub fn compose(&self, result: &OperationResult) -> String {
        let mut text = if result.response_type == ResponseType::Error {
            self.compose_error(result)
        } else {
            match result.response.as_deref().filter(|r| !r.is_empty()) {
                Some(response) => response.to_string(),
                None => self.compose_from_fields(result),
            }
        };
        if result.dashboard_hint {
            text.push_str("\n\nYou can also view all your tasks on the task dashboard.");
        }
        debug!(response_type = ?result.response_type, "composed response");
        text
    }

    fn compose_from_fields(&self, result: &OperationResult) -> String {
        match result.response_type {
            ResponseType::ClarificationNeeded => {
                "Could you please be more specific?".to_string()
            }
            ResponseType::ConfirmationRequired => "Please confirm this action.".to_string(),
            _ if result.success => self.compose_success(result),
            _ => "I'm not sure what happened. Could you try rephrasing that?".to_string(),
        }
    }

    fn compose_success(&self, result: &OperationResult) -> String {
        if let (Some(title), Some(_)) = (&result.task_title, result.task_id) {
            if result.response_type == ResponseType::TaskDeleted {
                return format!("I've removed the task '{title}' from your list.");
            }
            if let Some(completed) = result.completed {
                let status = if completed { "complete" } else { "incomplete" };
                return format!("I've updated the task '{title}' to be {status}.");
            }
            return format!("I've created a task '{title}' for you.");
        }

        if let Some(count) = result.task_count {
            if count == 0 {
                return "You don't have any tasks yet.".to_string();
            }
            let list = self.format_task_list(&result.tasks);
            return match result.filter_status {
                Some(status) => {
                    format!("You have {count} {} tasks:\n{list}", status.as_str())
                }
                None => format!("You have {count} tasks:\n{list}"),
            };
        }

        if let Some(count) = result.matching_count {
            let keyword = result.keyword.as_deref().unwrap_or("the search term");
            let list = self.format_task_list(&result.tasks);
            return match result.filter_status {
                Some(status) => format!(
                    "I found {count} {} tasks containing '{keyword}':\n{list}",
                    status.as_str()
                ),
                None => format!("I found {count} tasks containing '{keyword}':\n{list}"),
            };
        }

        if let Some(user_id) = &result.user_id {
            return match &result.email {
                Some(email) => format!("You are logged in as {email}."),
                None => format!("You are logged in with user ID: {user_id}."),
            };
        }

        "Your request was processed successfully.".to_string()
    }

    /// Failure wording keyed on the error detail. A failure with no
    /// detail keeps its pre-composed response.
    fn compose_error(&self, result: &OperationResult) -> String {
        let Some(error_msg) = result.error.as_deref().filter(|e| !e.is_empty()) else {
            return result
                .response
                .as_deref()
                .filter(|r| !r.is_empty())
                .unwrap_or("I'm sorry, but I encountered an error processing your request.")
                .to_string();
        };
        let lowered = error_msg.to_lowercase();

        if lowered.contains("not found") || lowered.contains("does not exist") {
            format!("Sorry, I couldn't find what you were looking for: {error_msg}")
        } else if lowered.contains("permission") || lowered.contains("unauthorized") {
            "I'm sorry, but you don't have permission to perform this action.".to_string()
        } else if lowered.contains("duplicate") || lowered.contains("already exists") {
            "It looks like that already exists. Is there something else I can help you with?"
                .to_string()
        } else if lowered.contains("required") || lowered.contains("missing") {
            format!("I need more information to complete this request: {error_msg}")
        } else if lowered.contains("connection") || lowered.contains("timeout") {
            "I'm having trouble connecting to the service right now. Please try again in a moment."
                .to_string()
        } else {
            format!("Sorry, I couldn't complete that action: {error_msg}")
        }
    }

    /// Checkmark list capped at the preview limit, with an overflow line.
    pub fn format_task_list(&self, tasks: &[TaskRecord]) -> String {
        if tasks.is_empty() {
            return "No tasks found.".to_string();
        }
        let mut lines: Vec<String> = tasks
            .iter()
            .take(self.preview_limit)
            .map(|task| {
                let icon = if task.completed { "✓" } else { "○" };
                format!("{icon} {}", task.title)
            })
            .collect();
        if tasks.len() > self.preview_limit {
            lines.push(format!("... and {} more", tasks.len() - self.preview_limit));
        }
        lines.join("\n")
    }

    /// Follow-up suggestions matching the reply category.
    pub fn suggestions(&self, result: &OperationResult) -> Vec<String> {
        match result.response_type {
            ResponseType::Success => {
                if result.task_id.is_some() {
                    vec![
                        "Would you like to set a due date for this task?".to_string(),
                        "Do you want to add a description to this task?".to_string(),
                        "I can also mark this task as completed if you've finished it."
                            .to_string(),
                    ]
                } else if result.task_count.unwrap_or(0) > 0 {
                    vec![
                        "You can ask me to show only completed tasks".to_string(),
                        "Would you like to search for specific tasks?".to_string(),
                        "I can sort your tasks by title or date if you'd like".to_string(),
                    ]
                } else {
                    Vec::new()
                }
            }
            ResponseType::ClarificationNeeded => vec![
                "Try being more specific about which task you mean".to_string(),
                "You can refer to tasks by their exact title".to_string(),
                "Use keywords that appear in the task title or description".to_string(),
            ],
            ResponseType::ConfirmationRequired => vec![
                "Say 'yes' to confirm this action".to_string(),
                "Say 'no' or 'cancel' to abort".to_string(),
                "You can also ask me to show you the task before deleting".to_string(),
            ],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task(id: i64, title: &str, completed: bool) -> TaskRecord {
        TaskRecord {
            id,
            title: title.to_string(),
            description: String::new(),
            completed,
            due_date: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_precomposed_response_passes_through() {
        let composer = ResponseComposer::default();
        let result = OperationResult::success("I've created a task 'Laundry' for you.");
        assert_eq!(
            composer.compose(&result),
            "I've created a task 'Laundry' for you."
        );
    }

    #[test]
    fn test_created_from_fields() {
        let composer = ResponseComposer::default();
        let mut result = OperationResult::success("").with_task(1, "Laundry");
        result.response = None;
        assert_eq!(
            composer.compose(&result),
            "I've created a task 'Laundry' for you."
        );
    }

    #[test]
    fn test_deleted_from_fields() {
        let composer = ResponseComposer::default();
        let mut result = OperationResult::success("").with_task(1, "Laundry");
        result.response = None;
        result.response_type = ResponseType::TaskDeleted;
        assert_eq!(
            composer.compose(&result),
            "I've removed the task 'Laundry' from your list."
        );
    }

    #[test]
    fn test_updated_from_fields() {
        let composer = ResponseComposer::default();
        let mut result = OperationResult::success("").with_task(1, "Laundry");
        result.response = None;
        result.completed = Some(true);
        assert_eq!(
            composer.compose(&result),
            "I've updated the task 'Laundry' to be complete."
        );
    }

    #[test]
    fn test_list_from_fields_with_overflow() {
        let composer = ResponseComposer::default();
        let mut result = OperationResult::success("");
        result.response = None;
        result.tasks = (1..=12).map(|i| task(i, &format!("Task {i}"), false)).collect();
        result.task_count = Some(12);
        let text = composer.compose(&result);
        assert!(text.starts_with("You have 12 tasks:"));
        assert!(text.contains("○ Task 10"));
        assert!(!text.contains("Task 11\n"));
        assert!(text.ends_with("... and 2 more"));
    }

    #[test]
    fn test_dashboard_hint_appended() {
        let composer = ResponseComposer::default();
        let mut result = OperationResult::success("You have 1 tasks:\n○ Laundry");
        result.dashboard_hint = true;
        let text = composer.compose(&result);
        assert!(text.ends_with("You can also view all your tasks on the task dashboard."));
    }

    fn failure(detail: &str) -> OperationResult {
        OperationResult::error("").with_error_detail(detail)
    }

    #[test]
    fn test_error_phrasings() {
        let composer = ResponseComposer::default();

        assert_eq!(
            composer.compose(&failure("task 7 not found")),
            "Sorry, I couldn't find what you were looking for: task 7 not found"
        );
        assert_eq!(
            composer.compose(&failure("permission denied")),
            "I'm sorry, but you don't have permission to perform this action."
        );
        assert!(composer
            .compose(&failure("connection refused"))
            .contains("trouble connecting"));
        assert_eq!(
            composer.compose(&failure("something odd")),
            "Sorry, I couldn't complete that action: something odd"
        );
    }

    #[test]
    fn test_error_detail_overrides_precomposed_response() {
        let composer = ResponseComposer::default();
        let result = OperationResult::error("Sorry, I couldn't update the task: gone")
            .with_error_detail("task 3 not found");
        assert_eq!(
            composer.compose(&result),
            "Sorry, I couldn't find what you were looking for: task 3 not found"
        );
    }

    #[test]
    fn test_error_without_detail_passes_through() {
        let composer = ResponseComposer::default();
        let result = OperationResult::error("Sorry, I didn't understand that request.");
        assert_eq!(
            composer.compose(&result),
            "Sorry, I didn't understand that request."
        );

        let mut bare = OperationResult::error("");
        bare.response = None;
        assert_eq!(
            composer.compose(&bare),
            "I'm sorry, but I encountered an error processing your request."
        );
    }

    #[test]
    fn test_user_info_from_fields() {
        let composer = ResponseComposer::default();
        let mut result = OperationResult::success("");
        result.response = None;
        result.user_id = Some("u1".to_string());
        assert_eq!(composer.compose(&result), "You are logged in with user ID: u1.");

        result.email = Some("ada@example.com".to_string());
        assert_eq!(composer.compose(&result), "You are logged in as ada@example.com.");
    }

    #[test]
    fn test_suggestions_by_response_type() {
        let composer = ResponseComposer::default();

        let created = OperationResult::success("done").with_task(1, "Laundry");
        assert_eq!(composer.suggestions(&created).len(), 3);

        let clarification = OperationResult::clarification("which one?");
        assert!(composer.suggestions(&clarification)[0].contains("more specific"));

        let error = OperationResult::error("nope");
        assert!(composer.suggestions(&error).is_empty());
    }
}
