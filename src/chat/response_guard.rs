//! Response safety gate.
//!
//! Every composed reply passes through the guard before it reaches the
//! user. The guard scans for sensitive-information patterns, fabricated
//! content markers, contradictions with the operation outcome, and
//! cross-user leakage. A failed validation replaces the text with an
//! intent-appropriate fallback; the response type is kept so the
//! conversation protocol (confirmation in particular) still advances.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::chat::types::{IntentKind, OperationResult, ResponseType, UserContext, UserIntent};

/// Uppercase only: the replies themselves use words like "delete" and
/// "update" in lowercase, which must not trip the scan.
const SQL_PATTERN: &str =
    r"(\bSELECT\b|\bINSERT\b|\bUPDATE\b|\bDELETE\b|\bDROP\b|\bCREATE\b|\bALTER\b|\bEXEC\b|\bUNION\b)";

const SENSITIVE_PATTERNS: &[&str] = &[
    r"(?i)\b(system|internal|config|setting|environment|variable|password|secret|token|key)\b[:\s]+",
    SQL_PATTERN,
    r"(?i)(admin|root|superuser|privileged).*access",
    r"(\.\./|\.\.\\|~/)",
    r"(?i)\b(cmd|sh|bash|powershell|script)\b[:\s]+",
];

/// Markers of fabricated content, matched as case-insensitive substrings.
const HALLUCINATION_KEYWORDS: &[&str] = &[
    "imagined",
    "made-up",
    "fictional",
    "hypothetical",
    "invented",
    "pretend",
    "supposed",
    "alleged",
    "rumored",
    "unverified",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    SensitiveDisclosure,
    Hallucination,
    Inconsistency,
    SafetyViolation,
    PrivacyViolation,
}

impl IssueKind {
    /// Confidence penalty per issue.
    fn penalty(self) -> f32 {
        match self {
            IssueKind::SensitiveDisclosure | IssueKind::SafetyViolation => 0.4,
            IssueKind::Hallucination | IssueKind::Inconsistency => 0.2,
            IssueKind::PrivacyViolation => 0.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub kind: IssueKind,
    pub description: String,
}

/// Outcome of guarding one response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub issues: Vec<ValidationIssue>,
    /// Text safe to show the user; the original when validation passed.
    pub sanitized_response: String,
    /// `1.0` minus the accumulated penalties, clamped to `[0.0, 1.0]`.
    pub confidence: f32,
}

pub struct ResponseGuard {
    sensitive: Vec<(&'static str, Regex)>,
}

impl Default for ResponseGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseGuard {
    pub fn new() -> Self {
        Self {
            sensitive: SENSITIVE_PATTERNS
                .iter()
                .filter_map(|p| Regex::new(p).ok().map(|r| (*p, r)))
                .collect(),
        }
    }

    /// Validate a composed response against the operation that produced
    /// it. Never fails outward; a bad response comes back sanitized.
    pub fn review(
        &self,
        response: &str,
        intent: &UserIntent,
        ctx: &UserContext,
        result: &OperationResult,
    ) -> ValidationReport {
        let mut issues = Vec::new();

        self.check_sensitive_disclosure(response, &mut issues);
        self.check_content_integrity(response, result, &mut issues);
        self.check_privacy(response, ctx, result, &mut issues);

        let confidence = confidence_from_issues(&issues);
        let is_valid = issues.is_empty();
        let sanitized_response = if is_valid {
            response.to_string()
        } else {
            warn!(
                issue_count = issues.len(),
                kind = ?intent.kind,
                "response failed validation, substituting fallback"
            );
            safe_fallback(intent.kind).to_string()
        };

        debug!(is_valid, confidence, "response reviewed");
        ValidationReport {
            is_valid,
            issues,
            sanitized_response,
            confidence,
        }
    }

    fn check_sensitive_disclosure(&self, response: &str, issues: &mut Vec<ValidationIssue>) {
        for (pattern, regex) in &self.sensitive {
            if regex.is_match(response) {
                issues.push(ValidationIssue {
                    kind: IssueKind::SensitiveDisclosure,
                    description: format!(
                        "response may contain sensitive system information (pattern {pattern})"
                    ),
                });
            }
        }
    }

    fn check_content_integrity(
        &self,
        response: &str,
        result: &OperationResult,
        issues: &mut Vec<ValidationIssue>,
    ) {
        let lowered = response.to_lowercase();

        for keyword in HALLUCINATION_KEYWORDS {
            if lowered.contains(keyword) {
                issues.push(ValidationIssue {
                    kind: IssueKind::Hallucination,
                    description: format!("response contains fabrication marker: {keyword}"),
                });
            }
        }

        // An error outcome must surface as an error reply.
        if result.error.is_some() && result.response_type != ResponseType::Error {
            issues.push(ValidationIssue {
                kind: IssueKind::Inconsistency,
                description: "response does not acknowledge the operation error".to_string(),
            });
        }

        // Deletion wording is only legitimate on the confirmation path.
        if lowered.contains("delete") && !result.confirmed {
            issues.push(ValidationIssue {
                kind: IssueKind::SafetyViolation,
                description: "response suggests deletion outside the confirmation protocol"
                    .to_string(),
            });
        }
    }

    fn check_privacy(
        &self,
        response: &str,
        ctx: &UserContext,
        result: &OperationResult,
        issues: &mut Vec<ValidationIssue>,
    ) {
        let lowered = response.to_lowercase();
        if !lowered.contains("email") && !lowered.contains("user") {
            return;
        }
        if let Some(result_user) = &result.user_id {
            if *result_user != ctx.user_id {
                issues.push(ValidationIssue {
                    kind: IssueKind::PrivacyViolation,
                    description: "response contains information for a different user".to_string(),
                });
            }
        }
    }
}

fn confidence_from_issues(issues: &[ValidationIssue]) -> f32 {
    let confidence = issues
        .iter()
        .fold(1.0_f32, |acc, issue| acc - issue.kind.penalty());
    confidence.clamp(0.0, 1.0)
}

/// Intent-appropriate replacement text for a rejected response.
fn safe_fallback(kind: IntentKind) -> &'static str {
    match kind {
        IntentKind::CreateTask => {
            "I had trouble creating that task. Could you try rephrasing your request?"
        }
        IntentKind::DeleteTask => {
            "I couldn't delete that task. Please check the task name and try again."
        }
        IntentKind::ListTasks => {
            "I'm having trouble retrieving your tasks. Please try again in a moment."
        }
        IntentKind::GetUserInfo => {
            "I'm having trouble retrieving your user information. Please try again."
        }
        _ => "I'm having trouble processing your request. Could you try rephrasing that?",
    }
}

/// Whether the user's permission set allows an operation.
pub fn validate_permissions(ctx: &UserContext, requested_operation: &str) -> bool {
    let required: &[&str] = match requested_operation {
        "create_task" => &["create_own_tasks"],
        "read_task" => &["read_own_tasks"],
        "update_task" => &["update_own_tasks"],
        "delete_task" => &["delete_own_tasks"],
        "read_profile" => &["read_own_profile"],
        _ => &[],
    };
    required.iter().any(|p| ctx.permissions.iter().any(|h| h == p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::types::OperationResult;

    fn intent(kind: IntentKind) -> UserIntent {
        UserIntent::new(kind, 0.9)
    }

    fn ctx() -> UserContext {
        UserContext::with_default_permissions("u1")
    }

    #[test]
    fn test_clean_response_passes_through() {
        let guard = ResponseGuard::new();
        let result = OperationResult::success("I've created a task 'buy groceries' for you.");
        let report = guard.review(
            "I've created a task 'buy groceries' for you.",
            &intent(IntentKind::CreateTask),
            &ctx(),
            &result,
        );
        assert!(report.is_valid);
        assert_eq!(report.confidence, 1.0);
        assert_eq!(
            report.sanitized_response,
            "I've created a task 'buy groceries' for you."
        );
    }

    #[test]
    fn test_sensitive_pattern_rejected() {
        let guard = ResponseGuard::new();
        let result = OperationResult::success("done");
        let report = guard.review(
            "Your password: hunter2",
            &intent(IntentKind::GetUserInfo),
            &ctx(),
            &result,
        );
        assert!(!report.is_valid);
        assert!(report
            .issues
            .iter()
            .any(|i| i.kind == IssueKind::SensitiveDisclosure));
        assert_eq!(
            report.sanitized_response,
            "I'm having trouble retrieving your user information. Please try again."
        );
        assert!(report.confidence < 1.0);
    }

    #[test]
    fn test_uppercase_sql_rejected_lowercase_allowed() {
        let guard = ResponseGuard::new();
        let mut result = OperationResult::success("ok");
        result.confirmed = true;

        let report = guard.review(
            "DROP TABLE tasks",
            &intent(IntentKind::Unknown),
            &ctx(),
            &result,
        );
        assert!(!report.is_valid);

        // The confirmation prompt itself uses "delete" in lowercase.
        let prompt = "Are you sure you want to delete the task 'Groceries'? \
                      Please respond with 'Yes' or 'No'.";
        let report = guard.review(prompt, &intent(IntentKind::DeleteTask), &ctx(), &result);
        assert!(report.is_valid, "issues: {:?}", report.issues);
    }

    #[test]
    fn test_unconfirmed_deletion_wording_rejected() {
        let guard = ResponseGuard::new();
        let result = OperationResult::success("I've deleted the task 'Groceries'.");
        let report = guard.review(
            "I've deleted the task 'Groceries'.",
            &intent(IntentKind::DeleteTask),
            &ctx(),
            &result,
        );
        assert!(!report.is_valid);
        assert!(report
            .issues
            .iter()
            .any(|i| i.kind == IssueKind::SafetyViolation));
        assert_eq!(
            report.sanitized_response,
            "I couldn't delete that task. Please check the task name and try again."
        );
    }

    #[test]
    fn test_confirmed_deletion_wording_allowed() {
        let guard = ResponseGuard::new();
        let mut result = OperationResult::success("I've deleted the task 'Groceries'.");
        result.confirmed = true;
        let report = guard.review(
            "I've deleted the task 'Groceries'.",
            &intent(IntentKind::DeleteTask),
            &ctx(),
            &result,
        );
        assert!(report.is_valid);
    }

    #[test]
    fn test_unacknowledged_error_flagged() {
        let guard = ResponseGuard::new();
        let result = OperationResult::success("All good!").with_error_detail("timeout");
        let report = guard.review("All good!", &intent(IntentKind::ListTasks), &ctx(), &result);
        assert!(!report.is_valid);
        assert!(report
            .issues
            .iter()
            .any(|i| i.kind == IssueKind::Inconsistency));
    }

    #[test]
    fn test_hallucination_marker_flagged() {
        let guard = ResponseGuard::new();
        let result = OperationResult::success("x");
        let report = guard.review(
            "Here is a hypothetical task list",
            &intent(IntentKind::ListTasks),
            &ctx(),
            &result,
        );
        assert!(!report.is_valid);
        assert!(report
            .issues
            .iter()
            .any(|i| i.kind == IssueKind::Hallucination));
    }

    #[test]
    fn test_cross_user_info_flagged() {
        let guard = ResponseGuard::new();
        let mut result = OperationResult::success("Your email is other@example.com");
        result.user_id = Some("someone-else".to_string());
        let report = guard.review(
            "Your email is other@example.com",
            &intent(IntentKind::GetUserInfo),
            &ctx(),
            &result,
        );
        assert!(!report.is_valid);
        assert!(report
            .issues
            .iter()
            .any(|i| i.kind == IssueKind::PrivacyViolation));
        // A minor issue alone barely dents the confidence.
        assert!((report.confidence - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_confidence_clamped_at_zero() {
        let issues: Vec<ValidationIssue> = (0..4)
            .map(|_| ValidationIssue {
                kind: IssueKind::SafetyViolation,
                description: String::new(),
            })
            .collect();
        assert_eq!(confidence_from_issues(&issues), 0.0);
    }

    #[test]
    fn test_permission_map() {
        let ctx = ctx();
        assert!(validate_permissions(&ctx, "create_task"));
        assert!(validate_permissions(&ctx, "read_profile"));
        assert!(!validate_permissions(&ctx, "admin_panel"));

        let restricted = UserContext {
            user_id: "u2".to_string(),
            permissions: vec!["read_own_tasks".to_string()],
        };
        assert!(!validate_permissions(&restricted, "delete_task"));
        assert!(validate_permissions(&restricted, "read_task"));
    }
}
