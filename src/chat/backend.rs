//! Task-data collaborator boundary.
//!
//! The pipeline never talks to storage directly; every read and write
//! goes through [`TaskBackend`] as a typed operation. The collaborator
//! is assumed to scope everything to the requesting user.
//!
//! [`MemoryTaskBackend`] is the reference implementation used by the
//! test suite and by single-process demos.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chat::types::{StatusFilter, TaskRecord};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("task {0} not found")]
    TaskNotFound(i64),
    #[error("invalid request: {0}")]
    Invalid(String),
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// A validated domain operation, ready for the collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TaskOperation {
    Create {
        title: String,
        description: String,
        /// Raw due-date text as the user typed it; parsing is the
        /// collaborator's concern.
        #[serde(skip_serializing_if = "Option::is_none")]
        due_date: Option<String>,
    },
    Update {
        task_id: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        completed: Option<bool>,
    },
    Delete {
        task_id: i64,
    },
    List {
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<StatusFilter>,
    },
    GetById {
        task_id: i64,
    },
    Search {
        term: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<StatusFilter>,
    },
}

/// What an executed operation produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TaskOutcome {
    Created(TaskRecord),
    Updated(TaskRecord),
    Deleted(TaskRecord),
    Fetched(TaskRecord),
    Listing(Vec<TaskRecord>),
    Matches(Vec<TaskRecord>),
}

/// A user as reported by the identity collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// External collaborator for task data and user identity.
#[async_trait]
pub trait TaskBackend: Send + Sync {
    async fn execute(
        &self,
        user_id: &str,
        operation: TaskOperation,
    ) -> Result<TaskOutcome, BackendError>;

    async fn get_user_by_id(&self, user_id: &str) -> Result<Option<UserRecord>, BackendError>;
}

// ============================================================
// In-memory reference backend
// ============================================================

#[derive(Default)]
struct MemoryStore {
    tasks: HashMap<String, Vec<TaskRecord>>,
    users: HashMap<String, UserRecord>,
    next_id: i64,
}

/// Per-user task vectors in creation order, behind one lock. Only for
/// tests and demos; a real deployment supplies its own collaborator.
#[derive(Default)]
pub struct MemoryTaskBackend {
    inner: Mutex<MemoryStore>,
}

impl MemoryTaskBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user so identity lookups resolve.
    pub fn with_user(
        self,
        user_id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        let user_id = user_id.into();
        if let Ok(mut store) = self.inner.lock() {
            store.users.insert(
                user_id.clone(),
                UserRecord {
                    id: user_id,
                    name: Some(name.into()),
                    email: Some(email.into()),
                },
            );
        }
        self
    }

    /// Seed one task; returns its id for test assertions.
    pub fn seed_task(
        &self,
        user_id: &str,
        title: &str,
        description: &str,
        completed: bool,
    ) -> Result<i64, BackendError> {
        let mut store = self.lock()?;
        store.next_id += 1;
        let id = store.next_id;
        store.tasks.entry(user_id.to_string()).or_default().push(TaskRecord {
            id,
            title: title.to_string(),
            description: description.to_string(),
            completed,
            due_date: None,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryStore>, BackendError> {
        self.inner
            .lock()
            .map_err(|_| BackendError::Unavailable("poisoned task store".to_string()))
    }
}

#[async_trait]
impl TaskBackend for MemoryTaskBackend {
    async fn execute(
        &self,
        user_id: &str,
        operation: TaskOperation,
    ) -> Result<TaskOutcome, BackendError> {
        let mut store = self.lock()?;
        match operation {
            TaskOperation::Create {
                title,
                description,
                due_date,
            } => {
                if title.trim().is_empty() {
                    return Err(BackendError::Invalid("a task needs a title".to_string()));
                }
                store.next_id += 1;
                let task = TaskRecord {
                    id: store.next_id,
                    title,
                    description,
                    completed: false,
                    due_date: due_date.as_deref().and_then(parse_due_date),
                    created_at: Utc::now(),
                };
                store
                    .tasks
                    .entry(user_id.to_string())
                    .or_default()
                    .push(task.clone());
                Ok(TaskOutcome::Created(task))
            }
            TaskOperation::Update {
                task_id,
                title,
                description,
                completed,
            } => {
                let tasks = store.tasks.entry(user_id.to_string()).or_default();
                let task = tasks
                    .iter_mut()
                    .find(|t| t.id == task_id)
                    .ok_or(BackendError::TaskNotFound(task_id))?;
                if let Some(title) = title {
                    task.title = title;
                }
                if let Some(description) = description {
                    task.description = description;
                }
                if let Some(completed) = completed {
                    task.completed = completed;
                }
                Ok(TaskOutcome::Updated(task.clone()))
            }
            TaskOperation::Delete { task_id } => {
                let tasks = store.tasks.entry(user_id.to_string()).or_default();
                let index = tasks
                    .iter()
                    .position(|t| t.id == task_id)
                    .ok_or(BackendError::TaskNotFound(task_id))?;
                Ok(TaskOutcome::Deleted(tasks.remove(index)))
            }
            TaskOperation::List { status } => {
                let tasks = store.tasks.get(user_id).cloned().unwrap_or_default();
                Ok(TaskOutcome::Listing(filter_by_status(tasks, status)))
            }
            TaskOperation::GetById { task_id } => {
                let task = store
                    .tasks
                    .get(user_id)
                    .and_then(|tasks| tasks.iter().find(|t| t.id == task_id))
                    .cloned()
                    .ok_or(BackendError::TaskNotFound(task_id))?;
                Ok(TaskOutcome::Fetched(task))
            }
            TaskOperation::Search { term, status } => {
                let needle = term.to_lowercase();
                let tasks = store.tasks.get(user_id).cloned().unwrap_or_default();
                let matches = tasks
                    .into_iter()
                    .filter(|t| {
                        format!("{} {}", t.title, t.description)
                            .to_lowercase()
                            .contains(&needle)
                    })
                    .collect();
                Ok(TaskOutcome::Matches(filter_by_status(matches, status)))
            }
        }
    }

    async fn get_user_by_id(&self, user_id: &str) -> Result<Option<UserRecord>, BackendError> {
        Ok(self.lock()?.users.get(user_id).cloned())
    }
}

fn filter_by_status(tasks: Vec<TaskRecord>, status: Option<StatusFilter>) -> Vec<TaskRecord> {
    match status {
        None => tasks,
        Some(StatusFilter::Completed) => tasks.into_iter().filter(|t| t.completed).collect(),
        Some(StatusFilter::Pending) => tasks.into_iter().filter(|t| !t.completed).collect(),
    }
}

// ── date parsing ─────────────────────────────────────────────────

const MONTH_NAMES: &[(&str, u32)] = &[
    ("jan", 1),
    ("feb", 2),
    ("mar", 3),
    ("apr", 4),
    ("may", 5),
    ("jun", 6),
    ("jul", 7),
    ("aug", 8),
    ("sep", 9),
    ("oct", 10),
    ("nov", 11),
    ("dec", 12),
];

/// Accepts `25/01/2026`, `01-25-26`, `25 Jan 2026`, `25 Jan` and
/// `2026-01-25`. Two-digit years below 50 are 20xx, the rest 19xx.
/// Ambiguous numeric forms read day-first unless only the second
/// number can be a day.
pub fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    // ISO form first.
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }

    // Numeric day/month/year.
    let numeric: Vec<&str> = raw
        .split(['/', '-'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if numeric.len() == 3 {
        let a: u32 = numeric[0].parse().ok()?;
        let b: u32 = numeric[1].parse().ok()?;
        let year = expand_year(numeric[2].parse().ok()?);
        let (day, month) = if a > 12 { (a, b) } else if b > 12 { (b, a) } else { (a, b) };
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    // "25 Jan 2026" or bare "25 Jan".
    let words: Vec<&str> = raw.split_whitespace().collect();
    if words.len() == 2 || words.len() == 3 {
        let day: u32 = words[0].parse().ok()?;
        let month_word = words[1].to_lowercase();
        let month = MONTH_NAMES
            .iter()
            .find(|(name, _)| month_word.starts_with(name))
            .map(|(_, n)| *n)?;
        let year = match words.get(2) {
            Some(y) => expand_year(y.parse().ok()?),
            None => Utc::now().year(),
        };
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    None
}

fn expand_year(year: i32) -> i32 {
    if year < 50 {
        year + 2000
    } else if year < 100 {
        year + 1900
    } else {
        year
    }
}
