//! taskchat: a rule-based conversational interface for a task manager.
//!
//! Messages like "add a task to buy groceries" or "delete the grocery
//! task" are interpreted by an ordered-rule pipeline and executed
//! against a pluggable task backend. Destructive operations go through
//! an explicit confirmation protocol; every reply passes a safety gate
//! before it reaches the user.
//!
//! ```no_run
//! use std::sync::Arc;
//! use taskchat::chat::{ChatOrchestrator, InMemorySessionStore, MemoryTaskBackend, UserContext};
//! use taskchat::config::ChatConfig;
//!
//! # async fn demo() -> Result<(), taskchat::error::ChatError> {
//! let backend = Arc::new(MemoryTaskBackend::new());
//! let sessions = Arc::new(InMemorySessionStore::new());
//! let orchestrator = ChatOrchestrator::new(ChatConfig::default(), backend, sessions);
//!
//! let ctx = UserContext::with_default_permissions("user-1");
//! let reply = orchestrator
//!     .process_message(&ctx, "Add a task to buy groceries", None)
//!     .await?;
//! println!("{}", reply.response);
//! # Ok(())
//! # }
//! ```

pub mod chat;
pub mod config;
pub mod error;

pub use chat::{ChatOrchestrator, ChatReply, ResponseType, UserContext};
pub use config::ChatConfig;
pub use error::ChatError;
