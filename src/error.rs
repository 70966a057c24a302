//! Crate error taxonomy.
//!
//! Conditions the user can recover from (unknown intent, ambiguous
//! target, pending confirmation, rejected response) are not errors
//! here; the pipeline reports them as [`OperationResult`]s with the
//! matching response type so every request still gets a reply.
//! `ChatError` is what remains: faults that prevent a turn from being
//! processed at all.
//!
//! [`OperationResult`]: crate::chat::types::OperationResult

use thiserror::Error;

use crate::chat::session::SessionStoreError;
use crate::chat::types::ResponseType;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error(transparent)]
    Session(#[from] SessionStoreError),
}

impl ChatError {
    /// The reply category a caller should surface this failure as.
    pub fn response_type(&self) -> ResponseType {
        match self {
            ChatError::Session(_) => ResponseType::Error,
        }
    }

    /// Text safe to show the user. Internal details never appear here.
    pub fn user_message(&self) -> &'static str {
        match self {
            ChatError::Session(_) => {
                "I'm sorry, but I encountered an error processing your request."
            }
        }
    }
}
