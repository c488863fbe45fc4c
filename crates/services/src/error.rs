//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{SettingsError, SummaryError};

/// Errors emitted by session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session is not finished")]
    NotFinished,
    #[error("session loop has stopped")]
    LoopClosed,
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Summary(#[from] SummaryError),
}
