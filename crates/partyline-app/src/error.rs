//! Application errors.

use thiserror::Error;

/// Errors surfaced synchronously to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Tried to send an empty message.
    #[error("No message to send!")]
    EmptyMessage,
}
