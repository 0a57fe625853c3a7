//! Error kinds returned by every service operation.

use thiserror::Error;

/// Errors that can occur in tournament, score, dispute and ranking operations.
///
/// Each variant is a distinct kind the presentation layer maps to its own client code.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TennisError {
    /// Malformed or semantically illegal input (bad set scores, duplicate submission, ...).
    #[error("{0}")]
    Validation(String),
    /// The acting user's role or relation to the resource does not allow the operation.
    #[error("{0}")]
    PermissionDenied(String),
    /// A referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),
    /// The operation is not allowed in the entity's current lifecycle state.
    #[error("{0}")]
    InvalidState(String),
    /// Dispute-specific conflict, e.g. a second active dispute on one match.
    #[error("{0}")]
    Dispute(String),
}

impl TennisError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn dispute(msg: impl Into<String>) -> Self {
        Self::Dispute(msg.into())
    }

    /// Stable machine-readable name of the error kind (used in API responses).
    pub fn kind(&self) -> &'static str {
        match self {
            TennisError::Validation(_) => "validation",
            TennisError::PermissionDenied(_) => "permission_denied",
            TennisError::NotFound(_) => "not_found",
            TennisError::InvalidState(_) => "invalid_state",
            TennisError::Dispute(_) => "dispute",
        }
    }
}
