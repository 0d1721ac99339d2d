pub type Result<T> = std::result::Result<T, Error>;

use axum::http::StatusCode;
use thiserror::Error;

/// Crate-wide error type.
///
/// Variants are grouped by the handling policy in the design docs:
/// [`Error::Validation`] and [`Error::StateViolation`] are reported straight
/// back to the caller with no state change, [`Error::Persistence`] is fatal to
/// the owning match actor, and [`Error::Archiver`] is logged and retried.
#[derive(Debug, Error)]
pub enum Error {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("operation not permitted in state {state}: {op}")]
    StateViolation { state: String, op: String },

    #[error("match actor has not been initialized yet")]
    NotInitialized,

    #[error("match actor not found for id {0}")]
    ActorNotFound(String),

    #[error("embedded storage error")]
    Persistence(#[from] sled::Error),

    #[error("embedded storage encoding error")]
    PersistenceEncoding(#[from] serde_json::Error),

    #[error("external store error")]
    Archiver(#[from] sqlx::Error),

    #[error("http error")]
    Http(#[from] reqwest::Error),

    #[error("the match actor's mailbox has shut down")]
    ActorGone,
}

impl Error {
    pub fn state_violation(state: impl Into<String>, op: impl Into<String>) -> Self {
        Error::StateViolation {
            state: state.into(),
            op: op.into(),
        }
    }

    /// Maps this error onto the HTTP status classes the router promises callers.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::StateViolation { .. } => StatusCode::BAD_REQUEST,
            Error::NotInitialized => StatusCode::BAD_REQUEST,
            Error::ActorNotFound(_) => StatusCode::NOT_FOUND,
            Error::Persistence(_) | Error::PersistenceEncoding(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Error::Archiver(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Http(_) => StatusCode::BAD_GATEWAY,
            Error::ActorGone => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
