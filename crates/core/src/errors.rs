use thiserror::Error;

use crate::domain::product::UserId;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown user `{0}`")]
    UnknownUser(UserId),
    #[error("degenerate rule rejected: {detail}")]
    DegenerateRule { detail: String },
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("ingestion failure: {0}")]
    Ingestion(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Stable class identifier for structured CLI output.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Domain(DomainError::UnknownUser(_)) => "not_found",
            Self::Domain(DomainError::DegenerateRule { .. })
            | Self::Domain(DomainError::InvariantViolation(_)) => "invalid_rules",
            Self::Ingestion(_) => "ingestion",
            Self::Configuration(_) => "config",
        }
    }
}
