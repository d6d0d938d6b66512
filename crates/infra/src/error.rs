//! Application-level error model.

use thiserror::Error;

use qna_core::{AnswerId, DomainError, QuestionId};

use crate::repository::RepositoryError;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Domain rule violation (ownership, missing writer, validation).
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("question {0} not found")]
    QuestionNotFound(QuestionId),

    #[error("answer {0} not found")]
    AnswerNotFound(AnswerId),

    #[error("user '{0}' not found")]
    UserNotFound(String),

    #[error("user '{0}' already exists")]
    DuplicateUser(String),

    /// Storage failure (e.g. poisoned lock).
    #[error("storage error: {0}")]
    Storage(String),

    #[error("failed to serialize delete histories: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<RepositoryError> for ServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::DuplicateUser(login) => ServiceError::DuplicateUser(login),
            RepositoryError::Domain(e) => ServiceError::Domain(e),
            other => ServiceError::Storage(other.to_string()),
        }
    }
}

impl ServiceError {
    /// True for failures caused by the caller not owning the content.
    pub fn is_ownership_failure(&self) -> bool {
        matches!(
            self,
            ServiceError::Domain(DomainError::CannotDelete(_) | DomainError::Unauthorized)
        )
    }
}
