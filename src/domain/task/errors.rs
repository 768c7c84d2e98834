use thiserror::Error;

use crate::domain::auth::errors::RepositoryError;
use crate::domain::project::errors::ProjectError;

#[derive(Debug, Error)]
pub enum TaskError {
  #[error("Task not found")]
  NotFound,

  #[error("Subtask not found")]
  SubtaskNotFound,

  #[error("Insufficient permissions to perform this action")]
  Forbidden,

  #[error("Repository error: {0}")]
  Repository(#[from] RepositoryError),

  #[error("Validation error: {0}")]
  Validation(#[from] ValidationError),

  #[error("Project error: {0}")]
  Project(#[from] ProjectError),
}

#[derive(Debug, Error)]
pub enum ValidationError {
  #[error("Invalid priority")]
  InvalidPriority,

  #[error("Invalid field '{field}': {reason}")]
  InvalidField { field: String, reason: String },
}

impl From<sqlx::Error> for TaskError {
  fn from(error: sqlx::Error) -> Self {
    TaskError::Repository(RepositoryError::from(error))
  }
}
