use thiserror::Error;

use crate::domain::auth::errors::RepositoryError;

#[derive(Debug, Error)]
pub enum ProjectError {
  #[error("Project not found")]
  NotFound,

  #[error("Insufficient permissions to perform this action")]
  Forbidden,

  #[error("User not found")]
  UserNotFound,

  #[error("User is already a member of this project")]
  AlreadyMember,

  #[error("User is not a member of this project")]
  NotMember,

  #[error("The project owner cannot be removed")]
  CannotRemoveOwner,

  #[error("The project owner is always a member")]
  OwnerAlwaysMember,

  #[error("Repository error: {0}")]
  Repository(#[from] RepositoryError),

  #[error("Validation error: {0}")]
  Validation(#[from] ValidationError),

  #[error("Auth error: {0}")]
  Auth(#[from] crate::domain::auth::errors::AuthError),
}

#[derive(Debug, Error)]
pub enum ValidationError {
  #[error("Invalid role")]
  InvalidRole,

  #[error("Invalid field '{field}': {reason}")]
  InvalidField { field: String, reason: String },
}

impl From<sqlx::Error> for ProjectError {
  fn from(error: sqlx::Error) -> Self {
    ProjectError::Repository(RepositoryError::from(error))
  }
}
