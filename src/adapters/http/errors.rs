use actix_web::{
  HttpResponse,
  error::ResponseError,
  http::{StatusCode, header::ContentType},
};
use serde::Serialize;
use std::fmt;

use crate::domain::auth::errors::{AuthError, RepositoryError};
use crate::domain::project::ProjectError;
use crate::domain::task::TaskError;

use super::dtos::ErrorResponse;

/// API error type that maps domain errors to HTTP responses
#[derive(Debug, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum ApiError {
  /// Validation error (400 Bad Request)
  Validation(String),

  /// Authentication error (401 Unauthorized or 429 Too Many Requests)
  Auth(AuthErrorKind),

  /// The resource exists but the user may not touch it (403 Forbidden)
  Forbidden(String),

  /// Resource does not exist (404 Not Found)
  NotFound(String),

  /// The request conflicts with current state (409 Conflict)
  Conflict { code: &'static str, message: String },

  /// Internal server error (500 Internal Server Error)
  Internal(String),
}

/// Authentication error kinds
#[derive(Debug, Serialize)]
pub enum AuthErrorKind {
  /// Invalid credentials (401)
  InvalidCredentials,

  /// Session expired or invalid (401)
  InvalidSession,

  /// Invalid or missing token format (401)
  InvalidToken,

  /// Login rate limit exceeded (429)
  RateLimitExceeded,
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
      ApiError::Auth(kind) => write!(f, "Authentication error: {:?}", kind),
      ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
      ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
      ApiError::Conflict { message, .. } => write!(f, "Conflict: {}", message),
      ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::Auth(kind) => match kind {
        AuthErrorKind::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AuthErrorKind::InvalidSession => StatusCode::UNAUTHORIZED,
        AuthErrorKind::InvalidToken => StatusCode::UNAUTHORIZED,
        AuthErrorKind::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
      },
      ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Conflict { .. } => StatusCode::CONFLICT,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    let (error_type, message) = match self {
      ApiError::Validation(msg) => ("validation_error", msg.clone()),
      ApiError::Auth(kind) => match kind {
        AuthErrorKind::InvalidCredentials => (
          "invalid_credentials",
          "Invalid email or password".to_string(),
        ),
        AuthErrorKind::InvalidSession => {
          ("invalid_session", "Invalid or expired session".to_string())
        }
        AuthErrorKind::InvalidToken => (
          "invalid_token",
          "Invalid or missing authorization token".to_string(),
        ),
        AuthErrorKind::RateLimitExceeded => (
          "rate_limit_exceeded",
          "Too many login attempts. Please try again later".to_string(),
        ),
      },
      ApiError::Forbidden(msg) => ("forbidden", msg.clone()),
      ApiError::NotFound(msg) => ("not_found", msg.clone()),
      ApiError::Conflict { code, message } => (*code, message.clone()),
      ApiError::Internal(msg) => {
        // Don't expose internal error details to clients
        tracing::error!("Internal error: {}", msg);
        (
          "internal_error",
          "An internal server error occurred".to_string(),
        )
      }
    };

    let error_response = ErrorResponse {
      error: error_type.to_string(),
      message,
      details: None,
    };

    HttpResponse::build(status)
      .content_type(ContentType::json())
      .json(error_response)
  }
}

impl From<AuthError> for ApiError {
  fn from(error: AuthError) -> Self {
    match error {
      AuthError::InvalidCredentials => ApiError::Auth(AuthErrorKind::InvalidCredentials),
      AuthError::EmailAlreadyExists => ApiError::Conflict {
        code: "email_already_exists",
        message: "An account with this email already exists".to_string(),
      },
      AuthError::MobileAlreadyExists => ApiError::Conflict {
        code: "mobile_already_exists",
        message: "An account with this mobile number already exists".to_string(),
      },
      AuthError::UserNotFound => ApiError::NotFound("User not found".to_string()),
      AuthError::InvalidSession => ApiError::Auth(AuthErrorKind::InvalidSession),
      AuthError::RateLimitExceeded => ApiError::Auth(AuthErrorKind::RateLimitExceeded),
      AuthError::Validation(err) => ApiError::Validation(err.to_string()),
      AuthError::ValueObject(err) => ApiError::Validation(err.to_string()),
      AuthError::Repository(err) => err.into(),
      AuthError::Hash(err) => ApiError::Internal(err.to_string()),
    }
  }
}

impl From<RepositoryError> for ApiError {
  fn from(error: RepositoryError) -> Self {
    match error {
      RepositoryError::NotFound => ApiError::NotFound("Resource not found".to_string()),
      RepositoryError::DuplicateKey(_) => ApiError::Conflict {
        code: "duplicate_key",
        message: "The resource already exists".to_string(),
      },
      _ => ApiError::Internal(error.to_string()),
    }
  }
}

impl From<ProjectError> for ApiError {
  fn from(error: ProjectError) -> Self {
    match error {
      ProjectError::NotFound => ApiError::NotFound("Project not found".to_string()),
      ProjectError::Forbidden => {
        ApiError::Forbidden("You do not have access to this project".to_string())
      }
      ProjectError::UserNotFound => ApiError::NotFound("User not found".to_string()),
      ProjectError::NotMember => {
        ApiError::NotFound("User is not a member of this project".to_string())
      }
      ProjectError::AlreadyMember => ApiError::Conflict {
        code: "already_member",
        message: "User is already a member of this project".to_string(),
      },
      ProjectError::CannotRemoveOwner => ApiError::Conflict {
        code: "cannot_remove_owner",
        message: "The project owner cannot be removed".to_string(),
      },
      ProjectError::OwnerAlwaysMember => ApiError::Conflict {
        code: "owner_always_member",
        message: "The project owner is already a member".to_string(),
      },
      ProjectError::Repository(e) => e.into(),
      ProjectError::Validation(e) => ApiError::Validation(e.to_string()),
      ProjectError::Auth(e) => ApiError::from(e),
    }
  }
}

impl From<TaskError> for ApiError {
  fn from(error: TaskError) -> Self {
    match error {
      TaskError::NotFound => ApiError::NotFound("Task not found".to_string()),
      TaskError::SubtaskNotFound => ApiError::NotFound("Subtask not found".to_string()),
      TaskError::Forbidden => {
        ApiError::Forbidden("You do not have access to this task".to_string())
      }
      TaskError::Repository(e) => e.into(),
      TaskError::Validation(e) => ApiError::Validation(e.to_string()),
      TaskError::Project(e) => ApiError::from(e),
    }
  }
}

/// Convert validation errors from validator crate
impl From<validator::ValidationErrors> for ApiError {
  fn from(errors: validator::ValidationErrors) -> Self {
    let messages: Vec<String> = errors
      .field_errors()
      .iter()
      .flat_map(|(field, errors)| {
        errors
          .iter()
          .map(|error| {
            error
              .message
              .as_ref()
              .map(|m| m.to_string())
              .unwrap_or_else(|| format!("Invalid field: {}", field))
          })
          .collect::<Vec<_>>()
      })
      .collect();

    ApiError::Validation(messages.join(", "))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_api_error_status_codes() {
    assert_eq!(
      ApiError::Validation("test".to_string()).status_code(),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(
      ApiError::Auth(AuthErrorKind::InvalidCredentials).status_code(),
      StatusCode::UNAUTHORIZED
    );
    assert_eq!(
      ApiError::Auth(AuthErrorKind::RateLimitExceeded).status_code(),
      StatusCode::TOO_MANY_REQUESTS
    );
    assert_eq!(
      ApiError::Forbidden("no".to_string()).status_code(),
      StatusCode::FORBIDDEN
    );
    assert_eq!(
      ApiError::NotFound("gone".to_string()).status_code(),
      StatusCode::NOT_FOUND
    );
    assert_eq!(
      ApiError::Internal("test".to_string()).status_code(),
      StatusCode::INTERNAL_SERVER_ERROR
    );
  }

  #[test]
  fn test_project_error_mapping() {
    let api_error: ApiError = ProjectError::Forbidden.into();
    assert_eq!(api_error.status_code(), StatusCode::FORBIDDEN);

    let api_error: ApiError = ProjectError::AlreadyMember.into();
    assert_eq!(api_error.status_code(), StatusCode::CONFLICT);

    let api_error: ApiError = ProjectError::CannotRemoveOwner.into();
    assert_eq!(api_error.status_code(), StatusCode::CONFLICT);
  }

  #[test]
  fn test_task_error_mapping() {
    let api_error: ApiError = TaskError::NotFound.into();
    assert_eq!(api_error.status_code(), StatusCode::NOT_FOUND);

    let api_error: ApiError = TaskError::Forbidden.into();
    assert_eq!(api_error.status_code(), StatusCode::FORBIDDEN);
  }

  #[test]
  fn test_auth_error_conversion() {
    let api_error: ApiError = AuthError::InvalidCredentials.into();
    assert_eq!(api_error.status_code(), StatusCode::UNAUTHORIZED);

    let api_error: ApiError = AuthError::EmailAlreadyExists.into();
    assert_eq!(api_error.status_code(), StatusCode::CONFLICT);
  }
}
