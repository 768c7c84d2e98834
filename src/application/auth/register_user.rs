use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::entities::Gender;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::{AuthService, Registration};
use crate::domain::auth::value_objects::{Email, Password};

/// Command for registering a new user
#[derive(Debug, Clone)]
pub struct RegisterUserCommand {
  pub name: String,
  pub email: String,
  /// Plain-text password, hashed before storage
  pub password: String,
  pub mobile: Option<String>,
  pub gender: Option<String>,
}

/// Response after successful registration; the session opens immediately
#[derive(Debug, Clone)]
pub struct RegisterUserResponse {
  pub user_id: Uuid,
  pub name: String,
  pub email: String,
  pub session_token: String,
  pub expires_at: DateTime<Utc>,
}

pub struct RegisterUserUseCase {
  auth_service: Arc<AuthService>,
}

impl RegisterUserUseCase {
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// # Errors
  /// Returns `AuthError::EmailAlreadyExists` on a duplicate email and
  /// `AuthError::ValueObject` when email or password fail validation.
  pub async fn execute(
    &self,
    command: RegisterUserCommand,
  ) -> Result<RegisterUserResponse, AuthError> {
    let email = Email::new(command.email)?;
    let password = Password::new(command.password)?;
    let gender = command.gender.map(|g| Gender::parse(&g)).transpose()?;

    let registration = Registration {
      name: command.name,
      email,
      mobile: command.mobile,
      gender,
    };

    let (user, session, token) = self.auth_service.register(registration, password).await?;

    Ok(RegisterUserResponse {
      user_id: user.id,
      name: user.name,
      email: user.email,
      session_token: token.into_inner(),
      expires_at: session.expires_at,
    })
  }
}
