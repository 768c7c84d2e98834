use chrono::{DateTime, Utc};
use std::net::IpAddr;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::{Email, Password};

/// Command for logging in a user
#[derive(Debug, Clone)]
pub struct LoginUserCommand {
  pub email: String,
  /// Plain-text password
  pub password: String,
  /// Whether to create a long-lived session
  pub remember_me: bool,
}

/// Response after successful login
#[derive(Debug, Clone)]
pub struct LoginUserResponse {
  pub user_id: Uuid,
  pub name: String,
  pub email: String,
  pub is_admin: bool,
  pub session_token: String,
  pub expires_at: DateTime<Utc>,
}

pub struct LoginUserUseCase {
  auth_service: Arc<AuthService>,
}

impl LoginUserUseCase {
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// # Errors
  /// Returns `AuthError::InvalidCredentials` on a bad email/password pair
  /// and `AuthError::RateLimitExceeded` once too many attempts failed.
  pub async fn execute(
    &self,
    command: LoginUserCommand,
    ip_address: Option<IpAddr>,
    user_agent: Option<String>,
  ) -> Result<LoginUserResponse, AuthError> {
    let email = Email::new(command.email)?;
    let password = Password::new(command.password)?;

    let (user, session, token) = self
      .auth_service
      .login(email, password, ip_address, user_agent, command.remember_me)
      .await?;

    Ok(LoginUserResponse {
      user_id: user.id,
      name: user.name,
      email: user.email,
      is_admin: user.is_admin,
      session_token: token.into_inner(),
      expires_at: session.expires_at,
    })
  }
}
