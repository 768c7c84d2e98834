use chrono::Duration;
use std::net::IpAddr;
use std::sync::Arc;
use uuid::Uuid;

use super::entities::{Gender, LoginAttempt, Session, User};
use super::errors::{AuthError, RepositoryError};
use super::ports::{LoginAttemptRepository, PasswordHasher, SessionRepository, UserRepository};
use super::value_objects::{Email, Password, SessionToken};

/// Tunables injected from configuration
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
  pub session_ttl_seconds: i64,
  pub remember_me_ttl_seconds: i64,
  pub rate_limit_window_seconds: i64,
  pub max_failed_attempts: i64,
}

/// New account details, already validated at the edges
#[derive(Debug, Clone)]
pub struct Registration {
  pub name: String,
  pub email: Email,
  pub mobile: Option<String>,
  pub gender: Option<Gender>,
}

/// Authentication service implementing core business logic
pub struct AuthService {
  user_repo: Arc<dyn UserRepository>,
  session_repo: Arc<dyn SessionRepository>,
  attempt_repo: Arc<dyn LoginAttemptRepository>,
  password_hasher: Arc<dyn PasswordHasher>,
  config: AuthServiceConfig,
}

impl AuthService {
  pub fn new(
    user_repo: Arc<dyn UserRepository>,
    session_repo: Arc<dyn SessionRepository>,
    attempt_repo: Arc<dyn LoginAttemptRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    config: AuthServiceConfig,
  ) -> Self {
    Self {
      user_repo,
      session_repo,
      attempt_repo,
      password_hasher,
      config,
    }
  }

  /// Registers a new user and opens their first session.
  ///
  /// # Errors
  /// Returns `AuthError::EmailAlreadyExists` if the email is taken.
  pub async fn register(
    &self,
    registration: Registration,
    password: Password,
  ) -> Result<(User, Session, SessionToken), AuthError> {
    if self
      .user_repo
      .find_by_email(&registration.email)
      .await?
      .is_some()
    {
      return Err(AuthError::EmailAlreadyExists);
    }

    let password_hash = self.password_hasher.hash(&password).await?;

    let mut user = User::new(
      registration.name,
      registration.email.into_inner(),
      password_hash.into_inner(),
    );
    user.mobile = registration.mobile;
    user.gender = registration.gender;

    // Unique index still guards against a concurrent insert
    let created_user = match self.user_repo.create(user).await {
      Ok(user) => user,
      Err(AuthError::Repository(RepositoryError::DuplicateKey(msg))) => {
        if msg.contains("mobile") {
          return Err(AuthError::MobileAlreadyExists);
        }
        return Err(AuthError::EmailAlreadyExists);
      }
      Err(e) => return Err(e),
    };

    let (session, token) = self
      .open_session(created_user.id, Duration::seconds(self.config.session_ttl_seconds), None, None)
      .await?;

    Ok((created_user, session, token))
  }

  /// Authenticates a user and creates a new session.
  ///
  /// Failed attempts are recorded per email; once the window holds too many
  /// failures the login is rejected outright with `RateLimitExceeded`.
  pub async fn login(
    &self,
    email: Email,
    password: Password,
    ip_address: Option<IpAddr>,
    user_agent: Option<String>,
    remember_me: bool,
  ) -> Result<(User, Session, SessionToken), AuthError> {
    let failed_attempts = self
      .attempt_repo
      .count_recent_failures(email.as_str(), self.config.rate_limit_window_seconds)
      .await?;

    if failed_attempts >= self.config.max_failed_attempts {
      if let Some(ip) = ip_address {
        let attempt = LoginAttempt::failure(email.as_str().to_string(), ip);
        self.attempt_repo.create(attempt).await?;
      }
      return Err(AuthError::RateLimitExceeded);
    }

    let user = self
      .user_repo
      .find_by_email(&email)
      .await?
      .ok_or(AuthError::InvalidCredentials)?;

    let password_hash =
      super::value_objects::PasswordHash::from_hash(&user.password_hash)?;

    let is_valid = self.password_hasher.verify(&password, &password_hash).await?;

    if !is_valid {
      if let Some(ip) = ip_address {
        let attempt = LoginAttempt::failure(email.into_inner(), ip);
        self.attempt_repo.create(attempt).await?;
      }
      return Err(AuthError::InvalidCredentials);
    }

    if let Some(ip) = ip_address {
      let attempt = LoginAttempt::success(email.into_inner(), ip);
      self.attempt_repo.create(attempt).await?;
    }

    let duration = if remember_me {
      Duration::seconds(self.config.remember_me_ttl_seconds)
    } else {
      Duration::seconds(self.config.session_ttl_seconds)
    };

    let (session, token) = self
      .open_session(user.id, duration, ip_address, user_agent)
      .await?;

    Ok((user, session, token))
  }

  /// Invalidates the session behind the given token.
  pub async fn logout(&self, token: SessionToken) -> Result<(), AuthError> {
    let token_hash = token.hash();

    let session = self
      .session_repo
      .find_by_token_hash(token_hash.as_str())
      .await?
      .ok_or(AuthError::InvalidSession)?;

    self.session_repo.delete(session.id).await
  }

  /// Invalidates every session for a user, returning the count removed.
  pub async fn logout_all(&self, user_id: Uuid) -> Result<u64, AuthError> {
    self
      .user_repo
      .find_by_id(user_id)
      .await?
      .ok_or(AuthError::UserNotFound)?;

    self.session_repo.delete_all_for_user(user_id).await
  }

  /// Resolves a bearer token to its user. Expired sessions are deleted on
  /// sight and reported as invalid.
  pub async fn validate_session(&self, token: SessionToken) -> Result<User, AuthError> {
    let token_hash = token.hash();

    let session = self
      .session_repo
      .find_by_token_hash(token_hash.as_str())
      .await?
      .ok_or(AuthError::InvalidSession)?;

    if session.is_expired() {
      self.session_repo.delete(session.id).await?;
      return Err(AuthError::InvalidSession);
    }

    self
      .user_repo
      .find_by_id(session.user_id)
      .await?
      .ok_or(AuthError::UserNotFound)
  }

  async fn open_session(
    &self,
    user_id: Uuid,
    duration: Duration,
    ip_address: Option<IpAddr>,
    user_agent: Option<String>,
  ) -> Result<(Session, SessionToken), AuthError> {
    let token = SessionToken::generate();
    let session = Session::with_duration(
      user_id,
      token.hash().into_inner(),
      duration,
      ip_address,
      user_agent,
    );

    let created = self.session_repo.create(session).await?;

    Ok((created, token))
  }
}
