use async_trait::async_trait;
use uuid::Uuid;

use super::entities::{LoginAttempt, Session, User};
use super::errors::AuthError;
use super::value_objects::{Email, Password, PasswordHash};

/// Repository trait for user persistence operations
#[async_trait]
pub trait UserRepository: Send + Sync {
  async fn create(&self, user: User) -> Result<User, AuthError>;

  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError>;

  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError>;

  async fn update(&self, user: User) -> Result<User, AuthError>;
}

/// Repository trait for session persistence operations
#[async_trait]
pub trait SessionRepository: Send + Sync {
  async fn create(&self, session: Session) -> Result<Session, AuthError>;

  async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, AuthError>;

  async fn delete(&self, session_id: Uuid) -> Result<(), AuthError>;

  /// Deletes every session for a user, returning how many were removed
  async fn delete_all_for_user(&self, user_id: Uuid) -> Result<u64, AuthError>;
}

/// Repository trait for login attempt tracking
#[async_trait]
pub trait LoginAttemptRepository: Send + Sync {
  async fn create(&self, attempt: LoginAttempt) -> Result<LoginAttempt, AuthError>;

  /// Counts failed attempts for an email within the trailing window
  async fn count_recent_failures(&self, email: &str, window_seconds: i64)
  -> Result<i64, AuthError>;
}

/// Service trait for password hashing
#[async_trait]
pub trait PasswordHasher: Send + Sync {
  async fn hash(&self, password: &Password) -> Result<PasswordHash, AuthError>;

  async fn verify(
    &self,
    password: &Password,
    hashed_password: &PasswordHash,
  ) -> Result<bool, AuthError>;
}
