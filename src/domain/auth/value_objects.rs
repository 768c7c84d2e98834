use argon2::{Argon2, PasswordHash as Argon2PasswordHash, PasswordVerifier};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use validator::ValidateEmail;

#[derive(Debug, Error)]
pub enum ValueObjectError {
  #[error("Invalid email format: {0}")]
  InvalidEmail(String),

  #[error("Password is too short (minimum 8 characters)")]
  PasswordTooShort,

  #[error("Password is too long (maximum 128 characters)")]
  PasswordTooLong,

  #[error("Invalid password hash format")]
  InvalidPasswordHash,

  #[error("Password hashing failed: {0}")]
  HashingFailed(String),

  #[error("Password verification failed: {0}")]
  VerificationFailed(String),

  #[error("Invalid token format")]
  InvalidToken,
}

/// Validated, lowercase-normalized email address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
  pub fn new(email: impl Into<String>) -> Result<Self, ValueObjectError> {
    let email = email.into();

    if !email.validate_email() {
      return Err(ValueObjectError::InvalidEmail(email));
    }

    Ok(Self(email.to_lowercase()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for Email {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl AsRef<str> for Email {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

/// Plain-text password. Never stored, never printed.
#[derive(Clone)]
pub struct Password(String);

impl Password {
  const MIN_LENGTH: usize = 8;
  const MAX_LENGTH: usize = 128;

  pub fn new(password: impl Into<String>) -> Result<Self, ValueObjectError> {
    let password = password.into();

    if password.len() < Self::MIN_LENGTH {
      return Err(ValueObjectError::PasswordTooShort);
    }

    if password.len() > Self::MAX_LENGTH {
      return Err(ValueObjectError::PasswordTooLong);
    }

    Ok(Self(password))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Debug for Password {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Password(***)")
  }
}

impl fmt::Display for Password {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("***")
  }
}

/// Argon2id password hash in PHC string format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
  /// Wraps an existing hash string, rejecting anything that does not parse
  /// as a PHC-format Argon2 hash.
  pub fn from_hash(hash: impl Into<String>) -> Result<Self, ValueObjectError> {
    let hash = hash.into();

    Argon2PasswordHash::new(&hash).map_err(|_| ValueObjectError::InvalidPasswordHash)?;

    Ok(Self(hash))
  }

  pub fn verify(&self, password: &Password) -> Result<bool, ValueObjectError> {
    let parsed_hash = Argon2PasswordHash::new(&self.0)
      .map_err(|e| ValueObjectError::VerificationFailed(e.to_string()))?;

    Ok(
      Argon2::default()
        .verify_password(password.as_str().as_bytes(), &parsed_hash)
        .is_ok(),
    )
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

/// Opaque bearer token handed to clients. 32 random bytes, hex-encoded.
/// Only the SHA-256 hash is persisted.
#[derive(Clone)]
pub struct SessionToken(String);

impl SessionToken {
  const TOKEN_LENGTH: usize = 32;

  pub fn generate() -> Self {
    use rand::RngCore;

    let mut bytes = [0u8; Self::TOKEN_LENGTH];
    rand::rngs::OsRng.fill_bytes(&mut bytes);

    Self(hex::encode(bytes))
  }

  pub fn from_string(token: impl Into<String>) -> Result<Self, ValueObjectError> {
    let token = token.into();

    if token.len() != Self::TOKEN_LENGTH * 2 {
      return Err(ValueObjectError::InvalidToken);
    }

    if !token.chars().all(|c| c.is_ascii_hexdigit()) {
      return Err(ValueObjectError::InvalidToken);
    }

    Ok(Self(token))
  }

  /// SHA-256 digest of the token, used as the storage key.
  pub fn hash(&self) -> TokenHash {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(self.0.as_bytes());

    TokenHash(hex::encode(hasher.finalize()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Debug for SessionToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("SessionToken(***)")
  }
}

/// SHA-256 hash of a session token (64 hex characters)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHash(String);

impl TokenHash {
  pub fn from_hash(hash: impl Into<String>) -> Result<Self, ValueObjectError> {
    let hash = hash.into();

    if hash.len() != 64 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
      return Err(ValueObjectError::InvalidToken);
    }

    Ok(Self(hash))
  }

  pub fn verify(&self, token: &SessionToken) -> bool {
    self.0 == token.hash().0
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for TokenHash {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn email_normalizes_to_lowercase() {
    let email = Email::new("Alice@Example.COM").unwrap();
    assert_eq!(email.as_str(), "alice@example.com");
  }

  #[test]
  fn email_rejects_invalid_format() {
    assert!(Email::new("not-an-email").is_err());
    assert!(Email::new("").is_err());
  }

  #[test]
  fn password_enforces_length_bounds() {
    assert!(Password::new("short").is_err());
    assert!(Password::new("long enough password").is_ok());
    assert!(Password::new("x".repeat(129)).is_err());
  }

  #[test]
  fn password_debug_does_not_leak() {
    let password = Password::new("super secret password").unwrap();
    assert_eq!(format!("{:?}", password), "Password(***)");
  }

  #[test]
  fn session_token_is_hex_and_unique() {
    let a = SessionToken::generate();
    let b = SessionToken::generate();

    assert_eq!(a.as_str().len(), 64);
    assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(a.as_str(), b.as_str());
  }

  #[test]
  fn session_token_round_trips_through_string() {
    let token = SessionToken::generate();
    let parsed = SessionToken::from_string(token.as_str()).unwrap();
    assert_eq!(parsed.as_str(), token.as_str());
  }

  #[test]
  fn session_token_rejects_bad_input() {
    assert!(SessionToken::from_string("deadbeef").is_err());
    assert!(SessionToken::from_string("z".repeat(64)).is_err());
  }

  #[test]
  fn token_hash_verifies_matching_token() {
    let token = SessionToken::generate();
    let hash = token.hash();

    assert!(hash.verify(&token));
    assert!(!hash.verify(&SessionToken::generate()));
  }

  #[test]
  fn token_hash_validates_shape() {
    assert!(TokenHash::from_hash("ab".repeat(32)).is_ok());
    assert!(TokenHash::from_hash("too-short").is_err());
  }
}
