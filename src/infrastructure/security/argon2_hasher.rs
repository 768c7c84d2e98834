use argon2::password_hash::SaltString;
use argon2::{
  Algorithm, Argon2, Params, Version,
  password_hash::{
    PasswordHash as Argon2PasswordHash, PasswordHasher as Argon2PasswordHasherTrait,
    PasswordVerifier,
  },
};
use async_trait::async_trait;

use crate::domain::auth::errors::{AuthError, HashError};
use crate::domain::auth::ports::PasswordHasher;
use crate::domain::auth::value_objects::{Password, PasswordHash};

/// Argon2id password hasher
///
/// Parameters follow the OWASP recommendation: 19 MiB memory, 2 iterations,
/// single lane.
pub struct Argon2PasswordHasher {
  argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
  pub fn new() -> Result<Self, AuthError> {
    let memory_cost = 19_456;
    let time_cost = 2;
    let parallelism = 1;
    let output_len = Some(32);

    let params = Params::new(memory_cost, time_cost, parallelism, output_len).map_err(|e| {
      AuthError::Hash(HashError::HashingFailed(format!(
        "Failed to create Argon2 params: {}",
        e
      )))
    })?;

    Ok(Self {
      argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
    })
  }
}

impl Default for Argon2PasswordHasher {
  fn default() -> Self {
    Self::new().expect("Failed to create default Argon2PasswordHasher")
  }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
  async fn hash(&self, password: &Password) -> Result<PasswordHash, AuthError> {
    let salt = SaltString::generate(&mut rand::rngs::OsRng);

    let hash = self
      .argon2
      .hash_password(password.as_str().as_bytes(), &salt)
      .map_err(|e| {
        AuthError::Hash(HashError::HashingFailed(format!(
          "Failed to hash password: {}",
          e
        )))
      })?;

    PasswordHash::from_hash(hash.to_string()).map_err(|e| {
      AuthError::Hash(HashError::HashingFailed(format!(
        "Invalid hash format: {}",
        e
      )))
    })
  }

  /// Verification uses argon2's built-in constant-time comparison.
  async fn verify(
    &self,
    password: &Password,
    hashed_password: &PasswordHash,
  ) -> Result<bool, AuthError> {
    let parsed_hash = Argon2PasswordHash::new(hashed_password.as_str()).map_err(|e| {
      AuthError::Hash(HashError::VerificationFailed(format!(
        "Invalid hash format: {}",
        e
      )))
    })?;

    match self
      .argon2
      .verify_password(password.as_str().as_bytes(), &parsed_hash)
    {
      Ok(_) => Ok(true),
      Err(argon2::password_hash::Error::Password) => Ok(false),
      Err(e) => Err(AuthError::Hash(HashError::VerificationFailed(format!(
        "Password verification failed: {}",
        e
      )))),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_hash_produces_argon2id_phc_string() {
    let hasher = Argon2PasswordHasher::new().unwrap();
    let password = Password::new("test_password_123").unwrap();

    let hash = hasher.hash(&password).await.unwrap();
    assert!(hash.as_str().starts_with("$argon2id$"));
  }

  #[tokio::test]
  async fn test_verify_correct_password() {
    let hasher = Argon2PasswordHasher::new().unwrap();
    let password = Password::new("test_password_123").unwrap();

    let hash = hasher.hash(&password).await.unwrap();
    assert!(hasher.verify(&password, &hash).await.unwrap());
  }

  #[tokio::test]
  async fn test_verify_incorrect_password() {
    let hasher = Argon2PasswordHasher::new().unwrap();
    let password = Password::new("test_password_123").unwrap();
    let other = Password::new("completely_different").unwrap();

    let hash = hasher.hash(&password).await.unwrap();
    assert!(!hasher.verify(&other, &hash).await.unwrap());
  }

  #[tokio::test]
  async fn test_same_password_hashes_differently() {
    let hasher = Argon2PasswordHasher::new().unwrap();
    let password = Password::new("test_password_123").unwrap();

    let a = hasher.hash(&password).await.unwrap();
    let b = hasher.hash(&password).await.unwrap();
    assert_ne!(a.as_str(), b.as_str());
  }
}
