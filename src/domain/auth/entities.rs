use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use uuid::Uuid;

use super::errors::AuthError;

/// Gender as stored on the user profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
  Male,
  Female,
  Other,
}

impl Gender {
  pub fn as_str(&self) -> &'static str {
    match self {
      Gender::Male => "male",
      Gender::Female => "female",
      Gender::Other => "other",
    }
  }

  pub fn parse(s: &str) -> Result<Self, AuthError> {
    match s.to_lowercase().as_str() {
      "male" => Ok(Gender::Male),
      "female" => Ok(Gender::Female),
      "other" => Ok(Gender::Other),
      _ => Err(AuthError::Validation(
        super::errors::ValidationError::InvalidGender,
      )),
    }
  }
}

/// User account. `is_admin` grants global read access on the admin surface
/// and makes every project visible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub id: Uuid,
  pub name: String,
  /// Unique, lowercase
  pub email: String,
  /// Argon2id PHC string, never serialized to clients
  pub password_hash: String,
  /// Unique when present
  pub mobile: Option<String>,
  pub gender: Option<Gender>,
  /// Relative storage path; file handling itself lives outside this service
  pub avatar_path: Option<String>,
  pub is_admin: bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl User {
  pub fn new(name: String, email: String, password_hash: String) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      name,
      email,
      password_hash,
      mobile: None,
      gender: None,
      avatar_path: None,
      is_admin: false,
      created_at: now,
      updated_at: now,
    }
  }
}

/// Active bearer-token session. `token_hash` is the SHA-256 of the token
/// handed to the client; the raw token is never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
  pub id: Uuid,
  pub user_id: Uuid,
  pub token_hash: String,
  pub ip_address: Option<IpAddr>,
  pub user_agent: Option<String>,
  pub expires_at: DateTime<Utc>,
  pub created_at: DateTime<Utc>,
}

impl Session {
  pub fn new(
    user_id: Uuid,
    token_hash: String,
    expires_at: DateTime<Utc>,
    ip_address: Option<IpAddr>,
    user_agent: Option<String>,
  ) -> Self {
    Self {
      id: Uuid::new_v4(),
      user_id,
      token_hash,
      ip_address,
      user_agent,
      expires_at,
      created_at: Utc::now(),
    }
  }

  pub fn with_duration(
    user_id: Uuid,
    token_hash: String,
    duration: Duration,
    ip_address: Option<IpAddr>,
    user_agent: Option<String>,
  ) -> Self {
    Self::new(user_id, token_hash, Utc::now() + duration, ip_address, user_agent)
  }

  pub fn is_expired(&self) -> bool {
    self.expires_at <= Utc::now()
  }
}

/// One login attempt, recorded for rate limiting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginAttempt {
  pub id: Uuid,
  pub email: String,
  pub ip_address: IpAddr,
  pub success: bool,
  pub attempted_at: DateTime<Utc>,
}

impl LoginAttempt {
  pub fn success(email: String, ip_address: IpAddr) -> Self {
    Self::record(email, ip_address, true)
  }

  pub fn failure(email: String, ip_address: IpAddr) -> Self {
    Self::record(email, ip_address, false)
  }

  fn record(email: String, ip_address: IpAddr, success: bool) -> Self {
    Self {
      id: Uuid::new_v4(),
      email,
      ip_address,
      success,
      attempted_at: Utc::now(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn new_user_is_not_admin() {
    let user = User::new(
      "Test User".to_string(),
      "test@example.com".to_string(),
      "hash".to_string(),
    );

    assert!(!user.is_admin);
    assert!(user.mobile.is_none());
    assert_eq!(user.created_at, user.updated_at);
  }

  #[test]
  fn gender_parse_round_trips() {
    for g in [Gender::Male, Gender::Female, Gender::Other] {
      assert_eq!(Gender::parse(g.as_str()).unwrap(), g);
    }
    assert!(Gender::parse("unknown").is_err());
  }

  #[test]
  fn session_expiry() {
    let user_id = Uuid::new_v4();
    let live = Session::with_duration(user_id, "hash".into(), Duration::hours(1), None, None);
    let dead = Session::new(user_id, "hash".into(), Utc::now() - Duration::seconds(1), None, None);

    assert!(!live.is_expired());
    assert!(dead.is_expired());
  }

  #[test]
  fn login_attempt_flags() {
    let ip = "192.168.1.1".parse().unwrap();
    assert!(LoginAttempt::success("a@b.com".into(), ip).success);
    assert!(!LoginAttempt::failure("a@b.com".into(), ip).success);
  }
}
