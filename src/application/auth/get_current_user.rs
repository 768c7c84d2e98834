use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::UserRepository;

/// Command for fetching the authenticated user's profile
#[derive(Debug, Clone)]
pub struct GetCurrentUserCommand {
  pub user_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct GetCurrentUserResponse {
  pub user_id: Uuid,
  pub name: String,
  pub email: String,
  pub mobile: Option<String>,
  pub gender: Option<String>,
  pub avatar_path: Option<String>,
  pub is_admin: bool,
  pub created_at: DateTime<Utc>,
}

pub struct GetCurrentUserUseCase {
  user_repo: Arc<dyn UserRepository>,
}

impl GetCurrentUserUseCase {
  pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
    Self { user_repo }
  }

  pub async fn execute(
    &self,
    command: GetCurrentUserCommand,
  ) -> Result<GetCurrentUserResponse, AuthError> {
    let user = self
      .user_repo
      .find_by_id(command.user_id)
      .await?
      .ok_or(AuthError::UserNotFound)?;

    Ok(GetCurrentUserResponse {
      user_id: user.id,
      name: user.name,
      email: user.email,
      mobile: user.mobile,
      gender: user.gender.map(|g| g.as_str().to_string()),
      avatar_path: user.avatar_path,
      is_admin: user.is_admin,
      created_at: user.created_at,
    })
  }
}
