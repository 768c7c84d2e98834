use serde::Serialize;
use std::sync::Arc;

use crate::domain::admin::{AdminRepository, UserNode};
use crate::domain::auth::errors::RepositoryError;

#[derive(Debug, Serialize)]
pub struct GetOverviewTreeResponse {
  pub users: Vec<UserNode>,
}

/// Use case for the users → projects oversight tree
pub struct GetOverviewTreeUseCase {
  admin_repo: Arc<dyn AdminRepository>,
}

impl GetOverviewTreeUseCase {
  pub fn new(admin_repo: Arc<dyn AdminRepository>) -> Self {
    Self { admin_repo }
  }

  pub async fn execute(&self) -> Result<GetOverviewTreeResponse, RepositoryError> {
    let users = self.admin_repo.tree().await?;
    Ok(GetOverviewTreeResponse { users })
  }
}
