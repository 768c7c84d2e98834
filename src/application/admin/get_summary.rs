use std::sync::Arc;

use crate::domain::admin::{AdminRepository, AdminSummary};
use crate::domain::auth::errors::RepositoryError;

/// Use case for the admin dashboard numbers
pub struct GetSummaryUseCase {
  admin_repo: Arc<dyn AdminRepository>,
}

impl GetSummaryUseCase {
  pub fn new(admin_repo: Arc<dyn AdminRepository>) -> Self {
    Self { admin_repo }
  }

  pub async fn execute(&self) -> Result<AdminSummary, RepositoryError> {
    self.admin_repo.summary().await
  }
}
