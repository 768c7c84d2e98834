use std::sync::Arc;

use crate::domain::admin::{AdminRepository, UserOverview};
use crate::domain::auth::errors::RepositoryError;
use crate::domain::task::entities::{Page, PageResult};

#[derive(Debug, Clone, Default)]
pub struct ListUsersCommand {
  /// Substring match over name, email and mobile
  pub q: Option<String>,
  pub page: Option<u32>,
  pub per_page: Option<u32>,
}

pub struct ListUsersUseCase {
  admin_repo: Arc<dyn AdminRepository>,
}

impl ListUsersUseCase {
  const DEFAULT_PER_PAGE: u32 = 15;

  pub fn new(admin_repo: Arc<dyn AdminRepository>) -> Self {
    Self { admin_repo }
  }

  pub async fn execute(
    &self,
    command: ListUsersCommand,
  ) -> Result<PageResult<UserOverview>, RepositoryError> {
    let page = Page::new(command.page, command.per_page, Self::DEFAULT_PER_PAGE);
    self.admin_repo.list_users(command.q.as_deref(), page).await
  }
}
