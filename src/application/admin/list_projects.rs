use std::sync::Arc;
use uuid::Uuid;

use crate::domain::admin::{AdminProjectFilter, AdminRepository, ProjectOverview};
use crate::domain::auth::errors::RepositoryError;
use crate::domain::task::entities::{Page, PageResult};

#[derive(Debug, Clone, Default)]
pub struct ListProjectsCommand {
  pub q: Option<String>,
  pub owner_id: Option<Uuid>,
  pub page: Option<u32>,
  pub per_page: Option<u32>,
}

pub struct ListProjectsUseCase {
  admin_repo: Arc<dyn AdminRepository>,
}

impl ListProjectsUseCase {
  const DEFAULT_PER_PAGE: u32 = 15;

  pub fn new(admin_repo: Arc<dyn AdminRepository>) -> Self {
    Self { admin_repo }
  }

  pub async fn execute(
    &self,
    command: ListProjectsCommand,
  ) -> Result<PageResult<ProjectOverview>, RepositoryError> {
    let filter = AdminProjectFilter {
      q: command.q,
      owner_id: command.owner_id,
    };
    let page = Page::new(command.page, command.per_page, Self::DEFAULT_PER_PAGE);
    self.admin_repo.list_projects(&filter, page).await
  }

  /// Unpaginated listing of one user's owned projects.
  pub async fn for_user(&self, owner_id: Uuid) -> Result<Vec<ProjectOverview>, RepositoryError> {
    self.admin_repo.projects_for_user(owner_id).await
  }
}
