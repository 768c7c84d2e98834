use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::admin::{AdminRepository, AdminTaskFilter, TaskOverview};
use crate::domain::auth::errors::RepositoryError;
use crate::domain::task::entities::{Page, PageResult};

#[derive(Debug, Clone, Default)]
pub struct ListTasksCommand {
  pub q: Option<String>,
  pub creator_id: Option<Uuid>,
  pub project_id: Option<Uuid>,
  pub is_completed: Option<bool>,
  pub due_date_from: Option<NaiveDate>,
  pub due_date_to: Option<NaiveDate>,
  pub page: Option<u32>,
  pub per_page: Option<u32>,
}

/// Cross-tenant task listing with the standard sort
pub struct ListTasksUseCase {
  admin_repo: Arc<dyn AdminRepository>,
}

impl ListTasksUseCase {
  const DEFAULT_PER_PAGE: u32 = 15;

  pub fn new(admin_repo: Arc<dyn AdminRepository>) -> Self {
    Self { admin_repo }
  }

  pub async fn execute(
    &self,
    command: ListTasksCommand,
  ) -> Result<PageResult<TaskOverview>, RepositoryError> {
    let filter = AdminTaskFilter {
      q: command.q,
      creator_id: command.creator_id,
      project_id: command.project_id,
      is_completed: command.is_completed,
      due_from: command.due_date_from,
      due_to: command.due_date_to,
    };
    let page = Page::new(command.page, command.per_page, Self::DEFAULT_PER_PAGE);
    self.admin_repo.list_tasks(&filter, page).await
  }
}
