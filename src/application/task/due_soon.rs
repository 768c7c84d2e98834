use std::sync::Arc;
use uuid::Uuid;

use crate::domain::task::{
  entities::{Page, PageResult},
  TaskError, TaskService,
};

use super::TaskDto;

#[derive(Debug, Clone)]
pub struct DueSoonCommand {
  pub user_id: Uuid,
  /// Look-ahead window; defaults to 24 hours
  pub hours: Option<i64>,
  pub page: Option<u32>,
  pub per_page: Option<u32>,
}

pub struct DueSoonUseCase {
  task_service: Arc<TaskService>,
}

impl DueSoonUseCase {
  const DEFAULT_HOURS: i64 = 24;
  const DEFAULT_PER_PAGE: u32 = 50;

  pub fn new(task_service: Arc<TaskService>) -> Self {
    Self { task_service }
  }

  pub async fn execute(&self, command: DueSoonCommand) -> Result<PageResult<TaskDto>, TaskError> {
    let hours = command.hours.unwrap_or(Self::DEFAULT_HOURS);
    let page = Page::new(command.page, command.per_page, Self::DEFAULT_PER_PAGE);

    let result = self.task_service.due_soon(command.user_id, hours, page).await?;
    Ok(result.map(TaskDto::from))
  }
}
