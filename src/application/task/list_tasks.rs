use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::task::{
  entities::{Page, PageResult, TaskFilter},
  Priority, TaskError, TaskService,
};

use super::TaskDto;

/// Requested listing window; unknown fields were already rejected by the
/// HTTP layer, out-of-range pagination is clamped here
#[derive(Debug, Clone, Default)]
pub struct ListTasksCommand {
  pub user_id: Uuid,
  pub q: Option<String>,
  pub is_completed: Option<bool>,
  pub priority: Option<String>,
  pub category: Option<String>,
  pub project_id: Option<Uuid>,
  pub due_date_from: Option<NaiveDate>,
  pub due_date_to: Option<NaiveDate>,
  pub page: Option<u32>,
  pub per_page: Option<u32>,
}

pub struct ListTasksUseCase {
  task_service: Arc<TaskService>,
}

impl ListTasksUseCase {
  const DEFAULT_PER_PAGE: u32 = 10;

  pub fn new(task_service: Arc<TaskService>) -> Self {
    Self { task_service }
  }

  pub async fn execute(
    &self,
    command: ListTasksCommand,
  ) -> Result<PageResult<TaskDto>, TaskError> {
    let priority = command.priority.map(|p| Priority::parse(&p)).transpose()?;

    let filter = TaskFilter {
      q: command.q,
      is_completed: command.is_completed,
      priority,
      category: command.category,
      project_id: command.project_id,
      due_from: command.due_date_from,
      due_to: command.due_date_to,
    };
    let page = Page::new(command.page, command.per_page, Self::DEFAULT_PER_PAGE);

    let result = self
      .task_service
      .list_tasks(command.user_id, &filter, page)
      .await?;

    Ok(result.map(TaskDto::from))
  }
}
