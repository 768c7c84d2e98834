use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::entities::User;
use crate::domain::task::{
  entities::{Page, PageResult, SubtaskFilter},
  Priority, TaskError, TaskService,
};

use super::SubtaskDto;

#[derive(Debug, Clone, Default)]
pub struct ListSubtasksCommand {
  pub task_id: Uuid,
  pub q: Option<String>,
  pub is_completed: Option<bool>,
  pub priority: Option<String>,
  pub due_date_from: Option<NaiveDate>,
  pub due_date_to: Option<NaiveDate>,
  pub page: Option<u32>,
  pub per_page: Option<u32>,
}

pub struct ListSubtasksUseCase {
  task_service: Arc<TaskService>,
}

impl ListSubtasksUseCase {
  const DEFAULT_PER_PAGE: u32 = 10;

  pub fn new(task_service: Arc<TaskService>) -> Self {
    Self { task_service }
  }

  pub async fn execute(
    &self,
    requester: &User,
    command: ListSubtasksCommand,
  ) -> Result<PageResult<SubtaskDto>, TaskError> {
    let priority = command.priority.map(|p| Priority::parse(&p)).transpose()?;

    let filter = SubtaskFilter {
      q: command.q,
      is_completed: command.is_completed,
      priority,
      due_from: command.due_date_from,
      due_to: command.due_date_to,
    };
    let page = Page::new(command.page, command.per_page, Self::DEFAULT_PER_PAGE);

    let result = self
      .task_service
      .list_subtasks(requester, command.task_id, &filter, page)
      .await?;

    Ok(result.map(SubtaskDto::from))
  }
}
