use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::entities::User;
use crate::domain::task::{entities::SubtaskUpdate, Priority, TaskError, TaskService};

use super::SubtaskDto;

/// Command for updating a subtask; double options mark "clear" vs "keep"
#[derive(Debug, Clone, Default)]
pub struct UpdateSubtaskCommand {
  pub subtask_id: Uuid,
  pub title: Option<String>,
  pub description: Option<Option<String>>,
  pub is_completed: Option<bool>,
  pub priority: Option<String>,
  pub category: Option<Option<String>>,
  pub due_date: Option<Option<NaiveDate>>,
}

pub struct UpdateSubtaskUseCase {
  task_service: Arc<TaskService>,
}

impl UpdateSubtaskUseCase {
  pub fn new(task_service: Arc<TaskService>) -> Self {
    Self { task_service }
  }

  pub async fn execute(
    &self,
    requester: &User,
    command: UpdateSubtaskCommand,
  ) -> Result<SubtaskDto, TaskError> {
    let priority = command.priority.map(|p| Priority::parse(&p)).transpose()?;

    let update = SubtaskUpdate {
      title: command.title,
      description: command.description,
      is_completed: command.is_completed,
      priority,
      category: command.category,
      due_date: command.due_date,
    };

    let subtask = self
      .task_service
      .update_subtask(requester, command.subtask_id, update)
      .await?;
    Ok(subtask.into())
  }
}
