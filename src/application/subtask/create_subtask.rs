use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::entities::User;
use crate::domain::task::{services::NewSubtask, Priority, TaskError, TaskService};

use super::SubtaskDto;

#[derive(Debug, Clone)]
pub struct CreateSubtaskCommand {
  pub task_id: Uuid,
  pub title: String,
  pub description: Option<String>,
  pub priority: Option<String>,
  pub category: Option<String>,
  pub due_date: Option<NaiveDate>,
}

pub struct CreateSubtaskUseCase {
  task_service: Arc<TaskService>,
}

impl CreateSubtaskUseCase {
  pub fn new(task_service: Arc<TaskService>) -> Self {
    Self { task_service }
  }

  /// Only the parent task's creator may add subtasks.
  pub async fn execute(
    &self,
    requester: &User,
    command: CreateSubtaskCommand,
  ) -> Result<SubtaskDto, TaskError> {
    let priority = command.priority.map(|p| Priority::parse(&p)).transpose()?;

    let input = NewSubtask {
      title: command.title,
      description: command.description,
      priority,
      category: command.category,
      due_date: command.due_date,
    };

    let subtask = self
      .task_service
      .create_subtask(requester, command.task_id, input)
      .await?;
    Ok(subtask.into())
  }
}
