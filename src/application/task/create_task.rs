use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::entities::User;
use crate::domain::task::{services::NewTask, Priority, TaskError, TaskService};

use super::TaskDto;

#[derive(Debug, Clone)]
pub struct CreateTaskCommand {
  pub title: String,
  pub description: Option<String>,
  /// Label (`low`/`medium`/`high`) or numeric form; defaults to medium
  pub priority: Option<String>,
  pub category: Option<String>,
  pub due_date: Option<DateTime<Utc>>,
  pub remind_at: Option<DateTime<Utc>>,
  pub project_id: Option<Uuid>,
}

pub struct CreateTaskUseCase {
  task_service: Arc<TaskService>,
}

impl CreateTaskUseCase {
  pub fn new(task_service: Arc<TaskService>) -> Self {
    Self { task_service }
  }

  /// # Errors
  /// Returns `TaskError::Forbidden` when `project_id` names a project the
  /// user neither owns nor belongs to.
  pub async fn execute(
    &self,
    requester: &User,
    command: CreateTaskCommand,
  ) -> Result<TaskDto, TaskError> {
    let priority = command.priority.map(|p| Priority::parse(&p)).transpose()?;

    let input = NewTask {
      title: command.title,
      description: command.description,
      priority,
      category: command.category,
      due_date: command.due_date,
      remind_at: command.remind_at,
      project_id: command.project_id,
    };

    let task = self.task_service.create_task(requester, input).await?;
    Ok(task.into())
  }
}
