use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::entities::User;
use crate::domain::task::{entities::TaskUpdate, Priority, TaskError, TaskService};

use super::TaskDto;

/// Command for updating a task. Double options separate "leave alone"
/// (outer None) from "clear the field" (inner None).
#[derive(Debug, Clone, Default)]
pub struct UpdateTaskCommand {
  pub task_id: Uuid,
  pub title: Option<String>,
  pub description: Option<Option<String>>,
  pub is_completed: Option<bool>,
  pub priority: Option<String>,
  pub category: Option<Option<String>>,
  pub due_date: Option<Option<DateTime<Utc>>>,
  pub remind_at: Option<Option<DateTime<Utc>>>,
  pub project_id: Option<Option<Uuid>>,
}

pub struct UpdateTaskUseCase {
  task_service: Arc<TaskService>,
}

impl UpdateTaskUseCase {
  pub fn new(task_service: Arc<TaskService>) -> Self {
    Self { task_service }
  }

  pub async fn execute(
    &self,
    requester: &User,
    command: UpdateTaskCommand,
  ) -> Result<TaskDto, TaskError> {
    let priority = command.priority.map(|p| Priority::parse(&p)).transpose()?;

    let update = TaskUpdate {
      title: command.title,
      description: command.description,
      is_completed: command.is_completed,
      priority,
      category: command.category,
      due_date: command.due_date,
      remind_at: command.remind_at,
      project_id: command.project_id,
    };

    let task = self
      .task_service
      .update_task(requester, command.task_id, update)
      .await?;

    Ok(task.into())
  }
}
