use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::entities::User;
use crate::domain::task::{TaskError, TaskService};

use super::TaskDto;

#[derive(Debug, Clone)]
pub struct ToggleTaskCompletionCommand {
  pub task_id: Uuid,
}

pub struct ToggleTaskCompletionUseCase {
  task_service: Arc<TaskService>,
}

impl ToggleTaskCompletionUseCase {
  pub fn new(task_service: Arc<TaskService>) -> Self {
    Self { task_service }
  }

  pub async fn execute(
    &self,
    requester: &User,
    command: ToggleTaskCompletionCommand,
  ) -> Result<TaskDto, TaskError> {
    let task = self
      .task_service
      .toggle_completed(requester, command.task_id)
      .await?;
    Ok(task.into())
  }
}
