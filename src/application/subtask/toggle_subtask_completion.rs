use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::entities::User;
use crate::domain::task::{TaskError, TaskService};

use super::SubtaskDto;

#[derive(Debug, Clone)]
pub struct ToggleSubtaskCompletionCommand {
  pub subtask_id: Uuid,
}

pub struct ToggleSubtaskCompletionUseCase {
  task_service: Arc<TaskService>,
}

impl ToggleSubtaskCompletionUseCase {
  pub fn new(task_service: Arc<TaskService>) -> Self {
    Self { task_service }
  }

  pub async fn execute(
    &self,
    requester: &User,
    command: ToggleSubtaskCompletionCommand,
  ) -> Result<SubtaskDto, TaskError> {
    let subtask = self
      .task_service
      .toggle_subtask_completed(requester, command.subtask_id)
      .await?;
    Ok(subtask.into())
  }
}
