use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::entities::User;
use crate::domain::task::{TaskError, TaskService};

use super::SubtaskDto;

#[derive(Debug, Clone)]
pub struct GetSubtaskCommand {
  pub subtask_id: Uuid,
}

pub struct GetSubtaskUseCase {
  task_service: Arc<TaskService>,
}

impl GetSubtaskUseCase {
  pub fn new(task_service: Arc<TaskService>) -> Self {
    Self { task_service }
  }

  pub async fn execute(
    &self,
    requester: &User,
    command: GetSubtaskCommand,
  ) -> Result<SubtaskDto, TaskError> {
    let subtask = self
      .task_service
      .get_subtask(requester, command.subtask_id)
      .await?;
    Ok(subtask.into())
  }
}
