use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::entities::User;
use crate::domain::task::{TaskError, TaskService};

#[derive(Debug, Clone)]
pub struct DeleteSubtaskCommand {
  pub subtask_id: Uuid,
}

pub struct DeleteSubtaskUseCase {
  task_service: Arc<TaskService>,
}

impl DeleteSubtaskUseCase {
  pub fn new(task_service: Arc<TaskService>) -> Self {
    Self { task_service }
  }

  pub async fn execute(
    &self,
    requester: &User,
    command: DeleteSubtaskCommand,
  ) -> Result<(), TaskError> {
    self
      .task_service
      .delete_subtask(requester, command.subtask_id)
      .await
  }
}
