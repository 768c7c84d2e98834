use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::entities::User;
use crate::domain::task::{TaskError, TaskService};

#[derive(Debug, Clone)]
pub struct DeleteTaskCommand {
  pub task_id: Uuid,
}

pub struct DeleteTaskUseCase {
  task_service: Arc<TaskService>,
}

impl DeleteTaskUseCase {
  pub fn new(task_service: Arc<TaskService>) -> Self {
    Self { task_service }
  }

  /// Subtasks are removed along with the task.
  pub async fn execute(
    &self,
    requester: &User,
    command: DeleteTaskCommand,
  ) -> Result<(), TaskError> {
    self.task_service.delete_task(requester, command.task_id).await
  }
}
