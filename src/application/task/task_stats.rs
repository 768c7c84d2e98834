use std::sync::Arc;
use uuid::Uuid;

use crate::domain::task::{entities::TaskStats, TaskError, TaskService};

#[derive(Debug, Clone)]
pub struct TaskStatsCommand {
  pub user_id: Uuid,
}

pub struct TaskStatsUseCase {
  task_service: Arc<TaskService>,
}

impl TaskStatsUseCase {
  pub fn new(task_service: Arc<TaskService>) -> Self {
    Self { task_service }
  }

  pub async fn execute(&self, command: TaskStatsCommand) -> Result<TaskStats, TaskError> {
    self.task_service.stats(command.user_id).await
  }
}
