use std::sync::Arc;
use uuid::Uuid;

use crate::application::task::TaskDto;
use crate::domain::task::{ports::TaskRepository, TaskError};

/// Moderation actions on any task, bypassing the visibility scope.
/// Callers must sit behind the admin gate.
pub struct ModerateTaskUseCase {
  task_repo: Arc<dyn TaskRepository>,
}

impl ModerateTaskUseCase {
  pub fn new(task_repo: Arc<dyn TaskRepository>) -> Self {
    Self { task_repo }
  }

  pub async fn toggle_completed(&self, task_id: Uuid) -> Result<TaskDto, TaskError> {
    let mut task = self
      .task_repo
      .find_by_id(task_id)
      .await?
      .ok_or(TaskError::NotFound)?;

    task.toggle_completed();
    let task = self.task_repo.update(task).await?;
    Ok(task.into())
  }

  pub async fn delete(&self, task_id: Uuid) -> Result<(), TaskError> {
    self
      .task_repo
      .find_by_id(task_id)
      .await?
      .ok_or(TaskError::NotFound)?;

    self.task_repo.delete(task_id).await
  }
}
