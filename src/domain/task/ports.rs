use async_trait::async_trait;
use uuid::Uuid;

use super::entities::{
  Page, PageResult, Subtask, SubtaskFilter, Task, TaskFilter, TaskStats,
};
use super::errors::TaskError;

/// Repository interface for task persistence.
///
/// Listing queries operate over the user's visible set: tasks they
/// created plus tasks in projects they own or belong to.
#[async_trait]
pub trait TaskRepository: Send + Sync {
  async fn create(&self, task: Task) -> Result<Task, TaskError>;
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, TaskError>;
  async fn list_visible(
    &self,
    user_id: Uuid,
    filter: &TaskFilter,
    page: Page,
  ) -> Result<PageResult<Task>, TaskError>;
  /// Incomplete visible tasks due within the next `hours`, soonest first.
  async fn due_soon(
    &self,
    user_id: Uuid,
    hours: i64,
    page: Page,
  ) -> Result<PageResult<Task>, TaskError>;
  async fn stats(&self, user_id: Uuid) -> Result<TaskStats, TaskError>;
  async fn update(&self, task: Task) -> Result<Task, TaskError>;
  /// Deletes the task; subtasks go with it.
  async fn delete(&self, id: Uuid) -> Result<(), TaskError>;
}

/// Repository interface for subtask persistence
#[async_trait]
pub trait SubtaskRepository: Send + Sync {
  async fn create(&self, subtask: Subtask) -> Result<Subtask, TaskError>;
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Subtask>, TaskError>;
  /// Subtasks of a task, newest first.
  async fn list_for_task(
    &self,
    task_id: Uuid,
    filter: &SubtaskFilter,
    page: Page,
  ) -> Result<PageResult<Subtask>, TaskError>;
  async fn update(&self, subtask: Subtask) -> Result<Subtask, TaskError>;
  async fn delete(&self, id: Uuid) -> Result<(), TaskError>;
}
