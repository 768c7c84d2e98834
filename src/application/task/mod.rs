pub mod create_task;
pub mod delete_task;
pub mod due_soon;
pub mod get_task_details;
pub mod list_tasks;
pub mod task_stats;
pub mod toggle_task_completion;
pub mod update_task;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::task::entities::Task;

pub use create_task::{CreateTaskCommand, CreateTaskUseCase};
pub use delete_task::{DeleteTaskCommand, DeleteTaskUseCase};
pub use due_soon::{DueSoonCommand, DueSoonUseCase};
pub use get_task_details::{GetTaskDetailsCommand, GetTaskDetailsResponse, GetTaskDetailsUseCase};
pub use list_tasks::{ListTasksCommand, ListTasksUseCase};
pub use task_stats::{TaskStatsCommand, TaskStatsUseCase};
pub use toggle_task_completion::{ToggleTaskCompletionCommand, ToggleTaskCompletionUseCase};
pub use update_task::{UpdateTaskCommand, UpdateTaskUseCase};

/// Serialized task shape shared by every task use case
#[derive(Debug, Clone, Serialize)]
pub struct TaskDto {
  pub id: Uuid,
  pub creator_id: Uuid,
  pub project_id: Option<Uuid>,
  pub title: String,
  pub description: Option<String>,
  pub is_completed: bool,
  pub completed_at: Option<DateTime<Utc>>,
  pub priority: String,
  pub category: Option<String>,
  pub due_date: Option<DateTime<Utc>>,
  pub remind_at: Option<DateTime<Utc>>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<Task> for TaskDto {
  fn from(task: Task) -> Self {
    Self {
      id: task.id,
      creator_id: task.creator_id,
      project_id: task.project_id,
      title: task.title,
      description: task.description,
      is_completed: task.is_completed,
      completed_at: task.completed_at,
      priority: task.priority.as_str().to_string(),
      category: task.category,
      due_date: task.due_date,
      remind_at: task.remind_at,
      created_at: task.created_at,
      updated_at: task.updated_at,
    }
  }
}
