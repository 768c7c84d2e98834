pub mod create_subtask;
pub mod delete_subtask;
pub mod get_subtask;
pub mod list_subtasks;
pub mod toggle_subtask_completion;
pub mod update_subtask;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::task::entities::Subtask;

pub use create_subtask::{CreateSubtaskCommand, CreateSubtaskUseCase};
pub use delete_subtask::{DeleteSubtaskCommand, DeleteSubtaskUseCase};
pub use get_subtask::{GetSubtaskCommand, GetSubtaskUseCase};
pub use list_subtasks::{ListSubtasksCommand, ListSubtasksUseCase};
pub use toggle_subtask_completion::{
  ToggleSubtaskCompletionCommand, ToggleSubtaskCompletionUseCase,
};
pub use update_subtask::{UpdateSubtaskCommand, UpdateSubtaskUseCase};

/// Serialized subtask shape shared by the subtask use cases
#[derive(Debug, Clone, Serialize)]
pub struct SubtaskDto {
  pub id: Uuid,
  pub task_id: Uuid,
  pub title: String,
  pub description: Option<String>,
  pub is_completed: bool,
  pub completed_at: Option<DateTime<Utc>>,
  pub priority: String,
  pub category: Option<String>,
  pub due_date: Option<NaiveDate>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<Subtask> for SubtaskDto {
  fn from(subtask: Subtask) -> Self {
    Self {
      id: subtask.id,
      task_id: subtask.task_id,
      title: subtask.title,
      description: subtask.description,
      is_completed: subtask.is_completed,
      completed_at: subtask.completed_at,
      priority: subtask.priority.as_str().to_string(),
      category: subtask.category,
      due_date: subtask.due_date,
      created_at: subtask.created_at,
      updated_at: subtask.updated_at,
    }
  }
}
