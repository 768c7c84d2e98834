use std::sync::Arc;
use uuid::Uuid;

use crate::application::subtask::SubtaskDto;
use crate::domain::auth::entities::User;
use crate::domain::task::{
  entities::{Page, SubtaskFilter},
  TaskError, TaskService,
};

use super::TaskDto;

#[derive(Debug, Clone)]
pub struct GetTaskDetailsCommand {
  pub task_id: Uuid,
}

#[derive(Debug, serde::Serialize)]
pub struct GetTaskDetailsResponse {
  #[serde(flatten)]
  pub task: TaskDto,
  /// Subtasks are private to the task creator; project members who can
  /// see the task itself get an empty list here.
  pub subtasks: Vec<SubtaskDto>,
}

pub struct GetTaskDetailsUseCase {
  task_service: Arc<TaskService>,
}

impl GetTaskDetailsUseCase {
  pub fn new(task_service: Arc<TaskService>) -> Self {
    Self { task_service }
  }

  pub async fn execute(
    &self,
    requester: &User,
    command: GetTaskDetailsCommand,
  ) -> Result<GetTaskDetailsResponse, TaskError> {
    let task = self.task_service.get_task(requester, command.task_id).await?;

    let subtasks = if task.creator_id == requester.id {
      let page = Page::new(None, Some(Page::MAX_PER_PAGE), Page::MAX_PER_PAGE);
      self
        .task_service
        .list_subtasks(requester, task.id, &SubtaskFilter::default(), page)
        .await?
        .items
        .into_iter()
        .map(SubtaskDto::from)
        .collect()
    } else {
      Vec::new()
    };

    Ok(GetTaskDetailsResponse {
      task: task.into(),
      subtasks,
    })
  }
}
