use std::sync::Arc;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::auth::entities::User;
use crate::domain::project::{errors::ProjectError, services::ProjectService};

use super::{
  entities::{
    Page, PageResult, Priority, Subtask, SubtaskFilter, SubtaskUpdate, Task, TaskFilter,
    TaskStats, TaskUpdate,
  },
  errors::TaskError,
  ports::{SubtaskRepository, TaskRepository},
};

/// Fields accepted when creating a task
#[derive(Debug, Clone)]
pub struct NewTask {
  pub title: String,
  pub description: Option<String>,
  pub priority: Option<Priority>,
  pub category: Option<String>,
  pub due_date: Option<DateTime<Utc>>,
  pub remind_at: Option<DateTime<Utc>>,
  pub project_id: Option<Uuid>,
}

/// Fields accepted when creating a subtask
#[derive(Debug, Clone)]
pub struct NewSubtask {
  pub title: String,
  pub description: Option<String>,
  pub priority: Option<Priority>,
  pub category: Option<String>,
  pub due_date: Option<chrono::NaiveDate>,
}

/// Task service implementing core business logic
pub struct TaskService {
  task_repo: Arc<dyn TaskRepository>,
  subtask_repo: Arc<dyn SubtaskRepository>,
  project_service: Arc<ProjectService>,
}

impl TaskService {
  pub fn new(
    task_repo: Arc<dyn TaskRepository>,
    subtask_repo: Arc<dyn SubtaskRepository>,
    project_service: Arc<ProjectService>,
  ) -> Self {
    Self {
      task_repo,
      subtask_repo,
      project_service,
    }
  }

  /// Create a task, optionally inside a project the user collaborates on
  pub async fn create_task(&self, requester: &User, input: NewTask) -> Result<Task, TaskError> {
    if let Some(project_id) = input.project_id {
      self.verify_project_access(requester, project_id).await?;
    }

    let mut task = Task::new(requester.id, input.title);
    task.description = input.description;
    task.priority = input.priority.unwrap_or_default();
    task.category = input.category;
    task.due_date = input.due_date;
    task.remind_at = input.remind_at;
    task.project_id = input.project_id;

    self.task_repo.create(task).await
  }

  /// Page through the user's visible tasks
  pub async fn list_tasks(
    &self,
    user_id: Uuid,
    filter: &TaskFilter,
    page: Page,
  ) -> Result<PageResult<Task>, TaskError> {
    self.task_repo.list_visible(user_id, filter, page).await
  }

  pub async fn get_task(&self, requester: &User, task_id: Uuid) -> Result<Task, TaskError> {
    self.authorize_task(requester, task_id).await
  }

  pub async fn update_task(
    &self,
    requester: &User,
    task_id: Uuid,
    update: TaskUpdate,
  ) -> Result<Task, TaskError> {
    let mut task = self.authorize_task(requester, task_id).await?;

    // Moving the task into a project requires access to that project
    if let Some(new_project) = update.project_id {
      if let Some(project_id) = new_project {
        if task.project_id != Some(project_id) {
          self.verify_project_access(requester, project_id).await?;
        }
      }
      task.project_id = new_project;
    }

    if let Some(title) = update.title {
      task.title = title;
    }
    if let Some(description) = update.description {
      task.description = description;
    }
    if let Some(priority) = update.priority {
      task.priority = priority;
    }
    if let Some(category) = update.category {
      task.category = category;
    }
    if let Some(due_date) = update.due_date {
      task.due_date = due_date;
    }
    if let Some(remind_at) = update.remind_at {
      task.remind_at = remind_at;
    }
    if let Some(is_completed) = update.is_completed {
      task.set_completed(is_completed);
    }
    task.updated_at = Utc::now();

    self.task_repo.update(task).await
  }

  /// Delete the task; its subtasks are removed with it
  pub async fn delete_task(&self, requester: &User, task_id: Uuid) -> Result<(), TaskError> {
    let task = self.authorize_task(requester, task_id).await?;
    self.task_repo.delete(task.id).await
  }

  /// Flip completion, stamping or clearing `completed_at`
  pub async fn toggle_completed(
    &self,
    requester: &User,
    task_id: Uuid,
  ) -> Result<Task, TaskError> {
    let mut task = self.authorize_task(requester, task_id).await?;
    task.toggle_completed();
    self.task_repo.update(task).await
  }

  /// Incomplete visible tasks due within the next `hours` (minimum 1)
  pub async fn due_soon(
    &self,
    user_id: Uuid,
    hours: i64,
    page: Page,
  ) -> Result<PageResult<Task>, TaskError> {
    self.task_repo.due_soon(user_id, hours.max(1), page).await
  }

  pub async fn stats(&self, user_id: Uuid) -> Result<TaskStats, TaskError> {
    self.task_repo.stats(user_id).await
  }

  // ===== Subtasks =====

  /// Create a subtask under a task the user created
  pub async fn create_subtask(
    &self,
    requester: &User,
    task_id: Uuid,
    input: NewSubtask,
  ) -> Result<Subtask, TaskError> {
    let task = self.authorize_task_owner(requester, task_id).await?;

    let mut subtask = Subtask::new(task.id, input.title);
    subtask.description = input.description;
    subtask.priority = input.priority.unwrap_or_default();
    subtask.category = input.category;
    subtask.due_date = input.due_date;

    self.subtask_repo.create(subtask).await
  }

  pub async fn list_subtasks(
    &self,
    requester: &User,
    task_id: Uuid,
    filter: &SubtaskFilter,
    page: Page,
  ) -> Result<PageResult<Subtask>, TaskError> {
    let task = self.authorize_task_owner(requester, task_id).await?;
    self.subtask_repo.list_for_task(task.id, filter, page).await
  }

  pub async fn get_subtask(
    &self,
    requester: &User,
    subtask_id: Uuid,
  ) -> Result<Subtask, TaskError> {
    self.authorize_subtask(requester, subtask_id).await
  }

  pub async fn update_subtask(
    &self,
    requester: &User,
    subtask_id: Uuid,
    update: SubtaskUpdate,
  ) -> Result<Subtask, TaskError> {
    let mut subtask = self.authorize_subtask(requester, subtask_id).await?;

    if let Some(title) = update.title {
      subtask.title = title;
    }
    if let Some(description) = update.description {
      subtask.description = description;
    }
    if let Some(priority) = update.priority {
      subtask.priority = priority;
    }
    if let Some(category) = update.category {
      subtask.category = category;
    }
    if let Some(due_date) = update.due_date {
      subtask.due_date = due_date;
    }
    if let Some(is_completed) = update.is_completed {
      subtask.set_completed(is_completed);
    }
    subtask.updated_at = Utc::now();

    self.subtask_repo.update(subtask).await
  }

  pub async fn delete_subtask(
    &self,
    requester: &User,
    subtask_id: Uuid,
  ) -> Result<(), TaskError> {
    let subtask = self.authorize_subtask(requester, subtask_id).await?;
    self.subtask_repo.delete(subtask.id).await
  }

  pub async fn toggle_subtask_completed(
    &self,
    requester: &User,
    subtask_id: Uuid,
  ) -> Result<Subtask, TaskError> {
    let mut subtask = self.authorize_subtask(requester, subtask_id).await?;
    subtask.toggle_completed();
    self.subtask_repo.update(subtask).await
  }

  /// Load the task if the user may act on it: its creator, or anyone
  /// who can read the project it belongs to.
  pub async fn authorize_task(&self, requester: &User, task_id: Uuid) -> Result<Task, TaskError> {
    let task = self
      .task_repo
      .find_by_id(task_id)
      .await?
      .ok_or(TaskError::NotFound)?;

    if task.creator_id == requester.id {
      return Ok(task);
    }

    if let Some(project_id) = task.project_id {
      match self.project_service.authorize_view(requester, project_id).await {
        Ok(_) => return Ok(task),
        Err(ProjectError::NotFound | ProjectError::Forbidden) => {}
        Err(e) => return Err(e.into()),
      }
    }

    Err(TaskError::Forbidden)
  }

  /// Subtask access follows the parent task's creator, nobody else.
  async fn authorize_task_owner(
    &self,
    requester: &User,
    task_id: Uuid,
  ) -> Result<Task, TaskError> {
    let task = self
      .task_repo
      .find_by_id(task_id)
      .await?
      .ok_or(TaskError::NotFound)?;

    if task.creator_id != requester.id {
      return Err(TaskError::Forbidden);
    }

    Ok(task)
  }

  async fn authorize_subtask(
    &self,
    requester: &User,
    subtask_id: Uuid,
  ) -> Result<Subtask, TaskError> {
    let subtask = self
      .subtask_repo
      .find_by_id(subtask_id)
      .await?
      .ok_or(TaskError::SubtaskNotFound)?;

    self.authorize_task_owner(requester, subtask.task_id).await?;

    Ok(subtask)
  }

  /// Creating or moving a task into a project needs a direct stake in
  /// it, owner or member. Admin status alone does not grant this.
  async fn verify_project_access(
    &self,
    requester: &User,
    project_id: Uuid,
  ) -> Result<(), TaskError> {
    match self
      .project_service
      .authorize_collaborator(requester.id, project_id)
      .await
    {
      Ok(_) => Ok(()),
      Err(ProjectError::NotFound) => Err(TaskError::Project(ProjectError::NotFound)),
      Err(ProjectError::Forbidden) => Err(TaskError::Forbidden),
      Err(e) => Err(e.into()),
    }
  }
}
