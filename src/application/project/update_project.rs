use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::entities::User;
use crate::domain::project::{ProjectError, ProjectService, ProjectUpdate};

#[derive(Debug, Clone)]
pub struct UpdateProjectCommand {
  pub project_id: Uuid,
  pub name: Option<String>,
  /// `Some(None)` clears the description
  pub description: Option<Option<String>>,
}

#[derive(Debug, Clone)]
pub struct UpdateProjectResponse {
  pub project_id: Uuid,
  pub name: String,
  pub description: Option<String>,
  pub updated_at: DateTime<Utc>,
}

pub struct UpdateProjectUseCase {
  project_service: Arc<ProjectService>,
}

impl UpdateProjectUseCase {
  pub fn new(project_service: Arc<ProjectService>) -> Self {
    Self { project_service }
  }

  pub async fn execute(
    &self,
    requester: &User,
    command: UpdateProjectCommand,
  ) -> Result<UpdateProjectResponse, ProjectError> {
    let update = ProjectUpdate {
      name: command.name,
      description: command.description,
    };

    let project = self
      .project_service
      .update_project(requester, command.project_id, update)
      .await?;

    Ok(UpdateProjectResponse {
      project_id: project.id,
      name: project.name,
      description: project.description,
      updated_at: project.updated_at,
    })
  }
}
