use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::project::{ProjectError, ProjectService};

#[derive(Debug, Clone)]
pub struct CreateProjectCommand {
  pub name: String,
  pub description: Option<String>,
  pub owner_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct CreateProjectResponse {
  pub project_id: Uuid,
  pub name: String,
  pub description: Option<String>,
  pub owner_id: Uuid,
  pub created_at: DateTime<Utc>,
}

pub struct CreateProjectUseCase {
  project_service: Arc<ProjectService>,
}

impl CreateProjectUseCase {
  pub fn new(project_service: Arc<ProjectService>) -> Self {
    Self { project_service }
  }

  pub async fn execute(
    &self,
    command: CreateProjectCommand,
  ) -> Result<CreateProjectResponse, ProjectError> {
    let project = self
      .project_service
      .create_project(command.name, command.description, command.owner_id)
      .await?;

    Ok(CreateProjectResponse {
      project_id: project.id,
      name: project.name,
      description: project.description,
      owner_id: project.owner_id,
      created_at: project.created_at,
    })
  }
}
