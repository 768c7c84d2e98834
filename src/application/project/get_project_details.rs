use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::entities::User;
use crate::domain::project::{ports::ProjectRepository, ProjectError, ProjectService};

#[derive(Debug, Clone)]
pub struct GetProjectDetailsCommand {
  pub project_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ProjectMemberDto {
  pub user_id: Uuid,
  pub name: String,
  pub email: String,
  pub role: String,
  pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct GetProjectDetailsResponse {
  pub project_id: Uuid,
  pub name: String,
  pub description: Option<String>,
  pub owner_id: Uuid,
  pub can_manage: bool,
  pub tasks_total: i64,
  pub members: Vec<ProjectMemberDto>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

pub struct GetProjectDetailsUseCase {
  project_service: Arc<ProjectService>,
  project_repo: Arc<dyn ProjectRepository>,
}

impl GetProjectDetailsUseCase {
  pub fn new(
    project_service: Arc<ProjectService>,
    project_repo: Arc<dyn ProjectRepository>,
  ) -> Self {
    Self {
      project_service,
      project_repo,
    }
  }

  pub async fn execute(
    &self,
    requester: &User,
    command: GetProjectDetailsCommand,
  ) -> Result<GetProjectDetailsResponse, ProjectError> {
    let project = self
      .project_service
      .get_project(requester, command.project_id)
      .await?;

    let members = self
      .project_service
      .list_members(requester, project.id)
      .await?;
    let tasks_total = self.project_repo.count_tasks(project.id).await?;

    let can_manage = requester.is_admin || project.is_owned_by(requester.id);

    Ok(GetProjectDetailsResponse {
      project_id: project.id,
      name: project.name,
      description: project.description,
      owner_id: project.owner_id,
      can_manage,
      tasks_total,
      members: members
        .into_iter()
        .map(|m| ProjectMemberDto {
          user_id: m.user_id,
          name: m.name,
          email: m.email,
          role: m.role.as_str().to_string(),
          joined_at: m.joined_at,
        })
        .collect(),
      created_at: project.created_at,
      updated_at: project.updated_at,
    })
  }
}
