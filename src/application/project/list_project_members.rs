use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::entities::User;
use crate::domain::project::{ProjectError, ProjectService};

#[derive(Debug, Clone)]
pub struct ListProjectMembersCommand {
  pub project_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct MemberDto {
  pub user_id: Uuid,
  pub name: String,
  pub email: String,
  pub role: String,
  pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ListProjectMembersResponse {
  pub members: Vec<MemberDto>,
}

pub struct ListProjectMembersUseCase {
  project_service: Arc<ProjectService>,
}

impl ListProjectMembersUseCase {
  pub fn new(project_service: Arc<ProjectService>) -> Self {
    Self { project_service }
  }

  pub async fn execute(
    &self,
    requester: &User,
    command: ListProjectMembersCommand,
  ) -> Result<ListProjectMembersResponse, ProjectError> {
    let members = self
      .project_service
      .list_members(requester, command.project_id)
      .await?;

    Ok(ListProjectMembersResponse {
      members: members
        .into_iter()
        .map(|m| MemberDto {
          user_id: m.user_id,
          name: m.name,
          email: m.email,
          role: m.role.as_str().to_string(),
          joined_at: m.joined_at,
        })
        .collect(),
    })
  }
}
