use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::project::{ProjectError, ProjectService};
use crate::domain::task::entities::{Page, PageResult};

#[derive(Debug, Clone, Default)]
pub struct ListProjectsCommand {
  pub user_id: Uuid,
  pub q: Option<String>,
  pub page: Option<u32>,
  pub per_page: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct MemberSummaryDto {
  pub user_id: Uuid,
  pub name: String,
  pub email: String,
  pub role: String,
}

#[derive(Debug, Serialize)]
pub struct ProjectListItemDto {
  pub id: Uuid,
  pub name: String,
  pub description: Option<String>,
  pub owner_id: Uuid,
  pub is_owner: bool,
  pub tasks_count: i64,
  pub members: Vec<MemberSummaryDto>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

pub struct ListProjectsUseCase {
  project_service: Arc<ProjectService>,
}

impl ListProjectsUseCase {
  const DEFAULT_PER_PAGE: u32 = 15;

  pub fn new(project_service: Arc<ProjectService>) -> Self {
    Self { project_service }
  }

  pub async fn execute(
    &self,
    command: ListProjectsCommand,
  ) -> Result<PageResult<ProjectListItemDto>, ProjectError> {
    let page = Page::new(command.page, command.per_page, Self::DEFAULT_PER_PAGE);

    let result = self
      .project_service
      .list_projects(command.user_id, command.q.as_deref(), page)
      .await?;

    Ok(result.map(|summary| {
      let members = summary
        .members
        .into_iter()
        .map(|m| MemberSummaryDto {
          user_id: m.user_id,
          name: m.name,
          email: m.email,
          role: m.role.as_str().to_string(),
        })
        .collect();
      let p = summary.project;
      ProjectListItemDto {
        id: p.id,
        is_owner: p.is_owned_by(command.user_id),
        name: p.name,
        description: p.description,
        owner_id: p.owner_id,
        tasks_count: summary.tasks_count,
        members,
        created_at: p.created_at,
        updated_at: p.updated_at,
      }
    }))
  }
}
