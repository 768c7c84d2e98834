use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::task::entities::{Page, PageResult};

use super::entities::{MemberInfo, Project, ProjectMember, ProjectSummary};
use super::errors::ProjectError;

/// Repository interface for project persistence
#[async_trait]
pub trait ProjectRepository: Send + Sync {
  async fn create(&self, project: Project) -> Result<Project, ProjectError>;
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>, ProjectError>;
  /// Projects the user owns or belongs to, newest first, each with its
  /// task count and member summaries. `q` matches the name
  /// case-insensitively.
  async fn list_for_user(
    &self,
    user_id: Uuid,
    q: Option<&str>,
    page: Page,
  ) -> Result<PageResult<ProjectSummary>, ProjectError>;
  async fn update(&self, project: Project) -> Result<Project, ProjectError>;
  async fn delete(&self, id: Uuid) -> Result<(), ProjectError>;
  /// Number of tasks currently attached to the project.
  async fn count_tasks(&self, project_id: Uuid) -> Result<i64, ProjectError>;
}

/// Repository interface for the membership pivot
#[async_trait]
pub trait ProjectMemberRepository: Send + Sync {
  async fn add_member(&self, member: ProjectMember) -> Result<ProjectMember, ProjectError>;
  async fn find_member(
    &self,
    project_id: Uuid,
    user_id: Uuid,
  ) -> Result<Option<ProjectMember>, ProjectError>;
  async fn list_members(&self, project_id: Uuid) -> Result<Vec<MemberInfo>, ProjectError>;
  async fn remove_member(&self, project_id: Uuid, user_id: Uuid) -> Result<(), ProjectError>;
}
