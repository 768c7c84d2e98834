use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::auth::errors::RepositoryError;
use crate::domain::task::entities::{Page, PageResult};

use super::entities::{
  AdminProjectFilter, AdminSummary, AdminTaskFilter, ProjectOverview, TaskOverview,
  UserNode, UserOverview,
};

/// Read-only reporting queries spanning all tenants.
///
/// These bypass the per-user visibility scope on purpose; callers must
/// sit behind the admin gate.
#[async_trait]
pub trait AdminRepository: Send + Sync {
  async fn summary(&self) -> Result<AdminSummary, RepositoryError>;
  /// Every user with their owned projects and task counters,
  /// admins first, newest first within each group.
  async fn tree(&self) -> Result<Vec<UserNode>, RepositoryError>;
  async fn list_users(
    &self,
    q: Option<&str>,
    page: Page,
  ) -> Result<PageResult<UserOverview>, RepositoryError>;
  async fn list_projects(
    &self,
    filter: &AdminProjectFilter,
    page: Page,
  ) -> Result<PageResult<ProjectOverview>, RepositoryError>;
  async fn projects_for_user(
    &self,
    owner_id: Uuid,
  ) -> Result<Vec<ProjectOverview>, RepositoryError>;
  async fn list_tasks(
    &self,
    filter: &AdminTaskFilter,
    page: Page,
  ) -> Result<PageResult<TaskOverview>, RepositoryError>;
}
