use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::entities::User;
use crate::domain::project::{ProjectError, ProjectService};

#[derive(Debug, Clone)]
pub struct DeleteProjectCommand {
  pub project_id: Uuid,
}

pub struct DeleteProjectUseCase {
  project_service: Arc<ProjectService>,
}

impl DeleteProjectUseCase {
  pub fn new(project_service: Arc<ProjectService>) -> Self {
    Self { project_service }
  }

  /// Tasks attached to the project survive with the link cleared.
  pub async fn execute(
    &self,
    requester: &User,
    command: DeleteProjectCommand,
  ) -> Result<(), ProjectError> {
    self
      .project_service
      .delete_project(requester, command.project_id)
      .await
  }
}
