use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::entities::User;
use crate::domain::project::{ProjectError, ProjectService};

#[derive(Debug, Clone)]
pub struct RemoveProjectMemberCommand {
  pub project_id: Uuid,
  pub member_id: Uuid,
}

pub struct RemoveProjectMemberUseCase {
  project_service: Arc<ProjectService>,
}

impl RemoveProjectMemberUseCase {
  pub fn new(project_service: Arc<ProjectService>) -> Self {
    Self { project_service }
  }

  /// # Errors
  /// Returns `ProjectError::CannotRemoveOwner` when targeting the owner.
  pub async fn execute(
    &self,
    requester: &User,
    command: RemoveProjectMemberCommand,
  ) -> Result<(), ProjectError> {
    self
      .project_service
      .remove_member(requester, command.project_id, command.member_id)
      .await
  }
}
