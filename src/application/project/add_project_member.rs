use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::entities::User;
use crate::domain::auth::value_objects::Email;
use crate::domain::project::{
  errors::ValidationError, MemberTarget, ProjectError, ProjectRole, ProjectService,
};

/// Command for adding a member; the target may be given by email or id
#[derive(Debug, Clone)]
pub struct AddProjectMemberCommand {
  pub project_id: Uuid,
  pub email: Option<String>,
  pub user_id: Option<Uuid>,
  /// Defaults to `member`
  pub role: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AddProjectMemberResponse {
  pub project_id: Uuid,
  pub user_id: Uuid,
  pub role: String,
  pub joined_at: DateTime<Utc>,
}

pub struct AddProjectMemberUseCase {
  project_service: Arc<ProjectService>,
}

impl AddProjectMemberUseCase {
  pub fn new(project_service: Arc<ProjectService>) -> Self {
    Self { project_service }
  }

  pub async fn execute(
    &self,
    requester: &User,
    command: AddProjectMemberCommand,
  ) -> Result<AddProjectMemberResponse, ProjectError> {
    let target = match (command.user_id, command.email) {
      (Some(user_id), _) => MemberTarget::UserId(user_id),
      (None, Some(email)) => {
        let email = Email::new(email).map_err(crate::domain::auth::errors::AuthError::from)?;
        MemberTarget::Email(email)
      }
      (None, None) => {
        return Err(ProjectError::Validation(ValidationError::InvalidField {
          field: "user".to_string(),
          reason: "either email or user_id is required".to_string(),
        }));
      }
    };

    let role = match command.role.as_deref() {
      Some(role) => ProjectRole::from_str(role)?,
      None => ProjectRole::Member,
    };

    let member = self
      .project_service
      .add_member(requester, command.project_id, target, role)
      .await?;

    Ok(AddProjectMemberResponse {
      project_id: member.project_id,
      user_id: member.user_id,
      role: member.role.as_str().to_string(),
      joined_at: member.joined_at,
    })
  }
}
