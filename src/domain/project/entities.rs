use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::{ProjectError, ValidationError};

/// Project entity grouping tasks under a single owner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
  pub id: Uuid,
  pub name: String,
  pub description: Option<String>,
  pub owner_id: Uuid,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Project {
  pub fn new(name: String, description: Option<String>, owner_id: Uuid) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      name,
      description,
      owner_id,
      created_at: now,
      updated_at: now,
    }
  }

  pub fn is_owned_by(&self, user_id: Uuid) -> bool {
    self.owner_id == user_id
  }
}

/// Membership role within a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectRole {
  Owner,
  Member,
}

impl ProjectRole {
  pub fn as_str(&self) -> &'static str {
    match self {
      ProjectRole::Owner => "owner",
      ProjectRole::Member => "member",
    }
  }

  pub fn from_str(s: &str) -> Result<Self, ProjectError> {
    match s {
      "owner" => Ok(ProjectRole::Owner),
      "member" => Ok(ProjectRole::Member),
      _ => Err(ProjectError::Validation(ValidationError::InvalidRole)),
    }
  }
}

/// User membership in a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMember {
  pub project_id: Uuid,
  pub user_id: Uuid,
  pub role: ProjectRole,
  pub joined_at: DateTime<Utc>,
}

impl ProjectMember {
  pub fn new(project_id: Uuid, user_id: Uuid, role: ProjectRole) -> Self {
    Self {
      project_id,
      user_id,
      role,
      joined_at: Utc::now(),
    }
  }

  pub fn from_db(
    project_id: Uuid,
    user_id: Uuid,
    role: String,
    joined_at: DateTime<Utc>,
  ) -> Result<Self, ProjectError> {
    let role = ProjectRole::from_str(&role)?;
    Ok(Self {
      project_id,
      user_id,
      role,
      joined_at,
    })
  }

  pub fn is_owner(&self) -> bool {
    self.role == ProjectRole::Owner
  }
}

/// Membership row joined with the user behind it, for member listings
#[derive(Debug, Clone, Serialize)]
pub struct MemberInfo {
  pub user_id: Uuid,
  pub name: String,
  pub email: String,
  pub role: ProjectRole,
  pub joined_at: DateTime<Utc>,
}

/// Project with the per-row context shown in listings
#[derive(Debug, Clone)]
pub struct ProjectSummary {
  pub project: Project,
  pub tasks_count: i64,
  pub members: Vec<MemberInfo>,
}

/// Editable project fields
#[derive(Debug, Clone, Default)]
pub struct ProjectUpdate {
  pub name: Option<String>,
  /// Outer None leaves the description alone, inner None clears it
  pub description: Option<Option<String>>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn role_round_trips_through_strings() {
    assert_eq!(ProjectRole::from_str("owner").unwrap(), ProjectRole::Owner);
    assert_eq!(ProjectRole::from_str("member").unwrap(), ProjectRole::Member);
    assert_eq!(ProjectRole::Owner.as_str(), "owner");
    assert!(ProjectRole::from_str("admin").is_err());
  }

  #[test]
  fn new_project_is_owned_by_creator() {
    let owner = Uuid::new_v4();
    let project = Project::new("Launch".to_string(), None, owner);
    assert!(project.is_owned_by(owner));
    assert!(!project.is_owned_by(Uuid::new_v4()));
  }
}
