use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::{entities::User, ports::UserRepository, value_objects::Email};
use crate::domain::task::entities::{Page, PageResult};

use super::{
  entities::{MemberInfo, Project, ProjectMember, ProjectRole, ProjectSummary, ProjectUpdate},
  errors::ProjectError,
  ports::{ProjectMemberRepository, ProjectRepository},
};

/// How a prospective member is identified in an add request
#[derive(Debug, Clone)]
pub enum MemberTarget {
  Email(Email),
  UserId(Uuid),
}

/// Project service implementing core business logic
pub struct ProjectService {
  project_repo: Arc<dyn ProjectRepository>,
  member_repo: Arc<dyn ProjectMemberRepository>,
  user_repo: Arc<dyn UserRepository>,
}

impl ProjectService {
  pub fn new(
    project_repo: Arc<dyn ProjectRepository>,
    member_repo: Arc<dyn ProjectMemberRepository>,
    user_repo: Arc<dyn UserRepository>,
  ) -> Self {
    Self {
      project_repo,
      member_repo,
      user_repo,
    }
  }

  /// Create new project with the user as owner
  pub async fn create_project(
    &self,
    name: String,
    description: Option<String>,
    owner_id: Uuid,
  ) -> Result<Project, ProjectError> {
    let project = Project::new(name, description, owner_id);
    let created = self.project_repo.create(project).await?;

    // The owner is always present in the membership pivot as well
    let owner = ProjectMember::new(created.id, owner_id, ProjectRole::Owner);
    self.member_repo.add_member(owner).await?;

    Ok(created)
  }

  /// Projects the user owns or belongs to
  pub async fn list_projects(
    &self,
    user_id: Uuid,
    q: Option<&str>,
    page: Page,
  ) -> Result<PageResult<ProjectSummary>, ProjectError> {
    self.project_repo.list_for_user(user_id, q, page).await
  }

  pub async fn get_project(
    &self,
    requester: &User,
    project_id: Uuid,
  ) -> Result<Project, ProjectError> {
    self.authorize_view(requester, project_id).await
  }

  /// Update project fields (owner or admin)
  pub async fn update_project(
    &self,
    requester: &User,
    project_id: Uuid,
    update: ProjectUpdate,
  ) -> Result<Project, ProjectError> {
    let mut project = self.authorize_manage(requester, project_id).await?;

    if let Some(name) = update.name {
      project.name = name;
    }
    if let Some(description) = update.description {
      project.description = description;
    }
    project.updated_at = chrono::Utc::now();

    self.project_repo.update(project).await
  }

  /// Delete project (owner or admin); tasks keep existing but lose the link
  pub async fn delete_project(
    &self,
    requester: &User,
    project_id: Uuid,
  ) -> Result<(), ProjectError> {
    let project = self.authorize_manage(requester, project_id).await?;
    self.project_repo.delete(project.id).await
  }

  /// List members with their user details (any member, owner or admin)
  pub async fn list_members(
    &self,
    requester: &User,
    project_id: Uuid,
  ) -> Result<Vec<MemberInfo>, ProjectError> {
    self.authorize_view(requester, project_id).await?;
    self.member_repo.list_members(project_id).await
  }

  /// Add a member identified by email or id (owner or admin)
  pub async fn add_member(
    &self,
    requester: &User,
    project_id: Uuid,
    target: MemberTarget,
    role: ProjectRole,
  ) -> Result<ProjectMember, ProjectError> {
    let project = self.authorize_manage(requester, project_id).await?;

    let user = match target {
      MemberTarget::Email(email) => self
        .user_repo
        .find_by_email(&email)
        .await?
        .ok_or(ProjectError::UserNotFound)?,
      MemberTarget::UserId(id) => self
        .user_repo
        .find_by_id(id)
        .await?
        .ok_or(ProjectError::UserNotFound)?,
    };

    if project.is_owned_by(user.id) {
      return Err(ProjectError::OwnerAlwaysMember);
    }

    if self
      .member_repo
      .find_member(project_id, user.id)
      .await?
      .is_some()
    {
      return Err(ProjectError::AlreadyMember);
    }

    let member = ProjectMember::new(project_id, user.id, role);
    self.member_repo.add_member(member).await
  }

  /// Remove a member (owner or admin); the owner row itself is untouchable
  pub async fn remove_member(
    &self,
    requester: &User,
    project_id: Uuid,
    member_id: Uuid,
  ) -> Result<(), ProjectError> {
    let project = self.authorize_manage(requester, project_id).await?;

    if project.is_owned_by(member_id) {
      return Err(ProjectError::CannotRemoveOwner);
    }

    self
      .member_repo
      .find_member(project_id, member_id)
      .await?
      .ok_or(ProjectError::NotMember)?;

    self.member_repo.remove_member(project_id, member_id).await
  }

  /// Load the project if the user may read it: admin, owner or member.
  pub async fn authorize_view(
    &self,
    requester: &User,
    project_id: Uuid,
  ) -> Result<Project, ProjectError> {
    let project = self
      .project_repo
      .find_by_id(project_id)
      .await?
      .ok_or(ProjectError::NotFound)?;

    if requester.is_admin || project.is_owned_by(requester.id) {
      return Ok(project);
    }

    if self
      .member_repo
      .find_member(project_id, requester.id)
      .await?
      .is_some()
    {
      return Ok(project);
    }

    Err(ProjectError::Forbidden)
  }

  /// Load the project if the user has a direct stake in it: owner or
  /// member. Unlike `authorize_view` this does not bypass for admins.
  pub async fn authorize_collaborator(
    &self,
    user_id: Uuid,
    project_id: Uuid,
  ) -> Result<Project, ProjectError> {
    let project = self
      .project_repo
      .find_by_id(project_id)
      .await?
      .ok_or(ProjectError::NotFound)?;

    if project.is_owned_by(user_id) {
      return Ok(project);
    }

    if self
      .member_repo
      .find_member(project_id, user_id)
      .await?
      .is_some()
    {
      return Ok(project);
    }

    Err(ProjectError::Forbidden)
  }

  /// Load the project if the user may change it: admin or owner only.
  pub async fn authorize_manage(
    &self,
    requester: &User,
    project_id: Uuid,
  ) -> Result<Project, ProjectError> {
    let project = self
      .project_repo
      .find_by_id(project_id)
      .await?
      .ok_or(ProjectError::NotFound)?;

    if requester.is_admin || project.is_owned_by(requester.id) {
      return Ok(project);
    }

    Err(ProjectError::Forbidden)
  }
}
