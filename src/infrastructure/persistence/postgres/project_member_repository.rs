use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::project::entities::{MemberInfo, ProjectMember, ProjectRole};
use crate::domain::project::errors::ProjectError;
use crate::domain::project::ports::ProjectMemberRepository;

/// Database row structure for the project_members pivot
#[derive(Debug, FromRow)]
struct MemberRow {
  project_id: Uuid,
  user_id: Uuid,
  role: String,
  joined_at: DateTime<Utc>,
}

impl MemberRow {
  fn into_member(self) -> Result<ProjectMember, ProjectError> {
    ProjectMember::from_db(self.project_id, self.user_id, self.role, self.joined_at)
  }
}

/// Membership joined with the users table for listings
#[derive(Debug, FromRow)]
struct MemberInfoRow {
  user_id: Uuid,
  name: String,
  email: String,
  role: String,
  joined_at: DateTime<Utc>,
}

/// PostgreSQL implementation of the ProjectMemberRepository trait
pub struct PostgresProjectMemberRepository {
  pool: PgPool,
}

impl PostgresProjectMemberRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl ProjectMemberRepository for PostgresProjectMemberRepository {
  async fn add_member(&self, member: ProjectMember) -> Result<ProjectMember, ProjectError> {
    let row = sqlx::query_as::<_, MemberRow>(
      r#"
            INSERT INTO project_members (project_id, user_id, role, joined_at)
            VALUES ($1, $2, $3, $4)
            RETURNING project_id, user_id, role, joined_at
            "#,
    )
    .bind(member.project_id)
    .bind(member.user_id)
    .bind(member.role.as_str())
    .bind(member.joined_at)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to add project member: {}", e);
      ProjectError::from(e)
    })?;

    row.into_member()
  }

  async fn find_member(
    &self,
    project_id: Uuid,
    user_id: Uuid,
  ) -> Result<Option<ProjectMember>, ProjectError> {
    let row = sqlx::query_as::<_, MemberRow>(
      r#"
            SELECT project_id, user_id, role, joined_at
            FROM project_members
            WHERE project_id = $1 AND user_id = $2
            "#,
    )
    .bind(project_id)
    .bind(user_id)
    .fetch_optional(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to find project member: {}", e);
      ProjectError::from(e)
    })?;

    row.map(MemberRow::into_member).transpose()
  }

  async fn list_members(&self, project_id: Uuid) -> Result<Vec<MemberInfo>, ProjectError> {
    let rows = sqlx::query_as::<_, MemberInfoRow>(
      r#"
            SELECT pm.user_id, u.name, u.email, pm.role, pm.joined_at
            FROM project_members pm
            JOIN users u ON u.id = pm.user_id
            WHERE pm.project_id = $1
            ORDER BY pm.joined_at ASC, pm.user_id ASC
            "#,
    )
    .bind(project_id)
    .fetch_all(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to list members for project {}: {}", project_id, e);
      ProjectError::from(e)
    })?;

    rows
      .into_iter()
      .map(|row| {
        let role = ProjectRole::from_str(&row.role)?;
        Ok(MemberInfo {
          user_id: row.user_id,
          name: row.name,
          email: row.email,
          role,
          joined_at: row.joined_at,
        })
      })
      .collect()
  }

  async fn remove_member(&self, project_id: Uuid, user_id: Uuid) -> Result<(), ProjectError> {
    let result =
      sqlx::query("DELETE FROM project_members WHERE project_id = $1 AND user_id = $2")
        .bind(project_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
          tracing::error!("Failed to remove project member: {}", e);
          ProjectError::from(e)
        })?;

    if result.rows_affected() == 0 {
      return Err(ProjectError::NotMember);
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::project::entities::Project;
  use sqlx::postgres::PgPoolOptions;
  use testcontainers::ImageExt;
  use testcontainers_modules::postgres::Postgres;
  use testcontainers_modules::testcontainers::{ContainerAsync, runners::AsyncRunner};

  async fn setup_test_db() -> (PgPool, ContainerAsync<Postgres>) {
    let container = Postgres::default()
      .with_tag("16-alpine")
      .start()
      .await
      .expect("Failed to start postgres container");

    let host = container.get_host().await.expect("Failed to get host");
    let port = container
      .get_host_port_ipv4(5432)
      .await
      .expect("Failed to get port");
    let database_url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

    let pool = PgPoolOptions::new()
      .max_connections(5)
      .connect(&database_url)
      .await
      .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
      .run(&pool)
      .await
      .expect("Failed to run migrations");

    (pool, container)
  }

  async fn create_test_user(pool: &PgPool, name: &str) -> Uuid {
    let user_id = Uuid::new_v4();
    let email = format!("test_{}@example.com", user_id);
    sqlx::query(
      r#"
            INSERT INTO users (id, name, email, password_hash, is_admin, created_at, updated_at)
            VALUES ($1, $2, $3, 'hash', false, NOW(), NOW())
            "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(&email)
    .execute(pool)
    .await
    .expect("Failed to create test user");
    user_id
  }

  async fn create_test_project(pool: &PgPool, owner_id: Uuid) -> Uuid {
    let project = Project::new("Test Project".to_string(), None, owner_id);
    sqlx::query(
      r#"
            INSERT INTO projects (id, name, description, owner_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
    )
    .bind(project.id)
    .bind(&project.name)
    .bind(project.description.as_deref())
    .bind(project.owner_id)
    .bind(project.created_at)
    .bind(project.updated_at)
    .execute(pool)
    .await
    .expect("Failed to create test project");
    project.id
  }

  #[tokio::test]
  async fn test_add_and_find_member() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresProjectMemberRepository::new(pool.clone());

    let owner_id = create_test_user(&pool, "Owner").await;
    let user_id = create_test_user(&pool, "Member").await;
    let project_id = create_test_project(&pool, owner_id).await;

    let member = ProjectMember::new(project_id, user_id, ProjectRole::Member);
    let added = repo.add_member(member).await.unwrap();
    assert_eq!(added.role, ProjectRole::Member);

    let found = repo.find_member(project_id, user_id).await.unwrap();
    assert!(found.is_some());

    let missing = repo.find_member(project_id, Uuid::new_v4()).await.unwrap();
    assert!(missing.is_none());
  }

  #[tokio::test]
  async fn test_duplicate_membership_rejected() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresProjectMemberRepository::new(pool.clone());

    let owner_id = create_test_user(&pool, "Owner").await;
    let user_id = create_test_user(&pool, "Member").await;
    let project_id = create_test_project(&pool, owner_id).await;

    repo
      .add_member(ProjectMember::new(project_id, user_id, ProjectRole::Member))
      .await
      .unwrap();

    let result = repo
      .add_member(ProjectMember::new(project_id, user_id, ProjectRole::Member))
      .await;
    assert!(result.is_err());
  }

  #[tokio::test]
  async fn test_list_members_joins_user_fields() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresProjectMemberRepository::new(pool.clone());

    let owner_id = create_test_user(&pool, "Owner").await;
    let user_id = create_test_user(&pool, "Collaborator").await;
    let project_id = create_test_project(&pool, owner_id).await;

    repo
      .add_member(ProjectMember::new(project_id, owner_id, ProjectRole::Owner))
      .await
      .unwrap();
    repo
      .add_member(ProjectMember::new(project_id, user_id, ProjectRole::Member))
      .await
      .unwrap();

    let members = repo.list_members(project_id).await.unwrap();
    assert_eq!(members.len(), 2);
    assert!(members.iter().any(|m| m.name == "Collaborator"));
    assert!(members.iter().any(|m| m.role == ProjectRole::Owner));
  }

  #[tokio::test]
  async fn test_remove_member() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresProjectMemberRepository::new(pool.clone());

    let owner_id = create_test_user(&pool, "Owner").await;
    let user_id = create_test_user(&pool, "Member").await;
    let project_id = create_test_project(&pool, owner_id).await;

    repo
      .add_member(ProjectMember::new(project_id, user_id, ProjectRole::Member))
      .await
      .unwrap();

    repo.remove_member(project_id, user_id).await.unwrap();

    let result = repo.remove_member(project_id, user_id).await;
    assert!(matches!(result, Err(ProjectError::NotMember)));
  }
}
