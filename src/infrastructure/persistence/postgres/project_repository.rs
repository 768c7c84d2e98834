use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::auth::errors::RepositoryError;
use crate::domain::project::entities::{MemberInfo, Project, ProjectRole, ProjectSummary};
use crate::domain::project::errors::ProjectError;
use crate::domain::project::ports::ProjectRepository;
use crate::domain::task::entities::{Page, PageResult};

/// Database row structure for the projects table
#[derive(Debug, FromRow)]
struct ProjectRow {
  id: Uuid,
  name: String,
  description: Option<String>,
  owner_id: Uuid,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl ProjectRow {
  fn into_project(self) -> Project {
    Project {
      id: self.id,
      name: self.name,
      description: self.description,
      owner_id: self.owner_id,
      created_at: self.created_at,
      updated_at: self.updated_at,
    }
  }
}

/// Listing row carrying the per-project task count
#[derive(Debug, FromRow)]
struct ProjectSummaryRow {
  id: Uuid,
  name: String,
  description: Option<String>,
  owner_id: Uuid,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
  tasks_count: i64,
}

impl ProjectSummaryRow {
  fn into_summary(self, members: Vec<MemberInfo>) -> ProjectSummary {
    ProjectSummary {
      project: Project {
        id: self.id,
        name: self.name,
        description: self.description,
        owner_id: self.owner_id,
        created_at: self.created_at,
        updated_at: self.updated_at,
      },
      tasks_count: self.tasks_count,
      members,
    }
  }
}

/// Membership row scoped to a page of projects
#[derive(Debug, FromRow)]
struct ListMemberRow {
  project_id: Uuid,
  user_id: Uuid,
  name: String,
  email: String,
  role: String,
  joined_at: DateTime<Utc>,
}

/// PostgreSQL implementation of the ProjectRepository trait
pub struct PostgresProjectRepository {
  pool: PgPool,
}

impl PostgresProjectRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
  async fn create(&self, project: Project) -> Result<Project, ProjectError> {
    let row = sqlx::query_as::<_, ProjectRow>(
      r#"
            INSERT INTO projects (id, name, description, owner_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, description, owner_id, created_at, updated_at
            "#,
    )
    .bind(project.id)
    .bind(&project.name)
    .bind(project.description.as_deref())
    .bind(project.owner_id)
    .bind(project.created_at)
    .bind(project.updated_at)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to create project: {}", e);
      ProjectError::from(e)
    })?;

    Ok(row.into_project())
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>, ProjectError> {
    let row = sqlx::query_as::<_, ProjectRow>(
      r#"
            SELECT id, name, description, owner_id, created_at, updated_at
            FROM projects
            WHERE id = $1
            "#,
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to find project by id: {}", e);
      ProjectError::from(e)
    })?;

    Ok(row.map(ProjectRow::into_project))
  }

  async fn list_for_user(
    &self,
    user_id: Uuid,
    q: Option<&str>,
    page: Page,
  ) -> Result<PageResult<ProjectSummary>, ProjectError> {
    let mut count_builder = QueryBuilder::<Postgres>::new("SELECT COUNT(DISTINCT p.id) ");
    let mut builder = QueryBuilder::<Postgres>::new(
      "SELECT DISTINCT p.id, p.name, p.description, p.owner_id, p.created_at, p.updated_at, \
       (SELECT COUNT(*) FROM tasks t WHERE t.project_id = p.id) AS tasks_count ",
    );
    for b in [&mut count_builder, &mut builder] {
      b.push("FROM projects p LEFT JOIN project_members pm ON pm.project_id = p.id WHERE (p.owner_id = ");
      b.push_bind(user_id);
      b.push(" OR pm.user_id = ");
      b.push_bind(user_id);
      b.push(")");
      if let Some(q) = q {
        b.push(" AND p.name ILIKE ");
        b.push_bind(format!("%{}%", q));
      }
    }

    let total: i64 = count_builder
      .build_query_scalar()
      .fetch_one(&self.pool)
      .await
      .map_err(|e| {
        tracing::error!("Failed to count projects for user {}: {}", user_id, e);
        ProjectError::from(e)
      })?;

    builder.push(" ORDER BY p.created_at DESC, p.id DESC");
    builder.push(" LIMIT ").push_bind(page.limit());
    builder.push(" OFFSET ").push_bind(page.offset());

    let rows: Vec<ProjectSummaryRow> = builder
      .build_query_as()
      .fetch_all(&self.pool)
      .await
      .map_err(|e| {
        tracing::error!("Failed to list projects for user {}: {}", user_id, e);
        ProjectError::from(e)
      })?;

    let project_ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let member_rows = sqlx::query_as::<_, ListMemberRow>(
      r#"
            SELECT pm.project_id, pm.user_id, u.name, u.email, pm.role, pm.joined_at
            FROM project_members pm
            JOIN users u ON u.id = pm.user_id
            WHERE pm.project_id = ANY($1)
            ORDER BY pm.joined_at ASC, pm.user_id ASC
            "#,
    )
    .bind(&project_ids)
    .fetch_all(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to load members for project listing: {}", e);
      ProjectError::from(e)
    })?;

    let mut members_by_project: HashMap<Uuid, Vec<MemberInfo>> = HashMap::new();
    for row in member_rows {
      let role = ProjectRole::from_str(&row.role)?;
      members_by_project
        .entry(row.project_id)
        .or_default()
        .push(MemberInfo {
          user_id: row.user_id,
          name: row.name,
          email: row.email,
          role,
          joined_at: row.joined_at,
        });
    }

    let items = rows
      .into_iter()
      .map(|row| {
        let members = members_by_project.remove(&row.id).unwrap_or_default();
        row.into_summary(members)
      })
      .collect();

    Ok(PageResult {
      items,
      page: page.page,
      per_page: page.per_page,
      total,
    })
  }

  async fn update(&self, project: Project) -> Result<Project, ProjectError> {
    let row = sqlx::query_as::<_, ProjectRow>(
      r#"
            UPDATE projects
            SET name = $2, description = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, owner_id, created_at, updated_at
            "#,
    )
    .bind(project.id)
    .bind(&project.name)
    .bind(project.description.as_deref())
    .fetch_one(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to update project {}: {}", project.id, e);
      ProjectError::from(e)
    })?;

    Ok(row.into_project())
  }

  async fn delete(&self, id: Uuid) -> Result<(), ProjectError> {
    let result = sqlx::query("DELETE FROM projects WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await
      .map_err(|e| {
        tracing::error!("Failed to delete project {}: {}", id, e);
        ProjectError::from(e)
      })?;

    if result.rows_affected() == 0 {
      return Err(ProjectError::Repository(RepositoryError::NotFound));
    }

    Ok(())
  }

  async fn count_tasks(&self, project_id: Uuid) -> Result<i64, ProjectError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE project_id = $1")
      .bind(project_id)
      .fetch_one(&self.pool)
      .await
      .map_err(|e| {
        tracing::error!("Failed to count tasks for project {}: {}", project_id, e);
        ProjectError::from(e)
      })?;

    Ok(count)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
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

  async fn create_test_user(pool: &PgPool) -> Uuid {
    let user_id = Uuid::new_v4();
    let email = format!("test_{}@example.com", user_id);
    sqlx::query(
      r#"
            INSERT INTO users (id, name, email, password_hash, is_admin, created_at, updated_at)
            VALUES ($1, 'Test User', $2, 'hash', false, NOW(), NOW())
            "#,
    )
    .bind(user_id)
    .bind(&email)
    .execute(pool)
    .await
    .expect("Failed to create test user");
    user_id
  }

  #[tokio::test]
  async fn test_create_and_find_project() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresProjectRepository::new(pool.clone());

    let owner_id = create_test_user(&pool).await;
    let project = Project::new("Alpha".to_string(), Some("First".to_string()), owner_id);

    let created = repo.create(project.clone()).await.unwrap();
    assert_eq!(created.name, "Alpha");

    let found = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(found.owner_id, owner_id);
    assert_eq!(found.description.as_deref(), Some("First"));
  }

  #[tokio::test]
  async fn test_list_for_user_includes_memberships() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresProjectRepository::new(pool.clone());

    let owner_id = create_test_user(&pool).await;
    let member_id = create_test_user(&pool).await;
    let outsider_id = create_test_user(&pool).await;

    let owned = repo
      .create(Project::new("Owned".to_string(), None, owner_id))
      .await
      .unwrap();
    let joined = repo
      .create(Project::new("Joined".to_string(), None, owner_id))
      .await
      .unwrap();

    sqlx::query(
      "INSERT INTO project_members (project_id, user_id, role, joined_at) VALUES ($1, $2, 'member', NOW())",
    )
    .bind(joined.id)
    .bind(member_id)
    .execute(&pool)
    .await
    .unwrap();

    let page = Page::new(None, None, 15);

    let for_owner = repo.list_for_user(owner_id, None, page).await.unwrap();
    assert_eq!(for_owner.total, 2);
    assert!(for_owner.items.iter().any(|p| p.project.id == owned.id));

    let for_member = repo.list_for_user(member_id, None, page).await.unwrap();
    assert_eq!(for_member.items.len(), 1);
    assert_eq!(for_member.items[0].project.id, joined.id);

    let for_outsider = repo.list_for_user(outsider_id, None, page).await.unwrap();
    assert!(for_outsider.items.is_empty());
    assert_eq!(for_outsider.total, 0);
  }

  #[tokio::test]
  async fn test_list_for_user_carries_task_counts_and_members() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresProjectRepository::new(pool.clone());

    let owner_id = create_test_user(&pool).await;
    let member_id = create_test_user(&pool).await;
    let project = repo
      .create(Project::new("Tracked".to_string(), None, owner_id))
      .await
      .unwrap();
    let bare = repo
      .create(Project::new("Bare".to_string(), None, owner_id))
      .await
      .unwrap();

    sqlx::query(
      "INSERT INTO project_members (project_id, user_id, role, joined_at) VALUES ($1, $2, 'member', NOW())",
    )
    .bind(project.id)
    .bind(member_id)
    .execute(&pool)
    .await
    .unwrap();
    for i in 0..3 {
      sqlx::query(
        r#"
                INSERT INTO tasks (id, creator_id, project_id, title, is_completed, priority, created_at, updated_at)
                VALUES ($1, $2, $3, $4, false, 1, NOW(), NOW())
                "#,
      )
      .bind(Uuid::new_v4())
      .bind(owner_id)
      .bind(project.id)
      .bind(format!("Task {}", i))
      .execute(&pool)
      .await
      .unwrap();
    }

    let page = repo
      .list_for_user(owner_id, None, Page::new(None, None, 15))
      .await
      .unwrap();
    assert_eq!(page.total, 2);

    let tracked = page
      .items
      .iter()
      .find(|s| s.project.id == project.id)
      .unwrap();
    assert_eq!(tracked.tasks_count, 3);
    assert_eq!(tracked.members.len(), 1);
    assert_eq!(tracked.members[0].user_id, member_id);

    let bare = page.items.iter().find(|s| s.project.id == bare.id).unwrap();
    assert_eq!(bare.tasks_count, 0);
    assert!(bare.members.is_empty());
  }

  #[tokio::test]
  async fn test_list_for_user_search_and_paging() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresProjectRepository::new(pool.clone());

    let owner_id = create_test_user(&pool).await;
    repo
      .create(Project::new("Website redesign".to_string(), None, owner_id))
      .await
      .unwrap();
    repo
      .create(Project::new(
        "Backend".to_string(),
        Some("website API".to_string()),
        owner_id,
      ))
      .await
      .unwrap();
    repo
      .create(Project::new("Unrelated".to_string(), None, owner_id))
      .await
      .unwrap();

    // Search covers names only, not descriptions
    let matched = repo
      .list_for_user(owner_id, Some("WEBSITE"), Page::new(None, None, 15))
      .await
      .unwrap();
    assert_eq!(matched.total, 1);
    assert_eq!(matched.items[0].project.name, "Website redesign");

    let first = repo
      .list_for_user(owner_id, None, Page::new(Some(1), Some(2), 15))
      .await
      .unwrap();
    assert_eq!(first.items.len(), 2);
    assert_eq!(first.total, 3);

    let second = repo
      .list_for_user(owner_id, None, Page::new(Some(2), Some(2), 15))
      .await
      .unwrap();
    assert_eq!(second.items.len(), 1);
  }

  #[tokio::test]
  async fn test_update_project() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresProjectRepository::new(pool.clone());

    let owner_id = create_test_user(&pool).await;
    let mut project = repo
      .create(Project::new("Before".to_string(), Some("desc".to_string()), owner_id))
      .await
      .unwrap();

    project.name = "After".to_string();
    project.description = None;

    let updated = repo.update(project).await.unwrap();
    assert_eq!(updated.name, "After");
    assert!(updated.description.is_none());
  }

  #[tokio::test]
  async fn test_delete_missing_project_is_not_found() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresProjectRepository::new(pool);

    let result = repo.delete(Uuid::new_v4()).await;
    assert!(matches!(
      result,
      Err(ProjectError::Repository(RepositoryError::NotFound))
    ));
  }

  #[tokio::test]
  async fn test_count_tasks() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresProjectRepository::new(pool.clone());

    let owner_id = create_test_user(&pool).await;
    let project = repo
      .create(Project::new("Counted".to_string(), None, owner_id))
      .await
      .unwrap();

    for i in 0..2 {
      sqlx::query(
        r#"
                INSERT INTO tasks (id, creator_id, project_id, title, is_completed, priority, created_at, updated_at)
                VALUES ($1, $2, $3, $4, false, 1, NOW(), NOW())
                "#,
      )
      .bind(Uuid::new_v4())
      .bind(owner_id)
      .bind(project.id)
      .bind(format!("Task {}", i))
      .execute(&pool)
      .await
      .unwrap();
    }

    assert_eq!(repo.count_tasks(project.id).await.unwrap(), 2);
  }
}
