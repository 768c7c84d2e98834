use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::admin::entities::{
  AdminProjectFilter, AdminSummary, AdminTaskFilter, ProjectNode, ProjectOverview,
  RecentActivity, TaskOverview, Totals, UserNode, UserOverview,
};
use crate::domain::admin::ports::AdminRepository;
use crate::domain::auth::errors::RepositoryError;
use crate::domain::task::entities::{Page, PageResult, Priority};

#[derive(Debug, FromRow)]
struct UserOverviewRow {
  id: Uuid,
  name: String,
  email: String,
  mobile: Option<String>,
  is_admin: bool,
}

impl UserOverviewRow {
  fn into_overview(self) -> UserOverview {
    UserOverview {
      id: self.id,
      name: self.name,
      email: self.email,
      mobile: self.mobile,
      is_admin: self.is_admin,
    }
  }
}

#[derive(Debug, FromRow)]
struct ProjectOverviewRow {
  id: Uuid,
  name: String,
  owner_id: Uuid,
  owner_name: String,
  owner_email: String,
  tasks_total: i64,
  created_at: DateTime<Utc>,
}

impl ProjectOverviewRow {
  fn into_overview(self) -> ProjectOverview {
    ProjectOverview {
      id: self.id,
      name: self.name,
      owner_id: self.owner_id,
      owner_name: self.owner_name,
      owner_email: self.owner_email,
      tasks_total: self.tasks_total,
      created_at: self.created_at,
    }
  }
}

#[derive(Debug, FromRow)]
struct TaskOverviewRow {
  id: Uuid,
  title: String,
  is_completed: bool,
  priority: i16,
  due_date: Option<DateTime<Utc>>,
  creator_id: Uuid,
  creator_name: String,
  creator_email: String,
  project_id: Option<Uuid>,
  project_name: Option<String>,
  created_at: DateTime<Utc>,
}

impl TaskOverviewRow {
  fn into_overview(self) -> Result<TaskOverview, RepositoryError> {
    let priority = Priority::from_i16(self.priority)
      .map_err(|_| RepositoryError::DatabaseError(format!("bad priority {}", self.priority)))?;

    Ok(TaskOverview {
      id: self.id,
      title: self.title,
      is_completed: self.is_completed,
      priority,
      due_date: self.due_date,
      creator_id: self.creator_id,
      creator_name: self.creator_name,
      creator_email: self.creator_email,
      project_id: self.project_id,
      project_name: self.project_name,
      created_at: self.created_at,
    })
  }
}

#[derive(Debug, FromRow)]
struct TreeRow {
  user_id: Uuid,
  user_name: String,
  user_email: String,
  is_admin: bool,
  project_id: Option<Uuid>,
  project_name: Option<String>,
  tasks_total: Option<i64>,
  tasks_done: Option<i64>,
}

const PROJECT_OVERVIEW_SELECT: &str = "SELECT p.id, p.name, p.owner_id, \
     u.name AS owner_name, u.email AS owner_email, \
     (SELECT COUNT(*) FROM tasks t WHERE t.project_id = p.id) AS tasks_total, \
     p.created_at \
     FROM projects p JOIN users u ON u.id = p.owner_id";

const TASK_OVERVIEW_SELECT: &str = "SELECT t.id, t.title, t.is_completed, t.priority, \
     t.due_date, t.creator_id, u.name AS creator_name, u.email AS creator_email, \
     t.project_id, p.name AS project_name, t.created_at \
     FROM tasks t \
     JOIN users u ON u.id = t.creator_id \
     LEFT JOIN projects p ON p.id = t.project_id";

fn push_task_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &AdminTaskFilter) {
  if let Some(q) = &filter.q {
    let pattern = format!("%{}%", q);
    builder
      .push(" AND (t.title ILIKE ")
      .push_bind(pattern.clone())
      .push(" OR t.description ILIKE ")
      .push_bind(pattern)
      .push(")");
  }
  if let Some(creator_id) = filter.creator_id {
    builder.push(" AND t.creator_id = ").push_bind(creator_id);
  }
  if let Some(project_id) = filter.project_id {
    builder.push(" AND t.project_id = ").push_bind(project_id);
  }
  if let Some(is_completed) = filter.is_completed {
    builder.push(" AND t.is_completed = ").push_bind(is_completed);
  }
  if let Some(due_from) = filter.due_from {
    builder.push(" AND t.due_date::date >= ").push_bind(due_from);
  }
  if let Some(due_to) = filter.due_to {
    builder.push(" AND t.due_date::date <= ").push_bind(due_to);
  }
}

/// PostgreSQL implementation of the cross-tenant reporting queries
pub struct PostgresAdminRepository {
  pool: PgPool,
}

impl PostgresAdminRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl AdminRepository for PostgresAdminRepository {
  async fn summary(&self) -> Result<AdminSummary, RepositoryError> {
    let totals: (i64, i64, i64) = sqlx::query_as(
      r#"
            SELECT
              (SELECT COUNT(*) FROM users),
              (SELECT COUNT(*) FROM projects),
              (SELECT COUNT(*) FROM tasks)
            "#,
    )
    .fetch_one(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to load summary totals: {}", e);
      RepositoryError::from(e)
    })?;

    let counters: (i64, i64, i64, i64) = sqlx::query_as(
      r#"
            SELECT
              COUNT(*) FILTER (WHERE is_completed AND completed_at::date = CURRENT_DATE),
              COUNT(*) FILTER (WHERE NOT is_completed),
              COUNT(*) FILTER (WHERE is_completed),
              COUNT(*) FILTER (WHERE NOT is_completed AND due_date::date < CURRENT_DATE)
            FROM tasks
            "#,
    )
    .fetch_one(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to load summary counters: {}", e);
      RepositoryError::from(e)
    })?;

    let recent_users = sqlx::query_as::<_, UserOverviewRow>(
      r#"
            SELECT id, name, email, mobile, is_admin
            FROM users
            ORDER BY created_at DESC, id DESC
            LIMIT 5
            "#,
    )
    .fetch_all(&self.pool)
    .await
    .map_err(RepositoryError::from)?;

    let recent_projects = sqlx::query_as::<_, ProjectOverviewRow>(&format!(
      "{PROJECT_OVERVIEW_SELECT} ORDER BY p.created_at DESC, p.id DESC LIMIT 5"
    ))
    .fetch_all(&self.pool)
    .await
    .map_err(RepositoryError::from)?;

    let recent_tasks = sqlx::query_as::<_, TaskOverviewRow>(&format!(
      "{TASK_OVERVIEW_SELECT} ORDER BY t.created_at DESC, t.id DESC LIMIT 5"
    ))
    .fetch_all(&self.pool)
    .await
    .map_err(RepositoryError::from)?;

    Ok(AdminSummary {
      totals: Totals {
        users: totals.0,
        projects: totals.1,
        tasks: totals.2,
      },
      today_completed: counters.0,
      pending_count: counters.1,
      completed_count: counters.2,
      overdue_count: counters.3,
      recent: RecentActivity {
        users: recent_users
          .into_iter()
          .map(UserOverviewRow::into_overview)
          .collect(),
        projects: recent_projects
          .into_iter()
          .map(ProjectOverviewRow::into_overview)
          .collect(),
        tasks: recent_tasks
          .into_iter()
          .map(TaskOverviewRow::into_overview)
          .collect::<Result<Vec<_>, _>>()?,
      },
    })
  }

  async fn tree(&self) -> Result<Vec<UserNode>, RepositoryError> {
    let rows = sqlx::query_as::<_, TreeRow>(
      r#"
            SELECT u.id AS user_id, u.name AS user_name, u.email AS user_email, u.is_admin,
                   p.id AS project_id, p.name AS project_name,
                   (SELECT COUNT(*) FROM tasks t WHERE t.project_id = p.id) AS tasks_total,
                   (SELECT COUNT(*) FROM tasks t WHERE t.project_id = p.id AND t.is_completed) AS tasks_done
            FROM users u
            LEFT JOIN projects p ON p.owner_id = u.id
            ORDER BY u.is_admin DESC, u.created_at DESC, u.id DESC, p.created_at DESC, p.id DESC
            "#,
    )
    .fetch_all(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to load oversight tree: {}", e);
      RepositoryError::from(e)
    })?;

    // Rows arrive grouped by user thanks to the ordering.
    let mut nodes: Vec<UserNode> = Vec::new();
    for row in rows {
      if nodes.last().map(|n| n.id) != Some(row.user_id) {
        nodes.push(UserNode {
          id: row.user_id,
          name: row.user_name.clone(),
          email: row.user_email.clone(),
          is_admin: row.is_admin,
          projects: Vec::new(),
        });
      }

      if let (Some(project_id), Some(project_name)) = (row.project_id, row.project_name) {
        let total = row.tasks_total.unwrap_or(0);
        let done = row.tasks_done.unwrap_or(0);
        if let Some(node) = nodes.last_mut() {
          node.projects.push(ProjectNode {
            id: project_id,
            name: project_name,
            tasks_total: total,
            tasks_done: done,
            tasks_pending: total - done,
          });
        }
      }
    }

    Ok(nodes)
  }

  async fn list_users(
    &self,
    q: Option<&str>,
    page: Page,
  ) -> Result<PageResult<UserOverview>, RepositoryError> {
    let mut count_builder =
      QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users u WHERE TRUE");
    let mut builder = QueryBuilder::<Postgres>::new(
      "SELECT u.id, u.name, u.email, u.mobile, u.is_admin FROM users u WHERE TRUE",
    );

    if let Some(q) = q {
      let pattern = format!("%{}%", q);
      for b in [&mut count_builder, &mut builder] {
        b.push(" AND (u.name ILIKE ")
          .push_bind(pattern.clone())
          .push(" OR u.email ILIKE ")
          .push_bind(pattern.clone())
          .push(" OR u.mobile ILIKE ")
          .push_bind(pattern.clone())
          .push(")");
      }
    }

    let total: i64 = count_builder
      .build_query_scalar()
      .fetch_one(&self.pool)
      .await
      .map_err(RepositoryError::from)?;

    builder.push(" ORDER BY u.is_admin DESC, u.created_at DESC, u.id DESC");
    builder.push(" LIMIT ").push_bind(page.limit());
    builder.push(" OFFSET ").push_bind(page.offset());

    let rows: Vec<UserOverviewRow> = builder
      .build_query_as()
      .fetch_all(&self.pool)
      .await
      .map_err(|e| {
        tracing::error!("Failed to list users: {}", e);
        RepositoryError::from(e)
      })?;

    Ok(PageResult {
      items: rows
        .into_iter()
        .map(UserOverviewRow::into_overview)
        .collect(),
      page: page.page,
      per_page: page.per_page,
      total,
    })
  }

  async fn list_projects(
    &self,
    filter: &AdminProjectFilter,
    page: Page,
  ) -> Result<PageResult<ProjectOverview>, RepositoryError> {
    let mut count_builder = QueryBuilder::<Postgres>::new(
      "SELECT COUNT(*) FROM projects p JOIN users u ON u.id = p.owner_id WHERE TRUE",
    );
    let mut builder =
      QueryBuilder::<Postgres>::new(format!("{PROJECT_OVERVIEW_SELECT} WHERE TRUE"));

    for b in [&mut count_builder, &mut builder] {
      if let Some(q) = &filter.q {
        let pattern = format!("%{}%", q);
        b.push(" AND (p.name ILIKE ")
          .push_bind(pattern.clone())
          .push(" OR p.description ILIKE ")
          .push_bind(pattern)
          .push(")");
      }
      if let Some(owner_id) = filter.owner_id {
        b.push(" AND p.owner_id = ").push_bind(owner_id);
      }
    }

    let total: i64 = count_builder
      .build_query_scalar()
      .fetch_one(&self.pool)
      .await
      .map_err(RepositoryError::from)?;

    builder.push(" ORDER BY p.created_at DESC, p.id DESC");
    builder.push(" LIMIT ").push_bind(page.limit());
    builder.push(" OFFSET ").push_bind(page.offset());

    let rows: Vec<ProjectOverviewRow> = builder
      .build_query_as()
      .fetch_all(&self.pool)
      .await
      .map_err(|e| {
        tracing::error!("Failed to list projects: {}", e);
        RepositoryError::from(e)
      })?;

    Ok(PageResult {
      items: rows
        .into_iter()
        .map(ProjectOverviewRow::into_overview)
        .collect(),
      page: page.page,
      per_page: page.per_page,
      total,
    })
  }

  async fn projects_for_user(
    &self,
    owner_id: Uuid,
  ) -> Result<Vec<ProjectOverview>, RepositoryError> {
    let rows = sqlx::query_as::<_, ProjectOverviewRow>(&format!(
      "{PROJECT_OVERVIEW_SELECT} WHERE p.owner_id = $1 ORDER BY p.created_at DESC, p.id DESC"
    ))
    .bind(owner_id)
    .fetch_all(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to list projects for owner {}: {}", owner_id, e);
      RepositoryError::from(e)
    })?;

    Ok(
      rows
        .into_iter()
        .map(ProjectOverviewRow::into_overview)
        .collect(),
    )
  }

  async fn list_tasks(
    &self,
    filter: &AdminTaskFilter,
    page: Page,
  ) -> Result<PageResult<TaskOverview>, RepositoryError> {
    let mut count_builder =
      QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM tasks t WHERE TRUE");
    push_task_filters(&mut count_builder, filter);

    let total: i64 = count_builder
      .build_query_scalar()
      .fetch_one(&self.pool)
      .await
      .map_err(RepositoryError::from)?;

    let mut builder = QueryBuilder::<Postgres>::new(format!("{TASK_OVERVIEW_SELECT} WHERE TRUE"));
    push_task_filters(&mut builder, filter);
    builder.push(
      " ORDER BY t.is_completed ASC, (t.due_date IS NULL) ASC, t.due_date ASC, \
         t.created_at DESC, t.id DESC",
    );
    builder.push(" LIMIT ").push_bind(page.limit());
    builder.push(" OFFSET ").push_bind(page.offset());

    let rows: Vec<TaskOverviewRow> = builder
      .build_query_as()
      .fetch_all(&self.pool)
      .await
      .map_err(|e| {
        tracing::error!("Failed to list tasks: {}", e);
        RepositoryError::from(e)
      })?;

    Ok(PageResult {
      items: rows
        .into_iter()
        .map(TaskOverviewRow::into_overview)
        .collect::<Result<Vec<_>, _>>()?,
      page: page.page,
      per_page: page.per_page,
      total,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use sqlx::postgres::PgPoolOptions;
  use testcontainers::ImageExt;
  use testcontainers_modules::postgres::Postgres as PostgresImage;
  use testcontainers_modules::testcontainers::{ContainerAsync, runners::AsyncRunner};

  async fn setup_test_db() -> (PgPool, ContainerAsync<PostgresImage>) {
    let container = PostgresImage::default()
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

  async fn create_user(pool: &PgPool, name: &str, is_admin: bool) -> Uuid {
    let user_id = Uuid::new_v4();
    let email = format!("test_{}@example.com", user_id);
    sqlx::query(
      r#"
            INSERT INTO users (id, name, email, password_hash, is_admin, created_at, updated_at)
            VALUES ($1, $2, $3, 'hash', $4, NOW(), NOW())
            "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(&email)
    .bind(is_admin)
    .execute(pool)
    .await
    .expect("Failed to create test user");
    user_id
  }

  async fn create_project(pool: &PgPool, owner_id: Uuid, name: &str) -> Uuid {
    let project_id = Uuid::new_v4();
    sqlx::query(
      r#"
            INSERT INTO projects (id, name, owner_id, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            "#,
    )
    .bind(project_id)
    .bind(name)
    .bind(owner_id)
    .execute(pool)
    .await
    .expect("Failed to create test project");
    project_id
  }

  async fn create_task(pool: &PgPool, creator_id: Uuid, project_id: Option<Uuid>, done: bool) {
    sqlx::query(
      r#"
            INSERT INTO tasks (id, creator_id, project_id, title, is_completed, completed_at,
                               priority, created_at, updated_at)
            VALUES ($1, $2, $3, 'Task', $4, CASE WHEN $4 THEN NOW() ELSE NULL END, 1, NOW(), NOW())
            "#,
    )
    .bind(Uuid::new_v4())
    .bind(creator_id)
    .bind(project_id)
    .bind(done)
    .execute(pool)
    .await
    .expect("Failed to create test task");
  }

  #[tokio::test]
  async fn test_summary_counts() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresAdminRepository::new(pool.clone());

    let user_id = create_user(&pool, "Owner", false).await;
    let project_id = create_project(&pool, user_id, "Project").await;
    create_task(&pool, user_id, Some(project_id), true).await;
    create_task(&pool, user_id, None, false).await;

    let summary = repo.summary().await.unwrap();
    assert_eq!(summary.totals.users, 1);
    assert_eq!(summary.totals.projects, 1);
    assert_eq!(summary.totals.tasks, 2);
    assert_eq!(summary.completed_count, 1);
    assert_eq!(summary.pending_count, 1);
    assert_eq!(summary.today_completed, 1);
    assert_eq!(summary.recent.tasks.len(), 2);
  }

  #[tokio::test]
  async fn test_tree_groups_projects_under_owner() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresAdminRepository::new(pool.clone());

    let admin_id = create_user(&pool, "Admin", true).await;
    let owner_id = create_user(&pool, "Owner", false).await;
    let project_id = create_project(&pool, owner_id, "Owned").await;
    create_task(&pool, owner_id, Some(project_id), true).await;
    create_task(&pool, owner_id, Some(project_id), false).await;

    let tree = repo.tree().await.unwrap();
    assert_eq!(tree.len(), 2);
    // Admins sort first
    assert_eq!(tree[0].id, admin_id);
    assert!(tree[0].projects.is_empty());

    let owner_node = &tree[1];
    assert_eq!(owner_node.projects.len(), 1);
    assert_eq!(owner_node.projects[0].tasks_total, 2);
    assert_eq!(owner_node.projects[0].tasks_done, 1);
    assert_eq!(owner_node.projects[0].tasks_pending, 1);
  }

  #[tokio::test]
  async fn test_list_users_search() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresAdminRepository::new(pool.clone());

    create_user(&pool, "Alice Smith", false).await;
    create_user(&pool, "Bob Jones", false).await;

    let page = Page::new(None, None, 15);
    let result = repo.list_users(Some("alice"), page).await.unwrap();
    assert_eq!(result.total, 1);
    assert_eq!(result.items[0].name, "Alice Smith");
  }

  #[tokio::test]
  async fn test_list_users_puts_admins_first() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresAdminRepository::new(pool.clone());

    create_user(&pool, "Regular", false).await;
    let admin_id = create_user(&pool, "Admin", true).await;
    create_user(&pool, "Later Regular", false).await;

    let result = repo.list_users(None, Page::new(None, None, 15)).await.unwrap();
    assert_eq!(result.total, 3);
    assert_eq!(result.items[0].id, admin_id);
    assert!(result.items[0].is_admin);
  }

  #[tokio::test]
  async fn test_list_projects_with_owner_filter() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresAdminRepository::new(pool.clone());

    let first_owner = create_user(&pool, "First", false).await;
    let second_owner = create_user(&pool, "Second", false).await;
    create_project(&pool, first_owner, "Mine").await;
    create_project(&pool, second_owner, "Theirs").await;

    let page = Page::new(None, None, 15);
    let filter = AdminProjectFilter {
      owner_id: Some(first_owner),
      ..Default::default()
    };
    let result = repo.list_projects(&filter, page).await.unwrap();
    assert_eq!(result.total, 1);
    assert_eq!(result.items[0].name, "Mine");
    assert_eq!(result.items[0].owner_name, "First");
  }

  #[tokio::test]
  async fn test_list_tasks_includes_creator_context() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresAdminRepository::new(pool.clone());

    let creator_id = create_user(&pool, "Creator", false).await;
    let project_id = create_project(&pool, creator_id, "Context").await;
    create_task(&pool, creator_id, Some(project_id), false).await;

    let page = Page::new(None, None, 15);
    let result = repo
      .list_tasks(&AdminTaskFilter::default(), page)
      .await
      .unwrap();

    assert_eq!(result.total, 1);
    assert_eq!(result.items[0].creator_name, "Creator");
    assert_eq!(result.items[0].project_name.as_deref(), Some("Context"));
  }
}
