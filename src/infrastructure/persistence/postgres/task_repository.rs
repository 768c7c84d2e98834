use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::task::entities::{Page, PageResult, Priority, Task, TaskFilter, TaskStats};
use crate::domain::task::errors::TaskError;
use crate::domain::task::ports::TaskRepository;

/// Database row structure for the tasks table
#[derive(Debug, FromRow)]
struct TaskRow {
  id: Uuid,
  creator_id: Uuid,
  project_id: Option<Uuid>,
  title: String,
  description: Option<String>,
  is_completed: bool,
  completed_at: Option<DateTime<Utc>>,
  priority: i16,
  category: Option<String>,
  due_date: Option<DateTime<Utc>>,
  remind_at: Option<DateTime<Utc>>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl TaskRow {
  fn into_task(self) -> Result<Task, TaskError> {
    Ok(Task {
      id: self.id,
      creator_id: self.creator_id,
      project_id: self.project_id,
      title: self.title,
      description: self.description,
      is_completed: self.is_completed,
      completed_at: self.completed_at,
      priority: Priority::from_i16(self.priority)?,
      category: self.category,
      due_date: self.due_date,
      remind_at: self.remind_at,
      created_at: self.created_at,
      updated_at: self.updated_at,
    })
  }
}

const TASK_COLUMNS: &str = "t.id, t.creator_id, t.project_id, t.title, t.description, \
     t.is_completed, t.completed_at, t.priority, t.category, t.due_date, t.remind_at, \
     t.created_at, t.updated_at";

/// Deterministic listing order: open tasks first, then by due date with
/// undated tasks last, then newest first.
const TASK_ORDER: &str = " ORDER BY t.is_completed ASC, (t.due_date IS NULL) ASC, \
     t.due_date ASC, t.created_at DESC, t.id DESC";

/// A task is visible to a user if they created it or it sits in a
/// project they own or belong to.
fn push_visibility(builder: &mut QueryBuilder<'_, Postgres>, user_id: Uuid) {
  builder
    .push("(t.creator_id = ")
    .push_bind(user_id)
    .push(
      " OR EXISTS (SELECT 1 FROM projects p \
         LEFT JOIN project_members pm ON pm.project_id = p.id AND pm.user_id = ",
    )
    .push_bind(user_id)
    .push(" WHERE p.id = t.project_id AND (p.owner_id = ")
    .push_bind(user_id)
    .push(" OR pm.user_id IS NOT NULL)))");
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &TaskFilter) {
  if let Some(q) = &filter.q {
    let pattern = format!("%{}%", q);
    builder
      .push(" AND (t.title ILIKE ")
      .push_bind(pattern.clone())
      .push(" OR t.description ILIKE ")
      .push_bind(pattern)
      .push(")");
  }
  if let Some(is_completed) = filter.is_completed {
    builder.push(" AND t.is_completed = ").push_bind(is_completed);
  }
  if let Some(priority) = filter.priority {
    builder.push(" AND t.priority = ").push_bind(priority.as_i16());
  }
  if let Some(category) = &filter.category {
    builder.push(" AND t.category = ").push_bind(category.clone());
  }
  if let Some(project_id) = filter.project_id {
    builder.push(" AND t.project_id = ").push_bind(project_id);
  }
  if let Some(due_from) = filter.due_from {
    builder.push(" AND t.due_date::date >= ").push_bind(due_from);
  }
  if let Some(due_to) = filter.due_to {
    builder.push(" AND t.due_date::date <= ").push_bind(due_to);
  }
}

/// PostgreSQL implementation of the TaskRepository trait
pub struct PostgresTaskRepository {
  pool: PgPool,
}

impl PostgresTaskRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
  async fn create(&self, task: Task) -> Result<Task, TaskError> {
    let row = sqlx::query_as::<_, TaskRow>(
      r#"
            INSERT INTO tasks (id, creator_id, project_id, title, description, is_completed,
                               completed_at, priority, category, due_date, remind_at,
                               created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id, creator_id, project_id, title, description, is_completed,
                      completed_at, priority, category, due_date, remind_at,
                      created_at, updated_at
            "#,
    )
    .bind(task.id)
    .bind(task.creator_id)
    .bind(task.project_id)
    .bind(&task.title)
    .bind(task.description.as_deref())
    .bind(task.is_completed)
    .bind(task.completed_at)
    .bind(task.priority.as_i16())
    .bind(task.category.as_deref())
    .bind(task.due_date)
    .bind(task.remind_at)
    .bind(task.created_at)
    .bind(task.updated_at)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to create task: {}", e);
      TaskError::from(e)
    })?;

    row.into_task()
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, TaskError> {
    let row = sqlx::query_as::<_, TaskRow>(
      r#"
            SELECT id, creator_id, project_id, title, description, is_completed,
                   completed_at, priority, category, due_date, remind_at,
                   created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to find task by id: {}", e);
      TaskError::from(e)
    })?;

    row.map(TaskRow::into_task).transpose()
  }

  async fn list_visible(
    &self,
    user_id: Uuid,
    filter: &TaskFilter,
    page: Page,
  ) -> Result<PageResult<Task>, TaskError> {
    let mut count_builder =
      QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM tasks t WHERE ");
    push_visibility(&mut count_builder, user_id);
    push_filters(&mut count_builder, filter);

    let total: i64 = count_builder
      .build_query_scalar()
      .fetch_one(&self.pool)
      .await
      .map_err(|e| {
        tracing::error!("Failed to count tasks: {}", e);
        TaskError::from(e)
      })?;

    let mut builder =
      QueryBuilder::<Postgres>::new(format!("SELECT {TASK_COLUMNS} FROM tasks t WHERE "));
    push_visibility(&mut builder, user_id);
    push_filters(&mut builder, filter);
    builder.push(TASK_ORDER);
    builder.push(" LIMIT ").push_bind(page.limit());
    builder.push(" OFFSET ").push_bind(page.offset());

    let rows: Vec<TaskRow> = builder
      .build_query_as()
      .fetch_all(&self.pool)
      .await
      .map_err(|e| {
        tracing::error!("Failed to list tasks: {}", e);
        TaskError::from(e)
      })?;

    let items = rows
      .into_iter()
      .map(TaskRow::into_task)
      .collect::<Result<Vec<_>, _>>()?;

    Ok(PageResult {
      items,
      page: page.page,
      per_page: page.per_page,
      total,
    })
  }

  async fn due_soon(
    &self,
    user_id: Uuid,
    hours: i64,
    page: Page,
  ) -> Result<PageResult<Task>, TaskError> {
    let window_end = Utc::now() + chrono::Duration::hours(hours);

    let mut count_builder = QueryBuilder::<Postgres>::new(
      "SELECT COUNT(*) FROM tasks t WHERE t.is_completed = false AND t.due_date BETWEEN NOW() AND ",
    );
    count_builder.push_bind(window_end);
    count_builder.push(" AND ");
    push_visibility(&mut count_builder, user_id);

    let total: i64 = count_builder
      .build_query_scalar()
      .fetch_one(&self.pool)
      .await
      .map_err(|e| {
        tracing::error!("Failed to count due-soon tasks: {}", e);
        TaskError::from(e)
      })?;

    let mut builder = QueryBuilder::<Postgres>::new(format!(
      "SELECT {TASK_COLUMNS} FROM tasks t \
         WHERE t.is_completed = false AND t.due_date BETWEEN NOW() AND "
    ));
    builder.push_bind(window_end);
    builder.push(" AND ");
    push_visibility(&mut builder, user_id);
    builder.push(" ORDER BY t.due_date ASC, t.id ASC");
    builder.push(" LIMIT ").push_bind(page.limit());
    builder.push(" OFFSET ").push_bind(page.offset());

    let rows: Vec<TaskRow> = builder
      .build_query_as()
      .fetch_all(&self.pool)
      .await
      .map_err(|e| {
        tracing::error!("Failed to list due-soon tasks: {}", e);
        TaskError::from(e)
      })?;

    let items = rows
      .into_iter()
      .map(TaskRow::into_task)
      .collect::<Result<Vec<_>, _>>()?;

    Ok(PageResult {
      items,
      page: page.page,
      per_page: page.per_page,
      total,
    })
  }

  async fn stats(&self, user_id: Uuid) -> Result<TaskStats, TaskError> {
    let mut builder = QueryBuilder::<Postgres>::new(
      "SELECT \
         COUNT(*) FILTER (WHERE t.is_completed AND t.completed_at::date = CURRENT_DATE), \
         COUNT(*) FILTER (WHERE NOT t.is_completed AND t.due_date::date >= CURRENT_DATE) \
       FROM tasks t WHERE ",
    );
    push_visibility(&mut builder, user_id);

    let row: (i64, i64) = builder
      .build_query_as()
      .fetch_one(&self.pool)
      .await
      .map_err(|e| {
        tracing::error!("Failed to compute task stats: {}", e);
        TaskError::from(e)
      })?;

    Ok(TaskStats {
      today_completed: row.0,
      upcoming_count: row.1,
    })
  }

  async fn update(&self, task: Task) -> Result<Task, TaskError> {
    let row = sqlx::query_as::<_, TaskRow>(
      r#"
            UPDATE tasks
            SET project_id = $2, title = $3, description = $4, is_completed = $5,
                completed_at = $6, priority = $7, category = $8, due_date = $9,
                remind_at = $10, updated_at = NOW()
            WHERE id = $1
            RETURNING id, creator_id, project_id, title, description, is_completed,
                      completed_at, priority, category, due_date, remind_at,
                      created_at, updated_at
            "#,
    )
    .bind(task.id)
    .bind(task.project_id)
    .bind(&task.title)
    .bind(task.description.as_deref())
    .bind(task.is_completed)
    .bind(task.completed_at)
    .bind(task.priority.as_i16())
    .bind(task.category.as_deref())
    .bind(task.due_date)
    .bind(task.remind_at)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to update task {}: {}", task.id, e);
      TaskError::from(e)
    })?;

    row.into_task()
  }

  async fn delete(&self, id: Uuid) -> Result<(), TaskError> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await
      .map_err(|e| {
        tracing::error!("Failed to delete task {}: {}", id, e);
        TaskError::from(e)
      })?;

    if result.rows_affected() == 0 {
      return Err(TaskError::NotFound);
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Duration;
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

  async fn create_test_project(pool: &PgPool, owner_id: Uuid) -> Uuid {
    let project_id = Uuid::new_v4();
    sqlx::query(
      r#"
            INSERT INTO projects (id, name, owner_id, created_at, updated_at)
            VALUES ($1, 'Test Project', $2, NOW(), NOW())
            "#,
    )
    .bind(project_id)
    .bind(owner_id)
    .execute(pool)
    .await
    .expect("Failed to create test project");
    project_id
  }

  #[tokio::test]
  async fn test_create_and_find_task() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresTaskRepository::new(pool.clone());

    let user_id = create_test_user(&pool).await;
    let mut task = Task::new(user_id, "Write report".to_string());
    task.priority = Priority::High;
    task.category = Some("work".to_string());

    let created = repo.create(task.clone()).await.unwrap();
    assert_eq!(created.priority, Priority::High);

    let found = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(found.title, "Write report");
    assert_eq!(found.category.as_deref(), Some("work"));
  }

  #[tokio::test]
  async fn test_visibility_spans_project_membership() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresTaskRepository::new(pool.clone());

    let owner_id = create_test_user(&pool).await;
    let member_id = create_test_user(&pool).await;
    let outsider_id = create_test_user(&pool).await;
    let project_id = create_test_project(&pool, owner_id).await;

    sqlx::query(
      "INSERT INTO project_members (project_id, user_id, role, joined_at) VALUES ($1, $2, 'member', NOW())",
    )
    .bind(project_id)
    .bind(member_id)
    .execute(&pool)
    .await
    .unwrap();

    let mut task = Task::new(owner_id, "Shared".to_string());
    task.project_id = Some(project_id);
    repo.create(task).await.unwrap();

    let page = Page::new(None, None, 10);
    let filter = TaskFilter::default();

    let for_owner = repo.list_visible(owner_id, &filter, page).await.unwrap();
    assert_eq!(for_owner.total, 1);

    let for_member = repo.list_visible(member_id, &filter, page).await.unwrap();
    assert_eq!(for_member.total, 1);

    let for_outsider = repo.list_visible(outsider_id, &filter, page).await.unwrap();
    assert_eq!(for_outsider.total, 0);
  }

  #[tokio::test]
  async fn test_filters_combine_with_and() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresTaskRepository::new(pool.clone());

    let user_id = create_test_user(&pool).await;

    let mut groceries = Task::new(user_id, "Buy groceries".to_string());
    groceries.priority = Priority::Low;
    groceries.category = Some("errands".to_string());
    repo.create(groceries).await.unwrap();

    let mut report = Task::new(user_id, "Quarterly report".to_string());
    report.priority = Priority::High;
    report.description = Some("groceries budget included".to_string());
    repo.create(report).await.unwrap();

    let page = Page::new(None, None, 10);

    // q matches title and description
    let filter = TaskFilter {
      q: Some("groceries".to_string()),
      ..Default::default()
    };
    let result = repo.list_visible(user_id, &filter, page).await.unwrap();
    assert_eq!(result.total, 2);

    // q + priority narrows to one
    let filter = TaskFilter {
      q: Some("groceries".to_string()),
      priority: Some(Priority::High),
      ..Default::default()
    };
    let result = repo.list_visible(user_id, &filter, page).await.unwrap();
    assert_eq!(result.total, 1);
    assert_eq!(result.items[0].title, "Quarterly report");

    let filter = TaskFilter {
      category: Some("errands".to_string()),
      ..Default::default()
    };
    let result = repo.list_visible(user_id, &filter, page).await.unwrap();
    assert_eq!(result.total, 1);
  }

  #[tokio::test]
  async fn test_due_date_range_is_inclusive() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresTaskRepository::new(pool.clone());

    let user_id = create_test_user(&pool).await;
    let due = Utc::now() + Duration::days(3);

    let mut task = Task::new(user_id, "Dated".to_string());
    task.due_date = Some(due);
    repo.create(task).await.unwrap();

    let page = Page::new(None, None, 10);
    let filter = TaskFilter {
      due_from: Some(due.date_naive()),
      due_to: Some(due.date_naive()),
      ..Default::default()
    };
    let result = repo.list_visible(user_id, &filter, page).await.unwrap();
    assert_eq!(result.total, 1);

    let filter = TaskFilter {
      due_to: Some(due.date_naive() - Duration::days(1)),
      ..Default::default()
    };
    let result = repo.list_visible(user_id, &filter, page).await.unwrap();
    assert_eq!(result.total, 0);
  }

  #[tokio::test]
  async fn test_ordering_open_dated_first() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresTaskRepository::new(pool.clone());

    let user_id = create_test_user(&pool).await;

    let mut done = Task::new(user_id, "Done".to_string());
    done.set_completed(true);
    repo.create(done).await.unwrap();

    let undated = Task::new(user_id, "Undated".to_string());
    repo.create(undated).await.unwrap();

    let mut dated = Task::new(user_id, "Dated".to_string());
    dated.due_date = Some(Utc::now() + Duration::days(1));
    repo.create(dated).await.unwrap();

    let page = Page::new(None, None, 10);
    let result = repo
      .list_visible(user_id, &TaskFilter::default(), page)
      .await
      .unwrap();

    let titles: Vec<&str> = result.items.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Dated", "Undated", "Done"]);
  }

  #[tokio::test]
  async fn test_pagination_totals() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresTaskRepository::new(pool.clone());

    let user_id = create_test_user(&pool).await;
    for i in 0..5 {
      repo
        .create(Task::new(user_id, format!("Task {}", i)))
        .await
        .unwrap();
    }

    let page = Page::new(Some(2), Some(2), 10);
    let result = repo
      .list_visible(user_id, &TaskFilter::default(), page)
      .await
      .unwrap();

    assert_eq!(result.total, 5);
    assert_eq!(result.items.len(), 2);
    assert_eq!(result.page, 2);
  }

  #[tokio::test]
  async fn test_due_soon_window() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresTaskRepository::new(pool.clone());

    let user_id = create_test_user(&pool).await;

    let mut inside = Task::new(user_id, "Inside".to_string());
    inside.due_date = Some(Utc::now() + Duration::hours(2));
    repo.create(inside).await.unwrap();

    let mut outside = Task::new(user_id, "Outside".to_string());
    outside.due_date = Some(Utc::now() + Duration::hours(48));
    repo.create(outside).await.unwrap();

    let mut completed = Task::new(user_id, "Completed".to_string());
    completed.due_date = Some(Utc::now() + Duration::hours(2));
    completed.set_completed(true);
    repo.create(completed).await.unwrap();

    let page = Page::new(None, None, 50);
    let result = repo.due_soon(user_id, 24, page).await.unwrap();

    assert_eq!(result.total, 1);
    assert_eq!(result.items[0].title, "Inside");
  }

  #[tokio::test]
  async fn test_stats_counters() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresTaskRepository::new(pool.clone());

    let user_id = create_test_user(&pool).await;

    let mut completed_today = Task::new(user_id, "Completed today".to_string());
    completed_today.set_completed(true);
    repo.create(completed_today).await.unwrap();

    let mut upcoming = Task::new(user_id, "Upcoming".to_string());
    upcoming.due_date = Some(Utc::now() + Duration::days(2));
    repo.create(upcoming).await.unwrap();

    let mut overdue = Task::new(user_id, "Overdue".to_string());
    overdue.due_date = Some(Utc::now() - Duration::days(2));
    repo.create(overdue).await.unwrap();

    let stats = repo.stats(user_id).await.unwrap();
    assert_eq!(stats.today_completed, 1);
    assert_eq!(stats.upcoming_count, 1);
  }

  #[tokio::test]
  async fn test_stats_cover_member_project_tasks() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresTaskRepository::new(pool.clone());

    let owner_id = create_test_user(&pool).await;
    let member_id = create_test_user(&pool).await;
    let project_id = create_test_project(&pool, owner_id).await;

    sqlx::query(
      "INSERT INTO project_members (project_id, user_id, role, joined_at) VALUES ($1, $2, 'member', NOW())",
    )
    .bind(project_id)
    .bind(member_id)
    .execute(&pool)
    .await
    .unwrap();

    let mut done_in_project = Task::new(owner_id, "Done in project".to_string());
    done_in_project.project_id = Some(project_id);
    done_in_project.set_completed(true);
    repo.create(done_in_project).await.unwrap();

    let mut due_in_project = Task::new(owner_id, "Due in project".to_string());
    due_in_project.project_id = Some(project_id);
    due_in_project.due_date = Some(Utc::now() + Duration::days(1));
    repo.create(due_in_project).await.unwrap();

    let mut private_to_owner = Task::new(owner_id, "Private".to_string());
    private_to_owner.set_completed(true);
    repo.create(private_to_owner).await.unwrap();

    // The member never created a task, yet project tasks count for them
    let stats = repo.stats(member_id).await.unwrap();
    assert_eq!(stats.today_completed, 1);
    assert_eq!(stats.upcoming_count, 1);
  }

  #[tokio::test]
  async fn test_delete_missing_task_is_not_found() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresTaskRepository::new(pool);

    let result = repo.delete(Uuid::new_v4()).await;
    assert!(matches!(result, Err(TaskError::NotFound)));
  }
}
