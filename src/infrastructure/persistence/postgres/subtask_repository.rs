use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::task::entities::{Page, PageResult, Priority, Subtask, SubtaskFilter};
use crate::domain::task::errors::TaskError;
use crate::domain::task::ports::SubtaskRepository;

/// Database row structure for the subtasks table
#[derive(Debug, FromRow)]
struct SubtaskRow {
  id: Uuid,
  task_id: Uuid,
  title: String,
  description: Option<String>,
  is_completed: bool,
  completed_at: Option<DateTime<Utc>>,
  priority: i16,
  category: Option<String>,
  due_date: Option<NaiveDate>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl SubtaskRow {
  fn into_subtask(self) -> Result<Subtask, TaskError> {
    Ok(Subtask {
      id: self.id,
      task_id: self.task_id,
      title: self.title,
      description: self.description,
      is_completed: self.is_completed,
      completed_at: self.completed_at,
      priority: Priority::from_i16(self.priority)?,
      category: self.category,
      due_date: self.due_date,
      created_at: self.created_at,
      updated_at: self.updated_at,
    })
  }
}

const SUBTASK_COLUMNS: &str = "s.id, s.task_id, s.title, s.description, s.is_completed, \
     s.completed_at, s.priority, s.category, s.due_date, s.created_at, s.updated_at";

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &SubtaskFilter) {
  if let Some(q) = &filter.q {
    let pattern = format!("%{}%", q);
    builder
      .push(" AND (s.title ILIKE ")
      .push_bind(pattern.clone())
      .push(" OR s.description ILIKE ")
      .push_bind(pattern)
      .push(")");
  }
  if let Some(is_completed) = filter.is_completed {
    builder.push(" AND s.is_completed = ").push_bind(is_completed);
  }
  if let Some(priority) = filter.priority {
    builder.push(" AND s.priority = ").push_bind(priority.as_i16());
  }
  if let Some(due_from) = filter.due_from {
    builder.push(" AND s.due_date >= ").push_bind(due_from);
  }
  if let Some(due_to) = filter.due_to {
    builder.push(" AND s.due_date <= ").push_bind(due_to);
  }
}

/// PostgreSQL implementation of the SubtaskRepository trait
pub struct PostgresSubtaskRepository {
  pool: PgPool,
}

impl PostgresSubtaskRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl SubtaskRepository for PostgresSubtaskRepository {
  async fn create(&self, subtask: Subtask) -> Result<Subtask, TaskError> {
    let row = sqlx::query_as::<_, SubtaskRow>(
      r#"
            INSERT INTO subtasks (id, task_id, title, description, is_completed, completed_at,
                                  priority, category, due_date, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, task_id, title, description, is_completed, completed_at,
                      priority, category, due_date, created_at, updated_at
            "#,
    )
    .bind(subtask.id)
    .bind(subtask.task_id)
    .bind(&subtask.title)
    .bind(subtask.description.as_deref())
    .bind(subtask.is_completed)
    .bind(subtask.completed_at)
    .bind(subtask.priority.as_i16())
    .bind(subtask.category.as_deref())
    .bind(subtask.due_date)
    .bind(subtask.created_at)
    .bind(subtask.updated_at)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to create subtask: {}", e);
      TaskError::from(e)
    })?;

    row.into_subtask()
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Subtask>, TaskError> {
    let row = sqlx::query_as::<_, SubtaskRow>(
      r#"
            SELECT id, task_id, title, description, is_completed, completed_at,
                   priority, category, due_date, created_at, updated_at
            FROM subtasks
            WHERE id = $1
            "#,
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to find subtask by id: {}", e);
      TaskError::from(e)
    })?;

    row.map(SubtaskRow::into_subtask).transpose()
  }

  async fn list_for_task(
    &self,
    task_id: Uuid,
    filter: &SubtaskFilter,
    page: Page,
  ) -> Result<PageResult<Subtask>, TaskError> {
    let mut count_builder =
      QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM subtasks s WHERE s.task_id = ");
    count_builder.push_bind(task_id);
    push_filters(&mut count_builder, filter);

    let total: i64 = count_builder
      .build_query_scalar()
      .fetch_one(&self.pool)
      .await
      .map_err(|e| {
        tracing::error!("Failed to count subtasks: {}", e);
        TaskError::from(e)
      })?;

    let mut builder = QueryBuilder::<Postgres>::new(format!(
      "SELECT {SUBTASK_COLUMNS} FROM subtasks s WHERE s.task_id = "
    ));
    builder.push_bind(task_id);
    push_filters(&mut builder, filter);
    builder.push(" ORDER BY s.created_at DESC, s.id DESC");
    builder.push(" LIMIT ").push_bind(page.limit());
    builder.push(" OFFSET ").push_bind(page.offset());

    let rows: Vec<SubtaskRow> = builder
      .build_query_as()
      .fetch_all(&self.pool)
      .await
      .map_err(|e| {
        tracing::error!("Failed to list subtasks: {}", e);
        TaskError::from(e)
      })?;

    let items = rows
      .into_iter()
      .map(SubtaskRow::into_subtask)
      .collect::<Result<Vec<_>, _>>()?;

    Ok(PageResult {
      items,
      page: page.page,
      per_page: page.per_page,
      total,
    })
  }

  async fn update(&self, subtask: Subtask) -> Result<Subtask, TaskError> {
    let row = sqlx::query_as::<_, SubtaskRow>(
      r#"
            UPDATE subtasks
            SET title = $2, description = $3, is_completed = $4, completed_at = $5,
                priority = $6, category = $7, due_date = $8, updated_at = NOW()
            WHERE id = $1
            RETURNING id, task_id, title, description, is_completed, completed_at,
                      priority, category, due_date, created_at, updated_at
            "#,
    )
    .bind(subtask.id)
    .bind(&subtask.title)
    .bind(subtask.description.as_deref())
    .bind(subtask.is_completed)
    .bind(subtask.completed_at)
    .bind(subtask.priority.as_i16())
    .bind(subtask.category.as_deref())
    .bind(subtask.due_date)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to update subtask {}: {}", subtask.id, e);
      TaskError::from(e)
    })?;

    row.into_subtask()
  }

  async fn delete(&self, id: Uuid) -> Result<(), TaskError> {
    let result = sqlx::query("DELETE FROM subtasks WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await
      .map_err(|e| {
        tracing::error!("Failed to delete subtask {}: {}", id, e);
        TaskError::from(e)
      })?;

    if result.rows_affected() == 0 {
      return Err(TaskError::SubtaskNotFound);
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::task::entities::Task;
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

  async fn create_test_task(pool: &PgPool) -> Uuid {
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

    let task = Task::new(user_id, "Parent".to_string());
    sqlx::query(
      r#"
            INSERT INTO tasks (id, creator_id, title, is_completed, priority, created_at, updated_at)
            VALUES ($1, $2, $3, false, 1, NOW(), NOW())
            "#,
    )
    .bind(task.id)
    .bind(user_id)
    .bind(&task.title)
    .execute(pool)
    .await
    .expect("Failed to create test task");

    task.id
  }

  #[tokio::test]
  async fn test_create_and_list_subtasks() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresSubtaskRepository::new(pool.clone());

    let task_id = create_test_task(&pool).await;

    let mut first = Subtask::new(task_id, "First step".to_string());
    first.priority = Priority::High;
    repo.create(first).await.unwrap();
    repo
      .create(Subtask::new(task_id, "Second step".to_string()))
      .await
      .unwrap();

    let page = Page::new(None, None, 10);
    let result = repo
      .list_for_task(task_id, &SubtaskFilter::default(), page)
      .await
      .unwrap();

    assert_eq!(result.total, 2);
  }

  #[tokio::test]
  async fn test_list_orders_newest_first() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresSubtaskRepository::new(pool.clone());

    let task_id = create_test_task(&pool).await;
    for (title, minutes_ago) in [("Oldest", 30), ("Middle", 20), ("Newest", 10)] {
      sqlx::query(
        r#"
                INSERT INTO subtasks (id, task_id, title, is_completed, priority, created_at, updated_at)
                VALUES ($1, $2, $3, false, 1, NOW() - ($4 * INTERVAL '1 minute'), NOW())
                "#,
      )
      .bind(Uuid::new_v4())
      .bind(task_id)
      .bind(title)
      .bind(minutes_ago)
      .execute(&pool)
      .await
      .unwrap();
    }

    let result = repo
      .list_for_task(task_id, &SubtaskFilter::default(), Page::new(None, None, 10))
      .await
      .unwrap();
    let titles: Vec<&str> = result.items.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Newest", "Middle", "Oldest"]);
  }

  #[tokio::test]
  async fn test_list_scoped_to_task() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresSubtaskRepository::new(pool.clone());

    let task_a = create_test_task(&pool).await;
    let task_b = create_test_task(&pool).await;

    repo
      .create(Subtask::new(task_a, "Only on A".to_string()))
      .await
      .unwrap();

    let page = Page::new(None, None, 10);
    let result = repo
      .list_for_task(task_b, &SubtaskFilter::default(), page)
      .await
      .unwrap();
    assert_eq!(result.total, 0);
  }

  #[tokio::test]
  async fn test_filter_by_completion() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresSubtaskRepository::new(pool.clone());

    let task_id = create_test_task(&pool).await;

    let mut done = Subtask::new(task_id, "Done".to_string());
    done.set_completed(true);
    repo.create(done).await.unwrap();
    repo
      .create(Subtask::new(task_id, "Open".to_string()))
      .await
      .unwrap();

    let page = Page::new(None, None, 10);
    let filter = SubtaskFilter {
      is_completed: Some(false),
      ..Default::default()
    };
    let result = repo.list_for_task(task_id, &filter, page).await.unwrap();

    assert_eq!(result.total, 1);
    assert_eq!(result.items[0].title, "Open");
  }

  #[tokio::test]
  async fn test_update_completion_round_trip() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresSubtaskRepository::new(pool.clone());

    let task_id = create_test_task(&pool).await;
    let mut subtask = repo
      .create(Subtask::new(task_id, "Toggle me".to_string()))
      .await
      .unwrap();

    subtask.set_completed(true);
    let updated = repo.update(subtask).await.unwrap();
    assert!(updated.is_completed);
    assert!(updated.completed_at.is_some());
  }

  #[tokio::test]
  async fn test_cascade_delete_with_task() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresSubtaskRepository::new(pool.clone());

    let task_id = create_test_task(&pool).await;
    let subtask = repo
      .create(Subtask::new(task_id, "Goes with parent".to_string()))
      .await
      .unwrap();

    sqlx::query("DELETE FROM tasks WHERE id = $1")
      .bind(task_id)
      .execute(&pool)
      .await
      .unwrap();

    let found = repo.find_by_id(subtask.id).await.unwrap();
    assert!(found.is_none());
  }
}
