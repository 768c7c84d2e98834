use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::net::IpAddr;
use uuid::Uuid;

use crate::domain::auth::entities::Session;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::SessionRepository;

/// Database row structure for the sessions table
#[derive(Debug, FromRow)]
struct SessionRow {
  id: Uuid,
  user_id: Uuid,
  token_hash: String,
  ip_address: Option<String>,
  user_agent: Option<String>,
  expires_at: DateTime<Utc>,
  created_at: DateTime<Utc>,
}

impl SessionRow {
  fn into_session(self) -> Session {
    Session {
      id: self.id,
      user_id: self.user_id,
      token_hash: self.token_hash,
      ip_address: self.ip_address.and_then(|ip| ip.parse::<IpAddr>().ok()),
      user_agent: self.user_agent,
      expires_at: self.expires_at,
      created_at: self.created_at,
    }
  }
}

/// PostgreSQL implementation of the SessionRepository trait
pub struct PostgresSessionRepository {
  pool: PgPool,
}

impl PostgresSessionRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
  async fn create(&self, session: Session) -> Result<Session, AuthError> {
    let ip_address = session.ip_address.map(|ip| ip.to_string());

    let row = sqlx::query_as::<_, SessionRow>(
      r#"
            INSERT INTO sessions (id, user_id, token_hash, ip_address, user_agent, expires_at, created_at)
            VALUES ($1, $2, $3, CAST($4 AS INET), $5, $6, $7)
            RETURNING id, user_id, token_hash, HOST(ip_address) as ip_address, user_agent, expires_at, created_at
            "#,
    )
    .bind(session.id)
    .bind(session.user_id)
    .bind(&session.token_hash)
    .bind(ip_address.as_deref())
    .bind(session.user_agent.as_deref())
    .bind(session.expires_at)
    .bind(session.created_at)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to create session: {}", e);
      AuthError::from(e)
    })?;

    Ok(row.into_session())
  }

  async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, AuthError> {
    let row = sqlx::query_as::<_, SessionRow>(
      r#"
            SELECT id, user_id, token_hash, HOST(ip_address) as ip_address, user_agent, expires_at, created_at
            FROM sessions
            WHERE token_hash = $1
            "#,
    )
    .bind(token_hash)
    .fetch_optional(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to find session by token hash: {}", e);
      AuthError::from(e)
    })?;

    Ok(row.map(SessionRow::into_session))
  }

  async fn delete(&self, session_id: Uuid) -> Result<(), AuthError> {
    sqlx::query("DELETE FROM sessions WHERE id = $1")
      .bind(session_id)
      .execute(&self.pool)
      .await
      .map_err(|e| {
        tracing::error!("Failed to delete session: {}", e);
        AuthError::from(e)
      })?;

    Ok(())
  }

  async fn delete_all_for_user(&self, user_id: Uuid) -> Result<u64, AuthError> {
    let result = sqlx::query("DELETE FROM sessions WHERE user_id = $1")
      .bind(user_id)
      .execute(&self.pool)
      .await
      .map_err(|e| {
        tracing::error!("Failed to delete all sessions for user {}: {}", user_id, e);
        AuthError::from(e)
      })?;

    Ok(result.rows_affected())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Duration;
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
  async fn test_create_and_find_session() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresSessionRepository::new(pool.clone());

    let user_id = create_test_user(&pool).await;
    let session = Session::with_duration(
      user_id,
      "a".repeat(64),
      Duration::hours(1),
      Some("127.0.0.1".parse().unwrap()),
      Some("Mozilla/5.0".to_string()),
    );

    let created = repo.create(session.clone()).await.unwrap();
    assert_eq!(created.id, session.id);

    let found = repo.find_by_token_hash(&"a".repeat(64)).await.unwrap();
    assert!(found.is_some());
    assert_eq!(found.unwrap().user_id, user_id);
  }

  #[tokio::test]
  async fn test_delete_session() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresSessionRepository::new(pool.clone());

    let user_id = create_test_user(&pool).await;
    let session =
      Session::with_duration(user_id, "b".repeat(64), Duration::hours(1), None, None);
    let created = repo.create(session).await.unwrap();

    repo.delete(created.id).await.unwrap();

    let found = repo.find_by_token_hash(&"b".repeat(64)).await.unwrap();
    assert!(found.is_none());
  }

  #[tokio::test]
  async fn test_delete_all_for_user_counts_rows() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresSessionRepository::new(pool.clone());

    let user_id = create_test_user(&pool).await;
    for i in 0..3 {
      let session = Session::with_duration(
        user_id,
        format!("{:064}", i),
        Duration::hours(1),
        None,
        None,
      );
      repo.create(session).await.unwrap();
    }

    let removed = repo.delete_all_for_user(user_id).await.unwrap();
    assert_eq!(removed, 3);
  }
}
