use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::auth::entities::{Gender, User};
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::UserRepository;
use crate::domain::auth::value_objects::Email;

/// Database row structure for the users table
#[derive(Debug, FromRow)]
struct UserRow {
  id: Uuid,
  name: String,
  email: String,
  password_hash: String,
  mobile: Option<String>,
  gender: Option<String>,
  avatar_path: Option<String>,
  is_admin: bool,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl UserRow {
  fn into_user(self) -> User {
    User {
      id: self.id,
      name: self.name,
      email: self.email,
      password_hash: self.password_hash,
      mobile: self.mobile,
      gender: self.gender.as_deref().and_then(|g| Gender::parse(g).ok()),
      avatar_path: self.avatar_path,
      is_admin: self.is_admin,
      created_at: self.created_at,
      updated_at: self.updated_at,
    }
  }
}

const USER_COLUMNS: &str =
  "id, name, email, password_hash, mobile, gender, avatar_path, is_admin, created_at, updated_at";

/// PostgreSQL implementation of the UserRepository trait
pub struct PostgresUserRepository {
  pool: PgPool,
}

impl PostgresUserRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
  async fn create(&self, user: User) -> Result<User, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
      r#"
            INSERT INTO users (id, name, email, password_hash, mobile, gender, avatar_path, is_admin, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {USER_COLUMNS}
            "#
    ))
    .bind(user.id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.mobile.as_deref())
    .bind(user.gender.map(|g| g.as_str()))
    .bind(user.avatar_path.as_deref())
    .bind(user.is_admin)
    .bind(user.created_at)
    .bind(user.updated_at)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to create user: {}", e);
      AuthError::from(e)
    })?;

    Ok(row.into_user())
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
      r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE id = $1
            "#
    ))
    .bind(id)
    .fetch_optional(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to find user by id: {}", e);
      AuthError::from(e)
    })?;

    Ok(row.map(UserRow::into_user))
  }

  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
      r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE LOWER(email) = LOWER($1)
            "#
    ))
    .bind(email.as_str())
    .fetch_optional(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to find user by email: {}", e);
      AuthError::from(e)
    })?;

    Ok(row.map(UserRow::into_user))
  }

  async fn update(&self, user: User) -> Result<User, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
      r#"
            UPDATE users
            SET name = $2,
                email = $3,
                password_hash = $4,
                mobile = $5,
                gender = $6,
                avatar_path = $7,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
    ))
    .bind(user.id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.mobile.as_deref())
    .bind(user.gender.map(|g| g.as_str()))
    .bind(user.avatar_path.as_deref())
    .fetch_one(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to update user {}: {}", user.id, e);
      AuthError::from(e)
    })?;

    Ok(row.into_user())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::errors::RepositoryError;
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

  fn sample_user(email: &str) -> User {
    User::new(
      "Test User".to_string(),
      email.to_string(),
      "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHQ$hashhashhashhash".to_string(),
    )
  }

  #[tokio::test]
  async fn test_create_and_find_user() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresUserRepository::new(pool);

    let user = sample_user("create@example.com");
    let created = repo.create(user.clone()).await.unwrap();
    assert_eq!(created.email, "create@example.com");
    assert!(!created.is_admin);

    let found = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(found.id, created.id);
    assert_eq!(found.name, "Test User");
  }

  #[tokio::test]
  async fn test_find_by_email_is_case_insensitive() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresUserRepository::new(pool);

    repo
      .create(sample_user("mixed@example.com"))
      .await
      .unwrap();

    let email = Email::new("Mixed@Example.COM").unwrap();
    let found = repo.find_by_email(&email).await.unwrap();
    assert!(found.is_some());
  }

  #[tokio::test]
  async fn test_duplicate_email_rejected() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresUserRepository::new(pool);

    repo.create(sample_user("dup@example.com")).await.unwrap();

    let result = repo.create(sample_user("dup@example.com")).await;
    assert!(matches!(
      result,
      Err(AuthError::Repository(RepositoryError::DuplicateKey(_)))
    ));
  }

  #[tokio::test]
  async fn test_duplicate_mobile_rejected() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresUserRepository::new(pool);

    let mut first = sample_user("first@example.com");
    first.mobile = Some("+15550001111".to_string());
    repo.create(first).await.unwrap();

    let mut second = sample_user("second@example.com");
    second.mobile = Some("+15550001111".to_string());
    let result = repo.create(second).await;
    assert!(matches!(
      result,
      Err(AuthError::Repository(RepositoryError::DuplicateKey(_)))
    ));
  }

  #[tokio::test]
  async fn test_update_profile_fields() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresUserRepository::new(pool);

    let mut user = repo.create(sample_user("update@example.com")).await.unwrap();
    user.name = "Renamed".to_string();
    user.gender = Some(Gender::Other);
    user.mobile = Some("+15550002222".to_string());

    let updated = repo.update(user).await.unwrap();
    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.gender, Some(Gender::Other));
    assert_eq!(updated.mobile.as_deref(), Some("+15550002222"));
  }
}
