use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::task::entities::PageResult;

/// Deserializer for fields where absence and explicit `null` differ:
/// a missing field stays `None`, `null` becomes `Some(None)`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
  T: Deserialize<'de>,
  D: Deserializer<'de>,
{
  Deserialize::deserialize(deserializer).map(Some)
}

// ===== Auth =====

/// Request for user registration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
  #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
  pub name: String,

  #[validate(email(message = "Invalid email format"))]
  pub email: String,

  #[validate(length(
    min = 8,
    max = 128,
    message = "Password must be between 8 and 128 characters"
  ))]
  pub password: String,

  #[validate(length(max = 20, message = "Mobile number must be at most 20 characters"))]
  pub mobile: Option<String>,

  /// `male`, `female` or `other`
  pub gender: Option<String>,
}

/// Request for user login
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
  #[validate(email(message = "Invalid email format"))]
  pub email: String,

  #[validate(length(min = 1, message = "Password is required"))]
  pub password: String,

  /// Whether to create a long-lived session
  #[serde(default)]
  pub remember_me: bool,
}

/// Response after successful registration or login
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
  pub user_id: Uuid,
  pub name: String,
  pub email: String,
  pub session_token: String,
  pub expires_at: DateTime<Utc>,
}

/// Response containing the current user's profile
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUserResponse {
  pub user_id: Uuid,
  pub name: String,
  pub email: String,
  pub mobile: Option<String>,
  pub gender: Option<String>,
  pub avatar_path: Option<String>,
  pub is_admin: bool,
  pub created_at: DateTime<Utc>,
}

/// Response after logout from all devices
#[derive(Debug, Clone, Serialize)]
pub struct LogoutAllResponse {
  pub sessions_revoked: u64,
  pub message: String,
}

// ===== Projects =====

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProjectRequest {
  #[validate(length(min = 1, max = 120, message = "Name must be between 1 and 120 characters"))]
  pub name: String,

  #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
  pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProjectRequest {
  #[validate(length(min = 1, max = 120, message = "Name must be between 1 and 120 characters"))]
  pub name: Option<String>,

  /// `null` clears the description, absence leaves it alone
  #[serde(default, deserialize_with = "double_option")]
  pub description: Option<Option<String>>,
}

/// Query parameters for the project listing
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectListQuery {
  pub q: Option<String>,
  pub page: Option<u32>,
  pub per_page: Option<u32>,
}

/// Request for adding a project member by email or user id
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddMemberRequest {
  #[validate(email(message = "Invalid email format"))]
  pub email: Option<String>,

  pub user_id: Option<Uuid>,

  /// `member` (default) or `owner`
  pub role: Option<String>,
}

// ===== Tasks =====

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTaskRequest {
  #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
  pub title: String,

  #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
  pub description: Option<String>,

  /// `low`/`medium`/`high` or `0`/`1`/`2`
  pub priority: Option<String>,

  #[validate(length(max = 50, message = "Category must be at most 50 characters"))]
  pub category: Option<String>,

  pub due_date: Option<DateTime<Utc>>,
  pub remind_at: Option<DateTime<Utc>>,
  pub project_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTaskRequest {
  #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
  pub title: Option<String>,

  #[serde(default, deserialize_with = "double_option")]
  pub description: Option<Option<String>>,

  pub is_completed: Option<bool>,
  pub priority: Option<String>,

  #[serde(default, deserialize_with = "double_option")]
  pub category: Option<Option<String>>,

  #[serde(default, deserialize_with = "double_option")]
  pub due_date: Option<Option<DateTime<Utc>>>,

  #[serde(default, deserialize_with = "double_option")]
  pub remind_at: Option<Option<DateTime<Utc>>>,

  /// `null` detaches the task from its project
  #[serde(default, deserialize_with = "double_option")]
  pub project_id: Option<Option<Uuid>>,
}

/// Query parameters for the task listing
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TaskListQuery {
  pub q: Option<String>,
  pub is_completed: Option<bool>,
  pub priority: Option<String>,
  pub category: Option<String>,
  pub project_id: Option<Uuid>,
  pub due_date_from: Option<NaiveDate>,
  pub due_date_to: Option<NaiveDate>,
  pub page: Option<u32>,
  pub per_page: Option<u32>,
}

/// Query parameters for the due-soon listing
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DueSoonQuery {
  pub hours: Option<i64>,
  pub page: Option<u32>,
  pub per_page: Option<u32>,
}

// ===== Subtasks =====

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSubtaskRequest {
  #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
  pub title: String,

  #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
  pub description: Option<String>,

  pub priority: Option<String>,

  #[validate(length(max = 50, message = "Category must be at most 50 characters"))]
  pub category: Option<String>,

  pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateSubtaskRequest {
  #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
  pub title: Option<String>,

  #[serde(default, deserialize_with = "double_option")]
  pub description: Option<Option<String>>,

  pub is_completed: Option<bool>,
  pub priority: Option<String>,

  #[serde(default, deserialize_with = "double_option")]
  pub category: Option<Option<String>>,

  #[serde(default, deserialize_with = "double_option")]
  pub due_date: Option<Option<NaiveDate>>,
}

/// Query parameters for the subtask listing
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SubtaskListQuery {
  pub q: Option<String>,
  pub is_completed: Option<bool>,
  pub priority: Option<String>,
  pub due_date_from: Option<NaiveDate>,
  pub due_date_to: Option<NaiveDate>,
  pub page: Option<u32>,
  pub per_page: Option<u32>,
}

// ===== Admin =====

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AdminUserListQuery {
  pub q: Option<String>,
  pub page: Option<u32>,
  pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AdminProjectListQuery {
  pub q: Option<String>,
  pub user_id: Option<Uuid>,
  pub page: Option<u32>,
  pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AdminTaskListQuery {
  pub q: Option<String>,
  pub user_id: Option<Uuid>,
  pub project_id: Option<Uuid>,
  pub is_completed: Option<bool>,
  pub date_from: Option<NaiveDate>,
  pub date_to: Option<NaiveDate>,
  pub page: Option<u32>,
  pub per_page: Option<u32>,
}

// ===== Shared =====

/// Paginated response envelope
#[derive(Debug, Clone, Serialize)]
pub struct PageResponse<T> {
  pub data: Vec<T>,
  pub page: u32,
  pub per_page: u32,
  pub total: i64,
  pub total_pages: i64,
}

impl<T> From<PageResult<T>> for PageResponse<T> {
  fn from(result: PageResult<T>) -> Self {
    let per_page = i64::from(result.per_page.max(1));
    let total_pages = (result.total + per_page - 1) / per_page;
    Self {
      data: result.items,
      page: result.page,
      per_page: result.per_page,
      total: result.total,
      total_pages,
    }
  }
}

/// Standard success response for operations without data
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
  pub message: String,
}

/// Standard error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
  pub error: String,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn double_option_distinguishes_null_from_absent() {
    #[derive(Deserialize)]
    struct Patch {
      #[serde(default, deserialize_with = "double_option")]
      description: Option<Option<String>>,
    }

    let absent: Patch = serde_json::from_str("{}").unwrap();
    assert_eq!(absent.description, None);

    let null: Patch = serde_json::from_str(r#"{"description":null}"#).unwrap();
    assert_eq!(null.description, Some(None));

    let value: Patch = serde_json::from_str(r#"{"description":"notes"}"#).unwrap();
    assert_eq!(value.description, Some(Some("notes".to_string())));
  }

  #[test]
  fn page_response_computes_total_pages() {
    let result = PageResult {
      items: vec![1, 2, 3],
      page: 1,
      per_page: 10,
      total: 25,
    };
    let response: PageResponse<i32> = result.into();
    assert_eq!(response.total_pages, 3);

    let empty = PageResult::<i32> {
      items: vec![],
      page: 1,
      per_page: 10,
      total: 0,
    };
    let response: PageResponse<i32> = empty.into();
    assert_eq!(response.total_pages, 0);
  }

  #[test]
  fn register_request_rejects_short_password() {
    use validator::Validate;

    let request = RegisterRequest {
      name: "Dana".to_string(),
      email: "dana@example.com".to_string(),
      password: "short".to_string(),
      mobile: None,
      gender: None,
    };
    assert!(request.validate().is_err());
  }
}
