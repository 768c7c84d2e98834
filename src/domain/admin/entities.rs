use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::task::entities::Priority;

/// Row counts across the whole system
#[derive(Debug, Clone, Serialize)]
pub struct Totals {
  pub users: i64,
  pub projects: i64,
  pub tasks: i64,
}

/// Trimmed user row for admin listings and snapshots
#[derive(Debug, Clone, Serialize)]
pub struct UserOverview {
  pub id: Uuid,
  pub name: String,
  pub email: String,
  pub mobile: Option<String>,
  pub is_admin: bool,
}

/// Project row with owner details and a task count
#[derive(Debug, Clone, Serialize)]
pub struct ProjectOverview {
  pub id: Uuid,
  pub name: String,
  pub owner_id: Uuid,
  pub owner_name: String,
  pub owner_email: String,
  pub tasks_total: i64,
  pub created_at: DateTime<Utc>,
}

/// Task row with creator and project context
#[derive(Debug, Clone, Serialize)]
pub struct TaskOverview {
  pub id: Uuid,
  pub title: String,
  pub is_completed: bool,
  pub priority: Priority,
  pub due_date: Option<DateTime<Utc>>,
  pub creator_id: Uuid,
  pub creator_name: String,
  pub creator_email: String,
  pub project_id: Option<Uuid>,
  pub project_name: Option<String>,
  pub created_at: DateTime<Utc>,
}

/// Latest few rows of each kind, shown on the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct RecentActivity {
  pub users: Vec<UserOverview>,
  pub projects: Vec<ProjectOverview>,
  pub tasks: Vec<TaskOverview>,
}

/// Dashboard summary numbers
#[derive(Debug, Clone, Serialize)]
pub struct AdminSummary {
  pub totals: Totals,
  pub today_completed: i64,
  pub pending_count: i64,
  pub completed_count: i64,
  pub overdue_count: i64,
  pub recent: RecentActivity,
}

/// Per-project task counters inside the oversight tree
#[derive(Debug, Clone, Serialize)]
pub struct ProjectNode {
  pub id: Uuid,
  pub name: String,
  pub tasks_total: i64,
  pub tasks_done: i64,
  pub tasks_pending: i64,
}

/// One user with their owned projects, for the oversight tree
#[derive(Debug, Clone, Serialize)]
pub struct UserNode {
  pub id: Uuid,
  pub name: String,
  pub email: String,
  pub is_admin: bool,
  pub projects: Vec<ProjectNode>,
}

/// Filters for the admin task listing
#[derive(Debug, Clone, Default)]
pub struct AdminTaskFilter {
  pub q: Option<String>,
  pub creator_id: Option<Uuid>,
  pub project_id: Option<Uuid>,
  pub is_completed: Option<bool>,
  pub due_from: Option<NaiveDate>,
  pub due_to: Option<NaiveDate>,
}

/// Filters for the admin project listing
#[derive(Debug, Clone, Default)]
pub struct AdminProjectFilter {
  pub q: Option<String>,
  pub owner_id: Option<Uuid>,
}
