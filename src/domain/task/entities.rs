use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::{TaskError, ValidationError};

/// Task priority, stored as a smallint
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
  Low,
  Medium,
  High,
}

impl Priority {
  pub fn as_i16(&self) -> i16 {
    match self {
      Priority::Low => 0,
      Priority::Medium => 1,
      Priority::High => 2,
    }
  }

  pub fn from_i16(value: i16) -> Result<Self, TaskError> {
    match value {
      0 => Ok(Priority::Low),
      1 => Ok(Priority::Medium),
      2 => Ok(Priority::High),
      _ => Err(TaskError::Validation(ValidationError::InvalidPriority)),
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Priority::Low => "low",
      Priority::Medium => "medium",
      Priority::High => "high",
    }
  }

  /// Accepts both the label and the numeric form.
  pub fn parse(s: &str) -> Result<Self, TaskError> {
    match s {
      "low" | "0" => Ok(Priority::Low),
      "medium" | "1" => Ok(Priority::Medium),
      "high" | "2" => Ok(Priority::High),
      _ => Err(TaskError::Validation(ValidationError::InvalidPriority)),
    }
  }
}

impl Default for Priority {
  fn default() -> Self {
    Priority::Medium
  }
}

/// Task entity, optionally attached to a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
  pub id: Uuid,
  pub creator_id: Uuid,
  pub project_id: Option<Uuid>,
  pub title: String,
  pub description: Option<String>,
  pub is_completed: bool,
  pub completed_at: Option<DateTime<Utc>>,
  pub priority: Priority,
  pub category: Option<String>,
  pub due_date: Option<DateTime<Utc>>,
  pub remind_at: Option<DateTime<Utc>>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Task {
  pub fn new(creator_id: Uuid, title: String) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      creator_id,
      project_id: None,
      title,
      description: None,
      is_completed: false,
      completed_at: None,
      priority: Priority::default(),
      category: None,
      due_date: None,
      remind_at: None,
      created_at: now,
      updated_at: now,
    }
  }

  /// Moves between completion states, keeping `completed_at` in sync:
  /// it is set exactly when the task transitions to completed and
  /// cleared when it reopens.
  pub fn set_completed(&mut self, completed: bool) {
    if self.is_completed == completed {
      return;
    }
    self.is_completed = completed;
    self.completed_at = completed.then(Utc::now);
    self.updated_at = Utc::now();
  }

  pub fn toggle_completed(&mut self) {
    self.set_completed(!self.is_completed);
  }
}

/// Subtask under a single task, visible to the task creator only
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subtask {
  pub id: Uuid,
  pub task_id: Uuid,
  pub title: String,
  pub description: Option<String>,
  pub is_completed: bool,
  pub completed_at: Option<DateTime<Utc>>,
  pub priority: Priority,
  pub category: Option<String>,
  pub due_date: Option<NaiveDate>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Subtask {
  pub fn new(task_id: Uuid, title: String) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      task_id,
      title,
      description: None,
      is_completed: false,
      completed_at: None,
      priority: Priority::default(),
      category: None,
      due_date: None,
      created_at: now,
      updated_at: now,
    }
  }

  pub fn set_completed(&mut self, completed: bool) {
    if self.is_completed == completed {
      return;
    }
    self.is_completed = completed;
    self.completed_at = completed.then(Utc::now);
    self.updated_at = Utc::now();
  }

  pub fn toggle_completed(&mut self) {
    self.set_completed(!self.is_completed);
  }
}

/// Filters for task listings; all fields combine with AND
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
  /// Substring match against title and description, case-insensitive
  pub q: Option<String>,
  pub is_completed: Option<bool>,
  pub priority: Option<Priority>,
  pub category: Option<String>,
  pub project_id: Option<Uuid>,
  /// Inclusive due-date range, compared on the calendar date
  pub due_from: Option<NaiveDate>,
  pub due_to: Option<NaiveDate>,
}

/// Filters for subtask listings
#[derive(Debug, Clone, Default)]
pub struct SubtaskFilter {
  pub q: Option<String>,
  pub is_completed: Option<bool>,
  pub priority: Option<Priority>,
  pub due_from: Option<NaiveDate>,
  pub due_to: Option<NaiveDate>,
}

/// Validated pagination window
#[derive(Debug, Clone, Copy)]
pub struct Page {
  pub page: u32,
  pub per_page: u32,
}

impl Page {
  pub const MAX_PER_PAGE: u32 = 100;

  /// Both values are clamped rather than rejected.
  pub fn new(page: Option<u32>, per_page: Option<u32>, default_per_page: u32) -> Self {
    Self {
      page: page.unwrap_or(1).max(1),
      per_page: per_page
        .unwrap_or(default_per_page)
        .clamp(1, Self::MAX_PER_PAGE),
    }
  }

  pub fn limit(&self) -> i64 {
    i64::from(self.per_page)
  }

  pub fn offset(&self) -> i64 {
    i64::from(self.page - 1) * i64::from(self.per_page)
  }
}

/// One page of results plus the total row count
#[derive(Debug, Clone)]
pub struct PageResult<T> {
  pub items: Vec<T>,
  pub page: u32,
  pub per_page: u32,
  pub total: i64,
}

impl<T> PageResult<T> {
  pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResult<U> {
    PageResult {
      items: self.items.into_iter().map(f).collect(),
      page: self.page,
      per_page: self.per_page,
      total: self.total,
    }
  }
}

/// Completion counters over every task the user can see: their own plus
/// those in projects they own or belong to
#[derive(Debug, Clone, Serialize)]
pub struct TaskStats {
  /// Visible tasks completed today (server-local calendar date)
  pub today_completed: i64,
  /// Incomplete visible tasks due today or later
  pub upcoming_count: i64,
}

/// Editable task fields; double options distinguish "leave alone"
/// from "clear"
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
  pub title: Option<String>,
  pub description: Option<Option<String>>,
  pub is_completed: Option<bool>,
  pub priority: Option<Priority>,
  pub category: Option<Option<String>>,
  pub due_date: Option<Option<DateTime<Utc>>>,
  pub remind_at: Option<Option<DateTime<Utc>>>,
  pub project_id: Option<Option<Uuid>>,
}

/// Editable subtask fields
#[derive(Debug, Clone, Default)]
pub struct SubtaskUpdate {
  pub title: Option<String>,
  pub description: Option<Option<String>>,
  pub is_completed: Option<bool>,
  pub priority: Option<Priority>,
  pub category: Option<Option<String>>,
  pub due_date: Option<Option<NaiveDate>>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn priority_accepts_labels_and_numbers() {
    assert_eq!(Priority::parse("low").unwrap(), Priority::Low);
    assert_eq!(Priority::parse("1").unwrap(), Priority::Medium);
    assert_eq!(Priority::parse("high").unwrap(), Priority::High);
    assert!(Priority::parse("urgent").is_err());
    assert!(Priority::from_i16(3).is_err());
    assert_eq!(Priority::from_i16(2).unwrap(), Priority::High);
  }

  #[test]
  fn completing_a_task_stamps_completed_at() {
    let mut task = Task::new(Uuid::new_v4(), "Write report".to_string());
    assert!(task.completed_at.is_none());

    task.set_completed(true);
    assert!(task.is_completed);
    assert!(task.completed_at.is_some());

    // Completing again is a no-op and keeps the original timestamp
    let stamp = task.completed_at;
    task.set_completed(true);
    assert_eq!(task.completed_at, stamp);

    task.set_completed(false);
    assert!(!task.is_completed);
    assert!(task.completed_at.is_none());
  }

  #[test]
  fn toggle_flips_both_ways() {
    let mut subtask = Subtask::new(Uuid::new_v4(), "Outline".to_string());
    subtask.toggle_completed();
    assert!(subtask.is_completed);
    assert!(subtask.completed_at.is_some());
    subtask.toggle_completed();
    assert!(!subtask.is_completed);
    assert!(subtask.completed_at.is_none());
  }

  #[test]
  fn page_clamps_out_of_range_values() {
    let page = Page::new(Some(0), Some(500), 10);
    assert_eq!(page.page, 1);
    assert_eq!(page.per_page, 100);

    let page = Page::new(None, None, 15);
    assert_eq!(page.page, 1);
    assert_eq!(page.per_page, 15);
    assert_eq!(page.offset(), 0);

    let page = Page::new(Some(3), Some(20), 10);
    assert_eq!(page.offset(), 40);
    assert_eq!(page.limit(), 20);
  }
}
