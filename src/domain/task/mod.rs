pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;

pub use entities::{
  Page, PageResult, Priority, Subtask, SubtaskFilter, SubtaskUpdate, Task, TaskFilter,
  TaskStats, TaskUpdate,
};
pub use errors::TaskError;
pub use ports::{SubtaskRepository, TaskRepository};
pub use services::{NewSubtask, NewTask, TaskService};
