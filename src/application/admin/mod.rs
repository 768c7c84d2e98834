pub mod get_overview_tree;
pub mod get_summary;
pub mod list_projects;
pub mod list_tasks;
pub mod list_users;
pub mod moderate_task;

pub use get_overview_tree::{GetOverviewTreeResponse, GetOverviewTreeUseCase};
pub use get_summary::GetSummaryUseCase;
pub use list_projects::{ListProjectsCommand as AdminListProjectsCommand, ListProjectsUseCase as AdminListProjectsUseCase};
pub use list_tasks::{ListTasksCommand as AdminListTasksCommand, ListTasksUseCase as AdminListTasksUseCase};
pub use list_users::{ListUsersCommand, ListUsersUseCase};
pub use moderate_task::ModerateTaskUseCase;
