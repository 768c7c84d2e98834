mod admin_repository;
mod login_attempt_repository;
mod project_member_repository;
mod project_repository;
mod session_repository;
mod subtask_repository;
mod task_repository;
mod user_repository;

pub use admin_repository::PostgresAdminRepository;
pub use login_attempt_repository::PostgresLoginAttemptRepository;
pub use project_member_repository::PostgresProjectMemberRepository;
pub use project_repository::PostgresProjectRepository;
pub use session_repository::PostgresSessionRepository;
pub use subtask_repository::PostgresSubtaskRepository;
pub use task_repository::PostgresTaskRepository;
pub use user_repository::PostgresUserRepository;
