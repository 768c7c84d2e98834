use actix_web::web;
use std::sync::Arc;

use crate::application::admin::{
  AdminListProjectsUseCase, AdminListTasksUseCase, GetOverviewTreeUseCase, GetSummaryUseCase,
  ListUsersUseCase, ModerateTaskUseCase,
};
use crate::application::auth::{
  GetCurrentUserUseCase, LoginUserUseCase, LogoutAllDevicesUseCase, LogoutUserUseCase,
  RegisterUserUseCase,
};
use crate::application::project::{
  AddProjectMemberUseCase, CreateProjectUseCase, DeleteProjectUseCase, GetProjectDetailsUseCase,
  ListProjectMembersUseCase, ListProjectsUseCase, RemoveProjectMemberUseCase,
  UpdateProjectUseCase,
};
use crate::application::subtask::{
  CreateSubtaskUseCase, DeleteSubtaskUseCase, GetSubtaskUseCase, ListSubtasksUseCase,
  ToggleSubtaskCompletionUseCase, UpdateSubtaskUseCase,
};
use crate::application::task::{
  CreateTaskUseCase, DeleteTaskUseCase, DueSoonUseCase, GetTaskDetailsUseCase, ListTasksUseCase,
  TaskStatsUseCase, ToggleTaskCompletionUseCase, UpdateTaskUseCase,
};

use super::handlers::{admin, auth, projects, subtasks, tasks};

/// Public authentication routes: register, login, logout.
///
/// Logout only needs the raw bearer token, so it stays outside the
/// auth middleware.
pub fn configure_auth_routes(
  cfg: &mut web::ServiceConfig,
  register_use_case: Arc<RegisterUserUseCase>,
  login_use_case: Arc<LoginUserUseCase>,
  logout_use_case: Arc<LogoutUserUseCase>,
) {
  cfg
    .app_data(web::Data::new(register_use_case))
    .app_data(web::Data::new(login_use_case))
    .app_data(web::Data::new(logout_use_case))
    .route("/register", web::post().to(auth::register_handler))
    .route("/login", web::post().to(auth::login_handler))
    .route("/logout", web::post().to(auth::logout_handler));
}

/// Session-bound authentication routes, mounted behind `AuthMiddleware`
pub fn configure_auth_session_routes(
  cfg: &mut web::ServiceConfig,
  get_user_use_case: Arc<GetCurrentUserUseCase>,
  logout_all_use_case: Arc<LogoutAllDevicesUseCase>,
) {
  cfg
    .app_data(web::Data::new(get_user_use_case))
    .app_data(web::Data::new(logout_all_use_case))
    .route("/me", web::get().to(auth::get_current_user_handler))
    .route("/logout-all", web::post().to(auth::logout_all_handler));
}

/// Project CRUD and membership routes
pub fn configure_project_routes(
  cfg: &mut web::ServiceConfig,
  create_use_case: Arc<CreateProjectUseCase>,
  list_use_case: Arc<ListProjectsUseCase>,
  details_use_case: Arc<GetProjectDetailsUseCase>,
  update_use_case: Arc<UpdateProjectUseCase>,
  delete_use_case: Arc<DeleteProjectUseCase>,
  list_members_use_case: Arc<ListProjectMembersUseCase>,
  add_member_use_case: Arc<AddProjectMemberUseCase>,
  remove_member_use_case: Arc<RemoveProjectMemberUseCase>,
) {
  cfg
    .app_data(web::Data::new(create_use_case))
    .app_data(web::Data::new(list_use_case))
    .app_data(web::Data::new(details_use_case))
    .app_data(web::Data::new(update_use_case))
    .app_data(web::Data::new(delete_use_case))
    .app_data(web::Data::new(list_members_use_case))
    .app_data(web::Data::new(add_member_use_case))
    .app_data(web::Data::new(remove_member_use_case))
    .route("", web::post().to(projects::create_project_handler))
    .route("", web::get().to(projects::list_projects_handler))
    .route("/{project_id}", web::get().to(projects::get_project_handler))
    .route("/{project_id}", web::put().to(projects::update_project_handler))
    .route(
      "/{project_id}",
      web::delete().to(projects::delete_project_handler),
    )
    .route(
      "/{project_id}/members",
      web::get().to(projects::list_members_handler),
    )
    .route(
      "/{project_id}/members",
      web::post().to(projects::add_member_handler),
    )
    .route(
      "/{project_id}/members/{user_id}",
      web::delete().to(projects::remove_member_handler),
    );
}

/// Task routes, including the nested subtask collection.
///
/// `/due-soon` and `/stats` are registered before `/{task_id}` so the
/// static segments win.
pub fn configure_task_routes(
  cfg: &mut web::ServiceConfig,
  create_use_case: Arc<CreateTaskUseCase>,
  list_use_case: Arc<ListTasksUseCase>,
  due_soon_use_case: Arc<DueSoonUseCase>,
  stats_use_case: Arc<TaskStatsUseCase>,
  details_use_case: Arc<GetTaskDetailsUseCase>,
  update_use_case: Arc<UpdateTaskUseCase>,
  delete_use_case: Arc<DeleteTaskUseCase>,
  toggle_use_case: Arc<ToggleTaskCompletionUseCase>,
  create_subtask_use_case: Arc<CreateSubtaskUseCase>,
  list_subtasks_use_case: Arc<ListSubtasksUseCase>,
) {
  cfg
    .app_data(web::Data::new(create_use_case))
    .app_data(web::Data::new(list_use_case))
    .app_data(web::Data::new(due_soon_use_case))
    .app_data(web::Data::new(stats_use_case))
    .app_data(web::Data::new(details_use_case))
    .app_data(web::Data::new(update_use_case))
    .app_data(web::Data::new(delete_use_case))
    .app_data(web::Data::new(toggle_use_case))
    .app_data(web::Data::new(create_subtask_use_case))
    .app_data(web::Data::new(list_subtasks_use_case))
    .route("", web::post().to(tasks::create_task_handler))
    .route("", web::get().to(tasks::list_tasks_handler))
    .route("/due-soon", web::get().to(tasks::due_soon_handler))
    .route("/stats", web::get().to(tasks::task_stats_handler))
    .route("/{task_id}", web::get().to(tasks::get_task_handler))
    .route("/{task_id}", web::put().to(tasks::update_task_handler))
    .route("/{task_id}", web::delete().to(tasks::delete_task_handler))
    .route(
      "/{task_id}/toggle-complete",
      web::patch().to(tasks::toggle_task_handler),
    )
    .route(
      "/{task_id}/subtasks",
      web::post().to(subtasks::create_subtask_handler),
    )
    .route(
      "/{task_id}/subtasks",
      web::get().to(subtasks::list_subtasks_handler),
    );
}

/// Shallow subtask routes
pub fn configure_subtask_routes(
  cfg: &mut web::ServiceConfig,
  get_use_case: Arc<GetSubtaskUseCase>,
  update_use_case: Arc<UpdateSubtaskUseCase>,
  delete_use_case: Arc<DeleteSubtaskUseCase>,
  toggle_use_case: Arc<ToggleSubtaskCompletionUseCase>,
) {
  cfg
    .app_data(web::Data::new(get_use_case))
    .app_data(web::Data::new(update_use_case))
    .app_data(web::Data::new(delete_use_case))
    .app_data(web::Data::new(toggle_use_case))
    .route("/{subtask_id}", web::get().to(subtasks::get_subtask_handler))
    .route("/{subtask_id}", web::put().to(subtasks::update_subtask_handler))
    .route(
      "/{subtask_id}",
      web::delete().to(subtasks::delete_subtask_handler),
    )
    .route(
      "/{subtask_id}/toggle-complete",
      web::patch().to(subtasks::toggle_subtask_handler),
    );
}

/// Admin oversight routes; mount behind `AuthMiddleware` + `AdminGuard`
pub fn configure_admin_routes(
  cfg: &mut web::ServiceConfig,
  summary_use_case: Arc<GetSummaryUseCase>,
  tree_use_case: Arc<GetOverviewTreeUseCase>,
  list_users_use_case: Arc<ListUsersUseCase>,
  list_projects_use_case: Arc<AdminListProjectsUseCase>,
  list_tasks_use_case: Arc<AdminListTasksUseCase>,
  moderate_task_use_case: Arc<ModerateTaskUseCase>,
) {
  cfg
    .app_data(web::Data::new(summary_use_case))
    .app_data(web::Data::new(tree_use_case))
    .app_data(web::Data::new(list_users_use_case))
    .app_data(web::Data::new(list_projects_use_case))
    .app_data(web::Data::new(list_tasks_use_case))
    .app_data(web::Data::new(moderate_task_use_case))
    .route("/summary", web::get().to(admin::summary_handler))
    .route("/tree", web::get().to(admin::tree_handler))
    .route("/users", web::get().to(admin::list_users_handler))
    .route(
      "/users/{user_id}/projects",
      web::get().to(admin::user_projects_handler),
    )
    .route("/projects", web::get().to(admin::list_projects_handler))
    .route(
      "/projects/{project_id}/tasks",
      web::get().to(admin::project_tasks_handler),
    )
    .route("/tasks", web::get().to(admin::list_tasks_handler))
    .route(
      "/tasks/{task_id}/toggle-complete",
      web::patch().to(admin::toggle_task_handler),
    )
    .route("/tasks/{task_id}", web::delete().to(admin::delete_task_handler));
}
