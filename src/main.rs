use actix_web::{App, HttpResponse, HttpServer, middleware::Logger, web};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskhive::{
  adapters::http::{
    AdminGuard, AuthMiddleware, RequestIdMiddleware,
    routes::{
      configure_admin_routes, configure_auth_routes, configure_auth_session_routes,
      configure_project_routes, configure_subtask_routes, configure_task_routes,
    },
  },
  application::admin::{
    AdminListProjectsUseCase, AdminListTasksUseCase, GetOverviewTreeUseCase, GetSummaryUseCase,
    ListUsersUseCase, ModerateTaskUseCase,
  },
  application::auth::{
    GetCurrentUserUseCase, LoginUserUseCase, LogoutAllDevicesUseCase, LogoutUserUseCase,
    RegisterUserUseCase,
  },
  application::project::{
    AddProjectMemberUseCase, CreateProjectUseCase, DeleteProjectUseCase, GetProjectDetailsUseCase,
    ListProjectMembersUseCase, ListProjectsUseCase, RemoveProjectMemberUseCase,
    UpdateProjectUseCase,
  },
  application::subtask::{
    CreateSubtaskUseCase, DeleteSubtaskUseCase, GetSubtaskUseCase, ListSubtasksUseCase,
    ToggleSubtaskCompletionUseCase, UpdateSubtaskUseCase,
  },
  application::task::{
    CreateTaskUseCase, DeleteTaskUseCase, DueSoonUseCase, GetTaskDetailsUseCase, ListTasksUseCase,
    TaskStatsUseCase, ToggleTaskCompletionUseCase, UpdateTaskUseCase,
  },
  domain::auth::services::{AuthService, AuthServiceConfig},
  domain::project::services::ProjectService,
  domain::task::services::TaskService,
  infrastructure::{
    config::Config,
    persistence::postgres::{
      PostgresAdminRepository, PostgresLoginAttemptRepository, PostgresProjectMemberRepository,
      PostgresProjectRepository, PostgresSessionRepository, PostgresSubtaskRepository,
      PostgresTaskRepository, PostgresUserRepository,
    },
    security::Argon2PasswordHasher,
  },
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "taskhive=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting TaskHive application");

  let config = Config::load().expect("Failed to load configuration");
  tracing::info!("Configuration loaded successfully");

  tracing::info!("Connecting to database");
  let db_pool = tokio::time::timeout(
    Duration::from_secs(config.database.connect_timeout_seconds),
    PgPoolOptions::new()
      .max_connections(config.database.max_connections)
      .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_seconds))
      .connect(&config.database.url),
  )
  .await
  .map_err(|_| {
    tracing::error!(
      "Database connection timed out after {} seconds. Is PostgreSQL running?",
      config.database.connect_timeout_seconds
    );
    std::io::Error::new(
      std::io::ErrorKind::TimedOut,
      format!(
        "Database connection timed out after {} seconds",
        config.database.connect_timeout_seconds
      ),
    )
  })?
  .map_err(|e| {
    tracing::error!("Failed to connect to database: {}", e);
    std::io::Error::other(format!("Database error: {}", e))
  })?;

  tracing::info!("Database connection pool created");

  tracing::info!("Running database migrations");
  sqlx::migrate!("./migrations")
    .run(&db_pool)
    .await
    .expect("Failed to run database migrations");
  tracing::info!("Database migrations completed");

  // Repositories
  let user_repo = Arc::new(PostgresUserRepository::new(db_pool.clone()));
  let session_repo = Arc::new(PostgresSessionRepository::new(db_pool.clone()));
  let login_attempt_repo = Arc::new(PostgresLoginAttemptRepository::new(db_pool.clone()));
  let project_repo = Arc::new(PostgresProjectRepository::new(db_pool.clone()));
  let project_member_repo = Arc::new(PostgresProjectMemberRepository::new(db_pool.clone()));
  let task_repo = Arc::new(PostgresTaskRepository::new(db_pool.clone()));
  let subtask_repo = Arc::new(PostgresSubtaskRepository::new(db_pool.clone()));
  let admin_repo = Arc::new(PostgresAdminRepository::new(db_pool.clone()));

  // Security
  let password_hasher =
    Arc::new(Argon2PasswordHasher::new().expect("Failed to create password hasher"));

  // Domain services
  let auth_config = AuthServiceConfig {
    session_ttl_seconds: config.security.session_ttl_seconds as i64,
    remember_me_ttl_seconds: config.security.remember_me_ttl_seconds as i64,
    rate_limit_window_seconds: config.rate_limit.login_window_seconds as i64,
    max_failed_attempts: config.rate_limit.login_max_attempts as i64,
  };

  let auth_service = Arc::new(AuthService::new(
    user_repo.clone(),
    session_repo.clone(),
    login_attempt_repo.clone(),
    password_hasher,
    auth_config,
  ));

  let project_service = Arc::new(ProjectService::new(
    project_repo.clone(),
    project_member_repo.clone(),
    user_repo.clone(),
  ));

  let task_service = Arc::new(TaskService::new(
    task_repo.clone(),
    subtask_repo.clone(),
    project_service.clone(),
  ));

  // Auth use cases
  let register_use_case = Arc::new(RegisterUserUseCase::new(auth_service.clone()));
  let login_use_case = Arc::new(LoginUserUseCase::new(auth_service.clone()));
  let logout_use_case = Arc::new(LogoutUserUseCase::new(auth_service.clone()));
  let logout_all_use_case = Arc::new(LogoutAllDevicesUseCase::new(auth_service.clone()));
  let get_user_use_case = Arc::new(GetCurrentUserUseCase::new(user_repo.clone()));

  // Project use cases
  let create_project_use_case = Arc::new(CreateProjectUseCase::new(project_service.clone()));
  let list_projects_use_case = Arc::new(ListProjectsUseCase::new(project_service.clone()));
  let get_project_details_use_case = Arc::new(GetProjectDetailsUseCase::new(
    project_service.clone(),
    project_repo.clone(),
  ));
  let update_project_use_case = Arc::new(UpdateProjectUseCase::new(project_service.clone()));
  let delete_project_use_case = Arc::new(DeleteProjectUseCase::new(project_service.clone()));
  let list_members_use_case = Arc::new(ListProjectMembersUseCase::new(project_service.clone()));
  let add_member_use_case = Arc::new(AddProjectMemberUseCase::new(project_service.clone()));
  let remove_member_use_case = Arc::new(RemoveProjectMemberUseCase::new(project_service.clone()));

  // Task use cases
  let create_task_use_case = Arc::new(CreateTaskUseCase::new(task_service.clone()));
  let list_tasks_use_case = Arc::new(ListTasksUseCase::new(task_service.clone()));
  let due_soon_use_case = Arc::new(DueSoonUseCase::new(task_service.clone()));
  let task_stats_use_case = Arc::new(TaskStatsUseCase::new(task_service.clone()));
  let get_task_details_use_case = Arc::new(GetTaskDetailsUseCase::new(task_service.clone()));
  let update_task_use_case = Arc::new(UpdateTaskUseCase::new(task_service.clone()));
  let delete_task_use_case = Arc::new(DeleteTaskUseCase::new(task_service.clone()));
  let toggle_task_use_case = Arc::new(ToggleTaskCompletionUseCase::new(task_service.clone()));

  // Subtask use cases
  let create_subtask_use_case = Arc::new(CreateSubtaskUseCase::new(task_service.clone()));
  let list_subtasks_use_case = Arc::new(ListSubtasksUseCase::new(task_service.clone()));
  let get_subtask_use_case = Arc::new(GetSubtaskUseCase::new(task_service.clone()));
  let update_subtask_use_case = Arc::new(UpdateSubtaskUseCase::new(task_service.clone()));
  let delete_subtask_use_case = Arc::new(DeleteSubtaskUseCase::new(task_service.clone()));
  let toggle_subtask_use_case =
    Arc::new(ToggleSubtaskCompletionUseCase::new(task_service.clone()));

  // Admin use cases
  let admin_summary_use_case = Arc::new(GetSummaryUseCase::new(admin_repo.clone()));
  let admin_tree_use_case = Arc::new(GetOverviewTreeUseCase::new(admin_repo.clone()));
  let admin_list_users_use_case = Arc::new(ListUsersUseCase::new(admin_repo.clone()));
  let admin_list_projects_use_case = Arc::new(AdminListProjectsUseCase::new(admin_repo.clone()));
  let admin_list_tasks_use_case = Arc::new(AdminListTasksUseCase::new(admin_repo.clone()));
  let moderate_task_use_case = Arc::new(ModerateTaskUseCase::new(task_repo.clone()));

  let server_host = config.server.host.clone();
  let server_port = config.server.port;

  tracing::info!("Starting HTTP server on {}:{}", server_host, server_port);

  HttpServer::new(move || {
    App::new()
      .wrap(RequestIdMiddleware::new())
      .wrap(Logger::default())
      .route(
        "/health",
        web::get().to(|| async { HttpResponse::Ok().json(serde_json::json!({"status": "ok"})) }),
      )
      .service(
        web::scope("/api/v1/auth")
          .configure(|cfg| {
            configure_auth_routes(
              cfg,
              register_use_case.clone(),
              login_use_case.clone(),
              logout_use_case.clone(),
            )
          })
          .service(
            web::scope("")
              .wrap(AuthMiddleware::new(auth_service.clone()))
              .configure(|cfg| {
                configure_auth_session_routes(
                  cfg,
                  get_user_use_case.clone(),
                  logout_all_use_case.clone(),
                )
              }),
          ),
      )
      .service(
        web::scope("/api/v1/projects")
          .wrap(AuthMiddleware::new(auth_service.clone()))
          .configure(|cfg| {
            configure_project_routes(
              cfg,
              create_project_use_case.clone(),
              list_projects_use_case.clone(),
              get_project_details_use_case.clone(),
              update_project_use_case.clone(),
              delete_project_use_case.clone(),
              list_members_use_case.clone(),
              add_member_use_case.clone(),
              remove_member_use_case.clone(),
            )
          }),
      )
      .service(
        web::scope("/api/v1/tasks")
          .wrap(AuthMiddleware::new(auth_service.clone()))
          .configure(|cfg| {
            configure_task_routes(
              cfg,
              create_task_use_case.clone(),
              list_tasks_use_case.clone(),
              due_soon_use_case.clone(),
              task_stats_use_case.clone(),
              get_task_details_use_case.clone(),
              update_task_use_case.clone(),
              delete_task_use_case.clone(),
              toggle_task_use_case.clone(),
              create_subtask_use_case.clone(),
              list_subtasks_use_case.clone(),
            )
          }),
      )
      .service(
        web::scope("/api/v1/subtasks")
          .wrap(AuthMiddleware::new(auth_service.clone()))
          .configure(|cfg| {
            configure_subtask_routes(
              cfg,
              get_subtask_use_case.clone(),
              update_subtask_use_case.clone(),
              delete_subtask_use_case.clone(),
              toggle_subtask_use_case.clone(),
            )
          }),
      )
      .service(
        web::scope("/api/v1/admin")
          .wrap(AdminGuard::new())
          .wrap(AuthMiddleware::new(auth_service.clone()))
          .configure(|cfg| {
            configure_admin_routes(
              cfg,
              admin_summary_use_case.clone(),
              admin_tree_use_case.clone(),
              admin_list_users_use_case.clone(),
              admin_list_projects_use_case.clone(),
              admin_list_tasks_use_case.clone(),
              moderate_task_use_case.clone(),
            )
          }),
      )
  })
  .bind((server_host.as_str(), server_port))?
  .run()
  .await
}
