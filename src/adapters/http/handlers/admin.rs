use actix_web::{HttpResponse, web};
use std::sync::Arc;
use uuid::Uuid;

use crate::adapters::http::{
  dtos::{AdminProjectListQuery, AdminTaskListQuery, AdminUserListQuery, PageResponse},
  errors::ApiError,
};
use crate::application::admin::{
  AdminListProjectsCommand, AdminListProjectsUseCase, AdminListTasksCommand,
  AdminListTasksUseCase, GetOverviewTreeUseCase, GetSummaryUseCase, ListUsersCommand,
  ListUsersUseCase, ModerateTaskUseCase,
};

/// GET /api/v1/admin/summary
pub async fn summary_handler(
  use_case: web::Data<Arc<GetSummaryUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let summary = use_case.execute().await?;
  Ok(HttpResponse::Ok().json(summary))
}

/// GET /api/v1/admin/tree
pub async fn tree_handler(
  use_case: web::Data<Arc<GetOverviewTreeUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let tree = use_case.execute().await?;
  Ok(HttpResponse::Ok().json(tree))
}

/// GET /api/v1/admin/users
pub async fn list_users_handler(
  query: web::Query<AdminUserListQuery>,
  use_case: web::Data<Arc<ListUsersUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let query = query.into_inner();

  let result = use_case
    .execute(ListUsersCommand {
      q: query.q,
      page: query.page,
      per_page: query.per_page,
    })
    .await?;
  Ok(HttpResponse::Ok().json(PageResponse::from(result)))
}

/// GET /api/v1/admin/projects
pub async fn list_projects_handler(
  query: web::Query<AdminProjectListQuery>,
  use_case: web::Data<Arc<AdminListProjectsUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let query = query.into_inner();

  let result = use_case
    .execute(AdminListProjectsCommand {
      q: query.q,
      owner_id: query.user_id,
      page: query.page,
      per_page: query.per_page,
    })
    .await?;
  Ok(HttpResponse::Ok().json(PageResponse::from(result)))
}

/// GET /api/v1/admin/users/{user_id}/projects
pub async fn user_projects_handler(
  path: web::Path<Uuid>,
  use_case: web::Data<Arc<AdminListProjectsUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let projects = use_case.for_user(path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(projects))
}

/// GET /api/v1/admin/tasks
pub async fn list_tasks_handler(
  query: web::Query<AdminTaskListQuery>,
  use_case: web::Data<Arc<AdminListTasksUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let query = query.into_inner();

  let result = use_case
    .execute(AdminListTasksCommand {
      q: query.q,
      creator_id: query.user_id,
      project_id: query.project_id,
      is_completed: query.is_completed,
      due_date_from: query.date_from,
      due_date_to: query.date_to,
      page: query.page,
      per_page: query.per_page,
    })
    .await?;
  Ok(HttpResponse::Ok().json(PageResponse::from(result)))
}

/// GET /api/v1/admin/projects/{project_id}/tasks
pub async fn project_tasks_handler(
  path: web::Path<Uuid>,
  query: web::Query<AdminTaskListQuery>,
  use_case: web::Data<Arc<AdminListTasksUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let query = query.into_inner();

  let result = use_case
    .execute(AdminListTasksCommand {
      q: query.q,
      creator_id: query.user_id,
      project_id: Some(path.into_inner()),
      is_completed: query.is_completed,
      due_date_from: query.date_from,
      due_date_to: query.date_to,
      page: query.page,
      per_page: query.per_page,
    })
    .await?;
  Ok(HttpResponse::Ok().json(PageResponse::from(result)))
}

/// PATCH /api/v1/admin/tasks/{task_id}/toggle-complete
pub async fn toggle_task_handler(
  path: web::Path<Uuid>,
  use_case: web::Data<Arc<ModerateTaskUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let task = use_case.toggle_completed(path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(task))
}

/// DELETE /api/v1/admin/tasks/{task_id}
pub async fn delete_task_handler(
  path: web::Path<Uuid>,
  use_case: web::Data<Arc<ModerateTaskUseCase>>,
) -> Result<HttpResponse, ApiError> {
  use_case.delete(path.into_inner()).await?;
  Ok(HttpResponse::NoContent().finish())
}
