use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::adapters::http::{
  dtos::{CreateSubtaskRequest, PageResponse, SubtaskListQuery, UpdateSubtaskRequest},
  errors::ApiError,
  middleware::AuthUser,
};
use crate::application::subtask::{
  CreateSubtaskCommand, CreateSubtaskUseCase, DeleteSubtaskCommand, DeleteSubtaskUseCase,
  GetSubtaskCommand, GetSubtaskUseCase, ListSubtasksCommand, ListSubtasksUseCase,
  ToggleSubtaskCompletionCommand, ToggleSubtaskCompletionUseCase, UpdateSubtaskCommand,
  UpdateSubtaskUseCase,
};

/// POST /api/v1/tasks/{task_id}/subtasks
pub async fn create_subtask_handler(
  path: web::Path<Uuid>,
  request: web::Json<CreateSubtaskRequest>,
  use_case: web::Data<Arc<CreateSubtaskUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;
  let user = http_req.authenticated_user();

  let command = CreateSubtaskCommand {
    task_id: path.into_inner(),
    title: request.title.clone(),
    description: request.description.clone(),
    priority: request.priority.clone(),
    category: request.category.clone(),
    due_date: request.due_date,
  };

  let subtask = use_case.execute(&user, command).await?;
  Ok(HttpResponse::Created().json(subtask))
}

/// GET /api/v1/tasks/{task_id}/subtasks
pub async fn list_subtasks_handler(
  path: web::Path<Uuid>,
  query: web::Query<SubtaskListQuery>,
  use_case: web::Data<Arc<ListSubtasksUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user();
  let query = query.into_inner();

  let command = ListSubtasksCommand {
    task_id: path.into_inner(),
    q: query.q,
    is_completed: query.is_completed,
    priority: query.priority,
    due_date_from: query.due_date_from,
    due_date_to: query.due_date_to,
    page: query.page,
    per_page: query.per_page,
  };

  let result = use_case.execute(&user, command).await?;
  Ok(HttpResponse::Ok().json(PageResponse::from(result)))
}

/// GET /api/v1/subtasks/{subtask_id}
pub async fn get_subtask_handler(
  path: web::Path<Uuid>,
  use_case: web::Data<Arc<GetSubtaskUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user();

  let subtask = use_case
    .execute(
      &user,
      GetSubtaskCommand {
        subtask_id: path.into_inner(),
      },
    )
    .await?;
  Ok(HttpResponse::Ok().json(subtask))
}

/// PUT /api/v1/subtasks/{subtask_id}
pub async fn update_subtask_handler(
  path: web::Path<Uuid>,
  request: web::Json<UpdateSubtaskRequest>,
  use_case: web::Data<Arc<UpdateSubtaskUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;
  let user = http_req.authenticated_user();

  let command = UpdateSubtaskCommand {
    subtask_id: path.into_inner(),
    title: request.title.clone(),
    description: request.description.clone(),
    is_completed: request.is_completed,
    priority: request.priority.clone(),
    category: request.category.clone(),
    due_date: request.due_date,
  };

  let subtask = use_case.execute(&user, command).await?;
  Ok(HttpResponse::Ok().json(subtask))
}

/// DELETE /api/v1/subtasks/{subtask_id}
pub async fn delete_subtask_handler(
  path: web::Path<Uuid>,
  use_case: web::Data<Arc<DeleteSubtaskUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user();

  use_case
    .execute(
      &user,
      DeleteSubtaskCommand {
        subtask_id: path.into_inner(),
      },
    )
    .await?;
  Ok(HttpResponse::NoContent().finish())
}

/// PATCH /api/v1/subtasks/{subtask_id}/toggle-complete
pub async fn toggle_subtask_handler(
  path: web::Path<Uuid>,
  use_case: web::Data<Arc<ToggleSubtaskCompletionUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user();

  let subtask = use_case
    .execute(
      &user,
      ToggleSubtaskCompletionCommand {
        subtask_id: path.into_inner(),
      },
    )
    .await?;
  Ok(HttpResponse::Ok().json(subtask))
}
