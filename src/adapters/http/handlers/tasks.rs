use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::adapters::http::{
  dtos::{CreateTaskRequest, DueSoonQuery, PageResponse, TaskListQuery, UpdateTaskRequest},
  errors::ApiError,
  middleware::AuthUser,
};
use crate::application::task::{
  CreateTaskCommand, CreateTaskUseCase, DeleteTaskCommand, DeleteTaskUseCase, DueSoonCommand,
  DueSoonUseCase, GetTaskDetailsCommand, GetTaskDetailsUseCase, ListTasksCommand,
  ListTasksUseCase, TaskStatsCommand, TaskStatsUseCase, ToggleTaskCompletionCommand,
  ToggleTaskCompletionUseCase, UpdateTaskCommand, UpdateTaskUseCase,
};

/// POST /api/v1/tasks
pub async fn create_task_handler(
  request: web::Json<CreateTaskRequest>,
  use_case: web::Data<Arc<CreateTaskUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;
  let user = http_req.authenticated_user();

  let command = CreateTaskCommand {
    title: request.title.clone(),
    description: request.description.clone(),
    priority: request.priority.clone(),
    category: request.category.clone(),
    due_date: request.due_date,
    remind_at: request.remind_at,
    project_id: request.project_id,
  };

  let task = use_case.execute(&user, command).await?;
  Ok(HttpResponse::Created().json(task))
}

/// GET /api/v1/tasks
pub async fn list_tasks_handler(
  query: web::Query<TaskListQuery>,
  use_case: web::Data<Arc<ListTasksUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user();
  let query = query.into_inner();

  let command = ListTasksCommand {
    user_id: user.id,
    q: query.q,
    is_completed: query.is_completed,
    priority: query.priority,
    category: query.category,
    project_id: query.project_id,
    due_date_from: query.due_date_from,
    due_date_to: query.due_date_to,
    page: query.page,
    per_page: query.per_page,
  };

  let result = use_case.execute(command).await?;
  Ok(HttpResponse::Ok().json(PageResponse::from(result)))
}

/// GET /api/v1/tasks/due-soon
pub async fn due_soon_handler(
  query: web::Query<DueSoonQuery>,
  use_case: web::Data<Arc<DueSoonUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user();
  let query = query.into_inner();

  let command = DueSoonCommand {
    user_id: user.id,
    hours: query.hours,
    page: query.page,
    per_page: query.per_page,
  };

  let result = use_case.execute(command).await?;
  Ok(HttpResponse::Ok().json(PageResponse::from(result)))
}

/// GET /api/v1/tasks/stats
pub async fn task_stats_handler(
  use_case: web::Data<Arc<TaskStatsUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user();

  let stats = use_case.execute(TaskStatsCommand { user_id: user.id }).await?;
  Ok(HttpResponse::Ok().json(stats))
}

/// GET /api/v1/tasks/{task_id}
pub async fn get_task_handler(
  path: web::Path<Uuid>,
  use_case: web::Data<Arc<GetTaskDetailsUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user();

  let response = use_case
    .execute(
      &user,
      GetTaskDetailsCommand {
        task_id: path.into_inner(),
      },
    )
    .await?;
  Ok(HttpResponse::Ok().json(response))
}

/// PUT /api/v1/tasks/{task_id}
pub async fn update_task_handler(
  path: web::Path<Uuid>,
  request: web::Json<UpdateTaskRequest>,
  use_case: web::Data<Arc<UpdateTaskUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;
  let user = http_req.authenticated_user();

  let command = UpdateTaskCommand {
    task_id: path.into_inner(),
    title: request.title.clone(),
    description: request.description.clone(),
    is_completed: request.is_completed,
    priority: request.priority.clone(),
    category: request.category.clone(),
    due_date: request.due_date,
    remind_at: request.remind_at,
    project_id: request.project_id,
  };

  let task = use_case.execute(&user, command).await?;
  Ok(HttpResponse::Ok().json(task))
}

/// DELETE /api/v1/tasks/{task_id}
pub async fn delete_task_handler(
  path: web::Path<Uuid>,
  use_case: web::Data<Arc<DeleteTaskUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user();

  use_case
    .execute(
      &user,
      DeleteTaskCommand {
        task_id: path.into_inner(),
      },
    )
    .await?;
  Ok(HttpResponse::NoContent().finish())
}

/// PATCH /api/v1/tasks/{task_id}/toggle-complete
pub async fn toggle_task_handler(
  path: web::Path<Uuid>,
  use_case: web::Data<Arc<ToggleTaskCompletionUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user();

  let task = use_case
    .execute(
      &user,
      ToggleTaskCompletionCommand {
        task_id: path.into_inner(),
      },
    )
    .await?;
  Ok(HttpResponse::Ok().json(task))
}
