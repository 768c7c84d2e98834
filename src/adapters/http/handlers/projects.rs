use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::adapters::http::{
  dtos::{
    AddMemberRequest, CreateProjectRequest, PageResponse, ProjectListQuery, SuccessResponse,
    UpdateProjectRequest,
  },
  errors::ApiError,
  middleware::AuthUser,
};
use crate::application::project::{
  AddProjectMemberCommand, AddProjectMemberUseCase, CreateProjectCommand, CreateProjectUseCase,
  DeleteProjectCommand, DeleteProjectUseCase, GetProjectDetailsCommand, GetProjectDetailsUseCase,
  ListProjectMembersCommand, ListProjectMembersUseCase, ListProjectsCommand, ListProjectsUseCase,
  RemoveProjectMemberCommand, RemoveProjectMemberUseCase, UpdateProjectCommand,
  UpdateProjectUseCase,
};

/// POST /api/v1/projects
pub async fn create_project_handler(
  request: web::Json<CreateProjectRequest>,
  use_case: web::Data<Arc<CreateProjectUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;
  let user = http_req.authenticated_user();

  let command = CreateProjectCommand {
    name: request.name.clone(),
    description: request.description.clone(),
    owner_id: user.id,
  };

  let response = use_case.execute(command).await?;
  Ok(HttpResponse::Created().json(serde_json::json!({
    "project_id": response.project_id,
    "name": response.name,
    "description": response.description,
    "owner_id": response.owner_id,
    "created_at": response.created_at,
  })))
}

/// GET /api/v1/projects
pub async fn list_projects_handler(
  query: web::Query<ProjectListQuery>,
  use_case: web::Data<Arc<ListProjectsUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user();
  let query = query.into_inner();

  let result = use_case
    .execute(ListProjectsCommand {
      user_id: user.id,
      q: query.q,
      page: query.page,
      per_page: query.per_page,
    })
    .await?;
  Ok(HttpResponse::Ok().json(PageResponse::from(result)))
}

/// GET /api/v1/projects/{project_id}
pub async fn get_project_handler(
  path: web::Path<Uuid>,
  use_case: web::Data<Arc<GetProjectDetailsUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user();

  let response = use_case
    .execute(
      &user,
      GetProjectDetailsCommand {
        project_id: path.into_inner(),
      },
    )
    .await?;
  Ok(HttpResponse::Ok().json(response))
}

/// PUT /api/v1/projects/{project_id}
pub async fn update_project_handler(
  path: web::Path<Uuid>,
  request: web::Json<UpdateProjectRequest>,
  use_case: web::Data<Arc<UpdateProjectUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;
  let user = http_req.authenticated_user();

  let command = UpdateProjectCommand {
    project_id: path.into_inner(),
    name: request.name.clone(),
    description: request.description.clone(),
  };

  let response = use_case.execute(&user, command).await?;
  Ok(HttpResponse::Ok().json(serde_json::json!({
    "project_id": response.project_id,
    "name": response.name,
    "description": response.description,
    "updated_at": response.updated_at,
  })))
}

/// DELETE /api/v1/projects/{project_id}
pub async fn delete_project_handler(
  path: web::Path<Uuid>,
  use_case: web::Data<Arc<DeleteProjectUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user();

  use_case
    .execute(
      &user,
      DeleteProjectCommand {
        project_id: path.into_inner(),
      },
    )
    .await?;
  Ok(HttpResponse::NoContent().finish())
}

/// GET /api/v1/projects/{project_id}/members
pub async fn list_members_handler(
  path: web::Path<Uuid>,
  use_case: web::Data<Arc<ListProjectMembersUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user();

  let response = use_case
    .execute(
      &user,
      ListProjectMembersCommand {
        project_id: path.into_inner(),
      },
    )
    .await?;
  Ok(HttpResponse::Ok().json(response))
}

/// POST /api/v1/projects/{project_id}/members
pub async fn add_member_handler(
  path: web::Path<Uuid>,
  request: web::Json<AddMemberRequest>,
  use_case: web::Data<Arc<AddProjectMemberUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;
  let user = http_req.authenticated_user();

  let command = AddProjectMemberCommand {
    project_id: path.into_inner(),
    email: request.email.clone(),
    user_id: request.user_id,
    role: request.role.clone(),
  };

  let response = use_case.execute(&user, command).await?;
  Ok(HttpResponse::Created().json(serde_json::json!({
    "project_id": response.project_id,
    "user_id": response.user_id,
    "role": response.role,
    "joined_at": response.joined_at,
  })))
}

/// DELETE /api/v1/projects/{project_id}/members/{user_id}
pub async fn remove_member_handler(
  path: web::Path<(Uuid, Uuid)>,
  use_case: web::Data<Arc<RemoveProjectMemberUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user();
  let (project_id, member_id) = path.into_inner();

  use_case
    .execute(
      &user,
      RemoveProjectMemberCommand {
        project_id,
        member_id,
      },
    )
    .await?;
  Ok(HttpResponse::Ok().json(SuccessResponse {
    message: "Member removed".to_string(),
  }))
}
