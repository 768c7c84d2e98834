use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use validator::Validate;

use crate::adapters::http::{
  dtos::{
    AuthResponse, CurrentUserResponse, LoginRequest, LogoutAllResponse, RegisterRequest,
    SuccessResponse,
  },
  errors::{ApiError, AuthErrorKind},
  middleware::AuthUser,
};
use crate::application::auth::{
  GetCurrentUserCommand, GetCurrentUserUseCase, LoginUserCommand, LoginUserUseCase,
  LogoutAllDevicesCommand, LogoutAllDevicesUseCase, LogoutUserCommand, LogoutUserUseCase,
  RegisterUserCommand, RegisterUserUseCase,
};

/// Extract session token from Authorization header
fn extract_session_token(req: &HttpRequest) -> Result<String, ApiError> {
  req
    .headers()
    .get("Authorization")
    .and_then(|h| h.to_str().ok())
    .and_then(|s| s.strip_prefix("Bearer "))
    .map(|s| s.to_string())
    .ok_or(ApiError::Auth(AuthErrorKind::InvalidToken))
}

/// Extract IP address from the request
fn extract_ip_address(req: &HttpRequest) -> Option<std::net::IpAddr> {
  req.connection_info().realip_remote_addr().and_then(|addr| {
    if let Some(ip) = addr.split(':').next() {
      ip.parse().ok()
    } else {
      addr.parse().ok()
    }
  })
}

/// Extract user agent from the request
fn extract_user_agent(req: &HttpRequest) -> Option<String> {
  req
    .headers()
    .get("User-Agent")
    .and_then(|h| h.to_str().ok())
    .map(|s| s.to_string())
}

/// POST /api/v1/auth/register
pub async fn register_handler(
  request: web::Json<RegisterRequest>,
  use_case: web::Data<Arc<RegisterUserUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let command = RegisterUserCommand {
    name: request.name.clone(),
    email: request.email.clone(),
    password: request.password.clone(),
    mobile: request.mobile.clone(),
    gender: request.gender.clone(),
  };

  let response = use_case.execute(command).await?;

  Ok(HttpResponse::Created().json(AuthResponse {
    user_id: response.user_id,
    name: response.name,
    email: response.email,
    session_token: response.session_token,
    expires_at: response.expires_at,
  }))
}

/// POST /api/v1/auth/login
pub async fn login_handler(
  request: web::Json<LoginRequest>,
  use_case: web::Data<Arc<LoginUserUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let ip_address = extract_ip_address(&http_req);
  let user_agent = extract_user_agent(&http_req);

  let command = LoginUserCommand {
    email: request.email.clone(),
    password: request.password.clone(),
    remember_me: request.remember_me,
  };

  let response = use_case.execute(command, ip_address, user_agent).await?;

  Ok(HttpResponse::Ok().json(AuthResponse {
    user_id: response.user_id,
    name: response.name,
    email: response.email,
    session_token: response.session_token,
    expires_at: response.expires_at,
  }))
}

/// POST /api/v1/auth/logout
pub async fn logout_handler(
  use_case: web::Data<Arc<LogoutUserUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let session_token = extract_session_token(&http_req)?;

  use_case.execute(LogoutUserCommand { session_token }).await?;

  Ok(HttpResponse::Ok().json(SuccessResponse {
    message: "Logged out successfully".to_string(),
  }))
}

/// POST /api/v1/auth/logout-all
pub async fn logout_all_handler(
  use_case: web::Data<Arc<LogoutAllDevicesUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user();

  let response = use_case
    .execute(LogoutAllDevicesCommand { user_id: user.id })
    .await?;

  Ok(HttpResponse::Ok().json(LogoutAllResponse {
    sessions_revoked: response.sessions_revoked,
    message: "Logged out from all devices".to_string(),
  }))
}

/// GET /api/v1/auth/me
pub async fn get_current_user_handler(
  use_case: web::Data<Arc<GetCurrentUserUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user();

  let response = use_case
    .execute(GetCurrentUserCommand { user_id: user.id })
    .await?;

  Ok(HttpResponse::Ok().json(CurrentUserResponse {
    user_id: response.user_id,
    name: response.name,
    email: response.email,
    mobile: response.mobile,
    gender: response.gender,
    avatar_path: response.avatar_path,
    is_admin: response.is_admin,
    created_at: response.created_at,
  }))
}
