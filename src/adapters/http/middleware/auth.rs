use actix_web::{
  Error, HttpMessage, HttpResponse,
  body::EitherBody,
  dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::{
  future::{Ready, ready},
  rc::Rc,
  sync::Arc,
};

use crate::{
  adapters::http::errors::{ApiError, AuthErrorKind},
  domain::auth::{entities::User, services::AuthService, value_objects::SessionToken},
};

/// Authentication middleware validating bearer tokens.
///
/// Extracts the token from the `Authorization` header, resolves it to a
/// user through `AuthService::validate_session` and attaches the `User`
/// entity to request extensions. Requests without a valid token are
/// answered with 401 before reaching the handler.
pub struct AuthMiddleware {
  auth_service: Arc<AuthService>,
}

impl AuthMiddleware {
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Transform = AuthMiddlewareService<S>;
  type InitError = ();
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(AuthMiddlewareService {
      service: Rc::new(service),
      auth_service: self.auth_service.clone(),
    }))
  }
}

pub struct AuthMiddlewareService<S> {
  service: Rc<S>,
  auth_service: Arc<AuthService>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  forward_ready!(service);

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let service = Rc::clone(&self.service);
    let auth_service = self.auth_service.clone();

    Box::pin(async move {
      let raw_token = match extract_session_token(&req) {
        Ok(token) => token,
        Err(e) => {
          let (request, _) = req.into_parts();
          let response = HttpResponse::Unauthorized().json(e).map_into_right_body();
          return Ok(ServiceResponse::new(request, response));
        }
      };

      let token = match SessionToken::from_string(raw_token) {
        Ok(token) => token,
        Err(_) => {
          let (request, _) = req.into_parts();
          let error = ApiError::Auth(AuthErrorKind::InvalidToken);
          let response = HttpResponse::Unauthorized().json(error).map_into_right_body();
          return Ok(ServiceResponse::new(request, response));
        }
      };

      let user = match auth_service.validate_session(token).await {
        Ok(user) => user,
        Err(e) => {
          let (request, _) = req.into_parts();
          let api_error: ApiError = e.into();
          let response = HttpResponse::Unauthorized()
            .json(api_error)
            .map_into_right_body();
          return Ok(ServiceResponse::new(request, response));
        }
      };

      req.extensions_mut().insert(user);

      let res = service.call(req).await?;
      Ok(res.map_into_left_body())
    })
  }
}

/// Extract session token from Authorization header
fn extract_session_token(req: &ServiceRequest) -> Result<String, ApiError> {
  req
    .headers()
    .get("Authorization")
    .and_then(|h| h.to_str().ok())
    .and_then(|s| s.strip_prefix("Bearer "))
    .map(|s| s.to_string())
    .ok_or(ApiError::Auth(AuthErrorKind::InvalidToken))
}

/// Extension trait to extract the authenticated user from a request
pub trait AuthUser {
  /// Get the authenticated user from request extensions.
  ///
  /// # Panics
  /// Panics when called from a handler that is not behind `AuthMiddleware`.
  fn authenticated_user(&self) -> User;
}

impl AuthUser for actix_web::HttpRequest {
  fn authenticated_user(&self) -> User {
    self
      .extensions()
      .get::<User>()
      .cloned()
      .expect("User not found in request extensions. Did you forget to add AuthMiddleware?")
  }
}
