use actix_web::{
  Error, HttpMessage, HttpResponse,
  body::EitherBody,
  dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::{
  future::{Ready, ready},
  rc::Rc,
};

use crate::{adapters::http::errors::ApiError, domain::auth::entities::User};

/// Gate that rejects non-admin users with 403.
///
/// Must run after `AuthMiddleware`, which puts the `User` into request
/// extensions; a missing user is treated as forbidden.
#[derive(Debug, Clone, Default)]
pub struct AdminGuard;

impl AdminGuard {
  pub fn new() -> Self {
    Self
  }
}

impl<S, B> Transform<S, ServiceRequest> for AdminGuard
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Transform = AdminGuardService<S>;
  type InitError = ();
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(AdminGuardService {
      service: Rc::new(service),
    }))
  }
}

pub struct AdminGuardService<S> {
  service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AdminGuardService<S>
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

    let is_admin = req
      .extensions()
      .get::<User>()
      .map(|user| user.is_admin)
      .unwrap_or(false);

    Box::pin(async move {
      if !is_admin {
        let (request, _) = req.into_parts();
        let error = ApiError::Forbidden("Administrator access required".to_string());
        let response = HttpResponse::Forbidden().json(error).map_into_right_body();
        return Ok(ServiceResponse::new(request, response));
      }

      let res = service.call(req).await?;
      Ok(res.map_into_left_body())
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::{
    App, HttpResponse,
    test::{self, TestRequest},
    web,
  };
  use chrono::Utc;
  use uuid::Uuid;

  fn make_user(is_admin: bool) -> User {
    let mut user = User::new(
      "Sam".to_string(),
      "sam@example.com".to_string(),
      "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2holA".to_string(),
    );
    user.is_admin = is_admin;
    user.created_at = Utc::now();
    user
  }

  #[actix_web::test]
  async fn blocks_regular_users() {
    let app = test::init_service(
      App::new().service(
        web::scope("")
          .wrap(AdminGuard::new())
          .route("/", web::get().to(HttpResponse::Ok)),
      ),
    )
    .await;

    let req = TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::FORBIDDEN);
  }

  #[actix_web::test]
  async fn passes_admin_users() {
    async fn inject_admin(req: actix_web::HttpRequest) -> HttpResponse {
      let _ = req;
      HttpResponse::Ok().finish()
    }

    // Simulate the auth middleware by inserting the user up front
    let app = test::init_service(
      App::new()
        .wrap_fn(|req, srv| {
          req.extensions_mut().insert(make_user(true));
          srv.call(req)
        })
        .service(
          web::scope("")
            .wrap(AdminGuard::new())
            .route("/", web::get().to(inject_admin)),
        ),
    )
    .await;

    let req = TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
  }

  #[test]
  fn admin_flag_checked() {
    assert!(make_user(true).is_admin);
    assert!(!make_user(false).is_admin);
  }
}
