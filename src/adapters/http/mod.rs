pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use errors::ApiError;
pub use middleware::{AdminGuard, AuthMiddleware, AuthUser, RequestIdMiddleware};
