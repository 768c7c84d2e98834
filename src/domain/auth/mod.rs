pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{Gender, LoginAttempt, Session, User};
pub use errors::{AuthError, HashError, RepositoryError, ValidationError};
pub use ports::{LoginAttemptRepository, PasswordHasher, SessionRepository, UserRepository};
pub use services::{AuthService, AuthServiceConfig, Registration};
pub use value_objects::{Email, Password, PasswordHash, SessionToken, TokenHash, ValueObjectError};
