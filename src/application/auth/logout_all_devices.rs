use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;

/// Command for revoking every session of a user
#[derive(Debug, Clone)]
pub struct LogoutAllDevicesCommand {
  pub user_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct LogoutAllDevicesResponse {
  pub sessions_revoked: u64,
}

pub struct LogoutAllDevicesUseCase {
  auth_service: Arc<AuthService>,
}

impl LogoutAllDevicesUseCase {
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  pub async fn execute(
    &self,
    command: LogoutAllDevicesCommand,
  ) -> Result<LogoutAllDevicesResponse, AuthError> {
    let sessions_revoked = self.auth_service.logout_all(command.user_id).await?;
    Ok(LogoutAllDevicesResponse { sessions_revoked })
  }
}
