//! User management endpoints.

use tracing::{debug, instrument};

use super::client::HelpdeskClient;
use super::error::Result;
use super::types::{CreateUserRequest, User};

impl HelpdeskClient {
    /// List all users.
    ///
    /// Calls `GET /users`.
    #[instrument(skip(self))]
    pub async fn fetch_users(&self) -> Result<Vec<User>> {
        let users: Vec<User> = self.get("/users").await?;
        debug!("Fetched {} users", users.len());
        Ok(users)
    }

    /// Create a user with an explicit role.
    ///
    /// Calls `POST /users`.
    #[instrument(skip(self, request), fields(email = %request.email, role = %request.role))]
    pub async fn create_user(&self, request: &CreateUserRequest) -> Result<User> {
        self.post("/users", request).await
    }
}
