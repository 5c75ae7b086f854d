//! Authentication endpoints.
//!
//! Login exchanges credentials for a bearer token and the user profile.
//! Registration creates the account and then signs in with the same
//! credentials, so both produce a [`LoginResponse`].

use tracing::{info, instrument};

use super::client::HelpdeskClient;
use super::error::Result;
use super::types::{LoginRequest, LoginResponse, RegisterRequest};

impl HelpdeskClient {
    /// Sign in with email and password.
    ///
    /// Calls `POST /auth/login`.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let response: LoginResponse = self
            .post("/auth/login", &LoginRequest { email, password })
            .await?;
        info!(user_id = response.user.id, role = %response.user.role, "Login accepted");
        Ok(response)
    }

    /// Create an account, then sign in with it.
    ///
    /// Calls `POST /auth/register` followed by `POST /auth/login`. The
    /// registration response body is not used. If registration fails, login
    /// is not attempted.
    #[instrument(skip(self, password))]
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<LoginResponse> {
        self.post_discarding(
            "/auth/register",
            &RegisterRequest {
                email,
                password,
                name,
            },
        )
        .await?;
        info!("Registration accepted, signing in");
        self.login(email, password).await
    }
}

#[cfg(test)]
mod tests {
    use crate::api::client::HelpdeskClient;
    use crate::api::types::Role;
    use crate::session::SharedToken;
    use mockito::Matcher;
    use serde_json::json;

    const LOGIN_BODY: &str = r#"{
        "user": {"id": 4, "name": "Ada", "email": "ada@test.com", "role": "agent"},
        "token": "jwt-token"
    }"#;

    fn client(server: &mockito::ServerGuard) -> HelpdeskClient {
        HelpdeskClient::new(&server.url(), SharedToken::default(), None).unwrap()
    }

    #[tokio::test]
    async fn test_login_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/login")
            .match_body(Matcher::Json(json!({
                "email": "ada@test.com",
                "password": "pw"
            })))
            .with_status(200)
            .with_body(LOGIN_BODY)
            .create_async()
            .await;

        let response = client(&server).login("ada@test.com", "pw").await.unwrap();

        assert_eq!(response.token, "jwt-token");
        assert_eq!(response.user.role, Role::Agent);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_login_rejected_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/auth/login")
            .with_status(401)
            .with_body(r#"{"message":"Invalid credentials"}"#)
            .create_async()
            .await;

        let err = client(&server).login("x@test.com", "bad").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let mut server = mockito::Server::new_async().await;
        let register = server
            .mock("POST", "/auth/register")
            .match_body(Matcher::Json(json!({
                "email": "ada@test.com",
                "password": "pw",
                "name": "Ada"
            })))
            .with_status(201)
            .create_async()
            .await;
        let login = server
            .mock("POST", "/auth/login")
            .with_status(200)
            .with_body(LOGIN_BODY)
            .create_async()
            .await;

        let response = client(&server)
            .register("Ada", "ada@test.com", "pw")
            .await
            .unwrap();

        assert_eq!(response.user.name, "Ada");
        register.assert_async().await;
        login.assert_async().await;
    }

    #[tokio::test]
    async fn test_register_failure_skips_login() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/auth/register")
            .with_status(409)
            .with_body(r#"{"message":"Email already exists"}"#)
            .create_async()
            .await;
        let login = server
            .mock("POST", "/auth/login")
            .expect(0)
            .create_async()
            .await;

        let err = client(&server)
            .register("Ada", "ada@test.com", "pw")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Email already exists");
        login.assert_async().await;
    }
}
