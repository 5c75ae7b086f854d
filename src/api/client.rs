//! Helpdesk API client implementation.
//!
//! This module provides the HTTP client for the helpdesk REST backend. It
//! attaches the bearer token on every request, performs exactly one attempt
//! per call, and normalizes failures into [`ApiError`] values whose message is
//! the server's own `message` when it sends one.

use std::time::Duration;

use reqwest::{header, Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::error::{ApiError, Result};
use super::types::ErrorBody;
use crate::session::SharedToken;

/// The helpdesk API client.
///
/// Cheap to clone; clones share the connection pool and the token slot, so a
/// login or logout is seen by every clone on its next request.
#[derive(Debug, Clone)]
pub struct HelpdeskClient {
    /// The HTTP client.
    client: Client,
    /// The backend base URL, without a trailing slash.
    base_url: String,
    /// Bearer token slot owned by the session.
    token: SharedToken,
}

impl HelpdeskClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The backend URL, e.g. `http://localhost:4000`
    /// * `token` - The session's token slot
    /// * `timeout` - Optional per-request timeout; `None` waits indefinitely
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not http(s) or the HTTP client cannot
    /// be built.
    pub fn new(base_url: &str, token: SharedToken, timeout: Option<Duration>) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ApiError::Network)?;

        debug!("Created helpdesk client for {}", base_url);
        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the absolute URL for an API path.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Perform a GET request and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(self.request(Method::GET, path)).await
    }

    /// Perform a POST request with a JSON body.
    pub(crate) async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    /// Perform a POST request whose success body is not needed.
    pub(crate) async fn post_discarding<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<()> {
        let response = self
            .request(Method::POST, path)
            .json(body)
            .send()
            .await
            .map_err(ApiError::Network)?;

        if response.status().is_success() {
            debug!("{} {}", response.status().as_u16(), path);
            Ok(())
        } else {
            Err(Self::error_from_response(response).await)
        }
    }

    /// Perform a PATCH request with a JSON body.
    pub(crate) async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.send(self.request(Method::PATCH, path).json(body)).await
    }

    /// Start a request with the JSON headers and, when signed in, the bearer token.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self
            .client
            .request(method, self.url(path))
            .header(header::ACCEPT, "application/json")
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(token) = self.token.get() {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        builder
    }

    /// Execute a single attempt.
    #[instrument(skip_all)]
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await.map_err(|e| {
            warn!("Request failed before a response arrived: {}", e);
            ApiError::Network(e)
        })?;
        self.handle_response(response).await
    }

    /// Handle the HTTP response, checking for errors and parsing JSON.
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            debug!("{} {}", status.as_u16(), response.url().path());
            response
                .json::<T>()
                .await
                .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))
        } else {
            Err(Self::error_from_response(response).await)
        }
    }

    /// Create an error from a non-success response.
    ///
    /// The body's `message` wins; otherwise a generic status message is used.
    async fn error_from_response(response: Response) -> ApiError {
        let status = response.status();
        let path = response.url().path().to_string();
        let body = response.text().await.unwrap_or_default();
        debug!("Error response body: {}", body);

        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| ApiError::generic_message(status));

        warn!(status = status.as_u16(), path = %path, "Request rejected: {}", message);
        ApiError::from_status(status, message)
    }
}

/// Normalize the base URL by removing trailing slashes.
fn normalize_base_url(url: &str) -> Result<String> {
    let url = url.trim().trim_end_matches('/');

    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ApiError::InvalidUrl(format!(
            "'{}' must start with http:// or https://",
            url
        )));
    }

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client_for(server: &mockito::ServerGuard, token: Option<&str>) -> HelpdeskClient {
        HelpdeskClient::new(
            &server.url(),
            SharedToken::new(token.map(str::to_string)),
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_normalize_base_url_removes_trailing_slash() {
        assert_eq!(
            normalize_base_url("http://localhost:4000/").unwrap(),
            "http://localhost:4000"
        );
        assert_eq!(
            normalize_base_url("https://helpdesk.example.com/api///").unwrap(),
            "https://helpdesk.example.com/api"
        );
    }

    #[test]
    fn test_normalize_base_url_rejects_other_schemes() {
        assert!(matches!(
            normalize_base_url("localhost:4000"),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_bearer_token_attached() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/ping")
            .match_header("authorization", "Bearer abc123")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok":true}"#)
            .create_async()
            .await;

        let client = client_for(&server, Some("abc123"));
        let body: serde_json::Value = client.get("/ping").await.unwrap();

        assert_eq!(body, json!({ "ok": true }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_no_authorization_header_when_signed_out() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/ping")
            .match_header("authorization", mockito::Matcher::Missing)
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = client_for(&server, None);
        let _: serde_json::Value = client.get("/ping").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_token_change_seen_by_clones() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/ping")
            .match_header("authorization", "Bearer fresh")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let slot = SharedToken::new(None);
        let client = HelpdeskClient::new(&server.url(), slot.clone(), None).unwrap();
        let clone = client.clone();
        slot.set(Some("fresh".to_string()));

        let _: serde_json::Value = clone.get("/ping").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_message_is_used() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/users")
            .with_status(409)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message":"Email already exists"}"#)
            .create_async()
            .await;

        let client = client_for(&server, Some("t"));
        let err = client
            .post::<_, serde_json::Value>("/users", &json!({}))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Email already exists");
        assert_eq!(err.status(), Some(409));
    }

    #[tokio::test]
    async fn test_generic_message_without_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/tickets")
            .with_status(500)
            .with_body("Internal Server Error")
            .create_async()
            .await;

        let client = client_for(&server, Some("t"));
        let err = client.get::<serde_json::Value>("/tickets").await.unwrap_err();

        assert_eq!(err.to_string(), "Request failed with status code 500");
        assert!(matches!(err, ApiError::Server { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_variant() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/tickets/9")
            .with_status(401)
            .with_body(r#"{"message":"Invalid token"}"#)
            .create_async()
            .await;

        let client = client_for(&server, Some("stale"));
        let err = client.get::<serde_json::Value>("/tickets/9").await.unwrap_err();

        assert!(err.is_auth_failure());
        assert_eq!(err.to_string(), "Invalid token");
    }

    #[tokio::test]
    async fn test_malformed_success_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/ping")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = client_for(&server, None);
        let err = client.get::<serde_json::Value>("/ping").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_single_attempt_on_failure() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/tickets")
            .with_status(503)
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server, Some("t"));
        assert!(client.get::<serde_json::Value>("/tickets").await.is_err());
        mock.assert_async().await;
    }
}
