//! Ticket, status and priority endpoints.

use tracing::{debug, instrument};

use super::client::HelpdeskClient;
use super::error::{ApiError, Result};
use super::types::{CreateTicketRequest, Ticket, TicketPriority, TicketStatus, TicketUpdate};

impl HelpdeskClient {
    /// List the tickets visible to the signed-in user.
    ///
    /// Calls `GET /tickets`. A `null` body is treated as an empty list.
    #[instrument(skip(self))]
    pub async fn fetch_tickets(&self) -> Result<Vec<Ticket>> {
        let tickets: Option<Vec<Ticket>> = self.get("/tickets").await?;
        let tickets = tickets.unwrap_or_default();
        debug!("Fetched {} tickets", tickets.len());
        Ok(tickets)
    }

    /// Open a new ticket.
    ///
    /// Calls `POST /tickets` and returns the stored ticket.
    #[instrument(skip(self, request), fields(subject = %request.subject))]
    pub async fn create_ticket(&self, request: &CreateTicketRequest) -> Result<Ticket> {
        let ticket: Ticket = self.post("/tickets", request).await?;
        debug!("Created ticket #{}", ticket.id);
        Ok(ticket)
    }

    /// Get a single ticket by id.
    ///
    /// Calls `GET /tickets/:id`.
    #[instrument(skip(self))]
    pub async fn fetch_ticket(&self, id: i64) -> Result<Ticket> {
        self.get(&format!("/tickets/{}", id)).await
    }

    /// Apply a partial update to a ticket.
    ///
    /// Calls `PATCH /tickets/:id` with only the fields set in `update`.
    #[instrument(skip(self))]
    pub async fn update_ticket(&self, id: i64, update: &TicketUpdate) -> Result<Ticket> {
        if update.is_empty() {
            return Err(ApiError::InvalidRequest(
                "ticket update carries no fields".to_string(),
            ));
        }
        let ticket: Ticket = self.patch(&format!("/tickets/{}", id), update).await?;
        debug!("Updated ticket #{}", ticket.id);
        Ok(ticket)
    }

    /// List the available ticket statuses.
    ///
    /// Calls `GET /statuses`.
    #[instrument(skip(self))]
    pub async fn fetch_statuses(&self) -> Result<Vec<TicketStatus>> {
        self.get("/statuses").await
    }

    /// List the available ticket priorities.
    ///
    /// Calls `GET /priorities`.
    #[instrument(skip(self))]
    pub async fn fetch_priorities(&self) -> Result<Vec<TicketPriority>> {
        self.get("/priorities").await
    }
}

#[cfg(test)]
mod tests {
    use crate::api::client::HelpdeskClient;
    use crate::api::types::{CreateTicketRequest, TicketUpdate};
    use crate::session::SharedToken;
    use mockito::Matcher;
    use serde_json::json;

    fn ticket_json(id: i64, status: &str) -> serde_json::Value {
        json!({
            "id": id,
            "subject": "Printer jam",
            "description": "Paper stuck",
            "status_id": 1,
            "priority_id": 1,
            "status_name": status,
            "priority_name": "Low",
            "created_by": 7,
            "assigned_to": null,
            "assigned_to_name": null,
            "assigned_to_email": null,
            "created_at": "2024-05-01T10:00:00.000Z",
            "updated_at": null,
            "created_by_name": "Dana",
            "created_by_email": "dana@test.com"
        })
    }

    fn client(server: &mockito::ServerGuard) -> HelpdeskClient {
        HelpdeskClient::new(
            &server.url(),
            SharedToken::new(Some("tok".to_string())),
            None,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_tickets() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/tickets")
            .match_header("authorization", "Bearer tok")
            .with_status(200)
            .with_body(json!([ticket_json(1, "Open"), ticket_json(2, "Closed")]).to_string())
            .create_async()
            .await;

        let tickets = client(&server).fetch_tickets().await.unwrap();
        assert_eq!(tickets.len(), 2);
        assert!(tickets[1].is_closed());
    }

    #[tokio::test]
    async fn test_fetch_tickets_null_body_is_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/tickets")
            .with_status(200)
            .with_body("null")
            .create_async()
            .await;

        let tickets = client(&server).fetch_tickets().await.unwrap();
        assert!(tickets.is_empty());
    }

    #[tokio::test]
    async fn test_create_ticket_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/tickets")
            .match_body(Matcher::Json(json!({
                "subject": "A",
                "description": "B",
                "status_id": 1,
                "priority_id": 1,
                "assigned_to": null
            })))
            .with_status(201)
            .with_body(ticket_json(11, "Open").to_string())
            .create_async()
            .await;

        let ticket = client(&server)
            .create_ticket(&CreateTicketRequest::new("A", "B"))
            .await
            .unwrap();

        assert_eq!(ticket.id, 11);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_update_ticket_sends_partial_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PATCH", "/tickets/5")
            .match_body(Matcher::Json(json!({ "status_id": 3 })))
            .with_status(200)
            .with_body(ticket_json(5, "Resolved").to_string())
            .create_async()
            .await;

        let ticket = client(&server)
            .update_ticket(5, &TicketUpdate::status(3))
            .await
            .unwrap();

        assert_eq!(ticket.status_label(), "Resolved");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_update_ticket_rejects_empty_update() {
        let server = mockito::Server::new_async().await;
        let result = client(&server)
            .update_ticket(5, &TicketUpdate::default())
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_fetch_ticket_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/tickets/99")
            .with_status(404)
            .with_body(r#"{"message":"Ticket not found"}"#)
            .create_async()
            .await;

        let err = client(&server).fetch_ticket(99).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "Ticket not found");
    }

    #[tokio::test]
    async fn test_fetch_lookups() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/statuses")
            .with_status(200)
            .with_body(r#"[{"id":1,"name":"Open"},{"id":2,"name":"In Progress"}]"#)
            .create_async()
            .await;
        server
            .mock("GET", "/priorities")
            .with_status(200)
            .with_body(r#"[{"id":1,"name":"Low"},{"id":3,"name":"High"}]"#)
            .create_async()
            .await;

        let client = client(&server);
        let statuses = client.fetch_statuses().await.unwrap();
        let priorities = client.fetch_priorities().await.unwrap();

        assert_eq!(statuses[1].name, "In Progress");
        assert_eq!(priorities[1].id, 3);
    }
}
