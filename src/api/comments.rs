//! Ticket comment endpoints.

use tracing::instrument;

use super::client::HelpdeskClient;
use super::error::Result;
use super::types::{Comment, CreateCommentRequest};

impl HelpdeskClient {
    /// List the comments on a ticket, oldest first as returned by the server.
    ///
    /// Calls `GET /tickets/:id/comments`.
    #[instrument(skip(self))]
    pub async fn fetch_comments(&self, ticket_id: i64) -> Result<Vec<Comment>> {
        self.get(&format!("/tickets/{}/comments", ticket_id)).await
    }

    /// Add a comment to a ticket.
    ///
    /// Calls `POST /tickets/:id/comments`.
    #[instrument(skip(self, content))]
    pub async fn add_comment(&self, ticket_id: i64, content: &str) -> Result<Comment> {
        self.post(
            &format!("/tickets/{}/comments", ticket_id),
            &CreateCommentRequest { content },
        )
        .await
    }
}
