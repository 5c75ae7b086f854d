//! Helpdesk API request and response types.
//!
//! These types model the JSON bodies exchanged with the helpdesk REST backend.
//! Field names follow the backend's snake_case wire format.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Access-control role of a user.
///
/// The role decides which screens and actions are offered. It is never
/// changed by this client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access, including user management and ticket assignment.
    Admin,
    /// Support agent working on assigned tickets.
    Agent,
    /// Customer opening and following their own tickets.
    Customer,
}

impl Role {
    /// All roles, in display order.
    pub const ALL: [Role; 3] = [Role::Admin, Role::Agent, Role::Customer];

    /// The wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Agent => "agent",
            Role::Customer => "customer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A helpdesk user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// A support ticket.
///
/// Returned by `GET /tickets`, `GET /tickets/:id`, and as the body of
/// create/update responses. A ticket always has a creator; status, priority
/// and assignment may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i64,
    pub subject: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status_id: Option<i64>,
    #[serde(default)]
    pub status_name: Option<String>,
    #[serde(default)]
    pub priority_id: Option<i64>,
    #[serde(default)]
    pub priority_name: Option<String>,
    pub created_by: i64,
    #[serde(default)]
    pub created_by_name: String,
    #[serde(default)]
    pub created_by_email: String,
    #[serde(default)]
    pub assigned_to: Option<i64>,
    #[serde(default)]
    pub assigned_to_name: Option<String>,
    #[serde(default)]
    pub assigned_to_email: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Ticket {
    /// Status name, or "Unknown" when the ticket has none.
    pub fn status_label(&self) -> &str {
        self.status_name.as_deref().unwrap_or("Unknown")
    }

    /// Priority name, or "None" when the ticket has none.
    pub fn priority_label(&self) -> &str {
        self.priority_name.as_deref().unwrap_or("None")
    }

    /// Assignee name, or "Unassigned".
    pub fn assignee_label(&self) -> &str {
        self.assigned_to_name.as_deref().unwrap_or("Unassigned")
    }

    /// Whether the ticket has reached the "Closed" status.
    pub fn is_closed(&self) -> bool {
        self.status_name.as_deref() == Some("Closed")
    }

    /// Whether an agent has been assigned.
    pub fn is_assigned(&self) -> bool {
        self.assigned_to.is_some()
    }
}

/// A status lookup entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketStatus {
    pub id: i64,
    pub name: String,
}

/// A priority lookup entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketPriority {
    pub id: i64,
    pub name: String,
}

/// A comment on a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub ticket_id: i64,
    pub author_id: i64,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub author_email: String,
    pub content: String,
    pub created_at: String,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub name: &'a str,
}

/// Response of a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

/// Body of `POST /tickets`.
///
/// `assigned_to` is always serialized, as `null` when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateTicketRequest {
    pub subject: String,
    pub description: String,
    pub status_id: Option<i64>,
    pub priority_id: Option<i64>,
    pub assigned_to: Option<i64>,
}

impl CreateTicketRequest {
    /// Status assigned to tickets opened from the create form.
    pub const DEFAULT_STATUS_ID: i64 = 1;
    /// Priority assigned to tickets opened from the create form.
    pub const DEFAULT_PRIORITY_ID: i64 = 1;

    /// A new ticket with the default status and priority and no assignee.
    pub fn new(subject: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            description: description.into(),
            status_id: Some(Self::DEFAULT_STATUS_ID),
            priority_id: Some(Self::DEFAULT_PRIORITY_ID),
            assigned_to: None,
        }
    }
}

/// Partial update for `PATCH /tickets/:id`.
///
/// Only fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TicketUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<i64>,
}

impl TicketUpdate {
    pub fn status(status_id: i64) -> Self {
        Self {
            status_id: Some(status_id),
            ..Default::default()
        }
    }

    pub fn priority(priority_id: i64) -> Self {
        Self {
            priority_id: Some(priority_id),
            ..Default::default()
        }
    }

    pub fn assignee(user_id: i64) -> Self {
        Self {
            assigned_to: Some(user_id),
            ..Default::default()
        }
    }

    /// Check whether the update carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.status_id.is_none() && self.priority_id.is_none() && self.assigned_to.is_none()
    }
}

/// Body of `POST /tickets/:id/comments`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateCommentRequest<'a> {
    pub content: &'a str,
}

/// Body of `POST /users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Error body returned by the backend.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_string(&Role::Agent).unwrap(), "\"agent\"");
        let role: Role = serde_json::from_str("\"customer\"").unwrap();
        assert_eq!(role, Role::Customer);
        assert!(serde_json::from_str::<Role>("\"superuser\"").is_err());
    }

    #[test]
    fn test_ticket_deserializes_nullable_fields() {
        let json = r#"{
            "id": 3,
            "subject": "Printer",
            "description": "Jammed",
            "status_id": null,
            "priority_id": null,
            "status_name": null,
            "priority_name": null,
            "created_by": 9,
            "assigned_to": null,
            "assigned_to_name": null,
            "assigned_to_email": null,
            "created_at": "2024-05-01T10:00:00.000Z",
            "updated_at": null,
            "created_by_name": "Dana",
            "created_by_email": "dana@test.com"
        }"#;
        let ticket: Ticket = serde_json::from_str(json).unwrap();
        assert_eq!(ticket.id, 3);
        assert_eq!(ticket.created_by, 9);
        assert_eq!(ticket.status_label(), "Unknown");
        assert_eq!(ticket.priority_label(), "None");
        assert_eq!(ticket.assignee_label(), "Unassigned");
        assert!(!ticket.is_assigned());
        assert!(!ticket.is_closed());
    }

    #[test]
    fn test_create_ticket_request_defaults() {
        let request = CreateTicketRequest::new("A", "B");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "subject": "A",
                "description": "B",
                "status_id": 1,
                "priority_id": 1,
                "assigned_to": null
            })
        );
    }

    #[test]
    fn test_ticket_update_sends_only_set_fields() {
        let value = serde_json::to_value(TicketUpdate::status(4)).unwrap();
        assert_eq!(value, serde_json::json!({ "status_id": 4 }));

        let value = serde_json::to_value(TicketUpdate::assignee(12)).unwrap();
        assert_eq!(value, serde_json::json!({ "assigned_to": 12 }));

        assert!(TicketUpdate::default().is_empty());
        assert!(!TicketUpdate::priority(2).is_empty());
    }

    #[test]
    fn test_user_without_created_at() {
        let json = r#"{"id":1,"name":"Ada","email":"ada@test.com","role":"admin"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, Role::Admin);
        assert!(user.created_at.is_none());
    }
}
