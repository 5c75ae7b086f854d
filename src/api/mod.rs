//! Helpdesk API client and types.
//!
//! This module provides the interface for communicating with the helpdesk
//! REST backend. Each endpoint is a method on [`HelpdeskClient`], grouped by
//! resource.

mod auth;
mod client;
mod comments;
pub mod error;
mod tickets;
pub mod types;
mod users;

pub use client::HelpdeskClient;
pub use error::ApiError;
