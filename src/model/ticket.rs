//! Ticket types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::client::ClientResponse;
use crate::model::user::UserDto;

/// Ticket priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// Ticket lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Open,
    Close,
}

impl Status {
    /// The wire form, used in `/tickets/status/{status}` paths
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Open => "OPEN",
            Status::Close => "CLOSE",
        }
    }
}

/// A support ticket as the backend returns it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    pub lock: bool,
    pub created_by: UserDto,
    #[serde(default)]
    pub assigned_to: Option<UserDto>,
    #[serde(default)]
    pub client: Option<ClientResponse>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

/// New-ticket payload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketRequest {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

impl TicketRequest {
    /// Form-level check run before any request is sent
    pub fn validate(&self) -> Result<(), Error> {
        if self.title.trim().is_empty() {
            return Err(Error::validation("title is required"));
        }
        Ok(())
    }
}

/// Partial ticket update; `None` fields mean "no change"
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchTicketRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<i64>,
}

impl PatchTicketRequest {
    /// True when the patch touches a field a locked ticket refuses:
    /// assignment, priority, or the associated client.
    pub fn touches_locked_fields(&self) -> bool {
        self.priority.is_some() || self.assigned_to.is_some() || self.client.is_some()
    }
}

/// Counts from `GET /tickets/info`, feeding the dashboard tallies
#[derive(Debug, Clone, Deserialize)]
pub struct TicketInfo {
    #[serde(default)]
    pub open_count: i64,
    #[serde(default)]
    pub close_count: i64,
    #[serde(default)]
    pub total_count: i64,
}
