//! Ticket activity trail types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Discriminates audit records from user comments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActivityType {
    Edit,
    Comment,
}

/// One entry in a ticket's activity trail.
///
/// Append-only from the client's perspective, except that COMMENT
/// entries may be edited or deleted by their author.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResponse {
    pub id: i64,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub author: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

/// Comment create/update payload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub ticket_id: i64,
    pub message: String,
}

impl CommentRequest {
    pub fn new(ticket_id: i64, message: &str) -> Self {
        Self {
            ticket_id,
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activity_deserializes_type_discriminator() {
        let activity: ActivityResponse = serde_json::from_str(
            r#"{
                "id": 5,
                "type": "COMMENT",
                "author": "Maya",
                "message": "Looking into it",
                "createdAt": "2025-03-02T11:00:00Z",
                "lastUpdated": "2025-03-02T11:00:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(activity.activity_type, ActivityType::Comment);
    }
}
