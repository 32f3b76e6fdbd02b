//! Notification types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A per-user notification, delivered over REST or pushed over the feed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
