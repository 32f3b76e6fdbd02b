//! Cached session state

use serde::{Deserialize, Serialize};

use crate::model::UserResponse;

/// The token pair plus the cached profile of the authenticated user.
///
/// Held by [`crate::auth::Auth`] behind a lock; cleared wholesale on
/// logout or failed verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserResponse,
}

impl Session {
    pub fn new(access_token: String, refresh_token: String, user: UserResponse) -> Self {
        Self {
            access_token,
            refresh_token,
            user,
        }
    }
}
