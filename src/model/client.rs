//! Client-company types

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A client company tickets can be associated with
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub deletable: bool,
}

/// Create/update payload for clients
#[derive(Debug, Clone, Serialize)]
pub struct ClientRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl ClientRequest {
    pub fn new(name: &str, email: &str, phone: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
        }
    }

    /// Form-level check run before any request is sent
    pub fn validate(&self) -> Result<(), Error> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("client name is required"));
        }
        if !self.email.contains('@') {
            return Err(Error::validation("email address is not valid"));
        }
        Ok(())
    }
}
