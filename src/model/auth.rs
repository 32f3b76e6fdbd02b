//! Authentication request/response payloads

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::role::Role;

/// Login credentials
#[derive(Debug, Clone, Serialize)]
pub struct AuthRequest {
    pub email: String,
    pub password: String,
}

impl AuthRequest {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
        }
    }
}

/// New-account payload; sign-up is itself a gated operation
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationRequest {
    pub firstname: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl RegistrationRequest {
    /// Form-level check run before any request is sent
    pub fn validate(&self) -> Result<(), Error> {
        if self.firstname.trim().is_empty() {
            return Err(Error::validation("firstname is required"));
        }
        if !self.email.contains('@') {
            return Err(Error::validation("email address is not valid"));
        }
        if self.password.is_empty() {
            return Err(Error::validation("password must not be empty"));
        }
        Ok(())
    }
}

/// Token pair plus the identity summary the backend returns on login
/// and refresh
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub firstname: String,
    pub email: String,
    pub access_token: String,
    pub refresh_token: String,
    pub role: Role,
}

/// Shape of the `POST /auth/verify` response
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct VerifyResponse {
    #[serde(default)]
    pub success: bool,
}
