//! User account types

use serde::{Deserialize, Serialize};

use crate::model::role::Role;

/// A user account as the backend returns it.
///
/// `email` is the natural key. `editable`/`deletable` say whether the
/// current actor may modify or remove this record; the backend computes
/// them per requester.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub firstname: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub editable: bool,
    #[serde(default)]
    pub deletable: bool,
}

impl UserResponse {
    /// The sentinel returned before any successful login or verify: no
    /// identity, no authorities. Callers must not treat it as a valid
    /// identity for security decisions; every permission check against
    /// it returns false.
    pub fn empty() -> Self {
        Self {
            firstname: String::new(),
            email: String::new(),
            role: Role::empty(),
            editable: false,
            deletable: false,
        }
    }
}

/// Denormalized user summary embedded in tickets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub firstname: String,
    pub email: String,
}

/// Partial user update; `None` fields mean "no change"
#[derive(Debug, Clone, Serialize)]
pub struct PatchUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Password reset payload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub update_password: String,
    pub confirm_password: String,
}

impl ResetPasswordRequest {
    pub fn new(update_password: &str, confirm_password: &str) -> Self {
        Self {
            update_password: update_password.to_string(),
            confirm_password: confirm_password.to_string(),
        }
    }

    /// Form-level check run before any request is sent
    pub fn validate(&self) -> Result<(), crate::error::Error> {
        if self.update_password.is_empty() {
            return Err(crate::error::Error::validation("password must not be empty"));
        }
        if self.update_password != self.confirm_password {
            return Err(crate::error::Error::validation("passwords do not match"));
        }
        Ok(())
    }
}
