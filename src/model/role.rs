//! Roles and the permission predicates over them

use serde::{Deserialize, Serialize};

use crate::model::authority::Authority;

/// A named bag of authorities assigned to a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub role: String,
    #[serde(default)]
    pub editable: bool,
    #[serde(default)]
    pub deletable: bool,
    pub authorities: Vec<Authority>,
}

impl Role {
    /// The empty role carried by the sentinel user: no authorities, so
    /// every permission check against it fails closed.
    pub fn empty() -> Self {
        Self {
            id: 0,
            role: String::new(),
            editable: false,
            deletable: false,
            authorities: Vec::new(),
        }
    }

    /// True iff this role holds the given authority
    pub fn has_authority(&self, authority: Authority) -> bool {
        self.authorities.contains(&authority)
    }

    /// True iff this role holds at least one of the given authorities
    pub fn has_any_authority(&self, authorities: &[Authority]) -> bool {
        authorities.iter().any(|a| self.has_authority(*a))
    }
}

/// Create/patch payload for roles; `None` fields mean "no change"
#[derive(Debug, Clone, Serialize)]
pub struct RoleRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorities: Option<Vec<Authority>>,
}

impl RoleRequest {
    pub fn new(role: &str, authorities: Vec<Authority>) -> Self {
        Self {
            role: Some(role.to_string()),
            authorities: Some(authorities),
        }
    }
}
