//! The closed permission vocabulary
//!
//! Every permission the backend knows is one of the tokens below; an
//! unknown token in a role payload fails deserialization instead of
//! being accepted as granting anything.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single permission token scoping one action on one resource kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Authority {
    #[serde(rename = "ticket::create")]
    TicketCreate,
    #[serde(rename = "ticket::edit")]
    TicketEdit,
    #[serde(rename = "ticket::delete")]
    TicketDelete,
    #[serde(rename = "ticket::assign")]
    TicketAssign,
    #[serde(rename = "ticket::lock-unlock")]
    TicketLockUnlock,
    #[serde(rename = "user::create")]
    UserCreate,
    #[serde(rename = "user::edit")]
    UserEdit,
    #[serde(rename = "user::delete")]
    UserDelete,
    #[serde(rename = "user::reset-password")]
    UserResetPassword,
    #[serde(rename = "role::create")]
    RoleCreate,
    #[serde(rename = "role::edit")]
    RoleEdit,
    #[serde(rename = "role::delete")]
    RoleDelete,
    #[serde(rename = "client::create")]
    ClientCreate,
    #[serde(rename = "client::edit")]
    ClientEdit,
    #[serde(rename = "client::delete")]
    ClientDelete,
}

impl Authority {
    /// Every known token, in vocabulary order
    pub const ALL: [Authority; 15] = [
        Authority::TicketCreate,
        Authority::TicketEdit,
        Authority::TicketDelete,
        Authority::TicketAssign,
        Authority::TicketLockUnlock,
        Authority::UserCreate,
        Authority::UserEdit,
        Authority::UserDelete,
        Authority::UserResetPassword,
        Authority::RoleCreate,
        Authority::RoleEdit,
        Authority::RoleDelete,
        Authority::ClientCreate,
        Authority::ClientEdit,
        Authority::ClientDelete,
    ];

    /// The wire form of the token
    pub fn as_str(&self) -> &'static str {
        match self {
            Authority::TicketCreate => "ticket::create",
            Authority::TicketEdit => "ticket::edit",
            Authority::TicketDelete => "ticket::delete",
            Authority::TicketAssign => "ticket::assign",
            Authority::TicketLockUnlock => "ticket::lock-unlock",
            Authority::UserCreate => "user::create",
            Authority::UserEdit => "user::edit",
            Authority::UserDelete => "user::delete",
            Authority::UserResetPassword => "user::reset-password",
            Authority::RoleCreate => "role::create",
            Authority::RoleEdit => "role::edit",
            Authority::RoleDelete => "role::delete",
            Authority::ClientCreate => "client::create",
            Authority::ClientEdit => "client::edit",
            Authority::ClientDelete => "client::delete",
        }
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
