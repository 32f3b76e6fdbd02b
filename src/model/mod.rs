//! Wire types shared with the Latte backend

pub mod activity;
pub mod alert;
pub mod auth;
pub mod authority;
pub mod client;
pub mod notification;
pub mod page;
pub mod role;
pub mod ticket;
pub mod user;

pub use activity::{ActivityResponse, ActivityType, CommentRequest};
pub use alert::{Alert, AlertKind};
pub use auth::{AuthRequest, AuthResponse, RegistrationRequest};
pub use authority::Authority;
pub use client::{ClientRequest, ClientResponse};
pub use notification::Notification;
pub use page::Page;
pub use role::{Role, RoleRequest};
pub use ticket::{
    PatchTicketRequest, Priority, Status, TicketInfo, TicketRequest, TicketResponse,
};
pub use user::{PatchUserRequest, ResetPasswordRequest, UserDto, UserResponse};
