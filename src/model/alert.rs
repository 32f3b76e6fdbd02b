//! Transient alert types

use serde::{Deserialize, Serialize};

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertKind {
    Info,
    Warn,
    Fail,
}

/// A one-off user-facing message shown in the global banner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
    pub kind: AlertKind,
}

impl Alert {
    pub fn new(title: &str, message: &str, kind: AlertKind) -> Self {
        Self {
            title: title.to_string(),
            message: message.to_string(),
            kind,
        }
    }

    pub fn info(title: &str, message: &str) -> Self {
        Self::new(title, message, AlertKind::Info)
    }

    pub fn warn(title: &str, message: &str) -> Self {
        Self::new(title, message, AlertKind::Warn)
    }

    pub fn fail(title: &str, message: &str) -> Self {
        Self::new(title, message, AlertKind::Fail)
    }
}
