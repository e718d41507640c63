//! Storage record models for the session slots.

use serde::{Deserialize, Serialize};

/// One of the two durable string slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Current bearer token.
    Token,
    /// Username of the logged-in user.
    Username,
}

impl Slot {
    /// Key under which the slot is stored.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Token => "token",
            Self::Username => "user",
        }
    }
}

/// Persisted form of the session slots.
///
/// Both fields are independent; either may be absent on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Unix timestamp of the last slot mutation.
    #[serde(default)]
    pub updated_at: i64,
}

impl SessionRecord {
    #[must_use]
    pub fn get(&self, slot: Slot) -> Option<&str> {
        match slot {
            Slot::Token => self.token.as_deref(),
            Slot::Username => self.user.as_deref(),
        }
    }

    pub fn set(&mut self, slot: Slot, value: Option<String>) {
        match slot {
            Slot::Token => self.token = value,
            Slot::Username => self.user = value,
        }
        self.updated_at = chrono::Utc::now().timestamp();
    }
}
