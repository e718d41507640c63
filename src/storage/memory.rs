//! In-process session storage.

use crate::domain::error::Result;
use crate::storage::backend::SessionStorage;
use crate::storage::models::{SessionRecord, Slot};

/// Session storage that lives only as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    record: SessionRecord,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with a token and username, as after a previous login.
    pub fn with_session(token: impl Into<String>, user: impl Into<String>) -> Self {
        let mut record = SessionRecord::default();
        record.set(Slot::Token, Some(token.into()));
        record.set(Slot::Username, Some(user.into()));
        Self { record }
    }
}

impl SessionStorage for MemoryStorage {
    fn read(&self, slot: Slot) -> Result<Option<String>> {
        Ok(self.record.get(slot).map(str::to_string))
    }

    fn write(&mut self, slot: Slot, value: &str) -> Result<()> {
        self.record.set(slot, Some(value.to_string()));
        Ok(())
    }

    fn remove(&mut self, slot: Slot) -> Result<()> {
        self.record.set(slot, None);
        Ok(())
    }
}
