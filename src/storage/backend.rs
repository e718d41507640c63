//! Storage backend abstraction.
//!
//! The [`SessionStorage`] trait is the only way the session store reaches durable
//! storage, so backends can be swapped without touching the store.

use crate::domain::error::Result;
use crate::storage::models::Slot;

/// Abstraction over the durable session slots.
///
/// # Implementations
///
/// - [`JsonStorage`](crate::storage::JsonStorage): JSON file with atomic writes
/// - [`MemoryStorage`](crate::storage::MemoryStorage): process memory only
pub trait SessionStorage: Send + std::fmt::Debug {
    /// Reads a slot. Returns `Ok(None)` when the slot is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn read(&self, slot: Slot) -> Result<Option<String>>;

    /// Writes a slot, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write cannot be persisted.
    fn write(&mut self, slot: Slot, value: &str) -> Result<()>;

    /// Removes a slot. Removing an empty slot is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the removal cannot be persisted.
    fn remove(&mut self, slot: Slot) -> Result<()>;
}
