//! Durable client storage for the session slots.
//!
//! The client persists exactly two opaque strings: the current token and the
//! current username. Losing either slot is treated as "logged out".
//!
//! # Modules
//!
//! - `backend`: Storage trait abstraction for backend implementations
//! - `json`: JSON file-based storage with atomic writes
//! - `memory`: In-process storage for tests and ephemeral sessions
//! - `models`: Slot names and the persisted record

pub mod backend;
pub mod json;
pub mod memory;
pub mod models;

pub use backend::SessionStorage;
pub use json::JsonStorage;
pub use memory::MemoryStorage;
pub use models::{SessionRecord, Slot};
