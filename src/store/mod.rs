//! Process-wide client state with publish/subscribe semantics.
//!
//! Both stores are explicit objects built once at the application root and handed
//! to every component that needs them. They are cheap to clone; clones share
//! the same underlying value and observer list.
//!
//! # Modules
//!
//! - [`observable`]: Generic observable value with callback and stream observers
//! - [`session`]: Authentication token and username, backed by durable storage
//! - [`search`]: Live free-text search term

pub mod observable;
pub mod search;
pub mod session;

pub use observable::{Observable, Subscription};
pub use search::SearchBroadcast;
pub use session::SessionStore;
