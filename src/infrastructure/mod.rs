//! Infrastructure layer for filesystem and environment interactions.
//!
//! Locates the data directory and the files the client keeps in it.

pub mod paths;

pub use paths::{display_path, expand_tilde, get_data_dir, home_dir};

use std::path::{Path, PathBuf};

/// File holding the persisted session slots.
pub const SESSION_FILE: &str = "session.json";

/// Path of the session file inside `data_dir`.
#[must_use]
pub fn session_file(data_dir: &Path) -> PathBuf {
    data_dir.join(SESSION_FILE)
}
