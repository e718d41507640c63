//! Path helpers for the client's data directory.
//!
//! The data directory holds the persisted session and the log file. It defaults
//! to `~/.local/share/myflix` and falls back to a `.myflix` directory under the
//! working directory when no home directory is known.

use std::path::{Path, PathBuf};

/// Returns the user's home directory from `HOME` (or `USERPROFILE`).
#[must_use]
pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
}

/// Returns the default data directory.
///
/// # Examples
///
/// ```
/// use myflix::infrastructure::get_data_dir;
///
/// let data_dir = get_data_dir();
/// assert!(data_dir.ends_with("myflix"));
/// ```
#[must_use]
pub fn get_data_dir() -> PathBuf {
    home_dir().map_or_else(
        || PathBuf::from(".myflix"),
        |home| home.join(".local").join("share").join("myflix"),
    )
}

/// Expands a leading `~` to the home directory.
///
/// Paths without a tilde, and all paths when no home directory is known, are
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use myflix::infrastructure::expand_tilde;
/// use std::path::PathBuf;
///
/// assert_eq!(expand_tilde("/absolute/path"), PathBuf::from("/absolute/path"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    expand_tilde_with(path, home_dir().as_deref())
}

fn expand_tilde_with(path: &str, home: Option<&Path>) -> PathBuf {
    match (path, home) {
        ("~", Some(home)) => home.to_path_buf(),
        (rest, Some(home)) if rest.starts_with("~/") => home.join(&rest[2..]),
        _ => PathBuf::from(path),
    }
}

/// Replaces the home directory prefix with `~` for display.
#[must_use]
pub fn display_path(path: &Path) -> String {
    display_path_with(path, home_dir().as_deref())
}

fn display_path_with(path: &Path, home: Option<&Path>) -> String {
    match home.and_then(|home| path.strip_prefix(home).ok()) {
        Some(rest) if rest.as_os_str().is_empty() => "~".to_string(),
        Some(rest) => format!("~/{}", rest.display()),
        None => path.display().to_string(),
    }
}
