//! myflix: client-side session, search and favorites synchronization for the
//! myFlix movie catalog.
//!
//! The crate provides:
//! - A session store holding the bearer token and username, persisted to disk
//!   and observed by any number of components
//! - A search broadcast carrying the lower-cased catalog filter term
//! - A remote gateway, the only component that performs network I/O
//! - A favorites reconciler that keeps each view's favorites snapshot equal to
//!   the server's copy after confirmed mutations
//! - View models for the catalog grid, movie detail, genres, favorites list and
//!   profile, plus a route guard and header model

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Terminal driver (main.rs)                          │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │
//! │  - AppContext, constructed once and passed down     │
//! │  - Views, routing guard, header, account flows      │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Favorites     │   │ Catalog       │   │ Gateway       │
//! │ (favorites/)  │   │ (catalog/)    │   │ (gateway/)    │
//! │ - Reconciler  │   │ - Filter      │   │ - CatalogApi  │
//! │ - Phases      │   │ - Lookup      │   │ - HTTP client │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Stores (store/) and Storage (storage/)             │
//! │  - Observable, SessionStore, SearchBroadcast        │
//! │  - JSON session file, in-memory slots               │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain, Infrastructure, Observability              │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Application context, views and routing
//! - [`catalog`]: Search filter, lookups, per-view catalog cache
//! - [`domain`]: Records and the error type
//! - [`favorites`]: Favorites reconciler state machine
//! - [`gateway`]: Remote gateway trait and HTTP implementation
//! - [`infrastructure`]: Data directory paths
//! - [`observability`]: Rotating-file tracing setup
//! - [`storage`]: Durable session slots
//! - [`store`]: Observable state shared across components
//!
//! # Configuration
//!
//! Configuration is layered: defaults, then an optional TOML file, then
//! `MYFLIX_*` environment variables, then command-line flags.
//!
//! ```toml
//! # ~/.config/myflix/config.toml
//! api_url = "https://movies-my-flix-app-60bc918eee2b.herokuapp.com/"
//! data_dir = "~/.local/share/myflix"
//! timeout_secs = 10
//! trace_level = "debug"
//! ```
//!
//! # Example
//!
//! ```no_run
//! use myflix::app::{account, AppContext, CatalogView};
//! use myflix::{Config, Credentials};
//!
//! # async fn demo() -> myflix::Result<()> {
//! let ctx = AppContext::new(Config::default())?;
//! account::login(&ctx, &Credentials::new("alice", "secret")).await?;
//!
//! let mut catalog = CatalogView::new(&ctx)?;
//! catalog.activate().await?;
//!
//! ctx.search.set_term("Dark");
//! for movie in catalog.visible_movies() {
//!     println!("{} ({})", movie.name, catalog.genre_name(&movie));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Key Design Decisions
//!
//! ## Constructor-injected stores
//!
//! The session store and search broadcast are plain values owned by
//! [`app::AppContext`]. Clones are handles onto the same state, so every view
//! observes the same token and term without global state.
//!
//! ## Refresh on focus
//!
//! Each view holds its own catalog cache and favorites snapshot. A mutation in
//! one view is not pushed to others; they re-fetch when activated.
//!
//! ## Confirm-first mutations
//!
//! A favorite toggle changes local state only after the server accepts it. A
//! rejected toggle leaves the snapshot untouched.

pub mod app;
pub mod catalog;
pub mod domain;
pub mod favorites;
pub mod gateway;
pub mod infrastructure;
pub mod observability;
pub mod storage;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

pub use app::{AppContext, Route};
pub use catalog::filter_movies;
pub use domain::{
    Credentials, Director, Genre, MovieId, MovieRecord, MyflixError, Registration, Result,
    UserPatch, UserRecord,
};
pub use favorites::{FavoritesReconciler, Phase};
pub use gateway::{CatalogApi, RemoteGateway};
pub use store::{SearchBroadcast, SessionStore};

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Hosted myFlix API.
pub const DEFAULT_API_URL: &str = "https://movies-my-flix-app-60bc918eee2b.herokuapp.com/";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Client configuration.
///
/// # Example
///
/// ```
/// use myflix::Config;
///
/// let config = Config::default();
/// assert_eq!(config.timeout_secs, 10);
/// assert!(config.api_url.starts_with("https://"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the myFlix API. Endpoint paths are resolved against it.
    pub api_url: String,

    /// Directory holding the session file and the log file.
    ///
    /// Default: `~/.local/share/myflix`
    pub data_dir: PathBuf,

    /// Per-request timeout. Default: 10
    pub timeout_secs: u64,

    /// Tracing level for the log file.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            data_dir: infrastructure::get_data_dir(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            trace_level: None,
        }
    }
}

/// On-disk shape of the config file; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    api_url: Option<String>,
    data_dir: Option<String>,
    timeout_secs: Option<u64>,
    trace_level: Option<String>,
}

impl Config {
    /// Loads a TOML config file layered over the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`MyflixError::Io`] if the file cannot be read and
    /// [`MyflixError::Config`] if it is not valid TOML.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parses TOML config text layered over the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`MyflixError::Config`] on invalid TOML or unknown keys.
    ///
    /// # Example
    ///
    /// ```
    /// use myflix::Config;
    ///
    /// let config = Config::from_toml("timeout_secs = 3\ntrace_level = \"debug\"")?;
    /// assert_eq!(config.timeout_secs, 3);
    /// assert_eq!(config.trace_level.as_deref(), Some("debug"));
    /// # Ok::<(), myflix::MyflixError>(())
    /// ```
    pub fn from_toml(contents: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents)
            .map_err(|e| MyflixError::Config(format!("invalid config file: {e}")))?;

        let mut config = Self::default();
        if let Some(api_url) = file.api_url {
            config.api_url = api_url;
        }
        if let Some(data_dir) = file.data_dir {
            config.data_dir = infrastructure::expand_tilde(&data_dir);
        }
        if let Some(timeout_secs) = file.timeout_secs.filter(|secs| *secs > 0) {
            config.timeout_secs = timeout_secs;
        }
        config.trace_level = file.trace_level.or(config.trace_level);
        Ok(config)
    }

    /// Applies `MYFLIX_*` variables from an environment map.
    ///
    /// # Parsing Rules
    ///
    /// - `MYFLIX_API_URL`: used as-is when non-empty
    /// - `MYFLIX_DATA_DIR`: tilde-expanded
    /// - `MYFLIX_TIMEOUT_SECS`: positive integer, otherwise ignored
    /// - `MYFLIX_TRACE_LEVEL`: used as-is when non-empty
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use myflix::Config;
    ///
    /// let mut env = BTreeMap::new();
    /// env.insert("MYFLIX_TIMEOUT_SECS".to_string(), "30".to_string());
    /// env.insert("MYFLIX_API_URL".to_string(), "http://localhost:8080/".to_string());
    ///
    /// let config = Config::default().apply_env_map(&env);
    /// assert_eq!(config.timeout_secs, 30);
    /// assert_eq!(config.api_url, "http://localhost:8080/");
    /// ```
    #[must_use]
    pub fn apply_env_map(mut self, env: &BTreeMap<String, String>) -> Self {
        let get = |key: &str| env.get(key).map(|s| s.trim()).filter(|s| !s.is_empty());

        if let Some(api_url) = get("MYFLIX_API_URL") {
            self.api_url = api_url.to_string();
        }
        if let Some(data_dir) = get("MYFLIX_DATA_DIR") {
            self.data_dir = infrastructure::expand_tilde(data_dir);
        }
        if let Some(raw) = get("MYFLIX_TIMEOUT_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => self.timeout_secs = secs,
                _ => tracing::debug!(value = %raw, "ignoring invalid MYFLIX_TIMEOUT_SECS"),
            }
        }
        if let Some(level) = get("MYFLIX_TRACE_LEVEL") {
            self.trace_level = Some(level.to_string());
        }
        self
    }

    /// Applies the process environment.
    #[must_use]
    pub fn apply_env(self) -> Self {
        let env: BTreeMap<String, String> = std::env::vars()
            .filter(|(key, _)| key.starts_with("MYFLIX_"))
            .collect();
        self.apply_env_map(&env)
    }

    /// Path of the persisted session file.
    #[must_use]
    pub fn session_path(&self) -> PathBuf {
        infrastructure::session_file(&self.data_dir)
    }
}
