//! The application root.

use crate::domain::Result;
use crate::gateway::{CatalogApi, RemoteGateway};
use crate::storage::JsonStorage;
use crate::store::{SearchBroadcast, SessionStore};
use crate::Config;
use std::sync::Arc;

/// Everything a view needs, constructed once at startup and passed down.
///
/// Cloning yields handles onto the same session, search term and gateway.
#[derive(Clone, Debug)]
pub struct AppContext {
    pub config: Config,
    pub session: SessionStore,
    pub search: SearchBroadcast,
    pub api: Arc<dyn CatalogApi>,
}

impl AppContext {
    /// Restores the session from the data directory and builds the HTTP
    /// gateway around it.
    ///
    /// # Errors
    ///
    /// Returns an error if the session file cannot be opened or the API URL
    /// is invalid.
    pub fn new(config: Config) -> Result<Self> {
        let _span = tracing::debug_span!("app_context_new", api_url = %config.api_url).entered();

        let storage = JsonStorage::new(config.session_path())?;
        let session = SessionStore::restore(Box::new(storage));
        let gateway = RemoteGateway::new(&config, session.clone())?;

        Ok(Self::with_api(config, session, Arc::new(gateway)))
    }

    /// Wires an existing session and gateway together.
    pub fn with_api(config: Config, session: SessionStore, api: Arc<dyn CatalogApi>) -> Self {
        Self {
            config,
            session,
            search: SearchBroadcast::new(),
            api,
        }
    }

    /// Username of the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns [`MyflixError::Unauthenticated`] unless both the token and the
    /// username are present.
    pub fn current_user(&self) -> Result<String> {
        self.session.current_user()
    }
}
