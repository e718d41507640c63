//! Session store: the single source of truth for "is a user logged in".
//!
//! The store holds the bearer token and the username in two observables and
//! mirrors every mutation into a [`SessionStorage`] backend. It never validates
//! tokens; an expired token is only discovered when the server rejects a call.

use super::observable::{Observable, Subscription};
use crate::domain::{MyflixError, Result};
use crate::storage::{MemoryStorage, SessionStorage, Slot};
use std::sync::{Arc, Mutex, PoisonError};
use tokio_stream::wrappers::WatchStream;

/// Authentication state shared by every component of the client.
///
/// Cloning is cheap and yields a handle onto the same state.
///
/// # Examples
///
/// ```
/// use myflix::store::SessionStore;
///
/// let session = SessionStore::in_memory();
/// assert!(!session.is_logged_in());
///
/// session.start("token-123", "alice");
/// assert_eq!(session.token().as_deref(), Some("token-123"));
/// assert_eq!(session.username().as_deref(), Some("alice"));
///
/// session.clear();
/// assert_eq!(session.token(), None);
/// ```
#[derive(Clone, Debug)]
pub struct SessionStore {
    token: Observable<Option<String>>,
    username: Observable<Option<String>>,
    storage: Arc<Mutex<Box<dyn SessionStorage>>>,
}

impl SessionStore {
    /// Restores the session from durable storage.
    ///
    /// Both slots must be present for the session to count as logged in. If
    /// either is missing or unreadable the store starts logged out; the
    /// storage itself is left untouched.
    pub fn restore(storage: Box<dyn SessionStorage>) -> Self {
        let token = read_slot(storage.as_ref(), Slot::Token);
        let username = read_slot(storage.as_ref(), Slot::Username);

        let (token, username) = match (token, username) {
            (Some(token), Some(username)) => (Some(token), Some(username)),
            (token, username) => {
                if token.is_some() || username.is_some() {
                    tracing::debug!(
                        has_token = token.is_some(),
                        has_username = username.is_some(),
                        "incomplete session in storage, starting logged out"
                    );
                }
                (None, None)
            }
        };

        tracing::debug!(logged_in = token.is_some(), "session restored");

        Self {
            token: Observable::new(token),
            username: Observable::new(username),
            storage: Arc::new(Mutex::new(storage)),
        }
    }

    /// A logged-out store backed by process memory.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::restore(Box::new(MemoryStorage::new()))
    }

    /// Persists the token, then publishes it unchanged to every observer.
    ///
    /// `None` or an empty string removes the stored token; an empty token is
    /// published as given but does not count as logged in. Storage failures
    /// are logged and do not prevent publication.
    pub fn set_token(&self, token: Option<String>) {
        let _span = tracing::debug_span!("set_token", present = token.is_some()).entered();

        self.persist(Slot::Token, token.as_deref().filter(|t| !t.is_empty()));
        self.token.publish(token);
    }

    /// Returns the last published token without waiting.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.token.get()
    }

    /// Whether a non-empty token is present.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.token.get().is_some_and(|t| !t.is_empty())
    }

    /// Username of the logged-in user, read at call time.
    ///
    /// # Errors
    ///
    /// Returns [`MyflixError::Unauthenticated`] unless both a token and a
    /// username are present.
    pub fn current_user(&self) -> Result<String> {
        if !self.is_logged_in() {
            return Err(MyflixError::Unauthenticated);
        }
        self.username().ok_or(MyflixError::Unauthenticated)
    }

    /// Live token stream; the first item is the current token.
    #[must_use]
    pub fn observe(&self) -> WatchStream<Option<String>> {
        self.token.stream()
    }

    /// Registers a synchronous token observer.
    ///
    /// The callback runs once with the current token, then on every publish.
    #[must_use = "dropping the subscription unregisters the observer"]
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Option<String>) + Send + Sync + 'static,
    {
        self.token.subscribe(callback)
    }

    /// Persists and publishes the username slot.
    pub fn set_username(&self, username: Option<String>) {
        let username = username.filter(|u| !u.trim().is_empty());
        self.persist(Slot::Username, username.as_deref());
        self.username.publish(username);
    }

    #[must_use]
    pub fn username(&self) -> Option<String> {
        self.username.get()
    }

    #[must_use]
    pub fn observe_username(&self) -> WatchStream<Option<String>> {
        self.username.stream()
    }

    /// Records a successful login.
    ///
    /// The username is published first so token observers can rely on it.
    pub fn start(&self, token: impl Into<String>, username: impl Into<String>) {
        self.set_username(Some(username.into()));
        self.set_token(Some(token.into()));
    }

    /// Logs out: nulls the token, then the username.
    pub fn clear(&self) {
        self.set_token(None);
        self.set_username(None);
    }

    fn persist(&self, slot: Slot, value: Option<&str>) {
        let mut storage = self.storage.lock().unwrap_or_else(PoisonError::into_inner);
        let result = match value {
            Some(value) => storage.write(slot, value),
            None => storage.remove(slot),
        };
        if let Err(e) = result {
            tracing::error!(slot = slot.key(), error = %e, "failed to persist session slot");
        }
    }
}

fn read_slot(storage: &dyn SessionStorage, slot: Slot) -> Option<String> {
    match storage.read(slot) {
        Ok(value) => value.filter(|v| !v.trim().is_empty()),
        Err(e) => {
            tracing::warn!(slot = slot.key(), error = %e, "failed to read session slot");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::JsonStorage;
    use futures_util::StreamExt;

    #[test]
    fn restores_complete_session() {
        let store = SessionStore::restore(Box::new(MemoryStorage::with_session("tok", "alice")));
        assert_eq!(store.token().as_deref(), Some("tok"));
        assert_eq!(store.username().as_deref(), Some("alice"));
    }

    #[test]
    fn missing_username_slot_means_logged_out() {
        let mut storage = MemoryStorage::new();
        storage.write(Slot::Token, "tok").unwrap();

        let store = SessionStore::restore(Box::new(storage));
        assert!(!store.is_logged_in());
        assert_eq!(store.username(), None);
    }

    #[test]
    fn last_set_token_wins_for_getters_and_observers() {
        let store = SessionStore::in_memory();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _s = store.subscribe(move |t| sink.lock().unwrap().push(t.clone()));

        store.set_token(Some("a".to_string()));
        store.set_token(None);
        store.set_token(Some("b".to_string()));

        assert_eq!(store.token().as_deref(), Some("b"));
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 4);
        assert_eq!(seen.last().cloned().flatten().as_deref(), Some("b"));
    }

    #[test]
    fn empty_token_is_published_as_given_but_not_stored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = SessionStore::restore(Box::new(JsonStorage::new(path.clone()).unwrap()));
        store.start("tok", "alice");

        store.set_token(Some(String::new()));

        assert_eq!(store.token().as_deref(), Some(""));
        assert!(!store.is_logged_in());
        assert_eq!(store.current_user(), Err(MyflixError::Unauthenticated));
        let reread = JsonStorage::new(path).unwrap();
        assert_eq!(reread.read(Slot::Token).unwrap(), None);
    }

    #[test]
    fn whitespace_token_is_kept_verbatim() {
        let store = SessionStore::in_memory();
        store.set_token(Some("  ".to_string()));
        assert_eq!(store.token().as_deref(), Some("  "));
    }

    #[test]
    fn current_user_follows_the_latest_login() {
        let store = SessionStore::in_memory();
        assert_eq!(store.current_user(), Err(MyflixError::Unauthenticated));

        store.start("token-alice", "alice");
        assert_eq!(store.current_user().as_deref(), Ok("alice"));

        store.clear();
        store.start("token-bob", "bob");
        assert_eq!(store.current_user().as_deref(), Ok("bob"));
    }

    #[test]
    fn mutations_reach_durable_storage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = SessionStore::restore(Box::new(JsonStorage::new(path.clone()).unwrap()));
        store.start("tok", "alice");

        let reread = JsonStorage::new(path.clone()).unwrap();
        assert_eq!(reread.read(Slot::Token).unwrap().as_deref(), Some("tok"));
        assert_eq!(reread.read(Slot::Username).unwrap().as_deref(), Some("alice"));

        store.clear();
        let reread = JsonStorage::new(path).unwrap();
        assert_eq!(reread.read(Slot::Token).unwrap(), None);
        assert_eq!(reread.read(Slot::Username).unwrap(), None);
    }

    #[tokio::test]
    async fn observe_starts_with_restored_token() {
        let store = SessionStore::restore(Box::new(MemoryStorage::with_session("tok", "alice")));
        let mut tokens = store.observe();
        assert_eq!(tokens.next().await, Some(Some("tok".to_string())));

        store.clear();
        assert_eq!(tokens.next().await, Some(None));
    }
}
