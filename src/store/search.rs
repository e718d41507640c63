//! Search broadcast: the live free-text filter term.
//!
//! The store only normalizes (lower-cases) and publishes. Matching semantics
//! belong to the consumer, see [`crate::catalog::filter_movies`].

use super::observable::{Observable, Subscription};
use tokio_stream::wrappers::WatchStream;

/// Process-wide search term, starting empty. Not persisted.
#[derive(Clone, Debug)]
pub struct SearchBroadcast {
    term: Observable<String>,
}

impl Default for SearchBroadcast {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchBroadcast {
    #[must_use]
    pub fn new() -> Self {
        Self {
            term: Observable::new(String::new()),
        }
    }

    /// Lower-cases `term` and publishes it if it differs from the current term.
    pub fn set_term(&self, term: &str) {
        let normalized = term.to_lowercase();
        if self.term.publish_if_changed(normalized) {
            tracing::trace!(term = %self.term.get(), "search term updated");
        }
    }

    /// Resets the term to empty.
    pub fn clear(&self) {
        self.set_term("");
    }

    #[must_use]
    pub fn term(&self) -> String {
        self.term.get()
    }

    /// Live term stream; the first item is the current term.
    #[must_use]
    pub fn observe(&self) -> WatchStream<String> {
        self.term.stream()
    }

    #[must_use = "dropping the subscription unregisters the observer"]
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&String) + Send + Sync + 'static,
    {
        self.term.subscribe(callback)
    }
}
