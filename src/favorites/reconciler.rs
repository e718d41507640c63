//! The per-view favorites state machine.
//!
//! ```text
//!            load()              toggle()
//! Loading ─────────▶ Ready ─────────────▶ Mutating
//!    │                 ▲                      │
//!    │ fetch failed    └──────────────────────┘
//!    ▼                      settled (ok or err)
//!  Error ──── load() ───▶ Loading
//! ```
//!
//! The username is read from the session on every load and toggle, so a view
//! that outlives a logout or a rename always addresses the current account.
//!
//! Mutations are confirm-first: the snapshot changes only after the server
//! accepts the add or remove. A rejected mutation leaves the snapshot exactly
//! as it was and records the user-facing message in
//! [`FavoritesReconciler::last_error`].

use crate::domain::{MovieId, MovieRecord, MyflixError, Result};
use crate::gateway::CatalogApi;
use crate::store::{Observable, SessionStore, Subscription};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tokio_stream::wrappers::WatchStream;
use tracing::Instrument;

/// Lifecycle of one view's favorites snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// The user record is being fetched.
    Loading,
    /// The snapshot is current and a toggle may be issued.
    Ready,
    /// An add or remove is in flight.
    Mutating,
    /// The user record could not be fetched; holds the user-facing message.
    Error(String),
}

impl Phase {
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        matches!(self, Self::Loading | Self::Mutating)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loading => f.write_str("loading"),
            Self::Ready => f.write_str("ready"),
            Self::Mutating => f.write_str("mutating"),
            Self::Error(message) => write!(f, "error: {message}"),
        }
    }
}

/// One view's favorites snapshot and the operations that keep it in sync.
///
/// # Examples
///
/// ```no_run
/// use myflix::favorites::FavoritesReconciler;
/// use myflix::gateway::CatalogApi;
/// use myflix::{MovieRecord, SessionStore};
/// use std::sync::Arc;
///
/// # async fn demo(
/// #     api: Arc<dyn CatalogApi>,
/// #     session: SessionStore,
/// #     catalog: Vec<MovieRecord>,
/// # ) -> myflix::Result<()> {
/// let mut favorites = FavoritesReconciler::new(api, session);
/// favorites.load().await?;
///
/// let now_favorite = favorites.toggle(&catalog[0], &catalog).await?;
/// assert_eq!(favorites.is_favorite(&catalog[0].id), now_favorite);
/// # Ok(())
/// # }
/// ```
pub struct FavoritesReconciler {
    api: Arc<dyn CatalogApi>,
    session: SessionStore,
    loaded_for: Option<String>,
    favorite_ids: HashSet<MovieId>,
    phase: Observable<Phase>,
    last_error: Option<String>,
}

impl fmt::Debug for FavoritesReconciler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FavoritesReconciler")
            .field("loaded_for", &self.loaded_for)
            .field("favorite_ids", &self.favorite_ids.len())
            .field("phase", &self.phase.get())
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}

impl FavoritesReconciler {
    /// A reconciler for whoever is logged into `session`, starting in
    /// [`Phase::Loading`] with an empty snapshot.
    pub fn new(api: Arc<dyn CatalogApi>, session: SessionStore) -> Self {
        Self {
            api,
            session,
            loaded_for: None,
            favorite_ids: HashSet::new(),
            phase: Observable::new(Phase::Loading),
            last_error: None,
        }
    }

    /// Fetches the current session user's record and replaces the snapshot
    /// with its favorites.
    ///
    /// Called on every activation of the hosting view. On failure the phase
    /// becomes [`Phase::Error`]; the previous snapshot is kept only if it
    /// belongs to the user still logged in.
    ///
    /// # Errors
    ///
    /// - [`MyflixError::Unauthenticated`] when nobody is logged in
    /// - the gateway error of the user fetch
    pub async fn load(&mut self) -> Result<()> {
        self.transition(Phase::Loading);

        let fetched = async {
            let user_name = self.session.current_user()?;
            let user = self.api.get_user(&user_name).await?;
            Ok::<_, MyflixError>((user_name, user))
        }
        .instrument(tracing::debug_span!("favorites_load"))
        .await;

        match fetched {
            Ok((user_name, user)) => {
                self.favorite_ids = user.favorite_set();
                self.last_error = None;
                tracing::debug!(
                    user = %user_name,
                    favorites = self.favorite_ids.len(),
                    "favorites loaded"
                );
                self.loaded_for = Some(user_name);
                self.transition(Phase::Ready);
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load favorites");
                if self.session.current_user().ok() != self.loaded_for {
                    self.favorite_ids.clear();
                    self.loaded_for = None;
                }
                let message = e.user_message();
                self.last_error = Some(message.clone());
                self.transition(Phase::Error(message));
                Err(e)
            }
        }
    }

    /// Adds `movie` to the favorites if absent, removes it if present.
    ///
    /// Returns the new membership. The server addresses favorites by movie
    /// name, so `catalog` is consulted first: the movie must be one of its
    /// entries, and a name carried by more than one entry is refused with
    /// [`MyflixError::AmbiguousName`]. Refusals send nothing.
    ///
    /// # Errors
    ///
    /// - [`MyflixError::InvalidState`] unless the phase is [`Phase::Ready`],
    ///   or when the snapshot was loaded for a different user
    /// - [`MyflixError::Unauthenticated`] when nobody is logged in
    /// - [`MyflixError::NotFound`] when `movie` is not in `catalog`
    /// - [`MyflixError::AmbiguousName`] for a duplicated movie name
    /// - the gateway error when the server rejects the mutation
    pub async fn toggle(&mut self, movie: &MovieRecord, catalog: &[MovieRecord]) -> Result<bool> {
        let phase = self.phase.get();
        if phase != Phase::Ready {
            return Err(MyflixError::InvalidState(format!(
                "cannot toggle favorite while {phase}"
            )));
        }

        let user_name = self.session.current_user()?;
        if self.loaded_for.as_deref() != Some(user_name.as_str()) {
            return Err(MyflixError::InvalidState(
                "favorites belong to another user; reload first".to_string(),
            ));
        }

        if !catalog.iter().any(|entry| entry.id == movie.id) {
            let err = MyflixError::NotFound {
                kind: "movie",
                key: movie.id.to_string(),
            };
            tracing::warn!(movie = %movie.name, "refusing to toggle movie missing from the catalog");
            self.last_error = Some(err.user_message());
            return Err(err);
        }

        let count = catalog.iter().filter(|entry| entry.name == movie.name).count();
        if count > 1 {
            let err = MyflixError::AmbiguousName {
                name: movie.name.clone(),
                count,
            };
            tracing::warn!(movie = %movie.name, count, "refusing to toggle ambiguous movie name");
            self.last_error = Some(err.user_message());
            return Err(err);
        }

        let was_favorite = self.is_favorite(&movie.id);
        let span = tracing::debug_span!(
            "favorites_toggle",
            user = %user_name,
            movie = %movie.name,
            remove = was_favorite
        );
        self.transition(Phase::Mutating);

        let result = async {
            if was_favorite {
                self.api.remove_favorite(&user_name, &movie.name).await
            } else {
                self.api.add_favorite(&user_name, &movie.name).await
            }
        }
        .instrument(span)
        .await;

        let outcome = match result {
            Ok(()) => {
                if was_favorite {
                    self.favorite_ids.remove(&movie.id);
                } else {
                    self.favorite_ids.insert(movie.id.clone());
                }
                self.last_error = None;
                Ok(!was_favorite)
            }
            Err(e) => {
                tracing::error!(
                    movie = %movie.name,
                    status = ?e.status(),
                    error = %e,
                    "favorite mutation rejected"
                );
                self.last_error = Some(e.user_message());
                Err(e)
            }
        };

        self.transition(Phase::Ready);
        outcome
    }

    /// Membership test against the current snapshot. No network call.
    #[must_use]
    pub fn is_favorite(&self, id: &MovieId) -> bool {
        self.favorite_ids.contains(id)
    }

    #[must_use]
    pub const fn favorite_ids(&self) -> &HashSet<MovieId> {
        &self.favorite_ids
    }

    /// Catalog entries whose id is in the snapshot, in catalog order.
    #[must_use]
    pub fn favorites_in(&self, catalog: &[MovieRecord]) -> Vec<MovieRecord> {
        catalog
            .iter()
            .filter(|movie| self.favorite_ids.contains(&movie.id))
            .cloned()
            .collect()
    }

    /// The user whose favorites the snapshot holds, once loaded.
    #[must_use]
    pub fn loaded_for(&self) -> Option<&str> {
        self.loaded_for.as_deref()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase.get()
    }

    /// Live phase changes, starting with the current phase.
    #[must_use]
    pub fn observe_phase(&self) -> WatchStream<Phase> {
        self.phase.stream()
    }

    #[must_use = "dropping the subscription unregisters the observer"]
    pub fn subscribe_phase<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Phase) + Send + Sync + 'static,
    {
        self.phase.subscribe(callback)
    }

    /// Message of the last failed load or mutation, cleared by the next success.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn transition(&self, next: Phase) {
        tracing::trace!(from = %self.phase.get(), to = %next, "favorites phase");
        self.phase.publish(next);
    }
}
