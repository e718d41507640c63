//! Catalog grid: every movie, filtered by the live search term.

use crate::app::AppContext;
use crate::catalog::{filter_movies, find_movie, CatalogCache};
use crate::domain::{MovieId, MovieRecord, Result};
use crate::favorites::{FavoritesReconciler, Phase};
use crate::gateway::CatalogApi;
use crate::store::SearchBroadcast;
use futures_util::future::join;
use std::sync::Arc;

/// The movie grid with a favorite toggle on each card.
#[derive(Debug)]
pub struct CatalogView {
    api: Arc<dyn CatalogApi>,
    search: SearchBroadcast,
    cache: CatalogCache,
    favorites: FavoritesReconciler,
}

impl CatalogView {
    /// # Errors
    ///
    /// Returns [`MyflixError::Unauthenticated`](crate::MyflixError::Unauthenticated)
    /// when no user is logged in.
    pub fn new(ctx: &AppContext) -> Result<Self> {
        ctx.current_user()?;
        Ok(Self {
            api: Arc::clone(&ctx.api),
            search: ctx.search.clone(),
            cache: CatalogCache::new(),
            favorites: FavoritesReconciler::new(Arc::clone(&ctx.api), ctx.session.clone()),
        })
    }

    /// Fetches the catalog and the user's favorites concurrently.
    ///
    /// Both fetches run to completion; the first error is returned.
    ///
    /// # Errors
    ///
    /// Returns the first gateway error.
    pub async fn activate(&mut self) -> Result<()> {
        let (catalog, favorites) =
            join(self.cache.load(self.api.as_ref()), self.favorites.load()).await;
        catalog.and(favorites)
    }

    /// Movies whose name contains the current search term, in catalog order.
    #[must_use]
    pub fn visible_movies(&self) -> Vec<MovieRecord> {
        filter_movies(self.cache.movies(), &self.search.term())
    }

    #[must_use]
    pub fn genre_name(&self, movie: &MovieRecord) -> &str {
        self.cache.genre_name(&movie.genre_id)
    }

    #[must_use]
    pub fn is_favorite(&self, id: &MovieId) -> bool {
        self.favorites.is_favorite(id)
    }

    /// Toggles the favorite state of a catalog movie; returns the new state.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an id outside the catalog, otherwise see
    /// [`FavoritesReconciler::toggle`].
    pub async fn toggle_favorite(&mut self, id: &MovieId) -> Result<bool> {
        let movie = find_movie(self.cache.movies(), id)?;
        self.favorites.toggle(movie, self.cache.movies()).await
    }

    /// Whether the initial fetch is still outstanding.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.cache.is_loading() || self.favorites.phase() == Phase::Loading
    }

    /// Message to show in place of the grid, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.cache.error().or_else(|| self.favorites.last_error())
    }

    #[must_use]
    pub const fn cache(&self) -> &CatalogCache {
        &self.cache
    }

    #[must_use]
    pub const fn favorites(&self) -> &FavoritesReconciler {
        &self.favorites
    }
}
