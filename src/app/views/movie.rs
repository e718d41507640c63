//! Movie detail page, addressed by movie name.

use crate::app::AppContext;
use crate::catalog::CatalogCache;
use crate::domain::{MovieRecord, MyflixError, Result};
use crate::favorites::FavoritesReconciler;
use crate::gateway::CatalogApi;
use futures_util::future::join3;
use std::sync::Arc;

/// One movie with its genre, director and favorite toggle.
#[derive(Debug)]
pub struct MovieDetailView {
    api: Arc<dyn CatalogApi>,
    name: String,
    movie: Option<MovieRecord>,
    loading: bool,
    cache: CatalogCache,
    favorites: FavoritesReconciler,
}

impl MovieDetailView {
    /// # Errors
    ///
    /// Returns [`MyflixError::Unauthenticated`] when no user is logged in.
    pub fn new(ctx: &AppContext, name: impl Into<String>) -> Result<Self> {
        ctx.current_user()?;
        Ok(Self {
            api: Arc::clone(&ctx.api),
            name: name.into(),
            movie: None,
            loading: true,
            cache: CatalogCache::new(),
            favorites: FavoritesReconciler::new(Arc::clone(&ctx.api), ctx.session.clone()),
        })
    }

    /// Fetches the movie, the catalog, the directors and the favorites.
    ///
    /// The loading flag is cleared only once the movie itself has arrived.
    ///
    /// # Errors
    ///
    /// Returns the first gateway error; the movie fetch is reported first.
    pub async fn activate(&mut self) -> Result<()> {
        let api = self.api.as_ref();
        let (movie, catalog, favorites) = join3(
            api.get_movie(&self.name),
            self.cache.load_with_directors(api),
            self.favorites.load(),
        )
        .await;

        match movie {
            Ok(movie) => {
                self.movie = Some(movie);
                self.loading = false;
            }
            Err(e) => {
                tracing::error!(movie = %self.name, error = %e, "failed to fetch movie");
                return Err(e);
            }
        }
        catalog.and(favorites)
    }

    #[must_use]
    pub const fn movie(&self) -> Option<&MovieRecord> {
        self.movie.as_ref()
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn genre_name(&self) -> Option<&str> {
        self.movie
            .as_ref()
            .map(|movie| self.cache.genre_name(&movie.genre_id))
    }

    #[must_use]
    pub fn director_name(&self) -> Option<&str> {
        self.movie
            .as_ref()
            .and_then(|movie| self.cache.director_name(&movie.director_id))
    }

    #[must_use]
    pub fn is_favorite(&self) -> bool {
        self.movie
            .as_ref()
            .is_some_and(|movie| self.favorites.is_favorite(&movie.id))
    }

    /// Toggles the shown movie; returns the new state.
    ///
    /// # Errors
    ///
    /// Returns [`MyflixError::InvalidState`] before the movie has loaded,
    /// otherwise see [`FavoritesReconciler::toggle`].
    pub async fn toggle_favorite(&mut self) -> Result<bool> {
        let movie = self
            .movie
            .as_ref()
            .ok_or_else(|| MyflixError::InvalidState("movie not loaded".to_string()))?;
        self.favorites.toggle(movie, self.cache.movies()).await
    }
}
