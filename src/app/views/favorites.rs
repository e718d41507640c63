//! Favorites list: the user's favorite movies in catalog order.

use crate::app::AppContext;
use crate::catalog::{find_movie, CatalogCache};
use crate::domain::{MovieId, MovieRecord, MyflixError, Result};
use crate::favorites::{FavoritesReconciler, Phase};
use crate::gateway::CatalogApi;
use futures_util::future::join;
use std::sync::Arc;

/// The favorites list. `displayed` is recomputed after every activation and
/// every confirmed mutation.
#[derive(Debug)]
pub struct FavoritesView {
    api: Arc<dyn CatalogApi>,
    cache: CatalogCache,
    favorites: FavoritesReconciler,
    displayed: Vec<MovieRecord>,
}

impl FavoritesView {
    /// # Errors
    ///
    /// Returns [`MyflixError::Unauthenticated`] when no user is logged in.
    pub fn new(ctx: &AppContext) -> Result<Self> {
        ctx.current_user()?;
        Ok(Self {
            api: Arc::clone(&ctx.api),
            cache: CatalogCache::new(),
            favorites: FavoritesReconciler::new(Arc::clone(&ctx.api), ctx.session.clone()),
            displayed: Vec::new(),
        })
    }

    /// Re-fetches the catalog and the user record.
    ///
    /// # Errors
    ///
    /// Returns the first gateway error; the previous list stays displayed.
    pub async fn activate(&mut self) -> Result<()> {
        let (catalog, favorites) =
            join(self.cache.load(self.api.as_ref()), self.favorites.load()).await;
        catalog.and(favorites)?;
        self.recompute();
        Ok(())
    }

    /// Favorite movies, in catalog order.
    #[must_use]
    pub fn displayed(&self) -> &[MovieRecord] {
        &self.displayed
    }

    /// Toggles any catalog movie; returns the new state.
    ///
    /// # Errors
    ///
    /// See [`FavoritesReconciler::toggle`].
    pub async fn toggle(&mut self, id: &MovieId) -> Result<bool> {
        let movie = find_movie(self.cache.movies(), id)?;
        let now_favorite = self.favorites.toggle(movie, self.cache.movies()).await?;
        self.recompute();
        Ok(now_favorite)
    }

    /// Removes a displayed movie from the favorites.
    ///
    /// The entry is identified by id, so another catalog entry with the same
    /// name is never dropped from the list.
    ///
    /// # Errors
    ///
    /// Returns [`MyflixError::InvalidState`] if the movie is not a favorite,
    /// otherwise see [`FavoritesReconciler::toggle`].
    pub async fn remove(&mut self, id: &MovieId) -> Result<()> {
        if !self.favorites.is_favorite(id) {
            return Err(MyflixError::InvalidState(format!(
                "movie {id} is not a favorite"
            )));
        }
        self.toggle(id).await.map(|_| ())
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.cache.is_loading() || self.favorites.phase() == Phase::Loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.cache.error().or_else(|| self.favorites.last_error())
    }

    #[must_use]
    pub const fn favorites(&self) -> &FavoritesReconciler {
        &self.favorites
    }

    fn recompute(&mut self) {
        self.displayed = self.favorites.favorites_in(self.cache.movies());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRecord;
    use crate::store::SessionStore;
    use crate::test_support::FakeApi;
    use crate::Config;

    fn ids(view: &FavoritesView) -> Vec<&str> {
        view.displayed().iter().map(|movie| movie.id.as_str()).collect()
    }

    fn view_for(api: Arc<FakeApi>) -> FavoritesView {
        let session = SessionStore::in_memory();
        session.start("token-alice", "alice");
        FavoritesView::new(&AppContext::with_api(Config::default(), session, api)).unwrap()
    }

    #[tokio::test]
    async fn removing_one_of_two_same_named_entries_is_refused() {
        let api = Arc::new(
            FakeApi::new()
                .with_movies(vec![
                    MovieRecord::new("m1", "Solaris", "g1", "d1"),
                    MovieRecord::new("m2", "Solaris", "g1", "d2"),
                ])
                .with_user(UserRecord::new("u1", "alice").with_favorites(["m1", "m2"])),
        );
        let mut view = view_for(api.clone());
        view.activate().await.unwrap();

        let err = view.remove(&MovieId::new("m2")).await.unwrap_err();

        assert!(matches!(err, MyflixError::AmbiguousName { count: 2, .. }));
        assert_eq!(ids(&view), ["m1", "m2"]);
        assert_eq!(api.call_count("remove_favorite"), 0);
    }

    #[tokio::test]
    async fn remove_drops_only_that_id() {
        let api = Arc::new(
            FakeApi::new()
                .with_movies(vec![
                    MovieRecord::new("m1", "Heat", "g1", "d1"),
                    MovieRecord::new("m2", "Ronin", "g1", "d2"),
                ])
                .with_user(UserRecord::new("u1", "alice").with_favorites(["m1", "m2"])),
        );
        let mut view = view_for(api.clone());
        view.activate().await.unwrap();

        view.remove(&MovieId::new("m1")).await.unwrap();

        assert_eq!(ids(&view), ["m2"]);
        assert_eq!(
            api.user("alice").unwrap().favorite_movie_ids,
            [MovieId::new("m2")]
        );
    }

    #[tokio::test]
    async fn removing_a_non_favorite_is_rejected_locally() {
        let api = Arc::new(
            FakeApi::new()
                .with_movies(vec![MovieRecord::new("m1", "Heat", "g1", "d1")])
                .with_user(UserRecord::new("u1", "alice")),
        );
        let mut view = view_for(api.clone());
        view.activate().await.unwrap();

        let err = view.remove(&MovieId::new("m1")).await.unwrap_err();

        assert!(matches!(err, MyflixError::InvalidState(_)));
        assert_eq!(api.call_count("remove_favorite"), 0);
    }
}
