//! Per-view catalog cache.
//!
//! Each view that needs the catalog owns one of these and fills it on
//! activation. Caches are never shared between views.

use crate::catalog::lookup;
use crate::domain::{Director, Genre, MovieRecord, Result};
use crate::gateway::CatalogApi;
use futures_util::future::{try_join, try_join3};

/// The last-fetched movie, genre and director lists of one view.
///
/// A new cache counts as loading until its first fetch settles, so a view can
/// show its loading indicator from construction on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogCache {
    movies: Vec<MovieRecord>,
    genres: Vec<Genre>,
    directors: Vec<Director>,
    loading: bool,
    error: Option<String>,
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self {
            movies: Vec::new(),
            genres: Vec::new(),
            directors: Vec::new(),
            loading: true,
            error: None,
        }
    }
}

impl CatalogCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A settled cache already holding the given lists.
    #[must_use]
    pub fn from_parts(movies: Vec<MovieRecord>, genres: Vec<Genre>) -> Self {
        Self {
            movies,
            genres,
            loading: false,
            ..Self::default()
        }
    }

    /// Fetches movies and genres concurrently.
    ///
    /// On failure the previous lists are kept, the user-facing message is
    /// recorded, and the error is returned.
    ///
    /// # Errors
    ///
    /// Returns the first gateway error of either fetch.
    pub async fn load(&mut self, api: &dyn CatalogApi) -> Result<()> {
        self.loading = true;
        let result = try_join(api.list_movies(), api.list_genres()).await;
        self.loading = false;

        match result {
            Ok((movies, genres)) => {
                tracing::debug!(
                    movies = movies.len(),
                    genres = genres.len(),
                    "catalog loaded"
                );
                self.movies = movies;
                self.genres = genres;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "error fetching catalog");
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Fetches movies, genres and directors concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first gateway error of the three fetches; the previous
    /// lists are kept.
    pub async fn load_with_directors(&mut self, api: &dyn CatalogApi) -> Result<()> {
        self.loading = true;
        let result = try_join3(api.list_movies(), api.list_genres(), api.list_directors()).await;
        self.loading = false;

        match result {
            Ok((movies, genres, directors)) => {
                self.movies = movies;
                self.genres = genres;
                self.directors = directors;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "error fetching catalog with directors");
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    #[must_use]
    pub fn movies(&self) -> &[MovieRecord] {
        &self.movies
    }

    #[must_use]
    pub fn genres(&self) -> &[Genre] {
        &self.genres
    }

    #[must_use]
    pub fn directors(&self) -> &[Director] {
        &self.directors
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn genre_name(&self, genre_id: &str) -> &str {
        lookup::genre_name(&self.genres, genre_id)
    }

    /// Director name for a movie's director id, if known.
    #[must_use]
    pub fn director_name(&self, director_id: &str) -> Option<&str> {
        lookup::find_director(&self.directors, director_id)
            .ok()
            .map(|director| director.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MyflixError;
    use crate::test_support::FakeApi;

    #[tokio::test]
    async fn load_fills_movies_and_genres() {
        let api = FakeApi::new()
            .with_movies(vec![MovieRecord::new("m1", "Heat", "g1", "d1")])
            .with_genres(vec![Genre::new("g1", "Crime")]);

        let mut cache = CatalogCache::new();
        assert!(cache.is_loading());
        cache.load(&api).await.unwrap();

        assert_eq!(cache.movies().len(), 1);
        assert_eq!(cache.genre_name("g1"), "Crime");
        assert!(!cache.is_loading());
        assert_eq!(cache.error(), None);
    }

    #[tokio::test]
    async fn failed_load_keeps_previous_lists_and_records_message() {
        let api = FakeApi::new().fail_next(
            "list_genres",
            MyflixError::Remote {
                status: 502,
                body: "bad gateway".to_string(),
            },
        );

        let mut cache =
            CatalogCache::from_parts(vec![MovieRecord::new("m0", "Old", "g", "d")], vec![]);
        assert!(!cache.is_loading());
        let err = cache.load(&api).await.unwrap_err();

        assert_eq!(err.status(), Some(502));
        assert!(!cache.is_loading());
        assert_eq!(cache.movies()[0].name, "Old");
        assert_eq!(
            cache.error(),
            Some(crate::domain::GENERIC_FAILURE_MESSAGE)
        );
    }

    #[tokio::test]
    async fn load_with_directors_resolves_director_names() {
        let api = FakeApi::new()
            .with_movies(vec![MovieRecord::new("m1", "Heat", "g1", "d1")])
            .with_directors(vec![Director {
                id: "d1".to_string(),
                name: "Michael Mann".to_string(),
                bio: String::new(),
                birth_year: "1943".to_string(),
                death_year: None,
            }]);

        let mut cache = CatalogCache::new();
        cache.load_with_directors(&api).await.unwrap();

        assert_eq!(cache.director_name("d1"), Some("Michael Mann"));
        assert_eq!(cache.director_name("d2"), None);
        assert_eq!(cache.genre_name("g1"), crate::catalog::UNKNOWN_GENRE);
    }
}
