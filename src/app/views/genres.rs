//! Genre grid and genre detail.

use crate::app::AppContext;
use crate::catalog::{find_genre, genre_image, movies_in_genre, CatalogCache};
use crate::domain::{Genre, MovieRecord, Result};
use crate::gateway::CatalogApi;
use std::sync::Arc;

/// One tile of the genre grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreCard {
    pub genre: Genre,
    /// Image of the first movie of the genre, or the default image.
    pub image: String,
    pub movie_count: usize,
}

/// A genre with its movies in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreDetail {
    pub genre: Genre,
    pub movies: Vec<MovieRecord>,
}

#[derive(Debug)]
pub struct GenreView {
    api: Arc<dyn CatalogApi>,
    cache: CatalogCache,
}

impl GenreView {
    #[must_use]
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            api: Arc::clone(&ctx.api),
            cache: CatalogCache::new(),
        }
    }

    /// # Errors
    ///
    /// Returns the gateway error of the catalog fetch.
    pub async fn activate(&mut self) -> Result<()> {
        self.cache.load(self.api.as_ref()).await
    }

    /// Grid tiles in the server's genre order.
    #[must_use]
    pub fn cards(&self) -> Vec<GenreCard> {
        let movies = self.cache.movies();
        self.cache
            .genres()
            .iter()
            .map(|genre| GenreCard {
                genre: genre.clone(),
                image: genre_image(movies, &genre.id).to_string(),
                movie_count: movies.iter().filter(|m| m.genre_id == genre.id).count(),
            })
            .collect()
    }

    /// Detail for a genre given by id or name, from the cached lists.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the genre is not in the cache.
    pub fn detail(&self, key: &str) -> Result<GenreDetail> {
        let genre = find_genre(self.cache.genres(), key)?;
        Ok(GenreDetail {
            genre: genre.clone(),
            movies: movies_in_genre(self.cache.movies(), &genre.id),
        })
    }

    /// Fetches a single genre's information from the server.
    ///
    /// # Errors
    ///
    /// Returns the gateway error.
    pub async fn describe(&self, name: &str) -> Result<Genre> {
        self.api.get_genre(name).await
    }

    /// True from construction until the first catalog fetch settles.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.cache.is_loading()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.cache.error()
    }
}
