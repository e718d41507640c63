//! Catalog helpers: search filtering, name resolution and the per-view cache.
//!
//! - [`filter`]: Case-insensitive substring filter over movie names
//! - [`lookup`]: Genre and director resolution, genre previews
//! - [`cache`]: [`CatalogCache`], the last-fetched lists held by one view

pub mod cache;
pub mod filter;
pub mod lookup;

pub use cache::CatalogCache;
pub use filter::filter_movies;
pub use lookup::{
    find_director, find_genre, find_movie, genre_image, genre_name, movies_in_genre,
    DEFAULT_GENRE_IMAGE, UNKNOWN_GENRE,
};
