//! View models.
//!
//! Each view is built from an [`AppContext`](super::AppContext), owns its own
//! [`CatalogCache`](crate::catalog::CatalogCache) and, where it shows favorite
//! state, its own [`FavoritesReconciler`](crate::favorites::FavoritesReconciler).
//! `activate` is called every time the view is shown and re-fetches everything
//! the view displays.

pub mod catalog;
pub mod favorites;
pub mod genres;
pub mod movie;
pub mod profile;

pub use catalog::CatalogView;
pub use favorites::FavoritesView;
pub use genres::{GenreCard, GenreDetail, GenreView};
pub use movie::MovieDetailView;
pub use profile::ProfileView;
