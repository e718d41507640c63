//! Application layer: the context every view is built from, the views
//! themselves, routing and account flows.
//!
//! # Architecture
//!
//! ```text
//! AppContext ─┬─ SessionStore ──▶ HeaderModel, Route::guard, RemoteGateway
//!             ├─ SearchBroadcast ──▶ CatalogView
//!             └─ CatalogApi ──▶ every view, account flows
//! ```
//!
//! # Modules
//!
//! - [`context`]: [`AppContext`], built once at startup
//! - [`account`]: Register, login, logout
//! - [`route`]: [`Route`] parsing and the login guard
//! - [`header`]: [`HeaderModel`]
//! - [`views`]: Catalog, movie detail, genres, favorites and profile views

pub mod account;
pub mod context;
pub mod header;
pub mod route;
pub mod views;

pub use context::AppContext;
pub use header::HeaderModel;
pub use route::Route;
pub use views::{
    CatalogView, FavoritesView, GenreCard, GenreDetail, GenreView, MovieDetailView, ProfileView,
};
