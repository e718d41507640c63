//! Favorites reconciliation.
//!
//! Every view that shows favorite state owns a [`FavoritesReconciler`]. The
//! reconciler holds that view's snapshot of the user's favorite ids and keeps it
//! equal to the server's copy after each confirmed add or remove. Snapshots are
//! never shared: a view sees mutations made elsewhere only by calling
//! [`FavoritesReconciler::load`] again when it is activated.

pub mod reconciler;

pub use reconciler::{FavoritesReconciler, Phase};
