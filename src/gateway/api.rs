//! The remote gateway contract.
//!
//! Views and the favorites reconciler depend on this trait rather than on the
//! HTTP client, so tests can substitute a scripted implementation.

use crate::domain::{
    Credentials, Director, Genre, LoginResponse, MovieRecord, Registration, Result, UserPatch,
    UserRecord,
};
use async_trait::async_trait;

/// Every operation the client performs against the myFlix server.
///
/// Implementations never fail synchronously: all outcomes, including a missing
/// token, are delivered as the `Result` of the returned future. `add_favorite`
/// and `remove_favorite` are not assumed idempotent, so callers issue at most
/// one per user action.
#[async_trait]
pub trait CatalogApi: Send + Sync + std::fmt::Debug {
    /// Creates an account. Does not require a token.
    async fn register(&self, registration: &Registration) -> Result<UserRecord>;

    /// Exchanges credentials for a token. Does not require a token.
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse>;

    async fn list_movies(&self) -> Result<Vec<MovieRecord>>;

    async fn get_movie(&self, name: &str) -> Result<MovieRecord>;

    async fn list_genres(&self) -> Result<Vec<Genre>>;

    async fn get_genre(&self, name: &str) -> Result<Genre>;

    async fn list_directors(&self) -> Result<Vec<Director>>;

    async fn get_director(&self, name: &str) -> Result<Director>;

    async fn list_users(&self) -> Result<Vec<UserRecord>>;

    async fn get_user(&self, name: &str) -> Result<UserRecord>;

    async fn update_user(&self, name: &str, patch: &UserPatch) -> Result<()>;

    async fn delete_user(&self, name: &str) -> Result<()>;

    /// Adds a movie, addressed by name, to the user's favorites.
    async fn add_favorite(&self, user_name: &str, movie_name: &str) -> Result<()>;

    /// Removes a movie, addressed by name, from the user's favorites.
    async fn remove_favorite(&self, user_name: &str, movie_name: &str) -> Result<()>;
}
