//! Domain layer for the myFlix client.
//!
//! Records fetched from the server and the crate-wide error type. Nothing here
//! performs I/O.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`movie`]: Movie, genre and director records
//! - [`user`]: User record and account payloads

pub mod error;
pub mod movie;
pub mod user;

pub use error::{MyflixError, Result, GENERIC_FAILURE_MESSAGE};
pub use movie::{Director, Genre, MovieId, MovieRecord};
pub use user::{Credentials, LoginResponse, Registration, UserPatch, UserRecord};
