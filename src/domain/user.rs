//! User records and the payloads exchanged with the account endpoints.

use super::movie::MovieId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A registered user as returned by the server.
///
/// `favorite_movie_ids` is the authoritative favorites set. Each view fetches
/// its own copy; no copy is shared between views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "userName")]
    pub user_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "first_Name", default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(rename = "last_Name", default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(rename = "birthDay", default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    #[serde(rename = "FavoriteMovies", default)]
    pub favorite_movie_ids: Vec<MovieId>,
}

impl UserRecord {
    pub fn new(id: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_name: user_name.into(),
            email: String::new(),
            first_name: None,
            last_name: None,
            birthday: None,
            favorite_movie_ids: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_favorites<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.favorite_movie_ids = ids.into_iter().map(MovieId::new).collect();
        self
    }

    /// The favorites list as a set for O(1) membership tests.
    #[must_use]
    pub fn favorite_set(&self) -> HashSet<MovieId> {
        self.favorite_movie_ids.iter().cloned().collect()
    }
}

/// Partial user update sent to `PUT users/update/{name}`.
///
/// Absent fields are omitted from the payload and left unchanged on the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserPatch {
    #[serde(rename = "userName", skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "first_Name", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(rename = "last_Name", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(rename = "birthDay", skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
}

impl UserPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Registration form submitted to `POST users/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    #[serde(rename = "userName")]
    pub user_name: String,
    pub password: String,
    pub email: String,
    #[serde(rename = "first_Name", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(rename = "last_Name", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(rename = "birthDay", skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
}

/// Login form submitted to `POST login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    #[serde(rename = "userName")]
    pub user_name: String,
    pub password: String,
}

impl Credentials {
    pub fn new(user_name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            password: password.into(),
        }
    }
}

/// Successful login: the bearer token and the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub user: UserRecord,
    pub token: String,
}
