//! Catalog records: movies, genres and directors.
//!
//! Records are immutable once fetched. A movie's identity is its id, although the
//! server also addresses movies by name in several endpoints.

use chrono::{DateTime, Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-assigned identifier of a movie.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(pub String);

impl MovieId {
    /// Wraps a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrows the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MovieId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A movie as returned by the catalog endpoints.
///
/// # Examples
///
/// ```
/// use myflix::MovieRecord;
///
/// let movie = MovieRecord::new("m1", "Heat", "g1", "d1")
///     .with_release_date("1995-12-15");
/// assert_eq!(movie.release_year(), Some(1995));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    #[serde(rename = "_id")]
    pub id: MovieId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "genre")]
    pub genre_id: String,
    #[serde(rename = "director")]
    pub director_id: String,
    /// ISO date string, e.g. `2025-06-18`.
    #[serde(rename = "year_released", default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(rename = "imagePath", default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
}

impl MovieRecord {
    /// Builds a record with an empty description and no release date or image.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        genre_id: impl Into<String>,
        director_id: impl Into<String>,
    ) -> Self {
        Self {
            id: MovieId::new(id),
            name: name.into(),
            description: String::new(),
            genre_id: genre_id.into(),
            director_id: director_id.into(),
            release_date: None,
            image_path: None,
        }
    }

    #[must_use]
    pub fn with_release_date(mut self, date: impl Into<String>) -> Self {
        self.release_date = Some(date.into());
        self
    }

    #[must_use]
    pub fn with_image_path(mut self, path: impl Into<String>) -> Self {
        self.image_path = Some(path.into());
        self
    }

    /// Year component of the release date.
    ///
    /// Accepts a plain `YYYY-MM-DD` date, a full RFC 3339 timestamp, or a bare
    /// year. Returns `None` when the date is missing or unparseable.
    #[must_use]
    pub fn release_year(&self) -> Option<i32> {
        let raw = self.release_date.as_deref()?.trim();

        if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
            return Some(timestamp.year());
        }
        if let Some(date) = raw
            .get(..10)
            .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        {
            return Some(date.year());
        }
        raw.parse::<i32>().ok()
    }
}

/// A movie genre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Genre {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
        }
    }
}

/// A movie director.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Director {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(rename = "birthYear", default)]
    pub birth_year: String,
    #[serde(rename = "deathYear", default, skip_serializing_if = "Option::is_none")]
    pub death_year: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_server_field_names() {
        let json = r#"{
            "_id": "m1",
            "name": "Dark Knight",
            "description": "Batman",
            "genre": "g1",
            "director": "d1",
            "year_released": "2008-07-18T00:00:00.000Z",
            "imagePath": "dark.jpg"
        }"#;

        let movie: MovieRecord = serde_json::from_str(json).unwrap();
        assert_eq!(movie.id, MovieId::from("m1"));
        assert_eq!(movie.genre_id, "g1");
        assert_eq!(movie.image_path.as_deref(), Some("dark.jpg"));
        assert_eq!(movie.release_year(), Some(2008));
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let json = r#"{"_id":"m2","name":"Her","genre":"g2","director":"d2"}"#;
        let movie: MovieRecord = serde_json::from_str(json).unwrap();
        assert!(movie.description.is_empty());
        assert_eq!(movie.release_year(), None);
    }

    #[test]
    fn release_year_accepts_bare_year() {
        let movie = MovieRecord::new("m3", "Heat", "g", "d").with_release_date("1995");
        assert_eq!(movie.release_year(), Some(1995));

        let garbage = MovieRecord::new("m4", "Heat", "g", "d").with_release_date("soon");
        assert_eq!(garbage.release_year(), None);
    }
}
