//! Resolution of genre and director references held by movie records.

use crate::domain::{Director, Genre, MovieId, MovieRecord, MyflixError, Result};

/// Label shown for a movie whose genre id does not resolve.
pub const UNKNOWN_GENRE: &str = "Unknown Genre";

/// Preview image for a genre with no movies carrying an image.
pub const DEFAULT_GENRE_IMAGE: &str = "assets/images/default.jpg";

/// Finds a movie by id.
///
/// # Errors
///
/// Returns [`MyflixError::NotFound`] when no movie has that id.
pub fn find_movie<'a>(movies: &'a [MovieRecord], id: &MovieId) -> Result<&'a MovieRecord> {
    movies
        .iter()
        .find(|movie| &movie.id == id)
        .ok_or_else(|| MyflixError::NotFound {
            kind: "movie",
            key: id.to_string(),
        })
}

/// Finds a genre by id or name.
///
/// # Errors
///
/// Returns [`MyflixError::NotFound`] when no genre matches.
pub fn find_genre<'a>(genres: &'a [Genre], key: &str) -> Result<&'a Genre> {
    genres
        .iter()
        .find(|genre| genre.id == key || genre.name == key)
        .ok_or_else(|| MyflixError::NotFound {
            kind: "genre",
            key: key.to_string(),
        })
}

/// Finds a director by id or name.
///
/// # Errors
///
/// Returns [`MyflixError::NotFound`] when no director matches.
pub fn find_director<'a>(directors: &'a [Director], key: &str) -> Result<&'a Director> {
    directors
        .iter()
        .find(|director| director.id == key || director.name == key)
        .ok_or_else(|| MyflixError::NotFound {
            kind: "director",
            key: key.to_string(),
        })
}

/// Display name for a genre id, falling back to [`UNKNOWN_GENRE`].
#[must_use]
pub fn genre_name<'a>(genres: &'a [Genre], genre_id: &str) -> &'a str {
    genres
        .iter()
        .find(|genre| genre.id == genre_id)
        .map_or(UNKNOWN_GENRE, |genre| genre.name.as_str())
}

/// Image of the first movie in the genre, or [`DEFAULT_GENRE_IMAGE`].
#[must_use]
pub fn genre_image<'a>(movies: &'a [MovieRecord], genre_id: &str) -> &'a str {
    movies
        .iter()
        .find(|movie| movie.genre_id == genre_id)
        .and_then(|movie| movie.image_path.as_deref())
        .filter(|path| !path.is_empty())
        .unwrap_or(DEFAULT_GENRE_IMAGE)
}

/// Movies belonging to a genre, in catalog order.
#[must_use]
pub fn movies_in_genre(movies: &[MovieRecord], genre_id: &str) -> Vec<MovieRecord> {
    movies
        .iter()
        .filter(|movie| movie.genre_id == genre_id)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genres() -> Vec<Genre> {
        vec![Genre::new("g1", "Drama"), Genre::new("g2", "Crime")]
    }

    #[test]
    fn genre_name_falls_back_for_unknown_ids() {
        let genres = genres();
        assert_eq!(genre_name(&genres, "g2"), "Crime");
        assert_eq!(genre_name(&genres, "g9"), UNKNOWN_GENRE);
    }

    #[test]
    fn find_genre_accepts_id_or_name() {
        let genres = genres();
        assert_eq!(find_genre(&genres, "g1").unwrap().name, "Drama");
        assert_eq!(find_genre(&genres, "Crime").unwrap().id, "g2");
        assert!(matches!(
            find_genre(&genres, "Western"),
            Err(MyflixError::NotFound { kind: "genre", .. })
        ));
    }

    #[test]
    fn find_director_reports_not_found() {
        assert!(matches!(
            find_director(&[], "Mann"),
            Err(MyflixError::NotFound { kind: "director", .. })
        ));
    }

    #[test]
    fn genre_image_uses_first_matching_movie() {
        let movies = vec![
            MovieRecord::new("m1", "Heat", "g2", "d1"),
            MovieRecord::new("m2", "Collateral", "g2", "d1").with_image_path("collateral.jpg"),
            MovieRecord::new("m3", "Her", "g1", "d2").with_image_path("her.jpg"),
        ];

        assert_eq!(genre_image(&movies, "g1"), "her.jpg");
        // first crime movie has no image
        assert_eq!(genre_image(&movies, "g2"), DEFAULT_GENRE_IMAGE);
        assert_eq!(genre_image(&movies, "g3"), DEFAULT_GENRE_IMAGE);

        let crime: Vec<_> = movies_in_genre(&movies, "g2")
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(crime, ["Heat", "Collateral"]);
    }
}
