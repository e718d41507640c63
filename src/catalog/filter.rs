//! Search filtering over the movie catalog.

use crate::domain::MovieRecord;

/// Filters movies whose name contains `term`, ignoring case.
///
/// An empty term returns every movie. Relative order is always preserved.
/// Catalogs are small enough that the result is recomputed from scratch on
/// every change to either input.
///
/// # Examples
///
/// ```
/// use myflix::{catalog::filter_movies, MovieRecord};
///
/// let movies = vec![
///     MovieRecord::new("m1", "Dark Knight", "g", "d"),
///     MovieRecord::new("m2", "Her", "g", "d"),
///     MovieRecord::new("m3", "Darkest Hour", "g", "d"),
/// ];
///
/// let names: Vec<_> = filter_movies(&movies, "dark").into_iter().map(|m| m.name).collect();
/// assert_eq!(names, ["Dark Knight", "Darkest Hour"]);
/// assert_eq!(filter_movies(&movies, "").len(), 3);
/// ```
#[must_use]
pub fn filter_movies(movies: &[MovieRecord], term: &str) -> Vec<MovieRecord> {
    if term.is_empty() {
        return movies.to_vec();
    }

    let needle = term.to_lowercase();
    let filtered: Vec<MovieRecord> = movies
        .iter()
        .filter(|movie| movie.name.to_lowercase().contains(&needle))
        .cloned()
        .collect();

    tracing::trace!(
        total = movies.len(),
        matched = filtered.len(),
        "catalog filter applied"
    );
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(names: &[&str]) -> Vec<MovieRecord> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| MovieRecord::new(format!("m{i}"), *name, "g", "d"))
            .collect()
    }

    fn names(movies: &[MovieRecord]) -> Vec<&str> {
        movies.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn empty_term_returns_catalog_unchanged() {
        let movies = catalog(&["Heat", "Alien", "Brazil"]);
        assert_eq!(filter_movies(&movies, ""), movies);
    }

    #[test]
    fn matches_substrings_case_insensitively_in_order() {
        let movies = catalog(&["Dark Knight", "Her", "Darkest Hour"]);

        assert_eq!(
            names(&filter_movies(&movies, "dark")),
            ["Dark Knight", "Darkest Hour"]
        );
        assert_eq!(
            names(&filter_movies(&movies, "HOUR")),
            ["Darkest Hour"]
        );
        assert_eq!(names(&filter_movies(&movies, "er")), ["Her"]);
    }

    #[test]
    fn no_match_yields_empty() {
        let movies = catalog(&["Heat"]);
        assert!(filter_movies(&movies, "zzz").is_empty());
    }
}
