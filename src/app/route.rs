//! Client routes and the authentication guard.

use crate::store::SessionStore;
use std::fmt;

/// A navigable location in the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Registration,
    Home,
    Movies,
    /// Detail page of the movie with this name.
    Movie(String),
    Genres,
    Favorites,
    Profile,
}

impl Route {
    /// Parses a path such as `movies/Heat`.
    ///
    /// Leading and trailing slashes are ignored and the empty path is
    /// [`Route::Home`]. Unknown paths yield `None`.
    ///
    /// # Example
    ///
    /// ```
    /// use myflix::Route;
    ///
    /// assert_eq!(Route::parse("/"), Some(Route::Home));
    /// assert_eq!(Route::parse("movies/Heat"), Some(Route::Movie("Heat".to_string())));
    /// assert_eq!(Route::parse("admin"), None);
    /// ```
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.trim_matches('/');
        let (head, rest) = path
            .split_once('/')
            .map_or((path, None), |(head, rest)| (head, Some(rest)));

        match (head, rest) {
            ("", None) | ("home", None) => Some(Self::Home),
            ("login", None) => Some(Self::Login),
            ("registration", None) => Some(Self::Registration),
            ("movies", None) => Some(Self::Movies),
            ("movies", Some(name)) if !name.is_empty() && !name.contains('/') => {
                Some(Self::Movie(name.to_string()))
            }
            ("genres", None) => Some(Self::Genres),
            ("favorites", None) => Some(Self::Favorites),
            ("profile", None) => Some(Self::Profile),
            _ => None,
        }
    }

    /// Whether the route needs a logged-in session.
    #[must_use]
    pub const fn requires_auth(&self) -> bool {
        !matches!(self, Self::Login | Self::Registration | Self::Home)
    }

    /// The route to actually show: protected routes redirect to
    /// [`Route::Login`] while no token is present.
    #[must_use]
    pub fn guard(self, session: &SessionStore) -> Self {
        if self.requires_auth() && !session.is_logged_in() {
            tracing::debug!(requested = %self, "redirecting to login");
            return Self::Login;
        }
        self
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => f.write_str("login"),
            Self::Registration => f.write_str("registration"),
            Self::Home => f.write_str("home"),
            Self::Movies => f.write_str("movies"),
            Self::Movie(name) => write!(f, "movies/{name}"),
            Self::Genres => f.write_str("genres"),
            Self::Favorites => f.write_str("favorites"),
            Self::Profile => f.write_str("profile"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_paths() {
        assert_eq!(Route::parse(""), Some(Route::Home));
        assert_eq!(Route::parse("home/"), Some(Route::Home));
        assert_eq!(Route::parse("/login"), Some(Route::Login));
        assert_eq!(Route::parse("registration"), Some(Route::Registration));
        assert_eq!(Route::parse("movies"), Some(Route::Movies));
        assert_eq!(Route::parse("genres"), Some(Route::Genres));
        assert_eq!(Route::parse("favorites"), Some(Route::Favorites));
        assert_eq!(Route::parse("profile"), Some(Route::Profile));
        assert_eq!(
            Route::parse("movies/The Dark Knight"),
            Some(Route::Movie("The Dark Knight".to_string()))
        );
        assert_eq!(Route::parse("movies/a/b"), None);
        assert_eq!(Route::parse("profile/edit"), None);
    }

    #[test]
    fn display_round_trips_through_parse() {
        let route = Route::Movie("Heat".to_string());
        assert_eq!(Route::parse(&route.to_string()), Some(route));
    }

    #[test]
    fn guard_redirects_only_protected_routes() {
        let session = SessionStore::in_memory();
        assert_eq!(Route::Favorites.guard(&session), Route::Login);
        assert_eq!(Route::Home.guard(&session), Route::Home);
        assert_eq!(Route::Registration.guard(&session), Route::Registration);

        session.start("t", "alice");
        assert_eq!(Route::Favorites.guard(&session), Route::Favorites);
        assert_eq!(
            Route::Movie("Heat".to_string()).guard(&session),
            Route::Movie("Heat".to_string())
        );
    }
}
