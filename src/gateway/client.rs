//! HTTP implementation of the remote gateway.
//!
//! Every request is built here. The bearer token is read from the
//! [`SessionStore`] at call time, so a token change is honored by the next call
//! and never by a call already in flight.

use crate::domain::{
    Credentials, Director, Genre, LoginResponse, MovieRecord, MyflixError, Registration, Result,
    UserPatch, UserRecord,
};
use crate::gateway::api::CatalogApi;
use crate::store::SessionStore;
use crate::Config;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::Instrument;

/// Whether an endpoint needs the session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Auth {
    Required,
    Anonymous,
}

/// reqwest-backed [`CatalogApi`].
///
/// # Examples
///
/// ```no_run
/// use myflix::gateway::{CatalogApi, RemoteGateway};
/// use myflix::store::SessionStore;
/// use myflix::Config;
///
/// # async fn demo() -> myflix::Result<()> {
/// let session = SessionStore::in_memory();
/// let gateway = RemoteGateway::new(&Config::default(), session.clone())?;
/// let movies = gateway.list_movies().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct RemoteGateway {
    client: Client,
    base_url: Url,
    session: SessionStore,
}

impl RemoteGateway {
    /// Builds a gateway from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MyflixError::Config`] if the API URL is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: &Config, session: SessionStore) -> Result<Self> {
        let base_url = parse_base_url(&config.api_url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MyflixError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self::with_client(client, base_url, session))
    }

    /// Builds a gateway around an existing client and base URL.
    #[must_use]
    pub const fn with_client(client: Client, base_url: Url, session: SessionStore) -> Self {
        Self {
            client,
            base_url,
            session,
        }
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Joins percent-encoded path segments onto the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| MyflixError::Config(format!("API URL cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Creates a request, attaching the bearer token when required.
    ///
    /// Fails with [`MyflixError::Unauthenticated`] before anything is sent when
    /// the endpoint needs a token and none is present.
    fn request(&self, method: Method, segments: &[&str], auth: Auth) -> Result<RequestBuilder> {
        let url = self.endpoint(segments)?;
        let builder = self.client.request(method, url);

        match auth {
            Auth::Anonymous => Ok(builder),
            Auth::Required => {
                let token = self
                    .session
                    .token()
                    .filter(|t| !t.is_empty())
                    .ok_or(MyflixError::Unauthenticated)?;
                Ok(builder.header(AUTHORIZATION, format!("Bearer {token}")))
            }
        }
    }

    /// Sends a request and turns non-2xx responses into [`MyflixError::Remote`].
    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await.map_err(|e| {
            tracing::error!(error = %e, "request failed before a response arrived");
            MyflixError::from(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::error!(status = status.as_u16(), body = %body, "server rejected request");
        Err(MyflixError::Remote {
            status: status.as_u16(),
            body,
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, segments: &[&str], auth: Auth) -> Result<T> {
        let builder = self.request(Method::GET, segments, auth)?;
        let response = self.send(builder).await?;
        decode(response).await
    }

    /// Fetches a single record by name.
    ///
    /// A 404, or a `null` body, becomes [`MyflixError::NotFound`].
    async fn lookup<T: DeserializeOwned>(
        &self,
        collection: &str,
        kind: &'static str,
        name: &str,
    ) -> Result<T> {
        let not_found = || MyflixError::NotFound {
            kind,
            key: name.to_string(),
        };

        match self
            .fetch::<Option<T>>(&[collection, name], Auth::Required)
            .await
        {
            Ok(Some(record)) => Ok(record),
            Ok(None) => Err(not_found()),
            Err(MyflixError::Remote { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(not_found())
            }
            Err(e) => Err(e),
        }
    }

    async fn post_json<B, T>(&self, segments: &[&str], body: &B, auth: Auth) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::POST, segments, auth)?.json(body);
        let response = self.send(builder).await?;
        decode(response).await
    }

    /// Sends a request whose response body is ignored.
    async fn execute(&self, builder: RequestBuilder) -> Result<()> {
        self.send(builder).await.map(drop)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    response.json::<T>().await.map_err(|e| {
        tracing::error!(error = %e, "failed to decode response body");
        MyflixError::Transport(format!("invalid response body: {e}"))
    })
}

/// Parses the configured API URL.
///
/// # Errors
///
/// Returns [`MyflixError::Config`] if the URL is malformed or cannot carry a path.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let url = raw
        .trim()
        .parse::<Url>()
        .map_err(|e| MyflixError::Config(format!("invalid API URL '{raw}': {e}")))?;
    if url.cannot_be_a_base() {
        return Err(MyflixError::Config(format!(
            "API URL cannot be a base: {raw}"
        )));
    }
    Ok(url)
}

#[async_trait]
impl CatalogApi for RemoteGateway {
    async fn register(&self, registration: &Registration) -> Result<UserRecord> {
        self.post_json(&["users", "create"], registration, Auth::Anonymous)
            .instrument(tracing::debug_span!("gateway_register", user = %registration.user_name))
            .await
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        self.post_json(&["login"], credentials, Auth::Anonymous)
            .instrument(tracing::debug_span!("gateway_login", user = %credentials.user_name))
            .await
    }

    async fn list_movies(&self) -> Result<Vec<MovieRecord>> {
        self.fetch(&["movies"], Auth::Required)
            .instrument(tracing::debug_span!("gateway_list_movies"))
            .await
    }

    async fn get_movie(&self, name: &str) -> Result<MovieRecord> {
        self.lookup("movies", "movie", name)
            .instrument(tracing::debug_span!("gateway_get_movie", movie = %name))
            .await
    }

    async fn list_genres(&self) -> Result<Vec<Genre>> {
        self.fetch(&["genres"], Auth::Required)
            .instrument(tracing::debug_span!("gateway_list_genres"))
            .await
    }

    async fn get_genre(&self, name: &str) -> Result<Genre> {
        self.lookup("genres", "genre", name)
            .instrument(tracing::debug_span!("gateway_get_genre", genre = %name))
            .await
    }

    async fn list_directors(&self) -> Result<Vec<Director>> {
        self.fetch(&["directors"], Auth::Required)
            .instrument(tracing::debug_span!("gateway_list_directors"))
            .await
    }

    async fn get_director(&self, name: &str) -> Result<Director> {
        self.lookup("directors", "director", name)
            .instrument(tracing::debug_span!("gateway_get_director", director = %name))
            .await
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>> {
        self.fetch(&["users"], Auth::Required)
            .instrument(tracing::debug_span!("gateway_list_users"))
            .await
    }

    async fn get_user(&self, name: &str) -> Result<UserRecord> {
        self.lookup("users", "user", name)
            .instrument(tracing::debug_span!("gateway_get_user", user = %name))
            .await
    }

    async fn update_user(&self, name: &str, patch: &UserPatch) -> Result<()> {
        let span = tracing::debug_span!("gateway_update_user", user = %name);
        async {
            let builder = self
                .request(Method::PUT, &["users", "update", name], Auth::Required)?
                .json(patch);
            self.execute(builder).await
        }
        .instrument(span)
        .await
    }

    async fn delete_user(&self, name: &str) -> Result<()> {
        let span = tracing::debug_span!("gateway_delete_user", user = %name);
        async {
            let builder = self.request(Method::DELETE, &["users", name], Auth::Required)?;
            self.execute(builder).await
        }
        .instrument(span)
        .await
    }

    async fn add_favorite(&self, user_name: &str, movie_name: &str) -> Result<()> {
        let span = tracing::debug_span!("gateway_add_favorite", user = %user_name, movie = %movie_name);
        async {
            let builder = self.request(
                Method::POST,
                &["users", user_name, "movies", movie_name],
                Auth::Required,
            )?;
            self.execute(builder).await
        }
        .instrument(span)
        .await
    }

    async fn remove_favorite(&self, user_name: &str, movie_name: &str) -> Result<()> {
        let span =
            tracing::debug_span!("gateway_remove_favorite", user = %user_name, movie = %movie_name);
        async {
            let builder = self.request(
                Method::DELETE,
                &["users", user_name, "movies", movie_name],
                Auth::Required,
            )?;
            self.execute(builder).await
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn gateway_for(server: &MockServer, session: &SessionStore) -> RemoteGateway {
        let base_url = parse_base_url(&server.base_url()).unwrap();
        RemoteGateway::with_client(Client::new(), base_url, session.clone())
    }

    fn logged_in() -> SessionStore {
        let session = SessionStore::in_memory();
        session.start("secret-token", "alice");
        session
    }

    #[tokio::test]
    async fn list_movies_sends_bearer_token() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/movies")
                .header("authorization", "Bearer secret-token");
            then.status(200).json_body(json!([
                {"_id": "m1", "name": "Heat", "genre": "g1", "director": "d1"}
            ]));
        });

        let gateway = gateway_for(&server, &logged_in());
        let movies = gateway.list_movies().await.unwrap();

        mock.assert();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].name, "Heat");
    }

    #[tokio::test]
    async fn missing_token_never_reaches_network() {
        let server = MockServer::start_async().await;
        let movies = server.mock(|when, then| {
            when.method(GET).path("/movies");
            then.status(200).json_body(json!([]));
        });
        let favorite = server.mock(|when, then| {
            when.method(POST).path("/users/alice/movies/Heat");
            then.status(200);
        });
        let delete = server.mock(|when, then| {
            when.method(DELETE).path("/users/alice");
            then.status(200);
        });

        let gateway = gateway_for(&server, &SessionStore::in_memory());

        assert_eq!(gateway.list_movies().await, Err(MyflixError::Unauthenticated));
        assert_eq!(
            gateway.add_favorite("alice", "Heat").await,
            Err(MyflixError::Unauthenticated)
        );
        assert_eq!(
            gateway.delete_user("alice").await,
            Err(MyflixError::Unauthenticated)
        );
        assert_eq!(movies.calls(), 0);
        assert_eq!(favorite.calls(), 0);
        assert_eq!(delete.calls(), 0);
    }

    #[tokio::test]
    async fn token_is_read_at_call_time() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/genres")
                .header("authorization", "Bearer refreshed");
            then.status(200).json_body(json!([]));
        });

        let session = SessionStore::in_memory();
        let gateway = gateway_for(&server, &session);
        session.start("refreshed", "alice");

        gateway.list_genres().await.unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn non_success_preserves_status_and_body() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/users/alice/movies/Heat");
            then.status(500).body("database unavailable");
        });

        let gateway = gateway_for(&server, &logged_in());
        let err = gateway.add_favorite("alice", "Heat").await.unwrap_err();

        assert_eq!(
            err,
            MyflixError::Remote {
                status: 500,
                body: "database unavailable".to_string()
            }
        );
        assert_eq!(err.user_message(), crate::domain::GENERIC_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn path_segments_are_percent_encoded() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(DELETE).path("/users/alice/movies/The%20Dark%20Knight");
            then.status(200).body("removed");
        });

        let gateway = gateway_for(&server, &logged_in());
        gateway.remove_favorite("alice", "The Dark Knight").await.unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn login_is_anonymous() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/login")
                .json_body(json!({"userName": "alice", "password": "pw"}));
            then.status(200).json_body(json!({
                "user": {"_id": "u1", "userName": "alice", "email": "a@example.com"},
                "token": "fresh"
            }));
        });

        let gateway = gateway_for(&server, &SessionStore::in_memory());
        let response = gateway
            .login(&Credentials::new("alice", "pw"))
            .await
            .unwrap();

        mock.assert();
        assert_eq!(response.token, "fresh");
        assert_eq!(response.user.user_name, "alice");
    }

    #[tokio::test]
    async fn lookup_maps_missing_records_to_not_found() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/genres/Western");
            then.status(404).body("no such genre");
        });
        server.mock(|when, then| {
            when.method(GET).path("/directors/Nobody");
            then.status(200).json_body(json!(null));
        });

        let gateway = gateway_for(&server, &logged_in());

        assert_eq!(
            gateway.get_genre("Western").await,
            Err(MyflixError::NotFound {
                kind: "genre",
                key: "Western".to_string()
            })
        );
        assert_eq!(
            gateway.get_director("Nobody").await,
            Err(MyflixError::NotFound {
                kind: "director",
                key: "Nobody".to_string()
            })
        );
    }

    #[tokio::test]
    async fn update_user_sends_patch_and_ignores_text_body() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(PUT)
                .path("/users/update/alice")
                .json_body(json!({"email": "new@example.com"}));
            then.status(200).body("alice was updated");
        });

        let gateway = gateway_for(&server, &logged_in());
        let patch = UserPatch {
            email: Some("new@example.com".to_string()),
            ..UserPatch::default()
        };
        gateway.update_user("alice", &patch).await.unwrap();
        mock.assert();
    }

    #[test]
    fn rejects_unusable_base_urls() {
        assert!(matches!(
            parse_base_url("not a url"),
            Err(MyflixError::Config(_))
        ));
        assert!(matches!(
            parse_base_url("mailto:team@example.com"),
            Err(MyflixError::Config(_))
        ));
    }
}
