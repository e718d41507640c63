//! Scripted in-memory [`CatalogApi`] for unit tests.

use crate::domain::{
    Credentials, Director, Genre, LoginResponse, MovieId, MovieRecord, MyflixError, Registration,
    Result, UserPatch, UserRecord,
};
use crate::gateway::CatalogApi;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Default)]
struct FakeState {
    movies: Vec<MovieRecord>,
    genres: Vec<Genre>,
    directors: Vec<Director>,
    users: Vec<UserRecord>,
    failures: HashMap<&'static str, MyflixError>,
    calls: Vec<String>,
}

/// Fake server. Favorites are resolved from movie name to the first matching id,
/// the way the real server does.
#[derive(Debug, Default)]
pub struct FakeApi {
    state: Mutex<FakeState>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_movies(self, movies: Vec<MovieRecord>) -> Self {
        self.lock().movies = movies;
        self
    }

    pub fn with_genres(self, genres: Vec<Genre>) -> Self {
        self.lock().genres = genres;
        self
    }

    pub fn with_directors(self, directors: Vec<Director>) -> Self {
        self.lock().directors = directors;
        self
    }

    pub fn with_user(self, user: UserRecord) -> Self {
        self.lock().users.push(user);
        self
    }

    /// The next call of `op` fails with `err`.
    pub fn fail_next(self, op: &'static str, err: MyflixError) -> Self {
        self.lock().failures.insert(op, err);
        self
    }

    pub fn set_failure(&self, op: &'static str, err: MyflixError) {
        self.lock().failures.insert(op, err);
    }

    /// Every call so far as `"op arg..."`.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self, op: &str) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.split(' ').next() == Some(op))
            .count()
    }

    pub fn user(&self, name: &str) -> Option<UserRecord> {
        self.lock()
            .users
            .iter()
            .find(|user| user.user_name == name)
            .cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    fn record(&self, op: &'static str, args: &[&str]) -> Result<()> {
        let mut state = self.lock();
        let mut call = op.to_string();
        for arg in args {
            call.push(' ');
            call.push_str(arg);
        }
        state.calls.push(call);
        match state.failures.remove(op) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn not_found(kind: &'static str, key: &str) -> MyflixError {
        MyflixError::NotFound {
            kind,
            key: key.to_string(),
        }
    }

    fn mutate_favorites(
        &self,
        user_name: &str,
        movie_name: &str,
        apply: impl FnOnce(&mut Vec<MovieId>, MovieId),
    ) -> Result<()> {
        let mut state = self.lock();
        let id = state
            .movies
            .iter()
            .find(|movie| movie.name == movie_name)
            .map(|movie| movie.id.clone())
            .ok_or_else(|| Self::not_found("movie", movie_name))?;
        let user = state
            .users
            .iter_mut()
            .find(|user| user.user_name == user_name)
            .ok_or_else(|| Self::not_found("user", user_name))?;
        apply(&mut user.favorite_movie_ids, id);
        Ok(())
    }
}

#[async_trait]
impl CatalogApi for FakeApi {
    async fn register(&self, registration: &Registration) -> Result<UserRecord> {
        self.record("register", &[&registration.user_name])?;
        let mut user = UserRecord::new(
            format!("u-{}", registration.user_name),
            &registration.user_name,
        );
        user.email = registration.email.clone();
        self.lock().users.push(user.clone());
        Ok(user)
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        self.record("login", &[&credentials.user_name])?;
        let user = self
            .user(&credentials.user_name)
            .ok_or_else(|| MyflixError::Remote {
                status: 401,
                body: "Incorrect username or password".to_string(),
            })?;
        Ok(LoginResponse {
            token: format!("token-{}", user.user_name),
            user,
        })
    }

    async fn list_movies(&self) -> Result<Vec<MovieRecord>> {
        self.record("list_movies", &[])?;
        Ok(self.lock().movies.clone())
    }

    async fn get_movie(&self, name: &str) -> Result<MovieRecord> {
        self.record("get_movie", &[name])?;
        self.lock()
            .movies
            .iter()
            .find(|movie| movie.name == name)
            .cloned()
            .ok_or_else(|| Self::not_found("movie", name))
    }

    async fn list_genres(&self) -> Result<Vec<Genre>> {
        self.record("list_genres", &[])?;
        Ok(self.lock().genres.clone())
    }

    async fn get_genre(&self, name: &str) -> Result<Genre> {
        self.record("get_genre", &[name])?;
        self.lock()
            .genres
            .iter()
            .find(|genre| genre.name == name)
            .cloned()
            .ok_or_else(|| Self::not_found("genre", name))
    }

    async fn list_directors(&self) -> Result<Vec<Director>> {
        self.record("list_directors", &[])?;
        Ok(self.lock().directors.clone())
    }

    async fn get_director(&self, name: &str) -> Result<Director> {
        self.record("get_director", &[name])?;
        self.lock()
            .directors
            .iter()
            .find(|director| director.name == name)
            .cloned()
            .ok_or_else(|| Self::not_found("director", name))
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>> {
        self.record("list_users", &[])?;
        Ok(self.lock().users.clone())
    }

    async fn get_user(&self, name: &str) -> Result<UserRecord> {
        self.record("get_user", &[name])?;
        self.user(name).ok_or_else(|| Self::not_found("user", name))
    }

    async fn update_user(&self, name: &str, patch: &UserPatch) -> Result<()> {
        self.record("update_user", &[name])?;
        let mut state = self.lock();
        let user = state
            .users
            .iter_mut()
            .find(|user| user.user_name == name)
            .ok_or_else(|| Self::not_found("user", name))?;
        if let Some(user_name) = &patch.user_name {
            user.user_name.clone_from(user_name);
        }
        if let Some(email) = &patch.email {
            user.email.clone_from(email);
        }
        if patch.first_name.is_some() {
            user.first_name.clone_from(&patch.first_name);
        }
        if patch.last_name.is_some() {
            user.last_name.clone_from(&patch.last_name);
        }
        if patch.birthday.is_some() {
            user.birthday.clone_from(&patch.birthday);
        }
        Ok(())
    }

    async fn delete_user(&self, name: &str) -> Result<()> {
        self.record("delete_user", &[name])?;
        let mut state = self.lock();
        let before = state.users.len();
        state.users.retain(|user| user.user_name != name);
        if state.users.len() == before {
            return Err(Self::not_found("user", name));
        }
        Ok(())
    }

    async fn add_favorite(&self, user_name: &str, movie_name: &str) -> Result<()> {
        self.record("add_favorite", &[user_name, movie_name])?;
        self.mutate_favorites(user_name, movie_name, |favorites, id| {
            if !favorites.contains(&id) {
                favorites.push(id);
            }
        })
    }

    async fn remove_favorite(&self, user_name: &str, movie_name: &str) -> Result<()> {
        self.record("remove_favorite", &[user_name, movie_name])?;
        self.mutate_favorites(user_name, movie_name, |favorites, id| {
            favorites.retain(|existing| existing != &id);
        })
    }
}
