//! Account flows: register, login, logout.
//!
//! Login is the only flow that starts a session; logout and account deletion
//! (see [`super::ProfileView::delete_account`]) are the only ones that end it.

use super::context::AppContext;
use crate::domain::{Credentials, MyflixError, Registration, Result, UserRecord};
use tracing::Instrument;

/// Creates an account. Does not log in.
///
/// # Errors
///
/// Returns the gateway error when the server rejects the registration.
pub async fn register(ctx: &AppContext, registration: &Registration) -> Result<UserRecord> {
    let span = tracing::info_span!("register", user = %registration.user_name);
    let user = ctx.api.register(registration).instrument(span).await?;
    tracing::info!(user = %user.user_name, "account created");
    Ok(user)
}

/// Exchanges credentials for a token and starts the session.
///
/// On failure the session is left as it was.
///
/// # Errors
///
/// Returns the gateway error, or [`MyflixError::InvalidState`] if the server
/// answers without a token.
pub async fn login(ctx: &AppContext, credentials: &Credentials) -> Result<UserRecord> {
    let span = tracing::info_span!("login", user = %credentials.user_name);
    let response = ctx.api.login(credentials).instrument(span).await?;

    if response.token.trim().is_empty() {
        return Err(MyflixError::InvalidState(
            "login response carried no token".to_string(),
        ));
    }

    ctx.session
        .start(response.token, response.user.user_name.clone());
    tracing::info!(user = %response.user.user_name, "logged in");
    Ok(response.user)
}

/// Ends the session and clears the search term.
pub fn logout(ctx: &AppContext) {
    let user = ctx.session.username();
    ctx.session.clear();
    ctx.search.clear();
    tracing::info!(user = ?user, "logged out");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SessionStore;
    use crate::test_support::FakeApi;
    use crate::Config;
    use std::sync::Arc;

    fn context(api: FakeApi) -> AppContext {
        AppContext::with_api(Config::default(), SessionStore::in_memory(), Arc::new(api))
    }

    #[tokio::test]
    async fn login_starts_session() {
        let ctx = context(FakeApi::new().with_user(UserRecord::new("u1", "alice")));

        let user = login(&ctx, &Credentials::new("alice", "pw")).await.unwrap();

        assert_eq!(user.user_name, "alice");
        assert_eq!(ctx.session.token().as_deref(), Some("token-alice"));
        assert_eq!(ctx.current_user().unwrap(), "alice");
    }

    #[tokio::test]
    async fn failed_login_leaves_session_logged_out() {
        let ctx = context(FakeApi::new());

        let err = login(&ctx, &Credentials::new("mallory", "pw")).await.unwrap_err();

        assert_eq!(err.status(), Some(401));
        assert!(!ctx.session.is_logged_in());
        assert_eq!(ctx.current_user(), Err(MyflixError::Unauthenticated));
    }

    #[tokio::test]
    async fn register_does_not_log_in() {
        let ctx = context(FakeApi::new());
        let registration = Registration {
            user_name: "bob".to_string(),
            password: "pw".to_string(),
            email: "bob@example.com".to_string(),
            first_name: None,
            last_name: None,
            birthday: None,
        };

        let user = register(&ctx, &registration).await.unwrap();

        assert_eq!(user.email, "bob@example.com");
        assert!(!ctx.session.is_logged_in());
    }

    #[test]
    fn logout_clears_session_and_search() {
        let ctx = context(FakeApi::new());
        ctx.session.start("t", "alice");
        ctx.search.set_term("Dark");

        logout(&ctx);

        assert_eq!(ctx.session.token(), None);
        assert_eq!(ctx.session.username(), None);
        assert_eq!(ctx.search.term(), "");
    }
}
