//! Profile page: show, update and delete the logged-in account.
//!
//! Every operation addresses the user logged in at call time.

use crate::app::AppContext;
use crate::domain::{MyflixError, Result, UserPatch, UserRecord};
use crate::gateway::CatalogApi;
use crate::store::SessionStore;
use std::sync::Arc;
use tracing::Instrument;

#[derive(Debug)]
pub struct ProfileView {
    api: Arc<dyn CatalogApi>,
    session: SessionStore,
    user: Option<UserRecord>,
    loading: bool,
}

impl ProfileView {
    /// # Errors
    ///
    /// Returns [`MyflixError::Unauthenticated`] when no user is logged in.
    pub fn new(ctx: &AppContext) -> Result<Self> {
        ctx.current_user()?;
        Ok(Self {
            api: Arc::clone(&ctx.api),
            session: ctx.session.clone(),
            user: None,
            loading: true,
        })
    }

    /// Fetches the record of the session's current user.
    ///
    /// # Errors
    ///
    /// Returns [`MyflixError::Unauthenticated`] when nobody is logged in,
    /// otherwise the gateway error of the user fetch.
    pub async fn activate(&mut self) -> Result<()> {
        let result = self.fetch().await;
        self.loading = false;
        self.user = Some(result?);
        Ok(())
    }

    async fn fetch(&self) -> Result<UserRecord> {
        let user_name = self.session.current_user()?;
        self.api.get_user(&user_name).await.map_err(|e| {
            tracing::error!(user = %user_name, error = %e, "error fetching user info");
            e
        })
    }

    #[must_use]
    pub const fn user(&self) -> Option<&UserRecord> {
        self.user.as_ref()
    }

    /// Whether the first user fetch is still outstanding.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Sends the changed fields and reloads the record.
    ///
    /// A changed username is carried into the session so later calls address
    /// the renamed account.
    ///
    /// # Errors
    ///
    /// Returns [`MyflixError::InvalidState`] for an empty patch (nothing is
    /// sent), [`MyflixError::Unauthenticated`] when nobody is logged in,
    /// otherwise the gateway error.
    pub async fn update(&mut self, patch: &UserPatch) -> Result<()> {
        if patch.is_empty() {
            return Err(MyflixError::InvalidState("nothing to update".to_string()));
        }
        let user_name = self.session.current_user()?;

        let span = tracing::info_span!("profile_update", user = %user_name);
        self.api
            .update_user(&user_name, patch)
            .instrument(span)
            .await?;

        if let Some(new_name) = patch.user_name.as_ref().filter(|n| **n != user_name) {
            tracing::info!(from = %user_name, to = %new_name, "username changed");
            self.session.set_username(Some(new_name.clone()));
        }

        self.activate().await
    }

    /// Deletes the account and logs out.
    ///
    /// # Errors
    ///
    /// Returns [`MyflixError::Unauthenticated`] when nobody is logged in,
    /// otherwise the gateway error; the session is kept when deletion fails.
    pub async fn delete_account(&mut self) -> Result<()> {
        let user_name = self.session.current_user()?;
        let span = tracing::info_span!("delete_account", user = %user_name);
        self.api.delete_user(&user_name).instrument(span).await?;

        tracing::info!(user = %user_name, "account deleted");
        self.session.clear();
        self.user = None;
        Ok(())
    }
}
