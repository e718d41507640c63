//! Header model: login state and the navigation menu toggle.

use crate::store::{SessionStore, Subscription};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Tracks whether a user is logged in by observing the session token.
///
/// The subscription lives as long as the model; dropping the model detaches it.
#[derive(Debug)]
pub struct HeaderModel {
    session: SessionStore,
    logged_in: Arc<AtomicBool>,
    menu_open: bool,
    _subscription: Subscription,
}

impl HeaderModel {
    pub fn new(session: &SessionStore) -> Self {
        let logged_in = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&logged_in);
        let subscription = session.subscribe(move |token| {
            flag.store(token.as_deref().is_some_and(|t| !t.is_empty()), Ordering::SeqCst);
        });

        Self {
            session: session.clone(),
            logged_in,
            menu_open: false,
            _subscription: subscription,
        }
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.logged_in.load(Ordering::SeqCst)
    }

    /// Greeting shown in the header, if logged in.
    #[must_use]
    pub fn user_label(&self) -> Option<String> {
        if !self.is_logged_in() {
            return None;
        }
        self.session.username()
    }

    #[must_use]
    pub const fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
    }

    pub fn close_menu(&mut self) {
        self.menu_open = false;
    }
}
