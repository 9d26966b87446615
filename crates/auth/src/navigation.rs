//! Navigation sink and well-known destinations.

use std::sync::Mutex;

use entities::UserRole;

/// Default login entry point.
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Default landing page for administrators.
pub const DEFAULT_ADMIN_PATH: &str = "/admin";

/// Default landing page for members.
pub const DEFAULT_LIBRARY_PATH: &str = "/library";

/// Receiver of client-side redirects.
pub trait Navigator: Send + Sync {
    /// Redirects to `destination`.
    fn push(&self, destination: &str);
}

/// Destinations used when a visitor has to be sent elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routes {
    /// Where unauthenticated visitors go.
    pub login: String,
    /// Landing page for administrators.
    pub admin_home: String,
    /// Landing page for everyone else.
    pub user_home: String,
}

impl Default for Routes {
    fn default() -> Self {
        Self {
            login: DEFAULT_LOGIN_PATH.to_string(),
            admin_home: DEFAULT_ADMIN_PATH.to_string(),
            user_home: DEFAULT_LIBRARY_PATH.to_string(),
        }
    }
}

impl Routes {
    /// Returns the landing page for a role.
    pub fn home_for(&self, role: UserRole) -> &str {
        match role {
            UserRole::Admin => self.admin_home.as_str(),
            UserRole::User => self.user_home.as_str(),
        }
    }
}

/// Navigator that keeps the redirect history instead of navigating.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    history: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    /// Creates a navigator with an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every destination pushed so far, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Returns the most recent destination.
    pub fn last(&self) -> Option<String> {
        self.history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn push(&self, destination: &str) {
        self.history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(destination.to_string());
    }
}
