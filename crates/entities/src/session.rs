//! Observable authentication state.

use crate::User;

/// Snapshot of the current session as seen by consumers.
///
/// `is_authenticated` is derived from `user`, so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    /// Logged-in user, if any. A copy, not a directory reference.
    pub user: Option<User>,
    /// True while the session is being resolved or a call is in flight.
    pub is_loading: bool,
}

impl AuthState {
    /// State before the persisted session has been consulted.
    pub fn initializing() -> Self {
        Self {
            user: None,
            is_loading: true,
        }
    }

    /// Resolved state with a logged-in user.
    pub fn authenticated(user: User) -> Self {
        Self {
            user: Some(user),
            is_loading: false,
        }
    }

    /// Resolved state with nobody logged in.
    pub fn anonymous() -> Self {
        Self {
            user: None,
            is_loading: false,
        }
    }

    /// Returns true iff a user is present.
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Returns a copy with the loading flag replaced.
    pub fn with_loading(&self, is_loading: bool) -> Self {
        Self {
            user: self.user.clone(),
            is_loading,
        }
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::initializing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        let state = AuthState::default();
        assert!(state.is_loading);
        assert!(!state.is_authenticated());

        let state = AuthState::authenticated(User::new("a@example.com", "A"));
        assert!(!state.is_loading);
        assert!(state.is_authenticated());

        let loading = state.with_loading(true);
        assert!(loading.is_loading);
        assert_eq!(loading.user, state.user);

        assert_eq!(
            AuthState::anonymous(),
            AuthState {
                user: None,
                is_loading: false
            }
        );
    }
}
