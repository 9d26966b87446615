//! Route guard: access policy for protected content.
//!
//! The guard observes an [`AuthContext`] and re-evaluates whenever the
//! session or its required role changes. Redirects are issued as explicit
//! [`Navigator`] commands; rendering only reports what should be shown.

use std::sync::{Arc, Mutex};

use entities::{AuthState, User, UserRole};

use crate::{AuthContext, AuthObserver, Navigator, Routes};

/// Outcome of the access policy for one state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still resolving. Show a placeholder, do not navigate.
    Loading,
    /// Visitor must be sent elsewhere. Show nothing.
    Redirect(String),
    /// Visitor may see the protected content.
    Allow,
}

/// What a guarded view should display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered<T> {
    /// Loading indicator while the session resolves.
    Placeholder,
    /// Nothing; a redirect is under way.
    Nothing,
    /// The protected content, unchanged.
    Content(T),
}

impl<T> Rendered<T> {
    /// Returns the content if it is being shown.
    pub fn content(self) -> Option<T> {
        match self {
            Self::Content(content) => Some(content),
            _ => None,
        }
    }
}

/// Applies the access policy to a session state.
pub fn evaluate(
    state: &AuthState,
    required_role: Option<UserRole>,
    routes: &Routes,
) -> GuardDecision {
    if state.is_loading {
        return GuardDecision::Loading;
    }

    let Some(user) = &state.user else {
        return GuardDecision::Redirect(routes.login.clone());
    };

    match required_role {
        Some(role) if user.role != role => {
            GuardDecision::Redirect(routes.home_for(user.role).to_string())
        }
        _ => GuardDecision::Allow,
    }
}

/// Everything the decision depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
struct GuardInputs {
    is_loading: bool,
    user: Option<User>,
    required_role: Option<UserRole>,
}

#[derive(Debug)]
struct GuardInner {
    required_role: Option<UserRole>,
    last_state: Option<AuthState>,
    last_inputs: Option<GuardInputs>,
    decision: GuardDecision,
}

/// Observer enforcing authentication and role requirements.
pub struct RouteGuard {
    navigator: Arc<dyn Navigator>,
    routes: Routes,
    inner: Mutex<GuardInner>,
}

impl std::fmt::Debug for RouteGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteGuard")
            .field("routes", &self.routes)
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl RouteGuard {
    /// Creates a guard. It shows the placeholder until it first observes a
    /// state.
    pub fn new(
        navigator: Arc<dyn Navigator>,
        routes: Routes,
        required_role: Option<UserRole>,
    ) -> Self {
        Self {
            navigator,
            routes,
            inner: Mutex::new(GuardInner {
                required_role,
                last_state: None,
                last_inputs: None,
                decision: GuardDecision::Loading,
            }),
        }
    }

    /// Creates a guard and subscribes it to `context`, evaluating the current
    /// state immediately.
    pub fn mount(
        context: &AuthContext,
        navigator: Arc<dyn Navigator>,
        routes: Routes,
        required_role: Option<UserRole>,
    ) -> Arc<Self> {
        let guard = Arc::new(Self::new(navigator, routes, required_role));
        context.observe(guard.clone());
        guard
    }

    /// Returns the current decision.
    pub fn decision(&self) -> GuardDecision {
        self.lock().decision.clone()
    }

    /// Returns the role this guard requires, if any.
    pub fn required_role(&self) -> Option<UserRole> {
        self.lock().required_role
    }

    /// Changes the required role and re-evaluates against the last observed
    /// state.
    pub fn set_required_role(&self, required_role: Option<UserRole>) {
        let state = {
            let mut inner = self.lock();
            inner.required_role = required_role;
            inner.last_state.clone()
        };
        if let Some(state) = state {
            self.reevaluate(&state);
        }
    }

    /// Decides what to display in place of `children`.
    pub fn render<T>(&self, children: T) -> Rendered<T> {
        match self.decision() {
            GuardDecision::Loading => Rendered::Placeholder,
            GuardDecision::Redirect(_) => Rendered::Nothing,
            GuardDecision::Allow => Rendered::Content(children),
        }
    }

    fn reevaluate(&self, state: &AuthState) {
        let redirect = {
            let mut inner = self.lock();
            let inputs = GuardInputs {
                is_loading: state.is_loading,
                user: state.user.clone(),
                required_role: inner.required_role,
            };
            inner.last_state = Some(state.clone());

            // Same dependencies, same effect: nothing to redo
            if inner.last_inputs.as_ref() == Some(&inputs) {
                return;
            }

            let decision = evaluate(state, inputs.required_role, &self.routes);
            inner.last_inputs = Some(inputs);
            inner.decision = decision.clone();

            match decision {
                GuardDecision::Redirect(destination) => Some(destination),
                _ => None,
            }
        };

        // Navigate outside the lock; the navigator may call back into us
        if let Some(destination) = redirect {
            tracing::debug!(destination = %destination, "Guard redirecting");
            self.navigator.push(&destination);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, GuardInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl AuthObserver for RouteGuard {
    fn on_state_change(&self, state: &AuthState) {
        self.reevaluate(state);
    }
}
