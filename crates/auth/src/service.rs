//! Session service backed by the in-memory directory.
//!
//! Stands in for a real authentication backend: credentials are checked
//! against a single shared password and every call sleeps to mimic network
//! latency. The service also owns the persisted session blob.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use entities::{NewUserProfile, User};
use local_storage::{keys, LocalStorage};

use crate::{AuthError, AuthResult, UserDirectory};

/// Password accepted for every account.
pub const MOCK_PASSWORD: &str = "password123";

/// Default simulated latency for login and registration in milliseconds.
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 1000;

/// Default simulated latency for logout in milliseconds.
pub const DEFAULT_LOGOUT_DELAY_MS: u64 = 500;

/// Trait for the authentication backend.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials and returns the matching user.
    async fn login(&self, email: &str, password: &str) -> AuthResult<User>;

    /// Creates a new account.
    async fn register(&self, profile: NewUserProfile) -> AuthResult<User>;

    /// Ends the backend session. Does not touch the persisted blob.
    async fn logout(&self) -> AuthResult<()>;

    /// Reads the persisted session.
    ///
    /// Returns `None` if nothing is stored or the stored value does not
    /// decode. The user is not re-checked against the directory.
    async fn current_user(&self) -> AuthResult<Option<User>>;

    /// Persists the session for `user`.
    async fn save_current_user(&self, user: &User) -> AuthResult<()>;

    /// Removes the persisted session.
    async fn clear_current_user(&self) -> AuthResult<()>;
}

/// Simulated latency configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Delay before a login resolves.
    pub login_delay: Duration,
    /// Delay before a registration resolves.
    pub register_delay: Duration,
    /// Delay before a logout resolves.
    pub logout_delay: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            login_delay: Duration::from_millis(DEFAULT_REQUEST_DELAY_MS),
            register_delay: Duration::from_millis(DEFAULT_REQUEST_DELAY_MS),
            logout_delay: Duration::from_millis(DEFAULT_LOGOUT_DELAY_MS),
        }
    }
}

impl ServiceConfig {
    /// Configuration with all delays disabled.
    pub fn instant() -> Self {
        Self {
            login_delay: Duration::ZERO,
            register_delay: Duration::ZERO,
            logout_delay: Duration::ZERO,
        }
    }

    /// Sets the login delay.
    pub fn with_login_delay(mut self, delay: Duration) -> Self {
        self.login_delay = delay;
        self
    }

    /// Sets the registration delay.
    pub fn with_register_delay(mut self, delay: Duration) -> Self {
        self.register_delay = delay;
        self
    }

    /// Sets the logout delay.
    pub fn with_logout_delay(mut self, delay: Duration) -> Self {
        self.logout_delay = delay;
        self
    }
}

/// Mock backend over a [`UserDirectory`] and a [`LocalStorage`] area.
#[derive(Clone)]
pub struct MockAuthService {
    directory: Arc<dyn UserDirectory>,
    storage: Arc<dyn LocalStorage>,
    config: ServiceConfig,
}

impl std::fmt::Debug for MockAuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockAuthService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl MockAuthService {
    /// Creates a service with the default latency.
    pub fn new(directory: Arc<dyn UserDirectory>, storage: Arc<dyn LocalStorage>) -> Self {
        Self {
            directory,
            storage,
            config: ServiceConfig::default(),
        }
    }

    /// Sets the latency configuration.
    pub fn with_config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the directory this service reads and appends to.
    pub fn directory(&self) -> &Arc<dyn UserDirectory> {
        &self.directory
    }
}

async fn simulate_delay(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[async_trait]
impl AuthService for MockAuthService {
    async fn login(&self, email: &str, password: &str) -> AuthResult<User> {
        simulate_delay(self.config.login_delay).await;

        let user = self
            .directory
            .find_by_email(email)
            .await?
            .ok_or(AuthError::NotFound)?;

        if password != MOCK_PASSWORD {
            return Err(AuthError::InvalidCredentials);
        }

        tracing::debug!(user_id = %user.id, "Credentials accepted");
        Ok(user)
    }

    async fn register(&self, profile: NewUserProfile) -> AuthResult<User> {
        simulate_delay(self.config.register_delay).await;

        if self.directory.find_by_email(&profile.email).await?.is_some() {
            return Err(AuthError::AlreadyExists);
        }

        let user = User::new(profile.email, profile.name).with_phone(profile.phone);
        self.directory.append(user.clone()).await?;

        tracing::info!(user_id = %user.id, email = %user.email, "Registered new user");
        Ok(user)
    }

    async fn logout(&self) -> AuthResult<()> {
        simulate_delay(self.config.logout_delay).await;
        Ok(())
    }

    async fn current_user(&self) -> AuthResult<Option<User>> {
        let Some(blob) = self.storage.get_item(keys::CURRENT_USER)? else {
            return Ok(None);
        };

        match serde_json::from_str(&blob) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring undecodable persisted session");
                Ok(None)
            }
        }
    }

    async fn save_current_user(&self, user: &User) -> AuthResult<()> {
        let blob = serde_json::to_string(user)?;
        self.storage.set_item(keys::CURRENT_USER, &blob)?;
        Ok(())
    }

    async fn clear_current_user(&self) -> AuthResult<()> {
        self.storage.remove_item(keys::CURRENT_USER)?;
        Ok(())
    }
}
