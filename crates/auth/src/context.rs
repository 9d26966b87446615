//! Auth context: the session state holder shared by the UI.
//!
//! The context starts out initializing, resolves once from the persisted
//! session and then moves between authenticated and anonymous as the user
//! logs in, registers and logs out. Every transition is published to a
//! `watch` channel and to synchronously re-run observers such as
//! [`RouteGuard`](crate::RouteGuard).
//!
//! Calls are not serialized against each other. Two logins in flight race on
//! the loading flag and the last one to finish wins.

use std::sync::{Arc, RwLock};

use entities::{AuthState, LoginCredentials, RegisterData, User};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::{AuthError, AuthResult, AuthService, Notification, Notifier};

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Something that reacts to session state transitions.
pub trait AuthObserver: Send + Sync {
    /// Called after every transition with the new state.
    fn on_state_change(&self, state: &AuthState);
}

/// Validates registration input before anything reaches the backend.
pub fn validate_registration(data: &RegisterData) -> AuthResult<()> {
    if !data.passwords_match() {
        return Err(AuthError::PasswordMismatch);
    }
    if data.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::PasswordTooShort);
    }
    Ok(())
}

/// Session state coordinator.
pub struct AuthContext {
    service: Arc<dyn AuthService>,
    notifier: Arc<dyn Notifier>,
    state: watch::Sender<AuthState>,
    observers: RwLock<Vec<Arc<dyn AuthObserver>>>,
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl AuthContext {
    /// Creates a context in the initializing state.
    ///
    /// Call [`initialize`](Self::initialize) or
    /// [`spawn_initialize`](Self::spawn_initialize) to resolve the persisted
    /// session.
    pub fn new(service: Arc<dyn AuthService>, notifier: Arc<dyn Notifier>) -> Self {
        let (state, _) = watch::channel(AuthState::initializing());
        Self {
            service,
            notifier,
            state,
            observers: RwLock::new(Vec::new()),
        }
    }

    /// Returns a snapshot of the current state.
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Returns the logged-in user, if any.
    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    /// Returns true while the session is resolving or a call is in flight.
    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    /// Returns true if a user is logged in.
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Registers an observer and runs it once with the current state.
    pub fn observe(&self, observer: Arc<dyn AuthObserver>) {
        self.observers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(Arc::clone(&observer));
        observer.on_state_change(&self.state());
    }

    /// Removes a previously registered observer.
    pub fn unobserve<O: AuthObserver + 'static>(&self, observer: &Arc<O>) {
        let target = Arc::as_ptr(observer) as *const ();
        self.observers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|o| Arc::as_ptr(o) as *const () != target);
    }

    /// Resolves the persisted session.
    ///
    /// Never fails: any error while reading the session leaves the context
    /// anonymous.
    pub async fn initialize(&self) {
        let state = match self.service.current_user().await {
            Ok(Some(user)) => {
                tracing::info!(user_id = %user.id, "Resumed persisted session");
                AuthState::authenticated(user)
            }
            Ok(None) => AuthState::anonymous(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to resolve persisted session");
                AuthState::anonymous()
            }
        };
        self.set_state(state);
    }

    /// Runs [`initialize`](Self::initialize) on the tokio runtime.
    pub fn spawn_initialize(self: &Arc<Self>) -> JoinHandle<()> {
        let context = Arc::clone(self);
        tokio::spawn(async move { context.initialize().await })
    }

    /// Logs in and persists the session.
    ///
    /// On failure the loading flag is cleared, the previous user (if any) is
    /// kept and the error is returned to the caller.
    pub async fn login(&self, credentials: &LoginCredentials) -> AuthResult<User> {
        self.set_loading(true);

        match self.try_login(credentials).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, role = %user.role, "Logged in");
                self.set_state(AuthState::authenticated(user.clone()));
                self.notifier.notify(Notification::success(
                    "Login Successful",
                    format!("Welcome back, {}!", user.name),
                ));
                Ok(user)
            }
            Err(e) => {
                tracing::warn!(email = %credentials.email, error = %e, "Login failed");
                self.set_loading(false);
                self.notifier
                    .notify(Notification::error("Login Failed", e.to_string()));
                Err(e)
            }
        }
    }

    /// Validates the input, registers a new account and persists the session.
    ///
    /// Validation failures are reported before the backend is contacted.
    pub async fn register(&self, data: &RegisterData) -> AuthResult<User> {
        self.set_loading(true);

        match self.try_register(data).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "Registered and logged in");
                self.set_state(AuthState::authenticated(user.clone()));
                self.notifier.notify(Notification::success(
                    "Registration Successful",
                    format!("Welcome to Book Coup, {}!", user.name),
                ));
                Ok(user)
            }
            Err(e) => {
                tracing::warn!(email = %data.email, error = %e, "Registration failed");
                self.set_loading(false);
                self.notifier
                    .notify(Notification::error("Registration Failed", e.to_string()));
                Err(e)
            }
        }
    }

    /// Logs out and clears the persisted session.
    ///
    /// Failures are reported through the notifier only. If the backend call
    /// fails the current state is left as it was.
    pub async fn logout(&self) {
        match self.try_logout().await {
            Ok(()) => {
                tracing::info!("Logged out");
                self.set_state(AuthState::anonymous());
                self.notifier.notify(Notification::success(
                    "Logged Out",
                    "You have been successfully logged out.",
                ));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Logout failed");
                self.notifier.notify(Notification::error(
                    "Logout Error",
                    "An error occurred while logging out.",
                ));
            }
        }
    }

    async fn try_login(&self, credentials: &LoginCredentials) -> AuthResult<User> {
        let user = self
            .service
            .login(&credentials.email, &credentials.password)
            .await?;
        self.service.save_current_user(&user).await?;
        Ok(user)
    }

    async fn try_register(&self, data: &RegisterData) -> AuthResult<User> {
        validate_registration(data)?;
        let user = self.service.register(data.clone().into_profile()).await?;
        self.service.save_current_user(&user).await?;
        Ok(user)
    }

    async fn try_logout(&self) -> AuthResult<()> {
        self.service.logout().await?;
        self.service.clear_current_user().await
    }

    fn set_loading(&self, is_loading: bool) {
        let state = self.state.borrow().with_loading(is_loading);
        self.set_state(state);
    }

    fn set_state(&self, state: AuthState) {
        self.state.send_replace(state.clone());

        // Snapshot so observers may register further observers
        let observers = self
            .observers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        for observer in observers {
            observer.on_state_change(&state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        MemoryUserDirectory, MockAuthService, NotificationKind, RecordingNotifier, ServiceConfig,
        UserDirectory, MOCK_PASSWORD,
    };
    use async_trait::async_trait;
    use entities::NewUserProfile;
    use local_storage::{keys, LocalStorage, MemoryStorage};
    use std::sync::Mutex;

    struct Fixture {
        context: Arc<AuthContext>,
        directory: Arc<MemoryUserDirectory>,
        storage: Arc<MemoryStorage>,
        notifier: Arc<RecordingNotifier>,
    }

    fn fixture_with_storage(storage: Arc<MemoryStorage>) -> Fixture {
        let directory = Arc::new(MemoryUserDirectory::seeded());
        let service = MockAuthService::new(directory.clone(), storage.clone())
            .with_config(ServiceConfig::instant());
        let notifier = Arc::new(RecordingNotifier::new());
        let context = Arc::new(AuthContext::new(Arc::new(service), notifier.clone()));
        Fixture {
            context,
            directory,
            storage,
            notifier,
        }
    }

    async fn fixture() -> Fixture {
        let fixture = fixture_with_storage(Arc::new(MemoryStorage::new()));
        fixture.context.initialize().await;
        fixture
    }

    #[derive(Default)]
    struct StateLog(Mutex<Vec<AuthState>>);

    impl AuthObserver for StateLog {
        fn on_state_change(&self, state: &AuthState) {
            self.0.lock().unwrap().push(state.clone());
        }
    }

    /// Backend whose logout always fails.
    struct BrokenLogout(MockAuthService);

    #[async_trait]
    impl AuthService for BrokenLogout {
        async fn login(&self, email: &str, password: &str) -> AuthResult<User> {
            self.0.login(email, password).await
        }
        async fn register(&self, profile: NewUserProfile) -> AuthResult<User> {
            self.0.register(profile).await
        }
        async fn logout(&self) -> AuthResult<()> {
            Err(AuthError::Other("backend unavailable".into()))
        }
        async fn current_user(&self) -> AuthResult<Option<User>> {
            self.0.current_user().await
        }
        async fn save_current_user(&self, user: &User) -> AuthResult<()> {
            self.0.save_current_user(user).await
        }
        async fn clear_current_user(&self) -> AuthResult<()> {
            self.0.clear_current_user().await
        }
    }

    #[tokio::test]
    async fn test_starts_initializing() {
        let fixture = fixture_with_storage(Arc::new(MemoryStorage::new()));
        let state = fixture.context.state();

        assert_eq!(state, AuthState::initializing());
        assert!(fixture.context.is_loading());
        assert!(!fixture.context.is_authenticated());
    }

    #[tokio::test]
    async fn test_initialize_without_session() {
        let fixture = fixture().await;
        assert_eq!(fixture.context.state(), AuthState::anonymous());
    }

    #[tokio::test]
    async fn test_initialize_resumes_session() {
        let storage = Arc::new(MemoryStorage::new());
        let first = fixture_with_storage(storage.clone());
        first.context.initialize().await;
        let user = first
            .context
            .login(&LoginCredentials::new("john.doe@email.com", MOCK_PASSWORD))
            .await
            .unwrap();

        // A new context over the same storage, like a page reload
        let second = fixture_with_storage(storage);
        let handle = second.context.spawn_initialize();
        handle.await.unwrap();

        assert_eq!(second.context.state(), AuthState::authenticated(user));
    }

    #[tokio::test]
    async fn test_initialize_with_corrupt_session() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(keys::CURRENT_USER, "[1, 2").unwrap();

        let fixture = fixture_with_storage(storage);
        fixture.context.initialize().await;

        assert_eq!(fixture.context.state(), AuthState::anonymous());
    }

    #[tokio::test]
    async fn test_login_success() {
        let fixture = fixture().await;

        let user = fixture
            .context
            .login(&LoginCredentials::new("admin@bookcoup.com", MOCK_PASSWORD))
            .await
            .unwrap();

        assert_eq!(user.id, "admin-001");
        assert!(user.is_admin());
        assert_eq!(fixture.context.state(), AuthState::authenticated(user.clone()));

        let blob = fixture.storage.get_item(keys::CURRENT_USER).unwrap().unwrap();
        let persisted: User = serde_json::from_str(&blob).unwrap();
        assert_eq!(persisted.id, user.id);

        assert_eq!(
            fixture.notifier.last(),
            Some(Notification::success(
                "Login Successful",
                "Welcome back, Admin User!"
            ))
        );
    }

    #[tokio::test]
    async fn test_login_failure_reverts_state() {
        let fixture = fixture().await;

        let result = fixture
            .context
            .login(&LoginCredentials::new("admin@bookcoup.com", "nope"))
            .await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
        assert_eq!(fixture.context.state(), AuthState::anonymous());
        assert!(!fixture.storage.contains(keys::CURRENT_USER).unwrap());

        let notification = fixture.notifier.last().unwrap();
        assert_eq!(notification.kind, NotificationKind::Error);
        assert_eq!(notification.title, "Login Failed");
        assert_eq!(notification.description, "Invalid password");
    }

    #[tokio::test]
    async fn test_failed_login_keeps_previous_user() {
        let fixture = fixture().await;
        let john = fixture
            .context
            .login(&LoginCredentials::new("john.doe@email.com", MOCK_PASSWORD))
            .await
            .unwrap();

        let result = fixture
            .context
            .login(&LoginCredentials::new("nobody@example.com", MOCK_PASSWORD))
            .await;

        assert!(matches!(result, Err(AuthError::NotFound)));
        assert_eq!(fixture.context.state(), AuthState::authenticated(john));
    }

    #[tokio::test]
    async fn test_login_transitions_through_loading() {
        let fixture = fixture().await;
        let log = Arc::new(StateLog::default());
        fixture.context.observe(log.clone());

        fixture
            .context
            .login(&LoginCredentials::new("jane.smith@email.com", MOCK_PASSWORD))
            .await
            .unwrap();

        let states = log.0.lock().unwrap().clone();
        assert_eq!(states.len(), 3);
        assert_eq!(states[0], AuthState::anonymous());
        assert_eq!(states[1], AuthState::anonymous().with_loading(true));
        assert!(!states[2].is_loading);
        assert!(states[2].is_authenticated());
    }

    #[tokio::test]
    async fn test_unobserve() {
        let fixture = fixture().await;
        let log = Arc::new(StateLog::default());
        fixture.context.observe(log.clone());
        fixture.context.unobserve(&log);

        fixture.context.logout().await;

        assert_eq!(log.0.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_subscribe_sees_changes() {
        let fixture = fixture().await;
        let mut rx = fixture.context.subscribe();

        fixture
            .context
            .login(&LoginCredentials::new("jane.smith@email.com", MOCK_PASSWORD))
            .await
            .unwrap();

        assert!(rx.has_changed().unwrap());
        let state = rx.borrow_and_update().clone();
        assert_eq!(state.user.unwrap().id, "user-002");
    }

    #[tokio::test]
    async fn test_register_success() {
        let fixture = fixture().await;
        let data = RegisterData::new("Ada", "ada@example.com", "secret1").with_phone("+44");

        let user = fixture.context.register(&data).await.unwrap();

        assert_eq!(user.email, "ada@example.com");
        assert_eq!(fixture.directory.len().await.unwrap(), 4);
        assert_eq!(fixture.context.user().unwrap().id, user.id);

        let service = MockAuthService::new(fixture.directory.clone(), fixture.storage.clone());
        assert_eq!(service.current_user().await.unwrap().unwrap().id, user.id);

        assert_eq!(
            fixture.notifier.last().unwrap().description,
            "Welcome to Book Coup, Ada!"
        );
    }

    #[tokio::test]
    async fn test_register_password_mismatch() {
        let fixture = fixture().await;
        let data = RegisterData::new("Ada", "ada@example.com", "secret1")
            .with_confirm_password("secret2");

        let result = fixture.context.register(&data).await;

        assert!(matches!(result, Err(AuthError::PasswordMismatch)));
        assert_eq!(fixture.directory.len().await.unwrap(), 3);
        assert_eq!(fixture.context.state(), AuthState::anonymous());
        assert_eq!(
            fixture.notifier.last().unwrap().description,
            "Passwords do not match"
        );
    }

    #[tokio::test]
    async fn test_register_password_too_short() {
        let fixture = fixture().await;
        let data = RegisterData::new("Ada", "ada@example.com", "12345");

        let result = fixture.context.register(&data).await;

        assert!(matches!(result, Err(AuthError::PasswordTooShort)));
        assert_eq!(fixture.directory.len().await.unwrap(), 3);
        assert!(!fixture.context.is_loading());
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let fixture = fixture().await;
        let data = RegisterData::new("John Again", "john.doe@email.com", "secret1");

        let result = fixture.context.register(&data).await;

        assert!(matches!(result, Err(AuthError::AlreadyExists)));
        assert_eq!(fixture.directory.len().await.unwrap(), 3);
        assert_eq!(fixture.context.state(), AuthState::anonymous());
    }

    #[test]
    fn test_validate_registration_counts_characters() {
        // Six characters, more than six bytes
        let data = RegisterData::new("Zoë", "zoe@example.com", "ééééé1");
        assert!(validate_registration(&data).is_ok());

        // Mismatch is reported before length
        let data = RegisterData::new("Zoë", "zoe@example.com", "abc").with_confirm_password("abd");
        assert!(matches!(
            validate_registration(&data),
            Err(AuthError::PasswordMismatch)
        ));
    }

    #[tokio::test]
    async fn test_logout() {
        let fixture = fixture().await;
        fixture
            .context
            .login(&LoginCredentials::new("admin@bookcoup.com", MOCK_PASSWORD))
            .await
            .unwrap();

        fixture.context.logout().await;

        assert_eq!(fixture.context.state(), AuthState::anonymous());
        assert!(!fixture.storage.contains(keys::CURRENT_USER).unwrap());
        assert_eq!(fixture.notifier.last().unwrap().title, "Logged Out");
    }

    #[tokio::test]
    async fn test_logout_failure_keeps_session() {
        let directory = Arc::new(MemoryUserDirectory::seeded());
        let storage = Arc::new(MemoryStorage::new());
        let inner = MockAuthService::new(directory, storage.clone())
            .with_config(ServiceConfig::instant());
        let notifier = Arc::new(RecordingNotifier::new());
        let context = AuthContext::new(Arc::new(BrokenLogout(inner)), notifier.clone());
        context.initialize().await;

        let user = context
            .login(&LoginCredentials::new("admin@bookcoup.com", MOCK_PASSWORD))
            .await
            .unwrap();

        context.logout().await;

        assert_eq!(context.state(), AuthState::authenticated(user));
        assert!(storage.contains(keys::CURRENT_USER).unwrap());
        assert_eq!(
            notifier.last(),
            Some(Notification::error(
                "Logout Error",
                "An error occurred while logging out."
            ))
        );
    }
}
