//! Authentication error types.

use local_storage::StorageError;
use thiserror::Error;

/// Errors that can occur during authentication operations.
///
/// The display strings double as the user-facing notification text.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No account is registered under the email.
    #[error("User not found")]
    NotFound,

    /// Password did not match.
    #[error("Invalid password")]
    InvalidCredentials,

    /// An account with the email already exists.
    #[error("User already exists")]
    AlreadyExists,

    /// Password and confirmation differ.
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Password is shorter than the minimum length.
    #[error("Password must be at least {} characters", crate::MIN_PASSWORD_LENGTH)]
    PasswordTooShort,

    /// Local storage access failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Persisted session could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl AuthError {
    /// Returns true for failures caused by the submitted input rather than
    /// by the environment.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound
                | Self::InvalidCredentials
                | Self::AlreadyExists
                | Self::PasswordMismatch
                | Self::PasswordTooShort
        )
    }
}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;
