//! User directory
//!
//! The directory is the backing list of known accounts. It is owned by the
//! application and handed to the session service at construction.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::NaiveDate;
use entities::{User, UserRole, UserStatus};

use crate::{AuthError, AuthResult};

/// Trait for user directory access
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Look up a user by exact email
    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>>;

    /// Append a user
    ///
    /// No uniqueness check is performed here; callers must check the email
    /// first.
    async fn append(&self, user: User) -> AuthResult<()>;

    /// Number of users in the directory
    async fn len(&self) -> AuthResult<usize>;

    /// Snapshot of all users in insertion order
    async fn list(&self) -> AuthResult<Vec<User>>;
}

/// In-memory user directory
#[derive(Debug, Default)]
pub struct MemoryUserDirectory {
    users: RwLock<Vec<User>>,
}

impl MemoryUserDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory holding the given users
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: RwLock::new(users),
        }
    }

    /// Create a directory holding the demo accounts
    pub fn seeded() -> Self {
        Self::with_users(seed_users())
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> AuthError {
    AuthError::Other(format!("Lock poisoned: {}", e))
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn append(&self, user: User) -> AuthResult<()> {
        let mut users = self.users.write().map_err(poisoned)?;
        users.push(user);
        Ok(())
    }

    async fn len(&self) -> AuthResult<usize> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.len())
    }

    async fn list(&self) -> AuthResult<Vec<User>> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.clone())
    }
}

/// The demo accounts every fresh directory starts with.
pub fn seed_users() -> Vec<User> {
    vec![
        seed_user(
            "admin-001",
            "admin@bookcoup.com",
            "Admin User",
            UserRole::Admin,
            "+1234567890",
            (2023, 1, 1),
            &[],
        ),
        seed_user(
            "user-001",
            "john.doe@email.com",
            "John Doe",
            UserRole::User,
            "+1234567891",
            (2023, 6, 15),
            &["HP-JAN-15-2023-FIC-00002"],
        ),
        seed_user(
            "user-002",
            "jane.smith@email.com",
            "Jane Smith",
            UserRole::User,
            "+1234567892",
            (2023, 8, 20),
            &[],
        ),
    ]
}

fn seed_user(
    id: &str,
    email: &str,
    name: &str,
    role: UserRole,
    phone: &str,
    (year, month, day): (i32, u32, u32),
    borrowed_books: &[&str],
) -> User {
    User {
        id: id.to_string(),
        email: email.to_string(),
        name: name.to_string(),
        role,
        phone: Some(phone.to_string()),
        join_date: NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default(),
        status: UserStatus::Active,
        borrowed_books: borrowed_books.iter().map(|b| b.to_string()).collect(),
    }
}
