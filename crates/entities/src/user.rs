//! User-related entity definitions.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix for generated user identifiers.
pub const USER_ID_PREFIX: &str = "user-";

/// Role-based access control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Library administrator.
    Admin,
    /// Regular library member.
    #[default]
    User,
}

impl UserRole {
    /// Checks if this role has admin privileges.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Returns the lowercase name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Account status. Carried on the record but not enforced by authentication.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Account in good standing.
    #[default]
    Active,
    /// Account suspended by an administrator.
    Suspended,
}

/// A library user.
///
/// The serialized form is also the persisted session blob, so field names
/// follow the camelCase layout (`joinDate`, `borrowedBooks`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique, stable identifier.
    pub id: String,
    /// Email address, used as the login key.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Access role.
    pub role: UserRole,
    /// Contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Date the account was created.
    pub join_date: NaiveDate,
    /// Account status.
    pub status: UserStatus,
    /// Identifiers of books currently on loan.
    #[serde(default)]
    pub borrowed_books: Vec<String>,
}

impl User {
    /// Creates a new active user with a freshly generated identifier.
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: generate_user_id(),
            email: email.into(),
            name: name.into(),
            role: UserRole::default(),
            phone: None,
            join_date: Utc::now().date_naive(),
            status: UserStatus::default(),
            borrowed_books: Vec::new(),
        }
    }

    /// Sets the phone number.
    pub fn with_phone(mut self, phone: Option<String>) -> Self {
        self.phone = phone;
        self
    }

    /// Sets the role.
    pub fn with_role(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }

    /// Checks if the user can perform admin actions.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Generates a collision-safe user identifier.
pub fn generate_user_id() -> String {
    format!("{USER_ID_PREFIX}{}", Uuid::new_v4())
}
