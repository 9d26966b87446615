//! Client-side authentication for Book Coup.
//!
//! This crate provides:
//! - A user directory and a mock backend that checks credentials against it
//! - The auth context, which tracks the session and persists it locally
//! - A route guard that redirects visitors lacking a session or role

mod context;
mod directory;
mod error;
mod guard;
mod navigation;
mod notify;
mod service;

pub use context::*;
pub use directory::*;
pub use error::*;
pub use guard::*;
pub use navigation::*;
pub use notify::*;
pub use service::*;
