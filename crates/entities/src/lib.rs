//! Core entity definitions for the Book Coup auth shell.
//!
//! This crate defines the data types shared by the authentication core and
//! its consumers: user records, login and registration input, and the
//! observable session state.

mod credentials;
mod session;
mod user;

pub use credentials::*;
pub use session::*;
pub use user::*;
