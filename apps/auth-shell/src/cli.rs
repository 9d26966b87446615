//! Command-line interface.

use std::sync::Arc;

use anyhow::Result;
use auth::{AuthContext, RecordingNavigator, Rendered, RouteGuard, Routes};
use clap::{Parser, Subcommand};
use entities::{LoginCredentials, RegisterData, UserRole};

#[derive(Debug, Parser)]
#[command(name = "auth-shell")]
#[command(author, version, about = "Book Coup session shell", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and remember the session
    Login {
        /// Account email
        email: String,
        /// Account password
        password: String,
    },

    /// Create an account and log in
    Register {
        /// Display name
        #[arg(long)]
        name: String,
        /// Account email
        #[arg(long)]
        email: String,
        /// Password (at least 6 characters)
        #[arg(long)]
        password: String,
        /// Password again
        #[arg(long)]
        confirm_password: String,
        /// Contact phone number
        #[arg(long)]
        phone: Option<String>,
    },

    /// Forget the current session
    Logout,

    /// Print the logged-in user as JSON
    Whoami,

    /// Check whether the current session may open a page
    Visit {
        /// Page path
        path: String,
        /// Role the page requires (admin or user)
        #[arg(long)]
        role: Option<UserRole>,
    },
}

/// Runs one command against an initialized context and returns what to print.
pub async fn execute(command: Command, context: &AuthContext) -> Result<String> {
    match command {
        Command::Login { email, password } => {
            let user = context
                .login(&LoginCredentials::new(email, password))
                .await?;
            Ok(format!("Logged in as {} ({})", user.email, user.role))
        }
        Command::Register {
            name,
            email,
            password,
            confirm_password,
            phone,
        } => {
            let data = RegisterData {
                name,
                email,
                password,
                confirm_password,
                phone,
            };
            let user = context.register(&data).await?;
            Ok(format!("Registered {} with id {}", user.email, user.id))
        }
        Command::Logout => {
            context.logout().await;
            Ok(if context.is_authenticated() {
                "Still logged in".to_string()
            } else {
                "Logged out".to_string()
            })
        }
        Command::Whoami => match context.user() {
            Some(user) => Ok(serde_json::to_string_pretty(&user)?),
            None => Ok("Not logged in".to_string()),
        },
        Command::Visit { path, role } => Ok(visit(context, &path, role)),
    }
}

/// Runs the route guard for `path` and describes the outcome.
pub fn visit(context: &AuthContext, path: &str, role: Option<UserRole>) -> String {
    let navigator = Arc::new(RecordingNavigator::new());
    let guard = RouteGuard::mount(context, navigator.clone(), Routes::default(), role);

    let outcome = match guard.render(path) {
        Rendered::Content(page) => format!("Showing {page}"),
        Rendered::Placeholder => "Loading...".to_string(),
        Rendered::Nothing => match navigator.last() {
            Some(destination) => format!("Redirected from {path} to {destination}"),
            None => format!("Access to {path} denied"),
        },
    };

    context.unobserve(&guard);
    outcome
}
