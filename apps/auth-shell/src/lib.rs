//! Book Coup auth shell
//!
//! Wires the authentication core to a file-backed storage area so a session
//! survives between invocations, the way a browser tab resumes one across
//! page loads.

pub mod cli;
pub mod config;

use std::sync::Arc;

use auth::{
    AuthContext, MemoryUserDirectory, MockAuthService, Notification, NotificationKind, Notifier,
};
use local_storage::FileStorage;

use crate::config::Config;

/// Notifier that prints notifications to the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => {
                println!("{}: {}", notification.title, notification.description)
            }
            NotificationKind::Error => {
                eprintln!("{}: {}", notification.title, notification.description)
            }
        }
    }
}

/// Creates an auth context over a seeded directory and the configured
/// storage file. The context still has to be initialized.
pub fn create_context(config: &Config, notifier: Arc<dyn Notifier>) -> Arc<AuthContext> {
    let directory = Arc::new(MemoryUserDirectory::seeded());
    let storage = Arc::new(FileStorage::new(&config.storage_path));
    let service = MockAuthService::new(directory, storage).with_config(config.service_config());

    Arc::new(AuthContext::new(Arc::new(service), notifier))
}

/// Initializes tracing with the given log level.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
