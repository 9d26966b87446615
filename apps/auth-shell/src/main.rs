//! Book Coup auth shell binary.

use auth_shell::{
    ConsoleNotifier,
    cli::{self, Cli},
    config::Config,
    create_context, init_tracing,
};
use clap::Parser;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    let args = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    tracing::debug!(storage = %config.storage_path.display(), "Starting auth shell");

    let context = create_context(&config, Arc::new(ConsoleNotifier));
    context.initialize().await;

    let output = cli::execute(args.command, &context).await?;
    println!("{output}");

    Ok(())
}
