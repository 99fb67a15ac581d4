//! # confession-wall
//!
//! Serves the confession wall on localhost.
//!
//! `confession-wall hash-password <password>` prints a PHC string for the
//! `admin.password_hash` setting instead of starting the server.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::{build_router, AppState};
use auth_adapters::Argon2AuthProvider;
use clap::{Parser, Subcommand};
use configs::AppConfig;
use domains::SystemClock;
use services::{Wall, WallSettings};
use storage_adapters::{FileKeyValueStore, LocalMediaStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "confession-wall")]
#[command(about = "A local confession wall with an admin dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the wall (the default)
    Serve,

    /// Print an argon2 PHC string for `admin.password_hash`
    HashPassword {
        /// Admin password to hash
        password: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    match Cli::parse().command.unwrap_or(Command::Serve) {
        Command::Serve => serve().await,
        Command::HashPassword { password } => {
            let hash = auth_adapters::hash_password(&password)
                .map_err(|e| anyhow::anyhow!("failed to hash password: {e}"))?;
            println!("{hash}");
            Ok(())
        }
    }
}

async fn serve() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Tracing (respects RUST_LOG)
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,confession_wall=debug")),
        )
        .init();

    info!("Starting confession wall v{}", env!("CARGO_PKG_VERSION"));

    // -----------------------------------------------------------------------
    // 2. Configuration
    // -----------------------------------------------------------------------
    let config = AppConfig::load().context("failed to load configuration")?;
    info!(
        addr = %config.bind_addr(),
        data_dir = %config.storage.data_dir.display(),
        upload_dir = %config.storage.upload_dir.display(),
        admin_enabled = config.admin.password_hash.is_some(),
        "Loaded configuration"
    );

    // -----------------------------------------------------------------------
    // 3. Adapters and the wall
    // -----------------------------------------------------------------------
    let kv = FileKeyValueStore::open(&config.storage.data_dir)
        .context("failed to open the data directory")?
        .with_quota(config.storage.quota_bytes);
    let media = LocalMediaStore::new(&config.storage.upload_dir);
    let auth = Argon2AuthProvider::new(config.admin.password_hash.clone());

    let settings = WallSettings {
        max_attachment_bytes: config.attachments.max_bytes,
        history_capacity: config.history.capacity,
        session_ttl_minutes: config.admin.session_ttl_minutes,
    };
    let wall = Wall::open(Arc::new(kv), Arc::new(SystemClock), settings);

    let state = AppState::new(wall, Arc::new(media), Arc::new(auth))
        .with_static_dir(&config.server.static_dir);

    // -----------------------------------------------------------------------
    // 4. Serve until Ctrl+C
    // -----------------------------------------------------------------------
    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr()))?;
    info!("Confession wall listening on http://{}", listener.local_addr()?);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Received Ctrl+C, shutting down");
        })
        .await
        .context("HTTP server failed")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_serves() {
        let cli = Cli::try_parse_from(["confession-wall"]).unwrap();
        assert!(cli.command.is_none());
        let cli = Cli::try_parse_from(["confession-wall", "serve"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Serve)));
    }

    #[test]
    fn test_hash_password_takes_one_password() {
        let cli = Cli::try_parse_from(["confession-wall", "hash-password", "letmein"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::HashPassword { ref password }) if password == "letmein"
        ));
        assert!(Cli::try_parse_from(["confession-wall", "hash-password"]).is_err());
    }
}
