//! Secure Media Server
//!
//! Serves a media directory over HTTP, enforcing path-prefix access policies.

use clap::Parser;
use secure_media::{
    auth::create_authenticator,
    autodiscover,
    config::{LogFormat, load_config},
    discovery::discovered_policies,
    gate::Gate,
    server::{MediaState, run_server},
    set_default_registry,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Secure Media Server - private media files behind path-prefix policies
#[derive(Parser, Debug)]
#[command(name = "secure-media")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "SECURE_MEDIA_CONFIG")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "SECURE_MEDIA_LOG_LEVEL")]
    log_level: Option<String>,

    /// HTTP server host
    #[arg(long)]
    host: Option<String>,

    /// HTTP server port
    #[arg(long)]
    port: Option<u16>,

    /// Directory holding the media tree
    #[arg(long)]
    media_root: Option<PathBuf>,

    /// Print the registered policies in match order and exit
    #[arg(long)]
    list_policies: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;

    // Initialize logging
    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

    match config.logging.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init(),
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting secure media server"
    );

    // CLI flags override file and environment
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(media_root) = args.media_root {
        config.server.media_root = media_root;
    }

    // Configured policies go first, discovered ones after them
    let registry = Arc::new(config.build_registry());
    set_default_registry(registry.clone())
        .inspect_err(|e| error!(error = %e, "Failed to install policy registry"))?;
    let discovered = autodiscover();

    info!(
        configured = config.policies.len(),
        discovered,
        default_allow = registry.default_allow(),
        "Policy registry ready"
    );

    if args.list_policies {
        for (index, policy) in registry.policies().iter().enumerate() {
            println!(
                "{:>3}  {:<24} {}",
                index + 1,
                policy.name().unwrap_or("-"),
                policy.restricted_prefixes().join(", ")
            );
        }
        println!(
            "unmatched paths: {}",
            if registry.default_allow() { "allow" } else { "deny" }
        );
        if !discovered_policies().is_empty() {
            println!("discovered: {}", discovered_policies().join(", "));
        }
        return Ok(());
    }

    let auth = create_authenticator(&config.auth);
    info!(auth = auth.auth_type(), "Authentication configured");

    let state = MediaState::new(Gate::new(Some(registry)), auth);
    run_server(&config.server, state)
        .await
        .inspect_err(|e| error!(error = %e, "Media server error"))?;

    Ok(())
}
