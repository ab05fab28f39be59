//! Carlot Web Server
//!
//! Serves the car marketplace in its vulnerable or hardened variant.

use anyhow::Context;
use carlot_core::{init_logging, load_config, Variant};
use carlot_web::server::CarlotServerBuilder;
use clap::Parser;
use std::path::PathBuf;

/// Carlot - a car marketplace for web security training
#[derive(Parser, Debug)]
#[command(name = "carlot-web")]
#[command(about = "Car marketplace served in a vulnerable or hardened variant")]
#[command(version)]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Variant to serve (vulnerable, hardened)
    #[arg(long)]
    variant: Option<Variant>,

    /// Server host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Server port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// SQLite database file
    #[arg(long)]
    database: Option<PathBuf>,

    /// Static files directory
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load environment variables
    dotenvy::dotenv().ok();

    let mut market = load_config(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(level) = args.log_level {
        market.logging.level = level;
    }

    init_logging(&market.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    // Override with command line arguments
    let mut builder = CarlotServerBuilder::from_market(market);
    if let Some(variant) = args.variant {
        builder = builder.variant(variant);
    }
    if let Some(host) = args.host {
        builder = builder.host(host);
    }
    if let Some(port) = args.port {
        builder = builder.port(port);
    }
    if let Some(database) = args.database {
        builder = builder.database_path(database);
    }
    if let Some(static_dir) = args.static_dir {
        builder = builder.static_dir(static_dir);
    }

    let server = builder.build().await.context("Failed to build server")?;

    server.start().await?;
    Ok(())
}
