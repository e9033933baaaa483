use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;
use tokio::net::TcpListener;

use evander_voxel::net::relay::run_relay;

#[derive(Parser, Debug)]
#[command(name = "relay", about = "Forwards block edits between Evander Voxel clients")]
struct Args {
    #[arg(long, default_value = "0.0.0.0:8080")]
    bind: String,
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level: LevelFilter = args
        .log_level
        .parse()
        .map_err(|_| anyhow!("Invalid log level {:?}", args.log_level))?;
    SimpleLogger::new().with_level(level).env().init()?;

    let listener = TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("Failed to bind relay to {}", args.bind))?;

    tokio::select! {
        result = run_relay(listener) => result.context("Relay stopped")?,
        _ = tokio::signal::ctrl_c() => info!("Shutting down relay"),
    }
    Ok(())
}
