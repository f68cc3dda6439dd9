//! Jaipur random-play simulator.
//!
//! Plays a batch of games between two random legal-action pickers and prints
//! the aggregate results as JSON.

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod runner;

use config::SimConfig;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = SimConfig::from_env()?;
    info!(
        games = config.games,
        seed = config.seed,
        jade = config.params.use_jade_cards,
        "Starting Jaipur simulation..."
    );

    let stats = runner::run(&config)?;
    println!("{}", serde_json::to_string_pretty(&stats.to_json())?);

    Ok(())
}
