// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Load sample charging stations into the configured database.
//!
//! Reads a JSON file of the form `{ "stations": [ ... ] }` where each entry
//! has the same shape as a create request body.

use anyhow::{bail, Context, Result};
use clap::Parser;
use ev_station_manager::{
    config::{Config, DatabaseBackend},
    db::Database,
    models::StationInput,
    services::{stations, StationRules},
};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "seed", about = "Seed the station collection")]
struct Cli {
    /// Path to the seed file
    #[arg(long, default_value = "data/sample_stations.json")]
    file: PathBuf,

    /// Add to the existing stations instead of replacing them
    #[arg(long)]
    keep_existing: bool,
}

#[derive(Deserialize)]
struct SeedFile {
    stations: Vec<StationInput>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    check_backend(&config)?;

    let raw = std::fs::read_to_string(&cli.file)
        .with_context(|| format!("Failed to read {}", cli.file.display()))?;
    let seed: SeedFile = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {}", cli.file.display()))?;
    tracing::info!(
        file = %cli.file.display(),
        count = seed.stations.len(),
        "Loaded seed file"
    );

    let db = Database::open(&config)
        .await
        .context("Failed to connect to database")?;

    let result = stations::seed(
        &db,
        StationRules::from(&config),
        seed.stations,
        cli.keep_existing,
    )
    .await;
    db.close().await;

    let inserted = result.context("Seeding failed")?;
    println!("Seeded {} stations", inserted);
    Ok(())
}

/// Seeding the in-memory store would be discarded when this process exits.
fn check_backend(config: &Config) -> Result<()> {
    if config.database_backend == DatabaseBackend::Memory {
        bail!(
            "DATABASE_BACKEND=memory is not persistent; seeded stations would be lost \
             when the seed tool exits. Set DATABASE_BACKEND=firestore."
        );
    }
    Ok(())
}
