//! Seed script - tops up the database with demo marketplace data
//!
//! Run with:
//! ```
//! DATABASE_URL=postgres://... cargo run -p demo-data --bin seed
//! ```
//!
//! Optional environment: `SEED_RNG_SEED`, `SEED_RESET`, `SEED_SKIP_MIGRATIONS`.

use demo_data::builders::ScenarioBuilder;
use demo_data::config::{SeedConfig, database_url_from_env};
use rand::SeedableRng;
use rand::rngs::StdRng;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!("Seeding failed: {e:#}");
        std::process::exit(1);
    }

    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let database_url = database_url_from_env()?;
    let config = SeedConfig::from_env()?;
    tracing::debug!("Seed config: {}", serde_json::to_string(&config)?);

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    let mut rng = match config.rng_seed {
        Some(seed) => {
            tracing::info!("Using RNG seed {seed}");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let result = ScenarioBuilder::from_config(config)
        .with_metrics(true)
        .build(&pool, &mut rng)
        .await?;

    // Summary output
    tracing::info!("Seed completed!");
    tracing::info!("  Users: {}", result.users.len());
    tracing::info!("  Vendors: {}", result.vendors.len());
    tracing::info!("  Services: {}", result.services.len());
    tracing::info!("  Events: {}", result.events.len());
    tracing::info!("  Bookings: {}", result.bookings.len());
    tracing::info!("  Reviews: {}", result.reviews.len());
    tracing::info!("  Vendors rated: {}", result.vendor_ratings.len());
    if let Some(metrics) = &result.metrics {
        tracing::info!("  Took {} ms", metrics.seeding_time_ms);
    }

    Ok(())
}
