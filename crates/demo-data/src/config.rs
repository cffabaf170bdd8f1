//! Configuration types for demo data seeding.

use std::collections::HashMap;

use happenings::models::EventType;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Environment variable {0} is not set")]
    Missing(&'static str),
    #[error("Environment variable {name} has invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Configuration for a seeding run.
///
/// Every threshold is checked against current row counts so a run can be
/// repeated without duplicating data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// The vendor catalog is generated only while fewer vendors than this exist.
    pub vendor_threshold: i64,

    /// Vendors created per category when the catalog is generated.
    pub vendors_per_category: usize,

    /// Target number of customer accounts.
    pub customer_count: usize,

    /// Minimum number of stored events for every event type.
    pub min_events_per_type: usize,

    /// Bookings are generated only while fewer bookings than this exist.
    pub booking_threshold: i64,

    /// Rows per progress report during inserts.
    pub batch_size: usize,

    /// Seed for the random number generator; entropy when absent.
    pub rng_seed: Option<u64>,

    /// Apply schema migrations before seeding.
    pub run_migrations: bool,

    /// Delete all existing rows before seeding.
    pub reset: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            vendor_threshold: 20,
            vendors_per_category: 3,
            customer_count: 40,
            min_events_per_type: 20,
            booking_threshold: 100,
            batch_size: 50,
            rng_seed: None,
            run_migrations: true,
            reset: false,
        }
    }
}

impl SeedConfig {
    /// Reads overrides from the environment on top of the defaults.
    ///
    /// Recognised variables: `SEED_RNG_SEED`, `SEED_RESET`, `SEED_SKIP_MIGRATIONS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup("SEED_RNG_SEED") {
            config.rng_seed = Some(value.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "SEED_RNG_SEED",
                value: value.clone(),
            })?);
        }
        if let Some(value) = lookup("SEED_RESET") {
            config.reset = parse_flag("SEED_RESET", &value)?;
        }
        if let Some(value) = lookup("SEED_SKIP_MIGRATIONS") {
            config.run_migrations = !parse_flag("SEED_SKIP_MIGRATIONS", &value)?;
        }

        Ok(config)
    }

    /// Whether the vendor catalog still needs to be generated.
    pub fn needs_vendor_catalog(&self, existing_vendors: i64) -> bool {
        existing_vendors < self.vendor_threshold
    }

    /// Number of customer accounts missing to reach the target.
    pub fn customer_shortfall(&self, existing_customers: i64) -> usize {
        let existing = usize::try_from(existing_customers).unwrap_or(0);
        self.customer_count.saturating_sub(existing)
    }

    /// Events missing per type to reach the per-type minimum, in [`EventType::ALL`] order.
    pub fn event_shortfall(&self, existing: &HashMap<EventType, i64>) -> Vec<(EventType, usize)> {
        EventType::ALL
            .iter()
            .filter_map(|t| {
                let have = existing
                    .get(t)
                    .map(|&c| usize::try_from(c).unwrap_or(0))
                    .unwrap_or(0);
                let missing = self.min_events_per_type.saturating_sub(have);
                (missing > 0).then_some((*t, missing))
            })
            .collect()
    }

    /// Whether bookings (and their reviews) still need to be generated.
    pub fn needs_bookings(&self, existing_bookings: i64) -> bool {
        existing_bookings < self.booking_threshold
    }
}

/// Reads the database connection string from `DATABASE_URL`.
pub fn database_url_from_env() -> Result<String, ConfigError> {
    std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" | "" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
        }),
    }
}
