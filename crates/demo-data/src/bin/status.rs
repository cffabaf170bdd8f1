//! Reports what the demo database currently contains
//!
//! Run with:
//! ```
//! DATABASE_URL=postgres://... cargo run -p demo-data --bin status
//! ```

use demo_data::config::database_url_from_env;
use demo_data::db::Seeder;
use demo_data::{EventType, UserRole};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let database_url = database_url_from_env()?;
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await?;

    let status = Seeder::new(pool).status().await?;

    tracing::info!("Row counts:");
    for (table, count) in &status.row_counts {
        tracing::info!("  {table}: {count}");
    }

    tracing::info!("Users by role:");
    for role in UserRole::ALL {
        let count = status.users_by_role.get(role).copied().unwrap_or(0);
        tracing::info!("  {role}: {count}");
    }

    tracing::info!("Events by type:");
    for event_type in EventType::ALL {
        let count = status.events_by_type.get(event_type).copied().unwrap_or(0);
        tracing::info!("  {event_type}: {count}");
    }

    tracing::info!("Bookings by status:");
    for (booking_status, count) in &status.bookings_by_status {
        tracing::info!("  {booking_status}: {count}");
    }

    if status.vendors_without_services > 0 {
        tracing::warn!(
            "{} vendors have no services and cannot be booked",
            status.vendors_without_services
        );
    }

    Ok(())
}
