//! Domain types and database schema for Happy Happenings, a marketplace where
//! customers plan events and book vendors for them.

pub mod auth;
pub mod errors;
pub mod models;

use sqlx::PgPool;
use sqlx::migrate::{MigrateError, Migrator};
use tracing::info;

/// Embedded schema migrations for users, vendors, services, events, bookings and reviews.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Applies any pending schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    info!("Applying database migrations");
    MIGRATOR.run(pool).await
}
