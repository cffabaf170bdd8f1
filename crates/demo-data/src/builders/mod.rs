//! Fluent builder APIs for demo scenarios.
//!
//! The [`ScenarioBuilder`] generates a complete marketplace of accounts,
//! vendors, events, bookings, and reviews, either in memory or seeded into
//! the database.

mod scenario;

pub use scenario::{ScenarioBuilder, ScenarioMetrics, ScenarioResult};
