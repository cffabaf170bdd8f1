//! Demo data generation for Happy Happenings.
//!
//! This crate fills a development database with a believable marketplace:
//! vendor catalogs with service menus, customer accounts, events of every
//! type, category-aware bookings, reviews, and review-based vendor ratings.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use demo_data::prelude::*;
//!
//! let result = ScenarioBuilder::demo()
//!     .with_customers(40)
//!     .build(&pool, &mut rng)
//!     .await?;
//! ```
//!
//! Seeding is incremental: every phase checks what is already stored and only
//! creates what is missing, so the seed binary can be run repeatedly.

pub mod builders;
pub mod config;
pub mod db;
pub mod generators;
pub mod sampling;

// Re-export core types from the happenings crate
pub use happenings::models::{BookingStatus, Event, EventType, UserRole, VendorCategory};

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::builders::{ScenarioBuilder, ScenarioMetrics, ScenarioResult};
    pub use crate::config::SeedConfig;
    pub use crate::db::{SeedError, Seeder, Table};
    pub use crate::generators::{
        BookingGenerator, EventGenerator, ReviewGenerator, UserGenerator, VendorGenerator,
        recompute_vendor_ratings,
    };
    pub use crate::sampling::WeightedTable;
    pub use crate::{BookingStatus, Event, EventType, UserRole, VendorCategory};
}
