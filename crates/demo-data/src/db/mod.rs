//! Database integration for seeding demo data.
//!
//! The [`Seeder`] counts what is already stored, inserts generated rows one
//! transactional phase at a time, and refreshes vendor ratings from reviews.

mod seeder;

pub use seeder::{SeedError, SeedStatus, Seeder, Table};
