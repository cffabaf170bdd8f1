//! Entity generators for demo data.
//!
//! This module provides generators for creating realistic marketplace entities:
//! - [`UserGenerator`]: Admin, customer, and vendor accounts
//! - [`VendorGenerator`]: Vendor profiles with their service menus
//! - [`EventGenerator`]: Customer events with type-specific budgets
//! - [`BookingGenerator`]: Category-aware vendor bookings for events
//! - [`ReviewGenerator`]: Reviews for confirmed and paid bookings
//!
//! [`recompute_vendor_ratings`] aggregates generated reviews into vendor ratings.

pub mod booking;
pub mod event;
pub mod rating;
pub mod review;
pub mod user;
pub mod vendor;

pub use booking::{
    BookingGenConfig, BookingGenerator, GeneratedBooking, ServiceOffer, VendorOffer,
    apply_discount, preferred_categories,
};
pub use event::{EventGenConfig, EventGenerator, budget_range};
pub use rating::{FALLBACK_VENDOR_RATING, recompute_vendor_ratings};
pub use review::{GeneratedReview, ReviewGenConfig, ReviewGenerator};
pub use user::{GeneratedUser, UserGenConfig, UserGenerator};
pub use vendor::{GeneratedService, GeneratedVendor, VendorGenConfig, VendorGenerator};

use thiserror::Error;

use crate::sampling::SamplingError;

/// Cities used for vendor and event locations.
pub(crate) const LOCATIONS: &[&str] = &[
    "New York, NY",
    "Los Angeles, CA",
    "Chicago, IL",
    "Houston, TX",
    "Phoenix, AZ",
    "Philadelphia, PA",
    "San Antonio, TX",
    "San Diego, CA",
    "Dallas, TX",
    "San Jose, CA",
    "Austin, TX",
    "Jacksonville, FL",
];

/// Rejected generator configuration.
#[derive(Debug, Error)]
pub enum GenConfigError {
    #[error(transparent)]
    Sampling(#[from] SamplingError),
    #[error("Probability {0} is outside 0..=1")]
    Probability(f64),
    #[error("Discount of {0}% is outside 0..=100")]
    DiscountPercent(u8),
    #[error("Rating {0} is outside 1..=5")]
    Rating(i32),
    #[error("Initial rating range {0}..={1} is outside 1..=5")]
    InitialRating(f64, f64),
    #[error("Empty range for {0}")]
    EmptyRange(&'static str),
}

pub(crate) fn check_probability(p: f64) -> Result<f64, GenConfigError> {
    if (0.0..=1.0).contains(&p) {
        Ok(p)
    } else {
        Err(GenConfigError::Probability(p))
    }
}
