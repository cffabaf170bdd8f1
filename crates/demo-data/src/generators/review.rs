//! Review generation for committed bookings.

use std::collections::HashMap;

use rand::Rng;
use rand::seq::SliceRandom;
use time::{Duration, OffsetDateTime};
use tracing::warn;
use uuid::Uuid;

use super::{GenConfigError, GeneratedBooking, check_probability};
use crate::sampling::WeightedTable;

/// Generated review ready for database insertion.
#[derive(Debug, Clone)]
pub struct GeneratedReview {
    pub id: Uuid,
    pub user_id: Uuid,
    pub vendor_id: Uuid,
    pub event_id: Uuid,
    pub rating: i32,
    pub review_text: String,
    pub created_at: OffsetDateTime,
}

/// Configuration for review generation.
#[derive(Debug, Clone)]
pub struct ReviewGenConfig {
    /// Probability that a confirmed or paid booking gets a review.
    pub review_probability: f64,
    /// Relative weights of star ratings.
    pub rating_weights: Vec<(i32, f64)>,
    /// Reviews are backdated by 1 to this many days.
    pub max_age_days: i64,
}

impl Default for ReviewGenConfig {
    fn default() -> Self {
        Self {
            review_probability: 0.8,
            // Mostly positive, skewed toward five stars
            rating_weights: vec![(3, 0.2), (4, 0.3), (5, 0.5)],
            max_age_days: 60,
        }
    }
}

/// Generates customer reviews of booked vendors.
pub struct ReviewGenerator {
    config: ReviewGenConfig,
    ratings: WeightedTable<i32>,
    templates: Vec<String>,
}

impl ReviewGenerator {
    /// Creates a generator with default configuration.
    pub fn new() -> Result<Self, GenConfigError> {
        Self::with_config(ReviewGenConfig::default())
    }

    /// Creates a generator with custom configuration.
    pub fn with_config(config: ReviewGenConfig) -> Result<Self, GenConfigError> {
        check_probability(config.review_probability)?;
        if config.max_age_days < 1 {
            return Err(GenConfigError::EmptyRange("max_age_days"));
        }
        if let Some(&(rating, _)) = config
            .rating_weights
            .iter()
            .find(|(r, _)| !(1..=5).contains(r))
        {
            return Err(GenConfigError::Rating(rating));
        }

        let ratings = WeightedTable::new(config.rating_weights.iter().copied())?;

        Ok(Self {
            config,
            ratings,
            templates: default_review_templates(),
        })
    }

    /// Possibly generates a review of a booking, written by `reviewer_id`.
    ///
    /// Only confirmed or paid bookings are reviewed, and only with the
    /// configured probability.
    pub fn generate_for_booking(
        &self,
        booking: &GeneratedBooking,
        reviewer_id: Uuid,
        now: OffsetDateTime,
        rng: &mut impl Rng,
    ) -> Option<GeneratedReview> {
        if !booking.status.is_reviewable() {
            return None;
        }
        if rng.r#gen::<f64>() >= self.config.review_probability {
            return None;
        }

        let rating = *self.ratings.sample(rng);
        let review_text = self.templates.choose(rng)?.clone();
        let created_at = now - Duration::days(rng.gen_range(1..=self.config.max_age_days));

        Some(GeneratedReview {
            id: Uuid::new_v4(),
            user_id: reviewer_id,
            vendor_id: booking.vendor_id,
            event_id: booking.event_id,
            rating,
            review_text,
            created_at,
        })
    }

    /// Generates reviews for a set of bookings.
    ///
    /// `event_owners` maps each event to the customer who organised it; that
    /// customer is the review author.
    pub fn generate_for_bookings(
        &self,
        bookings: &[GeneratedBooking],
        event_owners: &HashMap<Uuid, Uuid>,
        now: OffsetDateTime,
        rng: &mut impl Rng,
    ) -> Vec<GeneratedReview> {
        let mut reviews = Vec::new();

        for booking in bookings {
            let Some(&owner) = event_owners.get(&booking.event_id) else {
                warn!("No owner known for event {}, skipping review", booking.event_id);
                continue;
            };

            if let Some(review) = self.generate_for_booking(booking, owner, now, rng) {
                reviews.push(review);
            }
        }

        reviews
    }
}

fn default_review_templates() -> Vec<String> {
    vec![
        "Great service! Highly recommended. The team was professional from start to finish.".into(),
        "Excellent vendor, very professional. They exceeded our expectations in every way.".into(),
        "They made our special day perfect! Every detail was handled with care.".into(),
        "Exceeded our expectations in every way. Would definitely use again for future events.".into(),
        "Very responsive and easy to work with. Great communication throughout the process.".into(),
        "Good service, but a bit pricey. Quality was there, but consider more budget-friendly options.".into(),
        "Amazing! Will definitely use again for future events. Everyone at our event commented on how great they were.".into(),
        "Perfect execution of our vision. They understood exactly what we wanted.".into(),
        "Reliable and punctual. No stress working with this vendor.".into(),
        "Creative ideas and excellent execution. They brought something unique to our event.".into(),
        "Friendly staff and great customer service. They made planning so much easier.".into(),
        "High quality at a reasonable price. Great value for what you get.".into(),
        "Flexible with last-minute changes. Really appreciated their adaptability.".into(),
        "Beautifully done! Our guests were impressed with their work.".into(),
        "Professional, organized, and detail-oriented. Everything was perfect!".into(),
    ]
}
