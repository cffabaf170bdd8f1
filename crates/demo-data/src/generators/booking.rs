//! Category-aware booking generation.
//!
//! Each event is matched with a handful of vendors, preferring the categories
//! a customer would typically hire for that kind of event, then filling the
//! remaining slots at random.

use std::collections::HashSet;
use std::ops::RangeInclusive;

use happenings::models::{BookingStatus, Event, EventType, VendorCategory};
use rand::Rng;
use rand::seq::SliceRandom;
use time::Date;
use tracing::debug;
use uuid::Uuid;

use super::{GenConfigError, check_probability};
use crate::sampling::WeightedTable;

/// A service a vendor can be booked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceOffer {
    pub id: Uuid,
    pub price: i32,
}

/// A bookable vendor with its services.
#[derive(Debug, Clone)]
pub struct VendorOffer {
    pub vendor_id: Uuid,
    pub category: VendorCategory,
    pub services: Vec<ServiceOffer>,
}

/// Generated booking ready for database insertion.
#[derive(Debug, Clone)]
pub struct GeneratedBooking {
    pub id: Uuid,
    pub event_id: Uuid,
    pub vendor_id: Uuid,
    pub service_id: Uuid,
    pub agreed_price: i32,
    pub status: BookingStatus,
}

/// Configuration for booking generation.
#[derive(Debug, Clone)]
pub struct BookingGenConfig {
    /// Number of vendors booked per event, clamped to the vendors available.
    pub vendors_per_event: RangeInclusive<usize>,
    /// Probability that the agreed price is discounted.
    pub discount_probability: f64,
    /// Discount applied to the service price, in percent.
    pub discount_percent: u8,
    /// Status weights for events that already took place.
    pub past_status_weights: Vec<(BookingStatus, f64)>,
    /// Status weights for upcoming events.
    pub future_status_weights: Vec<(BookingStatus, f64)>,
}

impl Default for BookingGenConfig {
    fn default() -> Self {
        Self {
            vendors_per_event: 1..=4,
            discount_probability: 0.3,
            discount_percent: 10,
            past_status_weights: vec![
                (BookingStatus::Pending, 0.1),
                (BookingStatus::Confirmed, 0.4),
                (BookingStatus::Paid, 0.4),
                (BookingStatus::Cancelled, 0.1),
            ],
            future_status_weights: vec![
                (BookingStatus::Pending, 0.6),
                (BookingStatus::Confirmed, 0.3),
                (BookingStatus::Paid, 0.05),
                (BookingStatus::Cancelled, 0.05),
            ],
        }
    }
}

/// Vendor categories customers usually hire for an event type, most important first.
///
/// Event types without a preference list get vendors chosen purely at random.
pub fn preferred_categories(event_type: EventType) -> &'static [VendorCategory] {
    use VendorCategory::*;

    match event_type {
        EventType::Wedding => &[Venue, Photography, Catering, Flowers, Dress, Music],
        EventType::Corporate => &[Venue, Catering, Music, Photography],
        EventType::Birthday => &[Venue, Catering, Cake, Decoration, Music],
        EventType::BabyShower => &[Venue, Catering, Cake, Decoration],
        EventType::Anniversary => &[Venue, Catering, Flowers, Music, Photography],
        EventType::Graduation => &[Venue, Catering, Photography],
        EventType::Holiday => &[Venue, Catering, Decoration, Music],
        EventType::Other => &[],
    }
}

/// Takes `percent` off `price`, truncating toward zero.
pub fn apply_discount(price: i32, percent: u8) -> i32 {
    let kept = 100 - i64::from(percent.min(100));
    (i64::from(price) * kept / 100) as i32
}

/// Generates bookings between events and vendors.
pub struct BookingGenerator {
    config: BookingGenConfig,
    past_statuses: WeightedTable<BookingStatus>,
    future_statuses: WeightedTable<BookingStatus>,
}

impl BookingGenerator {
    /// Creates a generator with default configuration.
    pub fn new() -> Result<Self, GenConfigError> {
        Self::with_config(BookingGenConfig::default())
    }

    /// Creates a generator with custom configuration.
    pub fn with_config(config: BookingGenConfig) -> Result<Self, GenConfigError> {
        // Every event books at least one vendor
        if config.vendors_per_event.is_empty() || *config.vendors_per_event.start() == 0 {
            return Err(GenConfigError::EmptyRange("vendors_per_event"));
        }
        if config.discount_percent > 100 {
            return Err(GenConfigError::DiscountPercent(config.discount_percent));
        }
        check_probability(config.discount_probability)?;

        let past_statuses = WeightedTable::new(config.past_status_weights.iter().copied())?;
        let future_statuses = WeightedTable::new(config.future_status_weights.iter().copied())?;

        Ok(Self {
            config,
            past_statuses,
            future_statuses,
        })
    }

    /// Generates bookings for a single event.
    ///
    /// Vendors without services are never selected, and a vendor is booked at
    /// most once per event. `today` decides whether the event is in the past.
    pub fn generate_for_event(
        &self,
        event: &Event,
        vendors: &[VendorOffer],
        today: Date,
        rng: &mut impl Rng,
    ) -> Vec<GeneratedBooking> {
        let selected = self.select_vendors(event.event_type, vendors, rng);
        let past = event.is_past(today);

        let bookings: Vec<GeneratedBooking> = selected
            .into_iter()
            .filter_map(|vendor| {
                let service = vendor.services.choose(rng)?;
                Some(GeneratedBooking {
                    id: Uuid::new_v4(),
                    event_id: event.id,
                    vendor_id: vendor.vendor_id,
                    service_id: service.id,
                    agreed_price: self.agreed_price(service.price, rng),
                    status: self.sample_status(past, rng),
                })
            })
            .collect();

        debug!(
            "Booked {} vendors for {} event {}",
            bookings.len(),
            event.event_type,
            event.id
        );

        bookings
    }

    /// Generates bookings for every event.
    pub fn generate_batch(
        &self,
        events: &[Event],
        vendors: &[VendorOffer],
        today: Date,
        rng: &mut impl Rng,
    ) -> Vec<GeneratedBooking> {
        events
            .iter()
            .flat_map(|event| self.generate_for_event(event, vendors, today, rng))
            .collect()
    }

    /// Picks distinct vendors for an event type.
    ///
    /// Preferred categories are walked in order, taking one random unused
    /// vendor from each until the target count is reached; leftover slots are
    /// filled uniformly from the unused pool.
    pub fn select_vendors<'a>(
        &self,
        event_type: EventType,
        vendors: &'a [VendorOffer],
        rng: &mut impl Rng,
    ) -> Vec<&'a VendorOffer> {
        let mut seen = HashSet::new();
        let eligible: Vec<&VendorOffer> = vendors
            .iter()
            .filter(|v| !v.services.is_empty() && seen.insert(v.vendor_id))
            .collect();

        if eligible.is_empty() {
            return Vec::new();
        }

        let target = rng
            .gen_range(self.config.vendors_per_event.clone())
            .min(eligible.len());

        let mut used: HashSet<Uuid> = HashSet::with_capacity(target);
        let mut selected: Vec<&VendorOffer> = Vec::with_capacity(target);

        for category in preferred_categories(event_type) {
            if selected.len() >= target {
                break;
            }

            let candidates: Vec<&VendorOffer> = eligible
                .iter()
                .copied()
                .filter(|v| v.category == *category && !used.contains(&v.vendor_id))
                .collect();

            if let Some(&vendor) = candidates.choose(rng) {
                used.insert(vendor.vendor_id);
                selected.push(vendor);
            }
        }

        if selected.len() < target {
            let remaining: Vec<&VendorOffer> = eligible
                .iter()
                .copied()
                .filter(|v| !used.contains(&v.vendor_id))
                .collect();
            selected.extend(
                remaining
                    .choose_multiple(rng, target - selected.len())
                    .copied(),
            );
        }

        selected
    }

    fn agreed_price(&self, price: i32, rng: &mut impl Rng) -> i32 {
        if rng.r#gen::<f64>() < self.config.discount_probability {
            apply_discount(price, self.config.discount_percent)
        } else {
            price
        }
    }

    fn sample_status(&self, past: bool, rng: &mut impl Rng) -> BookingStatus {
        let table = if past {
            &self.past_statuses
        } else {
            &self.future_statuses
        };
        *table.sample(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashMap;
    use time::{Duration, OffsetDateTime};

    fn make_vendors(per_category: usize) -> Vec<VendorOffer> {
        VendorCategory::ALL
            .iter()
            .flat_map(|&category| {
                (0..per_category).map(move |i| VendorOffer {
                    vendor_id: Uuid::new_v4(),
                    category,
                    services: (0..3)
                        .map(|j| ServiceOffer {
                            id: Uuid::new_v4(),
                            price: 500 + (i as i32) * 100 + j * 333,
                        })
                        .collect(),
                })
            })
            .collect()
    }

    fn make_event(event_type: EventType, date: Date) -> Event {
        Event {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            event_type,
            location: "Chicago, IL".into(),
            date,
            budget: 20000,
        }
    }

    fn today() -> Date {
        OffsetDateTime::now_utc().date()
    }

    #[test]
    fn test_preferred_categories_table() {
        assert_eq!(preferred_categories(EventType::Wedding).len(), 6);
        assert_eq!(
            preferred_categories(EventType::Graduation),
            &[
                VendorCategory::Venue,
                VendorCategory::Catering,
                VendorCategory::Photography
            ]
        );
        assert!(preferred_categories(EventType::Other).is_empty());
    }

    #[test]
    fn test_apply_discount_truncates() {
        assert_eq!(apply_discount(1000, 10), 900);
        assert_eq!(apply_discount(1255, 10), 1129);
        assert_eq!(apply_discount(999, 0), 999);
        assert_eq!(apply_discount(999, 100), 0);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let empty_range = BookingGenConfig {
            vendors_per_event: RangeInclusive::new(3, 1),
            ..Default::default()
        };
        assert!(matches!(
            BookingGenerator::with_config(empty_range),
            Err(GenConfigError::EmptyRange(_))
        ));

        for vendors_per_event in [0..=0, 0..=4] {
            let no_vendors = BookingGenConfig {
                vendors_per_event,
                ..Default::default()
            };
            assert!(matches!(
                BookingGenerator::with_config(no_vendors),
                Err(GenConfigError::EmptyRange("vendors_per_event"))
            ));
        }

        let bad_probability = BookingGenConfig {
            discount_probability: 1.5,
            ..Default::default()
        };
        assert!(BookingGenerator::with_config(bad_probability).is_err());

        let bad_weights = BookingGenConfig {
            past_status_weights: vec![],
            ..Default::default()
        };
        assert!(matches!(
            BookingGenerator::with_config(bad_weights),
            Err(GenConfigError::Sampling(_))
        ));
    }

    #[test]
    fn test_booking_invariants() {
        let booking_gen = BookingGenerator::new().unwrap();
        let vendors = make_vendors(3);
        let mut rng = rand::thread_rng();

        let services: HashMap<Uuid, (Uuid, i32)> = vendors
            .iter()
            .flat_map(|v| v.services.iter().map(move |s| (s.id, (v.vendor_id, s.price))))
            .collect();

        for i in 0..500 {
            let event_type = EventType::ALL[i % EventType::ALL.len()];
            let date = today() + Duration::days((i as i64 % 120) - 60);
            let event = make_event(event_type, date);

            let bookings = booking_gen.generate_for_event(&event, &vendors, today(), &mut rng);

            assert!(!bookings.is_empty() && bookings.len() <= 4);

            // No vendor booked twice for the same event
            let distinct: HashSet<Uuid> = bookings.iter().map(|b| b.vendor_id).collect();
            assert_eq!(distinct.len(), bookings.len());

            for b in &bookings {
                assert_eq!(b.event_id, event.id);

                // Service belongs to the booked vendor
                let (owner, price) = services[&b.service_id];
                assert_eq!(owner, b.vendor_id);

                // Full price or exactly 10% off
                assert!(
                    b.agreed_price == price || b.agreed_price == price * 9 / 10,
                    "agreed {} for list price {}",
                    b.agreed_price,
                    price
                );
            }
        }
    }

    #[test]
    fn test_discount_rate() {
        let booking_gen = BookingGenerator::new().unwrap();
        let mut rng = StdRng::seed_from_u64(2024);

        let n = 10_000;
        let discounted = (0..n)
            .filter(|_| booking_gen.agreed_price(1000, &mut rng) == 900)
            .count();
        let rate = discounted as f64 / n as f64;
        assert!((rate - 0.3).abs() < 0.02, "discount rate {rate}");
    }

    #[test]
    fn test_vendors_without_services_skipped() {
        let booking_gen = BookingGenerator::with_config(BookingGenConfig {
            vendors_per_event: 4..=4,
            ..Default::default()
        })
        .unwrap();
        let mut rng = rand::thread_rng();

        let mut vendors = make_vendors(1);
        for v in vendors.iter_mut().filter(|v| v.category == VendorCategory::Venue) {
            v.services.clear();
        }
        let venue_ids: HashSet<Uuid> = vendors
            .iter()
            .filter(|v| v.category == VendorCategory::Venue)
            .map(|v| v.vendor_id)
            .collect();

        for _ in 0..200 {
            let event = make_event(EventType::Wedding, today());
            let bookings = booking_gen.generate_for_event(&event, &vendors, today(), &mut rng);
            assert_eq!(bookings.len(), 4);
            assert!(bookings.iter().all(|b| !venue_ids.contains(&b.vendor_id)));
        }
    }

    #[test]
    fn test_target_clamped_to_pool() {
        let booking_gen = BookingGenerator::with_config(BookingGenConfig {
            vendors_per_event: 4..=4,
            ..Default::default()
        })
        .unwrap();
        let mut rng = rand::thread_rng();

        let vendors: Vec<VendorOffer> = make_vendors(1).into_iter().take(2).collect();
        let event = make_event(EventType::Birthday, today());
        let bookings = booking_gen.generate_for_event(&event, &vendors, today(), &mut rng);
        assert_eq!(bookings.len(), 2);

        assert!(
            booking_gen
                .generate_for_event(&event, &[], today(), &mut rng)
                .is_empty()
        );
    }

    #[test]
    fn test_duplicate_vendor_entries_booked_once() {
        let booking_gen = BookingGenerator::with_config(BookingGenConfig {
            vendors_per_event: 4..=4,
            ..Default::default()
        })
        .unwrap();
        let mut rng = rand::thread_rng();

        let vendor = make_vendors(1).remove(0);
        let vendors = vec![vendor.clone(), vendor.clone(), vendor];
        let event = make_event(EventType::Other, today());
        let bookings = booking_gen.generate_for_event(&event, &vendors, today(), &mut rng);
        assert_eq!(bookings.len(), 1);
    }

    #[test]
    fn test_preferred_categories_take_priority() {
        let booking_gen = BookingGenerator::with_config(BookingGenConfig {
            vendors_per_event: 3..=3,
            ..Default::default()
        })
        .unwrap();
        let vendors = make_vendors(2);
        let mut rng = rand::thread_rng();

        for _ in 0..100 {
            let selected = booking_gen.select_vendors(EventType::Graduation, &vendors, &mut rng);
            let categories: Vec<VendorCategory> = selected.iter().map(|v| v.category).collect();
            assert_eq!(
                categories,
                vec![
                    VendorCategory::Venue,
                    VendorCategory::Catering,
                    VendorCategory::Photography
                ]
            );
        }
    }

    #[test]
    fn test_unlisted_event_type_selects_at_random() {
        let booking_gen = BookingGenerator::with_config(BookingGenConfig {
            vendors_per_event: 1..=1,
            ..Default::default()
        })
        .unwrap();
        let vendors = make_vendors(1);
        let mut rng = StdRng::seed_from_u64(11);

        let mut seen = HashSet::new();
        for _ in 0..2000 {
            let selected = booking_gen.select_vendors(EventType::Other, &vendors, &mut rng);
            seen.insert(selected[0].category);
        }
        assert_eq!(seen.len(), VendorCategory::ALL.len());
    }

    #[test]
    fn test_past_wedding_scenario() {
        let booking_gen = BookingGenerator::new().unwrap();
        let vendors = make_vendors(3);
        let mut rng = StdRng::seed_from_u64(42);

        let wedding_categories = preferred_categories(EventType::Wedding);
        let mut total = 0usize;
        let mut committed = 0usize;

        for _ in 0..2000 {
            let event = make_event(EventType::Wedding, today() - Duration::days(10));
            let bookings = booking_gen.generate_for_event(&event, &vendors, today(), &mut rng);

            for b in &bookings {
                let vendor = vendors.iter().find(|v| v.vendor_id == b.vendor_id).unwrap();
                // Wedding lists six categories, more than the maximum of four vendors
                assert!(wedding_categories.contains(&vendor.category));
                if b.status.is_reviewable() {
                    committed += 1;
                }
            }
            total += bookings.len();
        }

        let ratio = committed as f64 / total as f64;
        assert!(ratio >= 0.7, "confirmed/paid ratio {ratio}");
    }

    #[test]
    fn test_future_events_mostly_pending() {
        let booking_gen = BookingGenerator::new().unwrap();
        let vendors = make_vendors(3);
        let mut rng = StdRng::seed_from_u64(7);

        let mut total = 0usize;
        let mut pending = 0usize;
        for _ in 0..2000 {
            let event = make_event(EventType::Corporate, today() + Duration::days(90));
            let bookings = booking_gen.generate_for_event(&event, &vendors, today(), &mut rng);
            pending += bookings
                .iter()
                .filter(|b| b.status == BookingStatus::Pending)
                .count();
            total += bookings.len();
        }

        let ratio = pending as f64 / total as f64;
        assert!((ratio - 0.6).abs() < 0.03, "pending ratio {ratio}");
    }

    #[test]
    fn test_event_today_counts_as_upcoming() {
        let booking_gen = BookingGenerator::with_config(BookingGenConfig {
            future_status_weights: vec![(BookingStatus::Pending, 1.0)],
            past_status_weights: vec![(BookingStatus::Paid, 1.0)],
            ..Default::default()
        })
        .unwrap();
        let vendors = make_vendors(1);
        let mut rng = rand::thread_rng();

        let today_event = make_event(EventType::Holiday, today());
        let past_event = make_event(EventType::Holiday, today() - Duration::days(1));

        let upcoming = booking_gen.generate_for_event(&today_event, &vendors, today(), &mut rng);
        assert!(upcoming.iter().all(|b| b.status == BookingStatus::Pending));

        let past = booking_gen.generate_for_event(&past_event, &vendors, today(), &mut rng);
        assert!(past.iter().all(|b| b.status == BookingStatus::Paid));
    }

    #[test]
    fn test_generate_batch() {
        let booking_gen = BookingGenerator::new().unwrap();
        let vendors = make_vendors(3);
        let mut rng = rand::thread_rng();

        let events: Vec<Event> = EventType::ALL
            .iter()
            .map(|&t| make_event(t, today()))
            .collect();
        let bookings = booking_gen.generate_batch(&events, &vendors, today(), &mut rng);

        let event_ids: HashSet<Uuid> = events.iter().map(|e| e.id).collect();
        assert!(bookings.len() >= events.len());
        assert!(bookings.iter().all(|b| event_ids.contains(&b.event_id)));
    }
}
