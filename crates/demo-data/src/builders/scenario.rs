//! Fluent builder for constructing demo marketplaces.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use rand::Rng;
use sqlx::PgPool;
use time::{Date, OffsetDateTime};
use tracing::info;
use uuid::Uuid;

use crate::config::SeedConfig;
use crate::db::{SeedError, Seeder, Table};
use crate::generators::{
    BookingGenConfig, BookingGenerator, EventGenConfig, EventGenerator, GeneratedBooking,
    GeneratedReview, GeneratedService, GeneratedUser, GeneratedVendor, ReviewGenConfig,
    ReviewGenerator, UserGenConfig, UserGenerator, VendorGenConfig, VendorGenerator,
    VendorOffer, recompute_vendor_ratings,
};
use happenings::models::{Event, EventType, UserRole, VendorCategory};

/// Rows created while building a scenario.
#[derive(Debug, Default)]
pub struct ScenarioResult {
    pub users: Vec<GeneratedUser>,
    pub vendors: Vec<GeneratedVendor>,
    pub services: Vec<GeneratedService>,
    pub events: Vec<Event>,
    pub bookings: Vec<GeneratedBooking>,
    pub reviews: Vec<GeneratedReview>,
    /// Rating of every vendor after reviews were applied.
    pub vendor_ratings: HashMap<Uuid, f64>,
    /// Timing of the run (populated if metrics tracking enabled).
    pub metrics: Option<ScenarioMetrics>,
}

/// Timing of a scenario run.
#[derive(Debug, Clone)]
pub struct ScenarioMetrics {
    /// Time spent generating data (milliseconds).
    pub generation_time_ms: u64,
    /// Time spent in the database (milliseconds, 0 if build_data used).
    pub seeding_time_ms: u64,
}

/// Builder for creating a populated marketplace.
///
/// # Example
///
/// ```rust,ignore
/// let result = ScenarioBuilder::new()
///     .with_customers(40)
///     .with_vendors_per_category(3)
///     .with_min_events_per_type(20)
///     .build(&pool, &mut rng)
///     .await?;
/// ```
pub struct ScenarioBuilder {
    config: SeedConfig,
    user_config: UserGenConfig,
    vendor_config: VendorGenConfig,
    event_config: EventGenConfig,
    booking_config: BookingGenConfig,
    review_config: ReviewGenConfig,
    track_metrics: bool,
}

impl Default for ScenarioBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Generators built from the builder's configuration.
struct Generators {
    users: UserGenerator,
    vendors: VendorGenerator,
    events: EventGenerator,
    bookings: BookingGenerator,
    reviews: ReviewGenerator,
}

impl ScenarioBuilder {
    /// Creates a new scenario builder with default settings.
    pub fn new() -> Self {
        Self::from_config(SeedConfig::default())
    }

    /// Creates a builder whose counts and thresholds come from `config`.
    pub fn from_config(config: SeedConfig) -> Self {
        Self {
            config,
            user_config: UserGenConfig::default(),
            vendor_config: VendorGenConfig::default(),
            event_config: EventGenConfig::default(),
            booking_config: BookingGenConfig::default(),
            review_config: ReviewGenConfig::default(),
            track_metrics: false,
        }
    }

    /// Sets the target number of customer accounts.
    pub fn with_customers(mut self, count: usize) -> Self {
        self.config.customer_count = count;
        self
    }

    /// Sets the number of vendors generated per category.
    pub fn with_vendors_per_category(mut self, count: usize) -> Self {
        self.config.vendors_per_category = count;
        self
    }

    /// Sets the minimum number of events per event type.
    pub fn with_min_events_per_type(mut self, count: usize) -> Self {
        self.config.min_events_per_type = count;
        self
    }

    /// Sets the vendor count below which the catalog is generated.
    pub fn with_vendor_threshold(mut self, threshold: i64) -> Self {
        self.config.vendor_threshold = threshold;
        self
    }

    /// Sets the booking count below which bookings are generated.
    pub fn with_booking_threshold(mut self, threshold: i64) -> Self {
        self.config.booking_threshold = threshold;
        self
    }

    /// Sets the account generation configuration.
    pub fn with_user_config(mut self, config: UserGenConfig) -> Self {
        self.user_config = config;
        self
    }

    /// Sets the vendor generation configuration.
    pub fn with_vendor_config(mut self, config: VendorGenConfig) -> Self {
        self.vendor_config = config;
        self
    }

    /// Sets the event generation configuration.
    pub fn with_event_config(mut self, config: EventGenConfig) -> Self {
        self.event_config = config;
        self
    }

    /// Sets the booking generation configuration.
    pub fn with_booking_config(mut self, config: BookingGenConfig) -> Self {
        self.booking_config = config;
        self
    }

    /// Sets the review generation configuration.
    pub fn with_review_config(mut self, config: ReviewGenConfig) -> Self {
        self.review_config = config;
        self
    }

    /// Enables timing metrics in the result.
    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.track_metrics = enabled;
        self
    }

    fn generators(&self) -> Result<Generators, SeedError> {
        Ok(Generators {
            users: UserGenerator::with_config(self.user_config.clone())?,
            vendors: VendorGenerator::with_config(self.vendor_config.clone())?,
            events: EventGenerator::with_config(self.event_config.clone())?,
            bookings: BookingGenerator::with_config(self.booking_config.clone())?,
            reviews: ReviewGenerator::with_config(self.review_config.clone())?,
        })
    }

    /// Generates a complete marketplace in memory without touching the database.
    ///
    /// `today` decides which events are past; reviews are backdated from `now`.
    pub fn build_data(
        &self,
        today: Date,
        now: OffsetDateTime,
        rng: &mut impl Rng,
    ) -> Result<ScenarioResult, SeedError> {
        let start_time = self.track_metrics.then(Instant::now);
        let generators = self.generators()?;
        let mut result = ScenarioResult::default();

        let (owners, vendors, services) = generate_catalog(
            &generators,
            self.config.vendors_per_category,
            &HashMap::new(),
            rng,
        );
        result.users.extend(owners);

        result.users.push(generators.users.admin());
        let customers = generators
            .users
            .customers(1, self.config.customer_count, rng);

        for customer in &customers {
            result
                .events
                .extend(generators.events.initial_events(customer.id, today, rng));
        }

        let customer_ids: Vec<Uuid> = customers.iter().map(|c| c.id).collect();
        let shortfall = self.config.event_shortfall(&count_by_type(&result.events));
        for (event_type, missing) in shortfall {
            result
                .events
                .extend(generators.events.top_up(event_type, missing, &customer_ids, today, rng));
        }
        result.users.extend(customers);

        let offers: Vec<VendorOffer> = vendors.iter().map(|v| v.offer(&services)).collect();
        result.bookings = generators
            .bookings
            .generate_batch(&result.events, &offers, today, rng);

        let owners = event_owners(&result.events);
        result.reviews = generators
            .reviews
            .generate_for_bookings(&result.bookings, &owners, now, rng);

        result.vendor_ratings =
            recompute_vendor_ratings(vendors.iter().map(|v| v.id), &result.reviews);
        result.vendors = vendors;
        for vendor in &mut result.vendors {
            if let Some(&rating) = result.vendor_ratings.get(&vendor.id) {
                vendor.rating = rating;
            }
        }
        result.services = services;

        result.metrics = start_time.map(|start| ScenarioMetrics {
            generation_time_ms: start.elapsed().as_millis() as u64,
            seeding_time_ms: 0,
        });

        Ok(result)
    }

    /// Tops up the database to the configured counts.
    ///
    /// Each phase only creates what is missing, so repeated runs converge on
    /// the configured counts without duplicating data. Phases commit one by
    /// one: catalog, customers, events, bookings with reviews, ratings.
    pub async fn build(self, pool: &PgPool, rng: &mut impl Rng) -> Result<ScenarioResult, SeedError> {
        let start_time = self.track_metrics.then(Instant::now);
        let generators = self.generators()?;
        let seeder = Seeder::new(pool.clone()).with_batch_size(self.config.batch_size);
        let now = OffsetDateTime::now_utc();
        let today = now.date();
        let mut result = ScenarioResult::default();

        if self.config.run_migrations {
            happenings::run_migrations(pool).await?;
        }
        if self.config.reset {
            seeder.clear_all().await?;
        }

        // Vendor catalog
        let vendor_count = seeder.count_rows(Table::Vendors).await?;
        if self.config.needs_vendor_catalog(vendor_count) {
            let existing = seeder.vendor_counts_by_category().await?;
            let (owners, vendors, services) = generate_catalog(
                &generators,
                self.config.vendors_per_category,
                &existing,
                rng,
            );
            let inserted: HashSet<Uuid> = seeder
                .seed_vendor_catalog(&owners, &vendors, &services)
                .await?
                .into_iter()
                .collect();
            let owner_ids: HashSet<Uuid> = vendors
                .iter()
                .filter(|v| inserted.contains(&v.id))
                .map(|v| v.user_id)
                .collect();
            result
                .users
                .extend(owners.into_iter().filter(|o| owner_ids.contains(&o.id)));
            result.vendors = vendors
                .into_iter()
                .filter(|v| inserted.contains(&v.id))
                .collect();
            result.services = services
                .into_iter()
                .filter(|s| inserted.contains(&s.vendor_id))
                .collect();
        } else {
            info!("Found {} vendors, keeping existing catalog", vendor_count);
        }

        // Customers
        let mut accounts = Vec::new();
        let admin = generators.users.admin();
        if seeder.find_user_id_by_email(&admin.email).await?.is_none() {
            accounts.push(admin);
        }
        let existing_customers = seeder.count_users_by_role(UserRole::Customer).await?;
        let shortfall = self.config.customer_shortfall(existing_customers);
        if shortfall == 0 {
            info!("Found {} customers, none missing", existing_customers);
        }
        let first_number = usize::try_from(existing_customers).unwrap_or(0) + 1;
        accounts.extend(generators.users.customers(first_number, shortfall, rng));
        let inserted: HashSet<Uuid> = if accounts.is_empty() {
            HashSet::new()
        } else {
            seeder.seed_users(&accounts).await?.into_iter().collect()
        };
        accounts.retain(|a| inserted.contains(&a.id));
        let customers: Vec<&GeneratedUser> = accounts
            .iter()
            .filter(|a| a.role == UserRole::Customer)
            .collect();

        // Events
        let mut events: Vec<Event> = customers
            .iter()
            .flat_map(|c| generators.events.initial_events(c.id, today, rng))
            .collect();
        let mut counts = seeder.event_counts_by_type().await?;
        for (event_type, count) in count_by_type(&events) {
            *counts.entry(event_type).or_default() += count;
        }
        let shortfall = self.config.event_shortfall(&counts);
        if !shortfall.is_empty() {
            let customer_ids = seeder.customer_ids().await?;
            if customer_ids.is_empty() {
                let missing: usize = shortfall.iter().map(|(_, n)| n).sum();
                return Err(SeedError::NoCustomers(missing));
            }
            for (event_type, missing) in shortfall {
                events.extend(generators.events.top_up(
                    event_type,
                    missing,
                    &customer_ids,
                    today,
                    rng,
                ));
            }
        }
        if !events.is_empty() {
            seeder.seed_events(&events).await?;
        }
        result.users.extend(accounts);
        result.events = events;

        // Bookings and reviews
        let booking_count = seeder.count_rows(Table::Bookings).await?;
        if self.config.needs_bookings(booking_count) {
            let offers = seeder.load_vendor_offers().await?;
            let unbooked = seeder.load_unbooked_events().await?;
            info!(
                "Booking vendors for {} events from {} bookable vendors",
                unbooked.len(),
                offers.len()
            );

            let bookings = generators
                .bookings
                .generate_batch(&unbooked, &offers, today, rng);
            let reviews = generators.reviews.generate_for_bookings(
                &bookings,
                &event_owners(&unbooked),
                now,
                rng,
            );
            seeder.seed_bookings_and_reviews(&bookings, &reviews).await?;
            result.bookings = bookings;
            result.reviews = reviews;
        } else {
            info!(
                "Found {} bookings (threshold {}), skipping bookings and reviews",
                booking_count, self.config.booking_threshold
            );
        }

        // Ratings
        seeder.refresh_vendor_ratings().await?;
        result.vendor_ratings = seeder.vendor_ratings().await?;
        for vendor in &mut result.vendors {
            if let Some(&rating) = result.vendor_ratings.get(&vendor.id) {
                vendor.rating = rating;
            }
        }

        result.metrics = start_time.map(|start| ScenarioMetrics {
            generation_time_ms: 0,
            seeding_time_ms: start.elapsed().as_millis() as u64,
        });

        Ok(result)
    }
}

/// Preset scenarios.
impl ScenarioBuilder {
    /// The standard demo marketplace: 3 vendors per category, 40 customers,
    /// at least 20 events of every type.
    pub fn demo() -> Self {
        Self::new()
    }

    /// A small marketplace for tests: one vendor per category, a handful of
    /// customers and events.
    pub fn small() -> Self {
        Self::new()
            .with_vendors_per_category(1)
            .with_vendor_threshold(VendorCategory::ALL.len() as i64)
            .with_customers(5)
            .with_min_events_per_type(2)
            .with_booking_threshold(10)
    }
}

/// Generates `per_category` vendors, each with its own owner account, for every category.
///
/// Owner logins are numbered after the vendors a category already has.
fn generate_catalog(
    generators: &Generators,
    per_category: usize,
    existing: &HashMap<VendorCategory, i64>,
    rng: &mut impl Rng,
) -> (Vec<GeneratedUser>, Vec<GeneratedVendor>, Vec<GeneratedService>) {
    let mut owners = Vec::new();
    let mut vendors = Vec::new();
    let mut services = Vec::new();

    for &category in VendorCategory::ALL {
        let stored = existing.get(&category).copied().unwrap_or(0);
        let first_number = usize::try_from(stored).unwrap_or(0) + 1;
        for number in first_number..first_number + per_category {
            let owner = generators.users.vendor_owner(category, number, rng);
            let (vendor, menu) = generators.vendors.generate(&owner, category, rng);
            owners.push(owner);
            vendors.push(vendor);
            services.extend(menu);
        }
    }

    (owners, vendors, services)
}

fn count_by_type(events: &[Event]) -> HashMap<EventType, i64> {
    let mut counts = HashMap::new();
    for event in events {
        *counts.entry(event.event_type).or_default() += 1;
    }
    counts
}

fn event_owners(events: &[Event]) -> HashMap<Uuid, Uuid> {
    events.iter().map(|e| (e.id, e.user_id)).collect()
}
