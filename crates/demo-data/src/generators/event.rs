//! Event generation for customers.

use std::ops::RangeInclusive;

use rand::Rng;
use rand::seq::SliceRandom;
use time::{Date, Duration};
use uuid::Uuid;

use happenings::models::{Event, EventType};

use super::{GenConfigError, LOCATIONS};

/// Configuration for event generation.
#[derive(Debug, Clone)]
pub struct EventGenConfig {
    /// Number of events created for each new customer.
    pub events_per_customer: RangeInclusive<usize>,
    /// Days ahead of today for a new customer's events.
    pub initial_days_ahead: RangeInclusive<i64>,
    /// Budget of a new customer's events.
    pub initial_budget: RangeInclusive<i32>,
    /// Days offset from today for top-up events. Negative offsets are past events.
    pub top_up_day_offset: RangeInclusive<i64>,
}

impl Default for EventGenConfig {
    fn default() -> Self {
        Self {
            events_per_customer: 2..=3,
            initial_days_ahead: 30..=365,
            initial_budget: 5000..=30000,
            top_up_day_offset: -30..=365,
        }
    }
}

/// Budget range for top-up events of a given type.
pub fn budget_range(event_type: EventType) -> RangeInclusive<i32> {
    match event_type {
        EventType::Wedding => 15000..=50000,
        EventType::Corporate => 10000..=40000,
        EventType::Birthday => 2000..=8000,
        EventType::BabyShower => 1500..=5000,
        EventType::Graduation => 3000..=10000,
        EventType::Anniversary => 5000..=20000,
        _ => 2000..=15000,
    }
}

/// Generates customer events.
pub struct EventGenerator {
    config: EventGenConfig,
}

impl EventGenerator {
    /// Creates a generator with default configuration.
    pub fn new() -> Self {
        Self {
            config: EventGenConfig::default(),
        }
    }

    /// Creates a generator with custom configuration.
    pub fn with_config(config: EventGenConfig) -> Result<Self, GenConfigError> {
        if config.events_per_customer.is_empty() {
            return Err(GenConfigError::EmptyRange("events_per_customer"));
        }
        if config.initial_days_ahead.is_empty() {
            return Err(GenConfigError::EmptyRange("initial_days_ahead"));
        }
        if config.initial_budget.is_empty() {
            return Err(GenConfigError::EmptyRange("initial_budget"));
        }
        if config.top_up_day_offset.is_empty() {
            return Err(GenConfigError::EmptyRange("top_up_day_offset"));
        }
        Ok(Self { config })
    }

    /// Generates the first few upcoming events of a newly created customer.
    pub fn initial_events(&self, customer_id: Uuid, today: Date, rng: &mut impl Rng) -> Vec<Event> {
        let count = rng.gen_range(self.config.events_per_customer.clone());

        (0..count)
            .map(|_| {
                let event_type = EventType::ALL
                    .choose(rng)
                    .copied()
                    .unwrap_or(EventType::Other);
                let days = rng.gen_range(self.config.initial_days_ahead.clone());

                Event {
                    id: Uuid::new_v4(),
                    user_id: customer_id,
                    event_type,
                    location: random_location(rng),
                    date: today.saturating_add(Duration::days(days)),
                    budget: rng.gen_range(self.config.initial_budget.clone()),
                }
            })
            .collect()
    }

    /// Generates `count` events of one type owned by random customers.
    ///
    /// Returns nothing when there are no customers to own them.
    pub fn top_up(
        &self,
        event_type: EventType,
        count: usize,
        customer_ids: &[Uuid],
        today: Date,
        rng: &mut impl Rng,
    ) -> Vec<Event> {
        let budgets = budget_range(event_type);
        let mut events = Vec::with_capacity(count);

        for _ in 0..count {
            let Some(&owner) = customer_ids.choose(rng) else {
                break;
            };
            let offset = rng.gen_range(self.config.top_up_day_offset.clone());

            events.push(Event {
                id: Uuid::new_v4(),
                user_id: owner,
                event_type,
                location: random_location(rng),
                date: today.saturating_add(Duration::days(offset)),
                budget: rng.gen_range(budgets.clone()),
            });
        }

        events
    }
}

impl Default for EventGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn random_location(rng: &mut impl Rng) -> String {
    LOCATIONS
        .choose(rng)
        .copied()
        .unwrap_or("New York, NY")
        .to_string()
}
