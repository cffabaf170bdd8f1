//! Database seeding utilities.

use std::collections::{HashMap, HashSet};
use std::fmt;

use sqlx::migrate::MigrateError;
use sqlx::{PgConnection, PgPool};
use thiserror::Error;
use time::Date;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::generators::{
    FALLBACK_VENDOR_RATING, GenConfigError, GeneratedBooking, GeneratedReview, GeneratedService,
    GeneratedUser, GeneratedVendor, ServiceOffer, VendorOffer,
};
use happenings::errors::ModelError;
use happenings::models::{Event, EventType, UserRole, VendorCategory};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] MigrateError),
    #[error("Invalid stored data: {0}")]
    Model(#[from] ModelError),
    #[error("Invalid generator configuration: {0}")]
    GenConfig(#[from] GenConfigError),
    #[error("No customer accounts exist to own {0} new events")]
    NoCustomers(usize),
}

/// Tables populated by the seeder, in foreign-key order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Users,
    Vendors,
    Services,
    Events,
    Bookings,
    Reviews,
}

impl Table {
    pub const ALL: &'static [Table] = &[
        Table::Users,
        Table::Vendors,
        Table::Services,
        Table::Events,
        Table::Bookings,
        Table::Reviews,
    ];

    /// Returns the table name in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Users => "users",
            Table::Vendors => "vendors",
            Table::Services => "services",
            Table::Events => "events",
            Table::Bookings => "event_vendors",
            Table::Reviews => "reviews",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of what is currently stored.
#[derive(Debug, Clone)]
pub struct SeedStatus {
    /// Row count per table, in [`Table::ALL`] order.
    pub row_counts: Vec<(Table, i64)>,
    pub users_by_role: HashMap<UserRole, i64>,
    pub events_by_type: HashMap<EventType, i64>,
    pub bookings_by_status: Vec<(String, i64)>,
    /// Vendors that cannot be booked because they offer no services.
    pub vendors_without_services: i64,
}

/// Database seeder for inserting generated demo data.
///
/// Every `seed_*` method runs in its own transaction, so a failure leaves
/// earlier phases committed and the failing phase rolled back.
pub struct Seeder {
    pool: PgPool,
    batch_size: usize,
}

impl Seeder {
    /// Creates a new seeder with the given database pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            batch_size: 50,
        }
    }

    /// Sets the number of rows between progress reports.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Counts all rows of a table.
    pub async fn count_rows(&self, table: Table) -> Result<i64, SeedError> {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Counts accounts with the given role.
    pub async fn count_users_by_role(&self, role: UserRole) -> Result<i64, SeedError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = $1")
            .bind(role.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Counts stored events per event type. Types without events are absent.
    pub async fn event_counts_by_type(&self) -> Result<HashMap<EventType, i64>, SeedError> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT event_type, COUNT(*) FROM events GROUP BY event_type")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter()
            .map(|(event_type, count)| -> Result<_, SeedError> {
                Ok((event_type.parse::<EventType>()?, count))
            })
            .collect()
    }

    /// Counts stored vendors per category. Categories without vendors are absent.
    pub async fn vendor_counts_by_category(
        &self,
    ) -> Result<HashMap<VendorCategory, i64>, SeedError> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT category, COUNT(*) FROM vendors GROUP BY category")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter()
            .map(|(category, count)| -> Result<_, SeedError> {
                Ok((category.parse::<VendorCategory>()?, count))
            })
            .collect()
    }

    /// Ids of every customer account.
    pub async fn customer_ids(&self) -> Result<Vec<Uuid>, SeedError> {
        let ids: Vec<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE role = $1")
            .bind(UserRole::Customer.as_str())
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    /// Looks up an account by email.
    pub async fn find_user_id_by_email(&self, email: &str) -> Result<Option<Uuid>, SeedError> {
        let id: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(id)
    }

    /// Seeds accounts. Accounts whose email already exists are left untouched.
    ///
    /// Returns the ids of the accounts actually inserted.
    pub async fn seed_users(&self, users: &[GeneratedUser]) -> Result<Vec<Uuid>, SeedError> {
        info!("Seeding {} users...", users.len());

        let mut tx = self.pool.begin().await?;
        let mut inserted = Vec::new();
        for (i, user) in users.iter().enumerate() {
            match insert_user(&mut tx, user).await? {
                Some(id) => inserted.push(id),
                None => debug!("Account {} already exists, skipping", user.email),
            }

            if (i + 1) % self.batch_size == 0 {
                info!("  Seeded {}/{} users", i + 1, users.len());
            }
        }
        tx.commit().await?;

        info!("Seeded {} users", inserted.len());
        Ok(inserted)
    }

    /// Seeds vendor owners, vendor profiles and their services together.
    ///
    /// A vendor whose owner email is already taken is skipped along with its
    /// services. Returns the ids of the vendors inserted.
    pub async fn seed_vendor_catalog(
        &self,
        owners: &[GeneratedUser],
        vendors: &[GeneratedVendor],
        services: &[GeneratedService],
    ) -> Result<Vec<Uuid>, SeedError> {
        info!(
            "Seeding vendor catalog: {} vendors with {} services...",
            vendors.len(),
            services.len()
        );

        let mut tx = self.pool.begin().await?;
        let mut new_owners = HashSet::new();
        for owner in owners {
            match insert_user(&mut tx, owner).await? {
                Some(id) => {
                    new_owners.insert(id);
                }
                None => warn!("Vendor owner {} already exists, skipping its vendor", owner.email),
            }
        }

        let mut inserted = Vec::new();
        for vendor in vendors.iter().filter(|v| new_owners.contains(&v.user_id)) {
            insert_vendor(&mut tx, vendor).await?;
            inserted.push(vendor.id);
        }
        for service in services.iter().filter(|s| inserted.contains(&s.vendor_id)) {
            insert_service(&mut tx, service).await?;
        }
        tx.commit().await?;

        info!("Seeded {} vendors", inserted.len());
        Ok(inserted)
    }

    /// Seeds events.
    pub async fn seed_events(&self, events: &[Event]) -> Result<(), SeedError> {
        info!("Seeding {} events...", events.len());

        let mut tx = self.pool.begin().await?;
        for (i, event) in events.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO events (id, user_id, event_type, location, date, budget, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(event.id)
            .bind(event.user_id)
            .bind(event.event_type.as_str())
            .bind(&event.location)
            .bind(event.date)
            .bind(event.budget)
            .execute(&mut *tx)
            .await?;

            if (i + 1) % self.batch_size == 0 {
                info!("  Seeded {}/{} events", i + 1, events.len());
            }
        }
        tx.commit().await?;

        info!("Seeded {} events", events.len());
        Ok(())
    }

    /// Seeds bookings and the reviews written for them in one transaction.
    pub async fn seed_bookings_and_reviews(
        &self,
        bookings: &[GeneratedBooking],
        reviews: &[GeneratedReview],
    ) -> Result<(), SeedError> {
        info!(
            "Seeding {} bookings and {} reviews...",
            bookings.len(),
            reviews.len()
        );

        let mut tx = self.pool.begin().await?;
        for (i, booking) in bookings.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO event_vendors (id, event_id, vendor_id, service_id, agreed_price, status, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(booking.id)
            .bind(booking.event_id)
            .bind(booking.vendor_id)
            .bind(booking.service_id)
            .bind(booking.agreed_price)
            .bind(booking.status.as_str())
            .execute(&mut *tx)
            .await?;

            if (i + 1) % self.batch_size == 0 {
                info!("  Seeded {}/{} bookings", i + 1, bookings.len());
            }
        }

        for review in reviews {
            sqlx::query(
                r#"
                INSERT INTO reviews (id, user_id, vendor_id, event_id, rating, review_text, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(review.id)
            .bind(review.user_id)
            .bind(review.vendor_id)
            .bind(review.event_id)
            .bind(review.rating)
            .bind(&review.review_text)
            .bind(review.created_at)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        info!(
            "Seeded {} bookings and {} reviews",
            bookings.len(),
            reviews.len()
        );
        Ok(())
    }

    /// Sets every vendor's rating to the mean of its reviews, or the fallback
    /// rating when it has none.
    ///
    /// Returns the number of vendors updated.
    pub async fn refresh_vendor_ratings(&self) -> Result<u64, SeedError> {
        let result = sqlx::query(
            r#"
            UPDATE vendors v
            SET rating = (
                SELECT COALESCE(AVG(r.rating)::DOUBLE PRECISION, $1)
                FROM reviews r
                WHERE r.vendor_id = v.id
            )
            "#,
        )
        .bind(FALLBACK_VENDOR_RATING)
        .execute(&self.pool)
        .await?;

        info!("Refreshed ratings of {} vendors", result.rows_affected());
        Ok(result.rows_affected())
    }

    /// Current rating of every vendor.
    pub async fn vendor_ratings(&self) -> Result<HashMap<Uuid, f64>, SeedError> {
        let rows: Vec<(Uuid, Option<f64>)> = sqlx::query_as("SELECT id, rating FROM vendors")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, rating)| (id, rating.unwrap_or(0.0)))
            .collect())
    }

    /// Loads every stored vendor with its services.
    ///
    /// Vendors without services are logged and left out, since they cannot be booked.
    pub async fn load_vendor_offers(&self) -> Result<Vec<VendorOffer>, SeedError> {
        let rows: Vec<(Uuid, String, Option<Uuid>, Option<i32>)> = sqlx::query_as(
            r#"
            SELECT v.id, v.category, s.id, s.price
            FROM vendors v
            LEFT JOIN services s ON s.vendor_id = v.id
            ORDER BY v.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut offers: Vec<VendorOffer> = Vec::new();
        for (vendor_id, category, service_id, price) in rows {
            if offers.last().map(|o| o.vendor_id) != Some(vendor_id) {
                offers.push(VendorOffer {
                    vendor_id,
                    category: category.parse::<VendorCategory>()?,
                    services: Vec::new(),
                });
            }
            if let (Some(id), Some(price), Some(offer)) = (service_id, price, offers.last_mut()) {
                offer.services.push(ServiceOffer { id, price });
            }
        }

        offers.retain(|offer| {
            if offer.services.is_empty() {
                warn!("Vendor {} has no services, skipping", offer.vendor_id);
                false
            } else {
                true
            }
        });

        debug!("Loaded {} bookable vendors", offers.len());
        Ok(offers)
    }

    /// Loads events that have no bookings yet.
    pub async fn load_unbooked_events(&self) -> Result<Vec<Event>, SeedError> {
        let rows: Vec<(Uuid, Uuid, String, String, Date, i32)> = sqlx::query_as(
            r#"
            SELECT e.id, e.user_id, e.event_type, e.location, e.date, e.budget
            FROM events e
            WHERE NOT EXISTS (SELECT 1 FROM event_vendors ev WHERE ev.event_id = e.id)
            ORDER BY e.date
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(id, user_id, event_type, location, date, budget)| -> Result<_, SeedError> {
                Ok(Event {
                    id,
                    user_id,
                    event_type: event_type.parse()?,
                    location,
                    date,
                    budget,
                })
            })
            .collect()
    }

    /// Summarises what is currently stored.
    pub async fn status(&self) -> Result<SeedStatus, SeedError> {
        let mut row_counts = Vec::with_capacity(Table::ALL.len());
        for &table in Table::ALL {
            row_counts.push((table, self.count_rows(table).await?));
        }

        let mut users_by_role = HashMap::new();
        for &role in UserRole::ALL {
            users_by_role.insert(role, self.count_users_by_role(role).await?);
        }

        let bookings_by_status: Vec<(String, i64)> = sqlx::query_as(
            "SELECT status, COUNT(*) FROM event_vendors GROUP BY status ORDER BY status",
        )
        .fetch_all(&self.pool)
        .await?;

        let vendors_without_services: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM vendors v
            WHERE NOT EXISTS (SELECT 1 FROM services s WHERE s.vendor_id = v.id)
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(SeedStatus {
            row_counts,
            users_by_role,
            events_by_type: self.event_counts_by_type().await?,
            bookings_by_status,
            vendors_without_services,
        })
    }

    /// Deletes every seeded row.
    pub async fn clear_all(&self) -> Result<(), SeedError> {
        warn!("Deleting all existing data");

        let mut tx = self.pool.begin().await?;
        for table in Table::ALL.iter().rev() {
            let result = sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&mut *tx)
                .await?;
            debug!("Deleted {} rows from {}", result.rows_affected(), table);
        }
        tx.commit().await?;

        Ok(())
    }
}

/// Inserts an account unless its email is taken. Returns the new account's id.
async fn insert_user(
    conn: &mut PgConnection,
    user: &GeneratedUser,
) -> Result<Option<Uuid>, SeedError> {
    let id: Option<Uuid> = sqlx::query_scalar(
        r#"
        INSERT INTO users (id, full_name, email, phone, password_hash, role, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
        ON CONFLICT (email) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(user.id)
    .bind(&user.full_name)
    .bind(&user.email)
    .bind(&user.phone)
    .bind(&user.password_hash)
    .bind(user.role.as_str())
    .fetch_optional(&mut *conn)
    .await?;

    Ok(id)
}

async fn insert_vendor(conn: &mut PgConnection, vendor: &GeneratedVendor) -> Result<(), SeedError> {
    sqlx::query(
        r#"
        INSERT INTO vendors (id, user_id, business_name, category, location, min_price, max_price, rating, description, profile_img)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(vendor.id)
    .bind(vendor.user_id)
    .bind(&vendor.business_name)
    .bind(vendor.category.as_str())
    .bind(&vendor.location)
    .bind(vendor.min_price)
    .bind(vendor.max_price)
    .bind(vendor.rating)
    .bind(&vendor.description)
    .bind(&vendor.profile_img)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn insert_service(
    conn: &mut PgConnection,
    service: &GeneratedService,
) -> Result<(), SeedError> {
    sqlx::query(
        r#"
        INSERT INTO services (id, vendor_id, title, description, price)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(service.id)
    .bind(service.vendor_id)
    .bind(&service.title)
    .bind(&service.description)
    .bind(service.price)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_names() {
        assert_eq!(Table::Bookings.as_str(), "event_vendors");
        assert_eq!(Table::ALL.len(), 6);
        assert_eq!(Table::ALL.first(), Some(&Table::Users));
        assert_eq!(Table::ALL.last(), Some(&Table::Reviews));
    }
}
