use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use crate::errors::ModelError;

/// Kind of celebration or gathering a customer is planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Wedding,
    Birthday,
    Corporate,
    BabyShower,
    Anniversary,
    Graduation,
    Holiday,
    Other,
}

impl EventType {
    pub const ALL: &'static [EventType] = &[
        EventType::Wedding,
        EventType::Birthday,
        EventType::Corporate,
        EventType::BabyShower,
        EventType::Anniversary,
        EventType::Graduation,
        EventType::Holiday,
        EventType::Other,
    ];

    /// Returns the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Wedding => "WEDDING",
            EventType::Birthday => "BIRTHDAY",
            EventType::Corporate => "CORPORATE",
            EventType::BabyShower => "BABY_SHOWER",
            EventType::Anniversary => "ANNIVERSARY",
            EventType::Graduation => "GRADUATION",
            EventType::Holiday => "HOLIDAY",
            EventType::Other => "OTHER",
        }
    }
}

/// Kind of service a vendor sells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VendorCategory {
    Photography,
    Catering,
    Music,
    Venue,
    Decoration,
    Cake,
    Flowers,
    Dress,
    Makeup,
    Transportation,
    Other,
}

impl VendorCategory {
    pub const ALL: &'static [VendorCategory] = &[
        VendorCategory::Photography,
        VendorCategory::Catering,
        VendorCategory::Music,
        VendorCategory::Venue,
        VendorCategory::Decoration,
        VendorCategory::Cake,
        VendorCategory::Flowers,
        VendorCategory::Dress,
        VendorCategory::Makeup,
        VendorCategory::Transportation,
        VendorCategory::Other,
    ];

    /// Returns the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            VendorCategory::Photography => "PHOTOGRAPHY",
            VendorCategory::Catering => "CATERING",
            VendorCategory::Music => "MUSIC",
            VendorCategory::Venue => "VENUE",
            VendorCategory::Decoration => "DECORATION",
            VendorCategory::Cake => "CAKE",
            VendorCategory::Flowers => "FLOWERS",
            VendorCategory::Dress => "DRESS",
            VendorCategory::Makeup => "MAKEUP",
            VendorCategory::Transportation => "TRANSPORTATION",
            VendorCategory::Other => "OTHER",
        }
    }

    /// Human readable label, e.g. `Photography`.
    pub fn display_name(&self) -> &'static str {
        match self {
            VendorCategory::Photography => "Photography",
            VendorCategory::Catering => "Catering",
            VendorCategory::Music => "Music",
            VendorCategory::Venue => "Venue",
            VendorCategory::Decoration => "Decoration",
            VendorCategory::Cake => "Cake",
            VendorCategory::Flowers => "Flowers",
            VendorCategory::Dress => "Dress",
            VendorCategory::Makeup => "Makeup",
            VendorCategory::Transportation => "Transportation",
            VendorCategory::Other => "Other",
        }
    }
}

/// Lifecycle state of a booking between an event and a vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Paid,
    Cancelled,
}

impl BookingStatus {
    pub const ALL: &'static [BookingStatus] = &[
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Paid,
        BookingStatus::Cancelled,
    ];

    /// Returns the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Paid => "PAID",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }

    /// Whether the customer has committed to the vendor and can review them.
    pub fn is_reviewable(&self) -> bool {
        matches!(self, BookingStatus::Confirmed | BookingStatus::Paid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Customer,
    Vendor,
    Admin,
}

impl UserRole {
    pub const ALL: &'static [UserRole] = &[UserRole::Customer, UserRole::Vendor, UserRole::Admin];

    /// Returns the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Customer => "CUSTOMER",
            UserRole::Vendor => "VENDOR",
            UserRole::Admin => "ADMIN",
        }
    }
}

macro_rules! impl_db_enum {
    ($ty:ident, $name:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $ty::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| ModelError::UnknownVariant {
                        kind: $name,
                        value: s.to_string(),
                    })
            }
        }
    };
}

impl_db_enum!(EventType, "event type");
impl_db_enum!(VendorCategory, "vendor category");
impl_db_enum!(BookingStatus, "booking status");
impl_db_enum!(UserRole, "user role");

/// An event as stored in the `events` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_type: EventType,
    pub location: String,
    pub date: Date,
    pub budget: i32,
}

impl Event {
    /// Whether the event took place before `today`.
    pub fn is_past(&self, today: Date) -> bool {
        self.date < today
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    fn date(year: i32, month: Month, day: u8) -> Date {
        Date::from_calendar_date(year, month, day).unwrap()
    }

    #[test]
    fn test_enum_strings_round_trip() {
        for t in EventType::ALL {
            assert_eq!(t.as_str().parse::<EventType>().unwrap(), *t);
        }
        for c in VendorCategory::ALL {
            assert_eq!(c.as_str().parse::<VendorCategory>().unwrap(), *c);
        }
        for s in BookingStatus::ALL {
            assert_eq!(s.to_string().parse::<BookingStatus>().unwrap(), *s);
        }
    }

    #[test]
    fn test_unknown_variant() {
        let err = "SKYDIVING".parse::<EventType>().unwrap_err();
        assert!(err.to_string().contains("SKYDIVING"));
        assert!("pending".parse::<BookingStatus>().is_err());
    }

    #[test]
    fn test_serde_matches_db_strings() {
        let json = serde_json::to_string(&EventType::BabyShower).unwrap();
        assert_eq!(json, "\"BABY_SHOWER\"");
        let role: UserRole = serde_json::from_str("\"ADMIN\"").unwrap();
        assert_eq!(role, UserRole::Admin);
    }

    #[test]
    fn test_reviewable_statuses() {
        assert!(BookingStatus::Confirmed.is_reviewable());
        assert!(BookingStatus::Paid.is_reviewable());
        assert!(!BookingStatus::Pending.is_reviewable());
        assert!(!BookingStatus::Cancelled.is_reviewable());
    }

    #[test]
    fn test_event_is_past() {
        let event = Event {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            event_type: EventType::Wedding,
            location: "Austin, TX".into(),
            date: date(2024, Month::June, 1),
            budget: 20000,
        };
        assert!(event.is_past(date(2024, Month::June, 2)));
        assert!(!event.is_past(date(2024, Month::June, 1)));
    }
}
