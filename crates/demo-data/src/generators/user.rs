//! Account generation for admins, customers, and vendors.

use fake::{Fake, faker::name::en::Name};
use rand::Rng;
use rand::seq::SliceRandom;
use uuid::Uuid;

use happenings::auth::hash_password;
use happenings::errors::ModelError;
use happenings::models::{UserRole, VendorCategory};

/// Generated user data ready for database insertion.
#[derive(Debug, Clone)]
pub struct GeneratedUser {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub role: UserRole,
}

/// Configuration for user generation.
#[derive(Debug, Clone)]
pub struct UserGenConfig {
    /// Email address of the single admin account.
    pub admin_email: String,
    /// Development password shared by admin accounts.
    pub admin_password: String,
    /// Development password shared by customer accounts.
    pub customer_password: String,
    /// Development password shared by vendor accounts.
    pub vendor_password: String,
    /// Domain used for generated email addresses.
    pub email_domain: String,
}

impl Default for UserGenConfig {
    fn default() -> Self {
        Self {
            admin_email: "admin@happyhappenings.com".to_string(),
            admin_password: "admin123".to_string(),
            customer_password: "customer123".to_string(),
            vendor_password: "vendor123".to_string(),
            email_domain: "example.com".to_string(),
        }
    }
}

const VENDOR_FIRST_NAMES: &[&str] = &["John", "Jane", "Michael", "Sarah", "David", "Emma"];

/// Generates realistic account data for demos.
///
/// Password hashing is slow, so each role's password is hashed once when the
/// generator is built and shared by every account of that role.
pub struct UserGenerator {
    config: UserGenConfig,
    admin_hash: String,
    customer_hash: String,
    vendor_hash: String,
}

impl UserGenerator {
    /// Creates a new user generator with default configuration.
    pub fn new() -> Result<Self, ModelError> {
        Self::with_config(UserGenConfig::default())
    }

    /// Creates a generator with custom configuration.
    pub fn with_config(config: UserGenConfig) -> Result<Self, ModelError> {
        Ok(Self {
            admin_hash: hash_password(&config.admin_password)?,
            customer_hash: hash_password(&config.customer_password)?,
            vendor_hash: hash_password(&config.vendor_password)?,
            config,
        })
    }

    /// The admin account.
    pub fn admin(&self) -> GeneratedUser {
        GeneratedUser {
            id: Uuid::new_v4(),
            full_name: "Admin User".to_string(),
            email: self.config.admin_email.clone(),
            phone: Some("+1234567890".to_string()),
            password_hash: self.admin_hash.clone(),
            role: UserRole::Admin,
        }
    }

    /// Generates the customer with login `customer{number}@{domain}`.
    pub fn customer(&self, number: usize, rng: &mut impl Rng) -> GeneratedUser {
        let full_name: String = Name().fake_with_rng(rng);

        GeneratedUser {
            id: Uuid::new_v4(),
            email: self.email(&format!("customer{number}")),
            full_name,
            phone: Some(generate_phone(rng)),
            password_hash: self.customer_hash.clone(),
            role: UserRole::Customer,
        }
    }

    /// Generates `count` customers numbered from `first_number` upward.
    pub fn customers(
        &self,
        first_number: usize,
        count: usize,
        rng: &mut impl Rng,
    ) -> Vec<GeneratedUser> {
        (first_number..first_number + count)
            .map(|n| self.customer(n, rng))
            .collect()
    }

    /// Generates the owner of a category's `number`-th vendor, with login
    /// `{category}{number}@{domain}`.
    pub fn vendor_owner(
        &self,
        category: VendorCategory,
        number: usize,
        rng: &mut impl Rng,
    ) -> GeneratedUser {
        let first = VENDOR_FIRST_NAMES.choose(rng).copied().unwrap_or("Alex");
        let login = format!("{}{number}", category.as_str().to_lowercase());

        GeneratedUser {
            id: Uuid::new_v4(),
            full_name: format!("{first} {}", category.display_name()),
            email: self.email(&login),
            phone: Some(generate_phone(rng)),
            password_hash: self.vendor_hash.clone(),
            role: UserRole::Vendor,
        }
    }

    fn email(&self, login: &str) -> String {
        format!("{login}@{}", self.config.email_domain)
    }
}

fn generate_phone(rng: &mut impl Rng) -> String {
    format!("+1555{}", rng.gen_range(100_000..=999_999))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_customer() {
        let user_gen = UserGenerator::new().unwrap();
        let mut rng = rand::thread_rng();
        let user = user_gen.customer(7, &mut rng);

        assert!(!user.full_name.is_empty());
        assert_eq!(user.email, "customer7@example.com");
        assert_eq!(user.role, UserRole::Customer);
        assert!(user.phone.as_deref().unwrap().starts_with("+1555"));
        assert!(bcrypt::verify("customer123", &user.password_hash).unwrap());
    }

    #[test]
    fn test_generate_customers_numbered() {
        let user_gen = UserGenerator::new().unwrap();
        let mut rng = rand::thread_rng();
        let users = user_gen.customers(3, 25, &mut rng);

        assert_eq!(users.len(), 25);
        assert_eq!(users[0].email, "customer3@example.com");
        assert_eq!(users[24].email, "customer27@example.com");

        let ids: HashSet<_> = users.iter().map(|u| u.id).collect();
        let emails: HashSet<_> = users.iter().map(|u| u.email.clone()).collect();
        assert_eq!(ids.len(), 25);
        assert_eq!(emails.len(), 25);
    }

    #[test]
    fn test_admin_and_vendor_owner() {
        let user_gen = UserGenerator::new().unwrap();
        let mut rng = rand::thread_rng();

        let admin = user_gen.admin();
        assert_eq!(admin.role, UserRole::Admin);
        assert_eq!(admin.email, "admin@happyhappenings.com");
        assert!(bcrypt::verify("admin123", &admin.password_hash).unwrap());

        let owner = user_gen.vendor_owner(VendorCategory::Catering, 2, &mut rng);
        assert_eq!(owner.role, UserRole::Vendor);
        assert!(owner.full_name.ends_with("Catering"));
        assert_eq!(owner.email, "catering2@example.com");
        assert!(bcrypt::verify("vendor123", &owner.password_hash).unwrap());

        let owner = user_gen.vendor_owner(VendorCategory::Transportation, 1, &mut rng);
        assert_eq!(owner.email, "transportation1@example.com");
    }

    #[test]
    fn test_custom_email_domain() {
        let user_gen = UserGenerator::with_config(UserGenConfig {
            email_domain: "demo.test".to_string(),
            ..Default::default()
        })
        .unwrap();
        let mut rng = rand::thread_rng();

        assert_eq!(user_gen.customer(1, &mut rng).email, "customer1@demo.test");
    }
}
