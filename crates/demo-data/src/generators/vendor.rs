//! Vendor profile and service menu generation.

use rand::Rng;
use rand::seq::SliceRandom;
use uuid::Uuid;

use happenings::models::VendorCategory;

use super::{GenConfigError, GeneratedUser, LOCATIONS, ServiceOffer, VendorOffer};

/// Generated vendor profile ready for database insertion.
#[derive(Debug, Clone)]
pub struct GeneratedVendor {
    pub id: Uuid,
    pub user_id: Uuid,
    pub business_name: String,
    pub category: VendorCategory,
    pub location: String,
    pub min_price: i32,
    pub max_price: i32,
    pub rating: f64,
    pub description: String,
    pub profile_img: Option<String>,
}

/// Generated service ready for database insertion.
#[derive(Debug, Clone)]
pub struct GeneratedService {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub title: String,
    pub description: String,
    pub price: i32,
}

impl GeneratedVendor {
    /// Bookable view of this vendor restricted to its own services.
    pub fn offer(&self, services: &[GeneratedService]) -> VendorOffer {
        VendorOffer {
            vendor_id: self.id,
            category: self.category,
            services: services
                .iter()
                .filter(|s| s.vendor_id == self.id)
                .map(|s| ServiceOffer {
                    id: s.id,
                    price: s.price,
                })
                .collect(),
        }
    }
}

/// Configuration for vendor generation.
#[derive(Debug, Clone)]
pub struct VendorGenConfig {
    /// Range for a vendor's cheapest price.
    pub min_price: (i32, i32),
    /// Range added to the cheapest price to get the most expensive one.
    pub price_spread: (i32, i32),
    /// Range of the initial rating before reviews exist.
    pub initial_rating: (f64, f64),
    /// Price step between consecutive services on the menu.
    pub service_price_step: (i32, i32),
}

impl Default for VendorGenConfig {
    fn default() -> Self {
        Self {
            min_price: (200, 1000),
            price_spread: (1000, 8000),
            initial_rating: (4.0, 5.0),
            service_price_step: (200, 800),
        }
    }
}

const BUSINESS_PREFIXES: &[&str] = &["Elite", "Premium", "Luxury", "Elegant", "Perfect"];

/// Generates vendor profiles and their services.
pub struct VendorGenerator {
    config: VendorGenConfig,
}

impl VendorGenerator {
    /// Creates a new vendor generator with default configuration.
    pub fn new() -> Self {
        Self {
            config: VendorGenConfig::default(),
        }
    }

    /// Creates a generator with custom configuration.
    pub fn with_config(config: VendorGenConfig) -> Result<Self, GenConfigError> {
        let ranges = [
            ("min_price", config.min_price),
            ("price_spread", config.price_spread),
            ("service_price_step", config.service_price_step),
        ];
        if let Some(&(name, _)) = ranges.iter().find(|(_, (lo, hi))| lo > hi) {
            return Err(GenConfigError::EmptyRange(name));
        }
        let (lo, hi) = config.initial_rating;
        if lo > hi {
            return Err(GenConfigError::EmptyRange("initial_rating"));
        }
        if lo < 1.0 || hi > 5.0 {
            return Err(GenConfigError::InitialRating(lo, hi));
        }
        Ok(Self { config })
    }

    /// Generates a vendor profile owned by `owner` together with its service menu.
    pub fn generate(
        &self,
        owner: &GeneratedUser,
        category: VendorCategory,
        rng: &mut impl Rng,
    ) -> (GeneratedVendor, Vec<GeneratedService>) {
        let id = Uuid::new_v4();
        let prefix = BUSINESS_PREFIXES.choose(rng).copied().unwrap_or("Perfect");
        let location = LOCATIONS.choose(rng).copied().unwrap_or("New York, NY");

        let (lo, hi) = self.config.min_price;
        let min_price = rng.gen_range(lo..=hi);
        let (lo, hi) = self.config.price_spread;
        let max_price = min_price + rng.gen_range(lo..=hi);
        let (lo, hi) = self.config.initial_rating;
        let rating = (rng.gen_range(lo..=hi) * 10.0).round() / 10.0;

        let vendor = GeneratedVendor {
            id,
            user_id: owner.id,
            business_name: format!("{prefix} {}", category.display_name()),
            category,
            location: location.to_string(),
            min_price,
            max_price,
            rating,
            description: format!(
                "Professional {} services for all types of events. We specialize in creating memorable experiences that exceed expectations.",
                category.display_name().to_lowercase()
            ),
            profile_img: profile_images(category).choose(rng).map(|url| url.to_string()),
        };

        let (lo, hi) = self.config.service_price_step;
        let services = service_titles(category)
            .iter()
            .enumerate()
            .map(|(j, title)| GeneratedService {
                id: Uuid::new_v4(),
                vendor_id: id,
                title: title.to_string(),
                description: format!(
                    "Professional {} service. Includes all necessary equipment and personnel for your event.",
                    title.to_lowercase()
                ),
                price: min_price + j as i32 * rng.gen_range(lo..=hi),
            })
            .collect();

        (vendor, services)
    }
}

impl Default for VendorGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Service menu offered by every vendor of a category, cheapest first.
pub fn service_titles(category: VendorCategory) -> &'static [&'static str] {
    match category {
        VendorCategory::Photography => &["Basic Package", "Premium Package", "Wedding Special"],
        VendorCategory::Catering => &["Buffet Style", "Plated Dinner", "Cocktail Reception"],
        VendorCategory::Music => &["DJ Services", "Live Band", "Ceremony Music"],
        VendorCategory::Venue => &["Main Hall", "Garden Package", "Full Venue Rental"],
        VendorCategory::Decoration => &["Basic Decoration", "Premium Decoration", "Luxury Package"],
        VendorCategory::Cake => &["Standard Cake", "Custom Design", "Dessert Table"],
        VendorCategory::Flowers => &["Bridal Package", "Ceremony Decor", "Reception Flowers"],
        VendorCategory::Dress => &["Designer Collection", "Custom Design", "Accessories Package"],
        VendorCategory::Makeup => &["Bridal Makeup", "Party Package", "Group Discount"],
        VendorCategory::Transportation => &["Luxury Car", "Limousine Service", "Party Bus"],
        VendorCategory::Other => &["Consultation", "Day-of Coordination", "Full Planning"],
    }
}

fn profile_images(category: VendorCategory) -> &'static [&'static str] {
    match category {
        VendorCategory::Photography => &[
            "https://images.unsplash.com/photo-1542038784456-1ea8e935640e",
            "https://images.unsplash.com/photo-1452587925148-ce544e77e70d",
            "https://images.unsplash.com/photo-1554048612-b6a482bc67e5",
            "https://images.unsplash.com/photo-1516035069371-29a1b244cc32",
        ],
        VendorCategory::Catering => &[
            "https://images.unsplash.com/photo-1555244162-803834f70033",
            "https://images.unsplash.com/photo-1414235077428-338989a2e8c0",
            "https://images.unsplash.com/photo-1587574293340-e0011c4e8ecf",
            "https://images.unsplash.com/photo-1528605248644-14dd04022da1",
        ],
        VendorCategory::Music => &[
            "https://images.unsplash.com/photo-1571266028253-6c4c86f9b2b2",
            "https://images.unsplash.com/photo-1468164016595-6108e4c60c8b",
            "https://images.unsplash.com/photo-1511671782779-c97d3d27a1d4",
            "https://images.unsplash.com/photo-1470225620780-dba8ba36b745",
        ],
        VendorCategory::Venue => &[
            "https://images.unsplash.com/photo-1519167758481-83f550bb49b3",
            "https://images.unsplash.com/photo-1464366400600-7168b8af9bc3",
            "https://images.unsplash.com/photo-1512800726707-7819aa645a98",
            "https://images.unsplash.com/photo-1604004555489-723a93d6ce74",
        ],
        VendorCategory::Decoration => &[
            "https://images.unsplash.com/photo-1529636798458-92182e662485",
            "https://images.unsplash.com/photo-1561128290-99e8b8e14e6a",
            "https://images.unsplash.com/photo-1510076857177-7470076d4098",
            "https://images.unsplash.com/photo-1530103862676-de8c9debad1d",
        ],
        VendorCategory::Cake => &[
            "https://images.unsplash.com/photo-1622467827417-bbe2237067a9",
            "https://images.unsplash.com/photo-1535141192574-5d4897c12636",
            "https://images.unsplash.com/photo-1614707267537-b85aaf00c4b7",
            "https://images.unsplash.com/photo-1464349095431-e9a21285b5c3",
        ],
        VendorCategory::Flowers => &[
            "https://images.unsplash.com/photo-1561181286-d3fee7d55364",
            "https://images.unsplash.com/photo-1563241527-3004b7be0ffd",
            "https://images.unsplash.com/photo-1572454591674-2739f30a2e2f",
            "https://images.unsplash.com/photo-1615680022647-99c397cbccae",
        ],
        VendorCategory::Dress => &[
            "https://images.unsplash.com/photo-1550005809-91ad75fb315f",
            "https://images.unsplash.com/photo-1550122658-8d9151cf7a60",
            "https://images.unsplash.com/photo-1600021956340-14a6b28571c3",
            "https://images.unsplash.com/photo-1566174053879-31528523f8cb",
        ],
        VendorCategory::Makeup => &[
            "https://images.unsplash.com/photo-1470259078422-826894b933aa",
            "https://images.unsplash.com/photo-1522337660859-02fbefca4702",
            "https://images.unsplash.com/photo-1487412947147-5cebf100ffc2",
            "https://images.unsplash.com/photo-1599687489901-3b0fa8c2568b",
        ],
        VendorCategory::Transportation => &[
            "https://images.unsplash.com/photo-1586803104882-abe1757369ce",
            "https://images.unsplash.com/photo-1511407397940-d57f68e81203",
            "https://images.unsplash.com/photo-1516055000302-a11419b061a9",
            "https://images.unsplash.com/photo-1652792722666-ffc93d982c2c",
        ],
        VendorCategory::Other => &[
            "https://images.unsplash.com/photo-1557555187-23d685287bc3",
            "https://images.unsplash.com/photo-1599689018002-8f235eae9293",
            "https://images.unsplash.com/photo-1496843916299-590492c751f4",
            "https://images.unsplash.com/photo-1517457373958-b7bdd4587205",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::UserGenerator;

    #[test]
    fn test_generate_vendor() {
        let user_gen = UserGenerator::new().unwrap();
        let vendor_gen = VendorGenerator::new();
        let mut rng = rand::thread_rng();

        for &category in VendorCategory::ALL {
            let owner = user_gen.vendor_owner(category, 1, &mut rng);
            let (vendor, services) = vendor_gen.generate(&owner, category, &mut rng);

            assert_eq!(vendor.user_id, owner.id);
            assert_eq!(vendor.category, category);
            assert!((200..=1000).contains(&vendor.min_price));
            assert!(vendor.max_price >= vendor.min_price + 1000);
            assert!((4.0..=5.0).contains(&vendor.rating));
            assert!(vendor.profile_img.is_some());

            assert_eq!(services.len(), 3);
            assert_eq!(services[0].price, vendor.min_price);
            for s in &services {
                assert_eq!(s.vendor_id, vendor.id);
                assert!(s.price >= vendor.min_price);
            }
        }
    }

    #[test]
    fn test_offer_keeps_own_services() {
        let user_gen = UserGenerator::new().unwrap();
        let vendor_gen = VendorGenerator::new();
        let mut rng = rand::thread_rng();

        let owner = user_gen.vendor_owner(VendorCategory::Cake, 1, &mut rng);
        let (cake, mut services) = vendor_gen.generate(&owner, VendorCategory::Cake, &mut rng);
        let (_, venue_services) = vendor_gen.generate(&owner, VendorCategory::Venue, &mut rng);
        services.extend(venue_services);

        let offer = cake.offer(&services);
        assert_eq!(offer.vendor_id, cake.id);
        assert_eq!(offer.category, VendorCategory::Cake);
        assert_eq!(offer.services.len(), 3);
    }

    #[test]
    fn test_rejects_inverted_ranges() {
        let config = VendorGenConfig {
            price_spread: (8000, 1000),
            ..Default::default()
        };
        assert!(matches!(
            VendorGenerator::with_config(config),
            Err(GenConfigError::EmptyRange("price_spread"))
        ));

        let config = VendorGenConfig {
            initial_rating: (4.5, 4.0),
            ..Default::default()
        };
        assert!(matches!(
            VendorGenerator::with_config(config),
            Err(GenConfigError::EmptyRange("initial_rating"))
        ));
    }

    #[test]
    fn test_rejects_initial_rating_out_of_bounds() {
        for initial_rating in [(4.0, 6.0), (0.5, 3.0)] {
            let config = VendorGenConfig {
                initial_rating,
                ..Default::default()
            };
            assert!(matches!(
                VendorGenerator::with_config(config),
                Err(GenConfigError::InitialRating(..))
            ));
        }
    }
}
