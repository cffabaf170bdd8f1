//! Vendor rating aggregation.

use std::collections::HashMap;

use uuid::Uuid;

use super::GeneratedReview;

/// Rating shown for vendors nobody has reviewed yet.
pub const FALLBACK_VENDOR_RATING: f64 = 4.5;

/// Computes each vendor's rating as the mean of its review ratings.
///
/// Every vendor in `vendor_ids` gets an entry; vendors without reviews get
/// [`FALLBACK_VENDOR_RATING`]. Reviews of vendors not listed are ignored.
pub fn recompute_vendor_ratings(
    vendor_ids: impl IntoIterator<Item = Uuid>,
    reviews: &[GeneratedReview],
) -> HashMap<Uuid, f64> {
    let mut totals: HashMap<Uuid, (i64, i64)> = HashMap::new();
    for review in reviews {
        let entry = totals.entry(review.vendor_id).or_default();
        entry.0 += i64::from(review.rating);
        entry.1 += 1;
    }

    vendor_ids
        .into_iter()
        .map(|id| {
            let rating = match totals.get(&id) {
                Some(&(sum, count)) if count > 0 => sum as f64 / count as f64,
                _ => FALLBACK_VENDOR_RATING,
            };
            (id, rating)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn review(vendor_id: Uuid, rating: i32) -> GeneratedReview {
        GeneratedReview {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            vendor_id,
            event_id: Uuid::new_v4(),
            rating,
            review_text: "Great!".into(),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn test_mean_and_fallback() {
        let reviewed = Uuid::new_v4();
        let unreviewed = Uuid::new_v4();
        let reviews = vec![review(reviewed, 3), review(reviewed, 4), review(reviewed, 4)];

        let ratings = recompute_vendor_ratings([reviewed, unreviewed], &reviews);

        assert_eq!(ratings.len(), 2);
        assert!((ratings[&reviewed] - 11.0 / 3.0).abs() < 1e-9);
        assert_eq!(ratings[&unreviewed], FALLBACK_VENDOR_RATING);
    }

    #[test]
    fn test_unlisted_vendor_ignored() {
        let listed = Uuid::new_v4();
        let reviews = vec![review(Uuid::new_v4(), 5)];

        let ratings = recompute_vendor_ratings([listed], &reviews);

        assert_eq!(ratings.len(), 1);
        assert_eq!(ratings[&listed], FALLBACK_VENDOR_RATING);
    }
}
