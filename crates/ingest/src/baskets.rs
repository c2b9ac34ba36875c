//! Basket construction: binarize ratings into per-user purchase sets.

use lookbook_core::{BasketMap, ProductId, UserId};

use crate::ratings::RatingRecord;

/// Build the user basket map from rating rows. A rating at or above
/// `rating_threshold` counts as a purchase. Every user that appears in the
/// input becomes a known user, even when all of their ratings fall below the
/// threshold; those users get an empty basket rather than vanishing.
pub fn build_baskets(records: &[RatingRecord], rating_threshold: f64) -> BasketMap {
    let mut baskets = BasketMap::new();

    for record in records {
        let basket = baskets.entry(UserId(record.user_id));
        if record.rating >= rating_threshold {
            basket.insert(ProductId::new(record.product_name.clone()));
        }
    }

    tracing::debug!(users = baskets.len(), threshold = rating_threshold, "baskets built");
    baskets
}
