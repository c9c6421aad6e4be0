//! Review queries. Reviews are read-only here; they arrive through seed data.

use crate::{
    entities::{Review, review},
    errors::Result,
};
use sea_orm::{QueryOrder, prelude::*};

/// Retrieves the reviews of a cook, newest first.
pub async fn get_cook_reviews(db: &DatabaseConnection, cook_id: i64) -> Result<Vec<review::Model>> {
    Review::find()
        .filter(review::Column::CookId.eq(cook_id))
        .order_by_desc(review::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Mean rating of a list of reviews, `None` when there are none.
#[must_use]
pub fn average_rating(reviews: &[review::Model]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }
    let sum: i64 = reviews.iter().map(|r| i64::from(r.rating)).sum();
    #[allow(clippy::cast_precision_loss)]
    Some(sum as f64 / reviews.len() as f64)
}
