//! Meal business logic - Handles all meal-related operations.
//!
//! This module provides functions for creating, retrieving, updating, toggling and deleting
//! meals. Every meal belongs to one cook whose name is copied onto the meal when it is
//! created. The public catalogue only shows available meals; a cook's own listing shows all
//! of them. All functions are async and return Result types for proper error handling.

use crate::{
    core::user::find_user_model,
    entities::{Meal, meal},
    errors::{Error, Result},
    models::{MealUpdate, NewMeal, UserRole},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::validation("Meal title cannot be empty"));
    }
    Ok(())
}

fn validate_price(price: f64) -> Result<()> {
    if price < 0.0 || !price.is_finite() {
        return Err(Error::InvalidAmount { amount: price });
    }
    Ok(())
}

async fn find_meal(db: &DatabaseConnection, meal_id: i64) -> Result<meal::Model> {
    Meal::find_by_id(meal_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Meal", meal_id))
}

/// Retrieves the public catalogue: every available meal, oldest first.
pub async fn get_available_meals(db: &DatabaseConnection) -> Result<Vec<meal::Model>> {
    Meal::find()
        .filter(meal::Column::Available.eq(true))
        .order_by_asc(meal::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves every meal of a cook, available or not.
pub async fn get_cook_meals(db: &DatabaseConnection, cook_id: i64) -> Result<Vec<meal::Model>> {
    Meal::find()
        .filter(meal::Column::CookId.eq(cook_id))
        .order_by_asc(meal::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific meal by its unique ID.
pub async fn get_meal_by_id(db: &DatabaseConnection, meal_id: i64) -> Result<Option<meal::Model>> {
    Meal::find_by_id(meal_id).one(db).await.map_err(Into::into)
}

/// Creates a meal for a cook, copying the cook's current name onto it.
///
/// # Errors
/// Returns an error if:
/// - The title is empty or whitespace-only
/// - The price is negative or not finite (NaN, infinity)
/// - The cook does not exist, or the account is not a cook
/// - The database insert operation fails
pub async fn create_meal(db: &DatabaseConnection, new_meal: NewMeal) -> Result<meal::Model> {
    validate_title(&new_meal.title)?;
    validate_price(new_meal.price)?;

    let cook = find_user_model(db, new_meal.cook_id).await?;
    if cook.role != UserRole::Cook.as_str() {
        return Err(Error::forbidden("only cooks can offer meals"));
    }

    let model = meal::ActiveModel {
        cook_id: Set(cook.id),
        cook_name: Set(cook.name),
        title: Set(new_meal.title.trim().to_string()),
        description: Set(new_meal.description),
        price: Set(new_meal.price),
        image_url: Set(new_meal.image_url),
        available: Set(new_meal.available),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(meal_id = model.id, cook_id = model.cook_id, "Meal created");
    Ok(model)
}

/// Merges the given fields into a meal.
///
/// # Errors
/// Returns an error if:
/// - A new title is empty or a new price is invalid
/// - The meal does not exist
/// - The database update operation fails
pub async fn update_meal(
    db: &DatabaseConnection,
    meal_id: i64,
    update: MealUpdate,
) -> Result<meal::Model> {
    if let Some(title) = &update.title {
        validate_title(title)?;
    }
    if let Some(price) = update.price {
        validate_price(price)?;
    }

    let mut active_model: meal::ActiveModel = find_meal(db, meal_id).await?.into();

    if let Some(title) = update.title {
        active_model.title = Set(title.trim().to_string());
    }
    if let Some(description) = update.description {
        active_model.description = Set(description);
    }
    if let Some(price) = update.price {
        active_model.price = Set(price);
    }
    if let Some(image_url) = update.image_url {
        active_model.image_url = Set(image_url);
    }
    if let Some(available) = update.available {
        active_model.available = Set(available);
    }

    active_model.update(db).await.map_err(Into::into)
}

/// Flips the availability of one meal.
///
/// # Errors
/// Returns [`Error::NotFound`] if the meal does not exist.
pub async fn toggle_meal_availability(
    db: &DatabaseConnection,
    meal_id: i64,
) -> Result<meal::Model> {
    let current = find_meal(db, meal_id).await?;
    let available = !current.available;

    let mut active_model: meal::ActiveModel = current.into();
    active_model.available = Set(available);
    let updated = active_model.update(db).await?;

    info!(meal_id, available, "Meal availability toggled");
    Ok(updated)
}

/// Deletes a meal. Orders keep their own snapshot of it.
///
/// # Errors
/// Returns [`Error::NotFound`] if the meal does not exist.
pub async fn delete_meal(db: &DatabaseConnection, meal_id: i64) -> Result<()> {
    let result = Meal::delete_by_id(meal_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found("Meal", meal_id));
    }
    info!(meal_id, "Meal deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn new_meal(cook_id: i64, title: &str, price: f64) -> NewMeal {
        NewMeal {
            cook_id,
            title: title.to_string(),
            description: String::new(),
            price,
            image_url: String::new(),
            available: true,
        }
    }

    #[tokio::test]
    async fn test_create_meal_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = create_meal(&db, new_meal(1, "   ", 10.0)).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let result = create_meal(&db, new_meal(1, "Feijoada", -1.0)).await;
        assert!(matches!(result, Err(Error::InvalidAmount { amount: -1.0 })));

        let result = create_meal(&db, new_meal(1, "Feijoada", f64::NAN)).await;
        assert!(matches!(result, Err(Error::InvalidAmount { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_meal_integration() -> Result<()> {
        let db = setup_test_db().await?;
        let cook = create_test_cook(&db, "chef@marmita.com", 0.0).await?;

        let meal = create_meal(&db, new_meal(cook.id, " Feijoada Fit ", 28.90)).await?;
        assert_eq!(meal.title, "Feijoada Fit");
        assert_eq!(meal.cook_name, cook.name);
        assert_eq!(meal.price, 28.90);
        assert!(meal.available);

        // Free meals are allowed
        let free = create_meal(&db, new_meal(cook.id, "Tasting", 0.0)).await?;
        assert_eq!(free.price, 0.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_meal_requires_cook() -> Result<()> {
        let db = setup_test_db().await?;
        let client = create_test_client(&db, "ana@marmita.com").await?;

        let result = create_meal(&db, new_meal(client.id, "Feijoada", 10.0)).await;
        assert!(matches!(result, Err(Error::Forbidden { .. })));

        let result = create_meal(&db, new_meal(999, "Feijoada", 10.0)).await;
        assert!(matches!(result, Err(Error::NotFound { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_catalogue_hides_unavailable_meals() -> Result<()> {
        let db = setup_test_db().await?;
        let cook = create_test_cook(&db, "chef@marmita.com", 0.0).await?;
        let visible = create_test_meal(&db, cook.id, "Feijoada Fit", 28.90).await?;
        let hidden = create_test_meal(&db, cook.id, "Bowl de Salmão", 35.50).await?;
        toggle_meal_availability(&db, hidden.id).await?;

        let catalogue = get_available_meals(&db).await?;
        assert_eq!(catalogue.len(), 1);
        assert_eq!(catalogue[0].id, visible.id);
        assert!(catalogue.iter().all(|meal| meal.available));

        // The cook still sees both
        let own = get_cook_meals(&db, cook.id).await?;
        assert_eq!(own.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_toggle_flips_exactly_one_meal() -> Result<()> {
        let db = setup_test_db().await?;
        let cook = create_test_cook(&db, "chef@marmita.com", 0.0).await?;
        let first = create_test_meal(&db, cook.id, "First", 10.0).await?;
        let second = create_test_meal(&db, cook.id, "Second", 12.0).await?;

        let toggled = toggle_meal_availability(&db, first.id).await?;
        assert!(!toggled.available);
        assert!(get_meal_by_id(&db, second.id).await?.unwrap().available);

        let toggled_back = toggle_meal_availability(&db, first.id).await?;
        assert!(toggled_back.available);

        let missing = toggle_meal_availability(&db, 999).await;
        assert!(matches!(missing, Err(Error::NotFound { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_meal_integration() -> Result<()> {
        let db = setup_test_db().await?;
        let cook = create_test_cook(&db, "chef@marmita.com", 0.0).await?;
        let meal = create_test_meal(&db, cook.id, "Original", 10.0).await?;

        let updated = update_meal(
            &db,
            meal.id,
            MealUpdate {
                price: Some(15.0),
                description: Some("Now with farofa".to_string()),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(updated.price, 15.0);
        assert_eq!(updated.description, "Now with farofa");
        assert_eq!(updated.title, "Original");

        let invalid = update_meal(
            &db,
            meal.id,
            MealUpdate {
                price: Some(-3.0),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(invalid, Err(Error::InvalidAmount { .. })));

        let missing = update_meal(&db, 999, MealUpdate::default()).await;
        assert!(matches!(missing, Err(Error::NotFound { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_meal() -> Result<()> {
        let db = setup_test_db().await?;
        let cook = create_test_cook(&db, "chef@marmita.com", 0.0).await?;
        let meal = create_test_meal(&db, cook.id, "Feijoada", 10.0).await?;

        delete_meal(&db, meal.id).await?;
        assert!(get_meal_by_id(&db, meal.id).await?.is_none());

        let again = delete_meal(&db, meal.id).await;
        assert!(matches!(again, Err(Error::NotFound { .. })));

        Ok(())
    }
}
