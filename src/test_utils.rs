//! Shared test utilities for Marmita Connect.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test accounts, meals and orders with sensible defaults.

use crate::{
    core::{order, user::load_user},
    entities::{meal, user},
    errors::Result,
    models::{Order, OrderLine, User, UserRole},
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

async fn insert_test_user(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
    role: UserRole,
    balance: f64,
) -> Result<User> {
    let model = user::ActiveModel {
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        password_hash: Set(None),
        role: Set(role.as_str().to_string()),
        avatar_url: Set(None),
        address: Set(None),
        balance: Set(balance),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    load_user(db, model).await
}

/// Creates a client account without a password.
///
/// # Defaults
/// * `name`: "Test Client"
/// * no payment methods
pub async fn create_test_client(db: &DatabaseConnection, email: &str) -> Result<User> {
    insert_test_user(db, "Test Client", email, UserRole::Client, 0.0).await
}

/// Creates a cook account without a password and with the given wallet balance.
pub async fn create_test_cook(db: &DatabaseConnection, email: &str, balance: f64) -> Result<User> {
    insert_test_user(db, "Test Cook", email, UserRole::Cook, balance).await
}

/// Creates an available meal for `cook_id`.
///
/// Inserts directly so tests can set up meals without going through validation.
pub async fn create_test_meal(
    db: &DatabaseConnection,
    cook_id: i64,
    title: &str,
    price: f64,
) -> Result<meal::Model> {
    meal::ActiveModel {
        cook_id: Set(cook_id),
        cook_name: Set("Test Cook".to_string()),
        title: Set(title.to_string()),
        description: Set(format!("{title} description")),
        price: Set(price),
        image_url: Set(String::new()),
        available: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Sets up a client, a cook with an empty wallet and one pending order between them.
/// Returns (client, cook, order) for order-related tests.
///
/// # Defaults
/// * one "Feijoada Fit" at 28.90, quantity 1
pub async fn create_test_order_setup(db: &DatabaseConnection) -> Result<(User, User, Order)> {
    let client = create_test_client(db, "client@test.com").await?;
    let cook = create_test_cook(db, "cook@test.com", 0.0).await?;
    let meal = create_test_meal(db, cook.id, "Feijoada Fit", 28.90).await?;
    let order = order::create_order(
        db,
        client.id,
        cook.id,
        &[OrderLine {
            meal_id: meal.id,
            quantity: 1,
        }],
        None,
    )
    .await?;
    Ok((client, cook, order))
}
