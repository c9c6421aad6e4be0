//! Database configuration module for Marmita Connect.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs without hand-written SQL.

use crate::entities::{
    AppState, Meal, Message, Notification, Order, PaymentMethod, Review, User, WalletTransaction,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/marmita.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by `DATABASE_URL`.
///
/// Falls back to a local `SQLite` file if no environment variable is set. The parent
/// directory of a file-backed database is created when missing.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();

    if let Some(path) = database_url
        .strip_prefix("sqlite://")
        .map(|rest| rest.split('?').next().unwrap_or(rest))
        && let Some(parent) = std::path::Path::new(path).parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all tables, parents before children so foreign keys resolve.
///
/// Tables that already exist are left alone, so this is safe to run on every start.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut statements = vec![
        schema.create_table_from_entity(User),
        schema.create_table_from_entity(PaymentMethod),
        schema.create_table_from_entity(Meal),
        schema.create_table_from_entity(Order),
        schema.create_table_from_entity(Message),
        schema.create_table_from_entity(WalletTransaction),
        schema.create_table_from_entity(Notification),
        schema.create_table_from_entity(Review),
        schema.create_table_from_entity(AppState),
    ];

    for statement in &mut statements {
        statement.if_not_exists();
        db.execute(builder.build(&*statement)).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        app_state::Model as AppStateModel, meal::Model as MealModel,
        message::Model as MessageModel, notification::Model as NotificationModel,
        order::Model as OrderModel, payment_method::Model as PaymentMethodModel,
        review::Model as ReviewModel, user::Model as UserModel,
        wallet_transaction::Model as WalletTransactionModel,
    };
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<UserModel> = User::find().limit(1).all(&db).await?;
        let _: Vec<PaymentMethodModel> = PaymentMethod::find().limit(1).all(&db).await?;
        let _: Vec<MealModel> = Meal::find().limit(1).all(&db).await?;
        let _: Vec<OrderModel> = Order::find().limit(1).all(&db).await?;
        let _: Vec<MessageModel> = Message::find().limit(1).all(&db).await?;
        let _: Vec<WalletTransactionModel> = WalletTransaction::find().limit(1).all(&db).await?;
        let _: Vec<NotificationModel> = Notification::find().limit(1).all(&db).await?;
        let _: Vec<ReviewModel> = Review::find().limit(1).all(&db).await?;
        let _: Vec<AppStateModel> = AppState::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }
}
