//! User entity - Represents both marketplace roles (clients and cooks).
//!
//! The role column decides which role-specific data is meaningful: `balance` for cooks,
//! the `payment_methods` table for clients. Code outside the store works with
//! [`crate::models::User`], which turns this into a tagged variant.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name
    pub name: String,
    /// Login email, unique across all users
    #[sea_orm(unique)]
    pub email: String,
    /// Argon2 PHC string; `None` for accounts created through social login
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// `"client"` or `"cook"`
    pub role: String,
    /// Avatar image reference
    pub avatar_url: Option<String>,
    /// Delivery or kitchen address
    pub address: Option<String>,
    /// Wallet balance; only meaningful for cooks
    pub balance: f64,
    /// When the account was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A client has many payment methods
    #[sea_orm(has_many = "super::payment_method::Entity")]
    PaymentMethods,
    /// A cook has many meals
    #[sea_orm(has_many = "super::meal::Entity")]
    Meals,
    /// A cook has many wallet transactions
    #[sea_orm(has_many = "super::wallet_transaction::Entity")]
    WalletTransactions,
    /// A user has many notifications
    #[sea_orm(has_many = "super::notification::Entity")]
    Notifications,
}

impl Related<super::payment_method::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentMethods.def()
    }
}

impl Related<super::meal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Meals.def()
    }
}

impl Related<super::wallet_transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WalletTransactions.def()
    }
}

impl Related<super::notification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notifications.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
