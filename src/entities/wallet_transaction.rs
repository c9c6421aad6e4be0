//! Wallet transaction entity - Ledger entries against a cook's balance.
//!
//! Each entry has a `user_id` (the cook), a `kind` (`deposit`, `withdrawal` or `refund`),
//! a positive `amount`, a `status` (`completed` or `pending`), a description and the
//! order it came from, if any.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Wallet transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Cook whose wallet this entry belongs to
    pub user_id: i64,
    /// `"deposit"`, `"withdrawal"` or `"refund"`
    #[serde(rename = "type")]
    pub kind: String,
    /// Always positive; the kind gives the direction
    pub amount: f64,
    /// `"completed"` or `"pending"`
    pub status: String,
    /// Human-readable description (e.g. "Sale order #12345")
    pub description: String,
    /// Order that produced the entry, for deposits and refunds
    pub order_id: Option<i64>,
    /// When the entry was recorded
    pub date: DateTimeUtc,
}

/// Defines relationships between `WalletTransaction` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction belongs to one cook
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
