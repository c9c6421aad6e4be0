//! Order entity - A checkout from one client to one cook.
//!
//! `items` holds the JSON-serialized snapshot of the ordered lines and `total` the sum
//! computed at checkout; neither is written again after insert. Ids are drawn at random
//! by the order logic, so the primary key is not auto-incremented.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    /// Order number, drawn from `[10000, 99999)`
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    /// Ordering client
    pub client_id: i64,
    /// Client name at checkout
    pub client_name: String,
    /// Cook preparing the order
    pub cook_id: i64,
    /// Cook name at checkout
    pub cook_name: String,
    /// Lifecycle status, see [`crate::core::status::OrderStatus`]
    pub status: String,
    /// Sum of `quantity * unit_price` over the snapshot
    pub total: f64,
    /// JSON array of [`crate::models::OrderItem`]
    #[sea_orm(column_type = "Text")]
    pub items: String,
    /// Label of the payment method chosen at checkout
    pub payment_method_label: Option<String>,
    /// When the order was placed
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Order and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One order has many chat messages
    #[sea_orm(has_many = "super::message::Entity")]
    Messages,
}

impl Related<super::message::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Messages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
