//! Message entity - One chat line attached to an order. Append-only.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Chat message database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "messages")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the message
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Order the conversation belongs to
    pub order_id: i64,
    /// Author of the message
    pub sender_id: i64,
    /// Author name at the time of sending
    pub sender_name: String,
    /// Message body
    pub text: String,
    /// Assigned by the store when the message is appended
    pub timestamp: DateTimeUtc,
}

/// Defines relationships between Message and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each message belongs to one order
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id"
    )]
    Order,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
