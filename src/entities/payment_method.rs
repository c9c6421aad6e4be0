//! Payment method entity - A saved way for a client to pay at checkout.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payment method database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payment_methods")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the payment method
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning client
    pub user_id: i64,
    /// `"credit_card"`, `"pix"` or `"cash"`
    pub kind: String,
    /// Card brand (e.g. `"visa"`, `"mastercard"`)
    pub brand: Option<String>,
    /// Last four card digits
    pub last4: Option<String>,
    /// Label shown at checkout and copied onto orders
    pub label: String,
}

/// Defines relationships between `PaymentMethod` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each payment method belongs to one user
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
