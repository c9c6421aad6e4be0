//! Meal entity - A dish offered by one cook.
//!
//! Meals are hard-deleted by their cook. Visibility in the public catalogue is
//! gated by `available`; the cook's own listing shows every meal.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Meal database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "meals")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the meal
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning cook
    pub cook_id: i64,
    /// Cook name at the time the meal was created
    pub cook_name: String,
    /// Short title (e.g. "Feijoada Fit")
    pub title: String,
    /// Free-form description
    pub description: String,
    /// Unit price, never negative
    pub price: f64,
    /// Image reference
    pub image_url: String,
    /// Whether the meal is listed in the public catalogue
    pub available: bool,
}

/// Defines relationships between Meal and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each meal belongs to one cook
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CookId",
        to = "super::user::Column::Id"
    )]
    Cook,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cook.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
