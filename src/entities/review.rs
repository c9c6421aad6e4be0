//! Review entity - A client's rating of a cook. Read-only for the application.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Review database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reviews")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the review
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Reviewed cook
    pub cook_id: i64,
    /// Name of the client who wrote it
    pub author_name: String,
    /// Rating from 1 to 5
    pub rating: i32,
    /// Free-form comment
    pub comment: String,
    /// When the review was written
    pub date: DateTimeUtc,
}

/// `Review` only points at its cook
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
