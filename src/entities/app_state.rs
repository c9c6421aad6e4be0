//! App state entity - Stores namespaced key-value pairs.
//! Used for the values the client keeps between runs outside the relational
//! tables: the current session and the UI theme.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// App state database model - stores JSON values under `marmita_*` keys
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "app_state")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Namespaced key (e.g. `"marmita_user"`)
    #[sea_orm(unique)]
    pub key: String,
    /// JSON-encoded value
    #[sea_orm(column_type = "Text")]
    pub value: String,
    /// When this value was last written
    pub updated_at: DateTimeUtc,
}

/// `AppState` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
