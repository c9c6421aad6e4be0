//! Namespaced key-value storage.
//!
//! Keeps the `get(key, default)` / `set(key, value)` contract of the browser store the
//! marketplace started with, on top of the `app_state` table. Values are stored as JSON.
//! Relational data lives in its own tables; this store only holds values that have no
//! table of their own, such as the current session and the theme.

use crate::{
    entities::{AppState, app_state},
    errors::Result,
    models::Theme,
};
use chrono::Utc;
use sea_orm::{Set, prelude::*};
use serde::{Serialize, de::DeserializeOwned};
use std::fmt;

/// Keys of the `marmita_*` namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// Users table
    Users,
    /// Meals table
    Meals,
    /// Orders table
    Orders,
    /// Chat messages table
    Messages,
    /// Wallet transactions table
    Transactions,
    /// Notifications table
    Notifications,
    /// Reviews table
    Reviews,
    /// Id of the logged-in user
    CurrentUser,
    /// UI theme
    Theme,
}

impl StorageKey {
    /// Every key of the namespace.
    pub const ALL: [Self; 9] = [
        Self::Users,
        Self::Meals,
        Self::Orders,
        Self::Messages,
        Self::Transactions,
        Self::Notifications,
        Self::Reviews,
        Self::CurrentUser,
        Self::Theme,
    ];

    /// Full namespaced key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Users => "marmita_users",
            Self::Meals => "marmita_meals",
            Self::Orders => "marmita_orders",
            Self::Messages => "marmita_messages",
            Self::Transactions => "marmita_transactions",
            Self::Notifications => "marmita_notifications",
            Self::Reviews => "marmita_reviews",
            Self::CurrentUser => "marmita_user",
            Self::Theme => "marmita_theme",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reads the value stored under `key`, or `default` if nothing is stored.
///
/// # Errors
/// Returns an error if the query fails or the stored JSON does not decode into `T`.
pub async fn get<C, T>(db: &C, key: StorageKey, default: T) -> Result<T>
where
    C: ConnectionTrait,
    T: DeserializeOwned,
{
    let stored = AppState::find()
        .filter(app_state::Column::Key.eq(key.as_str()))
        .one(db)
        .await?;

    match stored {
        Some(entry) => Ok(serde_json::from_str(&entry.value)?),
        None => Ok(default),
    }
}

/// Stores `value` under `key`, replacing any previous value.
pub async fn set<C, T>(db: &C, key: StorageKey, value: &T) -> Result<()>
where
    C: ConnectionTrait,
    T: Serialize + ?Sized,
{
    let encoded = serde_json::to_string(value)?;
    let now = Utc::now();

    let existing = AppState::find()
        .filter(app_state::Column::Key.eq(key.as_str()))
        .one(db)
        .await?;

    if let Some(entry) = existing {
        let mut active_model: app_state::ActiveModel = entry.into();
        active_model.value = Set(encoded);
        active_model.updated_at = Set(now);
        active_model.update(db).await?;
    } else {
        let new_entry = app_state::ActiveModel {
            key: Set(key.as_str().to_string()),
            value: Set(encoded),
            updated_at: Set(now),
            ..Default::default()
        };
        new_entry.insert(db).await?;
    }

    Ok(())
}

/// Removes whatever is stored under `key`.
pub async fn remove<C>(db: &C, key: StorageKey) -> Result<()>
where
    C: ConnectionTrait,
{
    AppState::delete_many()
        .filter(app_state::Column::Key.eq(key.as_str()))
        .exec(db)
        .await?;
    Ok(())
}

/// Id of the logged-in user, if any.
pub async fn current_session<C: ConnectionTrait>(db: &C) -> Result<Option<i64>> {
    get(db, StorageKey::CurrentUser, None).await
}

/// Records `user_id` as the logged-in user.
pub async fn set_current_session<C: ConnectionTrait>(db: &C, user_id: i64) -> Result<()> {
    set(db, StorageKey::CurrentUser, &Some(user_id)).await
}

/// Forgets the logged-in user.
pub async fn clear_session<C: ConnectionTrait>(db: &C) -> Result<()> {
    remove(db, StorageKey::CurrentUser).await
}

/// Current UI theme; light until one is chosen.
pub async fn theme<C: ConnectionTrait>(db: &C) -> Result<Theme> {
    get(db, StorageKey::Theme, Theme::default()).await
}

/// Persists the UI theme.
pub async fn set_theme<C: ConnectionTrait>(db: &C, theme: Theme) -> Result<()> {
    set(db, StorageKey::Theme, &theme).await
}
