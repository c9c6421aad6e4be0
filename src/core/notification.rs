//! Notification business logic.
//!
//! Notifications are emitted by the order module (new order, status changes) and only
//! ever change afterwards by being marked as read.

use crate::{
    entities::{Notification, notification},
    errors::{Error, Result},
};
use sea_orm::{PaginatorTrait, QueryOrder, Set, prelude::*};
use tracing::debug;

/// Appends an unread notification for `user_id`.
///
/// Takes any connection so order cascades can emit inside their database transaction.
pub async fn notify<C>(
    db: &C,
    user_id: i64,
    text: String,
    link: Option<String>,
) -> Result<notification::Model>
where
    C: ConnectionTrait,
{
    let model = notification::ActiveModel {
        user_id: Set(user_id),
        text: Set(text),
        read: Set(false),
        date: Set(chrono::Utc::now()),
        link: Set(link),
        ..Default::default()
    }
    .insert(db)
    .await?;
    debug!(user_id, notification_id = model.id, "Notification emitted");
    Ok(model)
}

/// Retrieves the notifications of a user, newest first.
pub async fn get_notifications(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<notification::Model>> {
    Notification::find()
        .filter(notification::Column::UserId.eq(user_id))
        .order_by_desc(notification::Column::Date)
        .order_by_desc(notification::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Counts the unread notifications of a user.
pub async fn unread_count(db: &DatabaseConnection, user_id: i64) -> Result<u64> {
    Notification::find()
        .filter(notification::Column::UserId.eq(user_id))
        .filter(notification::Column::Read.eq(false))
        .count(db)
        .await
        .map_err(Into::into)
}

/// Marks a notification as read. Marking it twice is harmless.
///
/// # Errors
/// Returns [`Error::NotFound`] if the notification does not exist.
pub async fn mark_notification_read(
    db: &DatabaseConnection,
    notification_id: i64,
) -> Result<notification::Model> {
    let current = Notification::find_by_id(notification_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Notification", notification_id))?;

    if current.read {
        return Ok(current);
    }

    let mut active_model: notification::ActiveModel = current.into();
    active_model.read = Set(true);
    active_model.update(db).await.map_err(Into::into)
}
