//! Chat business logic - Per-order conversation between client and cook.

use crate::{
    core::user::find_user_model,
    entities::{Message, Order, message},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::debug;

/// Retrieves the conversation of an order, oldest first.
///
/// # Errors
/// Returns [`Error::NotFound`] if the order does not exist.
pub async fn get_messages(db: &DatabaseConnection, order_id: i64) -> Result<Vec<message::Model>> {
    Order::find_by_id(order_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Order", order_id))?;

    Message::find()
        .filter(message::Column::OrderId.eq(order_id))
        .order_by_asc(message::Column::Timestamp)
        .order_by_asc(message::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Appends a message to an order's conversation.
///
/// The store assigns the id and timestamp; the sender's current name is copied onto
/// the message.
///
/// # Errors
/// Returns an error if:
/// - The text is empty or whitespace-only
/// - The order or the sender does not exist
/// - The sender is neither the client nor the cook of the order
pub async fn send_message(
    db: &DatabaseConnection,
    order_id: i64,
    sender_id: i64,
    text: &str,
) -> Result<message::Model> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::validation("Message text cannot be empty"));
    }

    let order = Order::find_by_id(order_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Order", order_id))?;
    let sender = find_user_model(db, sender_id).await?;

    if sender.id != order.client_id && sender.id != order.cook_id {
        return Err(Error::forbidden(format!(
            "user {sender_id} is not part of order #{order_id}"
        )));
    }

    let model = message::ActiveModel {
        order_id: Set(order_id),
        sender_id: Set(sender.id),
        sender_name: Set(sender.name),
        text: Set(text.to_string()),
        timestamp: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    debug!(order_id, sender_id, message_id = model.id, "Message sent");
    Ok(model)
}
