//! Order business logic - Checkout and the order lifecycle.
//!
//! Checkout snapshots the ordered meals, computes the total once and credits the cook
//! in the same database transaction that inserts the order. Status changes go through
//! [`OrderStatus::transition`], which decides both whether the jump exists and which
//! party may make it. Cancelling reverses the sale.

use crate::{
    core::{
        notification::notify,
        status::{OrderStatus, Party},
        user::find_user_model,
        wallet::{adjust_balance_atomic, record_transaction},
    },
    entities::{Meal, Order as OrderEntity, order, user},
    errors::{Error, Result},
    models::{Order, OrderItem, OrderLine, TransactionKind, TransactionStatus, UserRole, items_total},
};
use rand::Rng;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::ops::Range;
use tracing::{debug, info};

/// Range order numbers are drawn from.
pub const ORDER_ID_RANGE: Range<i64> = 10_000..99_999;

const MAX_ID_ATTEMPTS: usize = 32;

async fn find_order<C>(db: &C, order_id: i64) -> Result<order::Model>
where
    C: ConnectionTrait,
{
    OrderEntity::find_by_id(order_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Order", order_id))
}

/// Draws a free order number from `range`, giving up after [`MAX_ID_ATTEMPTS`] taken ones.
async fn draw_order_id<C>(db: &C, range: Range<i64>) -> Result<i64>
where
    C: ConnectionTrait,
{
    for _ in 0..MAX_ID_ATTEMPTS {
        let candidate = rand::thread_rng().gen_range(range.clone());
        if OrderEntity::find_by_id(candidate).one(db).await?.is_none() {
            return Ok(candidate);
        }
        debug!(candidate, "Order id already taken, drawing again");
    }
    Err(Error::OperationFailed(
        "could not allocate a free order id".to_string(),
    ))
}

fn check_lines(lines: &[OrderLine]) -> Result<()> {
    if lines.is_empty() {
        return Err(Error::validation("An order needs at least one item"));
    }
    if let Some(line) = lines.iter().find(|line| line.quantity == 0) {
        return Err(Error::validation(format!(
            "Quantity for meal {} must be at least 1",
            line.meal_id
        )));
    }
    Ok(())
}

/// Resolves each line against the cook's current meals and freezes it.
async fn snapshot_items<C>(db: &C, cook: &user::Model, lines: &[OrderLine]) -> Result<Vec<OrderItem>>
where
    C: ConnectionTrait,
{
    let mut items = Vec::with_capacity(lines.len());
    for (line_id, line) in (1u32..).zip(lines) {
        let meal = Meal::find_by_id(line.meal_id)
            .one(db)
            .await?
            .ok_or_else(|| Error::not_found("Meal", line.meal_id))?;
        if meal.cook_id != cook.id {
            return Err(Error::validation(format!(
                "Meal {} is not offered by {}",
                meal.id, cook.name
            )));
        }
        if !meal.available {
            return Err(Error::validation(format!("Meal '{}' is unavailable", meal.title)));
        }
        items.push(OrderItem {
            id: line_id,
            meal_id: meal.id,
            meal_title: meal.title,
            quantity: line.quantity,
            unit_price: meal.price,
        });
    }
    Ok(items)
}

/// Prices a checkout without placing it.
///
/// Applies the same checks as [`create_order`] to the lines and the cook.
pub async fn quote_order(
    db: &DatabaseConnection,
    cook_id: i64,
    lines: &[OrderLine],
) -> Result<Vec<OrderItem>> {
    check_lines(lines)?;
    let cook = find_user_model(db, cook_id).await?;
    if cook.role != UserRole::Cook.as_str() {
        return Err(Error::validation(format!("user {cook_id} is not a cook")));
    }
    snapshot_items(db, &cook, lines).await
}

/// Places an order from `client_id` to `cook_id`.
///
/// Every line is resolved against the current meal catalogue and frozen into the order.
/// Inside one database transaction the order is inserted as `pending`, the cook's balance
/// is credited with the total, a completed deposit is recorded and the cook is notified.
///
/// # Errors
/// Returns an error if:
/// - There are no lines or a line has quantity zero
/// - The client or cook does not exist, or either has the wrong role
/// - A meal does not exist, belongs to another cook or is unavailable
/// - Any step of the cascade fails (nothing is kept in that case)
pub async fn create_order(
    db: &DatabaseConnection,
    client_id: i64,
    cook_id: i64,
    lines: &[OrderLine],
    payment_method_label: Option<String>,
) -> Result<Order> {
    check_lines(lines)?;

    let txn = db.begin().await?;

    let client = find_user_model(&txn, client_id).await?;
    if client.role != UserRole::Client.as_str() {
        return Err(Error::forbidden("only clients can place orders"));
    }
    let cook = find_user_model(&txn, cook_id).await?;
    if cook.role != UserRole::Cook.as_str() {
        return Err(Error::validation(format!("user {cook_id} is not a cook")));
    }

    let items = snapshot_items(&txn, &cook, lines).await?;
    let total = items_total(&items);

    let order_id = draw_order_id(&txn, ORDER_ID_RANGE).await?;
    let model = order::ActiveModel {
        id: Set(order_id),
        client_id: Set(client.id),
        client_name: Set(client.name.clone()),
        cook_id: Set(cook.id),
        cook_name: Set(cook.name),
        status: Set(OrderStatus::Pending.as_str().to_string()),
        total: Set(total),
        items: Set(serde_json::to_string(&items)?),
        payment_method_label: Set(payment_method_label),
        created_at: Set(chrono::Utc::now()),
    }
    .insert(&txn)
    .await?;

    adjust_balance_atomic(&txn, cook_id, total).await?;
    record_transaction(
        &txn,
        cook_id,
        TransactionKind::Deposit,
        TransactionStatus::Completed,
        total,
        format!("Sale order #{order_id}"),
        Some(order_id),
    )
    .await?;
    notify(
        &txn,
        cook_id,
        format!("New order #{order_id} from {}", client.name),
        Some(format!("/orders/{order_id}")),
    )
    .await?;

    txn.commit().await?;

    info!(order_id, client_id, cook_id, total, "Order placed");
    Order::try_from(model)
}

/// Retrieves a specific order by its number.
pub async fn get_order_by_id(db: &DatabaseConnection, order_id: i64) -> Result<Option<Order>> {
    OrderEntity::find_by_id(order_id)
        .one(db)
        .await?
        .map(Order::try_from)
        .transpose()
}

/// Retrieves the orders a user takes part in, newest number first.
///
/// `role` selects which side of the order `user_id` is matched against.
pub async fn get_orders_for_user(
    db: &DatabaseConnection,
    user_id: i64,
    role: UserRole,
) -> Result<Vec<Order>> {
    let column = match role {
        UserRole::Client => order::Column::ClientId,
        UserRole::Cook => order::Column::CookId,
    };

    OrderEntity::find()
        .filter(column.eq(user_id))
        .order_by_desc(order::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(Order::try_from)
        .collect()
}

/// Moves an order to `status` on behalf of `actor_id`.
///
/// The actor must be the order's client or cook, and the jump must be one that party
/// may make. The other side is notified. A cancellation debits the cook by the order
/// total and records a completed refund in the same database transaction.
///
/// # Errors
/// Returns an error if:
/// - The order does not exist
/// - The actor is not part of the order, or may not make this jump ([`Error::Forbidden`])
/// - The lifecycle has no such jump ([`Error::InvalidTransition`])
pub async fn update_order_status(
    db: &DatabaseConnection,
    order_id: i64,
    status: OrderStatus,
    actor_id: i64,
) -> Result<Order> {
    let txn = db.begin().await?;
    let current = find_order(&txn, order_id).await?;

    let party = if actor_id == current.cook_id {
        Party::Cook
    } else if actor_id == current.client_id {
        Party::Client
    } else {
        return Err(Error::forbidden(format!(
            "user {actor_id} is not part of order #{order_id}"
        )));
    };

    let from: OrderStatus = current.status.parse()?;
    let to = from.transition(status, party)?;

    let cook_id = current.cook_id;
    let client_id = current.client_id;
    let total = current.total;

    // The sale is reversed out of the wallet, which may already have been paid out
    if to == OrderStatus::Cancelled {
        let cook = find_user_model(&txn, cook_id).await?;
        if cook.balance < total {
            return Err(Error::InsufficientBalance {
                current: cook.balance,
                requested: total,
            });
        }
    }

    let mut active_model: order::ActiveModel = current.into();
    active_model.status = Set(to.as_str().to_string());
    let updated = active_model.update(&txn).await?;

    if to == OrderStatus::Cancelled {
        adjust_balance_atomic(&txn, cook_id, -total).await?;
        record_transaction(
            &txn,
            cook_id,
            TransactionKind::Refund,
            TransactionStatus::Completed,
            total,
            format!("Refund order #{order_id}"),
            Some(order_id),
        )
        .await?;
    }

    let recipient = match (to, party) {
        (OrderStatus::Delivered, _) | (OrderStatus::Cancelled, Party::Client) => cook_id,
        _ => client_id,
    };
    notify(
        &txn,
        recipient,
        format!("Order #{order_id} updated to: {to}"),
        Some(format!("/orders/{order_id}")),
    )
    .await?;

    txn.commit().await?;

    info!(order_id, %from, %to, %party, "Order status updated");
    Order::try_from(updated)
}
