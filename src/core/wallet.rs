//! Wallet business logic - Cook balances and their ledger.
//!
//! Balance changes always go through [`adjust_balance_atomic`], a single
//! `UPDATE users SET balance = balance + ?` statement, and are always paired with a
//! ledger entry written in the same database transaction.

use crate::{
    core::user::find_user_model,
    entities::{User as UserEntity, WalletTransaction, user, wallet_transaction},
    errors::{Error, Result},
    models::{TransactionKind, TransactionStatus, UserRole},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Adds `amount_delta` to a user's balance in one statement and returns the updated row.
///
/// Avoids the read-modify-write race: two concurrent credits both land.
///
/// # Arguments
/// * `db` - Database connection or transaction
/// * `user_id` - ID of the user to update
/// * `amount_delta` - Amount to add to the balance (use negative for subtraction)
pub async fn adjust_balance_atomic<C>(db: &C, user_id: i64, amount_delta: f64) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    use sea_orm::sea_query::Expr;

    find_user_model(db, user_id).await?;

    UserEntity::update_many()
        .col_expr(
            user::Column::Balance,
            Expr::col(user::Column::Balance).add(amount_delta),
        )
        .filter(user::Column::Id.eq(user_id))
        .exec(db)
        .await?;

    find_user_model(db, user_id).await
}

/// Appends a ledger entry for `user_id`.
pub async fn record_transaction<C>(
    db: &C,
    user_id: i64,
    kind: TransactionKind,
    status: TransactionStatus,
    amount: f64,
    description: String,
    order_id: Option<i64>,
) -> Result<wallet_transaction::Model>
where
    C: ConnectionTrait,
{
    wallet_transaction::ActiveModel {
        user_id: Set(user_id),
        kind: Set(kind.as_str().to_string()),
        amount: Set(amount),
        status: Set(status.as_str().to_string()),
        description: Set(description),
        order_id: Set(order_id),
        date: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Retrieves a cook's ledger, newest first.
pub async fn get_wallet_transactions(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<wallet_transaction::Model>> {
    WalletTransaction::find()
        .filter(wallet_transaction::Column::UserId.eq(user_id))
        .order_by_desc(wallet_transaction::Column::Date)
        .order_by_desc(wallet_transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Debits `amount` from a cook's balance and records a pending withdrawal.
///
/// Nothing is written when the request is rejected.
///
/// # Errors
/// - [`Error::InvalidAmount`] if `amount` is not a positive finite number
/// - [`Error::NotFound`] if the user does not exist
/// - [`Error::Forbidden`] if the user is not a cook
/// - [`Error::InsufficientBalance`] if `amount` exceeds the balance
pub async fn request_withdrawal(
    db: &DatabaseConnection,
    user_id: i64,
    amount: f64,
) -> Result<wallet_transaction::Model> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidAmount { amount });
    }

    let txn = db.begin().await?;

    let cook = find_user_model(&txn, user_id).await?;
    if cook.role != UserRole::Cook.as_str() {
        return Err(Error::forbidden("only cooks have a wallet"));
    }
    if amount > cook.balance {
        return Err(Error::InsufficientBalance {
            current: cook.balance,
            requested: amount,
        });
    }

    let updated = adjust_balance_atomic(&txn, user_id, -amount).await?;
    let entry = record_transaction(
        &txn,
        user_id,
        TransactionKind::Withdrawal,
        TransactionStatus::Pending,
        amount,
        "Withdrawal requested".to_string(),
        None,
    )
    .await?;

    txn.commit().await?;
    info!(user_id, amount, balance = updated.balance, "Withdrawal requested");
    Ok(entry)
}
