//! Initial data seeding.
//!
//! Seeding only happens on a store without any account, so restarting the server never
//! duplicates or overwrites data. Everything is inserted in one database transaction.

use crate::{
    config::seed::SeedConfig,
    core::auth,
    entities::{User as UserEntity, meal, order, payment_method, review, user},
    errors::{Error, Result},
    models::{OrderItem, items_total},
};
use chrono::{Duration, Utc};
use sea_orm::{PaginatorTrait, Set, TransactionTrait, prelude::*};
use std::collections::HashMap;
use tracing::info;

/// Seeds `config` if the users table is empty.
///
/// Returns `true` when data was inserted.
///
/// # Errors
/// Returns an error if:
/// - A meal, order or review refers to an email that is not seeded
/// - An order line names a meal the cook does not offer
/// - Any insert fails (nothing is kept in that case)
pub async fn seed_initial_data(db: &DatabaseConnection, config: &SeedConfig) -> Result<bool> {
    if UserEntity::find().count(db).await? > 0 {
        info!("Users already present, skipping seed");
        return Ok(false);
    }

    let txn = db.begin().await?;
    let now = Utc::now();

    let mut users: HashMap<&str, user::Model> = HashMap::new();
    for seed_user in &config.users {
        let password_hash = match &seed_user.password {
            Some(password) => Some(auth::hash_password(password)?),
            None => None,
        };
        let model = user::ActiveModel {
            name: Set(seed_user.name.clone()),
            email: Set(seed_user.email.clone()),
            password_hash: Set(password_hash),
            role: Set(seed_user.role.as_str().to_string()),
            avatar_url: Set(seed_user.avatar_url.clone()),
            address: Set(seed_user.address.clone()),
            balance: Set(seed_user.balance),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for method in &seed_user.payment_methods {
            payment_method::ActiveModel {
                user_id: Set(model.id),
                kind: Set(method.kind.as_str().to_string()),
                brand: Set(method.brand.clone()),
                last4: Set(method.last4.clone()),
                label: Set(method.label.clone()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        users.insert(seed_user.email.as_str(), model);
    }

    let lookup = |email: &str| {
        users.get(email).ok_or_else(|| Error::Config {
            message: format!("Seed refers to unknown account '{email}'"),
        })
    };

    let mut meals: HashMap<(i64, &str), meal::Model> = HashMap::new();
    for seed_meal in &config.meals {
        let cook = lookup(&seed_meal.cook_email)?;
        let model = meal::ActiveModel {
            cook_id: Set(cook.id),
            cook_name: Set(cook.name.clone()),
            title: Set(seed_meal.title.clone()),
            description: Set(seed_meal.description.clone()),
            price: Set(seed_meal.price),
            image_url: Set(seed_meal.image_url.clone()),
            available: Set(seed_meal.available),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        meals.insert((cook.id, seed_meal.title.as_str()), model);
    }

    for seed_order in &config.orders {
        let client = lookup(&seed_order.client_email)?;
        let cook = lookup(&seed_order.cook_email)?;

        let mut items = Vec::with_capacity(seed_order.items.len());
        for (line_id, line) in (1u32..).zip(&seed_order.items) {
            let meal = meals
                .get(&(cook.id, line.meal_title.as_str()))
                .ok_or_else(|| Error::Config {
                    message: format!(
                        "Seed order #{} refers to unknown meal '{}'",
                        seed_order.id, line.meal_title
                    ),
                })?;
            items.push(OrderItem {
                id: line_id,
                meal_id: meal.id,
                meal_title: meal.title.clone(),
                quantity: line.quantity,
                unit_price: meal.price,
            });
        }

        order::ActiveModel {
            id: Set(seed_order.id),
            client_id: Set(client.id),
            client_name: Set(client.name.clone()),
            cook_id: Set(cook.id),
            cook_name: Set(cook.name.clone()),
            status: Set(seed_order.status.as_str().to_string()),
            total: Set(items_total(&items)),
            items: Set(serde_json::to_string(&items)?),
            payment_method_label: Set(seed_order.payment_method.clone()),
            created_at: Set(now - Duration::days(seed_order.days_ago)),
        }
        .insert(&txn)
        .await?;
    }

    for seed_review in &config.reviews {
        let cook = lookup(&seed_review.cook_email)?;
        if !(1..=5).contains(&seed_review.rating) {
            return Err(Error::Config {
                message: format!("Review rating {} is outside 1..=5", seed_review.rating),
            });
        }
        review::ActiveModel {
            cook_id: Set(cook.id),
            author_name: Set(seed_review.author_name.clone()),
            rating: Set(seed_review.rating),
            comment: Set(seed_review.comment.clone()),
            date: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;

    info!(
        users = config.users.len(),
        meals = config.meals.len(),
        orders = config.orders.len(),
        reviews = config.reviews.len(),
        "Seeded initial data"
    );
    Ok(true)
}
