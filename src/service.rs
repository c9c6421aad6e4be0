//! Marketplace service - the client-facing API over the core modules.
//!
//! [`MarketplaceService`] bundles a database connection with optional simulated network
//! latency, so a UI can be exercised against realistic response times without a real
//! remote backend. Every operation pauses for its latency (when enabled) and then
//! delegates to a function in [`crate::core`].

use crate::{
    core::{chat, meal, notification, order, review, status::OrderStatus, storage, user, wallet},
    entities::{
        meal as meal_entity, message, notification as notification_entity,
        review as review_entity, wallet_transaction,
    },
    errors::Result,
    models::{
        MealUpdate, NewMeal, NewPaymentMethod, Order, OrderItem, OrderLine, Theme, User, UserRole,
        UserUpdate,
    },
};
use sea_orm::DatabaseConnection;
use std::time::Duration;
use tracing::{debug, instrument};

/// Artificial delay applied before each service operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulatedLatency {
    enabled: bool,
}

impl SimulatedLatency {
    /// Every operation sleeps for its configured delay.
    #[must_use]
    pub const fn enabled() -> Self {
        Self { enabled: true }
    }

    /// Operations return immediately.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { enabled: false }
    }

    /// `enabled()` when `on`, `disabled()` otherwise.
    #[must_use]
    pub const fn from_flag(on: bool) -> Self {
        Self { enabled: on }
    }

    /// Whether delays are applied.
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        self.enabled
    }

    async fn pause(self, millis: u64) {
        if self.enabled && millis > 0 {
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }
    }
}

/// Marketplace operations for clients and cooks.
#[derive(Debug)]
pub struct MarketplaceService {
    db: DatabaseConnection,
    latency: SimulatedLatency,
}

impl MarketplaceService {
    /// Wraps a connection whose tables already exist.
    #[must_use]
    pub const fn new(db: DatabaseConnection, latency: SimulatedLatency) -> Self {
        Self { db, latency }
    }

    /// The underlying connection.
    #[must_use]
    pub const fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    // Session

    /// Logs in and records the session.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: Option<&str>) -> Result<User> {
        self.latency.pause(500).await;
        let account = user::login(&self.db, email, password).await?;
        storage::set_current_session(&self.db, account.id).await?;
        Ok(account)
    }

    /// Creates an account and records the session.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> Result<User> {
        self.latency.pause(500).await;
        let account = user::register(&self.db, name, email, password, role).await?;
        storage::set_current_session(&self.db, account.id).await?;
        Ok(account)
    }

    /// Signs in through a social provider and records the session.
    #[instrument(skip(self))]
    pub async fn social_login(&self, provider: &str) -> Result<User> {
        self.latency.pause(800).await;
        let account = user::social_login(&self.db, provider).await?;
        storage::set_current_session(&self.db, account.id).await?;
        Ok(account)
    }

    /// Clears the recorded session.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        storage::clear_session(&self.db).await
    }

    /// The logged-in user, if the session points at an existing account.
    ///
    /// A session whose account no longer exists is cleared.
    #[instrument(skip(self))]
    pub async fn current_user(&self) -> Result<Option<User>> {
        let Some(user_id) = storage::current_session(&self.db).await? else {
            return Ok(None);
        };
        let account = user::get_user_by_id(&self.db, user_id).await?;
        if account.is_none() {
            debug!(user_id, "Session points at a missing account, clearing it");
            storage::clear_session(&self.db).await?;
        }
        Ok(account)
    }

    /// Stored UI theme.
    pub async fn theme(&self) -> Result<Theme> {
        storage::theme(&self.db).await
    }

    /// Stores the UI theme.
    pub async fn set_theme(&self, theme: Theme) -> Result<()> {
        storage::set_theme(&self.db, theme).await
    }

    // Profiles

    /// Merges profile fields into a user.
    #[instrument(skip(self))]
    pub async fn update_user(&self, user_id: i64, update: UserUpdate) -> Result<User> {
        self.latency.pause(400).await;
        user::update_user(&self.db, user_id, update).await
    }

    /// Saves a payment method for a client.
    #[instrument(skip(self))]
    pub async fn add_payment_method(
        &self,
        user_id: i64,
        method: NewPaymentMethod,
    ) -> Result<User> {
        self.latency.pause(300).await;
        user::add_payment_method(&self.db, user_id, method).await
    }

    /// Any user by id.
    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: i64) -> Result<Option<User>> {
        user::get_user_by_id(&self.db, user_id).await
    }

    /// A cook by id; `None` for unknown ids and for clients.
    #[instrument(skip(self))]
    pub async fn get_cook_by_id(&self, cook_id: i64) -> Result<Option<User>> {
        self.latency.pause(200).await;
        user::get_cook_by_id(&self.db, cook_id).await
    }

    /// Reviews of a cook.
    #[instrument(skip(self))]
    pub async fn get_cook_reviews(&self, cook_id: i64) -> Result<Vec<review_entity::Model>> {
        self.latency.pause(300).await;
        review::get_cook_reviews(&self.db, cook_id).await
    }

    // Wallet

    /// Ledger of a cook, newest first.
    #[instrument(skip(self))]
    pub async fn get_wallet_transactions(
        &self,
        user_id: i64,
    ) -> Result<Vec<wallet_transaction::Model>> {
        self.latency.pause(300).await;
        wallet::get_wallet_transactions(&self.db, user_id).await
    }

    /// Debits a cook's wallet and records a pending withdrawal.
    #[instrument(skip(self))]
    pub async fn request_withdrawal(
        &self,
        user_id: i64,
        amount: f64,
    ) -> Result<wallet_transaction::Model> {
        self.latency.pause(500).await;
        wallet::request_withdrawal(&self.db, user_id, amount).await
    }

    // Notifications

    /// Notifications of a user, newest first.
    #[instrument(skip(self))]
    pub async fn get_notifications(&self, user_id: i64) -> Result<Vec<notification_entity::Model>> {
        self.latency.pause(200).await;
        notification::get_notifications(&self.db, user_id).await
    }

    /// Number of unread notifications of a user.
    #[instrument(skip(self))]
    pub async fn unread_notification_count(&self, user_id: i64) -> Result<u64> {
        notification::unread_count(&self.db, user_id).await
    }

    /// Marks a notification as read.
    #[instrument(skip(self))]
    pub async fn mark_notification_read(
        &self,
        notification_id: i64,
    ) -> Result<notification_entity::Model> {
        notification::mark_notification_read(&self.db, notification_id).await
    }

    // Meals

    /// The public catalogue: available meals only.
    #[instrument(skip(self))]
    pub async fn get_meals(&self) -> Result<Vec<meal_entity::Model>> {
        self.latency.pause(300).await;
        meal::get_available_meals(&self.db).await
    }

    /// A meal by id, available or not.
    #[instrument(skip(self))]
    pub async fn get_meal(&self, meal_id: i64) -> Result<Option<meal_entity::Model>> {
        meal::get_meal_by_id(&self.db, meal_id).await
    }

    /// All meals of a cook.
    #[instrument(skip(self))]
    pub async fn get_cook_meals(&self, cook_id: i64) -> Result<Vec<meal_entity::Model>> {
        self.latency.pause(300).await;
        meal::get_cook_meals(&self.db, cook_id).await
    }

    /// Adds a meal to a cook's menu.
    #[instrument(skip(self))]
    pub async fn create_meal(&self, new_meal: NewMeal) -> Result<meal_entity::Model> {
        self.latency.pause(500).await;
        meal::create_meal(&self.db, new_meal).await
    }

    /// Merges fields into a meal.
    #[instrument(skip(self))]
    pub async fn update_meal(&self, meal_id: i64, update: MealUpdate) -> Result<meal_entity::Model> {
        self.latency.pause(400).await;
        meal::update_meal(&self.db, meal_id, update).await
    }

    /// Flips a meal's availability.
    #[instrument(skip(self))]
    pub async fn toggle_meal_availability(&self, meal_id: i64) -> Result<meal_entity::Model> {
        self.latency.pause(200).await;
        meal::toggle_meal_availability(&self.db, meal_id).await
    }

    /// Removes a meal.
    #[instrument(skip(self))]
    pub async fn delete_meal(&self, meal_id: i64) -> Result<()> {
        self.latency.pause(300).await;
        meal::delete_meal(&self.db, meal_id).await
    }

    // Orders

    /// Orders of a user on the given side, newest number first.
    #[instrument(skip(self))]
    pub async fn get_orders(&self, user_id: i64, role: UserRole) -> Result<Vec<Order>> {
        self.latency.pause(400).await;
        order::get_orders_for_user(&self.db, user_id, role).await
    }

    /// An order by number.
    #[instrument(skip(self))]
    pub async fn get_order(&self, order_id: i64) -> Result<Option<Order>> {
        self.latency.pause(200).await;
        order::get_order_by_id(&self.db, order_id).await
    }

    /// Prices a checkout without placing it.
    #[instrument(skip(self))]
    pub async fn quote_order(&self, cook_id: i64, lines: &[OrderLine]) -> Result<Vec<OrderItem>> {
        order::quote_order(&self.db, cook_id, lines).await
    }

    /// Places an order and credits the cook.
    #[instrument(skip(self))]
    pub async fn create_order(
        &self,
        client_id: i64,
        cook_id: i64,
        lines: &[OrderLine],
        payment_method_label: Option<String>,
    ) -> Result<Order> {
        self.latency.pause(600).await;
        order::create_order(&self.db, client_id, cook_id, lines, payment_method_label).await
    }

    /// Moves an order along its lifecycle on behalf of `actor_id`.
    #[instrument(skip(self))]
    pub async fn update_order_status(
        &self,
        order_id: i64,
        status: OrderStatus,
        actor_id: i64,
    ) -> Result<Order> {
        self.latency.pause(300).await;
        order::update_order_status(&self.db, order_id, status, actor_id).await
    }

    // Chat

    /// Conversation of an order, oldest first.
    #[instrument(skip(self))]
    pub async fn get_messages(&self, order_id: i64) -> Result<Vec<message::Model>> {
        self.latency.pause(200).await;
        chat::get_messages(&self.db, order_id).await
    }

    /// Appends a chat message to an order.
    #[instrument(skip(self, text))]
    pub async fn send_message(
        &self,
        order_id: i64,
        sender_id: i64,
        text: &str,
    ) -> Result<message::Model> {
        self.latency.pause(100).await;
        chat::send_message(&self.db, order_id, sender_id, text).await
    }
}
