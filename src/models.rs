//! Domain types shared by the core logic, the service layer and the HTTP API.
//!
//! The entities in [`crate::entities`] mirror the tables; the types here are what the
//! rest of the crate passes around. Role-specific user data becomes a tagged variant,
//! enumerated string columns become enums, and the order item blob becomes a typed list.

use crate::{
    core::status::OrderStatus,
    entities::{order, payment_method, user},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Marketplace role of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Buyer placing orders
    Client,
    /// Seller offering meals
    Cook,
}

impl UserRole {
    /// Storage and wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Cook => "cook",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "client" => Ok(Self::Client),
            "cook" => Ok(Self::Cook),
            other => Err(Error::validation(format!("unknown role '{other}'"))),
        }
    }
}

/// How a client pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    /// Credit card, usually with brand and last four digits
    CreditCard,
    /// Brazilian instant payment
    Pix,
    /// Cash on delivery
    Cash,
}

impl PaymentKind {
    /// Storage and wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreditCard => "credit_card",
            Self::Pix => "pix",
            Self::Cash => "cash",
        }
    }
}

impl FromStr for PaymentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "credit_card" => Ok(Self::CreditCard),
            "pix" => Ok(Self::Pix),
            "cash" => Ok(Self::Cash),
            other => Err(Error::validation(format!("unknown payment kind '{other}'"))),
        }
    }
}

/// A saved payment method of a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    /// Assigned by the store
    pub id: i64,
    /// Payment kind
    #[serde(rename = "type")]
    pub kind: PaymentKind,
    /// Card brand, if any
    pub brand: Option<String>,
    /// Last four card digits, if any
    pub last4: Option<String>,
    /// Label shown at checkout
    pub label: String,
}

impl TryFrom<payment_method::Model> for PaymentMethod {
    type Error = Error;

    fn try_from(model: payment_method::Model) -> Result<Self> {
        Ok(Self {
            id: model.id,
            kind: model.kind.parse()?,
            brand: model.brand,
            last4: model.last4,
            label: model.label,
        })
    }
}

/// Payment method as submitted by a client, before it gets an id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPaymentMethod {
    /// Payment kind
    #[serde(rename = "type")]
    pub kind: PaymentKind,
    /// Card brand, if any
    #[serde(default)]
    pub brand: Option<String>,
    /// Last four card digits, if any
    #[serde(default)]
    pub last4: Option<String>,
    /// Label shown at checkout
    pub label: String,
}

/// Role-specific part of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum RoleProfile {
    /// Clients keep payment methods
    Client {
        /// Saved payment methods, oldest first
        #[serde(rename = "paymentMethods")]
        payment_methods: Vec<PaymentMethod>,
    },
    /// Cooks keep a wallet balance
    Cook {
        /// Current wallet balance
        balance: f64,
    },
}

/// A marketplace account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Avatar image reference
    pub avatar_url: Option<String>,
    /// Delivery or kitchen address
    pub address: Option<String>,
    /// Role with its data
    #[serde(flatten)]
    pub profile: RoleProfile,
}

impl User {
    /// Builds the domain user from its row and, for clients, its payment methods.
    ///
    /// # Errors
    /// Returns a validation error if the stored role or a payment kind is unknown.
    pub fn from_parts(model: user::Model, methods: Vec<payment_method::Model>) -> Result<Self> {
        let profile = match model.role.parse::<UserRole>()? {
            UserRole::Client => RoleProfile::Client {
                payment_methods: methods
                    .into_iter()
                    .map(PaymentMethod::try_from)
                    .collect::<Result<_>>()?,
            },
            UserRole::Cook => RoleProfile::Cook {
                balance: model.balance,
            },
        };

        Ok(Self {
            id: model.id,
            name: model.name,
            email: model.email,
            avatar_url: model.avatar_url,
            address: model.address,
            profile,
        })
    }

    /// Role of the account.
    #[must_use]
    pub const fn role(&self) -> UserRole {
        match self.profile {
            RoleProfile::Client { .. } => UserRole::Client,
            RoleProfile::Cook { .. } => UserRole::Cook,
        }
    }

    /// Wallet balance, for cooks.
    #[must_use]
    pub const fn balance(&self) -> Option<f64> {
        match self.profile {
            RoleProfile::Cook { balance } => Some(balance),
            RoleProfile::Client { .. } => None,
        }
    }

    /// Saved payment methods; always empty for cooks.
    #[must_use]
    pub fn payment_methods(&self) -> &[PaymentMethod] {
        match &self.profile {
            RoleProfile::Client { payment_methods } => payment_methods,
            RoleProfile::Cook { .. } => &[],
        }
    }
}

/// Profile fields a user may change. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserUpdate {
    /// New display name
    pub name: Option<String>,
    /// New login email; must not belong to another user
    pub email: Option<String>,
    /// New address
    pub address: Option<String>,
    /// New avatar reference
    pub avatar_url: Option<String>,
}

/// A meal as submitted by its cook.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMeal {
    /// Owning cook
    pub cook_id: i64,
    /// Short title
    pub title: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Unit price
    pub price: f64,
    /// Image reference
    #[serde(default)]
    pub image_url: String,
    /// Listed in the public catalogue; defaults to true
    #[serde(default = "default_available")]
    pub available: bool,
}

const fn default_available() -> bool {
    true
}

/// Meal fields a cook may change. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MealUpdate {
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New unit price
    pub price: Option<f64>,
    /// New image reference
    pub image_url: Option<String>,
    /// New availability
    pub available: Option<bool>,
}

/// One line of a checkout: which meal and how many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// Ordered meal
    pub meal_id: i64,
    /// Number of portions, at least one
    pub quantity: u32,
}

/// Frozen copy of an ordered meal, immune to later meal edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Line number within the order, starting at 1
    pub id: u32,
    /// Meal the line was taken from
    pub meal_id: i64,
    /// Meal title at checkout
    pub meal_title: String,
    /// Number of portions
    pub quantity: u32,
    /// Meal price at checkout
    pub unit_price: f64,
}

impl OrderItem {
    /// `quantity * unit_price`.
    #[must_use]
    pub fn line_total(&self) -> f64 {
        f64::from(self.quantity) * self.unit_price
    }
}

/// Sum of the line totals of a snapshot.
#[must_use]
pub fn items_total(items: &[OrderItem]) -> f64 {
    items.iter().map(OrderItem::line_total).sum()
}

/// A placed order with its decoded item snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order number
    pub id: i64,
    /// Ordering client
    pub client_id: i64,
    /// Client name at checkout
    pub client_name: String,
    /// Cook preparing the order
    pub cook_id: i64,
    /// Cook name at checkout
    pub cook_name: String,
    /// Lifecycle status
    pub status: OrderStatus,
    /// Sum of the snapshot, computed at checkout
    pub total: f64,
    /// When the order was placed
    pub created_at: DateTime<Utc>,
    /// Item snapshot
    pub items: Vec<OrderItem>,
    /// Payment method label chosen at checkout
    pub payment_method_label: Option<String>,
}

impl TryFrom<order::Model> for Order {
    type Error = Error;

    fn try_from(model: order::Model) -> Result<Self> {
        Ok(Self {
            id: model.id,
            client_id: model.client_id,
            client_name: model.client_name,
            cook_id: model.cook_id,
            cook_name: model.cook_name,
            status: model.status.parse()?,
            total: model.total,
            created_at: model.created_at,
            items: serde_json::from_str(&model.items)?,
            payment_method_label: model.payment_method_label,
        })
    }
}

/// Direction of a wallet entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Sale credited at checkout
    Deposit,
    /// Payout requested by the cook
    Withdrawal,
    /// Sale reversed by a cancellation
    Refund,
}

impl TransactionKind {
    /// Storage and wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
            Self::Refund => "refund",
        }
    }
}

/// Settlement state of a wallet entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Settled
    Completed,
    /// Awaiting payout
    Pending,
}

impl TransactionStatus {
    /// Storage and wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Pending => "pending",
        }
    }
}

/// UI colour scheme persisted under `marmita_theme`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light scheme
    #[default]
    Light,
    /// Dark scheme
    Dark,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    fn item(id: u32, quantity: u32, unit_price: f64) -> OrderItem {
        OrderItem {
            id,
            meal_id: i64::from(id),
            meal_title: format!("Meal {id}"),
            quantity,
            unit_price,
        }
    }

    #[test]
    fn test_items_total_sums_lines() {
        let items = vec![item(1, 2, 28.90), item(2, 1, 35.50)];
        assert_eq!(items_total(&items), 93.3);
        assert_eq!(items_total(&[]), 0.0);
    }

    #[test]
    fn test_user_serializes_role_tag() {
        let cook = User {
            id: 2,
            name: "Maria Chef".to_string(),
            email: "chef@marmita.com".to_string(),
            avatar_url: None,
            address: None,
            profile: RoleProfile::Cook { balance: 150.50 },
        };
        let json = serde_json::to_value(&cook).unwrap();
        assert_eq!(json["role"], "cook");
        assert_eq!(json["balance"], 150.50);
        assert!(json.get("paymentMethods").is_none());
        assert_eq!(cook.role(), UserRole::Cook);
        assert!(cook.payment_methods().is_empty());
    }

    #[test]
    fn test_order_model_decodes_item_blob() {
        let items = vec![item(1, 1, 28.90)];
        let model = order::Model {
            id: 10101,
            client_id: 1,
            client_name: "João Cliente".to_string(),
            cook_id: 2,
            cook_name: "Maria Chef".to_string(),
            status: "in_delivery".to_string(),
            total: 28.90,
            items: serde_json::to_string(&items).unwrap(),
            payment_method_label: None,
            created_at: Utc::now(),
        };
        let order = Order::try_from(model).unwrap();
        assert_eq!(order.status, OrderStatus::InDelivery);
        assert_eq!(order.items, items);
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        assert!("admin".parse::<UserRole>().is_err());
        assert_eq!("cook".parse::<UserRole>().unwrap(), UserRole::Cook);
    }
}
