//! Seed data loading from seed.toml
//!
//! This module provides functionality to load the initial marketplace data
//! (accounts, meals, orders and reviews) from a TOML file. Records refer to each
//! other by email and meal title rather than by id, so the file stays readable.
//! [`SeedConfig::default`] is empty; when no file is present, [`SeedConfig::demo`]
//! provides a small demo marketplace.

use crate::errors::{Error, Result};
use crate::models::{PaymentKind, UserRole};
use crate::core::status::OrderStatus;
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire seed.toml file
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SeedConfig {
    /// Accounts to create, clients and cooks
    pub users: Vec<SeedUser>,
    /// Meals, each attached to a cook by email
    pub meals: Vec<SeedMeal>,
    /// Historical orders
    pub orders: Vec<SeedOrder>,
    /// Cook reviews
    pub reviews: Vec<SeedReview>,
}

/// One account to seed
#[derive(Debug, Deserialize, Clone)]
pub struct SeedUser {
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Plain-text password, hashed on insert
    pub password: Option<String>,
    /// `client` or `cook`
    pub role: UserRole,
    /// Avatar image reference
    pub avatar_url: Option<String>,
    /// Delivery or kitchen address
    pub address: Option<String>,
    /// Starting wallet balance, cooks only
    #[serde(default)]
    pub balance: f64,
    /// Saved payment methods, clients only
    #[serde(default)]
    pub payment_methods: Vec<SeedPaymentMethod>,
}

/// A saved payment method of a seeded client
#[derive(Debug, Deserialize, Clone)]
pub struct SeedPaymentMethod {
    /// Payment kind
    pub kind: PaymentKind,
    /// Card brand
    pub brand: Option<String>,
    /// Last four card digits
    pub last4: Option<String>,
    /// Display label
    pub label: String,
}

/// A meal to seed
#[derive(Debug, Deserialize, Clone)]
pub struct SeedMeal {
    /// Email of the cook offering the meal
    pub cook_email: String,
    /// Meal title
    pub title: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Unit price
    pub price: f64,
    /// Image reference
    #[serde(default)]
    pub image_url: String,
    /// Listed in the catalogue
    #[serde(default = "default_true")]
    pub available: bool,
}

const fn default_true() -> bool {
    true
}

/// A historical order to seed
#[derive(Debug, Deserialize, Clone)]
pub struct SeedOrder {
    /// Fixed order number
    pub id: i64,
    /// Email of the ordering client
    pub client_email: String,
    /// Email of the cook
    pub cook_email: String,
    /// Current status
    pub status: OrderStatus,
    /// Payment method label
    pub payment_method: Option<String>,
    /// How long ago the order was placed
    #[serde(default)]
    pub days_ago: i64,
    /// Ordered lines, resolved by meal title among the cook's meals
    pub items: Vec<SeedOrderItem>,
}

/// One line of a seeded order
#[derive(Debug, Deserialize, Clone)]
pub struct SeedOrderItem {
    /// Title of one of the cook's seeded meals
    pub meal_title: String,
    /// Number of portions
    pub quantity: u32,
}

/// A review to seed
#[derive(Debug, Deserialize, Clone)]
pub struct SeedReview {
    /// Email of the reviewed cook
    pub cook_email: String,
    /// Reviewer display name
    pub author_name: String,
    /// 1 to 5
    pub rating: i32,
    /// Review text
    pub comment: String,
}

impl SeedConfig {
    /// The demo marketplace: one client, one cook with two meals and a delivered order.
    #[must_use]
    pub fn demo() -> Self {
        Self {
            users: vec![
                SeedUser {
                    name: "João Cliente".to_string(),
                    email: "cliente@marmita.com".to_string(),
                    password: Some("123".to_string()),
                    role: UserRole::Client,
                    avatar_url: Some("https://i.pravatar.cc/150?u=1".to_string()),
                    address: Some("Rua das Flores, 123".to_string()),
                    balance: 0.0,
                    payment_methods: vec![SeedPaymentMethod {
                        kind: PaymentKind::CreditCard,
                        brand: Some("mastercard".to_string()),
                        last4: Some("4242".to_string()),
                        label: "Mastercard **** 4242".to_string(),
                    }],
                },
                SeedUser {
                    name: "Maria Chef".to_string(),
                    email: "chef@marmita.com".to_string(),
                    password: Some("123".to_string()),
                    role: UserRole::Cook,
                    avatar_url: Some("https://i.pravatar.cc/150?u=2".to_string()),
                    address: Some("Av. Gastronomia, 500".to_string()),
                    balance: 150.50,
                    payment_methods: Vec::new(),
                },
            ],
            meals: vec![
                SeedMeal {
                    cook_email: "chef@marmita.com".to_string(),
                    title: "Feijoada Fit".to_string(),
                    description: "Arroz integral, feijão preto leve, couve e farofa de aveia."
                        .to_string(),
                    price: 28.90,
                    image_url: "https://images.unsplash.com/photo-1574484284008-59d73054596d?w=500&q=80"
                        .to_string(),
                    available: true,
                },
                SeedMeal {
                    cook_email: "chef@marmita.com".to_string(),
                    title: "Bowl de Salmão".to_string(),
                    description: "Salmão grelhado, quinoa, abacate e mix de folhas.".to_string(),
                    price: 35.50,
                    image_url: "https://images.unsplash.com/photo-1546069901-ba9599a7e63c?w=500&q=80"
                        .to_string(),
                    available: true,
                },
            ],
            orders: vec![SeedOrder {
                id: 101,
                client_email: "cliente@marmita.com".to_string(),
                cook_email: "chef@marmita.com".to_string(),
                status: OrderStatus::Delivered,
                payment_method: Some("Mastercard **** 4242".to_string()),
                days_ago: 1,
                items: vec![SeedOrderItem {
                    meal_title: "Feijoada Fit".to_string(),
                    quantity: 1,
                }],
            }],
            reviews: Vec::new(),
        }
    }
}

/// Loads seed data from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_seed<P: AsRef<Path>>(path: P) -> Result<SeedConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read seed file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse seed file: {e}"),
    })
}

/// Loads the seed file at `path`, or the demo data if the file does not exist.
///
/// A file that exists but does not parse is still an error.
pub fn load_seed_or_demo<P: AsRef<Path>>(path: P) -> Result<SeedConfig> {
    if path.as_ref().exists() {
        load_seed(path)
    } else {
        Ok(SeedConfig::demo())
    }
}
