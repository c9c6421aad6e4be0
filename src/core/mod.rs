//! Core business logic - framework-agnostic marketplace operations.
//!
//! Every function takes a database connection and returns [`crate::errors::Result`].
//! The service layer and the HTTP API are thin wrappers around these modules.

/// Password hashing and signed bearer tokens
pub mod auth;
/// Per-order chat
pub mod chat;
/// Meal catalogue
pub mod meal;
/// User notifications
pub mod notification;
/// Checkout and order lifecycle
pub mod order;
/// Cook reviews
pub mod review;
/// Initial data seeding
pub mod seed;
/// Order status state machine
pub mod status;
/// Key-value store over the `app_state` table
pub mod storage;
/// Accounts, authentication and profiles
pub mod user;
/// Cook wallets and their ledger
pub mod wallet;
