use crate::core::status::OrderStatus;
use sea_orm::DbErr;
use thiserror::Error;

/// Every failure the marketplace can report, from the store up to the HTTP layer.
#[derive(Debug, Error)]
pub enum Error {
    /// A user, meal, order, message or notification id did not resolve
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record that was looked up
        entity: &'static str,
        /// Identifier used for the lookup
        id: String,
    },

    /// Registration or profile update with an email that is already taken
    #[error("Email already registered: {email}")]
    DuplicateEmail {
        /// The conflicting email
        email: String,
    },

    /// Password did not verify
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Withdrawal larger than the wallet balance
    #[error("Insufficient balance: current {current:.2}, requested {requested:.2}")]
    InsufficientBalance {
        /// Balance at the time of the request
        current: f64,
        /// Amount that was requested
        requested: f64,
    },

    /// Amount is negative, zero where not allowed, or not finite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// Input rejected before touching the store
    #[error("Invalid input: {message}")]
    Validation {
        /// What was wrong with the input
        message: String,
    },

    /// Order status jump that the lifecycle does not define
    #[error("Order cannot move from {from} to {to}")]
    InvalidTransition {
        /// Current status
        from: OrderStatus,
        /// Requested status
        to: OrderStatus,
    },

    /// Caller is not allowed to perform the operation
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Why the caller was rejected
        message: String,
    },

    /// Bearer token missing, malformed or with a bad signature
    #[error("Invalid or missing token")]
    InvalidToken,

    /// Catch-all for failures without a more specific kind
    #[error("Operation failed: {0}")]
    OperationFailed(String),

    /// Configuration could not be loaded or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Error reported by the store
    #[error("Database error: {0}")]
    Database(String),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or unreadable environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// JSON (de)serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for [`Error::NotFound`].
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Shorthand for [`Error::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for [`Error::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }
}

impl From<DbErr> for Error {
    fn from(value: DbErr) -> Self {
        Self::Database(value.to_string())
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
