//! Order status state machine.
//!
//! An order moves `pending → confirmed → preparing → in_delivery → delivered`, or from
//! `pending` to `cancelled`. The cook drives the kitchen steps, the client confirms
//! receipt, and either party may cancel before the cook confirms. Every other jump is
//! rejected, and so is a legal jump attempted by the wrong party.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed, waiting for the cook
    Pending,
    /// Accepted by the cook
    Confirmed,
    /// Being cooked
    Preparing,
    /// On its way to the client
    InDelivery,
    /// Receipt confirmed by the client
    Delivered,
    /// Called off before confirmation
    Cancelled,
}

/// Which side of an order a caller is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    /// The order's client
    Client,
    /// The order's cook
    Cook,
}

impl OrderStatus {
    /// All statuses in lifecycle order, `cancelled` last.
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::Confirmed,
        Self::Preparing,
        Self::InDelivery,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Storage and wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::InDelivery => "in_delivery",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// No transition leaves a terminal status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Parties allowed to move an order from `self` to `to`; empty when the jump is undefined.
    const fn allowed_parties(self, to: Self) -> &'static [Party] {
        match (self, to) {
            (Self::Pending, Self::Confirmed)
            | (Self::Confirmed, Self::Preparing)
            | (Self::Preparing, Self::InDelivery) => &[Party::Cook],
            (Self::InDelivery, Self::Delivered) => &[Party::Client],
            (Self::Pending, Self::Cancelled) => &[Party::Cook, Party::Client],
            _ => &[],
        }
    }

    /// Validates a move to `to` made by `party` and returns the new status.
    ///
    /// # Errors
    /// - [`Error::InvalidTransition`] if the lifecycle has no such edge
    /// - [`Error::Forbidden`] if the edge exists but belongs to the other party
    pub fn transition(self, to: Self, party: Party) -> Result<Self> {
        let allowed = self.allowed_parties(to);
        if self.is_terminal() || allowed.is_empty() {
            return Err(Error::InvalidTransition { from: self, to });
        }
        if !allowed.contains(&party) {
            return Err(Error::forbidden(format!(
                "the {party} cannot move an order from {self} to {to}"
            )));
        }
        Ok(to)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| Error::validation(format!("unknown order status '{s}'")))
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client => f.write_str("client"),
            Self::Cook => f.write_str("cook"),
        }
    }
}
