use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A payment submitted against an invoice.
///
/// The reference is optional: a payment without one can never resolve to an
/// invoice. Once accepted, the payment is appended verbatim to the invoice's
/// history.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Payment {
    #[serde(default)]
    pub reference: Option<String>,
    pub amount: Decimal,
}

impl Payment {
    /// Creates a payment of `amount` against the invoice under `reference`.
    pub fn new(reference: impl Into<String>, amount: Decimal) -> Self {
        Self {
            reference: Some(reference.into()),
            amount,
        }
    }

    /// Returns the lookup key as submitted, treating empty or blank
    /// references as missing.
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref().filter(|r| !r.trim().is_empty())
    }
}
