use crate::domain::payment::Payment;
use crate::domain::tax::tax_on;
use crate::error::PaymentError;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum InvoiceType {
    #[default]
    Standard,
    Commercial,
}

impl InvoiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceType::Standard => "standard",
            InvoiceType::Commercial => "commercial",
        }
    }
}

impl fmt::Display for InvoiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceType {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(InvoiceType::Standard),
            "commercial" => Ok(InvoiceType::Commercial),
            _ => Err(PaymentError::UnsupportedInvoiceType(s.to_string())),
        }
    }
}

impl TryFrom<String> for InvoiceType {
    type Error = PaymentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<InvoiceType> for String {
    fn from(value: InvoiceType) -> Self {
        value.as_str().to_string()
    }
}

/// An invoice and its payment history.
///
/// `amount` is fixed for the duration of a payment; `amount_paid`,
/// `tax_amount` and `payments` are the state a payment moves forward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Lookup key payments are matched against.
    pub reference: String,
    /// Total invoice value, never negative.
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: Decimal,
    /// Cumulative sum of applied payments.
    #[serde(default)]
    pub amount_paid: Decimal,
    /// Cumulative tax recorded.
    #[serde(default)]
    pub tax_amount: Decimal,
    /// Applied payments, oldest first. A missing or null history loads as empty.
    #[serde(default, deserialize_with = "deserialize_payments")]
    pub payments: Vec<Payment>,
    #[serde(default)]
    pub r#type: InvoiceType,
}

fn deserialize_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let amount = <Decimal as Deserialize>::deserialize(deserializer)?;
    check_amount(amount).map_err(serde::de::Error::custom)
}

fn check_amount(amount: Decimal) -> Result<Decimal, PaymentError> {
    if amount < Decimal::ZERO {
        return Err(PaymentError::ValidationError(
            "Invoice amount must not be negative".to_string(),
        ));
    }
    Ok(amount)
}

fn overflow(what: &str) -> PaymentError {
    PaymentError::ValidationError(format!("Arithmetic overflow computing {what}"))
}

fn deserialize_payments<'de, D>(deserializer: D) -> Result<Vec<Payment>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Payment>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Invoice {
    /// Creates an unpaid invoice, rejecting a negative `amount`.
    pub fn new(
        reference: impl Into<String>,
        amount: Decimal,
        r#type: InvoiceType,
    ) -> Result<Self, PaymentError> {
        Ok(Self {
            reference: reference.into(),
            amount: check_amount(amount)?,
            amount_paid: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            payments: Vec::new(),
            r#type,
        })
    }

    /// Seeds the invoice with an existing history and its recorded totals.
    pub fn with_payments(
        mut self,
        payments: Vec<Payment>,
        amount_paid: Decimal,
        tax_amount: Decimal,
    ) -> Self {
        self.payments = payments;
        self.amount_paid = amount_paid;
        self.tax_amount = tax_amount;
        self
    }

    /// Whether any payment has been recorded.
    pub fn has_payments(&self) -> bool {
        !self.payments.is_empty()
    }

    /// Sum of the recorded payment history.
    pub fn paid_so_far(&self) -> Result<Decimal, PaymentError> {
        self.payments
            .iter()
            .try_fold(Decimal::ZERO, |sum, p| sum.checked_add(p.amount))
            .ok_or_else(|| overflow("payment history total"))
    }

    /// Balance left to pay according to `amount_paid`.
    pub fn remaining(&self) -> Result<Decimal, PaymentError> {
        self.amount
            .checked_sub(self.amount_paid)
            .ok_or_else(|| overflow("remaining balance"))
    }

    /// Whether `amount_paid` has reached `amount`.
    pub fn is_settled(&self) -> bool {
        self.amount_paid == self.amount
    }

    /// Records a payment, accruing tax on it when `include_tax` is set.
    ///
    /// On overflow the invoice is left untouched.
    pub fn apply_payment(
        &mut self,
        payment: Payment,
        include_tax: bool,
    ) -> Result<(), PaymentError> {
        let amount_paid = self
            .amount_paid
            .checked_add(payment.amount)
            .ok_or_else(|| overflow("amount paid"))?;
        let tax_amount = if include_tax {
            self.tax_amount
                .checked_add(tax_on(payment.amount))
                .ok_or_else(|| overflow("tax amount"))?
        } else {
            self.tax_amount
        };

        self.amount_paid = amount_paid;
        self.tax_amount = tax_amount;
        self.payments.push(payment);
        Ok(())
    }
}
