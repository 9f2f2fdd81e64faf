use crate::domain::invoice::{Invoice, InvoiceType};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Tax accrued on each taxable payment.
pub const TAX_RATE: Decimal = dec!(0.14);

/// Where a payment falls in an invoice's payment sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentRole {
    /// The invoice had no recorded payments.
    First,
    /// The invoice already had at least one recorded payment.
    Subsequent,
}

impl PaymentRole {
    pub fn for_invoice(invoice: &Invoice) -> Self {
        if invoice.has_payments() {
            PaymentRole::Subsequent
        } else {
            PaymentRole::First
        }
    }
}

/// Commercial invoices accrue tax on every payment; standard invoices only on
/// the first one.
pub fn should_include_tax(invoice_type: InvoiceType, role: PaymentRole) -> bool {
    match invoice_type {
        InvoiceType::Standard => role == PaymentRole::First,
        InvoiceType::Commercial => true,
    }
}

pub fn tax_on(amount: Decimal) -> Decimal {
    amount * TAX_RATE
}
