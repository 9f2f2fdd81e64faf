use serde::{Serialize, Serializer};
use std::fmt;

/// Result of a payment that did not fail outright.
///
/// Rejections (`AlreadyFullyPaid`, `ExceedsPartialRemaining`,
/// `ExceedsInvoiceAmount`) are ordinary outcomes, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    NoPaymentNeeded,
    AlreadyFullyPaid,
    ExceedsPartialRemaining,
    FinalPartialPaymentFullySettles,
    PartialPaymentStillOutstanding,
    ExceedsInvoiceAmount,
    NowFullyPaid,
    NowPartiallyPaid,
}

impl PaymentOutcome {
    /// The human-readable text reported for this outcome.
    pub fn message(&self) -> &'static str {
        match self {
            PaymentOutcome::NoPaymentNeeded => "no payment needed",
            PaymentOutcome::AlreadyFullyPaid => "invoice was already fully paid",
            PaymentOutcome::ExceedsPartialRemaining => {
                "the payment is greater than the partial amount remaining"
            }
            PaymentOutcome::FinalPartialPaymentFullySettles => {
                "final partial payment received, invoice is now fully paid"
            }
            PaymentOutcome::PartialPaymentStillOutstanding => {
                "another partial payment received, still not fully paid"
            }
            PaymentOutcome::ExceedsInvoiceAmount => "the payment is greater than the invoice amount",
            PaymentOutcome::NowFullyPaid => "invoice is now fully paid",
            PaymentOutcome::NowPartiallyPaid => "invoice is now partially paid",
        }
    }

    /// Whether the payment was recorded on the invoice.
    pub fn is_applied(&self) -> bool {
        matches!(
            self,
            PaymentOutcome::FinalPartialPaymentFullySettles
                | PaymentOutcome::PartialPaymentStillOutstanding
                | PaymentOutcome::NowFullyPaid
                | PaymentOutcome::NowPartiallyPaid
        )
    }
}

impl fmt::Display for PaymentOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl Serialize for PaymentOutcome {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.message())
    }
}
