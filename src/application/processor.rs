use crate::domain::invoice::Invoice;
use crate::domain::outcome::PaymentOutcome;
use crate::domain::payment::Payment;
use crate::domain::ports::InvoiceStoreBox;
use crate::domain::tax::{PaymentRole, should_include_tax};
use crate::error::{PaymentError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// What to do with a payment once its invoice is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    /// Persist the invoice unchanged and report the outcome.
    Reject(PaymentOutcome),
    /// Record the payment, taxed according to its role, then report.
    Apply(PaymentOutcome, PaymentRole),
}

/// Validates payments against invoices and applies the accepted ones.
///
/// Calls for the same invoice reference are serialized; calls for different
/// references run independently.
pub struct PaymentProcessor {
    store: InvoiceStoreBox,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl PaymentProcessor {
    /// Creates a new `PaymentProcessor` backed by `store`.
    pub fn new(store: InvoiceStoreBox) -> Self {
        Self {
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Processes a single payment.
    ///
    /// Fails with `NoMatchingInvoice` when the reference does not resolve and
    /// with `InvalidInvoiceState` for a zero-amount invoice that has payments.
    /// Every other path saves the invoice, changed or not, and returns an
    /// outcome.
    pub async fn process_payment(&self, payment: Payment) -> Result<PaymentOutcome> {
        let Some(reference) = payment.reference().map(str::to_owned) else {
            warn!("payment has no reference");
            return Err(PaymentError::NoMatchingInvoice);
        };

        let lock = self.lock_for(&reference).await;
        let result = {
            let _guard = lock.lock().await;
            self.process_resolved(&reference, payment).await
        };
        self.release(&reference, lock).await;
        result
    }

    /// Returns the stored state of the invoice registered under `reference`.
    pub async fn invoice(&self, reference: &str) -> Result<Option<Invoice>> {
        self.store.get_invoice(reference).await
    }

    /// Consumes the processor and returns the final state of all invoices.
    pub async fn into_results(self) -> Result<Vec<Invoice>> {
        self.store.all_invoices().await
    }

    async fn process_resolved(&self, reference: &str, payment: Payment) -> Result<PaymentOutcome> {
        let Some(mut invoice) = self.store.get_invoice(reference).await? else {
            warn!(reference, "no invoice matches payment");
            return Err(PaymentError::NoMatchingInvoice);
        };
        debug!(reference, amount = %invoice.amount, paid = %invoice.amount_paid, "resolved invoice");

        let outcome = match assess(&invoice, &payment) {
            Ok(Decision::Reject(outcome)) => {
                warn!(reference, payment = %payment.amount, %outcome, "payment not applied");
                outcome
            }
            Ok(Decision::Apply(outcome, role)) => {
                let include_tax = should_include_tax(invoice.r#type, role);
                info!(
                    reference,
                    payment = %payment.amount,
                    ?role,
                    include_tax,
                    %outcome,
                    "applying payment"
                );
                if let Err(e) = invoice.apply_payment(payment, include_tax) {
                    warn!(reference, error = %e, "payment refused");
                    return Err(e);
                }
                outcome
            }
            Err(e) => {
                warn!(reference, error = %e, "payment refused");
                return Err(e);
            }
        };

        self.store.save(invoice).await?;
        Ok(outcome)
    }

    async fn lock_for(&self, reference: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.entry(reference.to_owned()).or_default().clone()
    }

    async fn release(&self, reference: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.locks.lock().await;
        drop(lock);
        // Only the map's handle left means nobody holds or awaits this lock.
        if locks.get(reference).is_some_and(|l| Arc::strong_count(l) == 1) {
            locks.remove(reference);
        }
    }
}

/// Decides how `payment` affects `invoice` without touching either.
fn assess(invoice: &Invoice, payment: &Payment) -> Result<Decision> {
    if invoice.amount.is_zero() {
        return if invoice.has_payments() {
            Err(PaymentError::InvalidInvoiceState)
        } else {
            Ok(Decision::Reject(PaymentOutcome::NoPaymentNeeded))
        };
    }

    if invoice.has_payments() {
        let paid_so_far = invoice.paid_so_far()?;
        if !paid_so_far.is_zero() && invoice.amount == paid_so_far {
            return Ok(Decision::Reject(PaymentOutcome::AlreadyFullyPaid));
        }
        let remaining = invoice.remaining()?;
        if !paid_so_far.is_zero() && payment.amount > remaining {
            return Ok(Decision::Reject(PaymentOutcome::ExceedsPartialRemaining));
        }

        let outcome = if remaining == payment.amount {
            PaymentOutcome::FinalPartialPaymentFullySettles
        } else {
            PaymentOutcome::PartialPaymentStillOutstanding
        };
        return Ok(Decision::Apply(outcome, PaymentRole::Subsequent));
    }

    if payment.amount > invoice.amount {
        return Ok(Decision::Reject(PaymentOutcome::ExceedsInvoiceAmount));
    }

    let outcome = if invoice.amount == payment.amount {
        PaymentOutcome::NowFullyPaid
    } else {
        PaymentOutcome::NowPartiallyPaid
    };
    Ok(Decision::Apply(outcome, PaymentRole::First))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::invoice::InvoiceType;
    use crate::domain::ports::InvoiceStore;
    use crate::infrastructure::in_memory::InMemoryInvoiceStore;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn invoice(amount: Decimal, history: &[Decimal]) -> Invoice {
        let payments = history.iter().map(|a| Payment::new("INV-1", *a)).collect();
        let paid = history.iter().copied().sum();
        Invoice::new("INV-1", amount, InvoiceType::Standard)
            .unwrap()
            .with_payments(payments, paid, Decimal::ZERO)
    }

    fn pay(amount: Decimal) -> Payment {
        Payment::new("INV-1", amount)
    }

    #[test]
    fn test_assess_zero_amount() {
        assert_eq!(
            assess(&invoice(dec!(0), &[]), &pay(dec!(5))).unwrap(),
            Decision::Reject(PaymentOutcome::NoPaymentNeeded)
        );
        assert!(matches!(
            assess(&invoice(dec!(0), &[dec!(5)]), &pay(dec!(5))),
            Err(PaymentError::InvalidInvoiceState)
        ));
    }

    #[test]
    fn test_assess_with_history() {
        let half_paid = invoice(dec!(10), &[dec!(5)]);
        assert_eq!(
            assess(&invoice(dec!(10), &[dec!(10)]), &pay(dec!(1))).unwrap(),
            Decision::Reject(PaymentOutcome::AlreadyFullyPaid)
        );
        assert_eq!(
            assess(&half_paid, &pay(dec!(6))).unwrap(),
            Decision::Reject(PaymentOutcome::ExceedsPartialRemaining)
        );
        assert_eq!(
            assess(&half_paid, &pay(dec!(5))).unwrap(),
            Decision::Apply(
                PaymentOutcome::FinalPartialPaymentFullySettles,
                PaymentRole::Subsequent
            )
        );
        assert_eq!(
            assess(&half_paid, &pay(dec!(1))).unwrap(),
            Decision::Apply(
                PaymentOutcome::PartialPaymentStillOutstanding,
                PaymentRole::Subsequent
            )
        );
    }

    #[test]
    fn test_assess_zero_sum_history_skips_settled_checks() {
        // A history summing to zero never counts as settled or as overpaid.
        let invoice = invoice(dec!(10), &[dec!(0)]);
        assert_eq!(
            assess(&invoice, &pay(dec!(20))).unwrap(),
            Decision::Apply(
                PaymentOutcome::PartialPaymentStillOutstanding,
                PaymentRole::Subsequent
            )
        );
    }

    #[test]
    fn test_assess_first_payment() {
        let unpaid = invoice(dec!(10), &[]);
        assert_eq!(
            assess(&unpaid, &pay(dec!(11))).unwrap(),
            Decision::Reject(PaymentOutcome::ExceedsInvoiceAmount)
        );
        assert_eq!(
            assess(&unpaid, &pay(dec!(10))).unwrap(),
            Decision::Apply(PaymentOutcome::NowFullyPaid, PaymentRole::First)
        );
        assert_eq!(
            assess(&unpaid, &pay(dec!(3))).unwrap(),
            Decision::Apply(PaymentOutcome::NowPartiallyPaid, PaymentRole::First)
        );
    }

    #[tokio::test]
    async fn test_missing_reference_fails_before_lookup() {
        let processor = PaymentProcessor::new(Box::new(InMemoryInvoiceStore::new()));
        let err = processor.process_payment(Payment::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "There is no invoice matching this payment");
    }

    #[tokio::test]
    async fn test_applied_payment_is_persisted() {
        let store = InMemoryInvoiceStore::new();
        store.add(invoice(dec!(100), &[])).await.unwrap();
        let processor = PaymentProcessor::new(Box::new(store.clone()));

        let outcome = processor.process_payment(pay(dec!(50))).await.unwrap();
        assert_eq!(outcome, PaymentOutcome::NowPartiallyPaid);

        let stored = store.get_invoice("INV-1").await.unwrap().unwrap();
        assert_eq!(stored.amount_paid, dec!(50));
        assert_eq!(stored.tax_amount, dec!(7.0));
        assert_eq!(stored.payments, vec![pay(dec!(50))]);
    }

    #[tokio::test]
    async fn test_overflow_is_an_error_and_releases_the_lock() {
        let store = InMemoryInvoiceStore::new();
        store
            .add(Invoice::new("A", Decimal::MAX, InvoiceType::Standard).unwrap())
            .await
            .unwrap();
        let processor = PaymentProcessor::new(Box::new(store.clone()));

        let outcome = processor
            .process_payment(Payment::new("A", Decimal::MIN))
            .await
            .unwrap();
        assert_eq!(outcome, PaymentOutcome::NowPartiallyPaid);
        let before = store.get_invoice("A").await.unwrap().unwrap();

        let result = processor.process_payment(Payment::new("A", Decimal::ONE)).await;

        assert!(matches!(result, Err(PaymentError::ValidationError(_))));
        assert_eq!(store.get_invoice("A").await.unwrap().unwrap(), before);
        assert!(processor.locks.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_locks_are_released() {
        let store = InMemoryInvoiceStore::new();
        store.add(invoice(dec!(100), &[])).await.unwrap();
        let processor = PaymentProcessor::new(Box::new(store));

        processor.process_payment(pay(dec!(10))).await.unwrap();
        let _ = processor.process_payment(Payment::new("missing", dec!(1))).await;

        assert!(processor.locks.lock().await.is_empty());
    }
}
