//! Application layer containing the payment-processing orchestration.
//!
//! `PaymentProcessor` resolves the target invoice through the injected
//! `InvoiceStore`, decides which outcome applies, mutates the invoice when the
//! payment is accepted and persists the result.

pub mod processor;
