//! Applies payments to invoices.
//!
//! A [`PaymentProcessor`](application::processor::PaymentProcessor) resolves
//! the invoice a payment refers to through an injected
//! [`InvoiceStore`](domain::ports::InvoiceStore), decides which outcome
//! applies, updates the amount paid, tax and payment history when the
//! payment is accepted, and saves the invoice.
//!
//! Hard failures (no matching invoice, a zero-amount invoice with payments)
//! are [`PaymentError`](error::PaymentError)s. Overpayments and payments
//! against settled invoices are ordinary
//! [`PaymentOutcome`](domain::outcome::PaymentOutcome)s.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
