#![allow(dead_code)]

use async_trait::async_trait;
use invoice_payments::domain::invoice::{Invoice, InvoiceType};
use invoice_payments::domain::payment::Payment;
use invoice_payments::domain::ports::InvoiceStore;
use invoice_payments::error::Result;
use invoice_payments::infrastructure::in_memory::InMemoryInvoiceStore;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const REFERENCE: &str = "INV-1";

/// In-memory store that counts `save` calls.
#[derive(Default, Clone)]
pub struct RecordingStore {
    inner: InMemoryInvoiceStore,
    saves: Arc<AtomicUsize>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InvoiceStore for RecordingStore {
    async fn get_invoice(&self, reference: &str) -> Result<Option<Invoice>> {
        self.inner.get_invoice(reference).await
    }

    async fn save(&self, invoice: Invoice) -> Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save(invoice).await
    }

    async fn add(&self, invoice: Invoice) -> Result<()> {
        self.inner.add(invoice).await
    }

    async fn all_invoices(&self) -> Result<Vec<Invoice>> {
        self.inner.all_invoices().await
    }
}

/// Builds an invoice whose recorded totals agree with its history.
pub fn invoice(amount: Decimal, history: &[Decimal], r#type: InvoiceType) -> Invoice {
    let payments = history.iter().map(|a| Payment::new(REFERENCE, *a)).collect();
    let paid = history.iter().copied().sum();
    Invoice::new(REFERENCE, amount, r#type)
        .unwrap()
        .with_payments(payments, paid, Decimal::ZERO)
}

pub fn payment(amount: Decimal) -> Payment {
    Payment::new(REFERENCE, amount)
}
