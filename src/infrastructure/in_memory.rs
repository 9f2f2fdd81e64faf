use crate::domain::invoice::Invoice;
use crate::domain::ports::InvoiceStore;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for invoices.
///
/// Clones share the same map, so a caller can hand one handle to a
/// `PaymentProcessor` and keep another to inspect what was saved.
#[derive(Default, Clone)]
pub struct InMemoryInvoiceStore {
    invoices: Arc<RwLock<HashMap<String, Invoice>>>,
}

impl InMemoryInvoiceStore {
    /// Creates a new, empty in-memory invoice store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InvoiceStore for InMemoryInvoiceStore {
    async fn get_invoice(&self, reference: &str) -> Result<Option<Invoice>> {
        let invoices = self.invoices.read().await;
        Ok(invoices.get(reference).cloned())
    }

    async fn save(&self, invoice: Invoice) -> Result<()> {
        let mut invoices = self.invoices.write().await;
        invoices.insert(invoice.reference.clone(), invoice);
        Ok(())
    }

    async fn add(&self, invoice: Invoice) -> Result<()> {
        let mut invoices = self.invoices.write().await;
        if invoices.contains_key(&invoice.reference) {
            return Err(PaymentError::ValidationError(format!(
                "Invoice {} already exists",
                invoice.reference
            )));
        }
        invoices.insert(invoice.reference.clone(), invoice);
        Ok(())
    }

    async fn all_invoices(&self) -> Result<Vec<Invoice>> {
        let invoices = self.invoices.read().await;
        Ok(invoices.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::invoice::InvoiceType;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_in_memory_invoice_store() {
        let store = InMemoryInvoiceStore::new();
        let invoice = Invoice::new("INV-1", dec!(100.0), InvoiceType::Commercial).unwrap();

        store.add(invoice.clone()).await.unwrap();
        let retrieved = store.get_invoice("INV-1").await.unwrap().unwrap();
        assert_eq!(retrieved, invoice);

        assert!(store.get_invoice("INV-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_rejects_duplicate_reference() {
        let store = InMemoryInvoiceStore::new();
        let invoice = Invoice::new("INV-1", dec!(10), InvoiceType::Standard).unwrap();

        store.add(invoice.clone()).await.unwrap();
        let result = store.add(invoice).await;
        assert!(matches!(result, Err(PaymentError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_save_overwrites_and_shares_state() {
        let store = InMemoryInvoiceStore::new();
        let handle = store.clone();
        let mut invoice = Invoice::new("INV-1", dec!(10), InvoiceType::Standard).unwrap();
        store.add(invoice.clone()).await.unwrap();

        invoice.amount_paid = dec!(4);
        handle.save(invoice.clone()).await.unwrap();
        handle.save(invoice.clone()).await.unwrap();

        let all = store.all_invoices().await.unwrap();
        assert_eq!(all, vec![invoice]);
    }
}
