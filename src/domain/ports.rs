use super::invoice::Invoice;
use crate::error::Result;
use async_trait::async_trait;

/// Resolves invoices by reference and records their updated state.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Returns `None` when no invoice is registered under `reference`.
    async fn get_invoice(&self, reference: &str) -> Result<Option<Invoice>>;
    /// Overwrites the stored invoice. Must be safe to call with unchanged data.
    async fn save(&self, invoice: Invoice) -> Result<()>;
    /// Registers a new invoice, rejecting a reference that is already taken.
    async fn add(&self, invoice: Invoice) -> Result<()>;
    async fn all_invoices(&self) -> Result<Vec<Invoice>>;
}

pub type InvoiceStoreBox = Box<dyn InvoiceStore>;

/// Builds a fresh store, e.g. one per worker task.
pub type InvoiceStoreFactory = Box<dyn Fn() -> InvoiceStoreBox + Send + Sync>;
