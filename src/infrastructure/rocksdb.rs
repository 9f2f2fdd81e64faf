use crate::domain::invoice::Invoice;
use crate::domain::ports::InvoiceStore;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for storing invoice states.
pub const CF_INVOICES: &str = "invoices";

impl From<rocksdb::Error> for PaymentError {
    fn from(e: rocksdb::Error) -> Self {
        PaymentError::InternalError(Box::new(e))
    }
}

/// A persistent invoice store using RocksDB.
///
/// Invoices are keyed by reference and stored as JSON. `Clone` shares the
/// underlying `Arc<DB>`.
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at `path`, ensuring the invoices
    /// column family exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_invoices = ColumnFamilyDescriptor::new(CF_INVOICES, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_invoices])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn invoices_cf(&self) -> Result<&ColumnFamily> {
        self.db.cf_handle(CF_INVOICES).ok_or_else(|| {
            PaymentError::InternalError(Box::new(std::io::Error::other(
                "Invoices column family not found",
            )))
        })
    }

    fn put(&self, invoice: &Invoice) -> Result<()> {
        let cf = self.invoices_cf()?;
        let value = serde_json::to_vec(invoice).map_err(|e| {
            PaymentError::InternalError(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Serialization error: {}", e),
            )))
        })?;
        self.db.put_cf(cf, invoice.reference.as_bytes(), value)?;
        Ok(())
    }
}

fn decode(bytes: &[u8]) -> Result<Invoice> {
    serde_json::from_slice(bytes).map_err(|e| {
        PaymentError::InternalError(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Deserialization error: {}", e),
        )))
    })
}

#[async_trait]
impl InvoiceStore for RocksDBStore {
    async fn get_invoice(&self, reference: &str) -> Result<Option<Invoice>> {
        let cf = self.invoices_cf()?;
        match self.db.get_pinned_cf(cf, reference.as_bytes())? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, invoice: Invoice) -> Result<()> {
        self.put(&invoice)
    }

    async fn add(&self, invoice: Invoice) -> Result<()> {
        let cf = self.invoices_cf()?;
        if self
            .db
            .get_pinned_cf(cf, invoice.reference.as_bytes())?
            .is_some()
        {
            return Err(PaymentError::ValidationError(format!(
                "Invoice {} already exists",
                invoice.reference
            )));
        }
        self.put(&invoice)
    }

    async fn all_invoices(&self) -> Result<Vec<Invoice>> {
        let cf = self.invoices_cf()?;
        let mut invoices = Vec::new();
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item?;
            invoices.push(decode(&value)?);
        }
        Ok(invoices)
    }
}
