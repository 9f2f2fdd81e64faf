use crate::domain::ports::InvoiceStoreBox;
use crate::error::{PaymentError, Result};
use crate::infrastructure::in_memory::InMemoryInvoiceStore;
use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;

/// Selects the invoice storage backend.
///
/// Parsed from JSON tagged by `backend`, e.g. `{"backend":"memory"}` or
/// `{"backend":"rocksdb","path":"/var/lib/invoices"}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StorageConfig {
    #[default]
    Memory,
    RocksDb { path: PathBuf },
}

impl StorageConfig {
    /// Opens the configured store.
    ///
    /// Without the `storage-rocksdb` feature a RocksDB request falls back to
    /// in-memory storage.
    pub fn open(&self) -> Result<InvoiceStoreBox> {
        match self {
            StorageConfig::Memory => Ok(Box::new(InMemoryInvoiceStore::new())),
            StorageConfig::RocksDb { path } => open_rocksdb(path),
        }
    }
}

#[cfg(feature = "storage-rocksdb")]
fn open_rocksdb(path: &std::path::Path) -> Result<InvoiceStoreBox> {
    use crate::infrastructure::rocksdb::RocksDBStore;

    tracing::debug!(path = %path.display(), "opening rocksdb invoice store");
    Ok(Box::new(RocksDBStore::open(path)?))
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_rocksdb(path: &std::path::Path) -> Result<InvoiceStoreBox> {
    tracing::warn!(
        path = %path.display(),
        "persistent storage requested but the 'storage-rocksdb' feature is not enabled, falling back to in-memory storage"
    );
    Ok(Box::new(InMemoryInvoiceStore::new()))
}

impl FromStr for StorageConfig {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| PaymentError::ValidationError(e.to_string()))
    }
}
