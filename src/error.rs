use rust_decimal::Decimal;
use std::path::PathBuf;
use thiserror::Error;

/// Failures that originate in a storage or audit backend.
///
/// The engine never recovers from these; they propagate unchanged through
/// every operation that touches storage.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Unable to load inventory from {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unable to save inventory to {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed inventory record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },
    #[error("Unable to persist audit entry to {}: {source}", path.display())]
    Audit {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Error, Debug)]
pub enum VendingError {
    #[error("Invalid slot: no item exists at {0}")]
    InvalidSlot(String),
    #[error("Duplicate slot: {0} is already occupied")]
    DuplicateSlot(String),
    #[error("Invalid item: {0}")]
    InvalidItem(String),
    #[error("Item at {0} is out of stock")]
    OutOfStock(String),
    #[error("Insufficient funds: {name} costs ${price}, only ${deposited} deposited")]
    InsufficientFunds {
        name: String,
        price: Decimal,
        deposited: Decimal,
    },
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = VendingError> = std::result::Result<T, E>;
