use std::path::PathBuf;
use thiserror::Error;

/// Batch input could not be accepted; nothing has been processed yet.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("missing columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("unsupported table format {0:?}; expected .csv")]
    UnsupportedFormat(PathBuf),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Writing the record store failed. Read failures never surface here; an
/// unreadable store is treated as empty.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("could not replace store file: {0}")]
    Persist(#[from] tempfile::PersistError),
}
