use thiserror::Error;

pub type Result<T> = std::result::Result<T, LockerError>;

#[derive(Error, Debug)]
pub enum LockerError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("locker {0} not found")]
    LockerNotFound(u32),
    #[error("receipt {0} not found")]
    ReceiptNotFound(u64),
    #[error("internal error: {0}")]
    Internal(Box<dyn std::error::Error + Send + Sync>),
}
