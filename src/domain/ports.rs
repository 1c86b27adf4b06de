use super::locker::Locker;
use super::payment::PaymentRecord;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait LockerStore: Send + Sync {
    async fn store(&self, locker: Locker) -> Result<()>;
    async fn get(&self, locker_no: u32) -> Result<Option<Locker>>;
    async fn get_all(&self) -> Result<Vec<Locker>>;
    /// Releases every other locker assigned to the same membership id
    /// (case-insensitive exact match) and returns how many were cleared.
    async fn release_duplicates(
        &self,
        membership_id: &str,
        exclude: u32,
        at: DateTime<Utc>,
    ) -> Result<u64>;
}

#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn insert(&self, record: PaymentRecord) -> Result<()>;
    async fn get(&self, receipt_no: u64) -> Result<Option<PaymentRecord>>;
    async fn get_all(&self) -> Result<Vec<PaymentRecord>>;
}

#[async_trait]
pub trait SequenceGenerator: Send + Sync {
    /// Atomically increments and returns the counter for `key`, creating it
    /// at zero when absent. Never hands the same value to two callers.
    async fn next(&self, key: &str) -> Result<u64>;
}

pub type LockerStoreBox = Box<dyn LockerStore>;
pub type PaymentStoreBox = Box<dyn PaymentStore>;
pub type SequenceGeneratorBox = Box<dyn SequenceGenerator>;
