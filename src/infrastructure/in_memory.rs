use crate::domain::locker::Locker;
use crate::domain::payment::PaymentRecord;
use crate::domain::ports::{LockerStore, PaymentStore, SequenceGenerator};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// A thread-safe in-memory store for lockers.
///
/// Uses `Arc<RwLock<HashMap<u32, Locker>>>` to allow shared concurrent
/// access. Ideal for testing or a single front-desk session where
/// persistence is not required.
#[derive(Default, Clone)]
pub struct InMemoryLockerStore {
    lockers: Arc<RwLock<HashMap<u32, Locker>>>,
}

impl InMemoryLockerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LockerStore for InMemoryLockerStore {
    async fn store(&self, locker: Locker) -> Result<()> {
        let mut lockers = self.lockers.write().await;
        lockers.insert(locker.number, locker);
        Ok(())
    }

    async fn get(&self, locker_no: u32) -> Result<Option<Locker>> {
        let lockers = self.lockers.read().await;
        Ok(lockers.get(&locker_no).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Locker>> {
        let lockers = self.lockers.read().await;
        let mut all: Vec<Locker> = lockers.values().cloned().collect();
        all.sort_by_key(|l| l.number);
        Ok(all)
    }

    async fn release_duplicates(
        &self,
        membership_id: &str,
        exclude: u32,
        at: DateTime<Utc>,
    ) -> Result<u64> {
        let mut lockers = self.lockers.write().await;
        let mut cleared = 0;
        for locker in lockers.values_mut() {
            if locker.number != exclude && locker.membership_matches(membership_id) {
                locker.release(at);
                cleared += 1;
            }
        }
        Ok(cleared)
    }
}

/// A thread-safe in-memory append-only log of payment records, keyed by
/// receipt number.
#[derive(Default, Clone)]
pub struct InMemoryPaymentStore {
    payments: Arc<RwLock<BTreeMap<u64, PaymentRecord>>>,
}

impl InMemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn insert(&self, record: PaymentRecord) -> Result<()> {
        let mut payments = self.payments.write().await;
        payments.insert(record.receipt_no, record);
        Ok(())
    }

    async fn get(&self, receipt_no: u64) -> Result<Option<PaymentRecord>> {
        let payments = self.payments.read().await;
        Ok(payments.get(&receipt_no).cloned())
    }

    async fn get_all(&self) -> Result<Vec<PaymentRecord>> {
        let payments = self.payments.read().await;
        Ok(payments.values().cloned().collect())
    }
}

/// In-memory sequence counters. The increment happens under a single lock,
/// so concurrent callers always observe distinct, gap-free values.
#[derive(Default, Clone)]
pub struct InMemorySequence {
    counters: Arc<Mutex<HashMap<String, u64>>>,
}

impl InMemorySequence {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SequenceGenerator for InMemorySequence {
    async fn next(&self, key: &str) -> Result<u64> {
        let mut counters = self.counters.lock().await;
        let counter = counters.entry(key.to_string()).or_insert(0);
        *counter += 1;
        Ok(*counter)
    }
}
