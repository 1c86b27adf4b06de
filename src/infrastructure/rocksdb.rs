use crate::domain::locker::Locker;
use crate::domain::payment::PaymentRecord;
use crate::domain::ports::{LockerStore, PaymentStore, SequenceGenerator};
use crate::error::{LockerError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for storing locker states.
pub const CF_LOCKERS: &str = "lockers";
/// Column Family for the payment record log.
pub const CF_PAYMENTS: &str = "payments";
/// Column Family for sequence counters.
pub const CF_COUNTERS: &str = "counters";

/// A persistent store implementation using RocksDB.
///
/// Handles storage for `Locker`, `PaymentRecord` and the receipt sequence
/// using separate Column Families. Sequence increments are serialized
/// through a mutex held across the read-modify-write, so concurrent callers
/// never receive the same value.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    counter_lock: Arc<Mutex<()>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path, ensuring
    /// the required column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_lockers = ColumnFamilyDescriptor::new(CF_LOCKERS, Options::default());
        let cf_payments = ColumnFamilyDescriptor::new(CF_PAYMENTS, Options::default());
        let cf_counters = ColumnFamilyDescriptor::new(CF_COUNTERS, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_lockers, cf_payments, cf_counters])
            .map_err(|e| LockerError::Internal(Box::new(e)))?;

        Ok(Self {
            db: Arc::new(db),
            counter_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &str) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            LockerError::Internal(Box::new(std::io::Error::other(format!(
                "{} column family not found",
                name
            ))))
        })
    }

    fn put_json<T: serde::Serialize>(&self, cf_name: &str, key: &[u8], value: &T) -> Result<()> {
        let cf = self.cf(cf_name)?;
        let bytes = serde_json::to_vec(value).map_err(|e| LockerError::Internal(Box::new(e)))?;
        self.db
            .put_cf(&cf, key, bytes)
            .map_err(|e| LockerError::Internal(Box::new(e)))
    }

    fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        cf_name: &str,
        key: &[u8],
    ) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        let result = self
            .db
            .get_cf(&cf, key)
            .map_err(|e| LockerError::Internal(Box::new(e)))?;
        match result {
            Some(bytes) => {
                let value =
                    serde_json::from_slice(&bytes).map_err(|e| LockerError::Internal(Box::new(e)))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn scan_json<T: serde::de::DeserializeOwned>(&self, cf_name: &str) -> Result<Vec<T>> {
        let cf = self.cf(cf_name)?;
        let mut values = Vec::new();
        for item in self.db.iterator_cf(&cf, rocksdb::IteratorMode::Start) {
            let (_key, bytes) = item.map_err(|e| LockerError::Internal(Box::new(e)))?;
            let value =
                serde_json::from_slice(&bytes).map_err(|e| LockerError::Internal(Box::new(e)))?;
            values.push(value);
        }
        Ok(values)
    }
}

#[async_trait]
impl LockerStore for RocksDBStore {
    async fn store(&self, locker: Locker) -> Result<()> {
        self.put_json(CF_LOCKERS, &locker.number.to_be_bytes(), &locker)
    }

    async fn get(&self, locker_no: u32) -> Result<Option<Locker>> {
        self.get_json(CF_LOCKERS, &locker_no.to_be_bytes())
    }

    async fn get_all(&self) -> Result<Vec<Locker>> {
        self.scan_json(CF_LOCKERS)
    }

    async fn release_duplicates(
        &self,
        membership_id: &str,
        exclude: u32,
        at: DateTime<Utc>,
    ) -> Result<u64> {
        let lockers: Vec<Locker> = self.scan_json(CF_LOCKERS)?;
        let mut cleared = 0;
        for mut locker in lockers {
            if locker.number != exclude && locker.membership_matches(membership_id) {
                locker.release(at);
                self.put_json(CF_LOCKERS, &locker.number.to_be_bytes(), &locker)?;
                cleared += 1;
            }
        }
        Ok(cleared)
    }
}

#[async_trait]
impl PaymentStore for RocksDBStore {
    async fn insert(&self, record: PaymentRecord) -> Result<()> {
        self.put_json(CF_PAYMENTS, &record.receipt_no.to_be_bytes(), &record)
    }

    async fn get(&self, receipt_no: u64) -> Result<Option<PaymentRecord>> {
        self.get_json(CF_PAYMENTS, &receipt_no.to_be_bytes())
    }

    async fn get_all(&self) -> Result<Vec<PaymentRecord>> {
        self.scan_json(CF_PAYMENTS)
    }
}

#[async_trait]
impl SequenceGenerator for RocksDBStore {
    async fn next(&self, key: &str) -> Result<u64> {
        // The guard spans the read and the write; increments are atomic
        // with respect to every other caller sharing this store.
        let _guard = self.counter_lock.lock().await;
        let cf = self.cf(CF_COUNTERS)?;
        let current = self
            .db
            .get_cf(&cf, key.as_bytes())
            .map_err(|e| LockerError::Internal(Box::new(e)))?
            .map(|bytes| {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(&bytes[..8]);
                u64::from_be_bytes(buf)
            })
            .unwrap_or(0);
        let next = current + 1;
        self.db
            .put_cf(&cf, key.as_bytes(), next.to_be_bytes())
            .map_err(|e| LockerError::Internal(Box::new(e)))?;
        Ok(next)
    }
}
