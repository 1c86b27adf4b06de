use crate::domain::locker::LockerRegistration;
use crate::domain::submission::{RawSubmission, parse_date};
use crate::error::{LockerError, Result};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    Register,
    Payment,
    Cancel,
}

/// One front-desk operation as it appears in the input CSV.
///
/// Checkbox-style fields (`key_missing`, `charge_late`, `no_late_fine`) use
/// the 0/1 convention; everything except `op` and `locker` may be blank.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct OperationRow {
    pub op: OpKind,
    pub locker: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub membership: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub months: Option<String>,
    #[serde(default)]
    pub fee: Option<String>,
    #[serde(default)]
    pub key_missing: Option<u8>,
    #[serde(default)]
    pub charge_late: Option<u8>,
    #[serde(default)]
    pub no_late_fine: Option<u8>,
}

impl OperationRow {
    pub fn into_registration(self) -> LockerRegistration {
        LockerRegistration {
            member_name: self.name,
            membership_id: self.membership,
            mobile: self.mobile,
            gender: self.gender,
            start_date: self.date.as_deref().and_then(parse_date),
            no_late_fine: self.no_late_fine == Some(1),
        }
    }

    pub fn into_raw_submission(self) -> RawSubmission {
        RawSubmission {
            payment_date: self.date,
            cancel: self.op == OpKind::Cancel,
            months: self.months,
            monthly_fee_override: self.fee,
            key_missing: self.key_missing == Some(1),
            // charge_late defaults to true when the column is blank
            charge_late: self.charge_late.map_or(true, |v| v == 1),
        }
    }
}

/// Reads front-desk operations from a CSV source.
///
/// Wraps `csv::Reader` and provides an iterator over `Result<OperationRow>`,
/// handling whitespace trimming and flexible record lengths automatically.
pub struct OperationReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> OperationReader<R> {
    /// Creates a new `OperationReader` from any `Read` source (e.g., File,
    /// Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes operations.
    pub fn operations(self) -> impl Iterator<Item = Result<OperationRow>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(LockerError::from))
    }
}
