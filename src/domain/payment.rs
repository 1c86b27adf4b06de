use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Standard monthly rental fee when the front desk does not override it.
pub const DEFAULT_MONTHLY_FEE: i64 = 200;
/// Flat fine when the locker key was not returned.
pub const KEY_MISSING_FINE: i64 = 150;
/// Per-day fine for paying after the previous period ended.
pub const LATE_FINE_PER_DAY: i64 = 10;

/// Sequence key under which receipt numbers are allocated.
pub const RECEIPT_SEQUENCE: &str = "receipt_no";

/// One processed payment or cancellation, immutable once created.
///
/// `locker_no` doubles as the locker reference and the historical snapshot:
/// the locker number is the primary key here, and the member identity fields
/// are copied in so the receipt stays accurate even after the locker is
/// reassigned. The amount invariant is
/// `total = monthly_fee_applied * months + key_missing_fine + late_fine`,
/// except for cancellations where `total` is zero.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct PaymentRecord {
    pub receipt_no: u64,
    pub locker_no: u32,
    pub payment_date: NaiveDate,
    pub months: u32,
    pub monthly_fee_applied: i64,
    pub key_missing: bool,
    pub key_missing_fine: i64,
    pub late_days_actual: i64,
    pub late_days_charged: i64,
    pub late_fine: i64,
    pub charge_late_choice: bool,
    pub permanent_exempt_applied: bool,
    pub total: i64,
    pub membership_id: Option<String>,
    pub member_name: Option<String>,
    pub cancelled: bool,
    /// Start of the period this receipt covers. Present on cancellation
    /// receipts too, since the would-be start is part of the receipt.
    pub period_start: Option<NaiveDate>,
    /// End of the paid period; absent on cancellation receipts.
    pub period_end: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}
