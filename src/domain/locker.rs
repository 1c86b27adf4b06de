use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum LockerStatus {
    Available,
    Active,
}

/// Member assignment details carried by an active locker.
///
/// The front desk enters these by hand, so every field is tolerant of being
/// absent. `end_date` stays unset until the first payment computes a rental
/// period.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Assignment {
    pub member_name: Option<String>,
    pub membership_id: Option<String>,
    pub mobile: Option<String>,
    pub gender: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub last_paid_months: Option<u32>,
    pub last_payment_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Details captured when a locker is first handed out.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct LockerRegistration {
    pub member_name: Option<String>,
    pub membership_id: Option<String>,
    pub mobile: Option<String>,
    pub gender: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub no_late_fine: bool,
}

/// Represents the current state of one physical locker slot.
///
/// Invariant: when `status` is `Available` the assignment is absent; when
/// `Active` an assignment is present and its `end_date` (once set) is never
/// before its `start_date`. The `no_late_fine` exemption belongs to the
/// locker itself and survives cancellation.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Locker {
    pub number: u32,
    pub status: LockerStatus,
    pub assignment: Option<Assignment>,
    pub no_late_fine: bool,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Locker {
    /// Creates an active locker from a front-desk registration. The rental
    /// period's end date is left unset until the first payment.
    pub fn register(number: u32, registration: LockerRegistration, at: DateTime<Utc>) -> Self {
        Self {
            number,
            status: LockerStatus::Active,
            assignment: Some(Assignment {
                member_name: registration.member_name,
                membership_id: registration.membership_id,
                mobile: registration.mobile,
                gender: registration.gender,
                start_date: registration.start_date,
                ..Assignment::default()
            }),
            no_late_fine: registration.no_late_fine,
            cancelled_at: None,
            created_at: at,
        }
    }

    /// The end of the current rental period, if one has been paid for.
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.assignment.as_ref().and_then(|a| a.end_date)
    }

    pub fn membership_id(&self) -> Option<&str> {
        self.assignment.as_ref().and_then(|a| a.membership_id.as_deref())
    }

    /// Case-insensitive exact match on the membership id.
    pub fn membership_matches(&self, membership_id: &str) -> bool {
        self.membership_id()
            .is_some_and(|id| id.eq_ignore_ascii_case(membership_id))
    }

    /// Days until the current period expires; negative once expired, `None`
    /// when no period has been paid for.
    pub fn days_to_expiry(&self, today: NaiveDate) -> Option<i64> {
        self.end_date().map(|end| (end - today).num_days())
    }

    /// Moves the rental period to the given bounds and marks the locker
    /// active. A locker paid for without a surviving assignment gets an
    /// empty one rather than rejecting the payment.
    pub fn extend(&mut self, start: NaiveDate, end: NaiveDate, at: DateTime<Utc>) {
        let assignment = self.assignment.get_or_insert_with(Assignment::default);
        assignment.start_date = Some(start);
        assignment.end_date = Some(end);
        assignment.updated_at = Some(at);
        self.status = LockerStatus::Active;
    }

    /// Records the bookkeeping trail of a payment without touching dates.
    pub fn note_payment(&mut self, months: u32, at: DateTime<Utc>) {
        let assignment = self.assignment.get_or_insert_with(Assignment::default);
        assignment.last_paid_months = Some(months);
        assignment.last_payment_at = Some(at);
    }

    /// Clears the assignment and returns the locker to the available pool.
    pub fn release(&mut self, at: DateTime<Utc>) {
        self.assignment = None;
        self.status = LockerStatus::Available;
        self.cancelled_at = Some(at);
    }
}
