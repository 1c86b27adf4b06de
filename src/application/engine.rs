use crate::domain::locker::{Locker, LockerRegistration};
use crate::domain::payment::{
    KEY_MISSING_FINE, LATE_FINE_PER_DAY, PaymentRecord, RECEIPT_SEQUENCE,
};
use crate::domain::ports::{LockerStoreBox, PaymentStoreBox, SequenceGeneratorBox};
use crate::domain::submission::PaymentSubmission;
use crate::error::{LockerError, Result};
use chrono::{DateTime, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// The locker change a payment outcome asks the caller to apply.
#[derive(Debug, PartialEq, Clone)]
pub enum LockerMutation {
    /// A regular payment. `period` is present only when the resolved fee
    /// was strictly positive; a zero fee records the payment without moving
    /// the locker's dates.
    Renewal {
        period: Option<(NaiveDate, NaiveDate)>,
        months: u32,
    },
    /// A cancellation: release the locker and clear any other locker held
    /// under the same membership id.
    Cancellation { membership_id: Option<String> },
}

/// A computed payment: the immutable receipt plus the locker change.
#[derive(Debug, PartialEq, Clone)]
pub struct PaymentOutcome {
    pub record: PaymentRecord,
    pub mutation: LockerMutation,
}

/// Computes a payment outcome from a locker snapshot and a coerced
/// submission. Pure and deterministic: the same snapshot and submission
/// always produce the same amounts and dates.
pub fn compute_payment_outcome(
    locker: &Locker,
    submission: &PaymentSubmission,
    receipt_no: u64,
    now: DateTime<Utc>,
) -> PaymentOutcome {
    let payment_date = submission.payment_date.value();
    let existing_end = locker.end_date();

    let late_days_actual = existing_end
        .map(|end| (payment_date - end).num_days().max(0))
        .unwrap_or(0);

    // The permanent exemption wins over the staff choice for this payment.
    let permanent_exempt = locker.no_late_fine;
    let late_days_charged = if permanent_exempt || !submission.charge_late {
        0
    } else {
        late_days_actual
    };
    let late_fine = late_days_charged * LATE_FINE_PER_DAY;

    let key_missing_fine = if submission.key_missing {
        KEY_MISSING_FINE
    } else {
        0
    };

    // The new period starts the day after the old one ends, unless the
    // payment came in later than that: a late payer loses the late days.
    let start_date = match existing_end {
        Some(end) => end
            .succ_opt()
            .map_or(payment_date, |next| next.max(payment_date)),
        None => payment_date,
    };

    let membership_id = locker.membership_id().map(str::to_owned);
    let member_name = locker
        .assignment
        .as_ref()
        .and_then(|a| a.member_name.clone());
    let months = submission.months.value();

    let (fee, total, period_end, mutation) = if submission.cancel {
        (
            Decimal::ZERO,
            0,
            None,
            LockerMutation::Cancellation {
                membership_id: membership_id.clone(),
            },
        )
    } else {
        let fee = submission.monthly_fee.value();
        let fines = Decimal::from(key_missing_fine + late_fine);
        let total = (fee * Decimal::from(months) + fines)
            .round()
            .to_i64()
            .unwrap_or(0);
        let end_date = start_date
            .checked_add_months(Months::new(months))
            .unwrap_or(start_date);
        let period = (fee > Decimal::ZERO).then_some((start_date, end_date));
        (
            fee,
            total,
            Some(end_date),
            LockerMutation::Renewal { period, months },
        )
    };

    let record = PaymentRecord {
        receipt_no,
        locker_no: locker.number,
        payment_date,
        months,
        monthly_fee_applied: fee.round().to_i64().unwrap_or(0),
        key_missing: submission.key_missing,
        key_missing_fine,
        late_days_actual,
        late_days_charged,
        late_fine,
        charge_late_choice: submission.charge_late,
        permanent_exempt_applied: permanent_exempt,
        total,
        membership_id,
        member_name,
        cancelled: submission.cancel,
        period_start: Some(start_date),
        period_end,
        created_at: now,
    };

    PaymentOutcome { record, mutation }
}

/// The main entry point for the locker rental workflow.
///
/// `RenewalEngine` owns the storage ports and applies each payment as a
/// bounded synchronous sequence: allocate a receipt number, compute the
/// outcome, persist the receipt, then mutate the locker. The duplicate
/// membership cleanup after a cancellation is best-effort; its failure is
/// logged, never propagated.
pub struct RenewalEngine {
    locker_store: LockerStoreBox,
    payment_store: PaymentStoreBox,
    sequence: SequenceGeneratorBox,
}

impl RenewalEngine {
    pub fn new(
        locker_store: LockerStoreBox,
        payment_store: PaymentStoreBox,
        sequence: SequenceGeneratorBox,
    ) -> Self {
        Self {
            locker_store,
            payment_store,
            sequence,
        }
    }

    /// Registers a new locker assignment. The rental period's end date is
    /// left unset; the first payment establishes it.
    pub async fn register_locker(
        &self,
        locker_no: u32,
        registration: LockerRegistration,
    ) -> Result<()> {
        let locker = Locker::register(locker_no, registration, Utc::now());
        self.locker_store.store(locker).await
    }

    /// Processes one payment submission against a locker and returns the
    /// receipt. Fails only when the locker does not exist or a primary
    /// store write fails; malformed input never reaches this far.
    pub async fn process_payment(
        &self,
        locker_no: u32,
        submission: PaymentSubmission,
    ) -> Result<PaymentRecord> {
        let mut locker = self
            .locker_store
            .get(locker_no)
            .await?
            .ok_or(LockerError::LockerNotFound(locker_no))?;

        let receipt_no = self.sequence.next(RECEIPT_SEQUENCE).await?;
        let now = Utc::now();
        let outcome = compute_payment_outcome(&locker, &submission, receipt_no, now);

        self.payment_store.insert(outcome.record.clone()).await?;

        match outcome.mutation {
            LockerMutation::Renewal { period, months } => {
                if let Some((start, end)) = period {
                    locker.extend(start, end, now);
                }
                locker.note_payment(months, now);
                self.locker_store.store(locker).await?;
            }
            LockerMutation::Cancellation { membership_id } => {
                locker.release(now);
                self.locker_store.store(locker).await?;
                if let Some(membership_id) = membership_id {
                    match self
                        .locker_store
                        .release_duplicates(&membership_id, locker_no, now)
                        .await
                    {
                        Ok(cleared) if cleared > 0 => {
                            tracing::debug!(%membership_id, cleared, "released duplicate lockers");
                        }
                        Ok(_) => {}
                        Err(e) => {
                            tracing::warn!(%membership_id, error = %e, "failed to release duplicate lockers");
                        }
                    }
                }
            }
        }

        Ok(outcome.record)
    }

    pub async fn locker(&self, locker_no: u32) -> Result<Locker> {
        self.locker_store
            .get(locker_no)
            .await?
            .ok_or(LockerError::LockerNotFound(locker_no))
    }

    pub async fn receipt(&self, receipt_no: u64) -> Result<PaymentRecord> {
        self.payment_store
            .get(receipt_no)
            .await?
            .ok_or(LockerError::ReceiptNotFound(receipt_no))
    }

    /// Consumes the engine and returns the full receipt log in receipt
    /// number order.
    pub async fn into_receipts(self) -> Result<Vec<PaymentRecord>> {
        let mut receipts = self.payment_store.get_all().await?;
        receipts.sort_by_key(|r| r.receipt_no);
        Ok(receipts)
    }
}
