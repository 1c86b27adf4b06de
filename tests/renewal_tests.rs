use chrono::NaiveDate;
use lockerdesk::application::engine::RenewalEngine;
use lockerdesk::domain::locker::{LockerRegistration, LockerStatus};
use lockerdesk::domain::ports::LockerStore;
use lockerdesk::domain::submission::{PaymentSubmission, RawSubmission};
use lockerdesk::error::LockerError;
use lockerdesk::infrastructure::in_memory::{
    InMemoryLockerStore, InMemoryPaymentStore, InMemorySequence,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn engine_with_store() -> (RenewalEngine, InMemoryLockerStore) {
    let lockers = InMemoryLockerStore::new();
    let engine = RenewalEngine::new(
        Box::new(lockers.clone()),
        Box::new(InMemoryPaymentStore::new()),
        Box::new(InMemorySequence::new()),
    );
    (engine, lockers)
}

fn registration(name: &str, membership: &str) -> LockerRegistration {
    LockerRegistration {
        member_name: Some(name.to_string()),
        membership_id: Some(membership.to_string()),
        start_date: Some(date(2024, 1, 1)),
        ..LockerRegistration::default()
    }
}

fn payment(payment_date: &str, months: &str, fee: &str) -> PaymentSubmission {
    RawSubmission {
        payment_date: Some(payment_date.to_string()),
        months: Some(months.to_string()),
        monthly_fee_override: Some(fee.to_string()),
        charge_late: true,
        ..RawSubmission::default()
    }
    .coerce(date(2024, 6, 1))
}

fn cancellation(payment_date: &str) -> PaymentSubmission {
    RawSubmission {
        payment_date: Some(payment_date.to_string()),
        cancel: true,
        charge_late: true,
        ..RawSubmission::default()
    }
    .coerce(date(2024, 6, 1))
}

#[tokio::test]
async fn test_first_payment_establishes_period() {
    let (engine, lockers) = engine_with_store();
    engine
        .register_locker(3, registration("Asha Rao", "GM-100"))
        .await
        .unwrap();

    let record = engine
        .process_payment(3, payment("2024-01-05", "2", ""))
        .await
        .unwrap();

    assert_eq!(record.receipt_no, 1);
    assert_eq!(record.total, 400);
    assert_eq!(record.period_start, Some(date(2024, 1, 5)));
    assert_eq!(record.period_end, Some(date(2024, 3, 5)));

    let locker = engine.locker(3).await.unwrap();
    let assignment = locker.assignment.as_ref().unwrap();
    assert_eq!(assignment.start_date, Some(date(2024, 1, 5)));
    assert_eq!(assignment.end_date, Some(date(2024, 3, 5)));
    assert_eq!(assignment.last_paid_months, Some(2));
    assert!(assignment.last_payment_at.is_some());
    assert_eq!(lockers.get(3).await.unwrap().unwrap(), locker);
}

#[tokio::test]
async fn test_consecutive_renewals_leave_no_gap() {
    let (engine, lockers) = engine_with_store();
    engine
        .register_locker(3, registration("Asha Rao", "GM-100"))
        .await
        .unwrap();
    engine
        .process_payment(3, payment("2024-01-05", "2", ""))
        .await
        .unwrap();

    // renewing before expiry starts the day after the old period ends
    let record = engine
        .process_payment(3, payment("2024-02-20", "1", ""))
        .await
        .unwrap();

    assert_eq!(record.receipt_no, 2);
    assert_eq!(record.late_days_actual, 0);
    assert_eq!(record.period_start, Some(date(2024, 3, 6)));
    assert_eq!(record.period_end, Some(date(2024, 4, 6)));

    let locker = lockers.get(3).await.unwrap().unwrap();
    assert_eq!(locker.end_date(), Some(date(2024, 4, 6)));
}

#[tokio::test]
async fn test_late_renewal_charges_fine_and_loses_days() {
    let (engine, _) = engine_with_store();
    engine
        .register_locker(3, registration("Asha Rao", "GM-100"))
        .await
        .unwrap();
    engine
        .process_payment(3, payment("2024-01-01", "1", ""))
        .await
        .unwrap();

    // period ended 2024-02-01; paying nine days late
    let record = engine
        .process_payment(3, payment("2024-02-10", "1", ""))
        .await
        .unwrap();

    assert_eq!(record.late_days_actual, 9);
    assert_eq!(record.late_fine, 90);
    assert_eq!(record.total, 290);
    assert_eq!(record.period_start, Some(date(2024, 2, 10)));
}

#[tokio::test]
async fn test_cancellation_clears_locker_and_duplicates() {
    let (engine, lockers) = engine_with_store();
    engine
        .register_locker(1, registration("Asha Rao", "GM-100"))
        .await
        .unwrap();
    // duplicate data entry under a different case
    engine
        .register_locker(2, registration("Asha Rao", "gm-100"))
        .await
        .unwrap();
    engine
        .register_locker(3, registration("Ben Kim", "GM-200"))
        .await
        .unwrap();

    let record = engine
        .process_payment(1, cancellation("2024-02-01"))
        .await
        .unwrap();

    assert!(record.cancelled);
    assert_eq!(record.total, 0);
    assert_eq!(record.membership_id.as_deref(), Some("GM-100"));

    let primary = lockers.get(1).await.unwrap().unwrap();
    assert_eq!(primary.status, LockerStatus::Available);
    assert!(primary.assignment.is_none());
    assert!(primary.cancelled_at.is_some());

    let duplicate = lockers.get(2).await.unwrap().unwrap();
    assert_eq!(duplicate.status, LockerStatus::Available);
    assert!(duplicate.assignment.is_none());

    let unrelated = lockers.get(3).await.unwrap().unwrap();
    assert_eq!(unrelated.status, LockerStatus::Active);
}

#[tokio::test]
async fn test_zero_fee_payment_leaves_dates_untouched() {
    let (engine, lockers) = engine_with_store();
    engine
        .register_locker(3, registration("Asha Rao", "GM-100"))
        .await
        .unwrap();
    engine
        .process_payment(3, payment("2024-01-01", "1", ""))
        .await
        .unwrap();

    let mut sub = payment("2024-02-10", "1", "0");
    sub.key_missing = true;
    let record = engine.process_payment(3, sub).await.unwrap();

    // fines only: 150 key + 90 late
    assert_eq!(record.total, 240);

    let locker = lockers.get(3).await.unwrap().unwrap();
    let assignment = locker.assignment.as_ref().unwrap();
    assert_eq!(assignment.end_date, Some(date(2024, 2, 1)));
    assert_eq!(assignment.start_date, Some(date(2024, 1, 1)));
    // bookkeeping still records the payment
    assert_eq!(assignment.last_paid_months, Some(1));
}

#[tokio::test]
async fn test_unknown_locker_is_reported() {
    let (engine, _) = engine_with_store();

    let result = engine.process_payment(99, payment("2024-01-01", "1", "")).await;
    assert!(matches!(result, Err(LockerError::LockerNotFound(99))));
}

#[tokio::test]
async fn test_receipt_lookup() {
    let (engine, _) = engine_with_store();
    engine
        .register_locker(3, registration("Asha Rao", "GM-100"))
        .await
        .unwrap();
    engine
        .process_payment(3, payment("2024-01-05", "1", ""))
        .await
        .unwrap();

    let receipt = engine.receipt(1).await.unwrap();
    assert_eq!(receipt.member_name.as_deref(), Some("Asha Rao"));

    assert!(matches!(
        engine.receipt(99).await,
        Err(LockerError::ReceiptNotFound(99))
    ));
}

#[tokio::test]
async fn test_receipt_log_is_ordered() {
    let (engine, _) = engine_with_store();
    engine
        .register_locker(3, registration("Asha Rao", "GM-100"))
        .await
        .unwrap();

    for _ in 0..3 {
        engine
            .process_payment(3, payment("2024-01-05", "1", ""))
            .await
            .unwrap();
    }

    let receipts = engine.into_receipts().await.unwrap();
    let numbers: Vec<u64> = receipts.iter().map(|r| r.receipt_no).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
}
