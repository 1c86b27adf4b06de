use crate::domain::payment::PaymentRecord;
use crate::error::Result;
use std::io::Write;

/// Writes the receipt log as CSV.
///
/// Dates are emitted as `YYYY-MM-DD`; absent fields are left blank so the
/// output stays stable for downstream tooling.
pub struct ReceiptWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ReceiptWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_receipts(&mut self, receipts: Vec<PaymentRecord>) -> Result<()> {
        self.writer.write_record([
            "receipt_no",
            "locker",
            "membership",
            "name",
            "payment_date",
            "months",
            "monthly_fee",
            "key_missing_fine",
            "late_days_charged",
            "late_fine",
            "total",
            "cancelled",
            "period_start",
            "period_end",
        ])?;

        for receipt in receipts {
            self.writer.write_record([
                receipt.receipt_no.to_string(),
                receipt.locker_no.to_string(),
                receipt.membership_id.unwrap_or_default(),
                receipt.member_name.unwrap_or_default(),
                receipt.payment_date.to_string(),
                receipt.months.to_string(),
                receipt.monthly_fee_applied.to_string(),
                receipt.key_missing_fine.to_string(),
                receipt.late_days_charged.to_string(),
                receipt.late_fine.to_string(),
                receipt.total.to_string(),
                receipt.cancelled.to_string(),
                receipt
                    .period_start
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
                receipt
                    .period_end
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
            ])?;
        }

        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn receipt() -> PaymentRecord {
        PaymentRecord {
            receipt_no: 1,
            locker_no: 3,
            payment_date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            months: 2,
            monthly_fee_applied: 200,
            key_missing: false,
            key_missing_fine: 0,
            late_days_actual: 9,
            late_days_charged: 9,
            late_fine: 90,
            charge_late_choice: true,
            permanent_exempt_applied: false,
            total: 490,
            membership_id: Some("GM-100".into()),
            member_name: Some("Asha Rao".into()),
            cancelled: false,
            period_start: NaiveDate::from_ymd_opt(2024, 3, 10),
            period_end: NaiveDate::from_ymd_opt(2024, 5, 10),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_writer_output() {
        let mut buf = Vec::new();
        {
            let mut writer = ReceiptWriter::new(&mut buf);
            writer.write_receipts(vec![receipt()]).unwrap();
        }

        let output = String::from_utf8(buf).unwrap();
        let mut lines = output.lines();
        assert_eq!(
            lines.next().unwrap(),
            "receipt_no,locker,membership,name,payment_date,months,monthly_fee,key_missing_fine,late_days_charged,late_fine,total,cancelled,period_start,period_end"
        );
        assert_eq!(
            lines.next().unwrap(),
            "1,3,GM-100,Asha Rao,2024-03-10,2,200,0,9,90,490,false,2024-03-10,2024-05-10"
        );
    }

    #[test]
    fn test_writer_blank_optional_fields() {
        let mut record = receipt();
        record.membership_id = None;
        record.member_name = None;
        record.period_end = None;
        record.cancelled = true;

        let mut buf = Vec::new();
        {
            let mut writer = ReceiptWriter::new(&mut buf);
            writer.write_receipts(vec![record]).unwrap();
        }

        let output = String::from_utf8(buf).unwrap();
        assert!(output.lines().nth(1).unwrap().ends_with("true,2024-03-10,"));
    }
}
