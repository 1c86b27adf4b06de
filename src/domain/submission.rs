use crate::domain::payment::DEFAULT_MONTHLY_FEE;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Whether a submission field came through as entered or had a default
/// substituted for it. Malformed front-desk input is never rejected; this
/// records which path each field took.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Coercion {
    Parsed,
    Defaulted,
}

/// A coerced submission field together with its provenance.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Coerced<T> {
    value: T,
    coercion: Coercion,
}

impl<T: Copy> Coerced<T> {
    pub fn parsed(value: T) -> Self {
        Self {
            value,
            coercion: Coercion::Parsed,
        }
    }

    pub fn defaulted(value: T) -> Self {
        Self {
            value,
            coercion: Coercion::Defaulted,
        }
    }

    pub fn value(&self) -> T {
        self.value
    }

    pub fn is_defaulted(&self) -> bool {
        self.coercion == Coercion::Defaulted
    }
}

/// Raw payment form fields as entered at the front desk, before coercion.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct RawSubmission {
    pub payment_date: Option<String>,
    pub cancel: bool,
    pub months: Option<String>,
    pub monthly_fee_override: Option<String>,
    pub key_missing: bool,
    pub charge_late: bool,
}

/// A payment submission with every field already coerced to its working
/// type. This is the only shape the renewal engine accepts.
#[derive(Debug, PartialEq, Clone)]
pub struct PaymentSubmission {
    pub payment_date: Coerced<NaiveDate>,
    pub cancel: bool,
    pub months: Coerced<u32>,
    pub monthly_fee: Coerced<Decimal>,
    pub key_missing: bool,
    pub charge_late: bool,
}

impl RawSubmission {
    /// Coerces the raw fields, substituting defaults instead of failing:
    /// an unparseable date becomes `today`, months below 1 or unparseable
    /// become 1, and a fee override that does not survive cleaning falls
    /// back to the standard fee (negative overrides clamp to zero).
    pub fn coerce(self, today: NaiveDate) -> PaymentSubmission {
        let payment_date = match self.payment_date.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => match parse_date(s) {
                Some(date) => Coerced::parsed(date),
                None => Coerced::defaulted(today),
            },
            _ => Coerced::defaulted(today),
        };

        let months = match self.months.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => match s.parse::<i64>() {
                Ok(m) if m >= 1 => Coerced::parsed(m as u32),
                Ok(_) | Err(_) => Coerced::defaulted(1),
            },
            _ => Coerced::defaulted(1),
        };

        let monthly_fee = match self.monthly_fee_override.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => parse_fee_override(s),
            _ => Coerced::defaulted(Decimal::from(DEFAULT_MONTHLY_FEE)),
        };

        PaymentSubmission {
            payment_date,
            cancel: self.cancel,
            months,
            monthly_fee,
            key_missing: self.key_missing,
            charge_late: self.charge_late,
        }
    }
}

/// Accepts `YYYY-MM-DD` from a date input, with ISO datetime fallbacks.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Strips currency symbols and separators, keeping digits, `.` and `-`.
/// Anything that still does not parse falls back to the default fee, and a
/// negative result clamps to zero.
fn parse_fee_override(s: &str) -> Coerced<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-'))
        .collect();

    if matches!(cleaned.as_str(), "" | "-" | ".") {
        return Coerced::defaulted(Decimal::from(DEFAULT_MONTHLY_FEE));
    }

    match Decimal::from_str(&cleaned) {
        Ok(fee) if fee < Decimal::ZERO => Coerced::parsed(Decimal::ZERO),
        Ok(fee) => Coerced::parsed(fee),
        Err(_) => Coerced::defaulted(Decimal::from(DEFAULT_MONTHLY_FEE)),
    }
}
