//! Business order-number value type and legacy-format repair.
//!
//! The current format is `MM/YY-CUSTOMER-SEQUENCE`, e.g. `05/23-ABC-0001`.
//! Older installations persisted numbers in the retired token layout
//! `ORD-<region>-<YYMMDD>-<code>-<sequence>` (e.g. `ORD-XX-230501-ABC-0001`).
//! [`OrderNumber::normalize`] upgrades those on read and falls back to
//! generating a fresh number when a stored value cannot be salvaged, so a
//! loaded order never carries an invalid number.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, warn};

/// Customer code used when a stored number is beyond repair and a fresh
/// number has to be generated.
pub const FALLBACK_CUSTOMER_CODE: &str = "INT";

/// Sequence assigned to generated fallback numbers.
const FALLBACK_SEQUENCE: u32 = 1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderNumberError {
    #[error("Invalid order number layout: {0}")]
    InvalidLayout(String),

    #[error("Invalid month in order number: {0}")]
    InvalidMonth(String),

    #[error("Invalid year in order number: {0}")]
    InvalidYear(String),

    #[error("Invalid customer code in order number: {0}")]
    InvalidCustomerCode(String),

    #[error("Invalid sequence in order number: {0}")]
    InvalidSequence(String),
}

/// A structured, human-meaningful order number in the current format.
///
/// Renders as `MM/YY-CUSTOMER-SEQUENCE` with a zero-padded two-digit month
/// and year and a four-digit (minimum) sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderNumber {
    month: u8,
    year: u8,
    customer_code: String,
    sequence: u32,
}

impl OrderNumber {
    /// Build a number from its parts.
    pub fn new(
        month: u8,
        year: u8,
        customer_code: impl Into<String>,
        sequence: u32,
    ) -> Result<Self, OrderNumberError> {
        if !(1..=12).contains(&month) {
            return Err(OrderNumberError::InvalidMonth(month.to_string()));
        }
        if year > 99 {
            return Err(OrderNumberError::InvalidYear(year.to_string()));
        }
        let customer_code = customer_code.into();
        if !is_valid_customer_code(&customer_code) {
            return Err(OrderNumberError::InvalidCustomerCode(customer_code));
        }
        if sequence == 0 {
            return Err(OrderNumberError::InvalidSequence(sequence.to_string()));
        }
        Ok(Self { month, year, customer_code, sequence })
    }

    /// Strictly parse a current-format number. Legacy values are rejected.
    pub fn parse(raw: &str) -> Result<Self, OrderNumberError> {
        let invalid = || OrderNumberError::InvalidLayout(raw.to_string());

        let (date_part, rest) = raw.split_once('-').ok_or_else(invalid)?;
        let (customer_code, sequence_part) = rest.rsplit_once('-').ok_or_else(invalid)?;
        let (month_part, year_part) = date_part.split_once('/').ok_or_else(invalid)?;

        if month_part.len() != 2 || year_part.len() != 2 {
            return Err(invalid());
        }
        let month: u8 = month_part
            .parse()
            .map_err(|_| OrderNumberError::InvalidMonth(month_part.to_string()))?;
        let year: u8 = year_part
            .parse()
            .map_err(|_| OrderNumberError::InvalidYear(year_part.to_string()))?;
        if sequence_part.len() < 4 || !sequence_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(OrderNumberError::InvalidSequence(sequence_part.to_string()));
        }
        let sequence: u32 = sequence_part
            .parse()
            .map_err(|_| OrderNumberError::InvalidSequence(sequence_part.to_string()))?;

        Self::new(month, year, customer_code, sequence)
    }

    /// Best-effort upgrade of the retired `ORD-<region>-<YYMMDD>-<code>-<seq>`
    /// layout. Returns `None` when the value is not recognisably legacy.
    pub fn from_legacy(raw: &str) -> Option<Self> {
        let parts: Vec<&str> = raw.split('-').collect();
        let [prefix, _region, date, code, sequence] = parts.as_slice() else {
            return None;
        };
        if !prefix.eq_ignore_ascii_case("ORD") {
            return None;
        }
        if date.len() != 6 || !date.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let year: u8 = date[0..2].parse().ok()?;
        let month: u8 = date[2..4].parse().ok()?;
        let sequence: u32 = sequence.parse().ok()?;

        Self::new(month, year, *code, sequence).ok()
    }

    /// Generate a fresh number for the given customer code at `now`.
    pub fn generate(customer_code: &str, now: DateTime<Utc>) -> Self {
        let code = if is_valid_customer_code(customer_code) {
            customer_code.to_string()
        } else {
            FALLBACK_CUSTOMER_CODE.to_string()
        };
        Self {
            month: u8::try_from(now.month()).unwrap_or(1),
            year: u8::try_from(now.year().rem_euclid(100)).unwrap_or(0),
            customer_code: code,
            sequence: FALLBACK_SEQUENCE,
        }
    }

    /// Repair a stored business number without ever failing.
    ///
    /// Strict parse first, then the legacy upgrade path, and as a last resort
    /// a freshly generated number from [`FALLBACK_CUSTOMER_CODE`]. Every
    /// rewrite is logged with its before/after values.
    pub fn normalize(raw: &str) -> Self {
        if let Ok(number) = Self::parse(raw) {
            return number;
        }
        if let Some(upgraded) = Self::from_legacy(raw) {
            info!(
                before = raw,
                after = %upgraded,
                "Upgraded legacy order number to current format"
            );
            return upgraded;
        }
        let generated = Self::generate(FALLBACK_CUSTOMER_CODE, Utc::now());
        warn!(
            before = raw,
            after = %generated,
            "Stored order number is unreadable, generated a replacement"
        );
        generated
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn year(&self) -> u8 {
        self.year
    }

    pub fn customer_code(&self) -> &str {
        &self.customer_code
    }

    pub fn sequence(&self) -> u32 {
        self.sequence
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}/{:02}-{}-{:04}",
            self.month, self.year, self.customer_code, self.sequence
        )
    }
}

impl FromStr for OrderNumber {
    type Err = OrderNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for OrderNumber {
    type Error = OrderNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<OrderNumber> for String {
    fn from(value: OrderNumber) -> Self {
        value.to_string()
    }
}

fn is_valid_customer_code(code: &str) -> bool {
    (2..=8).contains(&code.len())
        && code.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}
