//! # Sale Number Generation
//!
//! Human-readable sale numbers in the form `{PREFIX}-{yyyymmdd}-{NNNNNN}`:
//!
//! ```text
//! SALE-20260314-402817
//! ──┬─ ───┬──── ───┬──
//!   │     │        └── 6 digits: sub-second clock mixed with a sequence
//!   │     └── UTC date of the sale
//!   └── configurable prefix (SALESDESK_SALE_NUMBER_PREFIX)
//! ```
//!
//! Numbers are not guaranteed unique. The `sales.sale_number` UNIQUE
//! constraint is the arbiter and `create_sale` retries on collision.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};

/// Longest prefix that keeps a full sale number within 50 characters.
pub const MAX_PREFIX_LEN: usize = 34;

const SUFFIX_SPACE: u64 = 1_000_000;

/// Stride between consecutive suffixes within the same microsecond.
const SEQUENCE_STRIDE: u64 = 7_919;

/// Generates sale numbers.
#[derive(Debug)]
pub struct SaleNumberGenerator {
    prefix: String,
    sequence: AtomicU64,
}

impl SaleNumberGenerator {
    /// Creates a generator for the given prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        SaleNumberGenerator {
            prefix: prefix.into(),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Next sale number stamped with the current date.
    pub fn next_number(&self) -> String {
        self.next_at(Utc::now())
    }

    /// Next sale number for an explicit instant.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::{TimeZone, Utc};
    /// use salesdesk_service::SaleNumberGenerator;
    ///
    /// let generator = SaleNumberGenerator::new("SALE");
    /// let at = Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap();
    ///
    /// assert!(generator.next_at(at).starts_with("SALE-20260314-"));
    /// ```
    pub fn next_at(&self, at: DateTime<Utc>) -> String {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        let micros = u64::from(at.timestamp_subsec_micros());
        let suffix = (micros + sequence.wrapping_mul(SEQUENCE_STRIDE)) % SUFFIX_SPACE;

        format!("{}-{}-{:06}", self.prefix, at.format("%Y%m%d"), suffix)
    }
}

impl Default for SaleNumberGenerator {
    fn default() -> Self {
        SaleNumberGenerator::new("SALE")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;

    #[test]
    fn test_format() {
        let generator = SaleNumberGenerator::default();
        let at = Utc.with_ymd_and_hms(2026, 1, 5, 23, 59, 59).unwrap();

        let number = generator.next_at(at);
        let parts: Vec<&str> = number.split('-').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "SALE");
        assert_eq!(parts[1], "20260105");
        assert_eq!(parts[2].len(), 6);
        assert!(parts[2].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_same_instant_yields_distinct_numbers() {
        let generator = SaleNumberGenerator::new("POS");
        let at = Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap();

        let numbers: HashSet<String> = (0..100).map(|_| generator.next_at(at)).collect();

        assert_eq!(numbers.len(), 100);
        assert!(numbers.iter().all(|n| n.starts_with("POS-20260601-")));
    }

    #[test]
    fn test_longest_prefix_fits_sale_number_limit() {
        let generator = SaleNumberGenerator::new("P".repeat(MAX_PREFIX_LEN));

        let number = generator.next_number();

        assert_eq!(number.len(), salesdesk_core::MAX_SALE_NUMBER_LEN);
    }
}
