//! Reference ids for finalized wizards
//!
//! A reference id is the flow's three-letter prefix followed by the last
//! eight digits of a millisecond counter, e.g. `PAY73920481`. The counter
//! is strictly increasing, so ids never repeat within a generator.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Default)]
pub struct ReferenceGenerator {
    last: i64,
}

const MODULUS: i64 = 100_000_000;

impl ReferenceGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next id for `prefix`
    pub fn next(&mut self, prefix: &str, now: DateTime<Utc>) -> String {
        let counter = now.timestamp_millis().max(self.last + 1);
        self.last = counter;
        format!("{}{:08}", prefix, counter.rem_euclid(MODULUS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format() {
        let mut generator = ReferenceGenerator::new();
        let now = Utc.timestamp_millis_opt(1_730_000_012_345).unwrap();
        assert_eq!(generator.next("PAY", now), "PAY00012345");
    }

    #[test]
    fn test_unique_within_same_millisecond() {
        let mut generator = ReferenceGenerator::new();
        let now = Utc::now();
        let a = generator.next("CNV", now);
        let b = generator.next("CNV", now);
        assert_ne!(a, b);
        assert_eq!(a.len(), 11);
        assert!(b.starts_with("CNV"));
        assert!(b[3..].chars().all(|c| c.is_ascii_digit()));
    }
}
