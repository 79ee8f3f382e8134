//! Commit clock
//!
//! Commits are stamped through a [`Clock`] so that tests (and scripted users) can
//! pin the time. [`SystemClock`] honours the `BITLET_COMMIT_DATE` environment
//! variable before falling back to the local time.

use anyhow::Context;
use chrono::{DateTime, FixedOffset, Local};

/// Environment variable overriding the commit time
pub const COMMIT_DATE_ENV: &str = "BITLET_COMMIT_DATE";

const COMMIT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

pub trait Clock {
    fn now(&self) -> anyhow::Result<DateTime<FixedOffset>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> anyhow::Result<DateTime<FixedOffset>> {
        match std::env::var(COMMIT_DATE_ENV) {
            Ok(value) if !value.trim().is_empty() => parse_commit_date(&value),
            _ => Ok(Local::now().fixed_offset()),
        }
    }
}

/// Clock that always reports the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<FixedOffset>);

impl FixedClock {
    pub fn new(instant: DateTime<FixedOffset>) -> Self {
        FixedClock(instant)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> anyhow::Result<DateTime<FixedOffset>> {
        Ok(self.0)
    }
}

/// Parse a commit date given as RFC 2822 or `YYYY-MM-DD HH:MM:SS +ZZZZ`
pub fn parse_commit_date(value: &str) -> anyhow::Result<DateTime<FixedOffset>> {
    let value = value.trim();

    DateTime::parse_from_rfc2822(value)
        .or_else(|_| DateTime::parse_from_str(value, COMMIT_DATE_FORMAT))
        .with_context(|| format!("Invalid commit date: {value}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::commit::TIMESTAMP_FORMAT;
    use rstest::rstest;

    #[rstest]
    #[case::rfc2822("Tue, 14 Nov 2023 22:13:20 +0000")]
    #[case::iso_like("2023-11-14 22:13:20 +0000")]
    fn commit_dates_are_accepted_in_both_formats(#[case] input: &str) {
        let parsed = parse_commit_date(input).unwrap();

        assert_eq!(
            parsed.format(TIMESTAMP_FORMAT).to_string(),
            "Tue Nov 14 22:13:20 2023 +0000"
        );
    }

    #[test]
    fn garbage_commit_dates_are_rejected() {
        assert!(parse_commit_date("yesterday").is_err());
    }

    #[test]
    fn fixed_clock_never_moves() {
        let instant = parse_commit_date("2020-01-01 00:00:00 +0200").unwrap();
        let clock = FixedClock::new(instant);

        assert_eq!(clock.now().unwrap(), instant);
        assert_eq!(clock.now().unwrap(), instant);
    }
}
