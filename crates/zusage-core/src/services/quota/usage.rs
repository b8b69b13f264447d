//! Time ranges for the model-usage endpoint

use chrono::{Local, NaiveDateTime, TimeDelta};

use crate::error::{Error, Result};

/// Timestamp format the model-usage endpoint expects
pub const USAGE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Query window for `fetch_usage`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageRange {
    pub start: String,
    pub end: String,
}

impl UsageRange {
    /// Range between two local timestamps; `start` must precede `end`
    pub fn between(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self> {
        if start >= end {
            return Err(Error::validation(format!(
                "usage range start {} is not before end {}",
                start, end
            )));
        }
        Ok(Self {
            start: start.format(USAGE_TIME_FORMAT).to_string(),
            end: end.format(USAGE_TIME_FORMAT).to_string(),
        })
    }

    /// The `hours` hours ending at `end`
    pub fn last_hours_from(end: NaiveDateTime, hours: u32) -> Result<Self> {
        let start = TimeDelta::try_hours(i64::from(hours))
            .and_then(|span| end.checked_sub_signed(span))
            .ok_or_else(|| {
                Error::validation(format!("usage range of {} hours is out of range", hours))
            })?;
        Self::between(start, end)
    }

    /// The `hours` hours ending now, local time
    pub fn last_hours(hours: u32) -> Result<Self> {
        Self::last_hours_from(Local::now().naive_local(), hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_last_hours_from() {
        let range = UsageRange::last_hours_from(at(12, 30), 24).unwrap();
        assert_eq!(range.start, "2026-10-18 12:30:00");
        assert_eq!(range.end, "2026-10-19 12:30:00");
    }

    #[test]
    fn test_zero_hours_rejected() {
        let err = UsageRange::last_hours_from(at(12, 0), 0).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_huge_hours_rejected() {
        let err = UsageRange::last_hours_from(at(12, 0), u32::MAX).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("4294967295"));
    }

    #[test]
    fn test_between_requires_order() {
        assert!(UsageRange::between(at(10, 0), at(9, 0)).is_err());
        assert!(UsageRange::between(at(9, 0), at(10, 0)).is_ok());
    }
}
