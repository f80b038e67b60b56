use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{Result, StatsError};

/// Standard US date layout used on the command line and echoed in records.
pub const US_DATE_FORMAT: &str = "%m/%d/%Y";

const GIT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Requested reporting window. The input strings are kept so records echo
/// exactly what the user typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
    start_label: String,
    end_label: String,
}

/// Bounds handed to `git log --after/--before`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GitWindow {
    pub after: NaiveDateTime,
    pub before: NaiveDateTime,
}

pub fn parse_us_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), US_DATE_FORMAT).map_err(|_| StatsError::InvalidDate {
        value: value.to_string(),
    })
}

impl DateRange {
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let start_date = parse_us_date(start)?;
        let end_date = parse_us_date(end)?;
        if start_date > end_date {
            return Err(StatsError::InvalidRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self {
            start: start_date,
            end: end_date,
            start_label: start.to_string(),
            end_label: end.to_string(),
        })
    }

    /// The 365 days leading up to `today`.
    pub fn last_year(today: NaiveDate) -> Self {
        let start = today - Duration::days(365);
        Self {
            start,
            end: today,
            start_label: start.format(US_DATE_FORMAT).to_string(),
            end_label: today.format(US_DATE_FORMAT).to_string(),
        }
    }

    /// Resolves optional user input against the default window.
    pub fn resolve(start: Option<&str>, end: Option<&str>, today: NaiveDate) -> Result<Self> {
        let default = Self::last_year(today);
        let start = start.unwrap_or(default.start_label.as_str());
        let end = end.unwrap_or(default.end_label.as_str());
        Self::parse(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn start_label(&self) -> &str {
        &self.start_label
    }

    pub fn end_label(&self) -> &str {
        &self.end_label
    }

    /// git's date filter is exclusive on both ends, so the window is
    /// padded by one day on each side.
    pub fn git_window(&self) -> GitWindow {
        GitWindow {
            after: (self.start - Duration::days(1)).and_time(NaiveTime::MIN),
            before: (self.end + Duration::days(1)).and_time(NaiveTime::MIN),
        }
    }
}

impl GitWindow {
    pub fn after_arg(&self) -> String {
        format!("--after={}", self.after.format(GIT_DATE_FORMAT))
    }

    pub fn before_arg(&self) -> String {
        format!("--before={}", self.before.format(GIT_DATE_FORMAT))
    }
}
