//! Reporting period for the transactions query.

use chrono::NaiveDate;
use thiserror::Error;

/// Date format accepted on the command line and sent to the API.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Rejected date arguments. Raised before any network or file activity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Start date lies in the future.
    #[error("Your start date cannot be after today.")]
    StartAfterToday,

    /// End date lies in the future.
    #[error("Your end date cannot be after today.")]
    EndAfterToday,

    /// Start date lies after the end date.
    #[error("Your start date must not be after your end date.")]
    StartAfterEnd,

    /// A date could not be parsed.
    #[error("Start or end date in invalid format. Format must be yyyy-mm-dd with no quotes.")]
    InvalidFormat,
}

/// An inclusive, validated date range ending no later than today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl DateRange {
    /// Parse and validate `start`/`end` against `today`.
    ///
    /// Checks run in a fixed order: format, start vs today, end vs today,
    /// start vs end.
    pub fn validate(start: &str, end: &str, today: NaiveDate) -> Result<Self, ValidationError> {
        let from = NaiveDate::parse_from_str(start, DATE_FORMAT)
            .map_err(|_| ValidationError::InvalidFormat)?;
        let to = NaiveDate::parse_from_str(end, DATE_FORMAT)
            .map_err(|_| ValidationError::InvalidFormat)?;

        if from > today {
            return Err(ValidationError::StartAfterToday);
        }
        if to > today {
            return Err(ValidationError::EndAfterToday);
        }
        if from > to {
            return Err(ValidationError::StartAfterEnd);
        }
        Ok(Self { from, to })
    }

    /// First day of the range.
    #[must_use]
    pub const fn from(&self) -> NaiveDate {
        self.from
    }

    /// Last day of the range, inclusive.
    #[must_use]
    pub const fn to(&self) -> NaiveDate {
        self.to
    }

    /// `FromDate` query value.
    #[must_use]
    pub fn from_param(&self) -> String {
        self.from.format(DATE_FORMAT).to_string()
    }

    /// `ToDate` query value.
    #[must_use]
    pub fn to_param(&self) -> String {
        self.to.format(DATE_FORMAT).to_string()
    }
}
