use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};

use regex::Regex;

use serde::{Serialize, Serializer};

use crate::error::{Error, Field, Result};

/// A calendar month, written as `MM-YYYY`
/// NOTE: Stored as the first day of the month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MonthYear(NaiveDate);

impl MonthYear {
    pub fn new(month: u32, year: i32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }
    /// Parse a user supplied value, tagging failures with the field they came from
    pub fn parse_field(value: &str, field: Field) -> Result<Self> {
        value
            .parse::<Self>()
            .map_err(|reason| Error::invalid(field, reason))
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn as_date(&self) -> NaiveDate {
        self.0
    }
}

impl FromStr for MonthYear {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        lazy_static::lazy_static! {
            static ref MONTH_YEAR_REGEX: Regex = Regex::new(r"^(0[1-9]|1[0-2])-([0-9]{4})$").unwrap();
        }

        let captures = MONTH_YEAR_REGEX
            .captures(value)
            .ok_or_else(|| format!("'{}' is not a valid date, expected format MM-YYYY", value))?;

        let month: u32 = captures[1]
            .parse()
            .map_err(|_| format!("'{}' has an invalid month", value))?;
        let year: i32 = captures[2]
            .parse()
            .map_err(|_| format!("'{}' has an invalid year", value))?;

        Self::new(month, year).ok_or_else(|| format!("'{}' is out of range", value))
    }
}

impl From<NaiveDate> for MonthYear {
    fn from(date: NaiveDate) -> Self {
        // Normalize to the first of the month
        Self(date.with_day(1).unwrap_or(date))
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:04}", self.month(), self.year())
    }
}

impl Serialize for MonthYear {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
