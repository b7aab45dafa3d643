//! Meteorological seasons used for the seasonal boost.
//!
//! Seasons are fixed three-month blocks: December to February is winter,
//! March to May spring, June to August summer and September to November
//! autumn.
//!
//! # Examples
//! ```
//! use chrono::NaiveDate;
//! use talus_core::{Season, same_season};
//!
//! let jan = NaiveDate::from_ymd_opt(2024, 1, 10).expect("valid date");
//! let dec = NaiveDate::from_ymd_opt(2019, 12, 24).expect("valid date");
//! assert_eq!(Season::of(jan), Season::Winter);
//! assert!(same_season(jan, dec));
//! ```

use chrono::{Datelike, NaiveDate};

/// One of the four fixed meteorological seasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Season {
    /// December, January, February.
    Winter,
    /// March, April, May.
    Spring,
    /// June, July, August.
    Summer,
    /// September, October, November.
    Autumn,
}

impl Season {
    /// Map a calendar month (`1..=12`) to its season.
    ///
    /// Returns `None` for values outside the calendar range.
    #[must_use]
    pub const fn from_month(month: u32) -> Option<Self> {
        match month {
            12 | 1 | 2 => Some(Self::Winter),
            3..=5 => Some(Self::Spring),
            6..=8 => Some(Self::Summer),
            9..=11 => Some(Self::Autumn),
            _ => None,
        }
    }

    /// Season containing `date`.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self::from_month(date.month()).unwrap_or(Self::Winter)
    }

    /// Lowercase name used in cache keys and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Winter => "winter",
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Autumn => "autumn",
        }
    }

    /// Report whether `month` falls inside this season.
    #[must_use]
    pub fn contains_month(self, month: u32) -> bool {
        Self::from_month(month) == Some(self)
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Report whether both dates fall in the same season, regardless of year.
#[must_use]
pub fn same_season(a: NaiveDate, b: NaiveDate) -> bool {
    Season::of(a) == Season::of(b)
}
