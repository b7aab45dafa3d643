//! Difficulty grades parsed onto ordered numeric scales.
//!
//! Each supported system maps to its own scale. Grades from different
//! systems are incomparable: [`Grade::difference`] returns `None` and callers
//! fall back to a neutral weight.
//!
//! | System | Examples | Scale |
//! |--------|----------|-------|
//! | Yosemite Decimal | `5.9+`, `5.10a`, `5.12d` | number after `5.`, letters add quarters |
//! | V-scale | `VB`, `V4`, `V10` | `VB` is `-1` |
//! | Water ice | `WI3`, `WI5+` | number after `WI` |
//! | Mixed | `M5`, `M8-` | number after `M` |
//! | Commitment | `III`, `V` | roman numeral |
//!
//! # Examples
//! ```
//! use talus_core::{Grade, GradeSystem};
//!
//! let grade: Grade = "5.10b".parse().expect("valid YDS grade");
//! assert_eq!(grade.system, GradeSystem::Yds);
//! assert_eq!(grade.value, 10.25);
//! ```
#![expect(
    clippy::float_arithmetic,
    reason = "grade letters and modifiers offset the numeric scale"
)]

use thiserror::Error;

const PLUS_MODIFIER: f64 = 0.3;

/// Grading system a [`Grade`] was expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum GradeSystem {
    /// Yosemite Decimal System for rock.
    Yds,
    /// Hueco V-scale for boulder problems.
    VScale,
    /// Water ice grades.
    WaterIce,
    /// Mixed climbing grades.
    Mixed,
    /// Alpine commitment grades.
    Commitment,
}

/// A difficulty grade on an ordered numeric scale.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grade {
    /// System the grade belongs to.
    pub system: GradeSystem,
    /// Position on the system's scale.
    pub value: f64,
}

/// Errors returned by [`Grade::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GradeParseError {
    /// The grade text was empty or whitespace.
    #[error("grade text is empty")]
    Empty,
    /// No token in the text matched a supported grading system.
    #[error("unrecognised grade '{0}'")]
    Unrecognised(String),
}

impl Grade {
    /// Parse the first recognisable grade token in `text`.
    ///
    /// Tokens are separated by whitespace, commas or slashes, so compound
    /// descriptions such as `"5.10a R"` or `"WI4/M5"` resolve to their first
    /// grade.
    ///
    /// # Errors
    /// Returns [`GradeParseError::Empty`] for blank input and
    /// [`GradeParseError::Unrecognised`] when no token parses.
    pub fn parse(text: &str) -> Result<Self, GradeParseError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(GradeParseError::Empty);
        }
        trimmed
            .split(|c: char| c.is_whitespace() || c == ',' || c == '/')
            .filter(|token| !token.is_empty())
            .find_map(parse_token)
            .ok_or_else(|| GradeParseError::Unrecognised(trimmed.to_owned()))
    }

    /// Parse optional grade text, treating absence and failures alike.
    #[must_use]
    pub fn parse_optional(text: Option<&str>) -> Option<Self> {
        text.and_then(|raw| Self::parse(raw).ok())
    }

    /// Signed distance from `other` on the shared scale.
    ///
    /// Returns `None` when the grades belong to different systems.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Option<f64> {
        (self.system == other.system).then(|| self.value - other.value)
    }
}

impl std::str::FromStr for Grade {
    type Err = GradeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_token(token: &str) -> Option<Grade> {
    let lowered = token.to_ascii_lowercase();
    if let Some(rest) = lowered.strip_prefix("5.") {
        return parse_yds(rest).map(|value| Grade {
            system: GradeSystem::Yds,
            value,
        });
    }
    if let Some(rest) = lowered.strip_prefix("wi") {
        return parse_numbered(rest).map(|value| Grade {
            system: GradeSystem::WaterIce,
            value,
        });
    }
    if let Some(rest) = lowered.strip_prefix('m').filter(|rest| starts_with_digit(rest)) {
        return parse_numbered(rest).map(|value| Grade {
            system: GradeSystem::Mixed,
            value,
        });
    }
    if let Some(rest) = lowered.strip_prefix('v') {
        if rest == "b" {
            return Some(Grade {
                system: GradeSystem::VScale,
                value: -1.0,
            });
        }
        if starts_with_digit(rest) {
            return parse_numbered(rest).map(|value| Grade {
                system: GradeSystem::VScale,
                value,
            });
        }
    }
    parse_roman(&lowered).map(|value| Grade {
        system: GradeSystem::Commitment,
        value,
    })
}

fn starts_with_digit(text: &str) -> bool {
    text.chars().next().is_some_and(|c| c.is_ascii_digit())
}

/// Split `text` into its leading decimal number and the remaining suffix.
fn split_major(text: &str) -> Option<(u8, &str)> {
    let digit_count = text.chars().take_while(char::is_ascii_digit).count();
    let digits = text.get(..digit_count)?;
    let suffix = text.get(digit_count..)?;
    let major = digits.parse::<u8>().ok()?;
    Some((major, suffix))
}

fn parse_yds(rest: &str) -> Option<f64> {
    let (major, suffix) = split_major(rest)?;
    let offset = match suffix {
        "" | "a" => 0.0,
        "b" => 0.25,
        "c" => 0.5,
        "d" => 0.75,
        "+" => PLUS_MODIFIER,
        "-" => -PLUS_MODIFIER,
        _ => return None,
    };
    Some(f64::from(major) + offset)
}

fn parse_numbered(rest: &str) -> Option<f64> {
    let (major, suffix) = split_major(rest)?;
    let offset = match suffix {
        "" => 0.0,
        "+" => PLUS_MODIFIER,
        "-" => -PLUS_MODIFIER,
        // Ranges such as `4-5` resolve to their lower bound.
        range if range.strip_prefix('-').is_some_and(starts_with_digit) => 0.0,
        _ => return None,
    };
    Some(f64::from(major) + offset)
}

const fn roman_value(text: &str) -> Option<f64> {
    match text.as_bytes() {
        b"i" => Some(1.0),
        b"ii" => Some(2.0),
        b"iii" => Some(3.0),
        b"iv" => Some(4.0),
        b"v" => Some(5.0),
        b"vi" => Some(6.0),
        b"vii" => Some(7.0),
        _ => None,
    }
}

fn parse_roman(text: &str) -> Option<f64> {
    roman_value(text.trim_start_matches("grade"))
}
