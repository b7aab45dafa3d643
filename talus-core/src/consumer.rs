//! Downstream consumers sharing a reference point.
//!
//! At a shared reference point consumers differ only by route category and
//! grade, which is what keeps per-consumer adjustment cheap.

use crate::{Grade, RouteCategory};

/// Identifier of a downstream consumer (a route or plan requesting a score).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ConsumerId(pub u64);

impl std::fmt::Display for ConsumerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The consumer-specific inputs to route adjustment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConsumerAdjustment {
    /// Category of the consumer's route.
    pub category: RouteCategory,
    /// Difficulty grade of the consumer's route as text.
    #[cfg_attr(feature = "serde", serde(default))]
    pub grade: Option<String>,
}

impl ConsumerAdjustment {
    /// Adjustment input without a grade.
    #[must_use]
    pub const fn new(category: RouteCategory) -> Self {
        Self {
            category,
            grade: None,
        }
    }

    /// Set the grade text.
    #[must_use]
    pub fn with_grade(mut self, grade: impl Into<String>) -> Self {
        self.grade = Some(grade.into());
        self
    }

    /// Parse the grade text, if any.
    #[must_use]
    pub fn parsed_grade(&self) -> Option<Grade> {
        Grade::parse_optional(self.grade.as_deref())
    }
}

/// A consumer attached to a reference point in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Consumer {
    /// Consumer identity; keys the batch result map.
    pub id: ConsumerId,
    /// Category and grade used for adjustment.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub adjustment: ConsumerAdjustment,
}

impl Consumer {
    /// Construct a consumer.
    #[must_use]
    pub const fn new(id: ConsumerId, adjustment: ConsumerAdjustment) -> Self {
        Self { id, adjustment }
    }
}
