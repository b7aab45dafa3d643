//! Inputs to the `Score` and `ScoreBatch` operations.

use chrono::NaiveDate;

use crate::{Consumer, ConsumerAdjustment, HistoricalIncident, PointConditions, ReferencePoint};

/// Parameters for scoring one consumer at one reference point.
///
/// All inputs are borrowed snapshots that stay immutable for the call.
#[derive(Debug, Clone, Copy)]
pub struct ScoreRequest<'a> {
    /// Where the score is computed.
    pub reference_point: &'a ReferencePoint,
    /// Category and grade of the requesting consumer.
    pub consumer: &'a ConsumerAdjustment,
    /// Date the score is computed for.
    pub target_date: NaiveDate,
    /// Incident snapshot shared by the run.
    pub incidents: &'a [HistoricalIncident],
    /// Current weather and statistics at the reference point.
    pub conditions: &'a PointConditions,
}

/// One reference point in a batch together with its consumers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatchPoint {
    /// Shared reference point.
    pub reference_point: ReferencePoint,
    /// Weather inputs at the point.
    #[cfg_attr(feature = "serde", serde(default))]
    pub conditions: PointConditions,
    /// Consumers sharing the point.
    pub consumers: Vec<Consumer>,
}

impl BatchPoint {
    /// Batch entry with no weather known yet.
    #[must_use]
    pub const fn new(reference_point: ReferencePoint, consumers: Vec<Consumer>) -> Self {
        Self {
            reference_point,
            conditions: PointConditions::unavailable(),
            consumers,
        }
    }

    /// Attach weather inputs.
    #[must_use]
    pub fn with_conditions(mut self, conditions: PointConditions) -> Self {
        self.conditions = conditions;
        self
    }
}

/// Parameters for bulk scoring many reference points against one snapshot.
#[derive(Debug, Clone, Copy)]
pub struct BatchRequest<'a> {
    /// Date every score is computed for.
    pub target_date: NaiveDate,
    /// Incident snapshot shared by all points.
    pub incidents: &'a [HistoricalIncident],
    /// Reference points with their consumers and weather.
    pub points: &'a [BatchPoint],
}
