//! Score results returned to consumers.

use chrono::NaiveDate;

/// Upper bound of the risk scale.
pub const MAX_RISK_SCORE: f64 = 100.0;

/// Every component weight behind one incident's influence.
///
/// Exposed so callers can explain a score rather than just display it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InfluenceWeights {
    /// Gaussian distance decay.
    pub spatial: f64,
    /// Exponential recency decay including any seasonal boost.
    pub temporal: f64,
    /// Elevation proximity bonus, never below `1.0`.
    pub elevation: f64,
    /// Consumer/incident category affinity.
    pub route_type: f64,
    /// Severity booster.
    pub severity: f64,
    /// Grade proximity.
    pub grade: f64,
    /// Weather similarity before the exponent is applied.
    pub weather_similarity: f64,
    /// Weather multiplier after the exponent and veto.
    pub weather: f64,
}

/// One incident's contribution to a score.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IncidentContribution {
    /// Incident identifier.
    pub incident_id: u64,
    /// Adjusted influence before normalisation.
    pub influence: f64,
    /// Great-circle distance from the reference point in kilometres.
    pub distance_km: f64,
    /// Days between the incident and the target date.
    pub days_elapsed: i64,
    /// Component weights.
    pub weights: InfluenceWeights,
}

/// Explanatory notes attached to a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ScoreNote {
    /// The incident snapshot was empty; nothing was computed.
    NoIncidents,
    /// No usable current weather; similarity used the neutral value.
    WeatherUnavailable,
    /// No historical statistics; extreme-deviation amplification disabled.
    StatisticsUnavailable,
    /// Every candidate incident was removed by the weather veto.
    AllIncidentsVetoed,
}

/// Context describing how a score was produced.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreMetadata {
    /// Reference point the score belongs to.
    pub reference_point_id: u64,
    /// Date the score was computed for.
    pub target_date: NaiveDate,
    /// Incidents in the snapshot.
    pub incidents_considered: usize,
    /// Incidents zeroed by the weather veto.
    pub incidents_vetoed: usize,
    /// Notes explaining fallbacks.
    pub notes: Vec<ScoreNote>,
}

impl ScoreMetadata {
    /// Metadata with no incidents considered and no notes.
    #[must_use]
    pub const fn new(reference_point_id: u64, target_date: NaiveDate) -> Self {
        Self {
            reference_point_id,
            target_date,
            incidents_considered: 0,
            incidents_vetoed: 0,
            notes: Vec::new(),
        }
    }

    /// Record a note once.
    pub fn note(&mut self, note: ScoreNote) {
        if !self.notes.contains(&note) {
            self.notes.push(note);
        }
    }
}

/// Final risk assessment for one consumer at one reference point.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreResult {
    /// Risk in `0.0..=100.0`.
    pub risk_score: f64,
    /// Incidents with non-zero adjusted influence.
    pub contributing_incidents: usize,
    /// Highest-influence incidents, strongest first.
    pub top_incidents: Vec<IncidentContribution>,
    /// How the score was produced.
    pub metadata: ScoreMetadata,
}

impl ScoreResult {
    /// Zero-risk result carrying `note`.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use talus_core::{ScoreNote, ScoreResult};
    ///
    /// let date = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
    /// let result = ScoreResult::empty(9, date, ScoreNote::NoIncidents);
    /// assert_eq!(result.risk_score, 0.0);
    /// assert_eq!(result.contributing_incidents, 0);
    /// ```
    #[must_use]
    pub fn empty(reference_point_id: u64, target_date: NaiveDate, note: ScoreNote) -> Self {
        let mut metadata = ScoreMetadata::new(reference_point_id, target_date);
        metadata.note(note);
        Self {
            risk_score: 0.0,
            contributing_incidents: 0,
            top_incidents: Vec::new(),
            metadata,
        }
    }
}
