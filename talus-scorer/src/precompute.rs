//! Per-reference-point precomputation.
//!
//! Everything that does not depend on the consumer (distance, recency,
//! elevation, severity and weather) is evaluated once per reference point
//! and frozen into a [`LocationBaseScoreBundle`]. Every consumer at the
//! point reuses that bundle, so the expensive work scales with the number of
//! points rather than the number of consumers.

use std::collections::HashMap;

use chrono::NaiveDate;
use talus_core::{
    ConditionsFingerprint, Grade, HistoricalIncident, PointConditions, ReferencePoint,
    RouteCategory, ScoreMetadata, ScoreNote,
};

use crate::{AccidentInfluenceModel, BaseInfluence, WeatherWeight};

/// One retained incident in a bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct BundleEntry {
    /// Incident identifier.
    pub incident_id: u64,
    /// Position of the incident in the snapshot; ties rank by this.
    pub snapshot_index: usize,
    /// Incident category, used for route-type adjustment.
    pub category: RouteCategory,
    /// Parsed incident grade, used for grade adjustment.
    pub grade: Option<Grade>,
    /// Consumer-independent weights.
    pub base: BaseInfluence,
    /// Product of [`BundleEntry::base`].
    pub base_influence: f64,
}

/// Immutable consumer-independent scores for one reference point.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationBaseScoreBundle {
    reference_point_id: u64,
    target_date: NaiveDate,
    incidents_considered: usize,
    incidents_vetoed: usize,
    notes: Vec<ScoreNote>,
    entries: Vec<BundleEntry>,
}

impl LocationBaseScoreBundle {
    /// Reference point the bundle belongs to.
    #[must_use]
    pub const fn reference_point_id(&self) -> u64 {
        self.reference_point_id
    }

    /// Date the bundle was computed for.
    #[must_use]
    pub const fn target_date(&self) -> NaiveDate {
        self.target_date
    }

    /// Retained incidents in snapshot order.
    #[must_use]
    pub fn entries(&self) -> &[BundleEntry] {
        &self.entries
    }

    /// Number of retained incidents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no incident survived the epsilon filter.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Metadata shared by every result derived from this bundle.
    #[must_use]
    pub fn metadata(&self) -> ScoreMetadata {
        let mut metadata = ScoreMetadata::new(self.reference_point_id, self.target_date);
        metadata.incidents_considered = self.incidents_considered;
        metadata.incidents_vetoed = self.incidents_vetoed;
        for note in &self.notes {
            metadata.note(*note);
        }
        metadata
    }
}

/// Hit and miss counters of a [`SimilarityCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that computed a fresh similarity.
    pub misses: u64,
    /// Stored similarities.
    pub entries: usize,
}

/// Similarities computed against one exact set of conditions.
#[derive(Debug, Clone)]
struct ConditionsSlot {
    conditions: PointConditions,
    similarities: HashMap<usize, f64>,
}

/// Run-scoped memo of weather similarities.
///
/// Entries are grouped by the point's [`ConditionsFingerprint`] and then
/// matched against the full conditions, so points share work only when
/// their weather inputs are equal. Within a group, similarities are keyed
/// by the incident's position in the snapshot, which stays unique even when
/// incident ids repeat. Call [`SimilarityCache::reset`] before reusing the
/// cache with a different snapshot.
#[derive(Debug, Clone, Default)]
pub struct SimilarityCache {
    slots: HashMap<ConditionsFingerprint, Vec<ConditionsSlot>>,
    hits: u64,
    misses: u64,
}

impl SimilarityCache {
    /// Empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the similarity cached for the incident at `snapshot_index`
    /// under `conditions`, or compute and store it.
    pub fn get_or_compute(
        &mut self,
        conditions: &PointConditions,
        snapshot_index: usize,
        compute: impl FnOnce() -> f64,
    ) -> f64 {
        self.get_or_compute_in(conditions.fingerprint(), conditions, snapshot_index, compute)
    }

    fn get_or_compute_in(
        &mut self,
        fingerprint: ConditionsFingerprint,
        conditions: &PointConditions,
        snapshot_index: usize,
        compute: impl FnOnce() -> f64,
    ) -> f64 {
        let group = self.slots.entry(fingerprint).or_default();
        let slot_index = group
            .iter()
            .position(|slot| slot.conditions == *conditions)
            .unwrap_or_else(|| {
                group.push(ConditionsSlot {
                    conditions: conditions.clone(),
                    similarities: HashMap::new(),
                });
                group.len().saturating_sub(1)
            });
        let Some(slot) = group.get_mut(slot_index) else {
            self.misses = self.misses.saturating_add(1);
            return compute();
        };
        if let Some(similarity) = slot.similarities.get(&snapshot_index) {
            self.hits = self.hits.saturating_add(1);
            return *similarity;
        }
        self.misses = self.misses.saturating_add(1);
        let similarity = compute();
        slot.similarities.insert(snapshot_index, similarity);
        similarity
    }

    /// Drop every entry and zero the counters.
    pub fn reset(&mut self) {
        self.slots.clear();
        self.hits = 0;
        self.misses = 0;
    }

    /// Current counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self
                .slots
                .values()
                .flatten()
                .map(|slot| slot.similarities.len())
                .sum(),
        }
    }
}

/// Builds bundles for reference points, owning the run's similarity cache.
#[derive(Debug, Clone)]
pub struct LocationPrecomputationEngine<'m> {
    model: &'m AccidentInfluenceModel,
    epsilon: f64,
    cache: SimilarityCache,
}

impl<'m> LocationPrecomputationEngine<'m> {
    /// Engine retaining incidents whose base influence is at least
    /// `epsilon`.
    #[must_use]
    pub fn new(model: &'m AccidentInfluenceModel, epsilon: f64) -> Self {
        Self {
            model,
            epsilon,
            cache: SimilarityCache::new(),
        }
    }

    /// The run's similarity cache.
    #[must_use]
    pub const fn cache(&self) -> &SimilarityCache {
        &self.cache
    }

    /// Start a new run.
    pub fn reset(&mut self) {
        self.cache.reset();
    }

    /// Evaluate every incident against `point` and keep the non-negligible
    /// ones.
    pub fn precompute(
        &mut self,
        point: &ReferencePoint,
        target_date: NaiveDate,
        incidents: &[HistoricalIncident],
        conditions: &PointConditions,
    ) -> LocationBaseScoreBundle {
        let mut notes = Vec::new();
        if incidents.is_empty() {
            notes.push(ScoreNote::NoIncidents);
        }
        if conditions.current_weather.is_none() {
            notes.push(ScoreNote::WeatherUnavailable);
        }
        if conditions.statistics.is_none() {
            notes.push(ScoreNote::StatisticsUnavailable);
        }

        let neutral = self.model.weather_weight(None);
        let mut entries = Vec::new();
        let mut vetoed = 0_usize;
        for (snapshot_index, incident) in incidents.iter().enumerate() {
            let mut base = self.model.base(point, incident, target_date, neutral);
            // Zero base weights cannot be revived by weather.
            if base.non_weather() == 0.0 {
                continue;
            }
            base.weather = self.weather_for(conditions, snapshot_index, incident);
            if base.weather.vetoed {
                vetoed = vetoed.saturating_add(1);
                continue;
            }
            let base_influence = base.influence();
            if base_influence >= self.epsilon && base_influence.is_finite() {
                entries.push(BundleEntry {
                    incident_id: incident.id,
                    snapshot_index,
                    category: incident.category,
                    grade: incident.parsed_grade(),
                    base,
                    base_influence,
                });
            }
        }
        if vetoed > 0 && entries.is_empty() {
            notes.push(ScoreNote::AllIncidentsVetoed);
        }

        LocationBaseScoreBundle {
            reference_point_id: point.id,
            target_date,
            incidents_considered: incidents.len(),
            incidents_vetoed: vetoed,
            notes,
            entries,
        }
    }

    fn weather_for(
        &mut self,
        conditions: &PointConditions,
        snapshot_index: usize,
        incident: &HistoricalIncident,
    ) -> WeatherWeight {
        let model = self.model;
        let similarity = match (&conditions.current_weather, &incident.weather) {
            (Some(_), Some(_)) => Some(self.cache.get_or_compute(conditions, snapshot_index, || {
                model
                    .weather_similarity(conditions, incident)
                    .unwrap_or(f64::NAN)
            })),
            _ => None,
        };
        model.weather_weight(similarity)
    }
}
