//! Apply consumer-specific route-type and grade factors to a bundle.
//!
//! Two evaluations share one formula, `base × route_type × grade`, summed in
//! snapshot order. [`RouteAdjustmentEngine::adjust`] walks the bundle's
//! entries one at a time; [`RouteAdjustmentEngine::adjust_columns`] works on
//! a [`BundleColumns`] split built once per point and evaluates each factor
//! as a whole column. Both produce the same bits.

use talus_core::{
    ConsumerAdjustment, Grade, IncidentContribution, RouteCategory, ScoreMetadata, ScoreResult,
};

use crate::weighting::{GradeWeighting, RouteTypeWeighting};
use crate::{BaseInfluence, LocationBaseScoreBundle, RiskNormalizer};

/// Column view of a bundle, built once per point and shared by every
/// consumer adjusted against it.
#[derive(Debug, Clone, PartialEq)]
pub struct BundleColumns {
    incident_id: Vec<u64>,
    base_influence: Vec<f64>,
    category: Vec<RouteCategory>,
    grade: Vec<Option<Grade>>,
    base: Vec<BaseInfluence>,
    metadata: ScoreMetadata,
}

impl BundleColumns {
    /// Split a bundle's entries into parallel columns.
    #[must_use]
    pub fn from_bundle(bundle: &LocationBaseScoreBundle) -> Self {
        let entries = bundle.entries();
        let mut columns = Self {
            incident_id: Vec::with_capacity(entries.len()),
            base_influence: Vec::with_capacity(entries.len()),
            category: Vec::with_capacity(entries.len()),
            grade: Vec::with_capacity(entries.len()),
            base: Vec::with_capacity(entries.len()),
            metadata: bundle.metadata(),
        };
        for entry in entries {
            columns.incident_id.push(entry.incident_id);
            columns.base_influence.push(entry.base_influence);
            columns.category.push(entry.category);
            columns.grade.push(entry.grade);
            columns.base.push(entry.base);
        }
        columns
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.base_influence.len()
    }

    /// Whether there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.base_influence.is_empty()
    }
}

/// Turns a [`LocationBaseScoreBundle`] into a consumer's [`ScoreResult`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteAdjustmentEngine {
    route_type: RouteTypeWeighting,
    grade: GradeWeighting,
    normalizer: RiskNormalizer,
}

impl RouteAdjustmentEngine {
    /// Combine the consumer-dependent weightings with a normalizer.
    #[must_use]
    pub const fn new(
        route_type: RouteTypeWeighting,
        grade: GradeWeighting,
        normalizer: RiskNormalizer,
    ) -> Self {
        Self {
            route_type,
            grade,
            normalizer,
        }
    }

    /// The normalizer applied to adjusted influences.
    #[must_use]
    pub const fn normalizer(&self) -> &RiskNormalizer {
        &self.normalizer
    }

    /// Score one consumer against a bundle, entry by entry.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "consumer factors scale the base")]
    pub fn adjust(
        &self,
        bundle: &LocationBaseScoreBundle,
        consumer: &ConsumerAdjustment,
    ) -> ScoreResult {
        let consumer_grade = consumer.parsed_grade();
        let contributions = bundle
            .entries()
            .iter()
            .map(|entry| {
                let route_type = self.route_type.weight(consumer.category, entry.category);
                let grade = self
                    .grade
                    .weight(consumer_grade.as_ref(), entry.grade.as_ref());
                IncidentContribution {
                    incident_id: entry.incident_id,
                    influence: entry.base_influence * route_type * grade,
                    distance_km: entry.base.distance_km,
                    days_elapsed: entry.base.days_elapsed,
                    weights: entry.base.weights(route_type, grade),
                }
            })
            .collect();
        self.normalizer.finish(contributions, bundle.metadata())
    }

    /// Score one consumer over precomputed `columns`.
    ///
    /// Each factor is evaluated as a column; contributions are materialised
    /// only for rows that pass the contribution threshold.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "consumer factors scale the base")]
    pub fn adjust_columns(
        &self,
        columns: &BundleColumns,
        consumer: &ConsumerAdjustment,
    ) -> ScoreResult {
        let row = self.route_type.row(consumer.category);
        let route_type: Vec<f64> = columns
            .category
            .iter()
            .map(|category| {
                row.get(category.index())
                    .copied()
                    .unwrap_or_else(|| self.route_type.weight(consumer.category, *category))
            })
            .collect();
        let consumer_grade = consumer.parsed_grade();
        let grade: Vec<f64> = columns
            .grade
            .iter()
            .map(|incident| self.grade.weight(consumer_grade.as_ref(), incident.as_ref()))
            .collect();
        let influence: Vec<f64> = columns
            .base_influence
            .iter()
            .zip(&route_type)
            .zip(&grade)
            .map(|((base, route), grade_weight)| base * route * grade_weight)
            .collect();
        let influence_sum: f64 = influence.iter().sum();

        let contributing = influence
            .iter()
            .enumerate()
            .filter(|(_, value)| self.normalizer.contributes(**value))
            .filter_map(|(row_index, value)| {
                Some(IncidentContribution {
                    incident_id: *columns.incident_id.get(row_index)?,
                    influence: *value,
                    distance_km: columns.base.get(row_index)?.distance_km,
                    days_elapsed: columns.base.get(row_index)?.days_elapsed,
                    weights: columns
                        .base
                        .get(row_index)?
                        .weights(*route_type.get(row_index)?, *grade.get(row_index)?),
                })
            })
            .collect();
        self.normalizer
            .finish_with_sum(influence_sum, contributing, columns.metadata.clone())
    }
}
