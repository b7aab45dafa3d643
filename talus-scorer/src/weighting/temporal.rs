//! Exponential recency decay with a seasonal boost.

use chrono::NaiveDate;
use talus_core::{RouteCategory, same_season};

use crate::TemporalConfig;

/// Outcome of [`TemporalWeighting::weight`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemporalWeight {
    /// Whole days from the incident to the target date; negative for
    /// incidents dated after the target.
    pub days_elapsed: i64,
    /// Whether the seasonal boost was applied.
    pub seasonal: bool,
    /// Final weight.
    pub weight: f64,
}

/// `λ^days`, boosted when incident and target fall in the same season.
///
/// Future-dated incidents weigh `0.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemporalWeighting {
    daily_decay: [f64; RouteCategory::ALL.len()],
    seasonal_boost: f64,
}

impl TemporalWeighting {
    /// Resolve decay rates from configuration.
    #[must_use]
    pub fn new(config: &TemporalConfig) -> Self {
        Self {
            daily_decay: config.daily_decay.resolve(),
            seasonal_boost: config.seasonal_boost,
        }
    }

    /// Weight an incident on `occurred_on` relative to `target`.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "seasonal boost multiplies the decay")]
    pub fn weight(
        &self,
        occurred_on: NaiveDate,
        target: NaiveDate,
        category: RouteCategory,
    ) -> TemporalWeight {
        let days_elapsed = target.signed_duration_since(occurred_on).num_days();
        let lambda = self
            .daily_decay
            .get(category.index())
            .copied()
            .unwrap_or(0.0);
        // Beyond i32::MAX days the decay has long underflowed to zero.
        let base = i32::try_from(days_elapsed)
            .ok()
            .filter(|days| *days >= 0)
            .map_or(0.0, |days| lambda.powi(days));
        let seasonal = days_elapsed >= 0 && same_season(occurred_on, target);
        let weight = if seasonal {
            base * self.seasonal_boost
        } else {
            base
        };
        TemporalWeight {
            days_elapsed,
            seasonal,
            weight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use talus_core::test_support::date;

    #[fixture]
    fn weighting() -> TemporalWeighting {
        TemporalWeighting::new(&TemporalConfig::default())
    }

    #[rstest]
    fn same_day_in_season_gets_the_boost(weighting: TemporalWeighting) {
        let day = date(2024, 1, 10);
        let result = weighting.weight(day, day, RouteCategory::Ice);
        assert_eq!(result.days_elapsed, 0);
        assert!(result.seasonal);
        assert_eq!(result.weight, 1.5);
    }

    #[rstest]
    fn future_incidents_weigh_nothing(weighting: TemporalWeighting) {
        let result = weighting.weight(date(2024, 3, 2), date(2024, 3, 1), RouteCategory::Trad);
        assert_eq!(result.days_elapsed, -1);
        assert!(!result.seasonal);
        assert_eq!(result.weight, 0.0);
    }

    #[rstest]
    #[expect(clippy::float_arithmetic, reason = "tolerance comparison")]
    fn out_of_season_weight_is_plain_decay(weighting: TemporalWeighting) {
        let result = weighting.weight(date(2023, 7, 1), date(2024, 1, 1), RouteCategory::Ice);
        assert!(!result.seasonal);
        let expected = 0.995_f64.powi(184);
        assert!((result.weight - expected).abs() < 1e-12);
    }

    #[rstest]
    fn rock_decays_slower_than_ice(weighting: TemporalWeighting) {
        let then = date(2023, 6, 1);
        let now = date(2024, 2, 1);
        let ice = weighting.weight(then, now, RouteCategory::Ice).weight;
        let rock = weighting.weight(then, now, RouteCategory::Sport).weight;
        assert!(rock > ice);
    }
}
