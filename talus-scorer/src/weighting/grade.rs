//! Grade proximity.

use talus_core::Grade;

use crate::GradeConfig;

/// `max(floor, exp(-Δ² / (2σ²)))` with `σ = half / sqrt(2 ln 2)`.
///
/// The weight halves when grades differ by the configured half-weight
/// difference. Absent grades or grades from different systems weigh `1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradeWeighting {
    sigma: f64,
    floor: f64,
}

impl GradeWeighting {
    /// Derive `σ` from configuration.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "σ is derived from the half-weight point")]
    pub fn new(config: &GradeConfig) -> Self {
        Self {
            sigma: config.half_weight_difference / (2.0 * std::f64::consts::LN_2).sqrt(),
            floor: config.floor,
        }
    }

    /// Weight between a consumer grade and an incident grade.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "Gaussian grade kernel")]
    pub fn weight(&self, consumer: Option<&Grade>, incident: Option<&Grade>) -> f64 {
        let Some(delta) = consumer
            .zip(incident)
            .and_then(|(ours, theirs)| ours.difference(theirs))
            .filter(|delta| delta.is_finite())
        else {
            return 1.0;
        };
        let kernel = (-(delta * delta) / (2.0 * self.sigma * self.sigma)).exp();
        kernel.max(self.floor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn weighting() -> GradeWeighting {
        GradeWeighting::new(&GradeConfig::default())
    }

    fn grade(text: &str) -> Grade {
        text.parse().expect("fixture grade")
    }

    #[rstest]
    fn missing_grades_are_neutral(weighting: GradeWeighting) {
        assert_eq!(weighting.weight(None, Some(&grade("5.10a"))), 1.0);
        assert_eq!(weighting.weight(Some(&grade("5.10a")), None), 1.0);
    }

    #[rstest]
    fn cross_system_grades_are_neutral(weighting: GradeWeighting) {
        assert_eq!(weighting.weight(Some(&grade("WI4")), Some(&grade("M4"))), 1.0);
    }

    #[rstest]
    #[expect(clippy::float_arithmetic, reason = "tolerance comparison")]
    fn weight_halves_at_the_configured_difference(weighting: GradeWeighting) {
        let w = weighting.weight(Some(&grade("5.9")), Some(&grade("5.11")));
        assert!((w - 0.5).abs() < 1e-12);
    }

    #[rstest]
    fn distant_grades_hit_the_floor(weighting: GradeWeighting) {
        let w = weighting.weight(Some(&grade("5.6")), Some(&grade("5.13a")));
        assert_eq!(w, 0.25);
    }
}
