//! Bonus-only elevation proximity.

use crate::ElevationConfig;

/// `1 + bonus_max · exp(-(Δ/decay)²)`, never below `1.0`.
///
/// Missing or non-finite elevations on either side give the neutral `1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElevationWeighting {
    bonus_max: f64,
    decay_m: f64,
}

impl ElevationWeighting {
    /// Build from configuration.
    #[must_use]
    pub const fn new(config: &ElevationConfig) -> Self {
        Self {
            bonus_max: config.bonus_max,
            decay_m: config.decay_m,
        }
    }

    /// Weight for a reference point and incident elevation in metres.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "Gaussian elevation bonus")]
    pub fn weight(&self, reference_m: Option<f64>, incident_m: Option<f64>) -> f64 {
        let (Some(reference), Some(incident)) = (reference_m, incident_m) else {
            return 1.0;
        };
        let ratio = (reference - incident) / self.decay_m;
        let bonus = self.bonus_max * (-(ratio * ratio)).exp();
        let weight = 1.0 + bonus;
        if weight.is_finite() { weight.max(1.0) } else { 1.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, Some(3000.0))]
    #[case(Some(3000.0), None)]
    #[case(Some(f64::NAN), Some(3000.0))]
    fn missing_elevation_is_neutral(#[case] reference: Option<f64>, #[case] incident: Option<f64>) {
        let weighting = ElevationWeighting::new(&ElevationConfig::default());
        assert_eq!(weighting.weight(reference, incident), 1.0);
    }

    #[rstest]
    fn equal_elevation_gets_the_full_bonus() {
        let weighting = ElevationWeighting::new(&ElevationConfig::default());
        assert_eq!(weighting.weight(Some(2500.0), Some(2500.0)), 1.5);
    }

    #[rstest]
    fn distant_elevation_settles_at_one() {
        let weighting = ElevationWeighting::new(&ElevationConfig::default());
        let w = weighting.weight(Some(500.0), Some(4500.0));
        assert!(w >= 1.0);
        assert!(w < 1.0 + 1e-9);
    }
}
