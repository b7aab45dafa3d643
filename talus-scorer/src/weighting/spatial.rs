//! Gaussian distance decay.

use talus_core::RouteCategory;

use crate::SpatialConfig;

/// `exp(-d² / (2h²))` with a bandwidth `h` chosen by incident category.
///
/// There is no distance cutoff. Distant incidents are attenuated rather than
/// dropped so weather similarity can still dominate in sparse regions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialWeighting {
    bandwidth_km: [f64; RouteCategory::ALL.len()],
}

impl SpatialWeighting {
    /// Resolve bandwidths from configuration.
    #[must_use]
    pub fn new(config: &SpatialConfig) -> Self {
        Self {
            bandwidth_km: config.bandwidth_km.resolve(),
        }
    }

    /// Bandwidth applied to incidents of `category`.
    #[must_use]
    pub fn bandwidth_km(&self, category: RouteCategory) -> f64 {
        self.bandwidth_km
            .get(category.index())
            .copied()
            .unwrap_or(f64::NAN)
    }

    /// Weight for an incident `distance_km` away.
    ///
    /// Non-finite or negative distances yield `0.0`.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "Gaussian kernel")]
    pub fn weight(&self, distance_km: f64, category: RouteCategory) -> f64 {
        let h = self.bandwidth_km(category);
        if !(distance_km.is_finite() && distance_km >= 0.0 && h > 0.0) {
            return 0.0;
        }
        (-(distance_km * distance_km) / (2.0 * h * h)).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn weighting() -> SpatialWeighting {
        SpatialWeighting::new(&SpatialConfig::default())
    }

    #[rstest]
    fn zero_distance_is_full_weight(weighting: SpatialWeighting) {
        assert_eq!(weighting.weight(0.0, RouteCategory::Sport), 1.0);
    }

    #[rstest]
    #[expect(clippy::float_arithmetic, reason = "tolerance comparison")]
    fn one_bandwidth_away_is_exp_minus_half(weighting: SpatialWeighting) {
        let w = weighting.weight(5.0, RouteCategory::Alpine);
        assert!((w - (-0.5_f64).exp()).abs() < 1e-12);
    }

    #[rstest]
    fn unknown_category_uses_default_bandwidth(weighting: SpatialWeighting) {
        assert_eq!(weighting.bandwidth_km(RouteCategory::Unknown), 3.0);
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(-1.0)]
    fn invalid_distance_has_no_weight(weighting: SpatialWeighting, #[case] distance: f64) {
        assert_eq!(weighting.weight(distance, RouteCategory::Ice), 0.0);
    }
}
