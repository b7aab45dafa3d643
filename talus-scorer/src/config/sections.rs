//! Per-component tuning sections and their defaults.
//!
//! Every value here is a hand-tuned constant rather than a fitted parameter.

use serde::{Deserialize, Serialize};
use talus_core::RouteCategory;

use super::{CategoryTable, RouteAffinity};

/// Gaussian distance decay bandwidths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpatialConfig {
    /// Bandwidth `h` in kilometres, keyed by incident category.
    pub bandwidth_km: CategoryTable,
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self {
            bandwidth_km: CategoryTable::new(3.0)
                .with(RouteCategory::Alpine, 5.0)
                .with(RouteCategory::Ice, 3.0)
                .with(RouteCategory::Mixed, 4.0)
                .with(RouteCategory::Trad, 2.0)
                .with(RouteCategory::Sport, 1.5)
                .with(RouteCategory::Boulder, 1.0),
        }
    }
}

/// Exponential recency decay and the seasonal boost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemporalConfig {
    /// Per-day retention factor `λ`, keyed by incident category.
    ///
    /// Conditions on ice change quickly so ice decays fastest; rock changes
    /// slowly and keeps incidents relevant for years.
    pub daily_decay: CategoryTable,
    /// Multiplier applied when incident and target share a season.
    pub seasonal_boost: f64,
}

impl Default for TemporalConfig {
    fn default() -> Self {
        Self {
            daily_decay: CategoryTable::new(0.998)
                .with(RouteCategory::Ice, 0.995)
                .with(RouteCategory::Mixed, 0.997)
                .with(RouteCategory::Alpine, 0.999)
                .with(RouteCategory::Trad, 0.9998)
                .with(RouteCategory::Sport, 0.9998)
                .with(RouteCategory::Boulder, 0.9998),
            seasonal_boost: 1.5,
        }
    }
}

/// Bonus for incidents at a similar elevation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevationConfig {
    /// Largest bonus added on top of the neutral `1.0`.
    pub bonus_max: f64,
    /// Elevation difference in metres at which the bonus falls to `1/e`.
    pub decay_m: f64,
}

impl Default for ElevationConfig {
    fn default() -> Self {
        Self {
            bonus_max: 0.5,
            decay_m: 500.0,
        }
    }
}

/// Asymmetric category affinities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteTypeConfig {
    /// Explicit `(consumer, incident)` weights.
    pub affinities: Vec<RouteAffinity>,
    /// Weight for pairs without an explicit entry.
    pub default_weight: f64,
}

impl Default for RouteTypeConfig {
    fn default() -> Self {
        use RouteCategory::{Alpine, Boulder, Ice, Mixed, Sport, Trad};

        let mut affinities: Vec<RouteAffinity> = [Alpine, Ice, Mixed, Trad, Sport, Boulder]
            .into_iter()
            .map(|category| RouteAffinity::new(category, category, 1.0))
            .collect();
        affinities.extend([
            RouteAffinity::new(Alpine, Ice, 0.8),
            RouteAffinity::new(Alpine, Mixed, 0.8),
            RouteAffinity::new(Ice, Alpine, 0.5),
            RouteAffinity::new(Ice, Mixed, 0.7),
            RouteAffinity::new(Mixed, Ice, 0.8),
            RouteAffinity::new(Mixed, Alpine, 0.6),
            RouteAffinity::new(Trad, Sport, 0.6),
            RouteAffinity::new(Trad, Alpine, 0.4),
            RouteAffinity::new(Sport, Trad, 0.5),
            RouteAffinity::new(Boulder, Sport, 0.4),
        ]);
        Self {
            affinities,
            default_weight: 0.3,
        }
    }
}

/// Severity multipliers; a subtle booster only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityConfig {
    /// Multiplier for fatal outcomes.
    pub fatal: f64,
    /// Multiplier for serious injuries.
    pub serious: f64,
    /// Multiplier for minor injuries.
    pub minor: f64,
    /// Multiplier when the outcome is unknown.
    pub unknown: f64,
}

impl Default for SeverityConfig {
    fn default() -> Self {
        Self {
            fatal: 1.3,
            serious: 1.2,
            minor: 1.1,
            unknown: 1.0,
        }
    }
}

/// Grade proximity decay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradeConfig {
    /// Grade difference at which the weight halves.
    pub half_weight_difference: f64,
    /// Lowest weight a comparable grade pair can receive.
    pub floor: f64,
}

impl Default for GradeConfig {
    fn default() -> Self {
        Self {
            half_weight_difference: 2.0,
            floor: 0.25,
        }
    }
}

/// Relative weight of each similarity factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorWeights {
    /// Temperature correlation.
    pub temperature: f64,
    /// Precipitation correlation.
    pub precipitation: f64,
    /// Wind speed correlation.
    pub wind_speed: f64,
    /// Visibility correlation.
    pub visibility: f64,
    /// Cloud cover correlation.
    pub cloud_cover: f64,
    /// Freeze-thaw cycle similarity.
    pub freeze_thaw: f64,
}

impl FactorWeights {
    pub(crate) fn named(&self) -> [(&'static str, f64); 6] {
        [
            ("temperature", self.temperature),
            ("precipitation", self.precipitation),
            ("wind_speed", self.wind_speed),
            ("visibility", self.visibility),
            ("cloud_cover", self.cloud_cover),
            ("freeze_thaw", self.freeze_thaw),
        ]
    }
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            temperature: 0.25,
            precipitation: 0.20,
            wind_speed: 0.15,
            visibility: 0.10,
            cloud_cover: 0.10,
            freeze_thaw: 0.20,
        }
    }
}

/// Multiplier increase per standard deviation beyond the extreme threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtremePenalties {
    /// Temperature penalty per σ.
    pub temperature: f64,
    /// Precipitation penalty per σ.
    pub precipitation: f64,
    /// Wind speed penalty per σ.
    pub wind_speed: f64,
    /// Visibility penalty per σ.
    pub visibility: f64,
}

impl ExtremePenalties {
    pub(crate) fn named(&self) -> [(&'static str, f64); 4] {
        [
            ("temperature", self.temperature),
            ("precipitation", self.precipitation),
            ("wind_speed", self.wind_speed),
            ("visibility", self.visibility),
        ]
    }
}

impl Default for ExtremePenalties {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            precipitation: 0.25,
            wind_speed: 0.3,
            visibility: 0.15,
        }
    }
}

/// Weather similarity, amplification and veto.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Rate of the exponential day weight `exp(-rate * day)`.
    pub recency_decay: f64,
    /// Factor weights combined into the base similarity.
    pub factor_weights: FactorWeights,
    /// Similarity below which an incident is vetoed.
    pub veto_threshold: f64,
    /// Similarity assumed when either side has no weather.
    pub neutral_similarity: f64,
    /// Absolute z-score beyond which amplification starts.
    pub extreme_threshold_sigma: f64,
    /// Amplification per σ beyond the threshold.
    pub penalties: ExtremePenalties,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            recency_decay: 0.3,
            factor_weights: FactorWeights::default(),
            veto_threshold: 0.25,
            neutral_similarity: 0.5,
            extreme_threshold_sigma: 2.0,
            penalties: ExtremePenalties::default(),
        }
    }
}

/// Final score scaling and ranking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Multiplier `k` applied to the influence sum. Empirical, not derived.
    pub scale: f64,
    /// Number of incidents reported in the breakdown.
    pub top_n: usize,
    /// Influences below this are treated as negligible.
    pub epsilon: f64,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            scale: 10.0,
            top_n: 10,
            epsilon: 1e-4,
        }
    }
}

/// Bulk scoring layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Reference points per parallel chunk.
    pub chunk_size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { chunk_size: 256 }
    }
}
