//! Six-factor weather pattern similarity with extreme-deviation
//! amplification.
//!
//! Two valid weeks are compared factor by factor. Temperature,
//! precipitation, wind speed, visibility and cloud cover use a
//! recency-weighted Pearson correlation rescaled from `[-1, 1]` to `[0, 1]`;
//! freeze-thaw cycles compare day counts. The weighted blend is the base
//! similarity. When long-window statistics are known, unusually extreme
//! current readings raise a multiplier above `1.0`, so the final similarity
//! may exceed `1.0`.
//!
//! A factor with missing or malformed readings scores `0.0`; it never aborts
//! the comparison.
#![expect(
    clippy::float_arithmetic,
    reason = "similarity scoring blends floating-point factor scores"
)]

use talus_core::{HistoricalWeatherStatistics, PATTERN_DAYS, WeatherFactor, WeatherPattern};

use crate::correlation::{CorrelationError, weighted_pearson};
use crate::{ExtremePenalties, FactorWeights, WeatherConfig};

/// Freeze-thaw counts are compared against a week-long window.
const FREEZE_THAW_WINDOW: f64 = 7.0;

/// Factors amplified by extreme deviations.
const AMPLIFIED: [WeatherFactor; 4] = [
    WeatherFactor::WindSpeed,
    WeatherFactor::Precipitation,
    WeatherFactor::Temperature,
    WeatherFactor::Visibility,
];

/// Per-factor similarity scores in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FactorScores {
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
    /// Freeze-thaw similarity.
    pub freeze_thaw: f64,
}

impl FactorScores {
    fn set(&mut self, factor: WeatherFactor, score: f64) {
        match factor {
            WeatherFactor::Temperature => self.temperature = score,
            WeatherFactor::Precipitation => self.precipitation = score,
            WeatherFactor::WindSpeed => self.wind_speed = score,
            WeatherFactor::Visibility => self.visibility = score,
            WeatherFactor::CloudCover => self.cloud_cover = score,
        }
    }

    fn blend(&self, weights: &FactorWeights) -> f64 {
        let pairs = [
            (self.temperature, weights.temperature),
            (self.precipitation, weights.precipitation),
            (self.wind_speed, weights.wind_speed),
            (self.visibility, weights.visibility),
            (self.cloud_cover, weights.cloud_cover),
            (self.freeze_thaw, weights.freeze_thaw),
        ];
        let total: f64 = pairs.iter().map(|(_, weight)| weight).sum();
        if total <= 0.0 {
            return 0.0;
        }
        let weighted: f64 = pairs.iter().map(|(score, weight)| score * weight).sum();
        (weighted / total).clamp(0.0, 1.0)
    }
}

/// Full breakdown of one pattern comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityBreakdown {
    /// Individual factor scores.
    pub factors: FactorScores,
    /// Weighted blend of the factor scores, in `[0, 1]`.
    pub base: f64,
    /// Extreme-deviation multiplier, at least `1.0`.
    pub multiplier: f64,
    /// `base × multiplier`.
    pub similarity: f64,
}

impl SimilarityBreakdown {
    const fn invalid() -> Self {
        Self {
            factors: FactorScores {
                temperature: 0.0,
                precipitation: 0.0,
                wind_speed: 0.0,
                visibility: 0.0,
                cloud_cover: 0.0,
                freeze_thaw: 0.0,
            },
            base: 0.0,
            multiplier: 1.0,
            similarity: 0.0,
        }
    }
}

/// Compares weather weeks.
///
/// # Examples
/// ```
/// use talus_core::test_support::{WARMING, trend_pattern};
/// use talus_scorer::{WeatherConfig, WeatherPatternSimilarity};
///
/// let similarity = WeatherPatternSimilarity::new(&WeatherConfig::default());
/// let week = trend_pattern(WARMING);
/// let breakdown = similarity.compare(&week, &week, None);
/// assert!((breakdown.similarity - 1.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherPatternSimilarity {
    day_weights: [f64; PATTERN_DAYS],
    factor_weights: FactorWeights,
    extreme_threshold_sigma: f64,
    penalties: ExtremePenalties,
}

impl WeatherPatternSimilarity {
    /// Precompute normalised recency weights from configuration.
    #[must_use]
    pub fn new(config: &WeatherConfig) -> Self {
        Self {
            day_weights: recency_weights(config.recency_decay),
            factor_weights: config.factor_weights,
            extreme_threshold_sigma: config.extreme_threshold_sigma,
            penalties: config.penalties,
        }
    }

    /// Normalised per-day weights, most recent first. They sum to one.
    #[must_use]
    pub const fn day_weights(&self) -> &[f64; PATTERN_DAYS] {
        &self.day_weights
    }

    /// Compare the `current` week with an `incident` week.
    ///
    /// Returns a zero similarity unless both weeks are valid.
    #[must_use]
    pub fn compare(
        &self,
        current: &WeatherPattern,
        incident: &WeatherPattern,
        statistics: Option<&HistoricalWeatherStatistics>,
    ) -> SimilarityBreakdown {
        if !(current.is_valid() && incident.is_valid()) {
            return SimilarityBreakdown::invalid();
        }
        let mut factors = FactorScores::default();
        for factor in WeatherFactor::ALL {
            factors.set(factor, self.factor_score(current, incident, factor));
        }
        factors.freeze_thaw = freeze_thaw_similarity(current, incident);
        let base = factors.blend(&self.factor_weights);
        let multiplier = statistics.map_or(1.0, |stats| self.extreme_multiplier(current, stats));
        SimilarityBreakdown {
            factors,
            base,
            multiplier,
            similarity: base * multiplier,
        }
    }

    fn factor_score(
        &self,
        current: &WeatherPattern,
        incident: &WeatherPattern,
        factor: WeatherFactor,
    ) -> f64 {
        let mut ours = Vec::with_capacity(PATTERN_DAYS);
        let mut theirs = Vec::with_capacity(PATTERN_DAYS);
        let mut weights = Vec::with_capacity(PATTERN_DAYS);
        let paired = current
            .series(factor)
            .into_iter()
            .zip(incident.series(factor))
            .zip(self.day_weights);
        for ((a, b), weight) in paired {
            if let (Some(x), Some(y)) = (a, b) {
                ours.push(x);
                theirs.push(y);
                weights.push(weight);
            }
        }
        if ours.len() < 2 {
            return 0.0;
        }
        match (constant_value(&ours), constant_value(&theirs)) {
            (Some(x), Some(y)) => return if x == y { 1.0 } else { 0.0 },
            (Some(_), None) | (None, Some(_)) => return 0.0,
            (None, None) => {}
        }
        match weighted_pearson(&ours, &theirs, &weights) {
            Ok(r) => f64::midpoint(r, 1.0),
            Err(CorrelationError::ZeroVariance) => 0.0,
            Err(err) => {
                log::debug!("{} correlation degraded to zero: {err}", factor.as_str());
                0.0
            }
        }
    }

    fn extreme_multiplier(
        &self,
        current: &WeatherPattern,
        statistics: &HistoricalWeatherStatistics,
    ) -> f64 {
        AMPLIFIED.into_iter().fold(1.0, |multiplier, factor| {
            let excess = current
                .latest(factor)
                .zip(statistics.for_factor(factor))
                .and_then(|(value, stats)| stats.z_score(value))
                .map_or(0.0, |z| (z.abs() - self.extreme_threshold_sigma).max(0.0));
            self.penalty(factor).mul_add(excess, multiplier)
        })
    }

    const fn penalty(&self, factor: WeatherFactor) -> f64 {
        match factor {
            WeatherFactor::Temperature => self.penalties.temperature,
            WeatherFactor::Precipitation => self.penalties.precipitation,
            WeatherFactor::WindSpeed => self.penalties.wind_speed,
            WeatherFactor::Visibility => self.penalties.visibility,
            WeatherFactor::CloudCover => 0.0,
        }
    }
}

/// `exp(-rate · day)` normalised to sum to one.
fn recency_weights(rate: f64) -> [f64; PATTERN_DAYS] {
    let mut weights = [0.0; PATTERN_DAYS];
    let mut decay = 1.0;
    let step = (-rate).exp();
    for weight in &mut weights {
        *weight = decay;
        decay *= step;
    }
    let total: f64 = weights.iter().sum();
    if total > 0.0 && total.is_finite() {
        for weight in &mut weights {
            *weight /= total;
        }
    }
    weights
}

/// The shared value when every element is identical.
fn constant_value(values: &[f64]) -> Option<f64> {
    let (first, rest) = values.split_first()?;
    rest.iter().all(|value| value == first).then_some(*first)
}

/// `1 - |a - b| / (max(a, b, 1) + 7)`, floored at zero.
///
/// Weeks without temperature ranges score zero.
fn freeze_thaw_similarity(current: &WeatherPattern, incident: &WeatherPattern) -> f64 {
    let counts = current
        .freeze_thaw_days()
        .zip(incident.freeze_thaw_days())
        .and_then(|(a, b)| Some((u32::try_from(a).ok()?, u32::try_from(b).ok()?)));
    let Some((a, b)) = counts else {
        return 0.0;
    };
    let (a, b) = (f64::from(a), f64::from(b));
    let scale = a.max(b).max(1.0) + FREEZE_THAW_WINDOW;
    (1.0 - (a - b).abs() / scale).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use talus_core::DailyWeather;
    use talus_core::test_support::{COOLING, WARMING, statistics_around, trend_day, trend_pattern};

    #[fixture]
    fn similarity() -> WeatherPatternSimilarity {
        WeatherPatternSimilarity::new(&WeatherConfig::default())
    }

    #[rstest]
    fn recency_weights_sum_to_one_and_decrease(similarity: WeatherPatternSimilarity) {
        let weights = similarity.day_weights();
        let total: f64 = weights.iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert!(weights.windows(2).all(|pair| match pair {
            [newer, older] => newer > older,
            _ => false,
        }));
    }

    #[rstest]
    fn identical_weeks_are_fully_similar(similarity: WeatherPatternSimilarity) {
        let week = trend_pattern(WARMING);
        let result = similarity.compare(&week, &week, None);
        assert!((result.base - 1.0).abs() < 1e-9);
        assert_eq!(result.multiplier, 1.0);
    }

    #[rstest]
    fn mirrored_weeks_fall_below_the_veto(similarity: WeatherPatternSimilarity) {
        let result = similarity.compare(&trend_pattern(WARMING), &trend_pattern(COOLING), None);
        assert!(result.factors.temperature < 1e-9);
        assert!(result.similarity < 0.25);
    }

    #[rstest]
    fn invalid_weeks_score_zero(similarity: WeatherPatternSimilarity) {
        let sparse = WeatherPattern::from_days([trend_day(1.0); 4]).expect("pattern");
        let result = similarity.compare(&trend_pattern(WARMING), &sparse, None);
        assert_eq!(result.similarity, 0.0);
    }

    #[rstest]
    fn constant_series_follow_the_equality_rule(similarity: WeatherPatternSimilarity) {
        let calm = DailyWeather {
            precipitation_mm: Some(0.0),
            ..DailyWeather::default()
        };
        let wet = DailyWeather {
            precipitation_mm: Some(4.0),
            ..DailyWeather::default()
        };
        let dry_week = WeatherPattern::from_days([calm; 7]).expect("pattern");
        let wet_week = WeatherPattern::from_days([wet; 7]).expect("pattern");
        let same = similarity.compare(&dry_week, &dry_week, None);
        let different = similarity.compare(&dry_week, &wet_week, None);
        assert_eq!(same.factors.precipitation, 1.0);
        assert_eq!(different.factors.precipitation, 0.0);
        assert_eq!(same.factors.temperature, 0.0);
    }

    #[rstest]
    fn constant_against_varying_scores_zero(similarity: WeatherPatternSimilarity) {
        let flat = WeatherPattern::from_days([trend_day(2.0); 7]).expect("pattern");
        let result = similarity.compare(&flat, &trend_pattern(WARMING), None);
        assert_eq!(result.factors.temperature, 0.0);
        assert_eq!(result.factors.wind_speed, 0.0);
    }

    #[rstest]
    #[case(0, 0, 1.0)]
    #[case(3, 0, 0.7)]
    #[case(7, 0, 0.5)]
    fn freeze_thaw_similarity_matches_formula(
        #[case] a: usize,
        #[case] b: usize,
        #[case] expected: f64,
    ) {
        let week_with = |cycles: usize| {
            let days: Vec<DailyWeather> = (0..7)
                .map(|day| trend_day(if day < cycles { 1.0 } else { -8.0 }))
                .collect();
            WeatherPattern::from_days(days).expect("pattern")
        };
        let score = freeze_thaw_similarity(&week_with(a), &week_with(b));
        assert!((score - expected).abs() < 1e-9, "{a} vs {b} -> {score}");
    }

    #[rstest]
    fn extreme_readings_amplify(similarity: WeatherPatternSimilarity) {
        let week = trend_pattern(WARMING);
        // Latest readings sit exactly on the mean: no amplification.
        let typical = similarity.compare(&week, &week, Some(&statistics_around(6.0, 1.0)));
        assert!((typical.multiplier - 1.0).abs() < 1e-12);
        // Temperature 6.0 against mean 2.0, σ 1.0 is 4σ: 2σ beyond threshold.
        let unusual = similarity.compare(&week, &week, Some(&statistics_around(2.0, 1.0)));
        assert!(unusual.multiplier > 1.0);
        assert!(unusual.similarity > unusual.base);
    }
}
