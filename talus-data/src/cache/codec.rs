//! Binary encoding of cached values.

use bincode::Options;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::CacheError;

/// Bincode options used for every cached value.
fn bincode_options() -> impl Options {
    bincode::DefaultOptions::new()
}

/// Encode `value` for storage.
///
/// # Errors
/// Returns [`CacheError::Encode`] when serialisation fails.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, CacheError> {
    bincode_options()
        .serialize(value)
        .map_err(|source| CacheError::Encode { source })
}

/// Decode bytes produced by [`encode`].
///
/// # Errors
/// Returns [`CacheError::Decode`] when the bytes do not describe a `T`.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CacheError> {
    bincode_options()
        .deserialize(bytes)
        .map_err(|source| CacheError::Decode { source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use talus_core::test_support::{WARMING, date, statistics_around, trend_pattern};
    use talus_core::{HistoricalWeatherStatistics, ScoreNote, ScoreResult, WeatherPattern};

    #[rstest]
    fn weather_survives_storage() {
        let pattern = trend_pattern(WARMING);
        let bytes = encode(&pattern).expect("encode pattern");
        let restored: WeatherPattern = decode(&bytes).expect("decode pattern");
        assert_eq!(restored, pattern);

        let statistics = statistics_around(0.0, 2.0);
        let bytes = encode(&statistics).expect("encode statistics");
        let restored: HistoricalWeatherStatistics = decode(&bytes).expect("decode statistics");
        assert_eq!(restored, statistics);
    }

    #[rstest]
    fn scores_survive_storage() {
        let result = ScoreResult::empty(3, date(2024, 2, 1), ScoreNote::WeatherUnavailable);
        let bytes = encode(&result).expect("encode score");
        let restored: ScoreResult = decode(&bytes).expect("decode score");
        assert_eq!(restored, result);
    }

    #[rstest]
    fn garbage_is_a_decode_error() {
        let err = decode::<WeatherPattern>(&[0xff, 0xff, 0xff]).expect_err("garbage");
        assert!(matches!(err, CacheError::Decode { .. }));
    }
}
