//! Property-based tests for the risk engine.
//!
//! # Invariants tested
//!
//! - **Bounds:** scores are finite and within `0..=100`.
//! - **Determinism:** identical inputs produce identical results.
//! - **Distance:** moving an incident away never raises the score.
//! - **Veto:** opposite weather removes an incident entirely.
//! - **Elevation floor:** the elevation weight never drops below one.
//! - **Batch equivalence:** batch and single scoring agree.
//! - **Ranking:** the breakdown is sorted and capped.


use proptest::prelude::*;
use talus_core::test_support::{
    COOLING, WARMING, conditions, incident, reference_point, trend_pattern,
};
use talus_core::{
    BatchPoint, BatchRequest, Consumer, ConsumerAdjustment, ConsumerId, HistoricalIncident,
    PointConditions, RiskScorer, RouteCategory, ScoreRequest, ScoreResult,
};
use talus_scorer::weighting::ElevationWeighting;
use talus_scorer::{ElevationConfig, RiskEngine};

use proptest_support::{
    ORIGIN_LAT, ORIGIN_LON, category_strategy, consumer_strategy, snapshot_strategy, target_date,
};

fn score(
    engine: &RiskEngine,
    consumer: &ConsumerAdjustment,
    incidents: &[HistoricalIncident],
    weather: &PointConditions,
) -> ScoreResult {
    let point = reference_point(1, ORIGIN_LAT, ORIGIN_LON);
    engine.score(&ScoreRequest {
        reference_point: &point,
        consumer,
        target_date: target_date(),
        incidents,
        conditions: weather,
    })
}

fn current_weather(warming: bool) -> PointConditions {
    if warming {
        conditions(trend_pattern(WARMING))
    } else {
        PointConditions::unavailable()
    }
}

#[expect(clippy::float_arithmetic, reason = "offsets move incidents north")]
fn north_of_origin(offset: f64) -> f64 {
    ORIGIN_LAT + offset
}

fn lone_incident(lat: f64, category: RouteCategory) -> [HistoricalIncident; 1] {
    [incident(1, lat, ORIGIN_LON, target_date()).with_category(category)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: scores are finite and bounded.
    #[test]
    fn score_is_bounded(
        consumer in consumer_strategy(),
        incidents in snapshot_strategy(0, 60),
        warming in any::<bool>(),
    ) {
        let engine = RiskEngine::default();
        let result = score(&engine, &consumer, &incidents, &current_weather(warming));
        prop_assert!(result.risk_score.is_finite());
        prop_assert!((0.0..=100.0).contains(&result.risk_score));
        prop_assert!(result.contributing_incidents <= incidents.len());
    }

    /// Property: scoring is a pure function of its inputs.
    #[test]
    fn score_is_deterministic(
        consumer in consumer_strategy(),
        incidents in snapshot_strategy(1, 40),
        warming in any::<bool>(),
    ) {
        let engine = RiskEngine::default();
        let weather = current_weather(warming);
        let first = score(&engine, &consumer, &incidents, &weather);
        let second = score(&engine, &consumer, &incidents, &weather);
        prop_assert_eq!(first.risk_score.to_bits(), second.risk_score.to_bits());
        prop_assert_eq!(first, second);
    }

    /// Property: pushing an incident further away never increases risk.
    #[test]
    fn distance_never_increases_risk(
        category in category_strategy(),
        near in 0.0_f64..0.02_f64,
        far in 0.02_f64..0.07_f64,
    ) {
        let engine = RiskEngine::default();
        let consumer = ConsumerAdjustment::new(category);
        let weather = PointConditions::unavailable();
        let close = lone_incident(north_of_origin(near), category);
        let far = lone_incident(north_of_origin(far), category);
        let near_score = score(&engine, &consumer, &close, &weather).risk_score;
        let far_score = score(&engine, &consumer, &far, &weather).risk_score;
        prop_assert!(far_score <= near_score);
    }

    /// Property: an incident in opposite weather never contributes.
    #[test]
    fn opposite_weather_is_vetoed(
        consumer in consumer_strategy(),
        category in category_strategy(),
    ) {
        let engine = RiskEngine::default();
        let vetoed = [incident(1, ORIGIN_LAT, ORIGIN_LON, target_date())
            .with_category(category)
            .with_weather(trend_pattern(COOLING))];
        let result = score(&engine, &consumer, &vetoed, &current_weather(true));
        prop_assert_eq!(result.risk_score, 0.0);
        prop_assert!(result.top_incidents.is_empty());
        prop_assert_eq!(result.metadata.incidents_vetoed, 1);
    }

    /// Property: the elevation weight is a bonus, never a penalty.
    #[test]
    fn elevation_weight_is_at_least_one(
        point in proptest::option::of(0.0_f64..5000.0_f64),
        incident_elevation in proptest::option::of(0.0_f64..5000.0_f64),
    ) {
        let config = ElevationConfig::default();
        let weight = ElevationWeighting::new(&config).weight(point, incident_elevation);
        prop_assert!(weight >= 1.0);
        let coincident = ElevationWeighting::new(&config).weight(Some(0.0), Some(0.0));
        prop_assert!(weight <= coincident);
    }

    /// Property: a consumer scores the same alone and in a batch.
    #[test]
    fn batch_matches_single(
        consumers in proptest::collection::vec(consumer_strategy(), 1..6),
        incidents in snapshot_strategy(0, 40),
        warming in any::<bool>(),
        chunk_size in 1_usize..4_usize,
    ) {
        let mut config = talus_scorer::ScoringConfig::default();
        config.batch.chunk_size = chunk_size;
        let engine = RiskEngine::new(config).expect("valid tuning");
        let weather = current_weather(warming);
        let roster: Vec<Consumer> = consumers
            .iter()
            .cloned()
            .zip(0_u64..)
            .map(|(adjustment, id)| Consumer::new(ConsumerId(id), adjustment))
            .collect();
        let points = [
            BatchPoint::new(reference_point(1, ORIGIN_LAT, ORIGIN_LON), roster.clone())
                .with_conditions(weather.clone()),
        ];
        let batched = engine.score_batch(&BatchRequest {
            target_date: target_date(),
            incidents: &incidents,
            points: &points,
        });
        prop_assert_eq!(batched.len(), roster.len());
        for member in &roster {
            let alone = score(&engine, &member.adjustment, &incidents, &weather);
            let Some(together) = batched.get(&member.id) else {
                return Err(TestCaseError::fail(format!("missing consumer {}", member.id)));
            };
            prop_assert_eq!(alone.risk_score.to_bits(), together.risk_score.to_bits());
            prop_assert_eq!(&alone, together);
        }
    }

    /// Property: the breakdown is sorted strongest first and capped.
    #[test]
    fn breakdown_is_ranked(
        consumer in consumer_strategy(),
        incidents in snapshot_strategy(0, 60),
    ) {
        let engine = RiskEngine::default();
        let result = score(&engine, &consumer, &incidents, &PointConditions::unavailable());
        let top_n = engine.config().normalizer.top_n;
        prop_assert_eq!(
            result.top_incidents.len(),
            result.contributing_incidents.min(top_n)
        );
        prop_assert!(result
            .top_incidents
            .windows(2)
            .all(|pair| matches!(pair, [a, b] if a.influence >= b.influence)));
    }
}
