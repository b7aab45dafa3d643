//! Bulk scoring across many reference points.
//!
//! Points are split into fixed-size chunks scored on the rayon pool. Each
//! chunk owns a [`LocationPrecomputationEngine`], so the similarity cache is
//! never shared between threads and the output does not depend on
//! scheduling. Within a point the bundle is computed once and split into
//! columns; consumers with identical adjustment inputs are scored once.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rayon::prelude::*;
use talus_core::{
    BatchPoint, BatchRequest, ConsumerAdjustment, ConsumerId, HistoricalIncident, ScoreNote,
    ScoreResult,
};

use crate::{
    AccidentInfluenceModel, BundleColumns, LocationPrecomputationEngine, RouteAdjustmentEngine,
};

/// Scores every consumer of every point in a [`BatchRequest`].
#[derive(Debug, Clone, Copy)]
pub struct BatchScorer<'m> {
    model: &'m AccidentInfluenceModel,
    adjuster: RouteAdjustmentEngine,
    chunk_size: usize,
}

impl<'m> BatchScorer<'m> {
    /// Scorer sharing `model` across worker threads. A zero `chunk_size`
    /// is treated as one.
    #[must_use]
    pub const fn new(
        model: &'m AccidentInfluenceModel,
        adjuster: RouteAdjustmentEngine,
        chunk_size: usize,
    ) -> Self {
        Self {
            model,
            adjuster,
            chunk_size: if chunk_size == 0 { 1 } else { chunk_size },
        }
    }

    /// Score the whole request.
    ///
    /// Consumer ids should be unique across the request. When an id repeats,
    /// the later occurrence replaces the earlier one and a warning is
    /// logged.
    #[must_use]
    pub fn score(&self, request: &BatchRequest<'_>) -> BTreeMap<ConsumerId, ScoreResult> {
        let chunks: Vec<Vec<(ConsumerId, ScoreResult)>> = request
            .points
            .par_chunks(self.chunk_size)
            .map(|chunk| self.score_chunk(chunk, request.target_date, request.incidents))
            .collect();

        let mut results = BTreeMap::new();
        for (id, result) in chunks.into_iter().flatten() {
            if results.insert(id, result).is_some() {
                log::warn!("consumer {id} appears more than once in the batch; keeping the last");
            }
        }
        results
    }

    fn score_chunk(
        &self,
        chunk: &[BatchPoint],
        target_date: NaiveDate,
        incidents: &[HistoricalIncident],
    ) -> Vec<(ConsumerId, ScoreResult)> {
        let epsilon = self.adjuster.normalizer().epsilon();
        let mut engine = LocationPrecomputationEngine::new(self.model, epsilon);
        let mut scored = Vec::new();
        for point in chunk {
            self.score_point(&mut engine, point, target_date, incidents, &mut scored);
        }
        let stats = engine.cache().stats();
        log::debug!(
            "scored {} points: similarity cache {} hits, {} misses",
            chunk.len(),
            stats.hits,
            stats.misses
        );
        scored
    }

    fn score_point(
        &self,
        engine: &mut LocationPrecomputationEngine<'_>,
        point: &BatchPoint,
        target_date: NaiveDate,
        incidents: &[HistoricalIncident],
        scored: &mut Vec<(ConsumerId, ScoreResult)>,
    ) {
        if incidents.is_empty() {
            let empty =
                ScoreResult::empty(point.reference_point.id, target_date, ScoreNote::NoIncidents);
            scored.extend(point.consumers.iter().map(|c| (c.id, empty.clone())));
            return;
        }
        let bundle =
            engine.precompute(&point.reference_point, target_date, incidents, &point.conditions);
        let columns = BundleColumns::from_bundle(&bundle);
        let mut distinct: HashMap<&ConsumerAdjustment, ScoreResult> = HashMap::new();
        for consumer in &point.consumers {
            let result = distinct
                .entry(&consumer.adjustment)
                .or_insert_with(|| self.adjuster.adjust_columns(&columns, &consumer.adjustment))
                .clone();
            scored.push((consumer.id, result));
        }
    }
}
