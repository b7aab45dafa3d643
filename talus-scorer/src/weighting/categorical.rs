//! Category affinity and severity multipliers.

use talus_core::{RouteCategory, SeverityClass};

use crate::{RouteTypeConfig, SeverityConfig};

const CATEGORIES: usize = RouteCategory::ALL.len();

/// Asymmetric `(consumer, incident)` category lookup.
///
/// Ice incidents inform alpine consumers more than alpine incidents inform
/// ice consumers, so the matrix is deliberately not symmetric. Pairs without
/// an entry receive the configured default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteTypeWeighting {
    matrix: [[f64; CATEGORIES]; CATEGORIES],
    default_weight: f64,
}

impl RouteTypeWeighting {
    /// Build the dense lookup from configuration. Later entries win.
    #[must_use]
    pub fn new(config: &RouteTypeConfig) -> Self {
        let mut matrix = [[config.default_weight; CATEGORIES]; CATEGORIES];
        for affinity in &config.affinities {
            if let Some(cell) = matrix
                .get_mut(affinity.consumer.index())
                .and_then(|row| row.get_mut(affinity.incident.index()))
            {
                *cell = affinity.weight;
            }
        }
        Self {
            matrix,
            default_weight: config.default_weight,
        }
    }

    /// Weight applied to an `incident` category for a `consumer` category.
    #[must_use]
    pub fn weight(&self, consumer: RouteCategory, incident: RouteCategory) -> f64 {
        self.row(consumer)
            .get(incident.index())
            .copied()
            .unwrap_or(self.default_weight)
    }

    /// Every incident-category weight for one consumer category, indexed by
    /// [`RouteCategory::index`].
    #[must_use]
    pub fn row(&self, consumer: RouteCategory) -> [f64; CATEGORIES] {
        self.matrix
            .get(consumer.index())
            .copied()
            .unwrap_or([self.default_weight; CATEGORIES])
    }
}

/// Constant multiplier by outcome class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeverityWeighting {
    config: SeverityConfig,
}

impl SeverityWeighting {
    /// Build from configuration.
    #[must_use]
    pub const fn new(config: &SeverityConfig) -> Self {
        Self { config: *config }
    }

    /// Multiplier for `severity`.
    #[must_use]
    pub const fn weight(&self, severity: SeverityClass) -> f64 {
        match severity {
            SeverityClass::Fatal => self.config.fatal,
            SeverityClass::Serious => self.config.serious,
            SeverityClass::Minor => self.config.minor,
            SeverityClass::Unknown => self.config.unknown,
        }
    }
}
