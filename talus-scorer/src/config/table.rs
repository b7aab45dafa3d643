//! Lookup tables keyed by route category.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use talus_core::RouteCategory;

/// Per-category values with a fallback for unmapped categories.
///
/// # Examples
/// ```
/// use talus_core::RouteCategory;
/// use talus_scorer::CategoryTable;
///
/// let table = CategoryTable::new(3.0).with(RouteCategory::Alpine, 5.0);
/// assert_eq!(table.get(RouteCategory::Alpine), 5.0);
/// assert_eq!(table.get(RouteCategory::Unknown), 3.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTable {
    /// Explicit per-category values.
    #[serde(default)]
    pub values: BTreeMap<RouteCategory, f64>,
    /// Value used for categories without an entry.
    pub default: f64,
}

impl CategoryTable {
    /// Empty table answering `default` for every category.
    #[must_use]
    pub const fn new(default: f64) -> Self {
        Self {
            values: BTreeMap::new(),
            default,
        }
    }

    /// Add or replace the value for `category`.
    #[must_use]
    pub fn with(mut self, category: RouteCategory, value: f64) -> Self {
        self.values.insert(category, value);
        self
    }

    /// Value for `category`, falling back to the default.
    #[must_use]
    pub fn get(&self, category: RouteCategory) -> f64 {
        self.values.get(&category).copied().unwrap_or(self.default)
    }

    /// Resolve every category into a dense array indexed by
    /// [`RouteCategory::index`].
    #[must_use]
    pub fn resolve(&self) -> [f64; RouteCategory::ALL.len()] {
        RouteCategory::ALL.map(|category| self.get(category))
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (String, f64)> + '_ {
        self.values
            .iter()
            .map(|(category, value)| (category.as_str().to_owned(), *value))
            .chain(std::iter::once(("default".to_owned(), self.default)))
    }
}

/// Weight applied when an incident of one category informs a consumer of
/// another.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteAffinity {
    /// Category of the consumer receiving the score.
    pub consumer: RouteCategory,
    /// Category of the incident providing evidence.
    pub incident: RouteCategory,
    /// Multiplier applied to the incident's influence.
    pub weight: f64,
}

impl RouteAffinity {
    /// Construct an affinity entry.
    #[must_use]
    pub const fn new(consumer: RouteCategory, incident: RouteCategory, weight: f64) -> Self {
        Self {
            consumer,
            incident,
            weight,
        }
    }
}
