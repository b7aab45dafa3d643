//! Closed enumerations describing incidents and the routes they occurred on.
//!
//! The enums offer compile-time safety for weighting lookups. Free-text
//! classification happens at ingestion time through a [`CategoryClassifier`]
//! so the scoring math only ever sees these closed sets.
//!
//! # Examples
//! ```
//! use talus_core::RouteCategory;
//!
//! assert_eq!(RouteCategory::Ice.as_str(), "ice");
//! assert_eq!("Alpine".parse::<RouteCategory>(), Ok(RouteCategory::Alpine));
//! ```

/// Broad route category shared by incidents and consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RouteCategory {
    /// Glaciated or high mountain terrain.
    Alpine,
    /// Water ice and snow-ice climbing.
    Ice,
    /// Mixed rock and ice.
    Mixed,
    /// Traditionally protected rock.
    Trad,
    /// Bolted rock.
    Sport,
    /// Unroped boulder problems.
    Boulder,
    /// No category could be inferred.
    Unknown,
}

impl RouteCategory {
    /// Every category, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Alpine,
        Self::Ice,
        Self::Mixed,
        Self::Trad,
        Self::Sport,
        Self::Boulder,
        Self::Unknown,
    ];

    /// Return the category as a lowercase `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Alpine => "alpine",
            Self::Ice => "ice",
            Self::Mixed => "mixed",
            Self::Trad => "trad",
            Self::Sport => "sport",
            Self::Boulder => "boulder",
            Self::Unknown => "unknown",
        }
    }

    /// Dense index into [`RouteCategory::ALL`], used by table lookups.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Alpine => 0,
            Self::Ice => 1,
            Self::Mixed => 2,
            Self::Trad => 3,
            Self::Sport => 4,
            Self::Boulder => 5,
            Self::Unknown => 6,
        }
    }
}

impl std::fmt::Display for RouteCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RouteCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == lowered)
            .ok_or_else(|| format!("unknown route category '{s}'"))
    }
}

/// Outcome class of an incident.
///
/// Ordered from least to most severe so comparisons read naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SeverityClass {
    /// Outcome was not recorded.
    #[default]
    Unknown,
    /// Minor injuries or a near miss.
    Minor,
    /// Serious injury requiring evacuation.
    Serious,
    /// At least one fatality.
    Fatal,
}

impl SeverityClass {
    /// Return the class as a lowercase `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Minor => "minor",
            Self::Serious => "serious",
            Self::Fatal => "fatal",
        }
    }
}

impl std::fmt::Display for SeverityClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free-text fields describing an incident, in priority order.
///
/// Classifiers consult [`IncidentText::sources`] so that a structured
/// route-type field always beats prose from the title or description.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IncidentText<'a> {
    /// Structured route type recorded by the reporting source.
    pub route_type: Option<&'a str>,
    /// Report headline.
    pub title: Option<&'a str>,
    /// Long-form narrative.
    pub description: Option<&'a str>,
}

impl<'a> IncidentText<'a> {
    /// Iterate the non-blank text sources from highest to lowest priority.
    pub fn sources(&self) -> impl Iterator<Item = &'a str> {
        [self.route_type, self.title, self.description]
            .into_iter()
            .flatten()
            .filter(|text| !text.trim().is_empty())
    }
}

/// Infer a [`RouteCategory`] from incident text.
///
/// Implementations must be pure: the same text always yields the same
/// category, and text that matches nothing yields
/// [`RouteCategory::Unknown`].
pub trait CategoryClassifier: Send + Sync {
    /// Classify the incident described by `text`.
    fn classify(&self, text: &IncidentText<'_>) -> RouteCategory;
}
