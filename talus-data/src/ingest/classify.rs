//! Phrase-rule route category inference.

use talus_core::{CategoryClassifier, IncidentText, RouteCategory};

/// Built-in rules, checked in order. Earlier rules win, so the more specific
/// phrases come first.
const DEFAULT_RULES: &[(&str, RouteCategory)] = &[
    ("mixed", RouteCategory::Mixed),
    ("dry tool", RouteCategory::Mixed),
    ("drytool", RouteCategory::Mixed),
    ("dry-tool", RouteCategory::Mixed),
    ("water ice", RouteCategory::Ice),
    ("ice climb", RouteCategory::Ice),
    ("icefall", RouteCategory::Ice),
    ("frozen waterfall", RouteCategory::Ice),
    ("ice", RouteCategory::Ice),
    ("alpine", RouteCategory::Alpine),
    ("glacier", RouteCategory::Alpine),
    ("crevasse", RouteCategory::Alpine),
    ("couloir", RouteCategory::Alpine),
    ("mountaineering", RouteCategory::Alpine),
    ("avalanche", RouteCategory::Alpine),
    ("cornice", RouteCategory::Alpine),
    ("bouldering", RouteCategory::Boulder),
    ("boulder", RouteCategory::Boulder),
    ("highball", RouteCategory::Boulder),
    ("crash pad", RouteCategory::Boulder),
    ("sport", RouteCategory::Sport),
    ("bolted", RouteCategory::Sport),
    ("bolt", RouteCategory::Sport),
    ("quickdraw", RouteCategory::Sport),
    ("trad", RouteCategory::Trad),
    ("traditional", RouteCategory::Trad),
    ("gear placement", RouteCategory::Trad),
    ("cam", RouteCategory::Trad),
    ("crack", RouteCategory::Trad),
];

/// Ordered `(phrase, category)` rules applied to incident text.
///
/// Sources are consulted in [`IncidentText::sources`] order. Within a
/// source, rules are tried in order and the first phrase found as a whole
/// word (case-insensitively) decides the category. A source that matches no
/// rule hands over to the next one; text matching nothing is
/// [`RouteCategory::Unknown`].
///
/// # Examples
/// ```
/// use talus_core::{CategoryClassifier, IncidentText, RouteCategory};
/// use talus_data::PhraseRuleClassifier;
///
/// let classifier = PhraseRuleClassifier::default();
/// let text = IncidentText {
///     route_type: None,
///     title: Some("Leader falls on Bridalveil icefall"),
///     description: Some("The party was descending a glacier."),
/// };
/// assert_eq!(classifier.classify(&text), RouteCategory::Ice);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseRuleClassifier {
    rules: Vec<(String, RouteCategory)>,
}

impl Default for PhraseRuleClassifier {
    fn default() -> Self {
        Self::new(
            DEFAULT_RULES
                .iter()
                .map(|(phrase, category)| ((*phrase).to_owned(), *category)),
        )
    }
}

impl PhraseRuleClassifier {
    /// Classifier using exactly `rules`, in order.
    ///
    /// Phrases are matched case-insensitively; blank phrases are dropped.
    pub fn new<I>(rules: I) -> Self
    where
        I: IntoIterator<Item = (String, RouteCategory)>,
    {
        let kept = rules
            .into_iter()
            .filter_map(|(phrase, category)| {
                let trimmed = phrase.trim().to_lowercase();
                (!trimmed.is_empty()).then_some((trimmed, category))
            })
            .collect();
        Self { rules: kept }
    }

    /// The active rules.
    #[must_use]
    pub fn rules(&self) -> &[(String, RouteCategory)] {
        &self.rules
    }

    fn classify_source(&self, source: &str) -> Option<RouteCategory> {
        let lowered = source.to_lowercase();
        self.rules
            .iter()
            .find(|(phrase, _)| contains_word(&lowered, phrase))
            .map(|(_, category)| *category)
    }
}

impl CategoryClassifier for PhraseRuleClassifier {
    fn classify(&self, text: &IncidentText<'_>) -> RouteCategory {
        text.sources()
            .find_map(|source| self.classify_source(source))
            .unwrap_or(RouteCategory::Unknown)
    }
}

/// Whether `phrase` occurs in `text` bounded by non-alphanumeric characters.
pub(super) fn contains_word(text: &str, phrase: &str) -> bool {
    text.match_indices(phrase).any(|(start, matched)| {
        let before = text.get(..start).and_then(|head| head.chars().next_back());
        let after = text
            .get(start.saturating_add(matched.len())..)
            .and_then(|tail| tail.chars().next());
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}
