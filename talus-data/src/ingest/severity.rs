//! Severity inference from incident prose.

use talus_core::{IncidentText, SeverityClass};

/// Keyword stems in priority order. Negated forms sit ahead of the words they
/// contain.
const SEVERITY_RULES: &[(&str, SeverityClass)] = &[
    ("non-fatal", SeverityClass::Serious),
    ("nonfatal", SeverityClass::Serious),
    ("fatal", SeverityClass::Fatal),
    ("died", SeverityClass::Fatal),
    ("killed", SeverityClass::Fatal),
    ("death", SeverityClass::Fatal),
    ("deceased", SeverityClass::Fatal),
    ("body recovered", SeverityClass::Fatal),
    ("serious", SeverityClass::Serious),
    ("fractur", SeverityClass::Serious),
    ("broken", SeverityClass::Serious),
    ("evacuat", SeverityClass::Serious),
    ("helicopter", SeverityClass::Serious),
    ("airlift", SeverityClass::Serious),
    ("hospital", SeverityClass::Serious),
    ("critical", SeverityClass::Serious),
    ("minor", SeverityClass::Minor),
    ("sprain", SeverityClass::Minor),
    ("bruis", SeverityClass::Minor),
    ("scrape", SeverityClass::Minor),
    ("near miss", SeverityClass::Minor),
    ("uninjured", SeverityClass::Minor),
    ("unhurt", SeverityClass::Minor),
    ("no injur", SeverityClass::Minor),
];

/// Infer the outcome class of an incident from its text.
///
/// Sources are read in priority order and the first source containing a
/// known keyword stem decides. Text without keywords is
/// [`SeverityClass::Unknown`].
///
/// # Examples
/// ```
/// use talus_core::{IncidentText, SeverityClass};
/// use talus_data::infer_severity;
///
/// let text = IncidentText {
///     route_type: Some("Ice"),
///     title: Some("Climber airlifted after icefall collapse"),
///     description: None,
/// };
/// assert_eq!(infer_severity(&text), SeverityClass::Serious);
/// ```
#[must_use]
pub fn infer_severity(text: &IncidentText<'_>) -> SeverityClass {
    text.sources()
        .find_map(|source| {
            let lowered = source.to_lowercase();
            SEVERITY_RULES
                .iter()
                .find(|(stem, _)| lowered.contains(stem))
                .map(|(_, severity)| *severity)
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn titled(title: &str) -> IncidentText<'_> {
        IncidentText {
            route_type: None,
            title: Some(title),
            description: None,
        }
    }

    #[rstest]
    #[case("Fatal fall from Longs Peak", SeverityClass::Fatal)]
    #[case("Two climbers killed in avalanche", SeverityClass::Fatal)]
    #[case("Non-fatal lead fall, ankle fractured", SeverityClass::Serious)]
    #[case("Helicopter evacuation after rockfall", SeverityClass::Serious)]
    #[case("Sprained wrist on descent", SeverityClass::Minor)]
    #[case("Stuck rope, party unhurt", SeverityClass::Minor)]
    #[case("Rappel error", SeverityClass::Unknown)]
    fn infers_from_keywords(#[case] title: &str, #[case] expected: SeverityClass) {
        assert_eq!(infer_severity(&titled(title)), expected);
    }

    #[rstest]
    fn earlier_sources_decide() {
        let text = IncidentText {
            route_type: None,
            title: Some("Minor scrape while belaying"),
            description: Some("A second party reported a fatal accident nearby."),
        };
        assert_eq!(infer_severity(&text), SeverityClass::Minor);
    }
}
