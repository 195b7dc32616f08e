//! Capability matching policies.

use crate::ports::CapabilityMatcher;

/// Case-insensitive containment: the capability occurs somewhere inside the
/// task description. "analyze data" matches "Analyze data for Q3".
///
/// Empty (or whitespace-only) capabilities match nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringMatcher;

impl SubstringMatcher {
    pub fn new() -> Self {
        Self
    }
}

impl CapabilityMatcher for SubstringMatcher {
    fn matches(&self, capability: &str, description: &str) -> bool {
        let capability = capability.trim();
        !capability.is_empty()
            && description
                .to_lowercase()
                .contains(&capability.to_lowercase())
    }
}

/// Case-insensitive equality between capability and description, with the
/// same Unicode lowercasing as `SubstringMatcher`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactTagMatcher;

impl ExactTagMatcher {
    pub fn new() -> Self {
        Self
    }
}

impl CapabilityMatcher for ExactTagMatcher {
    fn matches(&self, capability: &str, description: &str) -> bool {
        let capability = capability.trim();
        !capability.is_empty() && capability.to_lowercase() == description.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::exact("analyze data", "analyze data", true)]
    #[case::inside("analyze data", "Please ANALYZE DATA for Q3", true)]
    #[case::mixed_case_capability("Market Research", "market research on competitors", true)]
    #[case::partial_word("data", "Analyze various datasets", true)]
    #[case::no_match("code review", "Execute system backup", false)]
    #[case::reversed_containment("analyze data from the datasets", "analyze data", false)]
    #[case::empty_capability("", "anything", false)]
    #[case::non_ascii_case("übersicht", "Wöchentliche ÜBERSICHT", true)]
    fn substring_policy(#[case] capability: &str, #[case] description: &str, #[case] expected: bool) {
        assert_eq!(SubstringMatcher.matches(capability, description), expected);
    }

    #[rstest]
    #[case::same("automation", "Automation", true)]
    #[case::surrounding_space("automation", "  automation ", true)]
    #[case::longer_description("automation", "automation of backups", false)]
    #[case::non_ascii_case("Übersicht", "ÜBERSICHT", true)]
    fn exact_policy(#[case] capability: &str, #[case] description: &str, #[case] expected: bool) {
        assert_eq!(ExactTagMatcher.matches(capability, description), expected);
    }

    #[test]
    fn accepts_checks_every_capability() {
        let caps = vec!["customer support".to_string(), "market research".to_string()];
        assert!(SubstringMatcher.accepts(&caps, "Market research on competitors"));
        assert!(!SubstringMatcher.accepts(&caps, "Execute system backup"));
        assert!(!SubstringMatcher.accepts(&[], "market research"));
    }

    #[rstest]
    #[case("ÅRSRAPPORT", "årsrapport")]
    #[case("Çizelge", "ÇIZELGE")]
    #[case("ДАННЫЕ", "данные")]
    fn both_policies_fold_non_ascii_case(#[case] capability: &str, #[case] description: &str) {
        assert!(ExactTagMatcher.matches(capability, description));
        assert!(SubstringMatcher.matches(capability, description));
    }
}
