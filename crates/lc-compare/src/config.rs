//! Comparison settings.
//!
//! The defaults compare free text exactly (after case and whitespace
//! normalisation). Both relaxations are opt-in and every mismatch they
//! resolve is still reported, flagged as an equivalent variant.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::values::normalize_text;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComparisonConfig {
    /// Ignore punctuation when deciding whether two texts are equivalent.
    pub strip_punctuation: bool,
    /// Groups of interchangeable words, e.g. `["CORPORATION", "CORP"]`.
    pub equivalents: Vec<Vec<String>>,
}

impl ComparisonConfig {
    /// Whether any relaxation of exact text comparison is configured.
    pub fn has_equivalence(&self) -> bool {
        self.strip_punctuation || !self.equivalents.is_empty()
    }

    /// Canonical form under the configured equivalences.
    ///
    /// Each word is replaced by the first member of its group; group members
    /// are matched without trailing full stops, so `CORP.` counts as `CORP`.
    pub fn canonical(&self, text: &str) -> String {
        let substitutions = self.substitutions();
        normalize_text(text, self.strip_punctuation)
            .split(' ')
            .map(|word| {
                let bare = word.trim_end_matches('.');
                substitutions
                    .get(bare)
                    .map_or_else(|| word.to_string(), Clone::clone)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn substitutions(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        for group in &self.equivalents {
            let mut members = group
                .iter()
                .map(|member| normalize_text(member, true))
                .filter(|member| !member.is_empty());
            let Some(head) = members.next() else {
                continue;
            };
            map.insert(head.clone(), head.clone());
            for member in members {
                map.entry(member).or_insert_with(|| head.clone());
            }
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abbreviations_collapse_to_group_head() {
        let config = ComparisonConfig {
            equivalents: vec![vec!["Corporation".into(), "Corp".into()]],
            ..Default::default()
        };
        assert_eq!(config.canonical("XYZ Export Corp."), "XYZ EXPORT CORPORATION");
        assert_eq!(config.canonical("XYZ Export Corporation"), "XYZ EXPORT CORPORATION");
        assert!(config.has_equivalence());
    }

    #[test]
    fn default_is_exact() {
        let config = ComparisonConfig::default();
        assert!(!config.has_equivalence());
        assert_eq!(config.canonical("A.B. Co."), "A.B. CO.");
    }
}
