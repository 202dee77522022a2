//! Tab ordering according to the user's reorder preference.

use super::ExtraNetworksPage;
use std::sync::Arc;

/// Sort pages by the configured tab-reorder preference.
///
/// `tab_order` is a comma-separated list of substring patterns. A page's
/// score is the index of the first pattern occurring (case-insensitively)
/// in its name; unmatched pages score `pages.len()` and sort last. The
/// sort is stable, so ties keep registration order. Pure function of its
/// inputs.
pub fn pages_in_preferred_order(
    mut pages: Vec<Arc<dyn ExtraNetworksPage>>,
    tab_order: &str,
) -> Vec<Arc<dyn ExtraNetworksPage>> {
    let patterns: Vec<String> = tab_order
        .split(',')
        .map(|pattern| pattern.trim().to_lowercase())
        .collect();

    let unmatched_score = pages.len();
    let score = |page: &Arc<dyn ExtraNetworksPage>| -> usize {
        let name = page.name();
        patterns
            .iter()
            .position(|pattern| name.contains(pattern.as_str()))
            .unwrap_or(unmatched_score)
    };

    pages.sort_by_key(score);
    pages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::Item;
    use anyhow::Result;

    struct NamedPage(&'static str);

    impl ExtraNetworksPage for NamedPage {
        fn title(&self) -> &str {
            self.0
        }
        fn list_items(&self) -> Result<Vec<Item>> {
            Ok(Vec::new())
        }
    }

    fn pages(names: &[&'static str]) -> Vec<Arc<dyn ExtraNetworksPage>> {
        names
            .iter()
            .map(|name| Arc::new(NamedPage(name)) as Arc<dyn ExtraNetworksPage>)
            .collect()
    }

    fn names(pages: &[Arc<dyn ExtraNetworksPage>]) -> Vec<String> {
        pages.iter().map(|page| page.name()).collect()
    }

    #[test]
    fn test_first_pattern_match_wins() {
        let ordered = pages_in_preferred_order(
            pages(&["textual embeddings", "loras", "hypernetworks"]),
            "lora,embed",
        );
        assert_eq!(
            names(&ordered),
            vec!["loras", "textual embeddings", "hypernetworks"]
        );
    }

    #[test]
    fn test_unmatched_pages_keep_registration_order_at_end() {
        let ordered = pages_in_preferred_order(
            pages(&["checkpoints", "hypernetworks", "loras"]),
            "lora",
        );
        assert_eq!(
            names(&ordered),
            vec!["loras", "checkpoints", "hypernetworks"]
        );
    }

    #[test]
    fn test_empty_preference_keeps_registration_order() {
        let ordered = pages_in_preferred_order(pages(&["b", "a", "c"]), "");
        assert_eq!(names(&ordered), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_patterns_match_case_insensitively() {
        let ordered = pages_in_preferred_order(pages(&["Checkpoints", "LoRAs"]), "LORA");
        assert_eq!(names(&ordered), vec!["loras", "checkpoints"]);
    }

    #[test]
    fn test_patterns_are_trimmed() {
        let ordered = pages_in_preferred_order(
            pages(&["hypernetworks", "embeddings", "loras"]),
            " lora , embed ",
        );
        assert_eq!(
            names(&ordered),
            vec!["loras", "embeddings", "hypernetworks"]
        );
    }
}
