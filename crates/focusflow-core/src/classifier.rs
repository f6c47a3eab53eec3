//! Destination classifier.
//!
//! Maps a destination (usually a URL) to a category and decides whether it
//! counts as a distraction. Both lookups are case-insensitive substring
//! matches against keyword tables, so the classifier is pure and total:
//! every destination lands in exactly one category.

use serde::{Deserialize, Serialize};

use crate::config::ClassifierConfig;

/// Category assigned when no keyword matches.
pub const OTHER_CATEGORY: &str = "Other";

/// Result of classifying a single destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub category: String,
    pub is_distraction: bool,
}

#[derive(Debug, Clone)]
struct CategoryTable {
    name: String,
    keywords: Vec<String>,
}

/// Keyword-table classifier.
#[derive(Debug, Clone)]
pub struct Classifier {
    categories: Vec<CategoryTable>,
    distractions: Vec<String>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::from_config(&ClassifierConfig::default())
    }
}

impl Classifier {
    /// Build from config. Keywords are lowercased once here; blank keywords
    /// are dropped since they would match everything.
    pub fn from_config(config: &ClassifierConfig) -> Self {
        let categories = config
            .categories
            .iter()
            .map(|rule| CategoryTable {
                name: rule.name.clone(),
                keywords: normalize(&rule.keywords),
            })
            .collect();

        Self {
            categories,
            distractions: normalize(&config.distractions),
        }
    }

    /// First category (in declaration order) with a keyword contained in the
    /// destination, or [`OTHER_CATEGORY`].
    pub fn category_of(&self, destination: &str) -> &str {
        let lowered = destination.to_lowercase();
        self.categories
            .iter()
            .find(|table| table.keywords.iter().any(|k| lowered.contains(k.as_str())))
            .map(|table| table.name.as_str())
            .unwrap_or(OTHER_CATEGORY)
    }

    pub fn is_distraction(&self, destination: &str) -> bool {
        let lowered = destination.to_lowercase();
        self.distractions
            .iter()
            .any(|k| lowered.contains(k.as_str()))
    }

    pub fn classify(&self, destination: &str) -> Classification {
        Classification {
            category: self.category_of(destination).to_string(),
            is_distraction: self.is_distraction(destination),
        }
    }

    /// Category names in declaration order, followed by [`OTHER_CATEGORY`].
    pub fn category_names(&self) -> Vec<&str> {
        self.categories
            .iter()
            .map(|t| t.name.as_str())
            .chain(std::iter::once(OTHER_CATEGORY))
            .collect()
    }
}

fn normalize(keywords: &[String]) -> Vec<String> {
    keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CategoryRule;

    #[test]
    fn category_match_is_case_insensitive() {
        let classifier = Classifier::default();
        assert_eq!(classifier.category_of("https://DISCORD.gg/abc"), "Social Media");
        assert_eq!(classifier.category_of("https://www.YouTube.com/watch"), "Entertainment");
    }

    #[test]
    fn unknown_destination_is_other() {
        let classifier = Classifier::default();
        assert_eq!(classifier.category_of("https://example.org"), OTHER_CATEGORY);
        assert_eq!(classifier.category_of(""), OTHER_CATEGORY);
    }

    #[test]
    fn first_declared_category_wins() {
        // Productivity is declared before Entertainment.
        let classifier = Classifier::default();
        assert_eq!(classifier.category_of("https://docs.google.com/x"), "Productivity");
        assert_eq!(
            classifier.category_of("https://google.com/search?q=youtube"),
            "Productivity"
        );
    }

    #[test]
    fn distraction_list() {
        let classifier = Classifier::default();
        assert!(classifier.is_distraction("https://www.tiktok.com/@someone"));
        assert!(classifier.is_distraction("https://NETFLIX.com"));
        assert!(!classifier.is_distraction("https://www.notion.so/page"));
        assert!(!classifier.is_distraction("https://twitter.com"));
    }

    #[test]
    fn classify_combines_both_lookups() {
        let classifier = Classifier::default();
        assert_eq!(
            classifier.classify("https://discord.gg/x"),
            Classification {
                category: "Social Media".into(),
                is_distraction: true,
            }
        );
    }

    #[test]
    fn custom_tables_are_normalized() {
        let config = ClassifierConfig {
            categories: vec![CategoryRule {
                name: "Code".into(),
                keywords: vec!["  GitHub ".into(), "".into()],
            }],
            distractions: vec!["Reddit".into(), " ".into()],
        };
        let classifier = Classifier::from_config(&config);
        assert_eq!(classifier.category_of("https://github.com/rust-lang"), "Code");
        assert_eq!(classifier.category_of("https://example.org"), OTHER_CATEGORY);
        assert!(classifier.is_distraction("https://old.reddit.com"));
        assert!(!classifier.is_distraction("https://example.org"));
        assert_eq!(classifier.category_names(), ["Code", OTHER_CATEGORY]);
    }
}
