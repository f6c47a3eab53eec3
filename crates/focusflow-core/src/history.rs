//! Focus history and per-category rollups.
//!
//! Entries are appended in the order sessions close. Category totals are a
//! pure function of the entry sequence; `recompute_totals` rebuilds them from
//! scratch and must always agree with the incrementally maintained map.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::classifier::Classifier;

/// One finished focus session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub destination: String,
    pub time_spent_secs: u64,
    pub ended_at: DateTime<Utc>,
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}s", self.destination, self.time_spent_secs)
    }
}

/// Seconds per category, in the order categories were first seen.
pub type CategoryTotals = IndexMap<String, u64>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HistorySummary {
    Empty,
    Dominant {
        category: String,
        seconds: u64,
        total_seconds: u64,
    },
}

impl fmt::Display for HistorySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistorySummary::Empty => write!(f, "No focus history yet."),
            HistorySummary::Dominant {
                category,
                seconds,
                total_seconds,
            } => write!(
                f,
                "Most of your focus time was spent on {category} ({seconds}s). \
                 Total focus time: {total_seconds}s."
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HistoryAggregator {
    classifier: Arc<Classifier>,
    entries: Vec<HistoryEntry>,
    totals: CategoryTotals,
}

impl HistoryAggregator {
    pub fn new(classifier: Arc<Classifier>) -> Self {
        Self {
            classifier,
            entries: Vec::new(),
            totals: CategoryTotals::new(),
        }
    }

    pub fn record_entry(&mut self, entry: HistoryEntry) {
        let category = self.classifier.category_of(&entry.destination).to_string();
        *self.totals.entry(category).or_insert(0) += entry.time_spent_secs;
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn totals(&self) -> &CategoryTotals {
        &self.totals
    }

    pub fn total_seconds(&self) -> u64 {
        self.totals.values().sum()
    }

    /// Rebuild the totals from the entry sequence alone.
    pub fn recompute_totals(&self) -> CategoryTotals {
        let mut totals = CategoryTotals::new();
        for entry in &self.entries {
            let category = self.classifier.category_of(&entry.destination);
            *totals.entry(category.to_string()).or_insert(0) += entry.time_spent_secs;
        }
        totals
    }

    /// Dominant category with its seconds and the grand total. On a tie the
    /// category seen first wins.
    pub fn summarize(&self) -> HistorySummary {
        if self.entries.is_empty() {
            return HistorySummary::Empty;
        }

        let mut dominant: Option<(&String, u64)> = None;
        for (category, &seconds) in &self.totals {
            match dominant {
                Some((_, best)) if best >= seconds => {}
                _ => dominant = Some((category, seconds)),
            }
        }

        match dominant {
            Some((category, seconds)) => HistorySummary::Dominant {
                category: category.clone(),
                seconds,
                total_seconds: self.total_seconds(),
            },
            None => HistorySummary::Empty,
        }
    }
}
