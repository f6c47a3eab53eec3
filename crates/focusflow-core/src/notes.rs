//! Tagged notes and their summaries.
//!
//! Summaries are a deterministic truncation, computed once when a note is
//! added. The global summary groups note summaries by tag.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, Result};

/// Tag applied when the user gives none. Also the display bucket for notes
/// without tags.
pub const DEFAULT_TAG: &str = "general";

/// Notes longer than this many words are truncated in their summary.
pub const SUMMARY_WORD_LIMIT: usize = 20;

const ELLIPSIS: &str = "...";
const GROUP_SEPARATOR: &str = " | ";

pub type NoteId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub text: String,
    pub tags: Vec<String>,
    pub summary: String,
}

impl Note {
    /// First tag, used to pick the note's display bucket.
    pub fn primary_tag(&self) -> &str {
        self.tags.first().map(String::as_str).unwrap_or(DEFAULT_TAG)
    }
}

/// Summaries for one tag, in note order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagGroup {
    pub tag: String,
    pub summaries: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "groups", rename_all = "snake_case")]
pub enum GlobalSummary {
    NoNotes,
    Groups(Vec<TagGroup>),
}

impl GlobalSummary {
    pub fn group(&self, tag: &str) -> Option<&TagGroup> {
        match self {
            GlobalSummary::NoNotes => None,
            GlobalSummary::Groups(groups) => groups.iter().find(|g| g.tag == tag),
        }
    }
}

impl fmt::Display for GlobalSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlobalSummary::NoNotes => write!(f, "No notes yet."),
            GlobalSummary::Groups(groups) => {
                let lines: Vec<String> = groups
                    .iter()
                    .map(|g| format!("#{}: {}", g.tag, g.summaries.join(GROUP_SEPARATOR)))
                    .collect();
                write!(f, "{}", lines.join("\n"))
            }
        }
    }
}

/// Up to [`SUMMARY_WORD_LIMIT`] words are kept verbatim; longer text keeps
/// its first words re-joined with single spaces plus an ellipsis.
pub fn summarize_note(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= SUMMARY_WORD_LIMIT {
        return text.to_string();
    }
    format!("{}{ELLIPSIS}", words[..SUMMARY_WORD_LIMIT].join(" "))
}

/// Split a comma-separated tag list. Blank entries and repeats are dropped;
/// an empty result becomes `["general"]`.
pub fn parse_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    if tags.is_empty() {
        tags.push(DEFAULT_TAG.to_string());
    }
    tags
}

#[derive(Debug, Clone, Default)]
pub struct NoteRepository {
    notes: Vec<Note>,
}

impl NoteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a note. Fails with `InvalidInput` when the text is blank.
    pub fn add_note(&mut self, text: &str, raw_tags: &str) -> Result<Note> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CoreError::invalid_input("text", "must not be empty"));
        }

        let note = Note {
            id: Uuid::new_v4(),
            text: text.to_string(),
            tags: parse_tags(raw_tags),
            summary: summarize_note(text),
        };
        self.notes.push(note.clone());
        Ok(note)
    }

    pub fn remove_note(&mut self, id: NoteId) -> Option<Note> {
        let index = self.notes.iter().position(|n| n.id == id)?;
        Some(self.notes.remove(index))
    }

    pub fn list(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Group summaries under every tag of every note, tags in first-seen order.
    pub fn global_summary(&self) -> GlobalSummary {
        if self.notes.is_empty() {
            return GlobalSummary::NoNotes;
        }

        let mut by_tag: IndexMap<&str, Vec<String>> = IndexMap::new();
        for note in &self.notes {
            for tag in &note.tags {
                by_tag
                    .entry(tag.as_str())
                    .or_default()
                    .push(note.summary.clone());
            }
        }

        GlobalSummary::Groups(
            by_tag
                .into_iter()
                .map(|(tag, summaries)| TagGroup {
                    tag: tag.to_string(),
                    summaries,
                })
                .collect(),
        )
    }
}
