use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::model::attachment::Attachment;

/// Maximum title length before truncation (note content only).
pub const TITLE_MAX: usize = 50;

/// Which flavor of item a board holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Note,
    Todo,
}

impl ItemKind {
    /// Wire name used in trash records (`itemType`)
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Note => "note",
            ItemKind::Todo => "todo",
        }
    }

    /// Only notes carry attachments
    pub fn supports_attachments(self) -> bool {
        matches!(self, ItemKind::Note)
    }
}

/// Opaque item identifier: creation millis plus a random suffix
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn generate(now: DateTime<Local>) -> Self {
        ItemId(format!(
            "{}-{}",
            now.timestamp_millis(),
            super::random_suffix()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId(s.to_string())
    }
}

/// A note or todo entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub kind: ItemKind,
    /// The user-entered body text
    pub content: String,
    /// Partition membership flag — kept in lockstep with the store
    pub completed: bool,
    /// Recency signal: set at creation and on content edits, never on
    /// completion toggles
    pub last_updated: DateTime<Local>,
    /// Insertion-ordered; empty for todos
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl Item {
    pub fn new(kind: ItemKind, content: String, now: DateTime<Local>) -> Self {
        Item {
            id: ItemId::generate(now),
            kind,
            content,
            completed: false,
            last_updated: now,
            attachments: Vec::new(),
        }
    }

    /// Display title, derived from content. Notes truncate to
    /// [`TITLE_MAX`] grapheme clusters with a trailing ellipsis; todos
    /// use the raw text. Never stored — recomputed so it cannot drift
    /// from the content.
    pub fn title(&self) -> String {
        match self.kind {
            ItemKind::Note => truncate_title(&self.content),
            ItemKind::Todo => self.content.clone(),
        }
    }
}

/// Truncate text to [`TITLE_MAX`] grapheme clusters, appending `"..."`
/// when anything was cut.
pub fn truncate_title(text: &str) -> String {
    let mut graphemes = text.grapheme_indices(true);
    match graphemes.nth(TITLE_MAX) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}
