use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Attachment identifier: creation millis plus a random suffix, so two
/// files picked in the same millisecond cannot collide
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttachmentId(String);

impl AttachmentId {
    pub fn generate(now: DateTime<Local>) -> Self {
        AttachmentId(format!(
            "{}{}",
            now.timestamp_millis(),
            super::random_suffix()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AttachmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw file metadata handed over by the file picker — no byte content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    pub name: String,
    pub size: u64,
    /// MIME-like classification string, e.g. `application/pdf`
    pub kind: String,
}

/// Attachment metadata record on a note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: AttachmentId,
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// MIME-like classification, used only to pick a display glyph
    #[serde(rename = "type")]
    pub kind: String,
}

impl Attachment {
    pub fn from_meta(meta: &FileMeta, now: DateTime<Local>) -> Self {
        Attachment {
            id: AttachmentId::generate(now),
            name: meta.name.clone(),
            size: meta.size,
            kind: meta.kind.clone(),
        }
    }

    /// Display glyph for the attachment row
    pub fn glyph(&self) -> &'static str {
        if self.kind.contains("pdf") {
            "📄"
        } else if self.kind.contains("image") {
            "🖼"
        } else if self.kind.contains("excel") || self.kind.contains("spreadsheet") {
            "📊"
        } else if self.kind.contains("word") || self.kind.contains("document") {
            "📝"
        } else {
            "📎"
        }
    }
}

/// Format a byte count for display: `0 Bytes`, `1.17 KB`, `2.38 MB`, ...
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let exp = (bytes.ilog2() / 10).min(UNITS.len() as u32 - 1);
    let value = bytes as f64 / f64::powi(1024.0, exp as i32);
    // Trim trailing zeros the way a "%g"-style format would
    let s = format!("{:.2}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", s, UNITS[exp as usize])
}
