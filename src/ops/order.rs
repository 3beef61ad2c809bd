use chrono::{DateTime, Datelike, Days, Local};

use crate::model::item::Item;

/// Order items by descending recency: most recently updated first.
///
/// Comparison is on the stored instant, so the result is a pure function
/// of the input — same collection in, same sequence out, safe to call on
/// every render. The sort is stable, so items with an identical instant
/// keep their relative (insertion) order.
pub fn by_recency<'a>(items: impl IntoIterator<Item = &'a Item>) -> Vec<&'a Item> {
    let mut ordered: Vec<&Item> = items.into_iter().collect();
    ordered.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));
    ordered
}

/// Display bucket for a recency instant. Buckets are label-only: nothing
/// compares them, ordering always goes through the instant itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecencyBucket {
    /// Updated less than a minute ago
    JustNow,
    /// Earlier the same calendar day
    Today,
    /// The previous calendar day
    Yesterday,
    /// Anything before that
    Older,
}

impl RecencyBucket {
    pub fn classify(instant: DateTime<Local>, now: DateTime<Local>) -> Self {
        let elapsed = now.signed_duration_since(instant);
        if elapsed.num_seconds() < 60 && elapsed.num_seconds() >= 0 {
            return RecencyBucket::JustNow;
        }
        let date = instant.date_naive();
        let today = now.date_naive();
        if date == today {
            RecencyBucket::Today
        } else if today.checked_sub_days(Days::new(1)) == Some(date) {
            RecencyBucket::Yesterday
        } else {
            RecencyBucket::Older
        }
    }
}

/// Human-readable recency label: `Just now`, `Today at 2:15 pm`,
/// `Yesterday at 4:30 pm`, or a full date like `Aug 7, 2026 at 2:15 pm`.
pub fn recency_label(instant: DateTime<Local>, now: DateTime<Local>) -> String {
    let clock = instant.format("%-I:%M %P");
    match RecencyBucket::classify(instant, now) {
        RecencyBucket::JustNow => "Just now".to_string(),
        RecencyBucket::Today => format!("Today at {}", clock),
        RecencyBucket::Yesterday => format!("Yesterday at {}", clock),
        RecencyBucket::Older => format!(
            "{} {}, {} at {}",
            instant.format("%b"),
            instant.day(),
            instant.year(),
            clock
        ),
    }
}
