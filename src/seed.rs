//! Demo-mode fixtures. Seeding is an external concern — a fresh board
//! is always empty; these items exist so `jot --demo` has something to
//! show and so tests can exercise every recency bucket.

use chrono::{Duration, Local};

use crate::model::attachment::{Attachment, FileMeta};
use crate::model::item::{Item, ItemKind};

fn note(content: &str, ago: Duration, completed: bool) -> Item {
    let mut item = Item::new(ItemKind::Note, content.into(), Local::now() - ago);
    item.completed = completed;
    item
}

fn attach(item: &mut Item, name: &str, size: u64, kind: &str) {
    item.attachments.push(Attachment::from_meta(
        &FileMeta {
            name: name.into(),
            size,
            kind: kind.into(),
        },
        item.last_updated,
    ));
}

/// Sample notes spanning the recency buckets, a few completed, two with
/// attachments.
pub fn sample_notes() -> Vec<Item> {
    let mut budget = note(
        "Need to analyze the Q3 financial data and prepare recommendations for Q4 budget allocation.",
        Duration::hours(2),
        false,
    );
    attach(&mut budget, "Q3_Financial_Report.pdf", 2_500_000, "application/pdf");
    attach(&mut budget, "Budget_Analysis.xlsx", 1_200_000, "application/vnd.ms-excel");

    let mut mobile = note(
        "Run comprehensive tests on mobile devices to ensure the application works across screen sizes.",
        Duration::days(4),
        true,
    );
    attach(&mut mobile, "Mobile_Test_Results.docx", 800_000, "application/msword");

    vec![
        budget,
        note(
            "Incorporate latest design changes and add new feature demos for the client meeting.",
            Duration::days(1),
            true,
        ),
        note(
            "Coordinate with all team leads to establish consistent meeting times for next sprint.",
            Duration::days(2),
            false,
        ),
        note(
            "Complete the wireframe designs for the new landing page and get stakeholder approval.",
            Duration::days(3),
            false,
        ),
        mobile,
        note(
            "Analyze query performance and implement indexing strategies to improve response times.",
            Duration::days(5),
            false,
        ),
        note(
            "Review user feedback from beta testing and create action items for the next cycle.",
            Duration::days(7),
            false,
        ),
        note(
            "Document security protocols and create guidelines for secure coding practices.",
            Duration::days(7) + Duration::hours(7),
            true,
        ),
    ]
}

/// A handful of short todos for the demo's second popup.
pub fn sample_todos() -> Vec<Item> {
    let todo = |content: &str, ago: Duration, completed: bool| {
        let mut item = Item::new(ItemKind::Todo, content.into(), Local::now() - ago);
        item.completed = completed;
        item
    };
    vec![
        todo("Reply to the infra thread", Duration::minutes(30), false),
        todo("Book travel for the offsite", Duration::hours(5), false),
        todo("Send the invoice", Duration::days(1), true),
        todo("Water the office plants", Duration::days(2), false),
    ]
}
