//! End-to-end engine scenarios: create/edit/complete/delete flows across
//! both board instances, driven the way the popups drive them.

use std::sync::Arc;

use chrono::{Duration, Local};
use pretty_assertions::assert_eq;

use jotter::model::FileMeta;
use jotter::{Board, BoardError, Item, ItemKind, MemoryTrash, SelectionCursor, TrashError};

fn note_board() -> (Board, Arc<MemoryTrash>) {
    let trash = Arc::new(MemoryTrash::new());
    (Board::notes(trash.clone(), "Alex"), trash)
}

fn todo_board() -> (Board, Arc<MemoryTrash>) {
    let trash = Arc::new(MemoryTrash::new());
    (Board::todos(trash.clone(), "Alex"), trash)
}

/// Every item sits in exactly one partition after any operation sequence.
fn assert_partitions_disjoint(board: &Board) {
    let snap = board.snapshot();
    for item in &snap.active {
        assert!(!item.completed);
        assert!(!snap.completed.iter().any(|c| c.id == item.id));
    }
    for item in &snap.completed {
        assert!(item.completed);
    }
    assert_eq!(
        snap.active.len() + snap.completed.len(),
        board.active_count() + board.completed_count()
    );
}

#[test]
fn full_note_lifecycle() {
    let (mut board, _) = note_board();

    let id = board.create("Buy milk").unwrap().unwrap();
    assert_eq!(board.snapshot().active[0].title(), "Buy milk");
    assert_partitions_disjoint(&board);

    board.start_edit(&id).unwrap();
    *board.edit_buffer_mut().unwrap() = "Buy milk and eggs".to_string();
    board.save_edit().unwrap();
    assert_eq!(board.snapshot().active[0].content, "Buy milk and eggs");

    board.toggle_complete(&id).unwrap();
    assert_partitions_disjoint(&board);

    board.restore(&id).unwrap();
    let restored = &board.snapshot().active[0];
    assert_eq!(restored.content, "Buy milk and eggs");
    assert!(!restored.completed);
    assert_partitions_disjoint(&board);
}

#[test]
fn long_content_truncates_title_everywhere() {
    let (mut board, _) = note_board();
    let content = "z".repeat(60);
    let id = board.create(&content).unwrap().unwrap();
    let expected = format!("{}...", "z".repeat(50));
    assert_eq!(board.snapshot().active[0].title(), expected);

    // Same rule applies at edit-save
    board.start_edit(&id).unwrap();
    *board.edit_buffer_mut().unwrap() = "w".repeat(51);
    board.save_edit().unwrap();
    assert_eq!(
        board.snapshot().active[0].title(),
        format!("{}...", "w".repeat(50))
    );
}

#[test]
fn newest_item_heads_the_sequence() {
    let (mut board, _) = note_board();
    let now = Local::now();
    board
        .preload(vec![
            Item::new(ItemKind::Note, "older".into(), now - Duration::days(3)),
            Item::new(ItemKind::Note, "yesterday".into(), now - Duration::days(1)),
        ])
        .unwrap();
    board.create("fresh").unwrap().unwrap();

    let snap = board.snapshot();
    let contents: Vec<&str> = snap.active.iter().map(|i| i.content.as_str()).collect();
    assert_eq!(contents, vec!["fresh", "yesterday", "older"]);
}

#[tokio::test]
async fn failed_delete_is_retryable() {
    let (mut board, trash) = note_board();
    let keep = board.create("other note").unwrap().unwrap();
    let id = board.create("doomed").unwrap().unwrap();

    trash.set_failing(true);
    let err = board.delete(&id).await.unwrap_err();
    assert!(matches!(err, BoardError::Trash(TrashError::Transport(_))));
    assert_eq!(board.active_count(), 2);
    assert!(trash.records().is_empty());
    assert_partitions_disjoint(&board);

    // Retry after the service recovers
    trash.set_failing(false);
    board.delete(&id).await.unwrap();
    assert_eq!(board.active_count(), 1);
    assert_eq!(trash.records().len(), 1);
    assert_eq!(trash.records()[0].item_id, id);
    // Unrelated items were never disturbed
    assert!(board.snapshot().active.iter().any(|i| i.id == keep));
}

#[tokio::test]
async fn delete_carries_full_snapshot_to_trash() {
    let (mut board, trash) = note_board();
    board
        .add_attachments(&[FileMeta {
            name: "slides.pdf".into(),
            size: 900_000,
            kind: "application/pdf".into(),
        }])
        .unwrap();
    let id = board.create("Presentation prep").unwrap().unwrap();

    board.delete(&id).await.unwrap();

    let records = trash.records();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.item_type, ItemKind::Note);
    assert_eq!(record.title, "Presentation prep");
    assert_eq!(record.description, "Presentation prep");
    assert_eq!(record.deleted_by, "Alex");
    assert_eq!(record.metadata.attachments.len(), 1);
    assert_eq!(record.original_data.id, id);
    assert_eq!(record.original_data.attachments[0].name, "slides.pdf");
}

#[test]
fn cursor_follows_a_shrinking_todo_list() {
    let (mut board, _) = todo_board();
    let mut cursor = SelectionCursor::new();

    for text in ["one", "two", "three"] {
        board.create(text).unwrap().unwrap();
    }

    // Walk to the bottom of the list
    let len = board.active_count();
    cursor.move_down(len);
    cursor.move_down(len);
    cursor.move_down(len);
    assert_eq!(cursor.index(), Some(2));

    // Activate: toggle the selected item, then re-synchronize
    let target = board.ordered_active()[cursor.index().unwrap()].id.clone();
    board.toggle_complete(&target).unwrap();
    cursor.clamp(board.active_count());
    assert_eq!(cursor.index(), Some(1));

    // Shrink to empty: the cursor clears rather than dangle
    for item in board.snapshot().active {
        board.toggle_complete(&item.id).unwrap();
    }
    cursor.clamp(board.active_count());
    assert_eq!(cursor.index(), None);
    assert_partitions_disjoint(&board);
}

#[test]
fn todo_titles_are_never_truncated() {
    let (mut board, _) = todo_board();
    let content = "t".repeat(70);
    board.create(&content).unwrap().unwrap();
    assert_eq!(board.snapshot().active[0].title(), content);
}

#[test]
fn seeded_boards_respect_all_invariants() {
    let (mut notes, _) = note_board();
    notes.preload(jotter::seed::sample_notes()).unwrap();
    assert_partitions_disjoint(&notes);
    assert_eq!(notes.active_count() + notes.completed_count(), 8);

    // Sequences come out in strictly non-increasing recency
    let snap = notes.snapshot();
    for pair in snap.active.windows(2) {
        assert!(pair[0].last_updated >= pair[1].last_updated);
    }

    let (mut todos, _) = todo_board();
    todos.preload(jotter::seed::sample_todos()).unwrap();
    assert_partitions_disjoint(&todos);
}
