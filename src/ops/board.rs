use std::collections::HashSet;
use std::sync::Arc;

use chrono::Local;

use crate::io::trash::{TrashError, TrashRecord, TrashStore};
use crate::model::attachment::{Attachment, AttachmentId, FileMeta};
use crate::model::item::{Item, ItemId, ItemKind};
use crate::model::store::{ItemStore, StoreError};
use crate::ops::order;

/// Error type for board operations
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("trash submission failed: {0}")]
    Trash(#[from] TrashError),
    #[error("delete already pending for item {0}")]
    DeletePending(ItemId),
    #[error("attachments are not supported on a todo board")]
    AttachmentsUnsupported,
}

/// An in-progress edit of one item's content
#[derive(Debug, Clone)]
struct EditSession {
    id: ItemId,
    buffer: String,
}

/// Read-only snapshot for the rendering layer, recomputed after every
/// mutating operation. Sequences are in descending recency order.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub active: Vec<Item>,
    pub completed: Vec<Item>,
    /// Selection index into `active`, when the consumer tracks one
    pub selection: Option<usize>,
}

impl Snapshot {
    pub fn with_selection(mut self, selection: Option<usize>) -> Self {
        self.selection = selection;
        self
    }
}

/// Lifecycle controller for one popup's items.
///
/// Two instances exist: [`Board::notes`] (rich content + attachments)
/// and [`Board::todos`] (short text). All mutations flow through here;
/// the store is never exposed mutably. Deletion is the only operation
/// with an external side effect — the item leaves the store only after
/// the trash collaborator acknowledges the submission.
pub struct Board {
    kind: ItemKind,
    actor: String,
    store: ItemStore,
    trash: Arc<dyn TrashStore>,
    edit: Option<EditSession>,
    pending_attachments: Vec<Attachment>,
    pending_deletes: HashSet<ItemId>,
}

impl Board {
    pub fn notes(trash: Arc<dyn TrashStore>, actor: impl Into<String>) -> Self {
        Self::new(ItemKind::Note, trash, actor)
    }

    pub fn todos(trash: Arc<dyn TrashStore>, actor: impl Into<String>) -> Self {
        Self::new(ItemKind::Todo, trash, actor)
    }

    fn new(kind: ItemKind, trash: Arc<dyn TrashStore>, actor: impl Into<String>) -> Self {
        Board {
            kind,
            actor: actor.into(),
            store: ItemStore::new(),
            trash,
            edit: None,
            pending_attachments: Vec::new(),
            pending_deletes: HashSet::new(),
        }
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    // -----------------------------------------------------------------
    // Create
    // -----------------------------------------------------------------

    /// Create a new active item from the input text. Empty or
    /// whitespace-only input is a guarded no-op (`Ok(None)`), not an
    /// error. On a note board, the pending attachment buffer is drained
    /// into the new item.
    pub fn create(&mut self, text: &str) -> Result<Option<ItemId>, BoardError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        let mut item = Item::new(self.kind, trimmed.to_string(), Local::now());
        if self.kind.supports_attachments() {
            item.attachments = std::mem::take(&mut self.pending_attachments);
        }
        let id = item.id.clone();
        self.store.insert(item)?;
        log::debug!("created {} {}", self.kind.as_str(), id);
        Ok(Some(id))
    }

    // -----------------------------------------------------------------
    // Edit session
    // -----------------------------------------------------------------

    /// Enter edit mode for an item, seeding the buffer with its current
    /// content. Replaces any prior session.
    pub fn start_edit(&mut self, id: &ItemId) -> Result<(), BoardError> {
        let item = self
            .store
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        self.edit = Some(EditSession {
            id: id.clone(),
            buffer: item.content.clone(),
        });
        Ok(())
    }

    /// Id of the item being edited, if an edit session is open.
    pub fn edit_target(&self) -> Option<&ItemId> {
        self.edit.as_ref().map(|e| &e.id)
    }

    pub fn edit_buffer(&self) -> Option<&str> {
        self.edit.as_ref().map(|e| e.buffer.as_str())
    }

    pub fn edit_buffer_mut(&mut self) -> Option<&mut String> {
        self.edit.as_mut().map(|e| &mut e.buffer)
    }

    /// Commit the edit buffer: updates content and refreshes the
    /// recency signal. An empty buffer discards the edit and exits edit
    /// mode without mutation (`Ok(None)`).
    pub fn save_edit(&mut self) -> Result<Option<ItemId>, BoardError> {
        let Some(session) = self.edit.take() else {
            return Ok(None);
        };
        let trimmed = session.buffer.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        let content = trimmed.to_string();
        let now = Local::now();
        self.store.update(&session.id, |item| {
            item.content = content;
            item.last_updated = now;
        })?;
        Ok(Some(session.id))
    }

    /// Discard the edit buffer and exit edit mode.
    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    // -----------------------------------------------------------------
    // Partition moves
    // -----------------------------------------------------------------

    /// Move an active item to the completed partition. Does not touch
    /// the recency signal. Completed items go back via [`restore`](Self::restore).
    pub fn toggle_complete(&mut self, id: &ItemId) -> Result<(), BoardError> {
        self.store.move_to_completed(id)?;
        log::debug!("completed {} {}", self.kind.as_str(), id);
        Ok(())
    }

    /// Move a completed item back to active, clearing the flag.
    pub fn restore(&mut self, id: &ItemId) -> Result<(), BoardError> {
        self.store.move_to_active(id)?;
        log::debug!("restored {} {}", self.kind.as_str(), id);
        Ok(())
    }

    // -----------------------------------------------------------------
    // Attachments (note boards only)
    // -----------------------------------------------------------------

    /// Append picked files to the pending attachment buffer. The buffer
    /// is attached to the next created item, not to any existing one.
    pub fn add_attachments(&mut self, files: &[FileMeta]) -> Result<(), BoardError> {
        if !self.kind.supports_attachments() {
            return Err(BoardError::AttachmentsUnsupported);
        }
        let now = Local::now();
        self.pending_attachments
            .extend(files.iter().map(|meta| Attachment::from_meta(meta, now)));
        Ok(())
    }

    /// Remove a pending attachment. No-op if the id is absent.
    pub fn remove_attachment(&mut self, id: &AttachmentId) {
        self.pending_attachments.retain(|att| &att.id != id);
    }

    pub fn pending_attachments(&self) -> &[Attachment] {
        &self.pending_attachments
    }

    // -----------------------------------------------------------------
    // Deletion: pending → committed
    // -----------------------------------------------------------------
    //
    // Deletion is two-phase so the item stays visible until the trash
    // collaborator acknowledges the submission. `delete` composes the
    // phases; embedders that keep several deletes in flight drive the
    // phases themselves.

    /// Mark an active item pending deletion and build its trash record.
    /// Fails with [`BoardError::DeletePending`] if a delete for this id
    /// is already in flight.
    pub fn begin_delete(&mut self, id: &ItemId) -> Result<TrashRecord, BoardError> {
        let item = self
            .store
            .get_active(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        if self.pending_deletes.contains(id) {
            return Err(BoardError::DeletePending(id.clone()));
        }
        let record = TrashRecord::new(
            item,
            order::recency_label(item.last_updated, Local::now()),
            &self.actor,
        );
        self.pending_deletes.insert(id.clone());
        Ok(record)
    }

    /// The trash store acknowledged: remove the item locally.
    pub fn commit_delete(&mut self, id: &ItemId) -> Result<Item, BoardError> {
        self.pending_deletes.remove(id);
        let item = self.store.remove(id)?;
        log::debug!("deleted {} {}", self.kind.as_str(), id);
        Ok(item)
    }

    /// The submission failed: clear the pending mark, leave the item in
    /// place so the user may retry.
    pub fn abort_delete(&mut self, id: &ItemId) {
        self.pending_deletes.remove(id);
    }

    /// Whether a delete is in flight for this id — the UI disables the
    /// delete control while this holds.
    pub fn delete_pending(&self, id: &ItemId) -> bool {
        self.pending_deletes.contains(id)
    }

    /// Submit the item to the trash collaborator and, only on a
    /// successful acknowledgment, remove it from the store. On failure
    /// the item is untouched and the error is surfaced to the caller.
    pub async fn delete(&mut self, id: &ItemId) -> Result<Item, BoardError> {
        let record = self.begin_delete(id)?;
        let trash = Arc::clone(&self.trash);
        match trash.submit(record).await {
            Ok(()) => self.commit_delete(id),
            Err(e) => {
                self.abort_delete(id);
                log::warn!("delete of {id} failed: {e}");
                Err(e.into())
            }
        }
    }

    // -----------------------------------------------------------------
    // Read side
    // -----------------------------------------------------------------

    /// Active items in descending recency order.
    pub fn ordered_active(&self) -> Vec<&Item> {
        order::by_recency(self.store.active())
    }

    /// Completed items in descending recency order.
    pub fn ordered_completed(&self) -> Vec<&Item> {
        order::by_recency(self.store.completed())
    }

    /// Cloned snapshot for the rendering layer.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            active: self.ordered_active().into_iter().cloned().collect(),
            completed: self.ordered_completed().into_iter().cloned().collect(),
            selection: None,
        }
    }

    pub fn active_count(&self) -> usize {
        self.store.active_len()
    }

    pub fn completed_count(&self) -> usize {
        self.store.completed_len()
    }

    /// Seed the board with prebuilt items (demo mode, test fixtures).
    /// Items flagged completed land in the completed partition.
    pub fn preload(&mut self, items: Vec<Item>) -> Result<(), BoardError> {
        for item in items {
            let completed = item.completed;
            let id = item.id.clone();
            let item = Item {
                completed: false,
                ..item
            };
            self.store.insert(item)?;
            if completed {
                self.store.move_to_completed(&id)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::trash::MemoryTrash;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn note_board() -> (Board, Arc<MemoryTrash>) {
        let trash = Arc::new(MemoryTrash::new());
        (Board::notes(trash.clone(), "Alex"), trash)
    }

    fn todo_board() -> (Board, Arc<MemoryTrash>) {
        let trash = Arc::new(MemoryTrash::new());
        (Board::todos(trash.clone(), "Alex"), trash)
    }

    fn meta(name: &str) -> FileMeta {
        FileMeta {
            name: name.into(),
            size: 1024,
            kind: "application/pdf".into(),
        }
    }

    #[test]
    fn test_create_inserts_active_item() {
        let (mut board, _) = note_board();
        let id = board.create("Buy milk").unwrap().unwrap();
        assert_eq!(board.active_count(), 1);
        let snap = board.snapshot();
        assert_eq!(snap.active[0].id, id);
        assert_eq!(snap.active[0].title(), "Buy milk");
        assert!(!snap.active[0].completed);
    }

    #[test]
    fn test_create_empty_input_is_noop() {
        let (mut board, _) = note_board();
        assert_eq!(board.create("").unwrap(), None);
        assert_eq!(board.create("   \n\t ").unwrap(), None);
        assert_eq!(board.active_count(), 0);
        assert_eq!(board.completed_count(), 0);
    }

    #[test]
    fn test_create_trims_input() {
        let (mut board, _) = todo_board();
        board.create("  call dentist  ").unwrap().unwrap();
        assert_eq!(board.snapshot().active[0].content, "call dentist");
    }

    #[test]
    fn test_create_drains_pending_attachments() {
        let (mut board, _) = note_board();
        board.add_attachments(&[meta("a.pdf"), meta("b.pdf")]).unwrap();
        assert_eq!(board.pending_attachments().len(), 2);
        board.create("with files").unwrap().unwrap();
        assert!(board.pending_attachments().is_empty());
        let snap = board.snapshot();
        assert_eq!(snap.active[0].attachments.len(), 2);
        assert_eq!(snap.active[0].attachments[0].name, "a.pdf");
    }

    #[test]
    fn test_empty_create_keeps_pending_attachments() {
        let (mut board, _) = note_board();
        board.add_attachments(&[meta("a.pdf")]).unwrap();
        assert_eq!(board.create("   ").unwrap(), None);
        assert_eq!(board.pending_attachments().len(), 1);
    }

    #[test]
    fn test_attachments_rejected_on_todo_board() {
        let (mut board, _) = todo_board();
        let err = board.add_attachments(&[meta("a.pdf")]).unwrap_err();
        assert!(matches!(err, BoardError::AttachmentsUnsupported));
    }

    #[test]
    fn test_remove_attachment_is_idempotent() {
        let (mut board, _) = note_board();
        board.add_attachments(&[meta("a.pdf")]).unwrap();
        let id = board.pending_attachments()[0].id.clone();
        board.remove_attachment(&id);
        assert!(board.pending_attachments().is_empty());
        // Absent id: no-op
        board.remove_attachment(&id);
        assert!(board.pending_attachments().is_empty());
    }

    #[test]
    fn test_attachment_removal_preserves_order() {
        let (mut board, _) = note_board();
        board
            .add_attachments(&[meta("a.pdf"), meta("b.pdf"), meta("c.pdf")])
            .unwrap();
        let middle = board.pending_attachments()[1].id.clone();
        board.remove_attachment(&middle);
        let names: Vec<&str> = board
            .pending_attachments()
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, vec!["a.pdf", "c.pdf"]);
    }

    #[test]
    fn test_edit_save_updates_content_and_recency() {
        let (mut board, _) = note_board();
        let id = board.create("original text").unwrap().unwrap();
        let before = board.snapshot().active[0].last_updated;

        board.start_edit(&id).unwrap();
        assert_eq!(board.edit_buffer(), Some("original text"));
        *board.edit_buffer_mut().unwrap() = "revised text".to_string();
        let saved = board.save_edit().unwrap();
        assert_eq!(saved, Some(id.clone()));

        let snap = board.snapshot();
        assert_eq!(snap.active[0].content, "revised text");
        assert_eq!(snap.active[0].title(), "revised text");
        assert!(snap.active[0].last_updated >= before);
        assert_eq!(board.edit_target(), None);
    }

    #[test]
    fn test_edit_empty_buffer_discards_without_mutation() {
        let (mut board, _) = note_board();
        let id = board.create("keep me").unwrap().unwrap();
        board.start_edit(&id).unwrap();
        board.edit_buffer_mut().unwrap().clear();
        assert_eq!(board.save_edit().unwrap(), None);
        assert_eq!(board.snapshot().active[0].content, "keep me");
        assert_eq!(board.edit_target(), None);
    }

    #[test]
    fn test_cancel_edit_discards_buffer() {
        let (mut board, _) = note_board();
        let id = board.create("keep me").unwrap().unwrap();
        board.start_edit(&id).unwrap();
        *board.edit_buffer_mut().unwrap() = "scrapped".to_string();
        board.cancel_edit();
        assert_eq!(board.edit_target(), None);
        assert_eq!(board.snapshot().active[0].content, "keep me");
    }

    #[test]
    fn test_start_edit_unknown_id_fails() {
        let (mut board, _) = note_board();
        let missing = ItemId::from("missing");
        assert!(matches!(
            board.start_edit(&missing),
            Err(BoardError::Store(StoreError::NotFound(_)))
        ));
    }

    #[test]
    fn test_toggle_then_restore_round_trip() {
        let (mut board, _) = note_board();
        let id = board.create("task").unwrap().unwrap();
        let original = board.snapshot().active[0].clone();

        board.toggle_complete(&id).unwrap();
        assert_eq!(board.active_count(), 0);
        assert!(board.snapshot().completed[0].completed);

        board.restore(&id).unwrap();
        assert_eq!(board.completed_count(), 0);
        // All fields identical except that completed round-tripped
        assert_eq!(board.snapshot().active[0], original);
    }

    #[test]
    fn test_toggle_does_not_touch_recency() {
        let (mut board, _) = todo_board();
        let id = board.create("task").unwrap().unwrap();
        let before = board.snapshot().active[0].last_updated;
        board.toggle_complete(&id).unwrap();
        assert_eq!(board.snapshot().completed[0].last_updated, before);
    }

    #[test]
    fn test_toggle_already_completed_is_error() {
        let (mut board, _) = todo_board();
        let id = board.create("task").unwrap().unwrap();
        board.toggle_complete(&id).unwrap();
        assert!(matches!(
            board.toggle_complete(&id),
            Err(BoardError::Store(StoreError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_delete_submits_then_removes() {
        let (mut board, trash) = note_board();
        board.add_attachments(&[meta("a.pdf")]).unwrap();
        let id = board.create("to trash").unwrap().unwrap();

        let deleted = board.delete(&id).await.unwrap();
        assert_eq!(deleted.id, id);
        assert_eq!(board.active_count(), 0);

        let records = trash.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].item_id, id);
        assert_eq!(records[0].deleted_by, "Alex");
        assert_eq!(records[0].metadata.attachments.len(), 1);
        assert!(!records[0].metadata.completed);
    }

    #[tokio::test]
    async fn test_delete_failure_keeps_item() {
        let (mut board, trash) = note_board();
        let id = board.create("survivor").unwrap().unwrap();
        trash.set_failing(true);

        let err = board.delete(&id).await.unwrap_err();
        assert!(matches!(err, BoardError::Trash(TrashError::Transport(_))));
        // Item still present, pending flag cleared: retry is possible
        assert_eq!(board.active_count(), 1);
        assert!(!board.delete_pending(&id));

        trash.set_failing(false);
        board.delete(&id).await.unwrap();
        assert_eq!(board.active_count(), 0);
    }

    #[test]
    fn test_second_begin_delete_is_rejected() {
        let (mut board, _) = note_board();
        let id = board.create("pending").unwrap().unwrap();
        let _record = board.begin_delete(&id).unwrap();
        assert!(board.delete_pending(&id));
        assert!(matches!(
            board.begin_delete(&id),
            Err(BoardError::DeletePending(_))
        ));
        // The item itself is untouched
        assert_eq!(board.active_count(), 1);
    }

    #[test]
    fn test_delete_requires_active_membership() {
        let (mut board, _) = note_board();
        let id = board.create("done").unwrap().unwrap();
        board.toggle_complete(&id).unwrap();
        assert!(matches!(
            board.begin_delete(&id),
            Err(BoardError::Store(StoreError::NotFound(_)))
        ));
    }

    #[test]
    fn test_snapshot_orders_by_recency() {
        let (mut board, _) = note_board();
        let now = Local::now();
        let mk = |content: &str, ago: Duration| {
            Item::new(ItemKind::Note, content.into(), now - ago)
        };
        board
            .preload(vec![
                mk("yesterday", Duration::days(1)),
                mk("just now", Duration::zero()),
                mk("today", Duration::hours(3)),
            ])
            .unwrap();
        let snap = board.snapshot();
        let contents: Vec<&str> = snap.active.iter().map(|i| i.content.as_str()).collect();
        assert_eq!(contents, vec!["just now", "today", "yesterday"]);
    }

    #[test]
    fn test_preload_routes_completed_items() {
        let (mut board, _) = note_board();
        let at = Local.with_ymd_and_hms(2026, 8, 6, 10, 0, 0).unwrap();
        let mut done = Item::new(ItemKind::Note, "done".into(), at);
        done.completed = true;
        let open = Item::new(ItemKind::Note, "open".into(), at);
        board.preload(vec![done, open]).unwrap();
        assert_eq!(board.active_count(), 1);
        assert_eq!(board.completed_count(), 1);
        assert!(board.snapshot().completed[0].completed);
    }
}
