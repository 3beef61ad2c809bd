pub mod io;
pub mod model;
pub mod ops;
pub mod seed;
pub mod tui;

pub use io::trash::{HttpTrash, MemoryTrash, TrashError, TrashRecord, TrashStore};
pub use model::{Attachment, AttachmentId, Config, FileMeta, Item, ItemId, ItemKind, ItemStore};
pub use ops::{Board, BoardError, SelectionCursor, Snapshot};
