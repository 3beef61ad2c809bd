use indexmap::IndexMap;

use crate::model::item::{Item, ItemId};

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("item not found: {0}")]
    NotFound(ItemId),
    #[error("duplicate item id: {0}")]
    DuplicateId(ItemId),
}

/// The two disjoint partitions an item can live in. Keyed by id;
/// iteration order is insertion order, which the ordering policy uses as
/// its tiebreak for equal recency instants.
#[derive(Debug, Default)]
pub struct ItemStore {
    active: IndexMap<ItemId, Item>,
    completed: IndexMap<ItemId, Item>,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new item into the active partition. Identifier
    /// collisions should be unreachable under correct id generation;
    /// checked anyway.
    pub fn insert(&mut self, item: Item) -> Result<(), StoreError> {
        if self.active.contains_key(&item.id) || self.completed.contains_key(&item.id) {
            return Err(StoreError::DuplicateId(item.id.clone()));
        }
        self.active.insert(item.id.clone(), item);
        Ok(())
    }

    /// Move an item from active to completed, setting the flag.
    /// An already-completed id is a caller error (absent from active).
    pub fn move_to_completed(&mut self, id: &ItemId) -> Result<(), StoreError> {
        let mut item = self
            .active
            .shift_remove(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        item.completed = true;
        self.completed.insert(item.id.clone(), item);
        Ok(())
    }

    /// Inverse of [`move_to_completed`](Self::move_to_completed), for restore.
    pub fn move_to_active(&mut self, id: &ItemId) -> Result<(), StoreError> {
        let mut item = self
            .completed
            .shift_remove(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        item.completed = false;
        self.active.insert(item.id.clone(), item);
        Ok(())
    }

    /// Remove from whichever partition holds the id.
    /// `shift_remove` keeps the insertion order of the survivors.
    pub fn remove(&mut self, id: &ItemId) -> Result<Item, StoreError> {
        self.active
            .shift_remove(id)
            .or_else(|| self.completed.shift_remove(id))
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    /// Apply an in-place update to an item in either partition.
    pub fn update(
        &mut self,
        id: &ItemId,
        patch: impl FnOnce(&mut Item),
    ) -> Result<(), StoreError> {
        let item = self
            .active
            .get_mut(id)
            .or_else(|| self.completed.get_mut(id))
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        patch(item);
        Ok(())
    }

    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.active.get(id).or_else(|| self.completed.get(id))
    }

    pub fn get_active(&self, id: &ItemId) -> Option<&Item> {
        self.active.get(id)
    }

    pub fn active(&self) -> impl Iterator<Item = &Item> {
        self.active.values()
    }

    pub fn completed(&self) -> impl Iterator<Item = &Item> {
        self.completed.values()
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn completed_len(&self) -> usize {
        self.completed.len()
    }

    pub fn len(&self) -> usize {
        self.active.len() + self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.completed.is_empty()
    }
}
