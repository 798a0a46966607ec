#![forbid(unsafe_code)]

//! Owned, ordered item collection with id lookup.
//!
//! Collection order is the host's insertion order. It is *not* layout order:
//! `band`/`band_index` decide where an item lands, collection order only
//! breaks ties during band generation.

use rustc_hash::FxHashMap;

use crate::item::{ItemId, ToolbarItem};

#[derive(Debug, Clone, Default)]
pub struct ItemStore {
    items: Vec<ToolbarItem>,
    index: FxHashMap<ItemId, usize>,
}

impl ItemStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: ItemId) -> bool {
        self.index.contains_key(&id)
    }

    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&ToolbarItem> {
        self.index.get(&id).map(|&slot| &self.items[slot])
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut ToolbarItem> {
        match self.index.get(&id) {
            Some(&slot) => Some(&mut self.items[slot]),
            None => None,
        }
    }

    /// Collection position of `id`.
    #[must_use]
    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Items in collection order.
    pub fn iter(&self) -> impl Iterator<Item = &ToolbarItem> {
        self.items.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[ToolbarItem] {
        &self.items
    }

    /// Insert at collection position `at` (`at <= len`).
    pub(crate) fn insert(&mut self, at: usize, item: ToolbarItem) {
        debug_assert!(at <= self.items.len());
        debug_assert!(!self.index.contains_key(&item.id()));
        self.items.insert(at, item);
        self.reindex_from(at);
    }

    pub(crate) fn remove(&mut self, id: ItemId) -> Option<ToolbarItem> {
        let slot = self.index.remove(&id)?;
        let item = self.items.remove(slot);
        self.reindex_from(slot);
        Some(item)
    }

    /// Move the item at collection position `from` to position `to`.
    pub(crate) fn move_item(&mut self, from: usize, to: usize) {
        debug_assert!(from < self.items.len() && to < self.items.len());
        if from == to {
            return;
        }
        let item = self.items.remove(from);
        self.items.insert(to, item);
        self.reindex_from(from.min(to));
    }

    fn reindex_from(&mut self, start: usize) {
        for (slot, item) in self.items.iter().enumerate().skip(start) {
            self.index.insert(item.id(), slot);
        }
    }
}
