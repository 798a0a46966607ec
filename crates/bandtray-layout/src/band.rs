#![forbid(unsafe_code)]

//! Band table: derives ordered bands from the flat item collection.
//!
//! # Invariants (after [`BandTable::generate`])
//!
//! 1. Bands are ordered by ascending requested `band` value.
//! 2. Within a band, items are ordered by ascending requested `band_index`;
//!    equal values keep collection order.
//! 3. Every item is re-stamped so `band` is its band position and
//!    `band_index` is its position inside that band: a dense `0..n` run.
//! 4. No band is empty.
//!
//! # Dirty detection
//!
//! [`BandTable::is_dirty`] is O(n) and side-effect free: explicit flag, item
//! count mismatch, a stored item whose coordinates disagree with its stored
//! position, or a stored item that left the collection.
//!
//! # Failure Modes
//!
//! None. Sparse, colliding, or negative coordinates are healed by
//! normalization rather than rejected.

use bandtray_core::geometry::{Orientation, greater_than, less_than};

use bandtray_core::logging::{debug, warn};

use crate::item::ItemId;
use crate::store::ItemStore;

/// One row (horizontal tray) or column (vertical tray) of toolbars.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    items: Vec<ItemId>,
    thickness: f64,
    thickness_stale: bool,
    length: f64,
}

impl Band {
    fn new(items: Vec<ItemId>) -> Self {
        Self {
            items,
            thickness: 0.0,
            thickness_stale: true,
            length: 0.0,
        }
    }

    /// Member ids in `band_index` order.
    #[must_use]
    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Cross-axis size from the last measure pass (or a provisional
    /// estimate after regeneration).
    #[must_use]
    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    /// Thickness needs a measure pass to become authoritative again.
    #[must_use]
    pub fn is_thickness_stale(&self) -> bool {
        self.thickness_stale
    }

    /// Sum of desired primary lengths from the last measure pass.
    #[must_use]
    pub fn content_length(&self) -> f64 {
        self.length
    }

    pub(crate) fn set_measured(&mut self, thickness: f64, length: f64) {
        self.thickness = thickness;
        self.length = length;
        self.thickness_stale = false;
    }

    pub(crate) fn swap(&mut self, a: usize, b: usize) {
        self.items.swap(a, b);
    }
}

/// Ordered list of bands plus a dirty flag.
#[derive(Debug, Clone, PartialEq)]
pub struct BandTable {
    bands: Vec<Band>,
    dirty: bool,
}

impl Default for BandTable {
    fn default() -> Self {
        Self::new()
    }
}

impl BandTable {
    /// Empty table; dirty so the first use generates.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bands: Vec::new(),
            dirty: true,
        }
    }

    #[must_use]
    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    #[must_use]
    pub fn band(&self, index: usize) -> Option<&Band> {
        self.bands.get(index)
    }

    pub(crate) fn band_mut(&mut self, index: usize) -> Option<&mut Band> {
        self.bands.get_mut(index)
    }

    pub(crate) fn bands_mut(&mut self) -> &mut [Band] {
        &mut self.bands
    }

    #[must_use]
    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    /// Force regeneration on next use.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Whether the stored structure no longer matches `store`.
    #[must_use]
    pub fn is_dirty(&self, store: &ItemStore) -> bool {
        if self.dirty {
            return true;
        }
        let mut total = 0usize;
        for (band_pos, band) in self.bands.iter().enumerate() {
            for (index, &id) in band.items.iter().enumerate() {
                let Some(item) = store.get(id) else {
                    return true;
                };
                if item.band() != band_pos as i32 || item.band_index() != index as i32 {
                    return true;
                }
            }
            total += band.items.len();
        }
        total != store.len()
    }

    /// Regenerate if dirty. Returns whether regeneration happened.
    pub fn ensure(&mut self, store: &mut ItemStore, orientation: Orientation) -> bool {
        if !self.is_dirty(store) {
            return false;
        }
        self.generate(store, orientation);
        true
    }

    /// Rebuild bands from `store` and re-stamp canonical coordinates.
    ///
    /// Returns how many items had their coordinates rewritten; `0` means the
    /// collection was already canonical.
    ///
    /// Regenerated bands get a provisional thickness from the largest
    /// last-rendered cross extent among their members so hit-testing stays
    /// meaningful until the next measure pass.
    pub fn generate(&mut self, store: &mut ItemStore, orientation: Orientation) -> usize {
        // (requested band, members as (requested band_index, id))
        let mut groups: Vec<(i32, Vec<(i32, ItemId)>)> = Vec::new();
        let mut collisions = 0usize;

        for item in store.iter() {
            let requested = item.band();
            let slot = match groups.binary_search_by(|(band, _)| band.cmp(&requested)) {
                Ok(slot) => slot,
                Err(slot) => {
                    groups.insert(slot, (requested, Vec::new()));
                    slot
                }
            };
            let members = &mut groups[slot].1;
            let band_index = item.band_index();
            // Insertion sort: first member with a strictly larger index.
            let at = members
                .iter()
                .position(|&(existing, _)| band_index < existing)
                .unwrap_or(members.len());
            if members.iter().any(|&(existing, _)| existing == band_index) {
                collisions += 1;
            }
            members.insert(at, (band_index, item.id()));
        }

        let mut restamped = 0usize;
        let mut bands = Vec::with_capacity(groups.len());
        for (band_pos, (_, members)) in groups.into_iter().enumerate() {
            let mut ids = Vec::with_capacity(members.len());
            let mut thickness = 0.0f64;
            for (index, (_, id)) in members.into_iter().enumerate() {
                if let Some(item) = store.get_mut(id) {
                    if item.band != band_pos as i32 || item.band_index != index as i32 {
                        restamped += 1;
                    }
                    item.band = band_pos as i32;
                    item.band_index = index as i32;
                    thickness = thickness.max(orientation.cross(item.rendered.size()));
                }
                ids.push(id);
            }
            let mut band = Band::new(ids);
            band.thickness = thickness;
            bands.push(band);
        }

        if collisions > 0 {
            warn!(collisions, "healed duplicate band_index values");
        }
        debug!(
            bands = bands.len(),
            items = store.len(),
            restamped,
            "bands regenerated"
        );

        self.bands = bands;
        self.dirty = false;
        restamped
    }

    /// Band under a cross-axis offset.
    ///
    /// Returns `-1` before the first band and `band_count()` past the last.
    #[must_use]
    pub fn band_at(&self, cross_offset: f64) -> i32 {
        if less_than(cross_offset, 0.0) {
            return -1;
        }
        let mut edge = 0.0;
        for (band_pos, band) in self.bands.iter().enumerate() {
            edge += band.thickness;
            if greater_than(edge, cross_offset) {
                return band_pos as i32;
            }
        }
        self.bands.len() as i32
    }

    /// Cross-axis offset of a band's leading edge.
    #[must_use]
    pub fn band_offset(&self, band: usize) -> f64 {
        self.bands.iter().take(band).map(|b| b.thickness).sum()
    }

    /// `(band, band_index)` position of `id` in the stored structure.
    #[must_use]
    pub fn locate(&self, id: ItemId) -> Option<(usize, usize)> {
        self.bands.iter().enumerate().find_map(|(band_pos, band)| {
            band.items
                .iter()
                .position(|&member| member == id)
                .map(|index| (band_pos, index))
        })
    }

    /// Mark a band's thickness for recomputation by the next measure pass.
    pub fn invalidate_thickness(&mut self, band: usize) {
        if let Some(band) = self.bands.get_mut(band) {
            band.thickness_stale = true;
        }
    }

    /// Any band awaiting a measure pass.
    #[must_use]
    pub fn has_stale_thickness(&self) -> bool {
        self.bands.iter().any(|band| band.thickness_stale)
    }
}
