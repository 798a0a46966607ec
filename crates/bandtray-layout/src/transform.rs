#![forbid(unsafe_code)]

//! Tray-to-item coordinate transforms.
//!
//! Drag reflow needs to know where the pointer sits relative to a toolbar
//! (the dragged one, and its neighbor when testing for a swap). Hosts with a
//! retained visual tree can answer that themselves through [`ItemTransform`];
//! otherwise [`BandGeometry`] derives it from the live model.

use bandtray_core::geometry::{AffineTransform, Orientation, Point};
use rustc_hash::FxHashMap;

use crate::band::BandTable;
use crate::item::ItemId;
use crate::store::ItemStore;

/// Maps tray coordinates into an item's local coordinates.
pub trait ItemTransform {
    /// Transform from tray space into `id`'s local space, if known.
    fn tray_to_item(&self, id: ItemId) -> Option<AffineTransform>;

    /// `point` (tray space) expressed in `id`'s local space.
    fn to_item(&self, id: ItemId, point: Point) -> Option<Point> {
        self.tray_to_item(id).map(|t| t.apply(point))
    }
}

impl<F> ItemTransform for F
where
    F: Fn(ItemId) -> Option<AffineTransform>,
{
    fn tray_to_item(&self, id: ItemId) -> Option<AffineTransform> {
        self(id)
    }
}

/// Item origins computed from the current band table and item lengths.
///
/// Origins use each item's effective length (explicit override, else last
/// rendered length) so they reflect drag mutations that no layout pass has
/// seen yet.
#[derive(Debug, Clone, Default)]
pub struct BandGeometry {
    origins: FxHashMap<ItemId, Point>,
}

impl BandGeometry {
    /// Snapshot origins for every item placed in `table`.
    #[must_use]
    pub fn capture(table: &BandTable, store: &ItemStore, orientation: Orientation) -> Self {
        let mut origins = FxHashMap::default();
        let mut cross = 0.0;
        for band in table.bands() {
            let mut primary = 0.0;
            for &id in band.items() {
                let Some(item) = store.get(id) else {
                    continue;
                };
                origins.insert(id, orientation.point(primary, cross));
                primary += item.effective_length(orientation);
            }
            cross += band.thickness();
        }
        Self { origins }
    }

    /// Tray-space origin of `id`.
    #[must_use]
    pub fn origin(&self, id: ItemId) -> Option<Point> {
        self.origins.get(&id).copied()
    }
}

impl ItemTransform for BandGeometry {
    fn tray_to_item(&self, id: ItemId) -> Option<AffineTransform> {
        self.origin(id)
            .map(|origin| AffineTransform::translation(-origin.x, -origin.y))
    }
}
