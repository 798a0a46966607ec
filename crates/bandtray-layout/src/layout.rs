#![forbid(unsafe_code)]

//! Two-pass band layout: measure, then arrange.
//!
//! # Measure
//!
//! Each band starts with the tray's full primary length as budget. A dry run
//! subtracts every member's `min_length` (clamping at zero). Members are then
//! measured in `band_index` order: the member's own minimum is added back,
//! the member is measured against the running budget, and its desired length
//! is subtracted again. Nobody is denied their declared minimum, yet earlier
//! members get first claim on anything beyond the collective minimum.
//!
//! Band thickness is the largest member cross extent; band content length is
//! the sum of member primary extents. The tray wants the sum of thicknesses
//! across and the longest band along.
//!
//! # Arrange
//!
//! Bands stack along the cross axis using their measured thickness; members
//! stack along the primary axis using their desired length and take the full
//! band thickness. The tray always consumes exactly the size it is given.

use bandtray_core::geometry::{Orientation, Rect, Size, less_than};

use bandtray_core::logging::{debug, debug_span};

use crate::band::BandTable;
use crate::item::ToolbarItem;
use crate::store::ItemStore;

/// Measurement callback supplied by the layout host.
///
/// Returns the item's natural content size under `available`. The layout
/// pass applies the explicit length override and the item's length range on
/// top of it.
pub trait ItemMeasure {
    fn measure(&mut self, item: &ToolbarItem, available: Size) -> Size;
}

impl<F> ItemMeasure for F
where
    F: FnMut(&ToolbarItem, Size) -> Size,
{
    fn measure(&mut self, item: &ToolbarItem, available: Size) -> Size {
        self(item, available)
    }
}

/// Reports each item's declared [`content`](ToolbarItem::content) size.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntrinsicMeasure;

impl ItemMeasure for IntrinsicMeasure {
    fn measure(&mut self, item: &ToolbarItem, _available: Size) -> Size {
        item.content()
    }
}

/// Primary length an item asks for given its natural length and budget.
fn desired_length(item: &ToolbarItem, natural: f64, budget: f64) -> f64 {
    let wanted = item.explicit_length().unwrap_or(natural);
    item.clamp_length(wanted).min(budget)
}

/// Measure every band against `available`. The table must be current.
pub fn measure(
    table: &mut BandTable,
    store: &mut ItemStore,
    orientation: Orientation,
    available: Size,
    measurer: &mut dyn ItemMeasure,
) -> Size {
    let _span = debug_span!(
        "bandtray.measure",
        width = available.width,
        height = available.height
    )
    .entered();

    let total_length = orientation.primary(available);
    let mut tray_length = 0.0f64;
    let mut tray_thickness = 0.0f64;

    for band in table.bands_mut() {
        let mut remaining = total_length;
        for &id in band.items() {
            if let Some(item) = store.get(id) {
                remaining -= item.min_length();
                if less_than(remaining, 0.0) {
                    remaining = 0.0;
                    break;
                }
            }
        }

        let mut thickness = 0.0f64;
        let mut length = 0.0f64;
        for &id in band.items() {
            let Some(item) = store.get_mut(id) else {
                continue;
            };
            remaining += item.min_length();
            let constraint = orientation.size(remaining, f64::INFINITY);
            let natural = measurer.measure(item, constraint);
            let primary = desired_length(item, orientation.primary(natural), remaining);
            let cross = orientation.cross(natural).max(0.0);
            item.desired = orientation.size(primary, cross);

            thickness = thickness.max(cross);
            length += primary;
            remaining -= primary;
            if less_than(remaining, 0.0) {
                remaining = 0.0;
            }
        }

        band.set_measured(thickness, length);
        tray_thickness += thickness;
        tray_length = tray_length.max(length);
    }

    let desired = orientation.size(tray_length, tray_thickness);
    debug!(
        width = desired.width,
        height = desired.height,
        "tray measured"
    );
    desired
}

/// Position every item from the measured desired sizes.
///
/// Returns `final_size` unchanged; overflow is the host's to clip.
pub fn arrange(
    table: &BandTable,
    store: &mut ItemStore,
    orientation: Orientation,
    final_size: Size,
) -> Size {
    let mut cross_offset = 0.0;
    for band in table.bands() {
        let thickness = band.thickness();
        let mut primary_offset = 0.0;
        for &id in band.items() {
            let Some(item) = store.get_mut(id) else {
                continue;
            };
            let length = orientation.primary(item.desired);
            let origin = orientation.point(primary_offset, cross_offset);
            item.rendered = Rect::from_origin_size(origin, orientation.size(length, thickness));
            primary_offset += length;
        }
        cross_offset += thickness;
    }
    final_size
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ItemId, ItemSpec};

    fn build(specs: &[ItemSpec], orientation: Orientation) -> (BandTable, ItemStore) {
        let mut store = ItemStore::new();
        for (n, spec) in specs.iter().enumerate() {
            let id = ItemId::new(n as u64 + 1).expect("non-zero");
            let item = ToolbarItem::from_spec(id, *spec).expect("valid spec");
            store.insert(store.len(), item);
        }
        let mut table = BandTable::new();
        table.generate(&mut store, orientation);
        (table, store)
    }

    fn item(store: &ItemStore, raw: u64) -> &ToolbarItem {
        store.get(ItemId::new(raw).unwrap()).expect("present")
    }

    #[test]
    fn single_band_sums_lengths() {
        let specs = [
            ItemSpec::new(10.0, 100.0).content(Size::new(40.0, 20.0)),
            ItemSpec::new(10.0, 100.0).content(Size::new(30.0, 25.0)).at(0, 1),
        ];
        let (mut table, mut store) = build(&specs, Orientation::Horizontal);
        let desired = measure(
            &mut table,
            &mut store,
            Orientation::Horizontal,
            Size::new(200.0, 100.0),
            &mut IntrinsicMeasure,
        );
        assert_eq!(desired, Size::new(70.0, 25.0));
        assert_eq!(table.bands()[0].thickness(), 25.0);
        assert_eq!(table.bands()[0].content_length(), 70.0);
        assert!(!table.has_stale_thickness());
    }

    #[test]
    fn bands_stack_along_cross_axis() {
        let specs = [
            ItemSpec::new(0.0, 100.0).content(Size::new(50.0, 20.0)),
            ItemSpec::new(0.0, 100.0).content(Size::new(80.0, 30.0)).at(1, 0),
        ];
        let (mut table, mut store) = build(&specs, Orientation::Horizontal);
        let desired = measure(
            &mut table,
            &mut store,
            Orientation::Horizontal,
            Size::new(500.0, 500.0),
            &mut IntrinsicMeasure,
        );
        assert_eq!(desired, Size::new(80.0, 50.0));

        let out = arrange(&table, &mut store, Orientation::Horizontal, Size::new(500.0, 500.0));
        assert_eq!(out, Size::new(500.0, 500.0));
        assert_eq!(item(&store, 1).rendered_rect(), Rect::new(0.0, 0.0, 50.0, 20.0));
        assert_eq!(item(&store, 2).rendered_rect(), Rect::new(0.0, 20.0, 80.0, 30.0));
    }

    #[test]
    fn vertical_tray_swaps_axes() {
        let specs = [
            ItemSpec::new(0.0, 100.0).content(Size::new(20.0, 60.0)),
            ItemSpec::new(0.0, 100.0).content(Size::new(24.0, 40.0)).at(0, 1),
        ];
        let (mut table, mut store) = build(&specs, Orientation::Vertical);
        let desired = measure(
            &mut table,
            &mut store,
            Orientation::Vertical,
            Size::new(300.0, 300.0),
            &mut IntrinsicMeasure,
        );
        assert_eq!(desired, Size::new(24.0, 100.0));
        arrange(&table, &mut store, Orientation::Vertical, desired);
        assert_eq!(item(&store, 2).rendered_rect(), Rect::new(0.0, 60.0, 24.0, 40.0));
    }

    #[test]
    fn greedy_item_cannot_starve_later_minimums() {
        // Budget 100: the first item wants 90 but the second needs 40.
        let specs = [
            ItemSpec::new(20.0, 200.0).content(Size::new(90.0, 10.0)),
            ItemSpec::new(40.0, 200.0).content(Size::new(40.0, 10.0)).at(0, 1),
        ];
        let (mut table, mut store) = build(&specs, Orientation::Horizontal);
        measure(
            &mut table,
            &mut store,
            Orientation::Horizontal,
            Size::new(100.0, 50.0),
            &mut IntrinsicMeasure,
        );
        assert_eq!(item(&store, 1).desired_size().width, 60.0);
        assert_eq!(item(&store, 2).desired_size().width, 40.0);
    }

    #[test]
    fn measure_passes_budget_as_constraint() {
        let specs = [
            ItemSpec::new(10.0, 200.0).content(Size::new(30.0, 10.0)),
            ItemSpec::new(15.0, 200.0).content(Size::new(30.0, 10.0)).at(0, 1),
        ];
        let (mut table, mut store) = build(&specs, Orientation::Horizontal);
        let mut seen = Vec::new();
        let mut recorder = |item: &ToolbarItem, available: Size| {
            seen.push((item.id().get(), available.width));
            item.content()
        };
        measure(
            &mut table,
            &mut store,
            Orientation::Horizontal,
            Size::new(100.0, 50.0),
            &mut recorder,
        );
        // 100 - (10 + 15) = 75; first gets 75 + 10, second 85 - 30 = 55 + 15.
        assert_eq!(seen, vec![(1, 85.0), (2, 70.0)]);
    }

    #[test]
    fn explicit_length_is_clamped() {
        let specs = [
            ItemSpec::new(20.0, 100.0)
                .explicit_length(150.0)
                .content(Size::new(10.0, 10.0)),
            ItemSpec::new(20.0, 100.0)
                .explicit_length(5.0)
                .content(Size::new(10.0, 10.0))
                .at(0, 1),
        ];
        let (mut table, mut store) = build(&specs, Orientation::Horizontal);
        measure(
            &mut table,
            &mut store,
            Orientation::Horizontal,
            Size::new(1000.0, 50.0),
            &mut IntrinsicMeasure,
        );
        assert_eq!(item(&store, 1).desired_size().width, 100.0);
        assert_eq!(item(&store, 2).desired_size().width, 20.0);
    }

    #[test]
    fn over_budget_items_clip() {
        let specs = [
            ItemSpec::new(30.0, 100.0).content(Size::new(60.0, 10.0)),
            ItemSpec::new(30.0, 100.0).content(Size::new(60.0, 10.0)).at(0, 1),
        ];
        let (mut table, mut store) = build(&specs, Orientation::Horizontal);
        let desired = measure(
            &mut table,
            &mut store,
            Orientation::Horizontal,
            Size::new(50.0, 50.0),
            &mut IntrinsicMeasure,
        );
        // Dry run clamps to 0; each item then only gets its own minimum back.
        assert_eq!(item(&store, 1).desired_size().width, 30.0);
        assert_eq!(item(&store, 2).desired_size().width, 30.0);
        assert_eq!(desired.width, 60.0);
    }

    #[test]
    fn empty_table_measures_zero() {
        let (mut table, mut store) = build(&[], Orientation::Horizontal);
        let desired = measure(
            &mut table,
            &mut store,
            Orientation::Horizontal,
            Size::new(100.0, 100.0),
            &mut IntrinsicMeasure,
        );
        assert_eq!(desired, Size::ZERO);
    }
}
