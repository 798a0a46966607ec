//! End-to-end drag reflow scenarios through the public `Tray` API.
//!
//! Every toolbar here is 20 units thick, so in a horizontal tray band `n`
//! spans `y` in `[20 n, 20 n + 20)`.

use bandtray_core::{Orientation, Point, Rect, Size};
use bandtray_layout::{
    ItemId, ItemSpec, ReflowEffect, ReflowNoopReason, ToolbarItem, Tray, TrayConfig,
};

const AREA: Size = Size {
    width: 600.0,
    height: 200.0,
};

fn bar(min: f64, max: f64, length: f64) -> ItemSpec {
    ItemSpec::new(min, max)
        .explicit_length(length)
        .content(Size::new(length, 20.0))
}

fn explicit(tray: &Tray, id: ItemId) -> Option<f64> {
    tray.item(id).and_then(ToolbarItem::explicit_length)
}

fn coords(tray: &Tray, id: ItemId) -> (i32, i32) {
    let item = tray.item(id).expect("item present");
    (item.band(), item.band_index())
}

fn assert_dense(tray: &Tray) {
    for (band_pos, band) in tray.bands().iter().enumerate() {
        assert!(!band.is_empty(), "band {band_pos} is empty");
        for (index, &id) in band.items().iter().enumerate() {
            assert_eq!(coords(tray, id), (band_pos as i32, index as i32));
        }
    }
}

#[test]
fn shrink_past_neighbor_minimum_is_clamped() {
    let mut tray = Tray::default();
    let p = tray.add_item(bar(30.0, 200.0, 50.0)).expect("add");
    let d = tray.add_item(bar(20.0, 100.0, 50.0).at(0, 1)).expect("add");
    tray.update_layout(AREA);
    let before = tray.item_rect(p).expect("p").width + tray.item_rect(d).expect("d").width;

    tray.begin_drag(d);
    // Grip at x = 50; the pointer holds it 2 units in and asks for -40.
    let effect = tray.drag_delta(d, -40.0, Point::new(12.0, 10.0)).effect;
    assert_eq!(
        effect,
        ReflowEffect::Resized {
            item: d,
            requested: -40.0,
            applied: -20.0
        }
    );
    tray.end_drag(d, false);
    tray.update_layout(AREA);

    assert_eq!(explicit(&tray, p), Some(30.0));
    assert_eq!(explicit(&tray, d), Some(50.0));
    let p_rect = tray.item_rect(p).expect("p");
    let d_rect = tray.item_rect(d).expect("d");
    assert!(p_rect.width >= 30.0);
    assert!((20.0..=100.0).contains(&d_rect.width));
    assert_eq!(p_rect.width + d_rect.width, before - 20.0);
    assert_eq!(d_rect.x, 30.0);
}

#[test]
fn crossing_neighbor_swaps_and_resets_lengths() {
    let mut tray = Tray::default();
    let a = tray.add_item(bar(10.0, 200.0, 40.0)).expect("add");
    let b = tray.add_item(bar(10.0, 200.0, 60.0).at(0, 1)).expect("add");
    tray.update_layout(AREA);

    tray.begin_drag(a);
    // Grabbed at x = 30 and dragged right by 50: the pointer is 40 units
    // past B's leading edge.
    let effect = tray.drag_delta(a, 50.0, Point::new(80.0, 10.0)).effect;
    assert_eq!(
        effect,
        ReflowEffect::Swapped {
            item: a,
            with: b,
            band_index: 1
        }
    );
    assert_eq!(coords(&tray, a), (0, 1));
    assert_eq!(coords(&tray, b), (0, 0));
    assert_eq!(explicit(&tray, b), None);

    tray.end_drag(a, false);
    tray.update_layout(AREA);
    assert_eq!(tray.item_rect(b).map(|r| r.x), Some(0.0));
    assert_eq!(tray.item_rect(a).map(|r| r.x), Some(60.0));
}

#[test]
fn drop_into_existing_band_inserts_at_pointer() {
    let mut tray = Tray::default();
    let x = tray.add_item(bar(10.0, 200.0, 40.0)).expect("add");
    let y = tray.add_item(bar(10.0, 200.0, 40.0).at(0, 1)).expect("add");
    let z = tray.add_item(bar(10.0, 200.0, 40.0).at(1, 0)).expect("add");
    let p = tray.add_item(bar(10.0, 200.0, 50.0).at(2, 0)).expect("add");
    let q = tray.add_item(bar(10.0, 200.0, 50.0).at(2, 1)).expect("add");
    let r = tray.add_item(bar(10.0, 200.0, 50.0).at(2, 2)).expect("add");
    tray.update_layout(AREA);

    tray.begin_drag(x);
    // X's grip starts at x = 0 and moves to 70, inside Q in band 2. Q is
    // trimmed to end at the grip, not at the pointer's 72.
    let effect = tray.drag_delta(x, 70.0, Point::new(72.0, 50.0)).effect;
    assert_eq!(
        effect,
        ReflowEffect::Rebanded {
            item: x,
            band: 2,
            band_index: 2
        }
    );
    assert_eq!(coords(&tray, x), (2, 2));
    assert_eq!(coords(&tray, p), (2, 0));
    assert_eq!(coords(&tray, q), (2, 1));
    assert_eq!(coords(&tray, r), (2, 3));
    assert_eq!(explicit(&tray, q), Some(20.0));
    assert_eq!(explicit(&tray, x), None);
    // Band 0 re-flows to auto sizes.
    assert_eq!(explicit(&tray, y), None);
    assert_eq!(explicit(&tray, z), Some(40.0));

    tray.end_drag(x, false);
    assert_dense(&tray);
    let band2: Vec<ItemId> = tray.bands()[2].items().to_vec();
    assert_eq!(band2, vec![p, q, x, r]);
}

#[test]
fn insertion_slot_follows_grip_not_pointer() {
    let mut tray = Tray::default();
    let w = tray.add_item(bar(10.0, 200.0, 40.0)).expect("add");
    let x = tray.add_item(bar(10.0, 200.0, 40.0).at(0, 1)).expect("add");
    tray.add_item(bar(10.0, 200.0, 40.0).at(1, 0)).expect("add");
    let p = tray.add_item(bar(10.0, 200.0, 50.0).at(2, 0)).expect("add");
    let q = tray.add_item(bar(10.0, 200.0, 50.0).at(2, 1)).expect("add");
    let r = tray.add_item(bar(10.0, 200.0, 50.0).at(2, 2)).expect("add");
    tray.update_layout(AREA);
    assert_eq!(tray.item_rect(x).map(|rect| rect.x), Some(40.0));

    tray.begin_drag(x);
    // Held 60 units into X: the grip lands at 70 (inside Q) while the
    // pointer sits at R's leading edge.
    let effect = tray.drag_delta(x, 30.0, Point::new(100.0, 50.0)).effect;
    assert_eq!(
        effect,
        ReflowEffect::Rebanded {
            item: x,
            band: 2,
            band_index: 2
        }
    );
    assert_eq!(explicit(&tray, q), Some(20.0));
    assert_eq!(explicit(&tray, r), Some(50.0));

    tray.end_drag(x, false);
    assert_dense(&tray);
    assert_eq!(tray.bands()[2].items(), &[p, q, x, r]);
    assert_eq!(tray.bands()[0].items(), &[w]);
}

#[test]
fn drop_below_last_band_appends_band() {
    let mut tray = Tray::default();
    let a = tray.add_item(bar(10.0, 200.0, 40.0)).expect("add");
    let b = tray.add_item(bar(10.0, 200.0, 40.0).at(0, 1)).expect("add");
    tray.update_layout(AREA);

    tray.begin_drag(a);
    let effect = tray.drag_delta(a, 5.0, Point::new(10.0, 35.0)).effect;
    assert_eq!(effect, ReflowEffect::Detached { item: a, band: 1 });
    tray.end_drag(a, false);
    tray.update_layout(AREA);

    assert_eq!(tray.bands().len(), 2);
    assert_eq!(coords(&tray, b), (0, 0));
    assert_eq!(coords(&tray, a), (1, 0));
    assert_eq!(tray.item_rect(a), Some(Rect::new(0.0, 20.0, 40.0, 20.0)));
}

#[test]
fn completed_drag_leaves_table_consistent() {
    let mut tray = Tray::default();
    let ids: Vec<ItemId> = (0..6)
        .map(|n| {
            tray.add_item(bar(10.0, 120.0, 40.0).at(n / 3, n % 3))
                .expect("add")
        })
        .collect();
    tray.update_layout(AREA);

    let dragged = ids[4];
    tray.begin_drag(dragged);
    tray.drag_delta(dragged, -15.0, Point::new(27.0, 30.0));
    tray.drag_delta(dragged, 30.0, Point::new(57.0, 30.0));
    tray.drag_delta(dragged, 0.0, Point::new(57.0, 8.0));
    tray.drag_delta(dragged, -10.0, Point::new(47.0, 8.0));
    tray.end_drag(dragged, false);

    assert!(!tray.ensure_bands(), "completion must leave the table current");
    assert_dense(&tray);
}

#[test]
fn cancel_restores_lengths_and_positions() {
    let mut tray = Tray::default();
    let a = tray.add_item(bar(10.0, 200.0, 60.0)).expect("add");
    let b = tray.add_item(bar(10.0, 200.0, 50.0).at(0, 1)).expect("add");
    let c = tray.add_item(bar(10.0, 200.0, 30.0).at(1, 0)).expect("add");
    tray.update_layout(AREA);
    let rects: Vec<Option<Rect>> = [a, b, c].iter().map(|&id| tray.item_rect(id)).collect();

    tray.begin_drag(b);
    tray.drag_delta(b, -25.0, Point::new(37.0, 10.0));
    tray.drag_delta(b, 40.0, Point::new(77.0, 10.0));
    tray.drag_delta(b, 0.0, Point::new(77.0, 30.0));
    let effect = tray.end_drag(b, true).effect;
    assert_eq!(
        effect,
        ReflowEffect::Canceled {
            item: b,
            restored_length: Some(50.0)
        }
    );

    assert_eq!(
        explicit(&tray, b).map(f64::to_bits),
        Some(50.0f64.to_bits())
    );
    assert_eq!(explicit(&tray, a), Some(60.0));
    assert_eq!(explicit(&tray, c), Some(30.0));
    assert_eq!(coords(&tray, a), (0, 0));
    assert_eq!(coords(&tray, b), (0, 1));
    assert_eq!(coords(&tray, c), (1, 0));

    tray.update_layout(AREA);
    let after: Vec<Option<Rect>> = [a, b, c].iter().map(|&id| tray.item_rect(id)).collect();
    assert_eq!(after, rects);
}

#[test]
fn vertical_tray_drags_along_y() {
    let mut tray = Tray::new(TrayConfig::vertical()).expect("config");
    let top = tray
        .add_item(
            ItemSpec::new(10.0, 200.0)
                .explicit_length(50.0)
                .content(Size::new(20.0, 50.0)),
        )
        .expect("add");
    let bottom = tray
        .add_item(
            ItemSpec::new(10.0, 200.0)
                .explicit_length(50.0)
                .content(Size::new(20.0, 50.0))
                .at(0, 1),
        )
        .expect("add");
    tray.update_layout(AREA);
    assert_eq!(tray.orientation(), Orientation::Vertical);
    assert_eq!(tray.item_rect(bottom), Some(Rect::new(0.0, 50.0, 20.0, 50.0)));

    tray.begin_drag(bottom);
    let effect = tray.drag_delta(bottom, 15.0, Point::new(10.0, 67.0)).effect;
    assert!(matches!(effect, ReflowEffect::Resized { applied, .. } if applied == 15.0));
    tray.end_drag(bottom, false);
    tray.update_layout(AREA);
    assert_eq!(explicit(&tray, top), Some(65.0));
    assert_eq!(tray.item_rect(bottom).map(|r| r.y), Some(65.0));
}

#[test]
fn misuse_is_reported_not_applied() {
    let mut tray = Tray::default();
    let a = tray.add_item(bar(10.0, 200.0, 40.0)).expect("add");
    let b = tray.add_item(bar(10.0, 200.0, 40.0).at(0, 1)).expect("add");
    tray.update_layout(AREA);

    assert_eq!(
        tray.drag_delta(a, 5.0, Point::new(5.0, 5.0)).effect,
        ReflowEffect::Noop {
            reason: ReflowNoopReason::IdleWithoutActiveDrag
        }
    );
    tray.begin_drag(a);
    assert_eq!(
        tray.drag_delta(b, 5.0, Point::new(5.0, 5.0)).effect,
        ReflowEffect::Noop {
            reason: ReflowNoopReason::ItemMismatch
        }
    );
    assert_eq!(
        tray.drag_delta(a, 0.0, Point::new(5.0, 5.0)).effect,
        ReflowEffect::Noop {
            reason: ReflowNoopReason::ZeroDelta
        }
    );
    assert_eq!(
        tray.begin_drag(b).effect,
        ReflowEffect::Noop {
            reason: ReflowNoopReason::DragAlreadyInProgress
        }
    );
    let done = tray.end_drag(a, false);
    assert!(matches!(done.effect, ReflowEffect::Completed { .. }));
    assert_eq!(tray.dragging(), None);
}
