#![no_main]

use arbitrary::Arbitrary;
use bandtray_core::{Point, Size};
use bandtray_layout::{ItemSpec, Tray};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Toolbar {
    band: u8,
    min: u8,
    span: u8,
    content: u8,
    explicit: Option<u8>,
}

#[derive(Debug, Arbitrary)]
enum Step {
    Delta { delta: i16, cross: i16 },
    Layout,
}

#[derive(Debug, Arbitrary)]
struct Gesture {
    target: u8,
    steps: Vec<Step>,
    cancel: bool,
}

#[derive(Debug, Arbitrary)]
struct Input {
    toolbars: Vec<Toolbar>,
    gestures: Vec<Gesture>,
}

fuzz_target!(|input: Input| {
    if input.toolbars.is_empty() {
        return;
    }
    let area = Size::new(512.0, 256.0);
    let mut tray = Tray::default();
    let ids: Vec<_> = input
        .toolbars
        .iter()
        .take(32)
        .map(|bar| {
            let min = f64::from(bar.min % 64);
            let mut spec = ItemSpec::new(min, min + f64::from(bar.span))
                .content(Size::new(f64::from(bar.content), 16.0))
                .at(i32::from(bar.band % 6), 0);
            if let Some(length) = bar.explicit {
                spec = spec.explicit_length(f64::from(length));
            }
            tray.add_item(spec).expect("derived specs are valid")
        })
        .collect();
    tray.update_layout(area);

    for gesture in input.gestures.iter().take(8) {
        let dragged = ids[usize::from(gesture.target) % ids.len()];
        let before: Vec<_> = tray
            .items()
            .iter()
            .map(|item| (item.band(), item.band_index(), item.explicit_length().map(f64::to_bits)))
            .collect();

        let start = tray.item_rect(dragged).unwrap_or_default();
        let mut pointer = Point::new(start.x + 1.0, start.y + 1.0);
        tray.begin_drag(dragged);
        for step in gesture.steps.iter().take(32) {
            match *step {
                Step::Delta { delta, cross } => {
                    let delta = f64::from(delta) / 64.0;
                    pointer.x += delta;
                    pointer.y = f64::from(cross) / 128.0;
                    tray.drag_delta(dragged, delta, pointer);
                }
                // Hosts may run layout passes mid-gesture.
                Step::Layout => {
                    tray.update_layout(area);
                }
            }
        }
        tray.end_drag(dragged, gesture.cancel);

        // Post-conditions that must always hold:
        assert!(tray.dragging().is_none());
        assert!(!tray.ensure_bands(), "gesture left the band table stale");
        assert_eq!(tray.pending_items().count(), 0);
        for item in tray.items() {
            if let Some(length) = item.explicit_length() {
                assert!(length.is_finite() && length >= 0.0);
            }
        }
        if gesture.cancel {
            let after: Vec<_> = tray
                .items()
                .iter()
                .map(|item| (item.band(), item.band_index(), item.explicit_length().map(f64::to_bits)))
                .collect();
            assert_eq!(after, before, "cancel did not restore state");
        }
        tray.update_layout(area);
    }
});
