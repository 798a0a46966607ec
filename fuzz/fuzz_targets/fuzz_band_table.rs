#![no_main]

use bandtray_core::Size;
use bandtray_layout::{ItemSpec, Tray};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Three bytes per toolbar: band, band_index, length.
    let mut tray = Tray::default();
    for chunk in data.chunks_exact(3).take(64) {
        let band = i32::from(chunk[0] as i8 % 8);
        let band_index = i32::from(chunk[1] as i8 % 16);
        let length = f64::from(chunk[2]);
        let spec = ItemSpec::new(length / 4.0, length + 1.0)
            .content(Size::new(length, 12.0 + f64::from(chunk[0] % 9)))
            .at(band, band_index);
        tray.add_item(spec).expect("derived specs are valid");
    }

    tray.ensure_bands();
    let first: Vec<_> = tray.bands().to_vec();

    // Post-conditions that must always hold:
    let mut members = 0usize;
    for (band_pos, band) in tray.bands().iter().enumerate() {
        assert!(!band.is_empty(), "empty band survived generation");
        for (index, &id) in band.items().iter().enumerate() {
            let item = tray.item(id).expect("band member missing");
            assert_eq!(item.band(), band_pos as i32, "band not restamped");
            assert_eq!(item.band_index(), index as i32, "band_index not dense");
        }
        members += band.len();
    }
    assert_eq!(members, tray.len(), "item lost or duplicated");

    assert!(!tray.ensure_bands(), "generation not idempotent");
    assert_eq!(tray.bands(), first.as_slice());

    let desired = tray.update_layout(Size::new(4096.0, 4096.0));
    assert!(desired.width.is_finite() && desired.height.is_finite());
    for item in tray.items() {
        let width = item.rendered_rect().width;
        assert!(width >= item.min_length() && width <= item.max_length());
    }
});
