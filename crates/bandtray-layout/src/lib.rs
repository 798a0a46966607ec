#![forbid(unsafe_code)]

//! Band layout and drag reflow for toolbar trays.
//!
//! A [`Tray`] hosts toolbars in stacked *bands* (rows for a horizontal tray,
//! columns for a vertical one). Each toolbar carries a requested
//! `(band, band_index)` coordinate; the [`BandTable`] turns those into an
//! ordered, dense band structure and detects when it has gone stale.
//! [`layout::measure`] and [`layout::arrange`] size and place the bands, and
//! the [`DragReflowEngine`] resizes, reorders, and re-bands toolbars as the
//! user drags them.
//!
//! # Example
//!
//! ```
//! use bandtray_core::{Point, Size};
//! use bandtray_layout::{ItemSpec, ReflowEffect, Tray};
//!
//! let mut tray = Tray::default();
//! let file = tray
//!     .add_item(ItemSpec::new(20.0, 200.0).content(Size::new(60.0, 24.0)))
//!     .unwrap();
//! let edit = tray
//!     .add_item(ItemSpec::new(20.0, 200.0).content(Size::new(80.0, 24.0)).at(0, 1))
//!     .unwrap();
//! tray.update_layout(Size::new(400.0, 100.0));
//!
//! // Drag `edit` by its grip (x = 60) onto a second row.
//! tray.begin_drag(edit);
//! let moved = tray.drag_delta(edit, 0.0, Point::new(62.0, 30.0));
//! assert!(matches!(moved.effect, ReflowEffect::Detached { band: 1, .. }));
//! tray.end_drag(edit, false);
//!
//! tray.update_layout(Size::new(400.0, 100.0));
//! assert_eq!(tray.bands().len(), 2);
//! assert_eq!(tray.item(file).unwrap().band(), 0);
//! ```

pub mod band;
pub mod config;
pub mod drag;
pub mod error;
pub mod item;
pub mod layout;
pub mod store;
pub mod transform;
pub mod tray;

pub use band::{Band, BandTable};
pub use config::{TRAY_DEFAULT_SWAP_DEAD_ZONE, TrayConfig};
pub use drag::{
    DragPhase, DragReflowEngine, DragSession, DragState, ItemSnapshot, ReflowContext,
    ReflowEffect, ReflowNoopReason, ReflowTransition,
};
pub use error::{ItemError, TrayConfigError, TrayError};
pub use item::{ItemId, ItemSpec, ToolbarItem};
pub use layout::{IntrinsicMeasure, ItemMeasure};
pub use store::ItemStore;
pub use transform::{BandGeometry, ItemTransform};
pub use tray::Tray;
