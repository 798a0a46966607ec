#![forbid(unsafe_code)]

//! Core: geometry, orientation, coordinate transforms, and logging.
//!
//! # Role in bandtray
//! `bandtray-core` holds the host-agnostic vocabulary shared by the layout
//! engine and whatever framework embeds it. It has no notion of toolbars or
//! bands; those live in `bandtray-layout`.
//!
//! # Primary responsibilities
//! - **Geometry**: `f64` [`Point`](geometry::Point), [`Size`](geometry::Size)
//!   and [`Rect`](geometry::Rect) plus tolerant comparisons.
//! - **Orientation**: primary/cross axis projection for horizontal and
//!   vertical trays.
//! - **AffineTransform**: the tray-to-item coordinate mapping supplied by a
//!   layout host.
//! - **Logging**: a `tracing` facade that compiles away when the feature is
//!   off.

pub mod geometry;
pub mod logging;

pub use geometry::{AffineTransform, Orientation, Point, Rect, Size};
