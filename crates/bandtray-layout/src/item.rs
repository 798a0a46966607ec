#![forbid(unsafe_code)]

//! Toolbar items hosted by a tray.
//!
//! An item is a rectangle with a declared `[min_length, max_length]` range
//! along the tray's primary axis, an optional explicit length override set by
//! the host or by drag reflow, and two raw coordinates: `band` and
//! `band_index`.
//!
//! Coordinates are signed on purpose. Hosts may set sparse, colliding, or
//! negative values; band generation sorts by them and then re-stamps the
//! canonical dense form. `band_index == -1` marks an item that a drag
//! detached and that has not been placed yet.

use std::fmt;

use bandtray_core::geometry::{Orientation, Rect, Size};
use serde::{Deserialize, Serialize};

use crate::error::ItemError;

/// Stable identifier for a toolbar item.
///
/// `0` is reserved so ids are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u64);

impl ItemId {
    /// Lowest valid id.
    pub const MIN: Self = Self(1);

    /// Create an id, rejecting 0.
    #[must_use]
    pub const fn new(raw: u64) -> Option<Self> {
        if raw == 0 { None } else { Some(Self(raw)) }
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The id after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn check_length(field: &'static str, value: f64) -> Result<(), ItemError> {
    if value.is_nan() || value < 0.0 {
        return Err(ItemError::InvalidLength { field, value });
    }
    Ok(())
}

/// Validate a `[min, max]` length range.
///
/// `max` may be `f64::INFINITY` (unbounded); `min` must be finite.
pub fn validate_length_bounds(min: f64, max: f64) -> Result<(), ItemError> {
    check_length("min_length", min)?;
    if !min.is_finite() {
        return Err(ItemError::InvalidLength {
            field: "min_length",
            value: min,
        });
    }
    check_length("max_length", max)?;
    if max < min {
        return Err(ItemError::InvalidLengthBounds { min, max });
    }
    Ok(())
}

/// Validate an explicit length override.
pub fn validate_explicit_length(value: f64) -> Result<(), ItemError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ItemError::InvalidExplicitLength { value });
    }
    Ok(())
}

/// Declarative description of a toolbar to add to a tray.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemSpec {
    pub min_length: f64,
    #[serde(default = "unbounded")]
    pub max_length: f64,
    #[serde(default)]
    pub explicit_length: Option<f64>,
    #[serde(default)]
    pub band: i32,
    #[serde(default)]
    pub band_index: i32,
    /// Natural content size reported by [`IntrinsicMeasure`](crate::IntrinsicMeasure).
    #[serde(default)]
    pub content: Size,
    #[serde(default)]
    pub locked: bool,
}

fn unbounded() -> f64 {
    f64::INFINITY
}

impl Default for ItemSpec {
    fn default() -> Self {
        Self {
            min_length: 0.0,
            max_length: f64::INFINITY,
            explicit_length: None,
            band: 0,
            band_index: 0,
            content: Size::ZERO,
            locked: false,
        }
    }
}

impl ItemSpec {
    /// Item with the given length range.
    #[must_use]
    pub fn new(min_length: f64, max_length: f64) -> Self {
        Self {
            min_length,
            max_length,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn explicit_length(mut self, length: f64) -> Self {
        self.explicit_length = Some(length);
        self
    }

    /// Set the requested `(band, band_index)` coordinates.
    #[must_use]
    pub fn at(mut self, band: i32, band_index: i32) -> Self {
        self.band = band;
        self.band_index = band_index;
        self
    }

    #[must_use]
    pub fn content(mut self, content: Size) -> Self {
        self.content = content;
        self
    }

    #[must_use]
    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    pub fn validate(&self) -> Result<(), ItemError> {
        validate_length_bounds(self.min_length, self.max_length)?;
        if let Some(length) = self.explicit_length {
            validate_explicit_length(length)?;
        }
        Ok(())
    }
}

/// A toolbar hosted by a tray.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolbarItem {
    id: ItemId,
    min_length: f64,
    max_length: f64,
    pub(crate) explicit_length: Option<f64>,
    pub(crate) band: i32,
    pub(crate) band_index: i32,
    pub(crate) content: Size,
    pub(crate) locked: bool,
    /// Desired size from the last measure pass.
    pub(crate) desired: Size,
    /// Slot from the last arrange pass, in tray coordinates.
    pub(crate) rendered: Rect,
}

impl ToolbarItem {
    pub(crate) fn from_spec(id: ItemId, spec: ItemSpec) -> Result<Self, ItemError> {
        spec.validate()?;
        Ok(Self {
            id,
            min_length: spec.min_length,
            max_length: spec.max_length,
            explicit_length: spec.explicit_length,
            band: spec.band,
            band_index: spec.band_index,
            content: spec.content,
            locked: spec.locked,
            desired: Size::ZERO,
            rendered: Rect::default(),
        })
    }

    #[must_use]
    pub const fn id(&self) -> ItemId {
        self.id
    }

    #[must_use]
    pub const fn min_length(&self) -> f64 {
        self.min_length
    }

    #[must_use]
    pub const fn max_length(&self) -> f64 {
        self.max_length
    }

    /// Explicit primary-axis override; `None` means auto-sized.
    #[must_use]
    pub const fn explicit_length(&self) -> Option<f64> {
        self.explicit_length
    }

    #[must_use]
    pub const fn band(&self) -> i32 {
        self.band
    }

    #[must_use]
    pub const fn band_index(&self) -> i32 {
        self.band_index
    }

    /// Detached by a drag and not yet placed by band generation.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.band_index < 0
    }

    #[must_use]
    pub const fn content(&self) -> Size {
        self.content
    }

    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    /// Desired size from the last measure pass.
    #[must_use]
    pub const fn desired_size(&self) -> Size {
        self.desired
    }

    /// Arranged slot from the last arrange pass.
    #[must_use]
    pub const fn rendered_rect(&self) -> Rect {
        self.rendered
    }

    pub(crate) fn set_length_bounds(&mut self, min: f64, max: f64) -> Result<(), ItemError> {
        validate_length_bounds(min, max)?;
        self.min_length = min;
        self.max_length = max;
        Ok(())
    }

    /// Clamp a candidate primary length into `[min_length, max_length]`.
    #[inline]
    #[must_use]
    pub fn clamp_length(&self, length: f64) -> f64 {
        length.max(self.min_length).min(self.max_length)
    }

    /// Primary length as drag reflow sees it: the explicit override (clamped
    /// to the length range) if set, else the last rendered length.
    #[must_use]
    pub fn effective_length(&self, orientation: Orientation) -> f64 {
        match self.explicit_length {
            Some(length) => self.clamp_length(length),
            None => orientation.primary(self.rendered.size()),
        }
    }
}
