#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All quantities are device-independent `f64` units with the origin at the
//! top-left of the tray. Comparisons that feed layout decisions go through
//! [`close`] / [`less_than`] / [`greater_than`] so accumulated floating-point
//! noise never flips a branch.

use serde::{Deserialize, Serialize};

/// Tolerance used by the fuzzy comparison helpers.
pub const EPSILON: f64 = 1.0e-6;

/// `a` and `b` are equal within [`EPSILON`] (scaled for large magnitudes).
#[inline]
#[must_use]
pub fn close(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    let scale = (a.abs() + b.abs() + 10.0) * EPSILON;
    (a - b).abs() < scale
}

/// `a < b` and not [`close`].
#[inline]
#[must_use]
pub fn less_than(a: f64, b: f64) -> bool {
    a < b && !close(a, b)
}

/// `a > b` and not [`close`].
#[inline]
#[must_use]
pub fn greater_than(a: f64, b: f64) -> bool {
    a > b && !close(a, b)
}

/// A point in tray or item coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Zero-sized.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Check if either dimension is zero (or negative).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// An axis-aligned rectangle for layout bounds and hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: f64,
    /// Top edge (inclusive).
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from an origin and a size.
    #[inline]
    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Top-left corner.
    #[inline]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}

/// Layout orientation of a tray.
///
/// The *primary* axis is the one toolbars are laid out along inside a band;
/// the *cross* axis is the one bands stack along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Bands are rows, items flow left to right.
    #[default]
    Horizontal,
    /// Bands are columns, items flow top to bottom.
    Vertical,
}

impl Orientation {
    #[inline]
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Horizontal)
    }

    /// The other orientation.
    #[inline]
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    /// Extent of `size` along the primary axis.
    #[inline]
    #[must_use]
    pub const fn primary(self, size: Size) -> f64 {
        match self {
            Self::Horizontal => size.width,
            Self::Vertical => size.height,
        }
    }

    /// Extent of `size` along the cross axis.
    #[inline]
    #[must_use]
    pub const fn cross(self, size: Size) -> f64 {
        match self {
            Self::Horizontal => size.height,
            Self::Vertical => size.width,
        }
    }

    /// Coordinate of `point` along the primary axis.
    #[inline]
    #[must_use]
    pub const fn primary_of(self, point: Point) -> f64 {
        match self {
            Self::Horizontal => point.x,
            Self::Vertical => point.y,
        }
    }

    /// Coordinate of `point` along the cross axis.
    #[inline]
    #[must_use]
    pub const fn cross_of(self, point: Point) -> f64 {
        match self {
            Self::Horizontal => point.y,
            Self::Vertical => point.x,
        }
    }

    /// Build a size from primary/cross extents.
    #[inline]
    #[must_use]
    pub const fn size(self, primary: f64, cross: f64) -> Size {
        match self {
            Self::Horizontal => Size::new(primary, cross),
            Self::Vertical => Size::new(cross, primary),
        }
    }

    /// Build a point from primary/cross coordinates.
    #[inline]
    #[must_use]
    pub const fn point(self, primary: f64, cross: f64) -> Point {
        match self {
            Self::Horizontal => Point::new(primary, cross),
            Self::Vertical => Point::new(cross, primary),
        }
    }
}

/// A 2D affine transform mapping `(x, y)` to
/// `(m11*x + m21*y + dx, m12*x + m22*y + dy)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    pub m11: f64,
    pub m12: f64,
    pub m21: f64,
    pub m22: f64,
    pub dx: f64,
    pub dy: f64,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AffineTransform {
    pub const IDENTITY: Self = Self {
        m11: 1.0,
        m12: 0.0,
        m21: 0.0,
        m22: 1.0,
        dx: 0.0,
        dy: 0.0,
    };

    /// Pure translation.
    #[must_use]
    pub const fn translation(dx: f64, dy: f64) -> Self {
        Self {
            dx,
            dy,
            ..Self::IDENTITY
        }
    }

    /// Pure scale about the origin.
    #[must_use]
    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self {
            m11: sx,
            m22: sy,
            ..Self::IDENTITY
        }
    }

    /// Map a point through this transform.
    #[inline]
    #[must_use]
    pub fn apply(&self, point: Point) -> Point {
        Point::new(
            self.m11 * point.x + self.m21 * point.y + self.dx,
            self.m12 * point.x + self.m22 * point.y + self.dy,
        )
    }

    /// Compose: apply `self` first, then `next`.
    #[must_use]
    pub fn then(&self, next: &AffineTransform) -> Self {
        Self {
            m11: self.m11 * next.m11 + self.m12 * next.m21,
            m12: self.m11 * next.m12 + self.m12 * next.m22,
            m21: self.m21 * next.m11 + self.m22 * next.m21,
            m22: self.m21 * next.m12 + self.m22 * next.m22,
            dx: self.dx * next.m11 + self.dy * next.m21 + next.dx,
            dy: self.dx * next.m12 + self.dy * next.m22 + next.dy,
        }
    }

    /// Inverse transform, or `None` when the matrix is singular.
    #[must_use]
    pub fn inverse(&self) -> Option<Self> {
        let det = self.m11 * self.m22 - self.m12 * self.m21;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv = 1.0 / det;
        let m11 = self.m22 * inv;
        let m12 = -self.m12 * inv;
        let m21 = -self.m21 * inv;
        let m22 = self.m11 * inv;
        Some(Self {
            m11,
            m12,
            m21,
            m22,
            dx: -(self.dx * m11 + self.dy * m21),
            dy: -(self.dx * m12 + self.dy * m22),
        })
    }
}
