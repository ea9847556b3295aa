//! Geometric primitives: points, rectangles, margins and affine transforms.
//!
//! Coordinates are in PDF user space (points, origin at the lower-left corner,
//! y growing upwards). Everything here is pure value math.

use serde::{Deserialize, Serialize};

/// A 2D point in user space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle anchored at its lower-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// X coordinate of the lower-left corner
    pub x: f32,
    /// Y coordinate of the lower-left corner
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle from position and dimensions.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle spanning two arbitrary corners.
    ///
    /// The corners may be given in any order; the result always has
    /// non-negative dimensions.
    pub fn from_corners(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x: x0.min(x1),
            y: y0.min(y1),
            width: (x1 - x0).abs(),
            height: (y1 - y0).abs(),
        }
    }

    /// Left edge.
    pub fn left(&self) -> f32 {
        self.x
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f32 {
        self.y
    }

    /// Top edge.
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// Whether both dimensions are non-negative.
    pub fn is_well_formed(&self) -> bool {
        self.width >= 0.0 && self.height >= 0.0
    }

    /// Shrink this rectangle by the given margins.
    pub fn inset(&self, margins: &Margins) -> Rect {
        inset_margins(self, margins)
    }

    /// Closed-interval containment of `inner` in `self`.
    pub fn contains(&self, inner: &Rect) -> bool {
        contains(self, inner)
    }
}

/// Margins trimmed from each side of a page box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    /// Left margin
    pub left: f32,
    /// Right margin
    pub right: f32,
    /// Top margin
    pub top: f32,
    /// Bottom margin
    pub bottom: f32,
}

impl Margins {
    /// Create margins from the four sides.
    pub fn new(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// The same margin on every side.
    pub fn uniform(margin: f32) -> Self {
        Self::new(margin, margin, margin, margin)
    }

    /// No margins at all; the keep area is the full page box.
    pub fn zero() -> Self {
        Self::uniform(0.0)
    }

    /// Whether every side is finite and non-negative.
    pub fn is_valid(&self) -> bool {
        [self.left, self.right, self.top, self.bottom]
            .iter()
            .all(|m| m.is_finite() && *m >= 0.0)
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::new(50.0, 50.0, 80.0, 80.0)
    }
}

/// Compute the keep-rectangle of a page box.
///
/// No clamping: margins wider than the page yield negative dimensions.
pub fn inset_margins(page: &Rect, margins: &Margins) -> Rect {
    Rect {
        x: page.x + margins.left,
        y: page.y + margins.bottom,
        width: page.width - margins.left - margins.right,
        height: page.height - margins.top - margins.bottom,
    }
}

/// Bounding box of a baseline segment.
///
/// Horizontal baselines produce a zero-height rectangle, vertical ones a
/// zero-width rectangle.
pub fn bounding_box_of(start: Point, end: Point) -> Rect {
    Rect::from_corners(start.x, start.y, end.x, end.y)
}

/// Whether `inner` lies fully inside `outer`. Touching an edge counts as inside.
pub fn contains(outer: &Rect, inner: &Rect) -> bool {
    inner.x >= outer.x
        && inner.y >= outer.y
        && inner.x + inner.width <= outer.x + outer.width
        && inner.y + inner.height <= outer.y + outer.height
}

/// A 2D affine transform `[a b c d e f]`, row-vector convention as in PDF.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix {
    /// Create a matrix from its six components.
    pub fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// The identity transform.
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    /// A pure translation.
    pub fn translation(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Apply `self` first, then `other`.
    pub fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    /// Map a point through this transform.
    pub fn transform(&self, p: Point) -> Point {
        Point {
            x: p.x * self.a + p.y * self.c + self.e,
            y: p.x * self.b + p.y * self.d + self.f,
        }
    }
}
