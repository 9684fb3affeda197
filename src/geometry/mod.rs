//! Geometric primitives in page-image pixel space.
//!
//! OCR boxes arrive as four-vertex polygons; the engine only ever reads
//! them, so vertices keep whatever winding the source emitted
//! (top-left, top-right, bottom-right, bottom-left).

/// A 2D point in pixel space (origin top-left, y grows downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_formfill::geometry::Point;
    ///
    /// let point = Point::new(10.0, 20.0);
    /// assert_eq!(point.x, 10.0);
    /// assert_eq!(point.y, 20.0);
    /// ```
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// X coordinate of top-left corner
    pub x: f32,
    /// Y coordinate of top-left corner
    pub y: f32,
    /// Width of rectangle
    pub width: f32,
    /// Height of rectangle
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

    /// Check if this rectangle contains a point (edges inclusive).
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_formfill::geometry::{Point, Rect};
    ///
    /// let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
    /// assert!(rect.contains_point(&Point::new(50.0, 50.0)));
    /// assert!(!rect.contains_point(&Point::new(150.0, 150.0)));
    /// ```
    pub fn contains_point(&self, p: &Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// A quadrilateral bounding box as emitted by the OCR source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    /// The four vertices in source order
    pub points: [Point; 4],
}

impl Quad {
    /// Create a quad from four vertices, kept in the given order.
    pub fn new(points: [Point; 4]) -> Self {
        Self { points }
    }

    /// Build an upright quad covering `(x, y, width, height)`, wound
    /// top-left, top-right, bottom-right, bottom-left.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_formfill::geometry::Quad;
    ///
    /// let quad = Quad::from_rect(10.0, 20.0, 50.0, 12.0);
    /// assert_eq!(quad.top_left().x, 10.0);
    /// assert_eq!(quad.points[2].y, 32.0);
    /// ```
    pub fn from_rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new([
            Point::new(x, y),
            Point::new(x + width, y),
            Point::new(x + width, y + height),
            Point::new(x, y + height),
        ])
    }

    /// Build a quad from a vertex slice. Returns `None` unless there are
    /// exactly four vertices.
    pub fn from_slice(points: &[Point]) -> Option<Self> {
        let points: [Point; 4] = points.try_into().ok()?;
        Some(Self::new(points))
    }

    /// The first vertex, used as the placement point for overlay text.
    pub fn top_left(&self) -> Point {
        self.points[0]
    }
}
