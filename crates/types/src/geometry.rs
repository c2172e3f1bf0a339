use serde::{Deserialize, Serialize};

/// Tolerance used when comparing layout coordinates.
pub const EPSILON: f32 = 0.01;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn zero() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
        }
    }

    /// US Letter in points.
    pub fn letter() -> Self {
        Self::new(612.0, 792.0)
    }
}

/// An axis-aligned rectangle in page space (origin top-left, y grows down).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= EPSILON || self.height <= EPSILON
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x - EPSILON
            && other.y >= self.y - EPSILON
            && other.right() <= self.right() + EPSILON
            && other.bottom() <= self.bottom() + EPSILON
    }

    /// Returns the overlapping area, or `None` when the rectangles do not overlap.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        let clipped = Rect::new(x0, y0, x1 - x0, y1 - y0);
        if clipped.is_empty() {
            None
        } else {
            Some(clipped)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Default for Margins {
    fn default() -> Self {
        Self::all(36.0)
    }
}

impl Margins {
    pub fn all(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub fn zero() -> Self {
        Self::all(0.0)
    }

    /// The content area left inside `size` once these margins are removed.
    pub fn content_rect(&self, size: Size) -> Rect {
        Rect::new(
            self.left,
            self.top,
            (size.width - self.left - self.right).max(0.0),
            (size.height - self.top - self.bottom).max(0.0),
        )
    }
}

/// Clips the segment `a → b` against `bounds` (Liang-Barsky).
///
/// Returns `None` when no part of the segment lies inside the rectangle.
pub fn clip_segment(a: Point, b: Point, bounds: &Rect) -> Option<(Point, Point)> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let mut t0 = 0.0f32;
    let mut t1 = 1.0f32;

    let checks = [
        (-dx, a.x - bounds.x),
        (dx, bounds.right() - a.x),
        (-dy, a.y - bounds.y),
        (dy, bounds.bottom() - a.y),
    ];

    for (p, q) in checks {
        if p.abs() < f32::EPSILON {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    Some((
        Point::new(a.x + t0 * dx, a.y + t0 * dy),
        Point::new(a.x + t1 * dx, a.y + t1 * dy),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersect_partial_overlap() {
        let page = Rect::new(0.0, 0.0, 100.0, 100.0);
        let image = Rect::new(80.0, 90.0, 40.0, 40.0);
        let clipped = page.intersect(&image).unwrap();
        assert_eq!(clipped, Rect::new(80.0, 90.0, 20.0, 10.0));
        assert!(!page.contains_rect(&image));
    }

    #[test]
    fn test_intersect_disjoint() {
        let page = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(page.intersect(&Rect::new(150.0, 10.0, 10.0, 10.0)).is_none());
    }

    #[test]
    fn test_clip_segment_inside_is_unchanged() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        let (a, b) = clip_segment(Point::new(10.0, 10.0), Point::new(90.0, 10.0), &bounds).unwrap();
        assert_eq!(a, Point::new(10.0, 10.0));
        assert_eq!(b, Point::new(90.0, 10.0));
    }

    #[test]
    fn test_clip_segment_crossing_edge() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        let (a, b) = clip_segment(Point::new(50.0, 50.0), Point::new(150.0, 50.0), &bounds).unwrap();
        assert_eq!(a, Point::new(50.0, 50.0));
        assert!((b.x - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_clip_segment_outside() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(clip_segment(Point::new(120.0, 0.0), Point::new(130.0, 50.0), &bounds).is_none());
    }

    #[test]
    fn test_margins_content_rect() {
        let m = Margins { top: 10.0, right: 20.0, bottom: 30.0, left: 40.0 };
        let r = m.content_rect(Size::new(200.0, 300.0));
        assert_eq!(r, Rect::new(40.0, 10.0, 140.0, 260.0));
    }
}
