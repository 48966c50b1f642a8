//! Axis-aligned rectangles.
//!
//! [`Rect`] is edge-based (`top`, `left`, `right`, `bottom`) and is used both
//! for sprite-sheet frame regions and for clip movement boundaries.
//! [`Region`] is origin + size and is what the drawing surface receives.

use serde::{Deserialize, Serialize};

/// Edge-based rectangle in source-image or stage units.
///
/// Callers are expected to keep `left < right` and `top < bottom`; nothing
/// here normalizes the edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub top: f32,
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(top: f32, left: f32, right: f32, bottom: f32) -> Self {
        Self {
            top,
            left,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Clamp a point into the rect, each axis independently.
    ///
    /// Returns `(top, left)`.
    pub fn clamp(&self, top: f32, left: f32) -> (f32, f32) {
        // Not f32::clamp: that panics when a caller hands us an inverted rect.
        let top = top.max(self.top).min(self.bottom);
        let left = left.max(self.left).min(self.right);
        (top, left)
    }

    /// The source region of this rect, as handed to a drawing surface.
    pub fn region(&self) -> Region {
        Region::new(self.left, self.top, self.width(), self.height())
    }
}

/// Origin + size rectangle, the unit of the drawing surface contract.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Region {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_width_and_height() {
        let r = Rect::new(10.0, 20.0, 52.0, 58.0);
        assert!(approx_eq(r.width(), 32.0));
        assert!(approx_eq(r.height(), 48.0));
    }

    #[test]
    fn test_clamp_inside_is_identity() {
        let r = Rect::new(0.0, 0.0, 100.0, 50.0);
        let (top, left) = r.clamp(25.0, 75.0);
        assert!(approx_eq(top, 25.0));
        assert!(approx_eq(left, 75.0));
    }

    #[test]
    fn test_clamp_each_axis_independently() {
        let r = Rect::new(0.0, 0.0, 100.0, 50.0);
        let (top, left) = r.clamp(-10.0, 150.0);
        assert!(approx_eq(top, 0.0));
        assert!(approx_eq(left, 100.0));

        let (top, left) = r.clamp(80.0, -5.0);
        assert!(approx_eq(top, 50.0));
        assert!(approx_eq(left, 0.0));
    }

    #[test]
    fn test_region_swaps_to_origin_and_size() {
        let r = Rect::new(4.0, 8.0, 24.0, 36.0);
        let region = r.region();
        assert_eq!(region, Region::new(8.0, 4.0, 16.0, 32.0));
    }
}
