//! Stage-to-viewport transform.
//!
//! The stage has a fixed logical size; the viewport (drawing surface) can be
//! any size. [`Ratio::fit`] computes a uniform scale plus an offset so the
//! stage keeps its aspect ratio inside the viewport, and every clip is drawn
//! and hit-tested through that same transform:
//!
//! ```text
//! viewport = stage * scale + offset
//! ```

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

/// Uniform scale plus offset mapping stage coordinates to viewport coordinates.
///
/// The default (all zeros) is the degenerate ratio: nothing drawn has any
/// size. It is a valid idle state, e.g. before the viewport is known.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Ratio {
    /// Stage-to-viewport scale factor.
    pub scale: f32,
    /// Vertical viewport offset of the stage's top edge.
    pub top: f32,
    /// Horizontal viewport offset of the stage's left edge.
    pub left: f32,
}

impl Ratio {
    pub fn new(scale: f32, top: f32, left: f32) -> Self {
        Self { scale, top, left }
    }

    /// Fit a `stage_width` x `stage_height` stage into an `eff_w` x `eff_h`
    /// viewport.
    ///
    /// A zero-sized viewport yields the degenerate ratio.
    ///
    /// When the viewport is relatively wider than the stage, the scale is taken
    /// from the width ratio and the remaining vertical space is split evenly
    /// (this can be negative, cropping top and bottom). Otherwise the scale is
    /// taken from the height ratio and the horizontal space is split evenly.
    pub fn fit(stage_width: f32, stage_height: f32, eff_w: f32, eff_h: f32) -> Self {
        if eff_w == 0.0 || eff_h == 0.0 {
            return Self::default();
        }
        if eff_w / eff_h > stage_width / stage_height {
            let scale = eff_w / stage_width;
            let height = scale * stage_height;
            Self {
                scale,
                top: (eff_h - height) / 2.0,
                left: 0.0,
            }
        } else {
            let scale = eff_h / stage_height;
            let width = scale * stage_width;
            Self {
                scale,
                top: 0.0,
                left: (eff_w - width) / 2.0,
            }
        }
    }

    pub fn is_degenerate(self) -> bool {
        self.scale == 0.0
    }

    /// Map a stage-space point to viewport space. Returns `(top, left)`.
    pub fn to_viewport(self, top: f32, left: f32) -> (f32, f32) {
        (top * self.scale + self.top, left * self.scale + self.left)
    }

    /// Map a viewport-space point back to stage space. Returns `(top, left)`.
    ///
    /// `None` for the degenerate ratio, which has no inverse.
    pub fn to_stage(self, top: f32, left: f32) -> Option<(f32, f32)> {
        if self.is_degenerate() {
            return None;
        }
        Some(((top - self.top) / self.scale, (left - self.left) / self.scale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_zero_width_viewport_is_degenerate() {
        let r = Ratio::fit(800.0, 600.0, 0.0, 600.0);
        assert_eq!(r, Ratio::new(0.0, 0.0, 0.0));
        assert!(r.is_degenerate());
    }

    #[test]
    fn test_zero_height_viewport_is_degenerate() {
        let r = Ratio::fit(800.0, 600.0, 1024.0, 0.0);
        assert_eq!(r, Ratio::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_wider_viewport_scales_by_width() {
        let r = Ratio::fit(800.0, 600.0, 1600.0, 900.0);
        assert!(approx_eq(r.scale, 2.0));
        assert!(approx_eq(r.left, 0.0));
        assert!(approx_eq(r.top, -150.0));
    }

    #[test]
    fn test_taller_viewport_scales_by_height() {
        let r = Ratio::fit(800.0, 600.0, 800.0, 1200.0);
        // 800/1200 < 800/600, so scale = 1200 / 600
        assert!(approx_eq(r.scale, 2.0));
        assert!(approx_eq(r.top, 0.0));
        assert!(approx_eq(r.left, -400.0));
    }

    #[test]
    fn test_same_aspect_takes_height_branch() {
        let r = Ratio::fit(800.0, 600.0, 400.0, 300.0);
        assert!(approx_eq(r.scale, 0.5));
        assert!(approx_eq(r.top, 0.0));
        assert!(approx_eq(r.left, 0.0));
    }

    #[test]
    fn test_to_viewport_and_back() {
        let r = Ratio::new(2.0, -150.0, 10.0);
        let (top, left) = r.to_viewport(100.0, 50.0);
        assert!(approx_eq(top, 50.0));
        assert!(approx_eq(left, 110.0));
        let (top, left) = r.to_stage(top, left).unwrap();
        assert!(approx_eq(top, 100.0));
        assert!(approx_eq(left, 50.0));
    }

    #[test]
    fn test_degenerate_has_no_inverse() {
        assert!(Ratio::default().to_stage(10.0, 10.0).is_none());
    }
}
