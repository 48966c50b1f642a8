//! Sprite sheets and their per-clip anchoring.
//!
//! A [`SpriteSheet`] is a named image handle plus the ordered frame regions
//! that make up one animation. Sheets are immutable once built and are shared
//! between clips behind an [`Arc`]. An [`AnimationBinding`] attaches a sheet to
//! a clip together with the anchor offset used when placing it on stage.

use std::sync::Arc;

use crate::components::rect::Rect;

/// Named image plus the source rect of every animation frame.
///
/// `I` is an opaque image handle (texture key, GPU handle, ...). The engine
/// never looks inside it; it is only handed back to the drawing surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteSheet<I> {
    pub name: String,
    pub width: f32,
    pub height: f32,
    pub image: I,
    pub frames: Vec<Rect>,
}

impl<I> SpriteSheet<I> {
    /// Create a sheet with no frames yet.
    pub fn new(name: impl Into<String>, width: f32, height: f32, image: I) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            image,
            frames: Vec::new(),
        }
    }

    /// Builder-style: append one frame.
    pub fn with_frame(mut self, frame: Rect) -> Self {
        self.frames.push(frame);
        self
    }

    /// Append one frame.
    pub fn push_frame(&mut self, frame: Rect) {
        self.frames.push(frame);
    }

    /// Build a sheet from a horizontal strip of `count` equally sized frames
    /// starting at the image's top-left corner.
    pub fn from_strip(
        name: impl Into<String>,
        image: I,
        frame_width: f32,
        frame_height: f32,
        count: usize,
    ) -> Self {
        let frames = (0..count)
            .map(|i| {
                let left = i as f32 * frame_width;
                Rect::new(0.0, left, left + frame_width, frame_height)
            })
            .collect();
        Self {
            name: name.into(),
            width: frame_width * count as f32,
            height: frame_height,
            image,
            frames,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frame(&self, index: usize) -> Option<&Rect> {
        self.frames.get(index)
    }
}

/// A sprite sheet bound to a clip under the sheet's name.
///
/// `top_offset`/`left_offset` are the stage-space anchor: the clip position
/// minus these offsets is where the frame's top-left corner lands.
#[derive(Debug)]
pub struct AnimationBinding<I> {
    pub sheet: Arc<SpriteSheet<I>>,
    pub top_offset: f32,
    pub left_offset: f32,
}

impl<I> AnimationBinding<I> {
    pub fn new(sheet: Arc<SpriteSheet<I>>, top_offset: f32, left_offset: f32) -> Self {
        Self {
            sheet,
            top_offset,
            left_offset,
        }
    }
}

impl<I> Clone for AnimationBinding<I> {
    fn clone(&self) -> Self {
        Self {
            sheet: Arc::clone(&self.sheet),
            top_offset: self.top_offset,
            left_offset: self.left_offset,
        }
    }
}
