//! Drawing surface contract.
//!
//! The engine never blits pixels itself. Clips and the stage draw through a
//! [`DrawingSurface`], which owns the actual backend (canvas, GPU texture,
//! terminal, test recorder...). The surface's [`DrawingSurface::Image`] type is
//! the opaque image handle carried by every
//! [`SpriteSheet`](crate::components::spritesheet::SpriteSheet).
//!
//! [`RecordingSurface`] is a backend that just remembers what it was asked
//! to draw. It is what the tests and the demo trace use.

use serde::Serialize;

use crate::components::rect::Region;

/// Capabilities a backend must provide for the stage to render.
pub trait DrawingSurface {
    /// Opaque image handle understood by this backend.
    type Image;

    /// Blit the `src` sub-region of `image` into `dst`, scaling as needed.
    fn draw_image(&mut self, image: &Self::Image, src: Region, dst: Region);

    /// Render `message` with its top-left corner at (`left`, `top`).
    /// `width` is a soft hint for the text box width.
    fn draw_text(&mut self, message: &str, left: f32, top: f32, width: f32);

    /// Reset the surface for a new frame.
    fn clear(&mut self);
}

/// One call made against a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand<I> {
    Clear,
    Image {
        image: I,
        src: Region,
        dst: Region,
    },
    Text {
        message: String,
        left: f32,
        top: f32,
        width: f32,
    },
}

/// Surface that records every call instead of drawing.
#[derive(Debug, Clone)]
pub struct RecordingSurface<I> {
    pub commands: Vec<DrawCommand<I>>,
}

impl<I> Default for RecordingSurface<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> RecordingSurface<I> {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Drop everything recorded so far, returning it.
    pub fn take(&mut self) -> Vec<DrawCommand<I>> {
        std::mem::take(&mut self.commands)
    }

    /// Image handles in the order they were blitted.
    pub fn images(&self) -> Vec<&I> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Image { image, .. } => Some(image),
                _ => None,
            })
            .collect()
    }
}

impl<I: Clone> DrawingSurface for RecordingSurface<I> {
    type Image = I;

    fn draw_image(&mut self, image: &I, src: Region, dst: Region) {
        self.commands.push(DrawCommand::Image {
            image: image.clone(),
            src,
            dst,
        });
    }

    fn draw_text(&mut self, message: &str, left: f32, top: f32, width: f32) {
        self.commands.push(DrawCommand::Text {
            message: message.to_string(),
            left,
            top,
            width,
        });
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }
}
