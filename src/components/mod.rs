//! Clip components.
//!
//! Submodules overview:
//! - [`clip`] – the animated, positioned, movable sprite and its tick logic
//! - [`rect`] – edge-based rects for frames and boundaries, origin+size regions
//! - [`spritesheet`] – named image plus frame rects, and per-clip anchoring
//! - [`target`] – movement waypoints
//! - [`zindex`] – draw/update ordering

pub mod clip;
pub mod rect;
pub mod spritesheet;
pub mod target;
pub mod zindex;
