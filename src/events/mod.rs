//! Event types reported by clips.
//!
//! Submodules:
//! - [`clip`] – arrival and stop notifications dispatched by the stage
pub mod clip;
