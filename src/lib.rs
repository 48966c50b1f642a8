//! Sprite stage library.
//!
//! A 2D sprite-animation engine: named, frame-based animated sprites
//! ([`Clip`](components::clip::Clip)s) on a virtual stage, advanced once per
//! tick and rendered through an abstract
//! [`DrawingSurface`](surface::DrawingSurface).
//!
//! - [`components`] – clip state machine and the data it is built from
//! - [`events`] – events clips report while advancing
//! - [`resources`] – stage-wide data: viewport ratio, configuration
//! - [`stage`] – clip registry and per-tick driver
//! - [`surface`] – drawing surface contract and a recording backend
//! - [`error`] – error types

pub mod components;
pub mod error;
pub mod events;
pub mod resources;
pub mod stage;
pub mod surface;
