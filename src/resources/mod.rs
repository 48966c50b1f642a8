//! Stage-wide resources.
//!
//! - [`ratio`] – stage-to-viewport scale and offset (letterbox fit)
//! - [`stageconfig`] – INI-backed stage and demo configuration, stage size
pub mod ratio;
pub mod stageconfig;
