//! Error types.
//!
//! [`ClipError`] reports violated clip preconditions (no animation selected,
//! unknown animation name, a frame index past the end of the sheet).
//! [`ConfigError`] wraps INI load/save failures.

/// Failure kinds for clip playback and rendering queries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClipError {
    #[error("no animation is selected")]
    NoActiveAnimation,

    #[error("unknown animation: {0}")]
    UnknownAnimationName(String),

    #[error("frame {frame} is out of range for animation {animation} ({frame_count} frames)")]
    FrameOutOfRange {
        animation: String,
        frame: usize,
        frame_count: usize,
    },

    #[error("sprite sheet {0} has no frames")]
    EmptySpriteSheet(String),
}

/// Failure kinds for [`StageConfig`](crate::resources::stageconfig::StageConfig) I/O.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load config file: {0}")]
    Load(String),

    #[error("failed to save config file: {0}")]
    Save(String),
}
