//! Clip lifecycle events.
//!
//! [`Clip::inc_frame`](crate::components::clip::Clip::inc_frame) reports at most
//! one [`ClipEvent`] per tick. The stage forwards it to the single handler
//! registered for that clip's name (see
//! [`Stage::register_event_handler`](crate::stage::Stage::register_event_handler)).
//!
//! # Example
//!
//! ```ignore
//! stage.register_event_handler("hero", |clip, event| match event {
//!     ClipEvent::ArrivedAtTarget { .. } => clip.set_message("here!"),
//!     ClipEvent::AnimationStopped { .. } => clip.hide(),
//! });
//! ```

use serde::{Deserialize, Serialize};

/// Something a clip did during its frame advance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ClipEvent {
    /// The last target on the clip's stack was reached and popped.
    ArrivedAtTarget { top: f32, left: f32 },
    /// A `play_range` stop frame was reached; the clip is now halted.
    AnimationStopped { frame: usize },
}

impl ClipEvent {
    /// Short, stable name used in logs and traces.
    pub fn kind(&self) -> &'static str {
        match self {
            ClipEvent::ArrivedAtTarget { .. } => "arrived_at_target",
            ClipEvent::AnimationStopped { .. } => "animation_stopped",
        }
    }
}
