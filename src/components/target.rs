//! Movement waypoints.
//!
//! A clip keeps its [`Target`]s as a stack and always seeks the most recently
//! pushed one. To queue a multi-leg path, push the final destination first
//! and the intermediate waypoints after it.

use std::fmt;

use crate::components::clip::{Clip, ClipCallback};

/// A stage-space point a clip moves toward, with an optional arrival callback.
///
/// The callback only fires when this target is the last one left on the
/// stack; intermediate waypoints are popped silently.
pub struct Target<I> {
    pub top: f32,
    pub left: f32,
    pub on_arrival: Option<ClipCallback<I>>,
}

impl<I> Target<I> {
    pub fn new(top: f32, left: f32) -> Self {
        Self {
            top,
            left,
            on_arrival: None,
        }
    }

    /// Builder-style: attach the arrival callback.
    pub fn with_on_arrival(
        mut self,
        on_arrival: impl FnOnce(&mut Clip<I>) + Send + Sync + 'static,
    ) -> Self {
        self.on_arrival = Some(Box::new(on_arrival));
        self
    }
}

impl<I> fmt::Debug for Target<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("top", &self.top)
            .field("left", &self.left)
            .field("on_arrival", &self.on_arrival.is_some())
            .finish()
    }
}
