//! Z-index for draw/update ordering.
//!
//! The stage sorts its clips by [`ZIndex`] ascending each tick, so lower
//! values are drawn (and advanced) first and end up underneath.

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

/// Draw/update order hint. Higher values are drawn later (on top).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ZIndex(pub i32);

impl From<i32> for ZIndex {
    fn from(value: i32) -> Self {
        ZIndex(value)
    }
}

/// Insertion sequence of a clip in its stage.
///
/// Breaks ties between equal [`ZIndex`] values so the painter's sort is stable
/// with respect to registration order.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct DrawSequence(pub u64);
