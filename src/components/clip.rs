//! Animated, positioned, movable sprite.
//!
//! A [`Clip`] owns a set of named animations (sprite sheets plus anchor
//! offsets), its playback state, and its motion state. Each tick the stage
//! calls [`Clip::draw`] and then [`Clip::inc_frame`].
//!
//! # Tick contract
//!
//! `inc_frame` only does anything when an animation and frame are selected
//! and the clip is not halted. In that case, in order:
//!
//! 1. If the current frame is the armed stop frame, the clip halts, the stop
//!    frame is disarmed, the stop callback runs, and the tick ends.
//! 2. The frame advances, wrapping at the end of the sheet.
//! 3. Velocity is added to the position.
//! 4. If there is a target, velocity is re-aimed at it (used next tick). A
//!    target closer than [`ARRIVAL_DISTANCE`] is popped; popping the last one
//!    runs its arrival callback.
//! 5. With no target left, the position is clamped into the boundary.
//!
//! Rendering happens before the advance, so what is drawn always lags the
//! motion state by one tick.

use std::fmt;
use std::sync::Arc;

use bevy_ecs::prelude::Component;
use log::trace;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::components::rect::{Rect, Region};
use crate::components::spritesheet::{AnimationBinding, SpriteSheet};
use crate::components::target::Target;
use crate::components::zindex::ZIndex;
use crate::error::ClipError;
use crate::events::clip::ClipEvent;
use crate::resources::ratio::Ratio;
use crate::surface::DrawingSurface;

/// Distance (stage units) under which a target counts as reached.
pub const ARRIVAL_DISTANCE: f32 = 5.0;

/// Estimated width of one message character, in viewport units.
const MESSAGE_CHAR_WIDTH: f32 = 5.5;
/// Padding added to the estimated message width.
const MESSAGE_PADDING: f32 = 5.0;
/// Vertical offset of the message below the sprite's top edge.
const MESSAGE_TOP_OFFSET: f32 = 5.0;

/// One-shot callback receiving the clip that triggered it.
pub type ClipCallback<I> = Box<dyn FnOnce(&mut Clip<I>) + Send + Sync>;

#[derive(Component)]
pub struct Clip<I> {
    name: String,
    z_index: ZIndex,

    animations: FxHashMap<String, AnimationBinding<I>>,
    current_animation: Option<String>,
    current_frame: Option<usize>,
    stop_frame: Option<usize>,
    stop_callback: Option<ClipCallback<I>>,

    top: f32,
    left: f32,
    vx: f32,
    vy: f32,
    speed: f32,
    boundary: Rect,
    targets: SmallVec<[Target<I>; 4]>,

    active: bool,
    halted: bool,
    focus: bool,
    hover: bool,
    message: String,
}

impl<I> Clip<I> {
    /// Create a hidden, halted clip at the stage origin with speed 1.
    pub fn new(name: impl Into<String>, boundary: Rect, z_index: i32) -> Self {
        Self {
            name: name.into(),
            z_index: ZIndex(z_index),
            animations: FxHashMap::default(),
            current_animation: None,
            current_frame: None,
            stop_frame: None,
            stop_callback: None,
            top: 0.0,
            left: 0.0,
            vx: 0.0,
            vy: 0.0,
            speed: 1.0,
            boundary,
            targets: SmallVec::new(),
            active: false,
            halted: true,
            focus: false,
            hover: false,
            message: String::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn z_index(&self) -> ZIndex {
        self.z_index
    }

    pub fn set_z_index(&mut self, z_index: i32) {
        self.z_index = ZIndex(z_index);
    }

    // --- playback flags ---

    pub fn show(&mut self) {
        self.active = true;
    }

    pub fn hide(&mut self) {
        self.active = false;
    }

    pub fn play(&mut self) {
        self.halted = false;
        self.active = true;
    }

    /// Freeze frame advancement. The clip keeps rendering.
    pub fn stop(&mut self) {
        self.halted = true;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn select(&mut self) {
        self.focus = true;
    }

    pub fn dis_select(&mut self) {
        self.focus = false;
    }

    pub fn has_focus(&self) -> bool {
        self.focus
    }

    pub fn set_hover(&mut self, hover: bool) {
        self.hover = hover;
    }

    pub fn is_hovered(&self) -> bool {
        self.hover
    }

    /// Overlay text drawn centered over the sprite. Empty means none.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    pub fn clear_message(&mut self) {
        self.message.clear();
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    // --- motion ---

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_pos(&mut self, top: f32, left: f32) {
        self.top = top;
        self.left = left;
    }

    pub fn top(&self) -> f32 {
        self.top
    }

    pub fn left(&self) -> f32 {
        self.left
    }

    pub fn set_velocity(&mut self, vx: f32, vy: f32) {
        self.vx = vx;
        self.vy = vy;
    }

    /// Per-tick velocity as `(vx, vy)`.
    pub fn velocity(&self) -> (f32, f32) {
        (self.vx, self.vy)
    }

    pub fn boundary(&self) -> Rect {
        self.boundary
    }

    pub fn set_boundary(&mut self, boundary: Rect) {
        self.boundary = boundary;
    }

    /// Push a waypoint. The most recently pushed target is sought first.
    pub fn push_target(&mut self, target: Target<I>) {
        self.targets.push(target);
    }

    /// Drop all pending targets without running their callbacks.
    pub fn clear_targets(&mut self) {
        self.targets.clear();
    }

    /// Pending targets, bottom of the stack first.
    pub fn targets(&self) -> &[Target<I>] {
        &self.targets
    }

    // --- animation selection ---

    pub fn current_animation(&self) -> Option<&str> {
        self.current_animation.as_deref()
    }

    pub fn current_frame(&self) -> Option<usize> {
        self.current_frame
    }

    pub fn stop_frame(&self) -> Option<usize> {
        self.stop_frame
    }

    /// Jump to `start`, play, and halt once frame `end` is reached.
    ///
    /// `on_stop` runs exactly once, on the tick the stop frame is hit.
    /// `start == end` stops on the very next advance.
    pub fn play_range(
        &mut self,
        start: usize,
        end: usize,
        on_stop: impl FnOnce(&mut Clip<I>) + Send + Sync + 'static,
    ) {
        self.active = true;
        self.halted = false;
        self.current_frame = Some(start);
        self.stop_frame = Some(end);
        self.stop_callback = Some(Box::new(on_stop));
    }

    /// Make `name` the active animation, starting at frame `start`.
    ///
    /// Leaves `active`/`halted` alone.
    pub fn switch_animation_clip(&mut self, name: &str, start: usize) -> Result<(), ClipError> {
        if !self.animations.contains_key(name) {
            return Err(ClipError::UnknownAnimationName(name.to_string()));
        }
        self.current_animation = Some(name.to_string());
        self.current_frame = Some(start);
        Ok(())
    }

    /// Register (or replace) the animation named after `sheet`, anchored at
    /// (`top`, `left`). Also resets the current frame to `start`, whether or
    /// not this is the active animation.
    pub fn set_animation_clip(
        &mut self,
        top: f32,
        left: f32,
        start: usize,
        sheet: Arc<SpriteSheet<I>>,
    ) {
        let name = sheet.name.clone();
        self.animations
            .insert(name, AnimationBinding::new(sheet, top, left));
        self.current_frame = Some(start);
    }

    pub fn animation(&self, name: &str) -> Option<&AnimationBinding<I>> {
        self.animations.get(name)
    }

    pub fn animation_names(&self) -> impl Iterator<Item = &str> {
        self.animations.keys().map(String::as_str)
    }

    pub fn current_binding(&self) -> Result<&AnimationBinding<I>, ClipError> {
        let name = self
            .current_animation
            .as_deref()
            .ok_or(ClipError::NoActiveAnimation)?;
        self.animations
            .get(name)
            .ok_or_else(|| ClipError::UnknownAnimationName(name.to_string()))
    }

    /// Source rect of the current frame in the active sheet.
    pub fn current_rect(&self) -> Result<Rect, ClipError> {
        let binding = self.current_binding()?;
        let frame = self.current_frame.ok_or(ClipError::NoActiveAnimation)?;
        binding
            .sheet
            .frame(frame)
            .copied()
            .ok_or_else(|| ClipError::FrameOutOfRange {
                animation: binding.sheet.name.clone(),
                frame,
                frame_count: binding.sheet.frame_count(),
            })
    }

    pub fn current_image(&self) -> Result<&I, ClipError> {
        Ok(&self.current_binding()?.sheet.image)
    }

    // --- geometry queries ---

    /// Stage-space bottom edge of the current frame, or 0 with nothing selected.
    pub fn bottom(&self) -> f32 {
        match self.current_rect() {
            Ok(rect) => self.top + rect.height(),
            Err(_) => 0.0,
        }
    }

    /// Ground point of the sprite used for depth sorting by callers:
    /// `(left + scale * w / 2, top + scale * w)`.
    ///
    /// `None` with nothing selected.
    pub fn z_center(&self, ratio: &Ratio) -> Option<(f32, f32)> {
        let rect = self.current_rect().ok()?;
        let w = rect.width();
        Some((self.left + ratio.scale * w / 2.0, self.top + ratio.scale * w))
    }

    /// Viewport position of the current frame's top-left corner as `(top, left)`.
    fn viewport_origin(&self, binding: &AnimationBinding<I>, ratio: &Ratio) -> (f32, f32) {
        ratio.to_viewport(
            self.top - binding.top_offset,
            self.left - binding.left_offset,
        )
    }

    /// Whether a viewport-space cursor is over the rendered sprite.
    ///
    /// The rendered box is shrunk by a quarter of its width on the left, right
    /// and top edges; the bottom edge is not shrunk.
    pub fn in_rect(&self, cursor_left: f32, cursor_top: f32, ratio: &Ratio) -> Result<bool, ClipError> {
        let binding = self.current_binding()?;
        let rect = self.current_rect()?;
        let (top, left) = self.viewport_origin(binding, ratio);
        let width = rect.width() * ratio.scale;
        let height = rect.height() * ratio.scale;
        let margin = width / 4.0;
        Ok(cursor_left > left + margin
            && cursor_left < left + width - margin
            && cursor_top > top + margin
            && cursor_top < top + height)
    }

    // --- per tick ---

    /// Render the current frame, plus the message overlay if one is set.
    ///
    /// A no-op for hidden clips and clips with nothing selected.
    pub fn draw<S>(&self, surface: &mut S, ratio: &Ratio) -> Result<(), ClipError>
    where
        S: DrawingSurface<Image = I>,
    {
        if !self.active || self.current_animation.is_none() || self.current_frame.is_none() {
            return Ok(());
        }
        let binding = self.current_binding()?;
        let rect = self.current_rect()?;
        let w = rect.width();
        let h = rect.height();
        let (top, left) = self.viewport_origin(binding, ratio);
        surface.draw_image(
            &binding.sheet.image,
            rect.region(),
            Region::new(left, top, w * ratio.scale, h * ratio.scale),
        );

        if !self.message.is_empty() {
            let msg_width = self.message.chars().count() as f32 * MESSAGE_CHAR_WIDTH + MESSAGE_PADDING;
            let left_off = w * (ratio.scale / 2.0) - msg_width / 2.0;
            surface.draw_text(
                &self.message,
                left + left_off + MESSAGE_PADDING,
                top + MESSAGE_TOP_OFFSET,
                msg_width,
            );
        }
        Ok(())
    }

    /// Advance one tick. See the module docs for the exact order of steps.
    ///
    /// Returns the event produced this tick, if any.
    pub fn inc_frame(&mut self) -> Result<Option<ClipEvent>, ClipError> {
        let Some(frame) = self.current_frame else {
            return Ok(None);
        };
        if self.current_animation.is_none() || self.halted {
            return Ok(None);
        }

        if self.stop_frame == Some(frame) {
            self.halted = true;
            self.stop_frame = None;
            trace!("clip {} stopped at frame {}", self.name, frame);
            if let Some(on_stop) = self.stop_callback.take() {
                on_stop(self);
            }
            return Ok(Some(ClipEvent::AnimationStopped { frame }));
        }

        let sheet = &self.current_binding()?.sheet;
        let frame_count = sheet.frame_count();
        if frame_count == 0 {
            return Err(ClipError::EmptySpriteSheet(sheet.name.clone()));
        }
        self.current_frame = Some((frame + 1) % frame_count);

        self.top += self.vy;
        self.left += self.vx;

        let event = self.update_speed()?;

        if self.targets.is_empty() {
            (self.top, self.left) = self.boundary.clamp(self.top, self.left);
        }
        Ok(event)
    }

    /// Re-aim velocity at the top target, popping it when close enough.
    fn update_speed(&mut self) -> Result<Option<ClipEvent>, ClipError> {
        let Some(target) = self.targets.last() else {
            return Ok(None);
        };
        let (target_top, target_left) = (target.top, target.left);
        let binding = self.current_binding()?;
        let rx = target_left - (self.left - binding.left_offset);
        let ry = target_top - (self.top - binding.top_offset);
        let dis = (rx * rx + ry * ry).sqrt();

        if dis < ARRIVAL_DISTANCE {
            let reached = self.targets.pop();
            if self.targets.is_empty() {
                trace!(
                    "clip {} arrived at ({}, {})",
                    self.name, target_top, target_left
                );
                if let Some(on_arrival) = reached.and_then(|t| t.on_arrival) {
                    on_arrival(self);
                }
                return Ok(Some(ClipEvent::ArrivedAtTarget {
                    top: target_top,
                    left: target_left,
                }));
            }
        } else {
            self.vx = rx * self.speed / dis;
            self.vy = ry * self.speed / dis;
        }
        Ok(None)
    }
}

impl<I> fmt::Debug for Clip<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clip")
            .field("name", &self.name)
            .field("z_index", &self.z_index)
            .field("current_animation", &self.current_animation)
            .field("current_frame", &self.current_frame)
            .field("stop_frame", &self.stop_frame)
            .field("top", &self.top)
            .field("left", &self.left)
            .field("vx", &self.vx)
            .field("vy", &self.vy)
            .field("speed", &self.speed)
            .field("targets", &self.targets.len())
            .field("active", &self.active)
            .field("halted", &self.halted)
            .field("focus", &self.focus)
            .field("hover", &self.hover)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}
