//! The stage: clip registry and per-tick driver.
//!
//! A [`Stage`] owns every clip registered on it. Clips live as entities in a
//! private ECS [`World`] (a [`Clip`] component plus a [`DrawSequence`]) and are
//! looked up by name through an index. The stage-to-viewport [`Ratio`] and the
//! logical [`StageSize`] are world resources.
//!
//! # Tick
//!
//! [`Stage::draw`] is the whole frame:
//!
//! 1. clear the surface
//! 2. stable-sort clips by z-index, ascending
//! 3. for each clip: render it, advance it, then dispatch the event it
//!    produced (if any) to the handler registered under its name
//!
//! Everything runs synchronously on the caller's thread, once per frame.

use bevy_ecs::prelude::*;
use log::{debug, trace, warn};
use rustc_hash::FxHashMap;

use crate::components::clip::Clip;
use crate::components::zindex::{DrawSequence, ZIndex};
use crate::events::clip::ClipEvent;
use crate::resources::ratio::Ratio;
use crate::resources::stageconfig::{StageConfig, StageSize};
use crate::surface::DrawingSurface;

/// Handler invoked with the clip an event came from.
pub type EventHandler<I> = Box<dyn FnMut(&mut Clip<I>, &ClipEvent) + Send + Sync>;

pub struct Stage<I: Send + Sync + 'static> {
    world: World,
    names: FxHashMap<String, Entity>,
    handlers: FxHashMap<String, EventHandler<I>>,
    next_sequence: u64,
    ticks: u64,
}

impl<I: Send + Sync + 'static> Stage<I> {
    /// Create an empty stage with the given logical size and a degenerate ratio.
    pub fn new(stage_width: f32, stage_height: f32) -> Self {
        let mut world = World::new();
        world.insert_resource(StageSize {
            width: stage_width,
            height: stage_height,
        });
        world.insert_resource(Ratio::default());
        Self {
            world,
            names: FxHashMap::default(),
            handlers: FxHashMap::default(),
            next_sequence: 0,
            ticks: 0,
        }
    }

    /// Create a stage sized from `config` and fitted to its viewport.
    pub fn from_config(config: &StageConfig) -> Self {
        let size = config.stage_size();
        let mut stage = Self::new(size.width, size.height);
        let (w, h) = config.viewport_size();
        stage.fit_viewport(w, h);
        stage
    }

    pub fn size(&self) -> StageSize {
        *self.world.resource::<StageSize>()
    }

    /// Number of completed [`Stage::draw`] calls.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    // --- ratio ---

    /// Letterbox fit of this stage into an `eff_w` x `eff_h` viewport.
    ///
    /// Does not change the stored ratio; see [`Stage::set_ratio`].
    pub fn rect_ratio(&self, eff_w: f32, eff_h: f32) -> Ratio {
        let size = self.size();
        Ratio::fit(size.width, size.height, eff_w, eff_h)
    }

    pub fn set_ratio(&mut self, ratio: Ratio) {
        self.world.insert_resource(ratio);
    }

    pub fn ratio(&self) -> Ratio {
        *self.world.resource::<Ratio>()
    }

    /// Compute and store the ratio for a new viewport size.
    pub fn fit_viewport(&mut self, eff_w: f32, eff_h: f32) -> Ratio {
        let ratio = self.rect_ratio(eff_w, eff_h);
        debug!(
            "viewport {}x{}: scale={} top={} left={}",
            eff_w, eff_h, ratio.scale, ratio.top, ratio.left
        );
        self.set_ratio(ratio);
        ratio
    }

    // --- registry ---

    /// Register a clip under its name.
    ///
    /// A clip already registered under that name is replaced and returned. The
    /// replacement keeps the old clip's position in the tie-break order.
    pub fn add_clip(&mut self, clip: Clip<I>) -> Option<Clip<I>> {
        let name = clip.name().to_string();
        if let Some(&entity) = self.names.get(&name) {
            debug!("replacing clip {}", name);
            let mut slot = self.world.get_mut::<Clip<I>>(entity)?;
            return Some(std::mem::replace(&mut *slot, clip));
        }
        let sequence = DrawSequence(self.next_sequence);
        self.next_sequence += 1;
        let entity = self.world.spawn((clip, sequence)).id();
        debug!("added clip {} ({:?})", name, entity);
        self.names.insert(name, entity);
        None
    }

    /// Unregister a clip, handing it back to the caller.
    pub fn remove_clip(&mut self, name: &str) -> Option<Clip<I>> {
        let entity = self.names.remove(name)?;
        let clip = self.world.entity_mut(entity).take::<Clip<I>>();
        self.world.despawn(entity);
        debug!("removed clip {}", name);
        clip
    }

    pub fn clip(&self, name: &str) -> Option<&Clip<I>> {
        let entity = *self.names.get(name)?;
        self.world.get::<Clip<I>>(entity)
    }

    pub fn clip_mut(&mut self, name: &str) -> Option<Mut<'_, Clip<I>>> {
        let entity = *self.names.get(name)?;
        self.world.get_mut::<Clip<I>>(entity)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Clip names in draw order (z-index ascending, then insertion order).
    pub fn clip_names(&mut self) -> Vec<String> {
        self.draw_order()
            .into_iter()
            .filter_map(|entity| self.world.get::<Clip<I>>(entity))
            .map(|clip| clip.name().to_string())
            .collect()
    }

    fn draw_order(&mut self) -> Vec<Entity> {
        let mut order: Vec<(ZIndex, DrawSequence, Entity)> = {
            let mut q = self.world.query::<(Entity, &Clip<I>, &DrawSequence)>();
            q.iter(&self.world)
                .map(|(entity, clip, seq)| (clip.z_index(), *seq, entity))
                .collect()
        };
        order.sort_by_key(|(z, seq, _)| (*z, *seq));
        order.into_iter().map(|(_, _, entity)| entity).collect()
    }

    // --- events ---

    /// Set the single event handler for `clip_name`, replacing any previous one.
    pub fn register_event_handler(
        &mut self,
        clip_name: impl Into<String>,
        handler: impl FnMut(&mut Clip<I>, &ClipEvent) + Send + Sync + 'static,
    ) {
        self.handlers.insert(clip_name.into(), Box::new(handler));
    }

    pub fn unregister_event_handler(&mut self, clip_name: &str) {
        self.handlers.remove(clip_name);
    }

    /// Invoke the handler registered for `clip_name` with that clip.
    ///
    /// Returns false when there is no handler or no such clip.
    pub fn emit_event(&mut self, clip_name: &str, event: &ClipEvent) -> bool {
        let Some(handler) = self.handlers.get_mut(clip_name) else {
            return false;
        };
        let Some(&entity) = self.names.get(clip_name) else {
            return false;
        };
        let Some(mut clip) = self.world.get_mut::<Clip<I>>(entity) else {
            return false;
        };
        debug!("dispatching {} to {}", event.kind(), clip_name);
        handler(&mut *clip, event);
        true
    }

    // --- per tick ---

    /// Render and advance every clip once. See the module docs.
    ///
    /// A clip that fails to render or advance is logged and skipped; the rest
    /// of the frame still runs.
    pub fn draw<S>(&mut self, surface: &mut S)
    where
        S: DrawingSurface<Image = I>,
    {
        surface.clear();
        let ratio = self.ratio();
        trace!("tick {} ({} clips)", self.ticks, self.names.len());

        for entity in self.draw_order() {
            let fired = {
                let Some(mut clip) = self.world.get_mut::<Clip<I>>(entity) else {
                    continue;
                };
                if let Err(e) = clip.draw(surface, &ratio) {
                    warn!("clip {}: skipped draw: {}", clip.name(), e);
                }
                match clip.inc_frame() {
                    Ok(Some(event)) => Some((clip.name().to_string(), event)),
                    Ok(None) => None,
                    Err(e) => {
                        warn!("clip {}: skipped advance: {}", clip.name(), e);
                        None
                    }
                }
            };
            if let Some((name, event)) = fired {
                self.emit_event(&name, &event);
            }
        }
        self.ticks += 1;
    }

    /// Top-most visible clip under a viewport-space cursor.
    pub fn clip_at(&mut self, cursor_left: f32, cursor_top: f32) -> Option<String> {
        let ratio = self.ratio();
        self.draw_order()
            .into_iter()
            .rev()
            .filter_map(|entity| self.world.get::<Clip<I>>(entity))
            .find(|clip| {
                clip.is_active() && clip.in_rect(cursor_left, cursor_top, &ratio).unwrap_or(false)
            })
            .map(|clip| clip.name().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::rect::Rect;
    use crate::components::spritesheet::SpriteSheet;
    use crate::surface::RecordingSurface;
    use std::sync::{Arc, Mutex};

    fn clip(name: &'static str, z: i32) -> Clip<&'static str> {
        let mut clip = Clip::new(name, Rect::new(0.0, 0.0, 800.0, 600.0), z);
        let sheet = Arc::new(SpriteSheet::from_strip(name, name, 10.0, 10.0, 3));
        clip.set_animation_clip(0.0, 0.0, 0, sheet);
        clip.switch_animation_clip(name, 0).unwrap();
        clip.play();
        clip
    }

    #[test]
    fn test_new_stage_has_degenerate_ratio() {
        let stage: Stage<&str> = Stage::new(800.0, 600.0);
        assert_eq!(stage.ratio(), Ratio::default());
        assert!(stage.is_empty());
    }

    #[test]
    fn test_rect_ratio_does_not_store() {
        let stage: Stage<&str> = Stage::new(800.0, 600.0);
        let r = stage.rect_ratio(1600.0, 900.0);
        assert!((r.scale - 2.0).abs() < f32::EPSILON);
        assert_eq!(stage.ratio(), Ratio::default());
    }

    #[test]
    fn test_fit_viewport_stores() {
        let mut stage: Stage<&str> = Stage::new(800.0, 600.0);
        stage.fit_viewport(1600.0, 900.0);
        assert_eq!(stage.ratio(), Ratio::new(2.0, -150.0, 0.0));
    }

    #[test]
    fn test_from_config() {
        let mut config = StageConfig::new();
        config.viewport_width = 400;
        config.viewport_height = 300;
        let stage: Stage<&str> = Stage::from_config(&config);
        assert_eq!(stage.size(), StageSize { width: 800.0, height: 600.0 });
        assert_eq!(stage.ratio(), Ratio::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn test_add_get_remove() {
        let mut stage = Stage::new(800.0, 600.0);
        assert!(stage.add_clip(clip("a", 0)).is_none());
        assert!(stage.contains("a"));
        assert_eq!(stage.clip("a").unwrap().name(), "a");

        stage.clip_mut("a").unwrap().set_pos(5.0, 6.0);
        assert!((stage.clip("a").unwrap().left() - 6.0).abs() < f32::EPSILON);

        let removed = stage.remove_clip("a").unwrap();
        assert_eq!(removed.name(), "a");
        assert!(stage.clip("a").is_none());
        assert!(stage.remove_clip("a").is_none());
        assert!(stage.is_empty());
    }

    #[test]
    fn test_add_same_name_replaces() {
        let mut stage = Stage::new(800.0, 600.0);
        stage.add_clip(clip("a", 0));
        stage.add_clip(clip("b", 0));
        let old = stage.add_clip(clip("a", 0)).unwrap();
        assert_eq!(old.name(), "a");
        assert_eq!(stage.len(), 2);
        // "a" keeps its original slot ahead of "b"
        assert_eq!(stage.clip_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_clip_names_sorted_by_z_then_insertion() {
        let mut stage = Stage::new(800.0, 600.0);
        stage.add_clip(clip("top", 5));
        stage.add_clip(clip("first", 1));
        stage.add_clip(clip("second", 1));
        stage.add_clip(clip("bottom", -3));
        assert_eq!(stage.clip_names(), vec!["bottom", "first", "second", "top"]);
    }

    #[test]
    fn test_emit_event_without_handler() {
        let mut stage = Stage::new(800.0, 600.0);
        stage.add_clip(clip("a", 0));
        assert!(!stage.emit_event("a", &ClipEvent::AnimationStopped { frame: 0 }));
    }

    #[test]
    fn test_register_handler_overwrites() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut stage = Stage::new(800.0, 600.0);
        stage.add_clip(clip("a", 0));

        let s1 = seen.clone();
        stage.register_event_handler("a", move |_, _| s1.lock().unwrap().push("first"));
        let s2 = seen.clone();
        stage.register_event_handler("a", move |c, _| {
            c.set_message("got it");
            s2.lock().unwrap().push("second");
        });

        assert!(stage.emit_event("a", &ClipEvent::AnimationStopped { frame: 1 }));
        assert_eq!(*seen.lock().unwrap(), vec!["second"]);
        assert_eq!(stage.clip("a").unwrap().message(), "got it");
    }

    #[test]
    fn test_draw_clears_then_draws_in_z_order() {
        let mut stage = Stage::new(800.0, 600.0);
        stage.fit_viewport(800.0, 600.0);
        stage.add_clip(clip("two", 2));
        stage.add_clip(clip("zero", 0));
        stage.add_clip(clip("one", 1));

        let mut surface = RecordingSurface::new();
        stage.draw(&mut surface);

        assert_eq!(surface.commands[0], crate::surface::DrawCommand::Clear);
        assert_eq!(surface.images(), vec![&"zero", &"one", &"two"]);
        assert_eq!(stage.ticks(), 1);
        for name in ["zero", "one", "two"] {
            assert_eq!(stage.clip(name).unwrap().current_frame(), Some(1));
        }
    }

    #[test]
    fn test_clip_at_prefers_top_most() {
        let mut stage = Stage::new(800.0, 600.0);
        stage.fit_viewport(800.0, 600.0);
        stage.add_clip(clip("under", 0));
        stage.add_clip(clip("over", 1));
        assert_eq!(stage.clip_at(5.0, 5.0), Some("over".to_string()));

        stage.clip_mut("over").unwrap().hide();
        assert_eq!(stage.clip_at(5.0, 5.0), Some("under".to_string()));
        assert_eq!(stage.clip_at(500.0, 500.0), None);
    }
}
