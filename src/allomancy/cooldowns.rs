//! Per-object cooldowns
//!
//! Keeps an effect from repeating a one-shot side effect on the same world
//! object every tick. Each effect owns its own tracker, so nothing leaks
//! between agents.

use std::collections::HashMap;

use super::world::WorldObjectId;

/// Ticks remaining before each world object can be affected again.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CooldownTracker {
    remaining: HashMap<WorldObjectId, u32>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every cooldown down by one tick and drop the expired ones.
    /// Call exactly once per simulation tick.
    pub fn tick(&mut self) {
        self.remaining.retain(|_, ticks| {
            *ticks = ticks.saturating_sub(1);
            *ticks > 0
        });
    }

    /// True when `id` has no cooldown running. The map is not touched; call
    /// [`CooldownTracker::set`] after performing the side effect.
    pub fn try_consume(&self, id: WorldObjectId) -> bool {
        !self.remaining.contains_key(&id)
    }

    /// Start (or restart) the cooldown for `id`. A zero duration clears it.
    pub fn set(&mut self, id: WorldObjectId, duration: u32) {
        if duration == 0 {
            self.remaining.remove(&id);
        } else {
            self.remaining.insert(id, duration);
        }
    }

    pub fn remaining(&self, id: WorldObjectId) -> Option<u32> {
        self.remaining.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    pub fn clear(&mut self) {
        self.remaining.clear();
    }
}
