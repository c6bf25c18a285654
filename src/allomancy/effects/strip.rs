//! Chromium: stripping those nearby
//!
//! Stripped mobiles stay stripped for as long as the burn lasts. The effect
//! remembers whom it stripped and lifts the status from all of them when
//! the burner stops.

use std::collections::BTreeSet;

use super::EffectContext;
use crate::allomancy::cooldowns::CooldownTracker;
use crate::allomancy::events::{Status, StatusApplication, StatusRemoval, TickEffects};
use crate::allomancy::metal_config::MetalConfig;
use crate::allomancy::world::WorldObjectId;

#[derive(Clone, Debug)]
pub struct StripEffect {
    pub radius: f32,
    pub status_ticks: u32,
    pub cooldown_ticks: u32,
    pub cooldowns: CooldownTracker,
    stripped: BTreeSet<WorldObjectId>,
}

impl StripEffect {
    pub fn new(config: &MetalConfig) -> Self {
        Self {
            radius: config.radius,
            status_ticks: config.status_ticks,
            cooldown_ticks: config.cooldown_ticks,
            cooldowns: CooldownTracker::new(),
            stripped: BTreeSet::new(),
        }
    }

    /// Ids currently held stripped by this burner, in id order.
    pub fn stripped(&self) -> impl Iterator<Item = WorldObjectId> + '_ {
        self.stripped.iter().copied()
    }

    pub fn on_tick(&mut self, ctx: &EffectContext, out: &mut TickEffects) {
        for mobile in ctx.mobiles_within(self.radius) {
            if !self.cooldowns.try_consume(mobile.id) {
                continue;
            }
            out.statuses.push(StatusApplication {
                target: mobile.id,
                status: Status::Stripped,
                ticks: self.status_ticks,
            });
            self.stripped.insert(mobile.id);
            self.cooldowns.set(mobile.id, self.cooldown_ticks);
        }
    }

    pub fn on_deactivate(&mut self, out: &mut TickEffects) {
        for target in std::mem::take(&mut self.stripped) {
            out.status_removals.push(StatusRemoval {
                target,
                status: Status::Stripped,
            });
        }
    }
}
