//! Zinc and Brass: rioting and soothing
//!
//! Imposes the configured status on every mobile in range, renewed no more
//! often than the cooldown allows.

use super::EffectContext;
use crate::allomancy::cooldowns::CooldownTracker;
use crate::allomancy::events::{Status, StatusApplication, TickEffects};
use crate::allomancy::metal_config::MetalConfig;

#[derive(Clone, Debug)]
pub struct EmotionEffect {
    pub status: Status,
    pub radius: f32,
    pub status_ticks: u32,
    pub cooldown_ticks: u32,
    pub cooldowns: CooldownTracker,
}

impl EmotionEffect {
    pub fn new(status: Status, config: &MetalConfig) -> Self {
        Self {
            status,
            radius: config.radius,
            status_ticks: config.status_ticks,
            cooldown_ticks: config.cooldown_ticks,
            cooldowns: CooldownTracker::new(),
        }
    }

    pub fn on_tick(&mut self, ctx: &EffectContext, out: &mut TickEffects) {
        let ticks = (self.status_ticks as f32 * ctx.magnitude()) as u32;
        for mobile in ctx.mobiles_within(self.radius) {
            if !self.cooldowns.try_consume(mobile.id) {
                continue;
            }
            out.statuses.push(StatusApplication {
                target: mobile.id,
                status: self.status,
                ticks,
            });
            self.cooldowns.set(mobile.id, self.cooldown_ticks);
        }
    }
}
