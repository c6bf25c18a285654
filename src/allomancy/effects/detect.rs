//! Bronze: sensing other burners
//!
//! Every burner in range that is not hiding behind Copper gives off a
//! pulse. Each source is reported at most once per cooldown so the pulse
//! reads as a beat rather than a constant glow.

use super::EffectContext;
use crate::allomancy::cooldowns::CooldownTracker;
use crate::allomancy::events::{CosmeticEvent, TickEffects};
use crate::allomancy::metal_config::MetalConfig;

#[derive(Clone, Debug)]
pub struct DetectEffect {
    pub radius: f32,
    pub pulse_interval: u32,
    pub cooldowns: CooldownTracker,
}

impl DetectEffect {
    pub fn new(config: &MetalConfig) -> Self {
        Self {
            radius: config.radius,
            pulse_interval: config.cooldown_ticks,
            cooldowns: CooldownTracker::new(),
        }
    }

    pub fn on_tick(&mut self, ctx: &EffectContext, out: &mut TickEffects) {
        for mobile in ctx.mobiles_within(self.radius) {
            if !mobile.burning || mobile.concealed {
                continue;
            }
            if !self.cooldowns.try_consume(mobile.id) {
                continue;
            }
            out.cosmetics.push(CosmeticEvent::Pulse {
                source: mobile.id,
                at: mobile.position,
            });
            self.cooldowns.set(mobile.id, self.pulse_interval);
        }
    }
}
