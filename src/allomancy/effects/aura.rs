//! Tin, Pewter and Copper
//!
//! These metals change nothing in the world directly. Hosts ask the burner
//! whether the metal is burning (sharper senses, stronger body, hidden
//! pulses); the effect only requests the glow.

use super::EffectContext;
use crate::allomancy::events::{CosmeticEvent, TickEffects};

#[derive(Clone, Copy, Debug, Default)]
pub struct AuraEffect;

impl AuraEffect {
    pub fn on_tick(&mut self, ctx: &EffectContext, out: &mut TickEffects) {
        out.cosmetics.push(CosmeticEvent::Aura {
            metal: ctx.metal,
            at: ctx.position,
            strength: ctx.reserves.percentage(ctx.metal),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allomancy::metals::Metal;
    use crate::allomancy::reserves::MetalReserves;
    use crate::allomancy::world::{MaterialTable, TileMap, WorldSnapshot};
    use bevy::math::Vec2;

    #[test]
    fn test_aura_strength_follows_reserve() {
        let tiles = TileMap::default();
        let materials = MaterialTable::default();
        let world = WorldSnapshot::new(&tiles, &materials);
        let mut reserves = MetalReserves::default();
        reserves.add(Metal::Pewter, 1800, &|_: Metal| true).unwrap();

        let ctx = EffectContext {
            metal: Metal::Pewter,
            agent_id: None,
            position: Vec2::new(3.0, 4.0),
            aim_point: Vec2::ZERO,
            flaring: false,
            reserves: &reserves,
            world: &world,
        };
        let mut out = TickEffects::default();
        AuraEffect.on_tick(&ctx, &mut out);

        assert_eq!(
            out.cosmetics,
            vec![CosmeticEvent::Aura { metal: Metal::Pewter, at: Vec2::new(3.0, 4.0), strength: 0.5 }]
        );
    }
}
