//! Iron and Steel: pulls and pushes along a metal line
//!
//! One implementation serves both metals; only the sign differs.
//!
//! - Anchored tiles cannot move, so the burner moves instead
//! - Loose items are moved toward (pull) or away from (push) the burner
//! - Mobiles are moved too, and every few seconds part of their value is
//!   torn loose as coins flying the same way

use bevy::math::Vec2;

use super::EffectContext;
use crate::allomancy::constants::EJECT_SPEED;
use crate::allomancy::cooldowns::CooldownTracker;
use crate::allomancy::events::{CosmeticEvent, ObjectImpulse, ObjectRef, SpawnRequest, TickEffects};
use crate::allomancy::metal_config::MetalConfig;
use crate::allomancy::targeting::select_metal_target;
use crate::allomancy::world::{ItemKind, TargetCandidate, WorldObjectId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineDirection {
    /// Toward the burner
    Pull,
    /// Away from the burner
    Push,
}

#[derive(Clone, Debug)]
pub struct LineEffect {
    pub direction: LineDirection,
    pub radius: f32,
    pub base_force: f32,
    pub extract_cooldown_ticks: u32,
    pub extract_fraction: f32,
    pub extract_cap: u32,
    pub coin_item: ItemKind,
    pub cooldowns: CooldownTracker,
}

impl LineEffect {
    pub fn new(direction: LineDirection, config: &MetalConfig, coin_item: ItemKind) -> Self {
        Self {
            direction,
            radius: config.radius,
            base_force: config.base_force,
            extract_cooldown_ticks: config.cooldown_ticks,
            extract_fraction: config.extract_fraction,
            extract_cap: config.extract_cap,
            coin_item,
            cooldowns: CooldownTracker::new(),
        }
    }

    pub fn on_tick(&mut self, ctx: &EffectContext, out: &mut TickEffects) {
        let Some(target) = select_metal_target(
            ctx.world,
            ctx.position,
            ctx.aim_point,
            self.radius,
            ctx.agent_id,
        ) else {
            return;
        };

        // Burner -> target. A target sitting exactly on the burner has no
        // direction to push or pull along.
        let Some(outward) = (target.position() - ctx.position).try_normalize() else {
            return;
        };

        out.cosmetics.push(CosmeticEvent::MetalLine {
            metal: ctx.metal,
            from: ctx.position,
            to: target.position(),
        });

        // Direction the target would travel
        let travel = match self.direction {
            LineDirection::Pull => -outward,
            LineDirection::Push => outward,
        };
        let force = self.base_force * ctx.magnitude();

        match target {
            TargetCandidate::Cell { cell, .. } => {
                out.agent_velocity -= travel * force;
                out.anchors.push(cell);
            }
            TargetCandidate::Item { id, .. } => {
                out.impulses.push(ObjectImpulse {
                    target: ObjectRef::Item(id),
                    delta: travel * force,
                });
            }
            TargetCandidate::Mobile { id, position, .. } => {
                out.impulses.push(ObjectImpulse {
                    target: ObjectRef::Mobile(id),
                    delta: travel * force,
                });
                self.extract_value(ctx, id, position, travel, out);
            }
        }
    }

    /// Tear part of a mobile's value loose, at most once per cooldown.
    fn extract_value(
        &mut self,
        ctx: &EffectContext,
        id: WorldObjectId,
        position: Vec2,
        travel: Vec2,
        out: &mut TickEffects,
    ) {
        if !self.cooldowns.try_consume(id) {
            return;
        }

        let value = ctx
            .world
            .mobiles()
            .iter()
            .find(|mobile| mobile.id == id)
            .map_or(0, |mobile| mobile.value);
        let count = ((value as f32 * self.extract_fraction).floor() as u32).min(self.extract_cap);

        if count > 0 {
            out.spawns.push(SpawnRequest {
                kind: self.coin_item,
                count,
                position,
                velocity: travel * EJECT_SPEED * ctx.magnitude(),
                source: id,
            });
        }
        self.cooldowns.set(id, self.extract_cooldown_ticks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allomancy::metal_config::{BurnKind, EffectKind};
    use crate::allomancy::metals::Metal;
    use crate::allomancy::reserves::MetalReserves;
    use crate::allomancy::world::{MaterialTable, MobileEntity, OwnableItem, TileMap, WorldSnapshot};
    use bevy::math::IVec2;

    fn config() -> MetalConfig {
        MetalConfig {
            name: "Steel".to_string(),
            burn: BurnKind::Held,
            effect: EffectKind::Push,
            radius: 400.0,
            base_force: 1.0,
            cooldown_ticks: 180,
            extract_fraction: 0.1,
            extract_cap: 50,
            status_ticks: 0,
        }
    }

    fn materials() -> MaterialTable {
        let mut table = MaterialTable::default();
        table.metallic_items.insert(1);
        table.metallic_tiles.insert(9);
        table
    }

    fn ctx<'a>(world: &'a WorldSnapshot<'a>, reserves: &'a MetalReserves, flaring: bool) -> EffectContext<'a> {
        EffectContext {
            metal: Metal::Steel,
            agent_id: Some(0),
            position: Vec2::ZERO,
            aim_point: Vec2::new(100.0, 0.0),
            flaring,
            reserves,
            world,
        }
    }

    #[test]
    fn test_push_item_away() {
        let tiles = TileMap::new(16.0);
        let materials = materials();
        let mut world = WorldSnapshot::new(&tiles, &materials);
        world.items.push(OwnableItem { id: 5, position: Vec2::new(100.0, 0.0), kind: 1 });
        let reserves = MetalReserves::default();

        let mut push = LineEffect::new(LineDirection::Push, &config(), 71);
        let mut out = TickEffects::default();
        push.on_tick(&ctx(&world, &reserves, false), &mut out);

        assert_eq!(out.impulses.len(), 1);
        assert_eq!(out.impulses[0].target, ObjectRef::Item(5));
        assert_eq!(out.impulses[0].delta, Vec2::new(1.0, 0.0));
        assert_eq!(out.agent_velocity, Vec2::ZERO);
    }

    #[test]
    fn test_pull_on_tile_moves_burner_and_anchors() {
        let mut tiles = TileMap::new(16.0);
        tiles.insert(IVec2::new(6, -1), 9); // center (104, -8)
        let materials = materials();
        let world = WorldSnapshot::new(&tiles, &materials);
        let reserves = MetalReserves::default();

        let mut pull = LineEffect::new(LineDirection::Pull, &config(), 71);
        let mut out = TickEffects::default();
        pull.on_tick(&ctx(&world, &reserves, true), &mut out);

        assert_eq!(out.anchors.as_slice(), &[IVec2::new(6, -1)]);
        assert!(out.agent_velocity.x > 0.0, "pull should draw the burner toward the tile");
        assert!((out.agent_velocity.length() - 2.0).abs() < 1e-5, "flaring doubles the force");
    }

    #[test]
    fn test_mobile_extraction_respects_cooldown() {
        let tiles = TileMap::new(16.0);
        let materials = materials();
        let mut world = WorldSnapshot::new(&tiles, &materials);
        world.mobiles.push(MobileEntity {
            id: 8,
            position: Vec2::new(50.0, 0.0),
            armor: Some(1),
            value: 1000,
            burning: false,
            concealed: false,
        });
        let reserves = MetalReserves::default();

        let mut push = LineEffect::new(LineDirection::Push, &config(), 71);
        let mut first = TickEffects::default();
        push.on_tick(&ctx(&world, &reserves, false), &mut first);
        assert_eq!(first.spawns.len(), 1);
        assert_eq!(first.spawns[0].count, 50); // 10% of 1000 capped at 50
        assert_eq!(first.spawns[0].kind, 71);
        assert!(first.spawns[0].velocity.x > 0.0);

        let mut second = TickEffects::default();
        push.on_tick(&ctx(&world, &reserves, false), &mut second);
        assert!(second.spawns.is_empty());
        assert_eq!(second.impulses.len(), 1, "the push itself is not throttled");
        assert_eq!(push.cooldowns.remaining(8), Some(180));
    }

    #[test]
    fn test_target_on_burner_does_nothing() {
        let tiles = TileMap::new(16.0);
        let materials = materials();
        let mut world = WorldSnapshot::new(&tiles, &materials);
        world.items.push(OwnableItem { id: 5, position: Vec2::ZERO, kind: 1 });
        let reserves = MetalReserves::default();

        let mut pull = LineEffect::new(LineDirection::Pull, &config(), 71);
        let mut out = TickEffects::default();
        pull.on_tick(&ctx(&world, &reserves, false), &mut out);
        assert!(out.is_empty());
    }
}
