//! Metal effects
//!
//! Each metal binds to one effect when an agent is created. The binding is a
//! plain table indexed by metal, so dispatch is a `match`, never a lookup.
//!
//! - `lines`: Iron/Steel push and pull along a line to a selected target
//! - `aura`: glow-only metals whose consequences are read from burn state
//! - `detect`: Bronze sensing of other burners
//! - `emotion`: Zinc/Brass statuses on those nearby
//! - `strip`: Chromium stripping, undone on deactivation

pub mod aura;
pub mod detect;
pub mod emotion;
pub mod lines;
pub mod strip;

use bevy::math::Vec2;

use super::constants::FLARE_MULTIPLIER;
use super::cooldowns::CooldownTracker;
use super::events::TickEffects;
use super::metal_config::{BurnKind, EffectKind, MetalDefinitions};
use super::metals::Metal;
use super::reserves::MetalReserves;
use super::world::{MobileEntity, WorldObjectId, WorldView};

pub use aura::AuraEffect;
pub use detect::DetectEffect;
pub use emotion::EmotionEffect;
pub use lines::{LineDirection, LineEffect};
pub use strip::StripEffect;

/// Everything an effect may read during one tick.
pub struct EffectContext<'a> {
    pub metal: Metal,
    /// The burner's own world id, so it never targets itself
    pub agent_id: Option<WorldObjectId>,
    pub position: Vec2,
    pub aim_point: Vec2,
    pub flaring: bool,
    pub reserves: &'a MetalReserves,
    pub world: &'a dyn WorldView,
}

impl EffectContext<'_> {
    /// Effect multiplier: doubled while flaring.
    pub fn magnitude(&self) -> f32 {
        if self.flaring {
            FLARE_MULTIPLIER as f32
        } else {
            1.0
        }
    }

    /// Mobiles other than the burner strictly within `radius`.
    pub fn mobiles_within(&self, radius: f32) -> impl Iterator<Item = &MobileEntity> + '_ {
        let radius_sq = radius * radius;
        let origin = self.position;
        let agent_id = self.agent_id;
        self.world.mobiles().iter().filter(move |mobile| {
            Some(mobile.id) != agent_id && mobile.position.distance_squared(origin) < radius_sq
        })
    }
}

/// The effect bound to one metal.
#[derive(Clone, Debug)]
pub enum MetalEffect {
    Line(LineEffect),
    Aura(AuraEffect),
    Detect(DetectEffect),
    Emotion(EmotionEffect),
    Strip(StripEffect),
}

impl MetalEffect {
    pub fn new(metal: Metal, definitions: &MetalDefinitions) -> Self {
        let config = definitions.get(metal);
        match config.effect {
            EffectKind::Pull => {
                MetalEffect::Line(LineEffect::new(LineDirection::Pull, config, definitions.coin_item()))
            }
            EffectKind::Push => {
                MetalEffect::Line(LineEffect::new(LineDirection::Push, config, definitions.coin_item()))
            }
            EffectKind::Aura => MetalEffect::Aura(AuraEffect),
            EffectKind::Detect => MetalEffect::Detect(DetectEffect::new(config)),
            EffectKind::Emotion(status) => MetalEffect::Emotion(EmotionEffect::new(status, config)),
            EffectKind::Strip => MetalEffect::Strip(StripEffect::new(config)),
        }
    }

    /// Run one tick of the effect while its metal is burning.
    pub fn on_tick(&mut self, ctx: &EffectContext, out: &mut TickEffects) {
        match self {
            MetalEffect::Line(effect) => effect.on_tick(ctx, out),
            MetalEffect::Aura(effect) => effect.on_tick(ctx, out),
            MetalEffect::Detect(effect) => effect.on_tick(ctx, out),
            MetalEffect::Emotion(effect) => effect.on_tick(ctx, out),
            MetalEffect::Strip(effect) => effect.on_tick(ctx, out),
        }
    }

    /// Undo any state held across ticks when the metal stops burning.
    pub fn on_deactivate(&mut self, out: &mut TickEffects) {
        if let MetalEffect::Strip(effect) = self {
            effect.on_deactivate(out);
        }
    }

    pub fn cooldowns(&self) -> Option<&CooldownTracker> {
        match self {
            MetalEffect::Line(effect) => Some(&effect.cooldowns),
            MetalEffect::Aura(_) => None,
            MetalEffect::Detect(effect) => Some(&effect.cooldowns),
            MetalEffect::Emotion(effect) => Some(&effect.cooldowns),
            MetalEffect::Strip(effect) => Some(&effect.cooldowns),
        }
    }

    fn cooldowns_mut(&mut self) -> Option<&mut CooldownTracker> {
        match self {
            MetalEffect::Line(effect) => Some(&mut effect.cooldowns),
            MetalEffect::Aura(_) => None,
            MetalEffect::Detect(effect) => Some(&mut effect.cooldowns),
            MetalEffect::Emotion(effect) => Some(&mut effect.cooldowns),
            MetalEffect::Strip(effect) => Some(&mut effect.cooldowns),
        }
    }

    /// Count this effect's cooldowns down one tick.
    pub fn tick_cooldowns(&mut self) {
        if let Some(cooldowns) = self.cooldowns_mut() {
            cooldowns.tick();
        }
    }
}

/// Per-agent binding of every metal to its burn kind and effect.
#[derive(Clone, Debug)]
pub struct EffectTable {
    kinds: [BurnKind; Metal::COUNT],
    effects: [MetalEffect; Metal::COUNT],
}

impl EffectTable {
    pub fn new(definitions: &MetalDefinitions) -> Self {
        Self {
            kinds: Metal::ALL.map(|metal| definitions.get(metal).burn),
            effects: Metal::ALL.map(|metal| MetalEffect::new(metal, definitions)),
        }
    }

    pub fn burn_kind(&self, metal: Metal) -> BurnKind {
        self.kinds[metal.index()]
    }

    pub fn effect(&self, metal: Metal) -> &MetalEffect {
        &self.effects[metal.index()]
    }

    pub fn effect_mut(&mut self, metal: Metal) -> &mut MetalEffect {
        &mut self.effects[metal.index()]
    }

    /// Count every effect's cooldowns down exactly once.
    pub fn tick_cooldowns(&mut self) {
        for effect in &mut self.effects {
            effect.tick_cooldowns();
        }
    }
}
