//! Burn state machine
//!
//! Owns an agent's reserves and decides, once per tick, which metals are
//! burning, whether the agent is flaring, and which effects run.
//!
//! ## Tick order
//!
//! 1. Effect cooldowns count down
//! 2. Toggle metals react to presses (lit only with eligibility and reserve)
//! 3. Held metals follow the input, gated on eligibility and reserve
//! 4. The flare toggle is applied (refused while nothing burns)
//! 5. Every burning metal consumes reserve; depleted metals go out
//! 6. Flaring ends if nothing is left burning
//! 7. Every metal still burning runs its effect once

use bevy::prelude::*;

use super::effects::{EffectContext, EffectTable};
use super::error::BurnError;
use super::events::{BurnTransition, CosmeticEvent, DeactivationReason, TickEffects};
use super::input::InputSignals;
use super::metal_config::{BurnKind, MetalDefinitions};
use super::metals::{AgentTier, Eligibility, Metal};
use super::reserves::{AddOutcome, ConsumeOutcome, MetalReserves};
use super::world::{WorldObjectId, WorldView};

/// Which metals are lit and whether the agent is flaring.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BurnState {
    toggled: [bool; Metal::COUNT],
    held: [bool; Metal::COUNT],
    flaring: bool,
}

impl BurnState {
    pub fn is_toggled(&self, metal: Metal) -> bool {
        self.toggled[metal.index()]
    }

    pub fn is_held(&self, metal: Metal) -> bool {
        self.held[metal.index()]
    }

    pub fn is_burning(&self, metal: Metal) -> bool {
        self.is_toggled(metal) || self.is_held(metal)
    }

    pub fn any_burning(&self) -> bool {
        Metal::ALL.into_iter().any(|metal| self.is_burning(metal))
    }

    pub fn is_flaring(&self) -> bool {
        self.flaring
    }
}

/// An agent that can store and burn metals.
#[derive(Component, Clone, Debug)]
pub struct Allomancer {
    pub name: String,
    pub tier: AgentTier,
    /// Identity of this agent among the world's mobiles
    pub world_id: Option<WorldObjectId>,
    /// Position at the start of the tick, kept current by the host
    pub position: Vec2,
    pub(super) reserves: MetalReserves,
    pub(super) state: BurnState,
    pub(super) effects: EffectTable,
}

impl Allomancer {
    pub fn new(name: impl Into<String>, tier: AgentTier, definitions: &MetalDefinitions) -> Self {
        Self {
            name: name.into(),
            tier,
            world_id: None,
            position: Vec2::ZERO,
            reserves: MetalReserves::new(definitions.pool()),
            state: BurnState::default(),
            effects: EffectTable::new(definitions),
        }
    }

    pub fn reserves(&self) -> &MetalReserves {
        &self.reserves
    }

    pub fn state(&self) -> &BurnState {
        &self.state
    }

    pub fn effects(&self) -> &EffectTable {
        &self.effects
    }

    pub fn is_burning(&self, metal: Metal) -> bool {
        self.state.is_burning(metal)
    }

    pub fn is_flaring(&self) -> bool {
        self.state.is_flaring()
    }

    /// Metals burning right now, in metal order.
    pub fn burning_metals(&self) -> impl Iterator<Item = Metal> + '_ {
        Metal::ALL.into_iter().filter(|metal| self.is_burning(*metal))
    }

    /// Stock up on a metal (a vial drunk, a flake swallowed).
    pub fn add_reserve(&mut self, metal: Metal, amount: u32) -> Result<AddOutcome, BurnError> {
        self.reserves.add(metal, amount, &self.tier)
    }

    /// Advance one simulation tick.
    pub fn advance(&mut self, input: &InputSignals, world: &dyn WorldView) -> TickEffects {
        let mut out = TickEffects::default();

        self.effects.tick_cooldowns();
        self.apply_toggle_presses(input, &mut out);
        self.apply_held_inputs(input, &mut out);
        self.apply_flare_press(input, &mut out);
        self.consume_reserves(&mut out);

        if self.state.flaring && !self.state.any_burning() {
            self.set_flaring(false, &mut out);
        }

        self.run_effects(input, world, &mut out);
        out
    }

    fn apply_toggle_presses(&mut self, input: &InputSignals, out: &mut TickEffects) {
        for metal in Metal::ALL {
            if self.effects.burn_kind(metal) != BurnKind::Toggle || !input.get(metal).just_pressed {
                continue;
            }

            if self.state.is_toggled(metal) {
                self.deactivate(metal, DeactivationReason::Released, out);
                continue;
            }

            match self.check_ignite(metal) {
                Ok(()) => {
                    self.state.toggled[metal.index()] = true;
                    out.transitions.push(BurnTransition::Activated(metal));
                    out.cosmetics.push(CosmeticEvent::Ignite { metal });
                }
                Err(err) => out.transitions.push(BurnTransition::Denied(err)),
            }
        }
    }

    fn apply_held_inputs(&mut self, input: &InputSignals, out: &mut TickEffects) {
        for metal in Metal::ALL {
            if self.effects.burn_kind(metal) != BurnKind::Held {
                continue;
            }

            let signal = input.get(metal);
            let was_held = self.state.is_held(metal);
            let ignitable = self.check_ignite(metal);
            let now_held = signal.held && ignitable.is_ok();

            if signal.just_pressed {
                if let Err(err) = ignitable {
                    out.transitions.push(BurnTransition::Denied(err));
                }
            }

            if was_held && !now_held {
                self.deactivate(metal, DeactivationReason::Released, out);
            } else if !was_held && now_held {
                self.state.held[metal.index()] = true;
                out.transitions.push(BurnTransition::Activated(metal));
                out.cosmetics.push(CosmeticEvent::Ignite { metal });
            }
        }
    }

    fn apply_flare_press(&mut self, input: &InputSignals, out: &mut TickEffects) {
        if !input.flare_pressed {
            return;
        }
        if self.state.flaring {
            self.set_flaring(false, out);
        } else if self.state.any_burning() {
            self.set_flaring(true, out);
        } else {
            out.cosmetics.push(CosmeticEvent::FlareFizzle);
        }
    }

    fn consume_reserves(&mut self, out: &mut TickEffects) {
        for metal in Metal::ALL {
            if !self.state.is_burning(metal) {
                continue;
            }
            if self.reserves.consume(metal, self.state.flaring) == ConsumeOutcome::Depleted {
                self.deactivate(metal, DeactivationReason::Depleted, out);
            }
        }
    }

    fn run_effects(&mut self, input: &InputSignals, world: &dyn WorldView, out: &mut TickEffects) {
        for metal in Metal::ALL {
            if !self.state.is_burning(metal) {
                continue;
            }
            let ctx = EffectContext {
                metal,
                agent_id: self.world_id,
                position: self.position,
                aim_point: input.aim_point,
                flaring: self.state.flaring,
                reserves: &self.reserves,
                world,
            };
            self.effects.effect_mut(metal).on_tick(&ctx, out);
        }
    }

    fn check_ignite(&self, metal: Metal) -> Result<(), BurnError> {
        if !self.tier.can_burn(metal) {
            return Err(BurnError::NotPermitted(metal));
        }
        if !self.reserves.has_reserve(metal) {
            return Err(BurnError::InsufficientReserve(metal));
        }
        Ok(())
    }

    fn deactivate(&mut self, metal: Metal, reason: DeactivationReason, out: &mut TickEffects) {
        self.effects.effect_mut(metal).on_deactivate(out);
        self.state.toggled[metal.index()] = false;
        self.state.held[metal.index()] = false;
        out.transitions.push(BurnTransition::Deactivated(metal, reason));
    }

    fn set_flaring(&mut self, flaring: bool, out: &mut TickEffects) {
        self.state.flaring = flaring;
        out.transitions.push(BurnTransition::FlareChanged(flaring));
    }

    /// Put out every metal and drop the effects' per-burn memory. Nothing
    /// is reported; this is only used when state is replaced wholesale.
    pub(super) fn clear_burn_state(&mut self) {
        let mut discarded = TickEffects::default();
        for metal in Metal::ALL {
            if self.state.is_burning(metal) {
                self.effects.effect_mut(metal).on_deactivate(&mut discarded);
            }
        }
        self.state = BurnState::default();
    }

    /// Relight saved toggle metals and the flare. A metal that is no longer
    /// a toggle, eligible or stocked stays out and is returned. Flaring is
    /// only kept when something is lit.
    pub(super) fn relight(&mut self, toggled: &[Metal], flaring: bool) -> Vec<Metal> {
        let mut refused = Vec::new();
        for &metal in toggled {
            if self.effects.burn_kind(metal) == BurnKind::Toggle && self.check_ignite(metal).is_ok() {
                self.state.toggled[metal.index()] = true;
            } else {
                refused.push(metal);
            }
        }
        self.state.flaring = flaring && self.state.any_burning();
        refused
    }
}
