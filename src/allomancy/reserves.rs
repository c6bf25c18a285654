//! Metal reserves
//!
//! Per-agent store of how many ticks of burn remain for each metal.
//!
//! Every capped metal draws from one shared pool of
//! `capacity_per_vial * vials` ticks. The unlimited metal is exempt and can
//! bank any amount.

use serde::{Deserialize, Serialize};

use super::constants::{BURN_RATE, DEFAULT_CAPACITY_PER_VIAL, DEFAULT_VIALS, FLARE_MULTIPLIER};
use super::error::BurnError;
use super::metals::{Eligibility, Metal};

/// Size of an agent's reserve pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolLimits {
    /// Ticks of burn in one vial
    pub capacity_per_vial: u32,
    /// Vials shared across all capped metals
    pub vials: u32,
}

impl Default for PoolLimits {
    fn default() -> Self {
        Self {
            capacity_per_vial: DEFAULT_CAPACITY_PER_VIAL,
            vials: DEFAULT_VIALS,
        }
    }
}

impl PoolLimits {
    pub fn max_total(&self) -> u32 {
        self.capacity_per_vial.saturating_mul(self.vials)
    }
}

/// Successful result of [`MetalReserves::add`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddOutcome {
    /// The full amount was stored
    Added(u32),
    /// Only this much fit before the pool filled up
    PartiallyAdded(u32),
}

impl AddOutcome {
    /// Ticks actually stored.
    pub fn amount(&self) -> u32 {
        match self {
            AddOutcome::Added(amount) | AddOutcome::PartiallyAdded(amount) => *amount,
        }
    }
}

/// Result of one tick of consumption.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsumeOutcome {
    /// The reserve is now empty
    Depleted,
    /// Some reserve is left
    HasReserve,
}

/// Reserve ticks per metal for one agent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetalReserves {
    limits: PoolLimits,
    reserves: [u32; Metal::COUNT],
}

impl Default for MetalReserves {
    fn default() -> Self {
        Self::new(PoolLimits::default())
    }
}

impl MetalReserves {
    pub fn new(limits: PoolLimits) -> Self {
        Self {
            limits,
            reserves: [0; Metal::COUNT],
        }
    }

    pub fn limits(&self) -> PoolLimits {
        self.limits
    }

    pub fn get(&self, metal: Metal) -> u32 {
        self.reserves[metal.index()]
    }

    pub fn has_reserve(&self, metal: Metal) -> bool {
        self.get(metal) > 0
    }

    /// Sum of every metal that counts against the cap.
    pub fn capped_total(&self) -> u32 {
        Metal::ALL
            .into_iter()
            .filter(|metal| !metal.is_unlimited())
            .map(|metal| self.get(metal))
            .sum()
    }

    /// Ticks that can still be added to capped metals.
    pub fn room(&self) -> u32 {
        self.limits.max_total().saturating_sub(self.capped_total())
    }

    /// Non-empty reserves in metal order.
    pub fn iter(&self) -> impl Iterator<Item = (Metal, u32)> + '_ {
        Metal::ALL
            .into_iter()
            .map(|metal| (metal, self.get(metal)))
            .filter(|(_, amount)| *amount > 0)
    }

    /// Store `amount` ticks of `metal`, up to the shared cap.
    ///
    /// Nothing changes when the agent is not eligible for the metal or the
    /// pool has no room left.
    pub fn add(
        &mut self,
        metal: Metal,
        amount: u32,
        eligibility: &impl Eligibility,
    ) -> Result<AddOutcome, BurnError> {
        if !eligibility.can_burn(metal) {
            return Err(BurnError::NotPermitted(metal));
        }

        if metal.is_unlimited() {
            let slot = &mut self.reserves[metal.index()];
            *slot = slot.saturating_add(amount);
            return Ok(AddOutcome::Added(amount));
        }

        let room = self.limits.max_total().saturating_sub(self.capped_total());
        if room == 0 {
            return Err(BurnError::PoolFull(metal));
        }

        let slot = &mut self.reserves[metal.index()];
        if amount > room {
            *slot += room;
            Ok(AddOutcome::PartiallyAdded(room))
        } else {
            *slot += amount;
            Ok(AddOutcome::Added(amount))
        }
    }

    /// Burn one tick of `metal`. Flaring doubles the rate for every metal
    /// except the unlimited one.
    pub fn consume(&mut self, metal: Metal, flaring: bool) -> ConsumeOutcome {
        let rate = if flaring && !metal.is_unlimited() {
            BURN_RATE * FLARE_MULTIPLIER
        } else {
            BURN_RATE
        };

        let slot = &mut self.reserves[metal.index()];
        *slot = slot.saturating_sub(rate);
        if *slot == 0 {
            ConsumeOutcome::Depleted
        } else {
            ConsumeOutcome::HasReserve
        }
    }

    /// Reserve of `metal` measured in vials. Mistborn can bank several vials
    /// of one metal, so this is allowed to exceed 1.0.
    pub fn percentage(&self, metal: Metal) -> f32 {
        if self.limits.capacity_per_vial == 0 {
            return 0.0;
        }
        self.get(metal) as f32 / self.limits.capacity_per_vial as f32
    }

    /// Fill level of the shared pool, in [0, 1].
    pub fn total_percentage(&self) -> f32 {
        let max_total = self.limits.max_total();
        if max_total == 0 {
            return 0.0;
        }
        self.capped_total() as f32 / max_total as f32
    }
}
