//! Metals - Channel identities and agent tiers
//!
//! Each metal is one burnable channel. Behavior is attached through the
//! definitions in `assets/config/metals.ron` via the `metal_config` module,
//! never through the enum itself.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A burnable metal (one power channel).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum Metal {
    Iron,     // Pull on nearby metal
    Steel,    // Push on nearby metal
    Tin,      // Enhanced senses
    Pewter,   // Physical enhancement
    Copper,   // Hides the burner's pulses
    Bronze,   // Senses other burners' pulses
    Zinc,     // Enflames emotions
    Brass,    // Soothes emotions
    Chromium, // Strips others; exempt from the reserve cap
}

impl Metal {
    /// Number of metals. Arrays indexed by [`Metal::index`] have this length.
    pub const COUNT: usize = 9;

    /// Every metal in ordinal order.
    pub const ALL: [Metal; Metal::COUNT] = [
        Metal::Iron,
        Metal::Steel,
        Metal::Tin,
        Metal::Pewter,
        Metal::Copper,
        Metal::Bronze,
        Metal::Zinc,
        Metal::Brass,
        Metal::Chromium,
    ];

    /// The one metal exempt from the shared reserve cap.
    pub const UNLIMITED: Metal = Metal::Chromium;

    /// Ordinal position, used to index per-metal arrays.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Metal::Iron => "Iron",
            Metal::Steel => "Steel",
            Metal::Tin => "Tin",
            Metal::Pewter => "Pewter",
            Metal::Copper => "Copper",
            Metal::Bronze => "Bronze",
            Metal::Zinc => "Zinc",
            Metal::Brass => "Brass",
            Metal::Chromium => "Chromium",
        }
    }

    /// Look a metal up by its display name. Used when restoring saved state,
    /// where names may be stale or corrupt.
    pub fn from_name(name: &str) -> Option<Metal> {
        Metal::ALL.into_iter().find(|metal| metal.name() == name)
    }

    pub fn is_unlimited(self) -> bool {
        self == Metal::UNLIMITED
    }
}

impl fmt::Display for Metal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Decides which metals an agent may burn or stock.
pub trait Eligibility {
    fn can_burn(&self, metal: Metal) -> bool;
}

impl<F> Eligibility for F
where
    F: Fn(Metal) -> bool,
{
    fn can_burn(&self, metal: Metal) -> bool {
        self(metal)
    }
}

/// Which metals an agent was born able to burn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentTier {
    /// Can burn every metal
    pub mistborn: bool,
    /// Can burn exactly this metal
    pub misting: Option<Metal>,
}

impl AgentTier {
    pub fn mistborn() -> Self {
        Self {
            mistborn: true,
            misting: None,
        }
    }

    pub fn misting(metal: Metal) -> Self {
        Self {
            mistborn: false,
            misting: Some(metal),
        }
    }

    /// An agent with no allomantic ability at all.
    pub fn mundane() -> Self {
        Self::default()
    }
}

impl Eligibility for AgentTier {
    fn can_burn(&self, metal: Metal) -> bool {
        self.mistborn || self.misting == Some(metal)
    }
}
