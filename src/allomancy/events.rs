//! Allomancy events
//!
//! What one agent's tick asks the host to do: velocity changes, spawned
//! items, status changes, anchors, and cosmetic requests. Also the state
//! transitions recorded to the burn log.

use bevy::prelude::*;
use smallvec::SmallVec;

use super::error::BurnError;
use super::metals::Metal;
use super::world::{ItemKind, WorldObjectId};

/// Which kind of world object an impulse is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectRef {
    Mobile(WorldObjectId),
    Item(WorldObjectId),
}

impl ObjectRef {
    pub fn id(&self) -> WorldObjectId {
        match self {
            ObjectRef::Mobile(id) | ObjectRef::Item(id) => *id,
        }
    }
}

/// Velocity change for a world object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectImpulse {
    pub target: ObjectRef,
    pub delta: Vec2,
}

/// Request to create loose items.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnRequest {
    pub kind: ItemKind,
    pub count: u32,
    pub position: Vec2,
    pub velocity: Vec2,
    /// The object the items were pulled or pushed out of
    pub source: WorldObjectId,
}

/// Statuses the emotional and stripping metals impose on others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Status {
    Enraged,
    Soothed,
    Stripped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusApplication {
    pub target: WorldObjectId,
    pub status: Status,
    pub ticks: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusRemoval {
    pub target: WorldObjectId,
    pub status: Status,
}

/// Requests for renderers and audio. The engine never reads these back.
#[derive(Debug, Clone, PartialEq)]
pub enum CosmeticEvent {
    /// A metal was just lit
    Ignite { metal: Metal },
    /// Flare was requested with nothing burning
    FlareFizzle,
    /// Blue line drawn from the burner to a push/pull target
    MetalLine { metal: Metal, from: Vec2, to: Vec2 },
    /// Glow around the burner, `strength` is the reserve in vials
    Aura { metal: Metal, at: Vec2, strength: f32 },
    /// Another burner's pulse, sensed through Bronze
    Pulse { source: WorldObjectId, at: Vec2 },
}

/// Why a metal stopped burning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeactivationReason {
    /// Switched off or released
    Released,
    /// Ran out of reserve
    Depleted,
}

/// A change in an agent's burn state.
#[derive(Debug, Clone, PartialEq)]
pub enum BurnTransition {
    Activated(Metal),
    Deactivated(Metal, DeactivationReason),
    FlareChanged(bool),
    Denied(BurnError),
}

/// Everything one agent's tick produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickEffects {
    /// Velocity change for the burner itself
    pub agent_velocity: Vec2,
    pub impulses: SmallVec<[ObjectImpulse; 4]>,
    pub spawns: Vec<SpawnRequest>,
    pub statuses: Vec<StatusApplication>,
    pub status_removals: Vec<StatusRemoval>,
    /// Cells the burner anchored on
    pub anchors: SmallVec<[IVec2; 2]>,
    pub cosmetics: Vec<CosmeticEvent>,
    pub transitions: SmallVec<[BurnTransition; 4]>,
}

impl TickEffects {
    /// True when nothing at all happened.
    pub fn is_empty(&self) -> bool {
        self.agent_velocity == Vec2::ZERO
            && self.impulses.is_empty()
            && self.spawns.is_empty()
            && self.statuses.is_empty()
            && self.status_removals.is_empty()
            && self.anchors.is_empty()
            && self.cosmetics.is_empty()
            && self.transitions.is_empty()
    }

    pub fn denials(&self) -> impl Iterator<Item = &BurnError> {
        self.transitions.iter().filter_map(|t| match t {
            BurnTransition::Denied(err) => Some(err),
            _ => None,
        })
    }
}

/// Event fired once per allomancer per tick with that tick's effects
#[derive(Event, Debug, Clone)]
pub struct BurnEffectsEvent {
    /// Entity that burned
    pub agent: Entity,
    /// Display name of the agent
    pub agent_name: String,
    pub effects: TickEffects,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_effects_are_empty() {
        assert!(TickEffects::default().is_empty());
    }

    #[test]
    fn test_denials_filter() {
        let mut effects = TickEffects::default();
        effects.transitions.push(BurnTransition::Activated(Metal::Tin));
        effects.transitions.push(BurnTransition::Denied(BurnError::NotPermitted(Metal::Iron)));
        let denials: Vec<&BurnError> = effects.denials().collect();
        assert_eq!(denials, vec![&BurnError::NotPermitted(Metal::Iron)]);
        assert!(!effects.is_empty());
    }

    #[test]
    fn test_object_ref_id() {
        assert_eq!(ObjectRef::Mobile(4).id(), 4);
        assert_eq!(ObjectRef::Item(9).id(), 9);
    }
}
