//! Allomancy
//!
//! Metal reserves, burning and the effects burning metals have on the world:
//! - Per-metal reserves with a shared capped pool
//! - Toggle and held metals, flaring, depletion
//! - Pushes and pulls on the nearest metal to the aim point
//! - Auras, burner detection, emotional statuses and stripping
//! - Burn logging and saved state

use bevy::prelude::*;

pub mod burning;
pub mod components;
pub mod constants;
pub mod cooldowns;
pub mod effects;
pub mod error;
pub mod events;
pub mod input;
pub mod log;
pub mod metal_config;
pub mod metals;
pub mod persistence;
pub mod reserves;
pub mod systems;
pub mod targeting;
pub mod world;

pub use burning::{Allomancer, BurnState};
pub use components::{ActiveStatuses, AnchorMarkers, DroppedItem, Mobile, SimulationTick, Velocity};
pub use error::BurnError;
pub use events::{BurnEffectsEvent, BurnTransition, TickEffects};
pub use input::{ChannelInput, InputSignals};
pub use metal_config::{MetalConfigPlugin, MetalDefinitions};
pub use metals::{AgentTier, Eligibility, Metal};
pub use reserves::{AddOutcome, ConsumeOutcome, MetalReserves, PoolLimits};
pub use world::{MaterialTable, TileMap, WorldView};

/// Plugin for the allomancy system
///
/// Loads metal definitions (unless already inserted) and runs the burn tick
/// every update.
pub struct AllomancyPlugin;

impl Plugin for AllomancyPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(MetalConfigPlugin)
            .add_event::<BurnEffectsEvent>()
            .init_resource::<SimulationTick>()
            .init_resource::<AnchorMarkers>()
            .init_resource::<TileMap>()
            .init_resource::<MaterialTable>()
            .init_resource::<log::BurnLog>();

        systems::configure_allomancy_system_ordering(app);
        systems::add_core_allomancy_systems(app, || true);
    }
}
