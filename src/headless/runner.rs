//! Headless scenario execution
//!
//! Builds a Bevy app with no window, spawns the scenario's world, and steps
//! it a fixed number of ticks. Ticks are driven by hand, so a run takes as
//! long as the simulation does, not `max_ticks / 60` seconds.

use bevy::log::LogPlugin;
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;
use std::fs;
use std::path::{Path, PathBuf};

use crate::allomancy::burning::Allomancer;
use crate::allomancy::components::{
    ActiveStatuses, AnchorMarkers, DroppedItem, Mobile, SimulationTick, Velocity,
};
use crate::allomancy::events::{BurnEffectsEvent, CosmeticEvent};
use crate::allomancy::input::{ChannelInput, InputSignals};
use crate::allomancy::log::{BurnLog, BurnLogEventType};
use crate::allomancy::metal_config::{load_metal_definitions, load_metal_definitions_from, MetalDefinitions};
use crate::allomancy::metals::Metal;
use crate::allomancy::persistence::SavedAllomancy;
use crate::allomancy::reserves::AddOutcome;
use crate::allomancy::systems::AllomancySet;
use crate::allomancy::world::TileMap;
use crate::allomancy::AllomancyPlugin;

use super::config::{ScenarioConfig, ScriptCommand};

/// Result of a completed headless scenario
///
/// This struct provides programmatic access to run results for testing and analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioResult {
    /// Number of ticks simulated
    pub ticks_run: u64,
    /// Final state of every burner, in spawn order
    pub agents: Vec<AgentResult>,
    /// Totals gathered over the run
    pub stats: ScenarioStats,
    /// Cells anchored on during the last tick
    pub final_anchors: Vec<IVec2>,
    /// The burn log, one formatted line per entry
    pub log_lines: Vec<String>,
    /// Random seed used (if deterministic mode)
    pub random_seed: Option<u64>,
}

/// Final state of a single burner
#[derive(Debug, Clone, PartialEq)]
pub struct AgentResult {
    pub name: String,
    pub final_position: Vec2,
    /// Non-empty reserves in metal order
    pub reserves: Vec<(Metal, u32)>,
    pub burning: Vec<Metal>,
    pub flaring: bool,
    /// Saved form, ready to be written to disk
    pub saved: SavedAllomancy,
}

/// Running totals of what burning did to the world
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioStats {
    /// Coins torn out of mobiles
    pub coins_extracted: u32,
    /// Ticks on which some burner anchored on a tile
    pub anchor_ticks: u32,
    /// Burners sensed through bronze
    pub pulses: u32,
    /// Statuses imposed on others
    pub statuses_applied: u32,
    /// Refused activations and reserve changes
    pub denials: u32,
}

/// Deterministic random source for scenario setup
#[derive(Resource)]
pub struct GameRng {
    rng: StdRng,
    /// The seed used to initialize this RNG (if deterministic)
    pub seed: Option<u64>,
}

impl GameRng {
    /// Create a new GameRng with a specific seed for deterministic behavior
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Create a new GameRng with random entropy (non-deterministic)
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }

    /// Generate a random f32 in the range [0.0, 1.0)
    pub fn random_f32(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Generate a random f32 in the given range
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.random_f32() * (max - min)
    }

    /// Uniform point inside a circle
    pub fn point_in_circle(&mut self, center: Vec2, radius: f32) -> Vec2 {
        let angle = self.random_range(0.0, TAU);
        let distance = radius * self.random_f32().sqrt();
        center + Vec2::from_angle(angle) * distance
    }
}

/// Input script attached to each scenario agent.
#[derive(Component, Debug, Clone)]
pub struct InputScript {
    commands: Vec<(u64, ScriptCommand)>,
    aim_point: Vec2,
}

impl InputScript {
    pub fn new(commands: Vec<(u64, ScriptCommand)>) -> Self {
        Self {
            commands,
            aim_point: Vec2::ZERO,
        }
    }

    /// Input for `tick`, plus any metal to be drunk before burning.
    ///
    /// Aim changes persist; presses and flares last one tick; holds last from
    /// their start tick up to (not including) their end tick.
    pub fn signals_at(&mut self, tick: u64) -> (InputSignals, Vec<(Metal, u32)>) {
        let mut drinks = Vec::new();

        for (at, command) in &self.commands {
            if let ScriptCommand::Aim(point) = command {
                if *at == tick {
                    self.aim_point = *point;
                }
            }
        }

        let mut signals = InputSignals::aimed_at(self.aim_point);
        for (at, command) in &self.commands {
            match *command {
                ScriptCommand::Press(metal) if *at == tick => {
                    signals.set(metal, ChannelInput::pressed());
                }
                ScriptCommand::Hold { metal, until } if *at <= tick && tick < until => {
                    let input = if *at == tick {
                        ChannelInput::pressed()
                    } else {
                        ChannelInput::holding()
                    };
                    signals.set(metal, input);
                }
                ScriptCommand::Flare if *at == tick => signals.flare_pressed = true,
                ScriptCommand::Drink { metal, amount } if *at == tick => drinks.push((metal, amount)),
                _ => {}
            }
        }

        (signals, drinks)
    }
}

/// Scenario handed to the startup system
#[derive(Resource, Clone)]
struct ScenarioSetup(ScenarioConfig);

/// Plugin for headless scenario execution
pub struct ScenarioPlugin {
    pub config: ScenarioConfig,
}

impl Plugin for ScenarioPlugin {
    fn build(&self, app: &mut App) {
        let mut tiles = TileMap::new(self.config.cell_size);
        for tile in &self.config.tiles {
            tiles.insert(IVec2::new(tile.cell[0], tile.cell[1]), tile.kind);
        }

        let game_rng = match self.config.random_seed {
            Some(seed) => {
                info!("Using deterministic RNG with seed: {}", seed);
                GameRng::from_seed(seed)
            }
            None => {
                info!("Using non-deterministic RNG (no seed provided)");
                GameRng::from_entropy()
            }
        };

        app.insert_resource(ScenarioSetup(self.config.clone()))
            .insert_resource(tiles)
            .insert_resource(self.config.materials.clone())
            .insert_resource(game_rng)
            .init_resource::<ScenarioStats>()
            .add_systems(Startup, setup_scenario)
            .add_systems(Update, apply_scripted_input.in_set(AllomancySet::Input))
            .add_systems(Update, tally_effects.in_set(AllomancySet::Resolve));
    }
}

/// Spawn the scenario's agents and world objects
fn setup_scenario(
    mut commands: Commands,
    setup: Res<ScenarioSetup>,
    definitions: Res<MetalDefinitions>,
    mut rng: ResMut<GameRng>,
    mut burn_log: ResMut<BurnLog>,
) {
    let config = &setup.0;
    burn_log.clear();
    burn_log.log(0, "scenario", BurnLogEventType::ScenarioEvent, "Scenario started".to_string());

    for agent in &config.agents {
        let (tier, script, reserves) = match (agent.tier(), agent.commands(), agent.starting_reserves()) {
            (Ok(tier), Ok(script), Ok(reserves)) => (tier, script, reserves),
            (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
                warn!("Skipping agent {}: {}", agent.name, e);
                continue;
            }
        };

        let mut allomancer = Allomancer::new(agent.name.clone(), tier, &definitions);
        for (metal, amount) in reserves {
            if let Err(err) = allomancer.add_reserve(metal, amount) {
                burn_log.log(0, &agent.name, BurnLogEventType::Denied, format!("denied: {}", err));
            }
        }

        if let Some(path) = &agent.saved_state {
            match SavedAllomancy::load(Path::new(path)) {
                Ok(saved) => {
                    for problem in allomancer.restore(&saved) {
                        burn_log.log(0, &agent.name, BurnLogEventType::ScenarioEvent, problem.to_string());
                    }
                }
                Err(e) => warn!("{}: {}", agent.name, e),
            }
        }

        let [x, y] = agent.position;
        allomancer.position = Vec2::new(x, y);
        commands.spawn((
            allomancer,
            InputSignals::default(),
            InputScript::new(script),
            Transform::from_xyz(x, y, 0.0),
            Velocity::default(),
            ActiveStatuses::default(),
        ));
    }

    for mobile in &config.mobiles {
        let [x, y] = mobile.position;
        commands.spawn((
            Mobile {
                armor: mobile.armor,
                value: mobile.value,
            },
            Transform::from_xyz(x, y, 0.0),
            Velocity::default(),
            ActiveStatuses::default(),
        ));
    }

    for item in &config.items {
        let [x, y] = item.position;
        commands.spawn((
            DroppedItem {
                kind: item.kind,
                count: item.count,
            },
            Transform::from_xyz(x, y, 0.0),
            Velocity::default(),
        ));
    }

    if let Some(scatter) = &config.scatter {
        let center = Vec2::new(scatter.center[0], scatter.center[1]);
        for _ in 0..scatter.count {
            let position = rng.point_in_circle(center, scatter.radius);
            commands.spawn((
                DroppedItem {
                    kind: scatter.kind,
                    count: 1,
                },
                Transform::from_translation(position.extend(0.0)),
                Velocity::default(),
            ));
        }
    }

    info!(
        "Headless scenario setup complete: {} agents, {} mobiles, {} items, {} tiles",
        config.agents.len(),
        config.mobiles.len(),
        config.items.len() + config.scatter.as_ref().map_or(0, |s| s.count as usize),
        config.tiles.len()
    );
}

/// Feed each agent's script into its input signals
fn apply_scripted_input(
    tick: Res<SimulationTick>,
    mut agents: Query<(&mut InputScript, &mut InputSignals, &mut Allomancer)>,
    mut burn_log: ResMut<BurnLog>,
) {
    for (mut script, mut signals, mut allomancer) in agents.iter_mut() {
        let (next, drinks) = script.signals_at(tick.0);
        *signals = next;

        for (metal, amount) in drinks {
            let (event_type, message) = match allomancer.add_reserve(metal, amount) {
                Ok(AddOutcome::Added(added)) => {
                    (BurnLogEventType::Reserve, format!("drank {} {}", added, metal))
                }
                Ok(AddOutcome::PartiallyAdded(kept)) => (
                    BurnLogEventType::Reserve,
                    format!("drank {} of {} {}", kept, amount, metal),
                ),
                Err(err) => (BurnLogEventType::Denied, format!("denied: {}", err)),
            };
            burn_log.log(tick.0, &allomancer.name, event_type, message);
        }
    }
}

/// Accumulate run totals from this tick's effects
fn tally_effects(
    mut effects_events: EventReader<BurnEffectsEvent>,
    mut stats: ResMut<ScenarioStats>,
) {
    for event in effects_events.read() {
        let effects = &event.effects;
        stats.coins_extracted += effects.spawns.iter().map(|s| s.count).sum::<u32>();
        if !effects.anchors.is_empty() {
            stats.anchor_ticks += 1;
        }
        stats.pulses += effects
            .cosmetics
            .iter()
            .filter(|c| matches!(c, CosmeticEvent::Pulse { .. }))
            .count() as u32;
        stats.statuses_applied += effects.statuses.len() as u32;
        stats.denials += effects.denials().count() as u32;
    }
}

/// Build the app for a scenario without running it
pub fn build_scenario_app(config: ScenarioConfig) -> Result<App, String> {
    config.validate()?;

    let definitions = match &config.metals_path {
        Some(path) => load_metal_definitions_from(Path::new(path))?,
        None => load_metal_definitions()?,
    };

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        // Definitions go in first so the config plugin does not load them again
        .insert_resource(definitions)
        .add_plugins(AllomancyPlugin)
        .add_plugins(ScenarioPlugin { config });
    Ok(app)
}

/// Run a headless scenario with the given configuration
pub fn run_scenario(config: ScenarioConfig, verbose: bool) -> Result<ScenarioResult, String> {
    let max_ticks = config.max_ticks;
    let output_path = config.output_path.clone();
    let random_seed = config.random_seed;

    let mut app = build_scenario_app(config)?;
    if verbose {
        app.add_plugins(LogPlugin::default());
    }
    app.finish();
    app.cleanup();

    for _ in 0..max_ticks {
        app.update();
    }

    let world = app.world_mut();
    if let Some(mut burn_log) = world.get_resource_mut::<BurnLog>() {
        burn_log.log(
            max_ticks,
            "scenario",
            BurnLogEventType::ScenarioEvent,
            format!("Scenario ended after {} ticks", max_ticks),
        );
    }

    let mut agents = Vec::new();
    let mut query = world.query::<(&Allomancer, &Transform)>();
    for (allomancer, transform) in query.iter(world) {
        agents.push(AgentResult {
            name: allomancer.name.clone(),
            final_position: transform.translation.truncate(),
            reserves: allomancer.reserves().iter().collect(),
            burning: allomancer.burning_metals().collect(),
            flaring: allomancer.is_flaring(),
            saved: allomancer.save(),
        });
    }

    let burn_log = world.get_resource::<BurnLog>();
    if let (Some(path), Some(burn_log)) = (&output_path, burn_log) {
        let filename = burn_log.save_to_file(Path::new(path))?;
        println!("Scenario complete. Log saved to: {}", filename);
    }

    Ok(ScenarioResult {
        ticks_run: world.get_resource::<SimulationTick>().map_or(0, |tick| tick.0),
        agents,
        stats: world.get_resource::<ScenarioStats>().cloned().unwrap_or_default(),
        final_anchors: world
            .get_resource::<AnchorMarkers>()
            .map(|anchors| anchors.sorted())
            .unwrap_or_default(),
        log_lines: burn_log
            .map(|log| log.entries.iter().map(BurnLog::format_entry).collect())
            .unwrap_or_default(),
        random_seed,
    })
}

/// Write each agent's saved state as `<dir>/<name>.ron`
pub fn save_agent_states(result: &ScenarioResult, dir: &Path) -> Result<Vec<PathBuf>, String> {
    fs::create_dir_all(dir).map_err(|e| format!("Failed to create {}: {}", dir.display(), e))?;

    let mut written = Vec::new();
    for agent in &result.agents {
        let path = dir.join(format!("{}.ron", agent.name));
        agent
            .saved
            .save(&path)
            .map_err(|e| format!("Failed to save {}: {}", agent.name, e))?;
        written.push(path);
    }
    Ok(written)
}
