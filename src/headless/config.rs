//! JSON configuration parsing for headless mode
//!
//! Parses JSON scenario files and converts their loose string fields into
//! typed metals and script commands.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::allomancy::metals::{AgentTier, Metal};
use crate::allomancy::world::{ItemKind, MaterialTable, TileKind};

/// Headless scenario configuration loaded from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Burners taking part (at least one)
    pub agents: Vec<AgentConfig>,
    /// Non-burning creatures
    #[serde(default)]
    pub mobiles: Vec<MobileConfig>,
    /// Loose items placed at start
    #[serde(default)]
    pub items: Vec<ItemConfig>,
    /// Static tiles
    #[serde(default)]
    pub tiles: Vec<TileConfig>,
    /// Which item and tile kinds count as metal
    #[serde(default)]
    pub materials: MaterialTable,
    /// Side length of a tile cell in world units (default: 16)
    #[serde(default = "default_cell_size")]
    pub cell_size: f32,
    /// Items dropped at random around a point
    #[serde(default)]
    pub scatter: Option<ScatterConfig>,
    /// Number of ticks to simulate (default: 600)
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,
    /// Metal definitions file (default: assets/config/metals.ron)
    #[serde(default)]
    pub metals_path: Option<String>,
    /// Custom output path for the burn log (optional)
    #[serde(default)]
    pub output_path: Option<String>,
    /// Random seed for deterministic scatter
    /// If absent, scatter positions differ between runs
    #[serde(default)]
    pub random_seed: Option<u64>,
}

/// One burner in a scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    pub name: String,
    /// Eligible for every metal
    #[serde(default)]
    pub mistborn: bool,
    /// The single metal a misting may burn
    #[serde(default)]
    pub misting: Option<String>,
    #[serde(default)]
    pub position: [f32; 2],
    /// Starting reserves by metal name
    #[serde(default)]
    pub reserves: BTreeMap<String, u32>,
    /// Saved state (RON) that replaces the starting reserves and tier
    #[serde(default)]
    pub saved_state: Option<String>,
    /// Scripted input, in tick order
    #[serde(default)]
    pub script: Vec<ScriptStep>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MobileConfig {
    pub position: [f32; 2],
    /// Worn item kind, if any
    #[serde(default)]
    pub armor: Option<ItemKind>,
    /// Worth that pushes and pulls can tear loose
    #[serde(default)]
    pub value: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemConfig {
    pub position: [f32; 2],
    pub kind: ItemKind,
    #[serde(default = "default_count")]
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileConfig {
    pub cell: [i32; 2],
    pub kind: TileKind,
}

/// Items dropped uniformly within a circle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScatterConfig {
    pub kind: ItemKind,
    pub count: u32,
    #[serde(default)]
    pub center: [f32; 2],
    pub radius: f32,
}

/// Scripted input actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScriptAction {
    /// Press a metal's key once
    Press,
    /// Hold a metal's key from `tick` until `until` (exclusive)
    Hold,
    /// Press the flare key once
    Flare,
    /// Move the aim point
    Aim,
    /// Drink `amount` of a metal
    Drink,
}

/// One line of an agent's script
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptStep {
    pub tick: u64,
    pub action: ScriptAction,
    #[serde(default)]
    pub metal: Option<String>,
    #[serde(default)]
    pub until: Option<u64>,
    #[serde(default)]
    pub aim: Option<[f32; 2]>,
    #[serde(default)]
    pub amount: Option<u32>,
}

/// A validated script step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScriptCommand {
    Press(Metal),
    Hold { metal: Metal, until: u64 },
    Flare,
    Aim(Vec2),
    Drink { metal: Metal, amount: u32 },
}

fn default_cell_size() -> f32 {
    16.0
}

fn default_max_ticks() -> u64 {
    600
}

fn default_count() -> u32 {
    1
}

impl ScenarioConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::from_json(&contents)
    }

    /// Parse and validate configuration from JSON text
    pub fn from_json(contents: &str) -> Result<Self, String> {
        let config: ScenarioConfig =
            serde_json::from_str(contents).map_err(|e| format!("Failed to parse JSON: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.agents.is_empty() {
            return Err("agents must have at least one member".to_string());
        }
        if self.max_ticks == 0 {
            return Err("max_ticks must be positive".to_string());
        }
        if self.cell_size <= 0.0 {
            return Err("cell_size must be positive".to_string());
        }

        for agent in &self.agents {
            agent.tier()?;
            for name in agent.reserves.keys() {
                parse_metal(name).map_err(|e| format!("{}: {}", agent.name, e))?;
            }
            agent.commands()?;
        }

        if let Some(scatter) = &self.scatter {
            if scatter.radius < 0.0 {
                return Err("scatter radius must not be negative".to_string());
            }
        }

        Ok(())
    }
}

impl AgentConfig {
    /// Eligibility flags for this agent
    pub fn tier(&self) -> Result<AgentTier, String> {
        let misting = match &self.misting {
            Some(name) => Some(parse_metal(name).map_err(|e| format!("{}: {}", self.name, e))?),
            None => None,
        };
        Ok(AgentTier {
            mistborn: self.mistborn,
            misting,
        })
    }

    /// Starting reserves in metal order
    pub fn starting_reserves(&self) -> Result<Vec<(Metal, u32)>, String> {
        let mut reserves = self
            .reserves
            .iter()
            .map(|(name, amount)| parse_metal(name).map(|metal| (metal, *amount)))
            .collect::<Result<Vec<_>, _>>()?;
        reserves.sort_by_key(|(metal, _)| *metal);
        Ok(reserves)
    }

    /// Typed script, keeping the order steps were written in
    pub fn commands(&self) -> Result<Vec<(u64, ScriptCommand)>, String> {
        self.script
            .iter()
            .map(|step| {
                step.command()
                    .map(|command| (step.tick, command))
                    .map_err(|e| format!("{} script at tick {}: {}", self.name, step.tick, e))
            })
            .collect()
    }
}

impl ScriptStep {
    fn metal(&self) -> Result<Metal, String> {
        match &self.metal {
            Some(name) => parse_metal(name),
            None => Err(format!("{:?} needs a metal", self.action)),
        }
    }

    /// Convert to a typed command
    pub fn command(&self) -> Result<ScriptCommand, String> {
        match self.action {
            ScriptAction::Press => Ok(ScriptCommand::Press(self.metal()?)),
            ScriptAction::Hold => {
                let until = self.until.ok_or("Hold needs an until tick")?;
                if until <= self.tick {
                    return Err(format!("Hold until {} does not come after tick {}", until, self.tick));
                }
                Ok(ScriptCommand::Hold {
                    metal: self.metal()?,
                    until,
                })
            }
            ScriptAction::Flare => Ok(ScriptCommand::Flare),
            ScriptAction::Aim => {
                let [x, y] = self.aim.ok_or("Aim needs an aim point")?;
                Ok(ScriptCommand::Aim(Vec2::new(x, y)))
            }
            ScriptAction::Drink => Ok(ScriptCommand::Drink {
                metal: self.metal()?,
                amount: self.amount.ok_or("Drink needs an amount")?,
            }),
        }
    }
}

/// Parse a metal name
pub fn parse_metal(name: &str) -> Result<Metal, String> {
    Metal::from_name(name).ok_or_else(|| {
        let valid: Vec<&str> = Metal::ALL.iter().map(|m| m.name()).collect();
        format!("Unknown metal: '{}'. Valid metals: {}", name, valid.join(", "))
    })
}
