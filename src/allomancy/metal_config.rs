//! Data-Driven Metal Configuration
//!
//! Metal behavior is defined in `assets/config/metals.ron` rather than in
//! Rust, so tuning a radius or a force does not need a recompile.
//!
//! ## Usage
//! ```ignore
//! fn my_system(metals: Res<MetalDefinitions>) {
//!     let steel = metals.get(Metal::Steel);
//!     println!("Steel push radius: {}", steel.radius);
//! }
//! ```

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use super::events::Status;
use super::metals::Metal;
use super::reserves::PoolLimits;
use super::world::ItemKind;

/// Default path of the metal definitions file.
pub const METALS_CONFIG_PATH: &str = "assets/config/metals.ron";

/// How a metal is switched on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BurnKind {
    /// Pressed once to start, again to stop
    #[default]
    Toggle,
    /// Burns only while the input is held down
    Held,
}

/// Which effect a metal drives while burning.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Pull on the selected metal target
    Pull,
    /// Push on the selected metal target
    Push,
    /// Glow only; consequences are read from the burn state
    #[default]
    Aura,
    /// Sense other burners
    Detect,
    /// Impose an emotional status on those nearby
    Emotion(Status),
    /// Strip those nearby, undone when the burn stops
    Strip,
}

/// Complete metal configuration loaded from RON.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MetalConfig {
    /// Display name of the metal
    pub name: String,
    pub burn: BurnKind,
    pub effect: EffectKind,

    // === Reach ===
    /// Effect radius in world units
    #[serde(default)]
    pub radius: f32,
    /// Velocity change per tick applied by pushes and pulls
    #[serde(default)]
    pub base_force: f32,

    // === Throttling ===
    /// Ticks before the same object can be affected again
    #[serde(default)]
    pub cooldown_ticks: u32,

    // === Value transfer (push/pull on mobiles) ===
    /// Share of a target's value ejected per transfer
    #[serde(default)]
    pub extract_fraction: f32,
    /// Most units ejected per transfer
    #[serde(default)]
    pub extract_cap: u32,

    // === Statuses ===
    /// Duration of imposed statuses, doubled when flaring
    #[serde(default)]
    pub status_ticks: u32,
}

impl MetalConfig {
    /// Returns true if this metal selects a push/pull target
    pub fn is_targeting(&self) -> bool {
        matches!(self.effect, EffectKind::Pull | EffectKind::Push)
    }
}

/// Root structure for the metals.ron file
#[derive(Debug, Serialize, Deserialize)]
pub struct MetalsConfig {
    #[serde(default)]
    pub pool: PoolLimits,
    /// Item kind ejected by value transfers
    pub coin_item: ItemKind,
    pub metals: HashMap<Metal, MetalConfig>,
}

/// Resource containing every metal definition, one per metal.
#[derive(Resource, Clone, Debug)]
pub struct MetalDefinitions {
    pool: PoolLimits,
    coin_item: ItemKind,
    definitions: [MetalConfig; Metal::COUNT],
}

impl Default for MetalDefinitions {
    /// Load metal definitions from the default config file.
    /// Panics if the file cannot be loaded - use for tests only.
    fn default() -> Self {
        load_metal_definitions().expect("Failed to load metal definitions in Default impl")
    }
}

impl MetalDefinitions {
    /// Build from a parsed config, rejecting missing metals and
    /// out-of-range values.
    pub fn new(config: MetalsConfig) -> Result<Self, String> {
        let MetalsConfig {
            pool,
            coin_item,
            mut metals,
        } = config;

        let missing: Vec<Metal> = Metal::ALL
            .into_iter()
            .filter(|metal| !metals.contains_key(metal))
            .collect();
        if !missing.is_empty() {
            return Err(format!("Missing metal definitions: {:?}", missing));
        }

        for (metal, def) in &metals {
            if !def.radius.is_finite() || !def.base_force.is_finite() {
                return Err(format!(
                    "{:?} radius {} and force {} must be finite",
                    metal, def.radius, def.base_force
                ));
            }
            if def.radius < 0.0 || def.base_force < 0.0 {
                return Err(format!("{:?} has a negative radius or force", metal));
            }
            if !(0.0..=1.0).contains(&def.extract_fraction) {
                return Err(format!(
                    "{:?} extract_fraction {} is outside 0..=1",
                    metal, def.extract_fraction
                ));
            }
        }

        Ok(Self {
            pool,
            coin_item,
            definitions: Metal::ALL.map(|metal| metals.remove(&metal).unwrap_or_default()),
        })
    }

    pub fn get(&self, metal: Metal) -> &MetalConfig {
        &self.definitions[metal.index()]
    }

    pub fn pool(&self) -> PoolLimits {
        self.pool
    }

    pub fn coin_item(&self) -> ItemKind {
        self.coin_item
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metal, &MetalConfig)> {
        Metal::ALL.into_iter().zip(self.definitions.iter())
    }
}

/// Parse metal definitions from RON text
pub fn parse_metal_definitions(contents: &str) -> Result<MetalDefinitions, String> {
    let config: MetalsConfig =
        ron::from_str(contents).map_err(|e| format!("Failed to parse metal definitions: {}", e))?;
    MetalDefinitions::new(config)
}

/// Load metal definitions from a RON file
pub fn load_metal_definitions_from(path: &Path) -> Result<MetalDefinitions, String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    let definitions = parse_metal_definitions(&contents)
        .map_err(|e| format!("{} ({})", e, path.display()))?;

    info!("Loaded {} metal definitions from {}", Metal::COUNT, path.display());

    Ok(definitions)
}

/// Load metal definitions from assets/config/metals.ron
pub fn load_metal_definitions() -> Result<MetalDefinitions, String> {
    load_metal_definitions_from(Path::new(METALS_CONFIG_PATH))
}

/// Bevy plugin for metal configuration loading
pub struct MetalConfigPlugin;

impl Plugin for MetalConfigPlugin {
    fn build(&self, app: &mut App) {
        // Hosts may insert their own definitions before adding the plugin
        if app.world().contains_resource::<MetalDefinitions>() {
            return;
        }
        match load_metal_definitions() {
            Ok(definitions) => {
                app.insert_resource(definitions);
            }
            Err(e) => {
                // Burning without definitions is meaningless, refuse to start
                panic!("Failed to load metal definitions: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"(
        coin_item: 71,
        metals: {
            Iron: (name: "Iron", burn: Held, effect: Pull, radius: 400.0, base_force: 0.5,
                   cooldown_ticks: 180, extract_fraction: 0.1, extract_cap: 50),
            Steel: (name: "Steel", burn: Held, effect: Push, radius: 400.0, base_force: 0.5),
            Tin: (name: "Tin", burn: Toggle, effect: Aura),
            Pewter: (name: "Pewter", burn: Toggle, effect: Aura),
            Copper: (name: "Copper", burn: Toggle, effect: Aura),
            Bronze: (name: "Bronze", burn: Toggle, effect: Detect, radius: 800.0, cooldown_ticks: 30),
            Zinc: (name: "Zinc", burn: Toggle, effect: Emotion(Enraged), radius: 300.0, status_ticks: 120),
            Brass: (name: "Brass", burn: Toggle, effect: Emotion(Soothed), radius: 300.0, status_ticks: 120),
            Chromium: (name: "Chromium", burn: Toggle, effect: Strip, radius: 64.0, cooldown_ticks: 60),
        },
    )"#;

    #[test]
    fn test_parse_minimal_definitions() {
        let defs = parse_metal_definitions(MINIMAL).unwrap();
        assert_eq!(defs.pool(), PoolLimits::default());
        assert_eq!(defs.coin_item(), 71);
        assert_eq!(defs.get(Metal::Iron).burn, BurnKind::Held);
        assert!(defs.get(Metal::Steel).is_targeting());
        assert_eq!(defs.get(Metal::Zinc).effect, EffectKind::Emotion(Status::Enraged));
        assert_eq!(defs.get(Metal::Tin).radius, 0.0);
        assert_eq!(defs.iter().count(), Metal::COUNT);
    }

    #[test]
    fn test_missing_metal_is_rejected() {
        let config = MetalsConfig {
            pool: PoolLimits::default(),
            coin_item: 1,
            metals: HashMap::new(),
        };
        let err = MetalDefinitions::new(config).unwrap_err();
        assert!(err.contains("Missing metal definitions"));
    }

    #[test]
    fn test_bad_fraction_is_rejected() {
        let text = MINIMAL.replace("extract_fraction: 0.1", "extract_fraction: 1.5");
        assert!(parse_metal_definitions(&text).is_err());
    }

    fn minimal_with(metal: Metal, edit: impl FnOnce(&mut MetalConfig)) -> MetalsConfig {
        let mut config: MetalsConfig = ron::from_str(MINIMAL).unwrap();
        edit(config.metals.get_mut(&metal).unwrap());
        config
    }

    #[test]
    fn test_non_finite_radius_is_rejected() {
        for radius in [f32::NAN, f32::INFINITY] {
            let config = minimal_with(Metal::Steel, |def| def.radius = radius);
            let err = MetalDefinitions::new(config).unwrap_err();
            assert!(err.contains("must be finite"), "{}", err);
        }
    }

    #[test]
    fn test_non_finite_force_is_rejected() {
        let config = minimal_with(Metal::Iron, |def| def.base_force = f32::NAN);
        assert!(MetalDefinitions::new(config).is_err());
    }

    #[test]
    fn test_default_file_loads() {
        let defs = MetalDefinitions::default();
        for (metal, def) in defs.iter() {
            assert_eq!(def.name, metal.name(), "{:?} should be named after itself", metal);
        }
    }
}
