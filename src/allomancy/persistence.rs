//! Saving and restoring reserves
//!
//! Reserves are stored as two index-aligned lists (metal names and tick
//! counts) plus the lit toggle metals, the flare and the tier flags.
//! Restoring replaces whatever the allomancer held before and never fails
//! as a whole: every bad entry is logged, reported and skipped, and the
//! rest loads.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::burning::Allomancer;
use super::error::BurnError;
use super::metals::{AgentTier, Metal};
use super::reserves::{AddOutcome, MetalReserves};

/// Saved form of one allomancer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedAllomancy {
    pub name: String,
    pub reserve_channel_names: Vec<String>,
    pub reserve_values: Vec<i64>,
    /// Toggle metals lit when saved
    #[serde(default)]
    pub burning: Vec<String>,
    #[serde(default)]
    pub flaring: bool,
    #[serde(default)]
    pub mistborn: bool,
    #[serde(default)]
    pub misting: Option<String>,
}

impl SavedAllomancy {
    pub fn to_ron(&self) -> Result<String, String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| format!("Failed to serialize {}: {}", self.name, e))
    }

    pub fn from_ron(contents: &str) -> Result<Self, String> {
        ron::from_str(contents).map_err(|e| format!("Failed to parse saved allomancy: {}", e))
    }

    /// Save to a RON file
    pub fn save(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let contents = self.to_ron()?;
        fs::write(path, contents)?;
        info!("Saved {} to {:?}", self.name, path);
        Ok(())
    }

    /// Load from a RON file
    pub fn load(path: &Path) -> Result<Self, String> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::from_ron(&contents)
    }
}

impl Allomancer {
    /// Capture reserves, lit toggle metals and flags. Held metals follow
    /// the input and are not saved.
    pub fn save(&self) -> SavedAllomancy {
        let (names, values): (Vec<String>, Vec<i64>) = self
            .reserves
            .iter()
            .map(|(metal, amount)| (metal.name().to_string(), i64::from(amount)))
            .unzip();

        SavedAllomancy {
            name: self.name.clone(),
            reserve_channel_names: names,
            reserve_values: values,
            burning: Metal::ALL
                .into_iter()
                .filter(|metal| self.state.is_toggled(*metal))
                .map(|metal| metal.name().to_string())
                .collect(),
            flaring: self.is_flaring(),
            mistborn: self.tier.mistborn,
            misting: self.tier.misting.map(|metal| metal.name().to_string()),
        }
    }

    /// Replace this allomancer's reserves, burn state and tier with a save.
    ///
    /// Returns one [`BurnError::CorruptPersistedState`] per entry that had to
    /// be skipped or clamped.
    pub fn restore(&mut self, saved: &SavedAllomancy) -> Vec<BurnError> {
        let mut problems = Vec::new();
        let mut report = |message: String| {
            warn!("{}", message);
            problems.push(BurnError::CorruptPersistedState(message));
        };

        self.clear_burn_state();
        self.reserves = MetalReserves::new(self.reserves.limits());

        self.tier = AgentTier {
            mistborn: saved.mistborn,
            misting: match saved.misting.as_deref() {
                None => None,
                Some(name) => {
                    let metal = Metal::from_name(name);
                    if metal.is_none() {
                        report(format!("{}: unknown misting metal '{}'", saved.name, name));
                    }
                    metal
                }
            },
        };

        let names = &saved.reserve_channel_names;
        let values = &saved.reserve_values;
        if names.len() != values.len() {
            report(format!(
                "{}: {} reserve names but {} values, ignoring the unmatched tail",
                saved.name,
                names.len(),
                values.len()
            ));
        }

        for (name, value) in names.iter().zip(values.iter()) {
            let Some(metal) = Metal::from_name(name) else {
                report(format!("{}: unknown metal '{}' in reserves", saved.name, name));
                continue;
            };
            let Ok(amount) = u32::try_from(*value) else {
                report(format!("{}: {} reserve {} is out of range", saved.name, name, value));
                continue;
            };

            // Saved reserves were legal when written, so eligibility is not re-checked
            match self.reserves.add(metal, amount, &|_: Metal| true) {
                Ok(AddOutcome::Added(_)) => {}
                Ok(AddOutcome::PartiallyAdded(kept)) => report(format!(
                    "{}: {} reserve {} exceeds the pool, kept {}",
                    saved.name, name, value, kept
                )),
                Err(err) => report(format!("{}: {} reserve dropped ({})", saved.name, name, err)),
            }
        }

        let mut toggled = Vec::new();
        for name in &saved.burning {
            match Metal::from_name(name) {
                Some(metal) => toggled.push(metal),
                None => report(format!("{}: unknown burning metal '{}'", saved.name, name)),
            }
        }
        for metal in self.relight(&toggled, saved.flaring) {
            report(format!("{}: {} cannot be relit", saved.name, metal.name()));
        }

        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allomancy::input::{ChannelInput, InputSignals};
    use crate::allomancy::metal_config::MetalDefinitions;
    use crate::allomancy::world::{MaterialTable, TileMap, WorldSnapshot};

    #[test]
    fn test_save_lists_only_stocked_metals() {
        let mut vin = Allomancer::new("Vin", AgentTier::mistborn(), &MetalDefinitions::default());
        vin.add_reserve(Metal::Steel, 500).unwrap();
        vin.add_reserve(Metal::Iron, 250).unwrap();

        let saved = vin.save();
        assert_eq!(saved.reserve_channel_names, vec!["Iron", "Steel"]);
        assert_eq!(saved.reserve_values, vec![250, 500]);
        assert!(saved.mistborn);
        assert_eq!(saved.misting, None);
    }

    #[test]
    fn test_ron_round_trip_keeps_fields() {
        let saved = SavedAllomancy {
            name: "Kelsier".to_string(),
            reserve_channel_names: vec!["Pewter".to_string()],
            reserve_values: vec![42],
            burning: vec!["Pewter".to_string()],
            flaring: true,
            mistborn: false,
            misting: Some("Pewter".to_string()),
        };
        let text = saved.to_ron().unwrap();
        assert_eq!(SavedAllomancy::from_ron(&text).unwrap(), saved);
    }

    #[test]
    fn test_missing_flags_default() {
        let saved = SavedAllomancy::from_ron(
            r#"(name: "Ham", reserve_channel_names: ["Pewter"], reserve_values: [9])"#,
        )
        .unwrap();
        assert!(!saved.flaring);
        assert!(!saved.mistborn);
        assert_eq!(saved.misting, None);
    }

    #[test]
    fn test_save_lists_lit_toggles_but_not_held_metals() {
        let tiles = TileMap::default();
        let materials = MaterialTable::default();
        let world = WorldSnapshot::new(&tiles, &materials);
        let mut vin = Allomancer::new("Vin", AgentTier::mistborn(), &MetalDefinitions::default());
        vin.add_reserve(Metal::Tin, 50).unwrap();
        vin.add_reserve(Metal::Steel, 50).unwrap();

        let input = InputSignals::default()
            .with(Metal::Tin, ChannelInput::pressed())
            .with(Metal::Steel, ChannelInput::pressed());
        vin.advance(&input, &world);

        assert_eq!(vin.save().burning, vec!["Tin"]);
    }
}
