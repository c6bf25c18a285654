//! Integration tests for saved allomancy state
//!
//! These tests verify that:
//! - A save can be written and restored through RON
//! - Corrupt entries are skipped and reported while the rest loads
//! - Restored reserves still respect the shared cap
//! - Restoring replaces the current state, and flaring needs a lit metal

use metalburn::allomancy::burning::Allomancer;
use metalburn::allomancy::input::{ChannelInput, InputSignals};
use metalburn::allomancy::metal_config::MetalDefinitions;
use metalburn::allomancy::metals::{AgentTier, Metal};
use metalburn::allomancy::persistence::SavedAllomancy;
use metalburn::allomancy::world::{MaterialTable, TileMap, WorldSnapshot};
use metalburn::BurnError;

fn blank(name: &str) -> Allomancer {
    Allomancer::new(name, AgentTier::mundane(), &MetalDefinitions::default())
}

fn saved(names: &[&str], values: &[i64]) -> SavedAllomancy {
    SavedAllomancy {
        name: "Vin".to_string(),
        reserve_channel_names: names.iter().map(|n| n.to_string()).collect(),
        reserve_values: values.to_vec(),
        burning: Vec::new(),
        flaring: false,
        mistborn: true,
        misting: None,
    }
}

fn is_corrupt(err: &BurnError) -> bool {
    matches!(err, BurnError::CorruptPersistedState(_))
}

#[test]
fn test_save_and_restore_through_file() {
    let definitions = MetalDefinitions::default();
    let mut vin = Allomancer::new("Vin", AgentTier::mistborn(), &definitions);
    vin.add_reserve(Metal::Pewter, 1200).unwrap();
    vin.add_reserve(Metal::Chromium, 30000).unwrap();

    let path = std::env::temp_dir().join(format!("metalburn_save_{}.ron", std::process::id()));
    vin.save().save(&path).unwrap();
    let loaded = SavedAllomancy::load(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    let mut copy = blank("Vin");
    let problems = copy.restore(&loaded);

    assert!(problems.is_empty(), "{:?}", problems);
    assert_eq!(copy.tier, AgentTier::mistborn());
    assert_eq!(copy.reserves(), vin.reserves());
}

#[test]
fn test_unknown_metal_is_skipped_and_rest_loads() {
    let mut vin = blank("Vin");
    let problems = vin.restore(&saved(&["Iron", "Atium", "Tin"], &[10, 20, 30]));

    assert_eq!(problems.len(), 1);
    assert!(is_corrupt(&problems[0]));
    assert!(problems[0].to_string().contains("Atium"));
    assert_eq!(vin.reserves().get(Metal::Iron), 10);
    assert_eq!(vin.reserves().get(Metal::Tin), 30);
}

#[test]
fn test_length_mismatch_loads_matched_pairs() {
    let mut vin = blank("Vin");
    let problems = vin.restore(&saved(&["Steel", "Brass", "Zinc"], &[5, 6]));

    assert_eq!(problems.len(), 1);
    assert_eq!(vin.reserves().get(Metal::Steel), 5);
    assert_eq!(vin.reserves().get(Metal::Brass), 6);
    assert_eq!(vin.reserves().get(Metal::Zinc), 0);
}

#[test]
fn test_negative_value_is_skipped() {
    let mut vin = blank("Vin");
    let problems = vin.restore(&saved(&["Copper", "Bronze"], &[-4, 9]));

    assert_eq!(problems.len(), 1);
    assert_eq!(vin.reserves().get(Metal::Copper), 0);
    assert_eq!(vin.reserves().get(Metal::Bronze), 9);
}

#[test]
fn test_restore_clamps_to_the_pool() {
    let mut vin = blank("Vin");
    let problems = vin.restore(&saved(&["Iron", "Steel"], &[20000, 5000]));

    assert_eq!(problems.len(), 1, "Steel only partly fits");
    assert_eq!(vin.reserves().get(Metal::Iron), 20000);
    assert_eq!(vin.reserves().get(Metal::Steel), 1600);
    assert_eq!(vin.reserves().capped_total(), 21600);
}

#[test]
fn test_unknown_misting_metal_is_reported() {
    let mut ham = blank("Ham");
    let mut state = saved(&[], &[]);
    state.mistborn = false;
    state.misting = Some("Duralumin".to_string());

    let problems = ham.restore(&state);

    assert_eq!(problems.len(), 1);
    assert_eq!(ham.tier, AgentTier::mundane());
}

#[test]
fn test_restoring_own_save_gives_the_same_reserves() {
    let definitions = MetalDefinitions::default();
    let mut vin = Allomancer::new("Vin", AgentTier::mistborn(), &definitions);
    vin.add_reserve(Metal::Iron, 500).unwrap();
    vin.add_reserve(Metal::Chromium, 40).unwrap();
    let before = vin.reserves().clone();

    let problems = vin.restore(&vin.save());

    assert!(problems.is_empty(), "{:?}", problems);
    assert_eq!(vin.reserves(), &before);
    assert_eq!(vin.reserves().get(Metal::Iron), 500);
}

#[test]
fn test_restore_puts_out_held_metals() {
    let tiles = TileMap::default();
    let materials = MaterialTable::default();
    let world = WorldSnapshot::new(&tiles, &materials);
    let mut vin = Allomancer::new("Vin", AgentTier::mistborn(), &MetalDefinitions::default());
    vin.add_reserve(Metal::Iron, 50).unwrap();
    vin.advance(&InputSignals::default().with(Metal::Iron, ChannelInput::pressed()), &world);
    assert!(vin.is_burning(Metal::Iron));

    vin.restore(&saved(&["Iron"], &[10]));

    assert!(!vin.is_burning(Metal::Iron));
    assert_eq!(vin.reserves().get(Metal::Iron), 10);
}

#[test]
fn test_saved_flare_comes_back_with_its_toggle() {
    let mut vin = blank("Vin");
    let mut state = saved(&["Pewter"], &[100]);
    state.burning = vec!["Pewter".to_string()];
    state.flaring = true;

    let problems = vin.restore(&state);

    assert!(problems.is_empty(), "{:?}", problems);
    assert!(vin.is_burning(Metal::Pewter));
    assert!(vin.is_flaring());
}

#[test]
fn test_saved_flare_without_a_lit_metal_is_dropped() {
    let tiles = TileMap::default();
    let materials = MaterialTable::default();
    let world = WorldSnapshot::new(&tiles, &materials);
    let mut vin = blank("Vin");
    let mut state = saved(&["Tin"], &[100]);
    state.flaring = true;

    vin.restore(&state);
    assert!(!vin.is_flaring());

    vin.advance(&InputSignals::default().with(Metal::Tin, ChannelInput::pressed()), &world);
    assert!(!vin.is_flaring());
    assert_eq!(vin.reserves().get(Metal::Tin), 99, "normal burn rate");
}

#[test]
fn test_empty_saved_toggle_stays_out() {
    let mut vin = blank("Vin");
    let mut state = saved(&["Tin"], &[0]);
    state.burning = vec!["Tin".to_string(), "Atium".to_string()];
    state.flaring = true;

    let problems = vin.restore(&state);

    assert_eq!(problems.len(), 2, "{:?}", problems);
    assert!(!vin.is_burning(Metal::Tin));
    assert!(!vin.is_flaring());
}
