//! Allomancy Constants
//!
//! Centralized location for the tuning numbers that are not per-metal data.
//! Per-metal values live in `assets/config/metals.ron`.

// ============================================================================
// Timing
// ============================================================================

/// Simulation ticks per second. All durations in the engine are tick counts.
pub const TICKS_PER_SECOND: u32 = 60;

// ============================================================================
// Reserves
// ============================================================================

/// Ticks of burn held in one vial (one minute of burning at normal rate).
pub const DEFAULT_CAPACITY_PER_VIAL: u32 = 3600;

/// Number of vials an agent can hold across all capped metals.
pub const DEFAULT_VIALS: u32 = 6;

/// Reserve consumed per tick while burning normally.
pub const BURN_RATE: u32 = 1;

/// Multiplier applied to consumption and effect magnitude while flaring.
pub const FLARE_MULTIPLIER: u32 = 2;

// ============================================================================
// Targeting
// ============================================================================

/// Extra cells scanned beyond the radius when searching the tile grid, so
/// cells whose centers are in range but whose corners straddle the edge are
/// never missed.
pub const TILE_SCAN_MARGIN: i32 = 2;

/// Speed, in units per tick, of coins torn loose from a pushed or pulled
/// mobile. Doubled while flaring.
pub const EJECT_SPEED: f32 = 4.0;

// ============================================================================
// Host motion (headless integration only)
// ============================================================================

/// Fraction of velocity kept after each tick of integration.
pub const VELOCITY_RETENTION: f32 = 0.9;

/// Speeds below this are snapped to zero so bodies come to rest.
pub const REST_SPEED: f32 = 0.01;
