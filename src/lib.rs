//! metalburn - Allomancy Resource and Targeting Engine
//!
//! Agents store metals in a capped pool, burn them by toggling or holding,
//! flare to double both cost and effect, and push or pull on the nearest
//! metal to where they aim.
//!
//! This library exposes the engine, its Bevy systems, and the headless
//! scenario runner.

pub mod allomancy;
pub mod cli;
pub mod headless;

// Re-export commonly used types
pub use allomancy::log::{BurnLog, BurnLogEventType};
pub use allomancy::{Allomancer, AllomancyPlugin, BurnError, Metal};
pub use headless::ScenarioConfig;
