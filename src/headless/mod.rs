//! Headless mode for scripted runs
//!
//! Runs allomancy scenarios without any graphical output, suitable for
//! automated testing and balancing metal definitions.
//!
//! ## Usage
//!
//! ```bash
//! # Run a scenario
//! cargo run --release -- --headless assets/scenarios/duel.json
//! ```
//!
//! ## JSON Configuration
//!
//! ```json
//! {
//!   "max_ticks": 300,
//!   "random_seed": 42,
//!   "materials": { "metallic_items": [71], "metallic_tiles": [3] },
//!   "tiles": [{ "cell": [8, 0], "kind": 3 }],
//!   "agents": [{
//!     "name": "Vin",
//!     "mistborn": true,
//!     "reserves": { "Steel": 600 },
//!     "script": [
//!       { "tick": 0, "action": "Aim", "aim": [136.0, 8.0] },
//!       { "tick": 0, "action": "Hold", "metal": "Steel", "until": 120 }
//!     ]
//!   }]
//! }
//! ```

pub mod config;
pub mod runner;

pub use config::ScenarioConfig;
pub use runner::{run_scenario, ScenarioResult};
