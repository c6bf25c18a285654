//! Command-line interface for metalburn
//!
//! Runs headless allomancy scenarios.

use clap::Parser;
use std::path::PathBuf;

/// Default scenario when `--headless` is not given
pub const DEFAULT_SCENARIO: &str = "assets/scenarios/duel.json";

/// Allomancy scenario runner
#[derive(Parser, Debug)]
#[command(name = "metalburn")]
#[command(about = "Headless allomancy scenario runner")]
#[command(version)]
pub struct Args {
    /// Run the scenario in the specified JSON config file
    #[arg(long, value_name = "CONFIG_FILE")]
    pub headless: Option<PathBuf>,

    /// Output path for the burn log
    #[arg(long, value_name = "OUTPUT_PATH")]
    pub output: Option<PathBuf>,

    /// Number of ticks to simulate, overriding the scenario
    #[arg(long, value_name = "N")]
    pub max_ticks: Option<u64>,

    /// Directory to write each agent's saved state to
    #[arg(long, value_name = "PATH")]
    pub save_state: Option<PathBuf>,

    /// Print engine logs
    #[arg(long)]
    pub verbose: bool,
}

impl Args {
    pub fn scenario_path(&self) -> PathBuf {
        self.headless
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCENARIO))
    }
}

pub fn parse_args() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_parse() {
        let args = Args::parse_from([
            "metalburn",
            "--headless",
            "run.json",
            "--max-ticks",
            "90",
            "--save-state",
            "saves",
            "--verbose",
        ]);
        assert_eq!(args.scenario_path(), PathBuf::from("run.json"));
        assert_eq!(args.max_ticks, Some(90));
        assert_eq!(args.save_state, Some(PathBuf::from("saves")));
        assert!(args.verbose);
        assert!(args.output.is_none());
    }

    #[test]
    fn test_default_scenario() {
        let args = Args::parse_from(["metalburn"]);
        assert_eq!(args.scenario_path(), PathBuf::from(DEFAULT_SCENARIO));
    }
}
