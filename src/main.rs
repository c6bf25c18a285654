//! metalburn - Allomancy Scenario Runner
//!
//! Loads a JSON scenario, steps it headless, and reports what every burner
//! ended up with.

use std::process::ExitCode;

use metalburn::cli;
use metalburn::headless::runner::save_agent_states;
use metalburn::headless::{run_scenario, ScenarioConfig};

fn main() -> ExitCode {
    let args = cli::parse_args();

    let path = args.scenario_path();
    let mut config = match ScenarioConfig::load_from_file(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(output) = &args.output {
        config.output_path = Some(output.display().to_string());
    }
    if let Some(max_ticks) = args.max_ticks {
        config.max_ticks = max_ticks;
    }

    println!("Starting headless scenario {}...", path.display());
    println!("  Agents: {}", config.agents.len());
    println!("  Ticks: {}", config.max_ticks);

    let result = match run_scenario(config, args.verbose) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Scenario failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    for agent in &result.agents {
        let reserves: Vec<String> = agent
            .reserves
            .iter()
            .map(|(metal, amount)| format!("{} {}", metal, amount))
            .collect();
        println!(
            "  {} at ({:.1}, {:.1}): [{}]{}",
            agent.name,
            agent.final_position.x,
            agent.final_position.y,
            reserves.join(", "),
            if agent.flaring { " flaring" } else { "" }
        );
    }
    println!(
        "  Coins extracted: {}, anchored ticks: {}, pulses: {}, denials: {}",
        result.stats.coins_extracted,
        result.stats.anchor_ticks,
        result.stats.pulses,
        result.stats.denials
    );

    if let Some(dir) = &args.save_state {
        match save_agent_states(&result, dir) {
            Ok(paths) => println!("Saved {} agent states to {}", paths.len(), dir.display()),
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
