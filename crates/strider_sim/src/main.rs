//! Strider simulation runner
//!
//! Runs one navigation leg in the simulated world and prints the result.
//!
//! Run with: cargo run -p strider_sim -- [scenario.toml]

use std::process::ExitCode;

use strider_sim::{Scenario, ScenarioConfig};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading scenario from {}", path);
            match ScenarioConfig::load(&path) {
                Ok(config) => config,
                Err(e) => {
                    log::error!("Failed to load scenario: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
        None => {
            log::info!("No scenario given, using the built-in one");
            ScenarioConfig::default()
        }
    };

    let result = Scenario::build(config).and_then(|mut scenario| scenario.run());
    match result {
        Ok(summary) => {
            println!("Leg finished after {} ticks ({:?} simulated)", summary.ticks, summary.sim_time);
            println!("  interaction: {:?} in {} attempts", summary.report.outcome, summary.report.attempts);
            println!("  npc served:  {}", summary.served);
            println!("  travelled:   {:.1} units, now at {}", summary.travelled, summary.position);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Simulation failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
