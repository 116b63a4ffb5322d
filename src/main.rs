use rail_safety::{Scenario, ScenarioError, Simulator};
use std::env;
use std::process::ExitCode;

const DEFAULT_SCENARIO: &str = "resources/scenario.toml";

fn run(path: &str) -> Result<(), ScenarioError> {
    let scenario = Scenario::load_from_file(path)?;
    let simulator = Simulator::new(&scenario)?;

    println!("Simulating train movements with crossing points...\n");
    simulator.run_with(|warning| println!("{warning}"));
    println!("\nSimulation complete.");
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = env::args().nth(1).unwrap_or_else(|| DEFAULT_SCENARIO.to_string());
    match run(&path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
