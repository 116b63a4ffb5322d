pub mod clock;
pub mod common;
pub mod error;
pub mod scenario;
pub mod simulation;
pub mod train;

pub use error::{ConfigError, ScenarioError};
pub use scenario::{Scenario, TrainData};
pub use simulation::{ProximityWarning, SimulationReport, Simulator};
