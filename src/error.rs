use crate::common::TrainName;
use std::path::PathBuf;
use thiserror::Error;

/// Rejected scenario parameters. Raised during setup, before any tick runs.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("train {train}: speed must be positive, got {value}")]
    InvalidSpeed { train: TrainName, value: f64 },

    #[error("train {train}: distance must be positive, got {value}")]
    InvalidDistance { train: TrainName, value: f64 },

    #[error("train {train}: departure {value:?} is not a valid HH:MM time")]
    InvalidDeparture {
        train: TrainName,
        value: String,
        source: chrono::ParseError,
    },

    #[error("train {train}: car length must not be negative, got {value}")]
    InvalidCarLength { train: TrainName, value: f64 },

    #[error("train {train} is defined more than once")]
    DuplicateTrain { train: TrainName },

    #[error("scenario has no trains")]
    NoTrains,

    #[error("time step must be at least one minute, got {0}")]
    InvalidStep(u32),

    #[error("safe distance must not be negative, got {0} m")]
    InvalidSafeDistance(f64),

    #[error("crossing tolerance must not be negative, got {0} km")]
    InvalidCrossingTolerance(f64),
}

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario {}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },

    #[error("failed to parse scenario: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
