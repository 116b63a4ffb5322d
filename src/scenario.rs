use crate::error::ScenarioError;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::str::FromStr;

pub const DEFAULT_SAFE_DISTANCE_M: f64 = 100.0;
pub const DEFAULT_CROSSING_TOLERANCE_KM: f64 = 0.01;
pub const DEFAULT_STEP_MINUTES: u32 = 1;

/// One train record as it appears in the scenario file.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct TrainData {
    pub name: String,
    pub departure: String,
    pub speed_kmh: f64,
    pub distance_km: f64,
    pub cars: u32,
    pub car_length_m: f64,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Scenario {
    #[serde(default = "default_safe_distance")]
    pub safe_distance_m: f64,
    #[serde(default)]
    pub crossings_km: Vec<f64>,
    #[serde(default = "default_crossing_tolerance")]
    pub crossing_tolerance_km: f64,
    #[serde(default = "default_step")]
    pub step_minutes: u32,
    pub trains: Vec<TrainData>,
}

fn default_safe_distance() -> f64 {
    DEFAULT_SAFE_DISTANCE_M
}

fn default_crossing_tolerance() -> f64 {
    DEFAULT_CROSSING_TOLERANCE_KM
}

fn default_step() -> u32 {
    DEFAULT_STEP_MINUTES
}

impl Scenario {
    pub fn new(trains: Vec<TrainData>, crossings_km: Vec<f64>) -> Self {
        Scenario {
            safe_distance_m: DEFAULT_SAFE_DISTANCE_M,
            crossings_km,
            crossing_tolerance_km: DEFAULT_CROSSING_TOLERANCE_KM,
            step_minutes: DEFAULT_STEP_MINUTES,
            trains,
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Scenario, ScenarioError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let scenario = contents.parse::<Scenario>()?;
        log::info!(
            "Loaded scenario {} with {} trains and {} crossings",
            path.display(),
            scenario.trains.len(),
            scenario.crossings_km.len()
        );
        Ok(scenario)
    }
}

impl FromStr for Scenario {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str::<Scenario>(s)?)
    }
}

impl TrainData {
    pub fn new(name: &str, departure: &str, speed_kmh: f64, distance_km: f64, cars: u32, car_length_m: f64) -> Self {
        TrainData {
            name: name.to_string(),
            departure: departure.to_string(),
            speed_kmh,
            distance_km,
            cars,
            car_length_m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_defaults() {
        let text = r#"
            [[trains]]
            name = "A"
            departure = "08:00"
            speed_kmh = 80.0
            distance_km = 240.0
            cars = 8
            car_length_m = 20.0
        "#;
        let scenario: Scenario = text.parse().unwrap();
        assert_eq!(scenario.safe_distance_m, DEFAULT_SAFE_DISTANCE_M);
        assert_eq!(scenario.crossing_tolerance_km, DEFAULT_CROSSING_TOLERANCE_KM);
        assert_eq!(scenario.step_minutes, DEFAULT_STEP_MINUTES);
        assert!(scenario.crossings_km.is_empty());
        assert_eq!(scenario.trains, vec![TrainData::new("A", "08:00", 80.0, 240.0, 8, 20.0)]);
    }

    #[test]
    fn test_parse_shipped_scenario() {
        let scenario: Scenario = include_str!("../resources/scenario.toml").parse().unwrap();
        assert_eq!(scenario.trains.len(), 4);
        assert_eq!(scenario.crossings_km, vec![60.0, 120.0, 180.0, 220.0]);
        assert_eq!(scenario.safe_distance_m, 100.0);
        let names: Vec<_> = scenario.trains.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C", "D"]);
    }

    #[test]
    fn test_parse_error() {
        let result = "trains = 5".parse::<Scenario>();
        assert!(matches!(result, Err(ScenarioError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = Scenario::load_from_file("does/not/exist.toml");
        assert!(matches!(result, Err(ScenarioError::Io { .. })));
    }
}
