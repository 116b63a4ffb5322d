use crate::clock::SimulationClock;
use crate::common::{LengthConv, TrainName, is_non_negative};
use crate::error::ConfigError;
use crate::scenario::Scenario;
use crate::train::Train;
use chrono::{NaiveDateTime, TimeDelta};
use itertools::Itertools;
use std::collections::HashSet;
use std::fmt;

const TIME_FORMAT: &str = "%H:%M";

/// Two trains came closer than the safe distance away from any crossing.
#[derive(Clone, Debug, PartialEq)]
pub struct ProximityWarning {
    pub time: NaiveDateTime,
    pub first: TrainName,
    pub second: TrainName,
    pub gap_m: f64,
}

impl fmt::Display for ProximityWarning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "WARNING: Trains {} and {} are too close at {} (gap = {:.1} m)",
            self.first,
            self.second,
            self.time.format(TIME_FORMAT),
            self.gap_m
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimulationReport {
    pub warnings: Vec<ProximityWarning>,
    pub ticks: usize,
}

/// Positions of the trains on the track at one tick, in train order.
pub struct PositionSnapshot<'a> {
    pub time: NaiveDateTime,
    entries: Vec<(&'a Train, f64)>,
}

impl<'a> PositionSnapshot<'a> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(train, _)| train.name() == name)
            .map(|&(_, position)| position)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a Train, f64)> + Clone + '_ {
        self.entries.iter().copied()
    }
}

/// Distance between two trains once both their lengths are taken off, in km.
/// Negative when the trains logically overlap.
pub fn gap_km(first_km: f64, first_length_km: f64, second_km: f64, second_length_km: f64) -> f64 {
    (first_km - second_km).abs() - (first_length_km + second_length_km)
}

/// True when both positions sit within `tolerance_km` of the same crossing.
pub fn near_crossing(crossings_km: &[f64], tolerance_km: f64, first_km: f64, second_km: f64) -> bool {
    crossings_km
        .iter()
        .any(|&c| (first_km - c).abs() < tolerance_km && (second_km - c).abs() < tolerance_km)
}

pub struct Simulator {
    trains: Vec<Train>,
    crossings_km: Vec<f64>,
    crossing_tolerance_km: f64,
    safe_distance_m: f64,
    step: TimeDelta,
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl Simulator {
    pub fn new(scenario: &Scenario) -> Result<Self, ConfigError> {
        if scenario.step_minutes == 0 {
            return Err(ConfigError::InvalidStep(scenario.step_minutes));
        }
        if !is_non_negative(scenario.safe_distance_m) {
            return Err(ConfigError::InvalidSafeDistance(scenario.safe_distance_m));
        }
        if !is_non_negative(scenario.crossing_tolerance_km) {
            return Err(ConfigError::InvalidCrossingTolerance(scenario.crossing_tolerance_km));
        }

        let mut names = HashSet::with_capacity(scenario.trains.len());
        let mut trains = Vec::with_capacity(scenario.trains.len());
        for data in &scenario.trains {
            if !names.insert(data.name.as_str()) {
                return Err(ConfigError::DuplicateTrain {
                    train: data.name.clone(),
                });
            }
            trains.push(Train::from_data(data)?);
        }

        let start = trains.iter().map(Train::departure).min().ok_or(ConfigError::NoTrains)?;
        let end = trains.iter().map(Train::arrival).max().ok_or(ConfigError::NoTrains)?;
        log::info!(
            "Simulating {} trains from {} to {}, step {} min",
            trains.len(),
            start.format(TIME_FORMAT),
            end.format(TIME_FORMAT),
            scenario.step_minutes
        );

        Ok(Simulator {
            trains,
            crossings_km: scenario.crossings_km.clone(),
            crossing_tolerance_km: scenario.crossing_tolerance_km,
            safe_distance_m: scenario.safe_distance_m,
            step: TimeDelta::minutes(i64::from(scenario.step_minutes)),
            start,
            end,
        })
    }

    pub fn trains(&self) -> &[Train] {
        &self.trains
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn clock(&self) -> SimulationClock {
        SimulationClock::new(self.start, self.end, self.step)
    }

    pub fn snapshot(&self, at: NaiveDateTime) -> PositionSnapshot<'_> {
        let entries = self
            .trains
            .iter()
            .filter_map(|train| train.position_km(at).map(|position| (train, position)))
            .collect();
        PositionSnapshot { time: at, entries }
    }

    /// Checks every pair of active trains at `at`, in train order, and hands
    /// each warning to `on_warning`.
    pub fn evaluate_tick<F: FnMut(ProximityWarning)>(&self, at: NaiveDateTime, on_warning: &mut F) {
        let snapshot = self.snapshot(at);
        log::trace!("{}: {} trains active", snapshot.time.format(TIME_FORMAT), snapshot.len());

        for ((first, first_km), (second, second_km)) in snapshot.iter().tuple_combinations() {
            let gap_m = gap_km(first_km, first.length_km(), second_km, second.length_km()).km_to_m();
            if gap_m >= self.safe_distance_m {
                continue;
            }
            if near_crossing(&self.crossings_km, self.crossing_tolerance_km, first_km, second_km) {
                continue;
            }
            on_warning(ProximityWarning {
                time: at,
                first: first.name().to_string(),
                second: second.name().to_string(),
                gap_m,
            });
        }
    }

    /// Runs every tick from the earliest departure to the latest arrival and
    /// returns the number of ticks evaluated.
    pub fn run_with<F: FnMut(ProximityWarning)>(&self, mut on_warning: F) -> usize {
        let mut ticks = 0;
        let mut warnings = 0;
        let mut clock = self.clock();
        for at in clock.by_ref() {
            self.evaluate_tick(at, &mut |warning| {
                warnings += 1;
                on_warning(warning);
            });
            ticks += 1;
        }
        log::info!(
            "Simulation finished: {} ticks from {} to {}, {} warnings",
            ticks,
            clock.start().format(TIME_FORMAT),
            clock.end().format(TIME_FORMAT),
            warnings
        );
        ticks
    }

    pub fn run(&self) -> SimulationReport {
        let mut warnings = Vec::new();
        let ticks = self.run_with(|warning| warnings.push(warning));
        SimulationReport { warnings, ticks }
    }
}
