use crate::common::{LengthConv, SpeedConv, TrainName, is_non_negative, is_positive};
use crate::error::ConfigError;
use crate::scenario::TrainData;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

const DEPARTURE_FORMAT: &str = "%H:%M";
const NANOS_PER_HOUR: f64 = 3_600_000_000_000.0;

fn seconds(delta: TimeDelta) -> f64 {
    delta.num_seconds() as f64 + f64::from(delta.subsec_nanos()) / 1e9
}

/// Parses an `HH:MM` wall-clock string onto the simulation's reference date.
pub fn parse_clock_time(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    let time = NaiveTime::parse_from_str(value, DEPARTURE_FORMAT)?;
    Ok(NaiveDate::default().and_time(time))
}

/// A validated train. Never mutated once built; the simulation only reads
/// positions off it.
#[derive(Clone, Debug)]
pub struct Train {
    name: TrainName,
    departure: NaiveDateTime,
    arrival: NaiveDateTime,
    speed_kmh: f64,
    distance_km: f64,
    length_km: f64,
}

impl Train {
    pub fn from_data(data: &TrainData) -> Result<Train, ConfigError> {
        let name = data.name.clone();
        if !is_positive(data.speed_kmh) {
            return Err(ConfigError::InvalidSpeed {
                train: name,
                value: data.speed_kmh,
            });
        }
        if !is_positive(data.distance_km) {
            return Err(ConfigError::InvalidDistance {
                train: name,
                value: data.distance_km,
            });
        }
        if !is_non_negative(data.car_length_m) {
            return Err(ConfigError::InvalidCarLength {
                train: name,
                value: data.car_length_m,
            });
        }

        let departure = parse_clock_time(&data.departure).map_err(|source| ConfigError::InvalidDeparture {
            train: name.clone(),
            value: data.departure.clone(),
            source,
        })?;

        // at least one nanosecond, so arrival stays strictly after departure
        let travel_ns = (data.speed_kmh.hours_for_km(data.distance_km) * NANOS_PER_HOUR)
            .round()
            .max(1.0);
        let arrival = Some(travel_ns)
            .filter(|&ns| ns < i64::MAX as f64)
            .and_then(|ns| departure.checked_add_signed(TimeDelta::nanoseconds(ns as i64)))
            .ok_or_else(|| ConfigError::InvalidDistance {
                train: name.clone(),
                value: data.distance_km,
            })?;

        let length_km = (f64::from(data.cars) * data.car_length_m).m_to_km();

        log::debug!(
            "Train {}: departs {}, arrives {}, length {:.3} km",
            name,
            departure.format(DEPARTURE_FORMAT),
            arrival.format(DEPARTURE_FORMAT),
            length_km
        );

        Ok(Train {
            name,
            departure,
            arrival,
            speed_kmh: data.speed_kmh,
            distance_km: data.distance_km,
            length_km,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn departure(&self) -> NaiveDateTime {
        self.departure
    }

    pub fn arrival(&self) -> NaiveDateTime {
        self.arrival
    }

    pub fn speed_kmh(&self) -> f64 {
        self.speed_kmh
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn length_km(&self) -> f64 {
        self.length_km
    }

    /// Travel time in hours, as derived from departure and arrival.
    pub fn travel_hours(&self) -> f64 {
        seconds(self.arrival - self.departure) / 3600.0
    }

    pub fn is_active(&self, at: NaiveDateTime) -> bool {
        self.departure <= at && at <= self.arrival
    }

    /// Distance travelled by `at`, or `None` while the train is not on the track.
    pub fn position_km(&self, at: NaiveDateTime) -> Option<f64> {
        if !self.is_active(at) {
            return None;
        }
        let elapsed_seconds = seconds(at - self.departure);
        Some(self.speed_kmh.km_after_seconds(elapsed_seconds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn at(value: &str) -> NaiveDateTime {
        parse_clock_time(value).unwrap()
    }

    #[test]
    fn test_derived_values() {
        let train = Train::from_data(&TrainData::new("A", "08:00", 80.0, 240.0, 8, 20.0)).unwrap();
        assert_eq!(train.name(), "A");
        assert_eq!(train.departure(), at("08:00"));
        assert_eq!(train.arrival(), at("11:00"));
        assert_relative_eq!(train.length_km(), 0.16);
        assert_relative_eq!(train.travel_hours(), 3.0);
    }

    #[test]
    fn test_travel_time_matches_distance_over_speed() {
        let cases = [(80.0, 240.0), (60.0, 240.0), (100.0, 240.0), (90.0, 240.0), (7.0, 13.0)];
        for (speed, distance) in cases {
            let train = Train::from_data(&TrainData::new("T", "09:15", speed, distance, 1, 10.0)).unwrap();
            assert_relative_eq!(train.travel_hours(), distance / speed, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_very_short_trip_still_arrives_after_departure() {
        let train = Train::from_data(&TrainData::new("T", "08:00", 1000.0, 1e-7, 1, 10.0)).unwrap();
        assert!(train.arrival() > train.departure());
        assert!(train.travel_hours() > 0.0);
        assert_relative_eq!(train.travel_hours(), 1e-10, epsilon = 1e-12);

        // below a nanosecond of travel
        let train = Train::from_data(&TrainData::new("U", "08:00", 1000.0, 1e-20, 1, 10.0)).unwrap();
        assert_eq!(train.arrival() - train.departure(), TimeDelta::nanoseconds(1));
        assert!(train.is_active(train.departure()));
    }

    #[test]
    fn test_arrival_past_midnight() {
        let train = Train::from_data(&TrainData::new("N", "23:30", 60.0, 60.0, 1, 10.0)).unwrap();
        assert!(train.arrival() > train.departure());
        assert_eq!(train.arrival().format("%H:%M").to_string(), "00:30");
    }

    #[test]
    fn test_position() {
        let train = Train::from_data(&TrainData::new("B", "08:30", 60.0, 240.0, 10, 25.0)).unwrap();
        assert_eq!(train.position_km(at("08:29")), None);
        assert_eq!(train.position_km(at("08:30")), Some(0.0));
        assert_eq!(train.position_km(at("09:45")), Some(75.0));
        assert_eq!(train.position_km(at("12:30")), Some(240.0));
        assert_eq!(train.position_km(at("12:31")), None);
    }

    #[test]
    fn test_invalid_fields() {
        let cases = [
            (TrainData::new("S", "08:00", 0.0, 10.0, 1, 1.0), "speed"),
            (TrainData::new("S", "08:00", -5.0, 10.0, 1, 1.0), "speed"),
            (TrainData::new("D", "08:00", 10.0, 0.0, 1, 1.0), "distance"),
            (TrainData::new("D", "08:00", 10.0, f64::NAN, 1, 1.0), "distance"),
            (TrainData::new("L", "08:00", 10.0, 10.0, 1, -1.0), "car length"),
            (TrainData::new("T", "8am", 10.0, 10.0, 1, 1.0), "departure"),
            (TrainData::new("T", "25:00", 10.0, 10.0, 1, 1.0), "departure"),
        ];
        for (data, field) in cases {
            let err = Train::from_data(&data).unwrap_err();
            let message = err.to_string();
            assert!(message.contains(&format!("train {}", data.name)), "{message}");
            assert!(message.contains(field), "{message}");
        }
    }
}
