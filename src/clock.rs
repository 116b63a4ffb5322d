use chrono::{NaiveDateTime, TimeDelta};

/// Simulated wall clock that advances by a fixed step from `start` up to and
/// including `end`.
pub struct SimulationClock {
    start_point: NaiveDateTime,
    end_point: NaiveDateTime,
    step: TimeDelta,
    next_tick: Option<NaiveDateTime>,
}

impl SimulationClock {
    pub fn new(start_point: NaiveDateTime, end_point: NaiveDateTime, step: TimeDelta) -> Self {
        SimulationClock {
            start_point,
            end_point,
            step,
            next_tick: Some(start_point),
        }
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start_point
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end_point
    }

    /// Returns the current tick and moves the clock one step forward, or
    /// `None` once the clock has passed `end`.
    pub fn tick(&mut self) -> Option<NaiveDateTime> {
        let now = self.next_tick.filter(|t| *t <= self.end_point)?;
        // None past chrono's range, which also ends the run
        self.next_tick = now.checked_add_signed(self.step);
        Some(now)
    }
}

impl Iterator for SimulationClock {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<Self::Item> {
        self.tick()
    }
}
