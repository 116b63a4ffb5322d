pub type TrainName = String;

pub trait LengthConv {
    fn value(&self) -> f64;

    fn m_to_km(&self) -> f64 {
        self.value() / 1000.0
    }

    fn km_to_m(&self) -> f64 {
        self.value() * 1000.0
    }
}

impl LengthConv for f64 {
    fn value(&self) -> f64 {
        *self
    }
}

pub trait SpeedConv {
    fn value(&self) -> f64;

    /// Distance in km covered at this speed (km/h) over `seconds`.
    fn km_after_seconds(&self, seconds: f64) -> f64 {
        self.value() * seconds / 3600.0
    }

    fn hours_for_km(&self, km: f64) -> f64 {
        km / self.value()
    }
}

impl SpeedConv for f64 {
    fn value(&self) -> f64 {
        *self
    }
}

pub fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

pub fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
