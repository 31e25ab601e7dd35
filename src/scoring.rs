//! Exercise suitability scoring.
//!
//! Every hour starts at 100 points. Each weather factor deducts the penalty of
//! the highest tier it reaches; penalties from different factors add up and
//! the result is clamped to 0-100.

/// Maximum (and starting) score
pub const MAX_SCORE: f64 = 100.0;

/// Per-factor deductions for one hour, in points.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Deductions {
    /// Precipitation probability penalty
    pub precipitation: f64,
    /// Heat penalty, from the apparent temperature
    pub heat: f64,
    /// Cold penalty, from the air temperature
    pub cold: f64,
    /// Penalty for warm and humid air
    pub humidity: f64,
    /// Wind penalty
    pub wind: f64,
}

impl Deductions {
    /// Computes every factor's deduction for the given conditions.
    pub fn assess(
        temperature: f64,
        apparent_temperature: f64,
        precipitation_probability: u8,
        wind_speed: f64,
        humidity: u8,
    ) -> Self {
        Self {
            precipitation: precipitation_penalty(precipitation_probability),
            heat: heat_penalty(apparent_temperature),
            cold: cold_penalty(temperature),
            humidity: humidity_penalty(temperature, humidity),
            wind: wind_penalty(wind_speed),
        }
    }

    /// Sum of all deductions before clamping
    pub fn total(&self) -> f64 {
        self.precipitation + self.heat + self.cold + self.humidity + self.wind
    }

    /// Final score: 100 minus all deductions, clamped to 0-100
    pub fn score(&self) -> f64 {
        (MAX_SCORE - self.total()).clamp(0.0, MAX_SCORE)
    }
}

/// Scores an hour for outdoor exercise on a 0-100 scale.
pub fn score(
    temperature: f64,
    apparent_temperature: f64,
    precipitation_probability: u8,
    wind_speed: f64,
    humidity: u8,
) -> f64 {
    Deductions::assess(
        temperature,
        apparent_temperature,
        precipitation_probability,
        wind_speed,
        humidity,
    )
    .score()
}

fn precipitation_penalty(probability: u8) -> f64 {
    if probability >= 80 {
        80.0
    } else if probability >= 50 {
        50.0
    } else if probability >= 30 {
        20.0
    } else {
        0.0
    }
}

fn heat_penalty(apparent_temperature: f64) -> f64 {
    if apparent_temperature > 35.0 {
        100.0
    } else if apparent_temperature > 31.0 {
        60.0
    } else if apparent_temperature > 28.0 {
        30.0
    } else {
        0.0
    }
}

fn cold_penalty(temperature: f64) -> f64 {
    if temperature < 0.0 {
        40.0
    } else if temperature < 5.0 {
        20.0
    } else if temperature < 10.0 {
        10.0
    } else {
        0.0
    }
}

// Only applies above 25°C.
fn humidity_penalty(temperature: f64, humidity: u8) -> f64 {
    if temperature <= 25.0 {
        0.0
    } else if humidity > 80 {
        15.0
    } else if humidity > 60 {
        10.0
    } else {
        0.0
    }
}

fn wind_penalty(wind_speed: f64) -> f64 {
    if wind_speed > 25.0 {
        30.0
    } else if wind_speed > 15.0 {
        10.0
    } else {
        0.0
    }
}
