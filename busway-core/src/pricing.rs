use serde::{Deserialize, Serialize};

use crate::schedule::Schedule;

/// Per-seat fare used when a schedule arrives without one.
pub const DEFAULT_FALLBACK_FARE: f64 = 550.0;

/// Fare resolution rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FarePolicy {
    /// Applied when the schedule has no fare of its own.
    #[serde(default = "default_fallback_fare")]
    pub fallback_fare: f64,
}

fn default_fallback_fare() -> f64 {
    DEFAULT_FALLBACK_FARE
}

impl Default for FarePolicy {
    fn default() -> Self {
        Self {
            fallback_fare: DEFAULT_FALLBACK_FARE,
        }
    }
}

impl FarePolicy {
    pub fn new(fallback_fare: f64) -> Self {
        Self { fallback_fare }
    }

    /// The schedule's fare, or the fallback when it is missing, zero or not a number.
    pub fn fare_for(&self, schedule: &Schedule) -> f64 {
        schedule
            .fare
            .filter(|fare| fare.is_finite() && *fare > 0.0)
            .unwrap_or(self.fallback_fare)
    }

    pub fn total(&self, schedule: &Schedule, seat_count: usize) -> f64 {
        total_price(seat_count, self.fare_for(schedule))
    }
}

/// Seat count times fare.
pub fn total_price(seat_count: usize, fare_per_seat: f64) -> f64 {
    seat_count as f64 * fare_per_seat
}
