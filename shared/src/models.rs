//! Data models for the treadmill calculator

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body weight used when the entered weight is missing or out of range
pub const DEFAULT_WEIGHT_KG: f64 = 85.0;

/// Maximum number of sets in a session
pub const MAX_SETS: usize = 10;

/// Minimum number of sets in a session
pub const MIN_SETS: usize = 1;

/// Default speed for a new set (km/h)
pub const DEFAULT_SPEED_KMH: f64 = 3.5;

/// Default incline for a new set (%)
pub const DEFAULT_INCLINE_PERCENT: f64 = 10.0;

/// Default duration for a new set (minutes)
pub const DEFAULT_TIME_MINUTES: u32 = 90;

/// One treadmill segment at constant speed and incline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct WorkoutSet {
    #[validate(range(min = 1.0, max = 20.0))]
    pub speed_kmh: f64,
    #[validate(range(min = 0.0, max = 25.0))]
    pub incline_percent: f64,
    #[validate(range(max = 120))]
    pub time_minutes: u32,
    #[validate(range(max = 59))]
    pub time_seconds: u32,
}

impl Default for WorkoutSet {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
            incline_percent: DEFAULT_INCLINE_PERCENT,
            time_minutes: DEFAULT_TIME_MINUTES,
            time_seconds: 0,
        }
    }
}

impl WorkoutSet {
    pub fn new(speed_kmh: f64, incline_percent: f64, time_minutes: u32, time_seconds: u32) -> Self {
        Self {
            speed_kmh,
            incline_percent,
            time_minutes,
            time_seconds,
        }
    }

    /// Duration as fractional minutes
    pub fn total_minutes(&self) -> f64 {
        self.time_minutes as f64 + self.time_seconds as f64 / 60.0
    }
}

/// A workout session: one body weight shared by 1-10 sets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub weight_kg: f64,
    pub sets: Vec<WorkoutSet>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            weight_kg: DEFAULT_WEIGHT_KG,
            sets: vec![WorkoutSet::default()],
        }
    }
}

/// One day in the weight and calorie deficit log
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct WeightDeficitRecord {
    pub date: NaiveDate,
    #[serde(rename = "weight")]
    #[validate(range(min = 30.0, max = 200.0))]
    pub weight_kg: f64,
    #[serde(rename = "deficit")]
    pub deficit_kcal: f64,
}
