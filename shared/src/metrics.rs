//! Forward treadmill metrics
//!
//! Computes oxygen consumption, METs, calories and distance for a single
//! treadmill set using the ACSM walking/running equation, and folds
//! per-set results into session totals.
//!
//! # Design Principles
//!
//! 1. **Total Functions**: Every input produces a result, never an error
//! 2. **Full Precision**: Values are rounded only at the display boundary
//! 3. **Range Agnostic**: Clamping lives in [`crate::validation`], not here

use serde::{Deserialize, Serialize};

use crate::models::WorkoutSet;

/// Resting oxygen consumption, ml O2 per kg per minute (1 MET)
pub const RESTING_VO2: f64 = 3.5;

/// Horizontal component coefficient of the ACSM equation
pub const HORIZONTAL_COEFFICIENT: f64 = 12.0;

/// Vertical component coefficient of the ACSM equation
pub const VERTICAL_COEFFICIENT: f64 = 54.0;

/// km/h per m/s
pub const KMH_PER_MPS: f64 = 3.6;

/// Accuracy caveat shown alongside every estimate
pub const ACCURACY_NOTE: &str =
    "Estimates follow the ACSM treadmill equation and are typically within 5-10% of measured expenditure.";

// ============================================================================
// Result Types
// ============================================================================

/// Metrics for one treadmill set, at full precision
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsResult {
    /// Oxygen consumption in ml/kg/min
    pub vo2: f64,
    /// Metabolic equivalents
    pub mets: f64,
    /// Exercise-only calories (resting metabolism subtracted)
    pub calories_net: f64,
    /// Total calories including resting metabolism
    pub calories_gross: f64,
    pub calories_per_minute_net: f64,
    pub calories_per_minute_gross: f64,
    pub distance_km: f64,
}

/// Display-ready metrics
///
/// vo2 and METs carry two decimals; calories, rates and distance one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayMetrics {
    pub vo2: f64,
    pub mets: f64,
    pub calories_net: f64,
    pub calories_gross: f64,
    pub calories_per_minute_net: f64,
    pub calories_per_minute_gross: f64,
    pub distance_km: f64,
}

impl MetricsResult {
    /// All-zero result, the identity for aggregation
    pub const ZERO: MetricsResult = MetricsResult {
        vo2: 0.0,
        mets: 0.0,
        calories_net: 0.0,
        calories_gross: 0.0,
        calories_per_minute_net: 0.0,
        calories_per_minute_gross: 0.0,
        distance_km: 0.0,
    };

    /// Round for display
    pub fn rounded(&self) -> DisplayMetrics {
        DisplayMetrics {
            vo2: round_to(self.vo2, 2),
            mets: round_to(self.mets, 2),
            calories_net: round_to(self.calories_net, 1),
            calories_gross: round_to(self.calories_gross, 1),
            calories_per_minute_net: round_to(self.calories_per_minute_net, 1),
            calories_per_minute_gross: round_to(self.calories_per_minute_gross, 1),
            distance_km: round_to(self.distance_km, 1),
        }
    }
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

// ============================================================================
// ACSM Equation
// ============================================================================

/// Oxygen consumption for a speed and incline
///
/// Formula: VO2 = 3.5 + 12 × v + 54 × v × grade, with v in m/s
pub fn calculate_vo2(speed_kmh: f64, incline_percent: f64) -> f64 {
    let speed_mps = speed_kmh / KMH_PER_MPS;
    let grade = incline_percent / 100.0;
    RESTING_VO2 + HORIZONTAL_COEFFICIENT * speed_mps + VERTICAL_COEFFICIENT * speed_mps * grade
}

/// Compute all metrics for a treadmill set
///
/// Net calories = (METs - 1) × weight(kg) × hours, gross calories =
/// METs × weight(kg) × hours. A zero or negative duration yields zero
/// energy, distance and rates.
pub fn compute_metrics(
    speed_kmh: f64,
    incline_percent: f64,
    time_minutes: f64,
    body_weight_kg: f64,
) -> MetricsResult {
    let minutes = time_minutes.max(0.0);
    let hours = minutes / 60.0;

    let vo2 = calculate_vo2(speed_kmh, incline_percent);
    let mets = vo2 / RESTING_VO2;

    let calories_gross = mets * body_weight_kg * hours;
    let calories_net = (mets - 1.0) * body_weight_kg * hours;
    let distance_km = speed_kmh * hours;

    let (calories_per_minute_net, calories_per_minute_gross) = if minutes > 0.0 {
        (calories_net / minutes, calories_gross / minutes)
    } else {
        (0.0, 0.0)
    };

    MetricsResult {
        vo2,
        mets,
        calories_net,
        calories_gross,
        calories_per_minute_net,
        calories_per_minute_gross,
        distance_km,
    }
}

/// Compute metrics for a [`WorkoutSet`]
pub fn compute_set_metrics(set: &WorkoutSet, body_weight_kg: f64) -> MetricsResult {
    compute_metrics(set.speed_kmh, set.incline_percent, set.total_minutes(), body_weight_kg)
}

// ============================================================================
// Aggregation
// ============================================================================

/// Session totals summed from per-set results
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionTotals {
    pub calories_net: f64,
    pub calories_gross: f64,
    pub distance_km: f64,
    pub set_count: usize,
}

impl SessionTotals {
    /// Round once, after summation
    pub fn rounded(&self) -> SessionTotals {
        SessionTotals {
            calories_net: round_to(self.calories_net, 1),
            calories_gross: round_to(self.calories_gross, 1),
            distance_km: round_to(self.distance_km, 1),
            set_count: self.set_count,
        }
    }
}

/// Sum per-set results into session totals
pub fn aggregate(results: &[MetricsResult]) -> SessionTotals {
    results
        .iter()
        .fold(SessionTotals::default(), |acc, r| SessionTotals {
            calories_net: acc.calories_net + r.calories_net,
            calories_gross: acc.calories_gross + r.calories_gross,
            distance_km: acc.distance_km + r.distance_km,
            set_count: acc.set_count + 1,
        })
}
