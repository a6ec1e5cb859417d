//! Goal-to-workout solver
//!
//! Inverts the ACSM treadmill equation: given a calorie goal and a body
//! weight, find the speed that meets the goal at each incline of a fixed
//! ladder. Inclines whose speed falls outside the treadmill envelope are
//! dropped, so an empty result simply means the goal is out of reach.

use serde::{Deserialize, Serialize};

use crate::metrics::{compute_metrics, HORIZONTAL_COEFFICIENT, KMH_PER_MPS, RESTING_VO2, VERTICAL_COEFFICIENT};
use crate::validation::{is_valid_weight, MAX_SPEED_KMH, MIN_SPEED_KMH};

/// Inclines (%) the solver offers, ascending
pub const INCLINE_LADDER: [f64; 8] = [0.0, 2.0, 4.0, 6.0, 8.0, 10.0, 12.0, 15.0];

/// Reporting window for rate goals (minutes)
pub const RATE_REPORT_MINUTES: f64 = 60.0;

// ============================================================================
// Goal Types
// ============================================================================

/// Which calories a goal counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CalorieAccounting {
    /// Exercise only, resting metabolism excluded
    #[default]
    Net,
    /// Total, resting metabolism included
    Gross,
}

/// A calorie goal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GoalSpec {
    /// Burn `target_calories` over `duration_minutes`
    ByTotal {
        target_calories: f64,
        duration_minutes: f64,
        #[serde(default)]
        accounting: CalorieAccounting,
    },
    /// Burn `target_calories_per_minute`, sustained
    ByRate {
        target_calories_per_minute: f64,
        #[serde(default)]
        accounting: CalorieAccounting,
    },
}

impl GoalSpec {
    pub fn accounting(&self) -> CalorieAccounting {
        match self {
            GoalSpec::ByTotal { accounting, .. } | GoalSpec::ByRate { accounting, .. } => *accounting,
        }
    }

    /// Duration the candidates' calories are reported over
    pub fn report_minutes(&self) -> f64 {
        match self {
            GoalSpec::ByTotal { duration_minutes, .. } => *duration_minutes,
            GoalSpec::ByRate { .. } => RATE_REPORT_MINUTES,
        }
    }

    /// METs needed to meet the goal
    ///
    /// Net: METs = kcal / (weight × hours) + 1. Gross: METs = kcal / (weight × hours).
    /// Rate goals use a one-minute window. Returns `None` for an
    /// unreachable goal: non-positive target or duration, or a body
    /// weight outside the supported range.
    pub fn target_mets(&self, body_weight_kg: f64) -> Option<f64> {
        if !is_valid_weight(body_weight_kg) {
            return None;
        }

        let (calories, hours) = match *self {
            GoalSpec::ByTotal {
                target_calories,
                duration_minutes,
                ..
            } => (target_calories, duration_minutes / 60.0),
            GoalSpec::ByRate {
                target_calories_per_minute,
                ..
            } => (target_calories_per_minute, 1.0 / 60.0),
        };

        if !(calories.is_finite() && calories > 0.0 && hours.is_finite() && hours > 0.0) {
            return None;
        }

        let energy_mets = calories / (body_weight_kg * hours);
        Some(match self.accounting() {
            CalorieAccounting::Net => energy_mets + 1.0,
            CalorieAccounting::Gross => energy_mets,
        })
    }
}

// ============================================================================
// Intensity
// ============================================================================

/// Intensity bucket by METs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntensityLevel {
    Light,
    Moderate,
    Vigorous,
    VeryVigorous,
}

impl IntensityLevel {
    /// Classify METs against the 3 / 6 / 9 thresholds (strict less-than)
    pub fn from_mets(mets: f64) -> Self {
        if mets < 3.0 {
            IntensityLevel::Light
        } else if mets < 6.0 {
            IntensityLevel::Moderate
        } else if mets < 9.0 {
            IntensityLevel::Vigorous
        } else {
            IntensityLevel::VeryVigorous
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IntensityLevel::Light => "Light",
            IntensityLevel::Moderate => "Moderate",
            IntensityLevel::Vigorous => "Vigorous",
            IntensityLevel::VeryVigorous => "Very Vigorous",
        }
    }
}

// ============================================================================
// Solver
// ============================================================================

/// One feasible speed/incline pairing for a goal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandidateWorkout {
    pub speed_kmh: f64,
    pub incline_percent: f64,
    pub mets: f64,
    pub intensity: IntensityLevel,
    /// Calories over the report window (goal duration, or 60 min for rate goals)
    pub calories_net: f64,
    pub calories_gross: f64,
    pub calories_per_minute_net: f64,
    pub calories_per_minute_gross: f64,
    pub report_minutes: f64,
}

impl CandidateWorkout {
    pub fn intensity_label(&self) -> &'static str {
        self.intensity.label()
    }
}

/// Speed (km/h) that reaches `target_vo2` at an incline
///
/// Solves VO2 = 3.5 + v × (12 + 54 × grade) for v.
pub fn solve_speed_kmh(target_vo2: f64, incline_percent: f64) -> f64 {
    let grade = incline_percent / 100.0;
    let speed_mps = (target_vo2 - RESTING_VO2) / (HORIZONTAL_COEFFICIENT + VERTICAL_COEFFICIENT * grade);
    speed_mps * KMH_PER_MPS
}

/// Enumerate speed/incline options meeting a goal
///
/// Returns candidates in ascending incline order. An empty vector means no
/// ladder incline reaches the goal within 1-20 km/h.
pub fn solve_for_goal(goal: &GoalSpec, body_weight_kg: f64) -> Vec<CandidateWorkout> {
    let Some(target_mets) = goal.target_mets(body_weight_kg) else {
        return Vec::new();
    };
    let target_vo2 = target_mets * RESTING_VO2;
    let report_minutes = goal.report_minutes();

    let mut candidates: Vec<CandidateWorkout> = INCLINE_LADDER
        .iter()
        .filter_map(|&incline| {
            let speed_kmh = solve_speed_kmh(target_vo2, incline);
            if !(MIN_SPEED_KMH..=MAX_SPEED_KMH).contains(&speed_kmh) {
                return None;
            }

            let m = compute_metrics(speed_kmh, incline, report_minutes, body_weight_kg);
            Some(CandidateWorkout {
                speed_kmh,
                incline_percent: incline,
                mets: m.mets,
                intensity: IntensityLevel::from_mets(m.mets),
                calories_net: m.calories_net,
                calories_gross: m.calories_gross,
                calories_per_minute_net: m.calories_per_minute_net,
                calories_per_minute_gross: m.calories_per_minute_gross,
                report_minutes,
            })
        })
        .collect();

    candidates.sort_by(|a, b| a.incline_percent.total_cmp(&b.incline_percent));
    candidates
}
