//! Goal solver service
//!
//! Validates a calorie goal before handing it to the solver, so callers can
//! tell a rejected goal apart from a goal no treadmill setting can meet.

use serde::Serialize;
use tracing::{info, warn};
use treadmill_calc_shared::validation::{validate_target, validate_weight};
use treadmill_calc_shared::{solve_for_goal, CandidateWorkout, GoalSpec};

use crate::error::AppResult;

/// Result of solving a valid goal
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "options", rename_all = "snake_case")]
pub enum SolveOutcome {
    /// Candidates in ascending incline order
    Options(Vec<CandidateWorkout>),
    /// No ladder incline reaches the goal within the speed range
    NoFeasibleOptions,
}

impl SolveOutcome {
    pub fn options(&self) -> &[CandidateWorkout] {
        match self {
            SolveOutcome::Options(options) => options,
            SolveOutcome::NoFeasibleOptions => &[],
        }
    }
}

/// Goal service for business logic
pub struct GoalService;

impl GoalService {
    /// Solve `goal` for a body weight
    ///
    /// Rejects an out-of-range weight and a non-positive target or duration.
    pub fn solve(goal: &GoalSpec, body_weight_kg: f64) -> AppResult<SolveOutcome> {
        validate_weight(body_weight_kg)?;
        match *goal {
            GoalSpec::ByTotal {
                target_calories,
                duration_minutes,
                ..
            } => {
                validate_target("target_calories", target_calories)?;
                validate_target("duration_minutes", duration_minutes)?;
            }
            GoalSpec::ByRate {
                target_calories_per_minute,
                ..
            } => validate_target("target_calories_per_minute", target_calories_per_minute)?,
        }

        let candidates = solve_for_goal(goal, body_weight_kg);
        if candidates.is_empty() {
            warn!(?goal, body_weight_kg, "No feasible speed/incline for goal");
            return Ok(SolveOutcome::NoFeasibleOptions);
        }

        info!(?goal, body_weight_kg, options = candidates.len(), "Solved goal");
        Ok(SolveOutcome::Options(candidates))
    }
}
