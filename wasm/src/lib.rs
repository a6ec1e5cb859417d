//! Treadmill Calculator WASM Module
//!
//! This crate provides WebAssembly bindings so the browser front end can
//! run the metabolic engine locally. Structured inputs and outputs cross
//! the boundary as JSON strings.

use serde::Serialize;
use treadmill_calc_shared::{
    aggregate, compute_metrics as forward_metrics, compute_set_metrics, solve_for_goal, validation, CalcError,
    DisplayMetrics, GoalSpec, Session, SessionTotals, MAX_SETS, MIN_SETS,
};
use wasm_bindgen::prelude::*;

/// Forward metrics for one set, full precision
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub vo2: f64,
    pub mets: f64,
    pub calories_net: f64,
    pub calories_gross: f64,
    pub calories_per_minute_net: f64,
    pub calories_per_minute_gross: f64,
    pub distance_km: f64,
}

/// Calculate VO2, METs, calories and distance for a treadmill set
#[wasm_bindgen]
pub fn compute_metrics(speed_kmh: f64, incline_percent: f64, time_minutes: f64, body_weight_kg: f64) -> Metrics {
    let m = forward_metrics(speed_kmh, incline_percent, time_minutes, body_weight_kg);
    Metrics {
        vo2: m.vo2,
        mets: m.mets,
        calories_net: m.calories_net,
        calories_gross: m.calories_gross,
        calories_per_minute_net: m.calories_per_minute_net,
        calories_per_minute_gross: m.calories_per_minute_gross,
        distance_km: m.distance_km,
    }
}

/// Solve a goal given as JSON; returns the candidate list as JSON (`[]` when
/// no option is feasible)
#[wasm_bindgen]
pub fn solve_for_goal_json(goal_json: &str, body_weight_kg: f64) -> Result<String, JsValue> {
    solve_goal(goal_json, body_weight_kg).map_err(|e| JsValue::from_str(&e))
}

/// Per-set display metrics and session totals for a session given as JSON
#[wasm_bindgen]
pub fn session_report_json(session_json: &str) -> Result<String, JsValue> {
    session_report(session_json).map_err(|e| JsValue::from_str(&e))
}

#[wasm_bindgen]
pub fn clamp_weight(weight_kg: f64) -> f64 {
    validation::clamp_weight(weight_kg)
}

#[wasm_bindgen]
pub fn clamp_speed(speed_kmh: f64) -> f64 {
    validation::clamp_speed(speed_kmh)
}

#[wasm_bindgen]
pub fn clamp_incline(incline_percent: f64) -> f64 {
    validation::clamp_incline(incline_percent)
}

#[wasm_bindgen]
pub fn clamp_time(time_minutes: f64) -> f64 {
    validation::clamp_time(time_minutes)
}

#[derive(Serialize)]
struct SessionReport {
    results: Vec<DisplayMetrics>,
    totals: SessionTotals,
}

fn solve_goal(goal_json: &str, body_weight_kg: f64) -> Result<String, String> {
    let goal: GoalSpec = serde_json::from_str(goal_json).map_err(|e| format!("Invalid goal: {e}"))?;
    let candidates = solve_for_goal(&goal, body_weight_kg);
    serde_json::to_string(&candidates).map_err(|e| e.to_string())
}

fn session_report(session_json: &str) -> Result<String, String> {
    let session: Session = serde_json::from_str(session_json).map_err(|e| format!("Invalid session: {e}"))?;
    if session.sets.len() < MIN_SETS {
        return Err(CalcError::TooFewSets { min: MIN_SETS }.to_string());
    }
    if session.sets.len() > MAX_SETS {
        return Err(CalcError::TooManySets { max: MAX_SETS }.to_string());
    }
    let weight = validation::effective_weight(session.weight_kg);

    let results: Vec<_> = session.sets.iter().map(|set| compute_set_metrics(set, weight)).collect();
    let report = SessionReport {
        results: results.iter().map(|m| m.rounded()).collect(),
        totals: aggregate(&results).rounded(),
    };
    serde_json::to_string(&report).map_err(|e| e.to_string())
}
