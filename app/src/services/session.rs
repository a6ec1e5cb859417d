//! Workout session service
//!
//! Provides the session editing workflow:
//! - Body weight entry with normalization
//! - Adding, removing and editing sets within the 1-10 set bounds
//! - Per-set metrics and session totals
//!
//! Every edit loads the stored session, applies the change and saves it.

use serde::Serialize;
use tracing::{debug, info};
use treadmill_calc_shared::validation::{
    clamp_set_incline, clamp_set_minutes, clamp_set_seconds, clamp_speed, effective_weight,
    normalize_weight_entry,
};
use treadmill_calc_shared::{
    aggregate, compute_set_metrics, CalcError, DisplayMetrics, MetricsResult, SessionTotals,
    WorkoutSet, MAX_SETS, MIN_SETS,
};

use crate::error::{AppError, AppResult};
use crate::repositories::{SessionRecord, SessionRepository, SessionSet};
use crate::state::AppState;

/// Editable field of a set
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SetField {
    Speed,
    Incline,
    #[value(name = "minutes")]
    TimeMinutes,
    #[value(name = "seconds")]
    TimeSeconds,
}

/// One row of the session report
#[derive(Debug, Clone, Serialize)]
pub struct SetReport {
    pub id: String,
    #[serde(flatten)]
    pub set: WorkoutSet,
    pub metrics: DisplayMetrics,
}

/// Display view of a session
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub weight_kg: f64,
    /// Weight the metrics were computed with
    pub effective_weight_kg: f64,
    pub sets: Vec<SetReport>,
    pub totals: SessionTotals,
}

/// Session service for business logic
pub struct SessionService;

impl SessionService {
    pub fn load(state: &AppState) -> AppResult<SessionRecord> {
        SessionRepository::load(state.store(), state.config().session.default_weight_kg)
    }

    /// Set the body weight: 0.1 kg resolution, clamped to the supported range
    pub fn set_weight(state: &AppState, weight_kg: f64) -> AppResult<SessionRecord> {
        if !weight_kg.is_finite() {
            return Err(AppError::InvalidInput("weight must be a number".to_string()));
        }
        Self::edit(state, |record| {
            record.weight_kg = normalize_weight_entry(weight_kg);
            debug!(weight_kg = record.weight_kg, "Updated body weight");
            Ok(())
        })
    }

    /// Append a default set
    pub fn add_set(state: &AppState) -> AppResult<SessionRecord> {
        Self::edit(state, add_set)
    }

    pub fn remove_set(state: &AppState, index: usize) -> AppResult<SessionRecord> {
        Self::edit(state, |record| remove_set(record, index))
    }

    pub fn update_set(state: &AppState, index: usize, field: SetField, value: f64) -> AppResult<SessionRecord> {
        Self::edit(state, |record| update_set(record, index, field, value))
    }

    /// Back to the default weight and a single default set
    pub fn reset(state: &AppState) -> AppResult<SessionRecord> {
        let record = SessionRecord::new(state.config().session.default_weight_kg);
        SessionRepository::save(state.store(), &record)?;
        info!("Session reset");
        Ok(record)
    }

    /// Full-precision metrics per set
    pub fn results(record: &SessionRecord) -> Vec<MetricsResult> {
        let weight = effective_weight(record.weight_kg);
        record.sets.iter().map(|s| compute_set_metrics(&s.set, weight)).collect()
    }

    /// Totals summed at full precision, then rounded for display
    pub fn totals(record: &SessionRecord) -> SessionTotals {
        aggregate(&Self::results(record)).rounded()
    }

    pub fn report(record: &SessionRecord) -> SessionReport {
        let results = Self::results(record);
        SessionReport {
            weight_kg: record.weight_kg,
            effective_weight_kg: effective_weight(record.weight_kg),
            sets: record
                .sets
                .iter()
                .zip(&results)
                .map(|(s, m)| SetReport {
                    id: s.id.clone(),
                    set: s.set,
                    metrics: m.rounded(),
                })
                .collect(),
            totals: aggregate(&results).rounded(),
        }
    }

    fn edit<F>(state: &AppState, apply: F) -> AppResult<SessionRecord>
    where
        F: FnOnce(&mut SessionRecord) -> Result<(), CalcError>,
    {
        let mut record = Self::load(state)?;
        apply(&mut record)?;
        SessionRepository::save(state.store(), &record)?;
        Ok(record)
    }
}

fn add_set(record: &mut SessionRecord) -> Result<(), CalcError> {
    if record.sets.len() >= MAX_SETS {
        return Err(CalcError::TooManySets { max: MAX_SETS });
    }
    record.sets.push(SessionSet::new(WorkoutSet::default()));
    debug!(sets = record.sets.len(), "Added set");
    Ok(())
}

fn remove_set(record: &mut SessionRecord, index: usize) -> Result<(), CalcError> {
    let len = record.sets.len();
    if index >= len {
        return Err(CalcError::SetIndexOutOfRange { index, len });
    }
    if len <= MIN_SETS {
        return Err(CalcError::TooFewSets { min: MIN_SETS });
    }
    record.sets.remove(index);
    debug!(index, sets = record.sets.len(), "Removed set");
    Ok(())
}

fn update_set(record: &mut SessionRecord, index: usize, field: SetField, value: f64) -> Result<(), CalcError> {
    let len = record.sets.len();
    let set = &mut record
        .sets
        .get_mut(index)
        .ok_or(CalcError::SetIndexOutOfRange { index, len })?
        .set;

    match field {
        SetField::Speed => set.speed_kmh = clamp_speed(value),
        SetField::Incline => set.incline_percent = clamp_set_incline(value),
        SetField::TimeMinutes => set.time_minutes = clamp_set_minutes(value),
        SetField::TimeSeconds => set.time_seconds = clamp_set_seconds(value),
    }
    debug!(index, ?field, value, "Updated set");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_fresh_session() {
        let state = AppState::in_memory();
        let record = SessionService::load(&state).unwrap();
        assert_eq!(record.weight_kg, 85.0);
        assert_eq!(record.sets.len(), 1);
        assert_eq!(record.sets[0].set, WorkoutSet::default());
    }

    #[rstest]
    #[case(72.34, 72.3)]
    #[case(10.0, 30.0)]
    #[case(250.0, 200.0)]
    fn test_set_weight_normalizes(#[case] input: f64, #[case] stored: f64) {
        let state = AppState::in_memory();
        let record = SessionService::set_weight(&state, input).unwrap();
        assert_eq!(record.weight_kg, stored);
        assert_eq!(SessionService::load(&state).unwrap().weight_kg, stored);
    }

    #[test]
    fn test_set_weight_rejects_nan() {
        let state = AppState::in_memory();
        assert!(matches!(
            SessionService::set_weight(&state, f64::NAN),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_add_set_stops_at_max() {
        let state = AppState::in_memory();
        for expected in 2..=MAX_SETS {
            assert_eq!(SessionService::add_set(&state).unwrap().sets.len(), expected);
        }
        let err = SessionService::add_set(&state).unwrap_err();
        assert!(matches!(err, AppError::Domain(CalcError::TooManySets { max: 10 })));
        assert_eq!(SessionService::load(&state).unwrap().sets.len(), MAX_SETS);
    }

    #[test]
    fn test_remove_set() {
        let state = AppState::in_memory();
        SessionService::add_set(&state).unwrap();
        SessionService::update_set(&state, 1, SetField::Speed, 6.0).unwrap();

        let record = SessionService::remove_set(&state, 0).unwrap();
        assert_eq!(record.sets.len(), 1);
        assert_eq!(record.sets[0].set.speed_kmh, 6.0);
    }

    #[test]
    fn test_remove_last_set_is_refused() {
        let state = AppState::in_memory();
        let err = SessionService::remove_set(&state, 0).unwrap_err();
        assert!(matches!(err, AppError::Domain(CalcError::TooFewSets { min: 1 })));
    }

    #[test]
    fn test_remove_bad_index() {
        let state = AppState::in_memory();
        SessionService::add_set(&state).unwrap();
        let err = SessionService::remove_set(&state, 5).unwrap_err();
        assert!(matches!(
            err,
            AppError::Domain(CalcError::SetIndexOutOfRange { index: 5, len: 2 })
        ));
    }

    #[rstest]
    #[case(SetField::Speed, 25.0, WorkoutSet::new(20.0, 10.0, 90, 0))]
    #[case(SetField::Speed, 0.2, WorkoutSet::new(1.0, 10.0, 90, 0))]
    #[case(SetField::Incline, 7.6, WorkoutSet::new(3.5, 8.0, 90, 0))]
    #[case(SetField::Incline, 40.0, WorkoutSet::new(3.5, 25.0, 90, 0))]
    #[case(SetField::TimeMinutes, 45.4, WorkoutSet::new(3.5, 10.0, 45, 0))]
    #[case(SetField::TimeMinutes, 500.0, WorkoutSet::new(3.5, 10.0, 120, 0))]
    #[case(SetField::TimeSeconds, 75.0, WorkoutSet::new(3.5, 10.0, 90, 59))]
    #[case(SetField::TimeSeconds, -3.0, WorkoutSet::new(3.5, 10.0, 90, 0))]
    fn test_update_set_clamps(#[case] field: SetField, #[case] value: f64, #[case] expected: WorkoutSet) {
        let state = AppState::in_memory();
        let record = SessionService::update_set(&state, 0, field, value).unwrap();
        assert_eq!(record.sets[0].set, expected);
    }

    #[test]
    fn test_update_keeps_row_id() {
        let state = AppState::in_memory();
        let id = SessionService::load(&state).unwrap().sets[0].id.clone();
        let record = SessionService::update_set(&state, 0, SetField::Speed, 5.0).unwrap();
        assert_eq!(record.sets[0].id, id);
    }

    #[test]
    fn test_reset() {
        let state = AppState::in_memory();
        SessionService::set_weight(&state, 70.0).unwrap();
        SessionService::add_set(&state).unwrap();

        let record = SessionService::reset(&state).unwrap();
        assert_eq!(record.weight_kg, 85.0);
        assert_eq!(record.sets.len(), 1);
        assert_eq!(SessionService::load(&state).unwrap(), record);
    }

    #[test]
    fn test_results_fall_back_to_default_weight() {
        let mut record = SessionRecord::new(85.0);
        record.sets[0].set = WorkoutSet::new(5.0, 0.0, 30, 0);
        let at_default = SessionService::results(&record);

        record.weight_kg = 0.0;
        assert_eq!(SessionService::results(&record), at_default);
    }

    #[test]
    fn test_report_totals() {
        let mut record = SessionRecord::new(85.0);
        record.sets[0].set = WorkoutSet::new(5.0, 0.0, 30, 0);
        record.sets.push(SessionSet::new(WorkoutSet::new(5.0, 0.0, 30, 0)));

        let report = SessionService::report(&record);
        assert_eq!(report.sets.len(), 2);
        assert_eq!(report.sets[0].metrics.calories_net, 202.4);
        // Summed at full precision: 2 × 202.38 = 404.76
        assert_eq!(report.totals.calories_net, 404.8);
        assert_eq!(report.totals.distance_km, 5.0);
        assert_eq!(SessionService::totals(&record), report.totals);
    }
}
