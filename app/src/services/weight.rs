//! Weight and deficit log service
//!
//! Provides business logic for the daily log including:
//! - Logging one weight/deficit entry per date
//! - Chart series and period summary
//! - Plain-text and CSV export

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::NaiveDate;
use tracing::info;
use treadmill_calc_shared::validation::validate_deficit;
use treadmill_calc_shared::{CalcError, LogSummary, WeightDeficitLog, WeightDeficitRecord};

use crate::error::AppResult;
use crate::repositories::WeightLogRepository;
use crate::state::AppState;

/// Weight log service for business logic
pub struct WeightLogService;

impl WeightLogService {
    pub fn load(state: &AppState) -> AppResult<WeightDeficitLog> {
        WeightLogRepository::load(state.store())
    }

    /// Record weight and deficit for a date, replacing any earlier entry
    pub fn log_entry(
        state: &AppState,
        date: NaiveDate,
        weight_kg: f64,
        deficit_kcal: f64,
    ) -> AppResult<WeightDeficitRecord> {
        validate_deficit(deficit_kcal)?;

        let mut log = Self::load(state)?;
        let replaced = log.get(date).is_some();
        let record = log.upsert(date, weight_kg, deficit_kcal)?;
        WeightLogRepository::save(state.store(), &log)?;

        info!(%date, weight_kg, deficit_kcal, replaced, "Logged weight entry");
        Ok(record)
    }

    pub fn entry(state: &AppState, date: NaiveDate) -> AppResult<WeightDeficitRecord> {
        let log = Self::load(state)?;
        let record = log.get(date).copied().ok_or(CalcError::EntryNotFound(date))?;
        Ok(record)
    }

    pub fn remove_entry(state: &AppState, date: NaiveDate) -> AppResult<WeightDeficitRecord> {
        let mut log = Self::load(state)?;
        let removed = log.remove(date)?;
        WeightLogRepository::save(state.store(), &log)?;

        info!(%date, "Removed weight entry");
        Ok(removed)
    }

    /// Entries newest first
    pub fn list(state: &AppState) -> AppResult<Vec<WeightDeficitRecord>> {
        Ok(Self::load(state)?.table_rows())
    }

    /// Chart series, thinned to the configured maximum number of points
    pub fn chart(state: &AppState) -> AppResult<Vec<WeightDeficitRecord>> {
        let max_points = state.config().weight_log.max_chart_points;
        Ok(Self::load(state)?.chart_points(max_points))
    }

    pub fn summary(state: &AppState) -> AppResult<Option<LogSummary>> {
        Ok(Self::load(state)?.summary())
    }

    /// Plain-text table with the period summary; `None` when the log is empty
    pub fn export_table(state: &AppState) -> AppResult<Option<String>> {
        Ok(Self::load(state)?.export_table())
    }

    /// Write the log as CSV to `path`, returning the number of entries written
    pub fn export_csv(state: &AppState, path: &Path) -> AppResult<usize> {
        let log = Self::load(state)?;
        let file = File::create(path)?;
        log.export_csv(BufWriter::new(file))?;

        info!(path = %path.display(), entries = log.len(), "Exported weight log");
        Ok(log.len())
    }
}
