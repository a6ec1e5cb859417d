//! Daily weight and calorie deficit log
//!
//! Keeps one record per calendar day, ordered by date, and derives the
//! trend views the presentation layer draws: a (possibly sampled) chart
//! series, a summary of the whole period, and plain-text / CSV exports.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::models::WeightDeficitRecord;
use crate::validation::validate_weight;

/// Chart series longer than this are sampled
pub const MAX_CHART_POINTS: usize = 500;

/// Window for the weight moving average in [`LogSummary`]
pub const MOVING_AVERAGE_DAYS: usize = 7;

/// Format a date as DD/MM/YYYY for the exported table
pub fn format_table_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Weight trend over the logged period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSummary {
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    /// Calendar days covered, both ends included
    pub total_days: i64,
    pub start_weight_kg: f64,
    pub current_weight_kg: f64,
    /// Start minus current: positive when weight was lost
    pub weight_change_kg: f64,
    pub total_deficit_kcal: f64,
    pub average_deficit_kcal: f64,
    pub moving_average_kg: Option<f64>,
    pub entries_count: usize,
}

/// Weight and deficit records, one per date, ascending
///
/// Serializes as a plain JSON array; build from stored records with
/// [`WeightDeficitLog::from_records`] so ordering is restored.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WeightDeficitLog {
    records: Vec<WeightDeficitRecord>,
}

impl WeightDeficitLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from records in any order; later duplicates of a date win
    pub fn from_records(records: impl IntoIterator<Item = WeightDeficitRecord>) -> Self {
        let mut log = Self::new();
        for record in records {
            log.insert_sorted(record);
        }
        log
    }

    /// Add or replace the record for `date`
    ///
    /// The weight must be within the supported body weight range; a
    /// non-finite deficit is stored as zero.
    pub fn upsert(&mut self, date: NaiveDate, weight_kg: f64, deficit_kcal: f64) -> CalcResult<WeightDeficitRecord> {
        validate_weight(weight_kg)?;
        let record = WeightDeficitRecord {
            date,
            weight_kg,
            deficit_kcal: if deficit_kcal.is_finite() { deficit_kcal } else { 0.0 },
        };
        self.insert_sorted(record);
        Ok(record)
    }

    fn insert_sorted(&mut self, record: WeightDeficitRecord) {
        match self.records.binary_search_by(|r| r.date.cmp(&record.date)) {
            Ok(pos) => self.records[pos] = record,
            Err(pos) => self.records.insert(pos, record),
        }
    }

    pub fn get(&self, date: NaiveDate) -> Option<&WeightDeficitRecord> {
        self.records
            .binary_search_by(|r| r.date.cmp(&date))
            .ok()
            .map(|pos| &self.records[pos])
    }

    /// Remove the record for `date`
    pub fn remove(&mut self, date: NaiveDate) -> CalcResult<WeightDeficitRecord> {
        match self.records.binary_search_by(|r| r.date.cmp(&date)) {
            Ok(pos) => Ok(self.records.remove(pos)),
            Err(_) => Err(CalcError::EntryNotFound(date)),
        }
    }

    /// Records in ascending date order
    pub fn records(&self) -> &[WeightDeficitRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records newest first, as listed in the log table
    pub fn table_rows(&self) -> Vec<WeightDeficitRecord> {
        self.records.iter().rev().copied().collect()
    }

    /// Chart series, ascending
    ///
    /// When there are more than `max_points` records every
    /// `ceil(n / max_points)`-th record is kept, plus the last one.
    pub fn chart_points(&self, max_points: usize) -> Vec<WeightDeficitRecord> {
        let n = self.records.len();
        if max_points == 0 || n <= max_points {
            return self.records.clone();
        }
        let step = n.div_ceil(max_points);
        self.records
            .iter()
            .enumerate()
            .filter(|(i, _)| i % step == 0 || *i == n - 1)
            .map(|(_, r)| *r)
            .collect()
    }

    /// Summarize the whole period; `None` for an empty log
    pub fn summary(&self) -> Option<LogSummary> {
        let first = self.records.first()?;
        let last = self.records.last()?;

        let total_deficit_kcal: f64 = self.records.iter().map(|r| r.deficit_kcal).sum();
        let newest_first: Vec<f64> = self.records.iter().rev().map(|r| r.weight_kg).collect();

        Some(LogSummary {
            first_date: first.date,
            last_date: last.date,
            total_days: (last.date - first.date).num_days() + 1,
            start_weight_kg: first.weight_kg,
            current_weight_kg: last.weight_kg,
            weight_change_kg: first.weight_kg - last.weight_kg,
            total_deficit_kcal,
            average_deficit_kcal: total_deficit_kcal / self.records.len() as f64,
            moving_average_kg: moving_average(&newest_first, MOVING_AVERAGE_DAYS),
            entries_count: self.records.len(),
        })
    }

    /// Plain-text `date | weight` table followed by the period summary
    ///
    /// Returns `None` for an empty log.
    pub fn export_table(&self) -> Option<String> {
        let summary = self.summary()?;

        let rows: Vec<(String, String)> = self
            .records
            .iter()
            .map(|r| (format_table_date(r.date), r.weight_kg.to_string()))
            .collect();

        let date_width = rows.iter().map(|(d, _)| d.len()).max().unwrap_or(0).max("date".len());
        let weight_width = rows.iter().map(|(_, w)| w.len()).max().unwrap_or(0).max("weight".len());

        let mut text = format!("{:<date_width$}  |  {:<weight_width$}\n", "date", "weight");
        text.push_str(&format!("{}--+--{}\n", "-".repeat(date_width), "-".repeat(weight_width)));
        for (date, weight) in &rows {
            text.push_str(&format!("{date:<date_width$}  |  {weight:<weight_width$}\n"));
        }
        text.push_str(&format!(
            "\nTotal days: {} (from {} to {})\n",
            summary.total_days,
            format_table_date(summary.first_date),
            format_table_date(summary.last_date)
        ));
        text.push_str(&format!(
            "Weight change: {:.1} kg in {} days ({} kg → {} kg)\n",
            summary.weight_change_kg, summary.total_days, summary.start_weight_kg, summary.current_weight_kg
        ));
        Some(text)
    }

    /// CSV with a `date,weight_kg,deficit_kcal` header, ascending
    pub fn export_csv<W: std::io::Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(["date", "weight_kg", "deficit_kcal"])?;
        for r in &self.records {
            wtr.write_record([r.date.to_string(), r.weight_kg.to_string(), r.deficit_kcal.to_string()])?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Mean of the `n` most recent values (input ordered newest first)
pub fn moving_average(values: &[f64], n: usize) -> Option<f64> {
    if values.is_empty() || n == 0 {
        return None;
    }

    let count = values.len().min(n);
    let sum: f64 = values.iter().take(count).sum();
    Some(sum / count as f64)
}
