//! Weight and deficit log repository

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, warn};
use treadmill_calc_shared::{WeightDeficitLog, WeightDeficitRecord};
use validator::Validate;

use super::store::KeyValueStore;
use crate::error::AppResult;

/// Weight log repository backed by a [`KeyValueStore`]
pub struct WeightLogRepository;

impl WeightLogRepository {
    /// Storage key of the log document
    pub const KEY: &'static str = "weight-deficit-log";

    /// Load the stored log; an absent document is an empty log
    pub fn load(store: &dyn KeyValueStore) -> AppResult<WeightDeficitLog> {
        Ok(match store.get(Self::KEY)? {
            Some(raw) => Self::decode(&raw),
            None => WeightDeficitLog::new(),
        })
    }

    pub fn save(store: &dyn KeyValueStore, log: &WeightDeficitLog) -> AppResult<()> {
        let raw = serde_json::to_string(log)?;
        store.set(Self::KEY, &raw)?;
        debug!(entries = log.len(), "Saved weight log");
        Ok(())
    }

    /// Decode a stored JSON array of `{ date, weight, deficit }`
    ///
    /// Each row is decoded on its own: a row with an unreadable date or an
    /// out-of-range weight is dropped and the rest are kept. A missing or
    /// `null` deficit reads as zero. Only a document that is not an array
    /// yields an empty log.
    pub fn decode(raw: &str) -> WeightDeficitLog {
        let rows: Vec<serde_json::Value> = match serde_json::from_str(raw) {
            Ok(rows) => rows,
            Err(e) => {
                warn!(error = %e, "Stored weight log is unreadable, starting empty");
                return WeightDeficitLog::new();
            }
        };

        let total = rows.len();
        let valid: Vec<WeightDeficitRecord> = rows.into_iter().filter_map(decode_row).collect();
        if valid.len() < total {
            warn!(dropped = total - valid.len(), kept = valid.len(), "Dropped invalid weight log records");
        }

        WeightDeficitLog::from_records(valid)
    }
}

/// Stored row; the deficit may be absent or `null`
#[derive(Debug, Deserialize)]
struct StoredRecord {
    date: NaiveDate,
    weight: f64,
    #[serde(default)]
    deficit: Option<f64>,
}

fn decode_row(row: serde_json::Value) -> Option<WeightDeficitRecord> {
    let stored: StoredRecord = match serde_json::from_value(row) {
        Ok(stored) => stored,
        Err(e) => {
            debug!(error = %e, "Skipping unreadable weight log row");
            return None;
        }
    };

    let record = WeightDeficitRecord {
        date: stored.date,
        weight_kg: stored.weight,
        deficit_kcal: stored.deficit.filter(|d| d.is_finite()).unwrap_or(0.0),
    };
    if let Err(errors) = record.validate() {
        debug!(date = %record.date, %errors, "Skipping out-of-range weight log row");
        return None;
    }
    Some(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::store::MemoryStore;
    use rstest::rstest;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn test_decode_sorts_records() {
        let raw = r#"[
            {"date":"2026-03-05","weight":82.4,"deficit":450},
            {"date":"2026-03-01","weight":83.0,"deficit":300.5}
        ]"#;
        let log = WeightLogRepository::decode(raw);
        assert_eq!(log.len(), 2);
        assert_eq!(log.records()[0].date, day(1));
        assert_eq!(log.records()[0].deficit_kcal, 300.5);
        assert_eq!(log.records()[1].weight_kg, 82.4);
    }

    #[rstest]
    #[case("")]
    #[case("{}")]
    #[case(r#"{"date":"2026-03-01"}"#)]
    fn test_decode_corrupt_document_is_empty(#[case] raw: &str) {
        assert!(WeightLogRepository::decode(raw).is_empty());
    }

    #[test]
    fn test_decode_keeps_good_rows_next_to_bad_ones() {
        let raw = r#"[
            {"date":"2026-03-01","weight":85,"deficit":500},
            {"date":"2026-03-02","weight":84.8,"deficit":null},
            {"date":"not a date","weight":84.6,"deficit":200},
            {"date":"2026-03-04","weight":"84.4","deficit":100},
            {"date":"2026-03-05","weight":84.2}
        ]"#;
        let log = WeightLogRepository::decode(raw);
        let dates: Vec<_> = log.records().iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day(1), day(2), day(5)]);
        assert_eq!(log.records()[0].deficit_kcal, 500.0);
        assert_eq!(log.records()[1].deficit_kcal, 0.0);
        assert_eq!(log.records()[2].deficit_kcal, 0.0);
    }

    #[test]
    fn test_saving_after_bad_row_keeps_good_records() {
        let store = MemoryStore::new();
        store
            .set(
                WeightLogRepository::KEY,
                r#"[{"date":"2026-03-01","weight":85,"deficit":500},{"date":"2026-03-02","weight":84.8,"deficit":null}]"#,
            )
            .unwrap();

        let mut log = WeightLogRepository::load(&store).unwrap();
        log.upsert(day(3), 84.5, 0.0).unwrap();
        WeightLogRepository::save(&store, &log).unwrap();

        let reloaded = WeightLogRepository::load(&store).unwrap();
        assert_eq!(reloaded.len(), 3);
        assert_eq!(reloaded.get(day(1)).unwrap().deficit_kcal, 500.0);
    }

    #[test]
    fn test_decode_drops_out_of_range_weight() {
        let raw = r#"[
            {"date":"2026-03-01","weight":900,"deficit":0},
            {"date":"2026-03-02","weight":80,"deficit":100}
        ]"#;
        let log = WeightLogRepository::decode(raw);
        assert_eq!(log.len(), 1);
        assert_eq!(log.records()[0].date, day(2));
    }

    #[test]
    fn test_save_and_load() {
        let store = MemoryStore::new();
        let mut log = WeightDeficitLog::new();
        log.upsert(day(2), 81.5, 600.0).unwrap();
        log.upsert(day(1), 82.0, 0.0).unwrap();
        WeightLogRepository::save(&store, &log).unwrap();

        let raw = store.get(WeightLogRepository::KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json[0]["date"], "2026-03-01");
        assert_eq!(json[1]["weight"], 81.5);
        assert_eq!(json[1]["deficit"], 600.0);

        assert_eq!(WeightLogRepository::load(&store).unwrap(), log);
    }

    #[test]
    fn test_load_without_document() {
        let store = MemoryStore::new();
        assert!(WeightLogRepository::load(&store).unwrap().is_empty());
    }
}
