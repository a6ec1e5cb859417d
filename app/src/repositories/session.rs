//! Workout session persistence
//!
//! Sessions are stored as one JSON document. Older documents carry a single
//! fractional `time` per set instead of `timeMinutes`/`timeSeconds`, and any
//! field may be missing; decoding fills the gaps so callers always get a
//! well-formed session. Documents are always written in the current schema.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use treadmill_calc_shared::validation::{
    clamp_incline, clamp_set_minutes, clamp_set_seconds, clamp_speed, is_valid_weight,
};
use treadmill_calc_shared::{
    WorkoutSet, DEFAULT_INCLINE_PERCENT, DEFAULT_SPEED_KMH, DEFAULT_TIME_MINUTES, MAX_SETS,
};
use uuid::Uuid;
use validator::Validate;

use super::store::KeyValueStore;
use crate::error::AppResult;

/// Current stored schema version
pub const SESSION_SCHEMA_VERSION: u32 = 2;

/// A set together with the row id the front end keys it by
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSet {
    pub id: String,
    pub set: WorkoutSet,
}

impl SessionSet {
    pub fn new(set: WorkoutSet) -> Self {
        Self {
            id: new_set_id(),
            set,
        }
    }
}

/// A decoded session document
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub weight_kg: f64,
    pub sets: Vec<SessionSet>,
}

impl SessionRecord {
    /// Fresh session: the given weight and one default set
    pub fn new(weight_kg: f64) -> Self {
        Self {
            weight_kg,
            sets: vec![SessionSet::new(WorkoutSet::default())],
        }
    }

    pub fn workout_sets(&self) -> Vec<WorkoutSet> {
        self.sets.iter().map(|s| s.set).collect()
    }
}

fn new_set_id() -> String {
    format!("set-{}", Uuid::new_v4())
}

/// Stored document; every field optional so old documents still decode
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<u32>,
    #[serde(default)]
    weight: Option<serde_json::Value>,
    #[serde(default)]
    sets: Vec<StoredSet>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default)]
    speed: Option<f64>,
    #[serde(default)]
    incline: Option<f64>,
    #[serde(default)]
    time_minutes: Option<f64>,
    #[serde(default)]
    time_seconds: Option<f64>,
    /// Legacy fractional minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time: Option<f64>,
}

impl StoredSet {
    fn decode(self) -> SessionSet {
        // A legacy `time` of 0 counts as absent
        let legacy_time = self.time.filter(|t| *t != 0.0 && t.is_finite());

        let minutes = match (self.time_minutes, legacy_time) {
            (Some(m), _) => clamp_set_minutes(m),
            (None, Some(t)) => clamp_set_minutes(t.floor()),
            (None, None) => DEFAULT_TIME_MINUTES,
        };
        let seconds = match (self.time_seconds, legacy_time) {
            (Some(s), _) => clamp_set_seconds(s),
            (None, Some(t)) => clamp_set_seconds((t.fract() * 60.0).round()),
            (None, None) => 0,
        };

        let mut set = WorkoutSet::new(
            self.speed.unwrap_or(DEFAULT_SPEED_KMH),
            self.incline.unwrap_or(DEFAULT_INCLINE_PERCENT),
            minutes,
            seconds,
        );

        if let Err(errors) = set.validate() {
            warn!(%errors, "Stored set out of range, clamping");
            set.speed_kmh = clamp_speed(set.speed_kmh);
            set.incline_percent = clamp_incline(set.incline_percent);
        }

        SessionSet {
            id: self.id.filter(|id| !id.is_empty()).unwrap_or_else(new_set_id),
            set,
        }
    }

    fn encode(s: &SessionSet) -> Self {
        Self {
            id: Some(s.id.clone()),
            speed: Some(s.set.speed_kmh),
            incline: Some(s.set.incline_percent),
            time_minutes: Some(s.set.time_minutes as f64),
            time_seconds: Some(s.set.time_seconds as f64),
            time: None,
        }
    }
}

/// Session repository backed by a [`KeyValueStore`]
pub struct SessionRepository;

impl SessionRepository {
    /// Storage key of the session document
    pub const KEY: &'static str = "treadmill-calc-data";

    /// Load the stored session, or a fresh one when nothing usable is stored
    pub fn load(store: &dyn KeyValueStore, default_weight_kg: f64) -> AppResult<SessionRecord> {
        let record = match store.get(Self::KEY)? {
            Some(raw) => Self::decode(&raw, default_weight_kg),
            None => {
                debug!("No stored session, starting fresh");
                SessionRecord::new(default_weight_kg)
            }
        };
        Ok(record)
    }

    /// Persist the session in the current schema
    pub fn save(store: &dyn KeyValueStore, record: &SessionRecord) -> AppResult<()> {
        let raw = Self::encode(record)?;
        store.set(Self::KEY, &raw)
    }

    /// Forget the stored session
    pub fn clear(store: &dyn KeyValueStore) -> AppResult<()> {
        store.remove(Self::KEY)
    }

    /// Decode a stored document of any schema version
    ///
    /// Never fails: an unreadable document yields a fresh session.
    pub fn decode(raw: &str, default_weight_kg: f64) -> SessionRecord {
        let stored: StoredSession = match serde_json::from_str(raw) {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "Stored session is unreadable, starting fresh");
                return SessionRecord::new(default_weight_kg);
            }
        };

        let weight_kg = stored
            .weight
            .as_ref()
            .and_then(serde_json::Value::as_f64)
            .filter(|w| is_valid_weight(*w))
            .unwrap_or(default_weight_kg);

        let mut sets: Vec<SessionSet> = stored.sets.into_iter().map(StoredSet::decode).collect();
        if sets.len() > MAX_SETS {
            warn!(count = sets.len(), max = MAX_SETS, "Stored session has too many sets, truncating");
            sets.truncate(MAX_SETS);
        }
        if sets.is_empty() {
            sets.push(SessionSet::new(WorkoutSet::default()));
        }

        debug!(version = ?stored.version, sets = sets.len(), "Decoded stored session");
        SessionRecord { weight_kg, sets }
    }

    /// Encode in the current schema
    pub fn encode(record: &SessionRecord) -> AppResult<String> {
        let stored = StoredSession {
            version: Some(SESSION_SCHEMA_VERSION),
            weight: Some(serde_json::Value::from(record.weight_kg)),
            sets: record.sets.iter().map(StoredSet::encode).collect(),
        };
        Ok(serde_json::to_string(&stored)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::store::MemoryStore;
    use rstest::rstest;

    #[test]
    fn test_decode_current_schema() {
        let raw = r#"{"version":2,"weight":78.5,"sets":[
            {"id":"set-a","speed":6.0,"incline":4,"timeMinutes":25,"timeSeconds":30}
        ]}"#;
        let record = SessionRepository::decode(raw, 85.0);
        assert_eq!(record.weight_kg, 78.5);
        assert_eq!(record.sets.len(), 1);
        assert_eq!(record.sets[0].id, "set-a");
        assert_eq!(record.sets[0].set, WorkoutSet::new(6.0, 4.0, 25, 30));
    }

    #[rstest]
    #[case(12.5, 12, 30)]
    #[case(30.0, 30, 0)]
    #[case(0.25, 0, 15)]
    fn test_decode_legacy_time(#[case] time: f64, #[case] minutes: u32, #[case] seconds: u32) {
        let raw = format!(r#"{{"weight":80,"sets":[{{"speed":5,"incline":2,"time":{time}}}]}}"#);
        let record = SessionRepository::decode(&raw, 85.0);
        let set = record.sets[0].set;
        assert_eq!(set.time_minutes, minutes);
        assert_eq!(set.time_seconds, seconds);
        // Legacy sets get a fresh id
        assert!(record.sets[0].id.starts_with("set-"));
    }

    #[test]
    fn test_decode_fills_missing_fields() {
        let record = SessionRepository::decode(r#"{"sets":[{}]}"#, 85.0);
        assert_eq!(record.weight_kg, 85.0);
        assert_eq!(record.sets[0].set, WorkoutSet::default());
    }

    #[rstest]
    #[case(r#"{"weight":"","sets":[]}"#)]
    #[case(r#"{"weight":500,"sets":[]}"#)]
    #[case(r#"{"weight":null}"#)]
    #[case("not json")]
    #[case("")]
    fn test_decode_unusable_weight_or_document(#[case] raw: &str) {
        let record = SessionRepository::decode(raw, 72.0);
        assert_eq!(record.weight_kg, 72.0);
        assert_eq!(record.sets.len(), 1);
    }

    #[test]
    fn test_decode_clamps_out_of_range_sets() {
        let raw = r#"{"weight":80,"sets":[{"speed":40,"incline":-3,"timeMinutes":300,"timeSeconds":75}]}"#;
        let set = SessionRepository::decode(raw, 85.0).sets[0].set;
        assert_eq!(set, WorkoutSet::new(20.0, 0.0, 120, 59));
    }

    #[test]
    fn test_decode_truncates_to_max_sets() {
        let sets = vec!["{}"; 14].join(",");
        let raw = format!(r#"{{"weight":80,"sets":[{sets}]}}"#);
        assert_eq!(SessionRepository::decode(&raw, 85.0).sets.len(), MAX_SETS);
    }

    #[test]
    fn test_save_writes_current_schema() {
        let store = MemoryStore::new();
        let record = SessionRepository::decode(r#"{"weight":80,"sets":[{"id":"set-x","time":12.5}]}"#, 85.0);
        SessionRepository::save(&store, &record).unwrap();

        let raw = store.get(SessionRepository::KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["version"], 2);
        assert_eq!(json["sets"][0]["id"], "set-x");
        assert_eq!(json["sets"][0]["timeMinutes"], 12.0);
        assert_eq!(json["sets"][0]["timeSeconds"], 30.0);
        assert!(json["sets"][0].get("time").is_none());

        let reloaded = SessionRepository::load(&store, 85.0).unwrap();
        assert_eq!(reloaded, record);
    }

    #[test]
    fn test_load_without_document() {
        let store = MemoryStore::new();
        let record = SessionRepository::load(&store, 90.0).unwrap();
        assert_eq!(record.weight_kg, 90.0);
        assert_eq!(record.sets.len(), 1);
    }
}
