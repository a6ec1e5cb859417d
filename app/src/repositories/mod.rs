//! Local storage repositories
//!
//! Provides the data access layer over a string-keyed document store.

pub mod session;
pub mod store;
pub mod weight;

pub use session::{SessionRecord, SessionRepository, SessionSet, SESSION_SCHEMA_VERSION};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use weight::WeightLogRepository;
