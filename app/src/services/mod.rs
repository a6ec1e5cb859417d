//! Business logic services
//!
//! Services encapsulate business logic and coordinate between the
//! calculation engine and the repositories.

pub mod goal;
pub mod session;
pub mod weight;

pub use goal::{GoalService, SolveOutcome};
pub use session::{SessionReport, SessionService, SetField, SetReport};
pub use weight::WeightLogService;
