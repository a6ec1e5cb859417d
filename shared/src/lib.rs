//! Treadmill Calculator Shared Library
//!
//! The metabolic calculation engine (forward metrics, goal solver and input
//! clamping) plus the weight/deficit log domain logic. Everything here is
//! synchronous and free of I/O so it can back the native app and the WASM
//! bindings alike.

pub mod errors;
pub mod metrics;
pub mod models;
pub mod solver;
pub mod validation;
pub mod weight_log;

// Re-export commonly used items
pub use errors::*;
pub use metrics::*;
pub use models::*;
pub use solver::*;
pub use weight_log::*;
