//! Treadmill Calculator App Library
//!
//! Local-first command-line front end over the shared calculation engine.
//!
//! ## Architecture
//!
//! The app follows a layered architecture:
//! - CLI: argument parsing and output rendering
//! - Services: session editing, goal solving, weight log workflows
//! - Repositories: versioned documents in a key-value store

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod repositories;
pub mod services;
pub mod state;
