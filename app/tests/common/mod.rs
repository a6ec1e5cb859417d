//! Common test utilities for integration tests
//!
//! Each test app runs the CLI against a file store in its own temporary
//! directory.

#![allow(dead_code)]

use clap::Parser;
use tempfile::TempDir;
use treadmill_calc_app::cli::{execute, Cli};
use treadmill_calc_app::config::AppConfig;
use treadmill_calc_app::error::AppResult;
use treadmill_calc_app::state::AppState;

/// Test application wrapper
pub struct TestApp {
    pub state: AppState,
    pub dir: TempDir,
}

impl TestApp {
    /// Create a new test application with an empty data directory
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut config = AppConfig::default();
        config.storage.data_dir = dir.path().join("data");

        Self {
            state: AppState::new(config),
            dir,
        }
    }

    /// Run a command, returning its text output
    pub fn run(&self, args: &[&str]) -> AppResult<String> {
        let cli = Cli::try_parse_from(std::iter::once("treadmill-calc").chain(args.iter().copied()))
            .expect("Failed to parse arguments");
        execute(&cli, &self.state)
    }

    /// Run a command with `--format json` and parse the output
    pub fn run_json(&self, args: &[&str]) -> serde_json::Value {
        let mut full = vec!["--format", "json"];
        full.extend_from_slice(args);
        let output = self.run(&full).expect("Command failed");
        serde_json::from_str(&output).expect("Output is not JSON")
    }

    /// Path of a stored document
    pub fn document_path(&self, key: &str) -> std::path::PathBuf {
        self.dir.path().join("data").join(format!("{key}.json"))
    }

    /// Write a raw stored document, bypassing the app
    pub fn write_document(&self, key: &str, contents: &str) {
        let path = self.document_path(key);
        std::fs::create_dir_all(path.parent().expect("document has a parent")).expect("Failed to create data dir");
        std::fs::write(path, contents).expect("Failed to write document");
    }
}
