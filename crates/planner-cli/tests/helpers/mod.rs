use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test harness for running CLI commands against a temporary data directory
pub struct CliTestHarness {
    temp_dir: TempDir,
    data_dir: PathBuf,
}

impl CliTestHarness {
    /// Create a new test harness with an empty data directory
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let data_dir = temp_dir.path().join("data");

        Self { temp_dir, data_dir }
    }

    /// Get a Command instance configured for testing
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("planner").expect("Failed to find planner binary");

        // Keep any config.toml in the working tree out of the picture
        cmd.current_dir(self.temp_dir.path());
        cmd.env("PLANNER_DATA_DIR", &self.data_dir);
        cmd.env_remove("PLANNER_NOTIFICATIONS__ENABLED");
        cmd.env_remove("RUST_LOG");

        cmd
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Helper to run a command and assert success
    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    /// Helper to run a command and assert failure
    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }

    /// Persisted task collection as raw JSON
    pub fn stored_tasks(&self) -> Vec<serde_json::Value> {
        let raw = std::fs::read_to_string(self.data_dir.join("TASKS.json"))
            .expect("TASKS.json should exist");
        serde_json::from_str(&raw).expect("TASKS.json should be a JSON array")
    }

    /// Id of the first stored task with the given title
    pub fn task_id(&self, title: &str) -> String {
        self.stored_tasks()
            .iter()
            .find(|t| t["title"] == title)
            .and_then(|t| t["id"].as_str())
            .map(str::to_string)
            .unwrap_or_else(|| panic!("no stored task titled {title:?}"))
    }

    /// Seed the data directory with a raw TASKS.json
    pub fn write_tasks(&self, json: &str) {
        std::fs::create_dir_all(&self.data_dir).expect("Failed to create data directory");
        std::fs::write(self.data_dir.join("TASKS.json"), json).expect("Failed to write TASKS.json");
    }
}

/// Utility functions for test assertions
pub mod assertions {
    use predicates::prelude::*;

    /// Predicate to check if output contains task table headers
    pub fn has_task_table_headers() -> impl Predicate<str> {
        predicate::str::contains("ID")
            .and(predicate::str::contains("Title"))
            .and(predicate::str::contains("Category"))
            .and(predicate::str::contains("Due"))
    }

    /// Predicate to check if output indicates successful task creation
    pub fn task_created_successfully() -> impl Predicate<str> {
        predicate::str::contains("Created task")
    }

    /// Predicate to check for empty result set
    pub fn empty_result() -> impl Predicate<str> {
        predicate::str::contains("No tasks found")
    }

    /// Predicate to check for error messages
    pub fn has_error() -> impl Predicate<str> {
        predicate::str::contains("Error").or(predicate::str::contains("error"))
    }
}
