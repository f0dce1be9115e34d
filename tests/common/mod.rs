//! Common test utilities and fixtures for jsonapi-admin integration tests

// Not every test file uses every helper
#![allow(dead_code)]

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Temporary working directory holding a configuration and documents.
pub struct TestProject {
    _temp_dir: TempDir, // Keep alive for RAII cleanup
    project_dir: PathBuf,
}

impl TestProject {
    /// Create an empty project directory
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().join("project");
        fs::create_dir_all(&project_dir)?;

        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
        })
    }

    /// Get the project directory path
    pub fn project_path(&self) -> &Path {
        &self.project_dir
    }

    /// Write `jsonapi-admin.toml` into the project directory
    pub fn write_config(&self, content: &str) -> Result<PathBuf> {
        self.write_file("jsonapi-admin.toml", content)
    }

    /// Write a JSON document into the project directory
    pub fn write_document(&self, name: &str, document: &Value) -> Result<PathBuf> {
        self.write_file(name, &serde_json::to_string_pretty(document)?)
    }

    /// Write an arbitrary file into the project directory
    pub fn write_file(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.project_dir.join(name);
        fs::write(&path, content).with_context(|| format!("Failed to write {:?}", path))?;
        Ok(path)
    }

    /// Run the CLI in the project directory
    pub fn run_cli(&self, args: &[&str]) -> Result<CommandOutput> {
        let binary = env!("CARGO_BIN_EXE_jsonapi-admin");
        let output = Command::new(binary)
            .args(args)
            .current_dir(&self.project_dir)
            .env_remove("JSONAPI_ADMIN_CONFIG")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1")
            .output()
            .context("Failed to run jsonapi-admin")?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        })
    }
}

/// Command output helper
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub code: Option<i32>,
}

impl CommandOutput {
    /// Assert the command succeeded, showing its output otherwise
    pub fn assert_success(&self) -> &Self {
        assert!(self.success, "Command failed with code {:?}\nstdout: {}\nstderr: {}", self.code, self.stdout, self.stderr);
        self
    }

    /// Parse stdout as JSON
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.stdout).unwrap_or_else(|e| panic!("stdout is not JSON ({e}): {}", self.stdout))
    }
}
