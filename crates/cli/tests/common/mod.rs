//! Common utilities for integration tests

pub mod cli;
pub mod server;

use std::path::PathBuf;
use tempfile::TempDir;

/// Isolated home for one test: its own config file and working directory
pub struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self { dir: TempDir::new()? })
    }

    pub fn path(&self) -> &std::path::Path {
        self.dir.path()
    }

    /// Config file the binary is pointed at through `PARLEY_CONFIG`
    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    /// Command bound to this environment
    pub fn command(&self) -> cli::ParleyCommand {
        let mut cmd = cli::ParleyCommand::new(self.path());
        cmd.env("PARLEY_CONFIG", &self.config_path().to_string_lossy());
        cmd
    }
}
