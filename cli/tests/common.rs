//! # npmrs CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Tests never run
//! the real npm: each one builds a [`Sandbox`], a temporary project directory
//! whose `.npmrs.toml` points `npm.program` at `echo` or at a small shell
//! script standing in for npm.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// # Get npmrs Command (`npmrs_cmd`)
///
/// An `assert_cmd::Command` for the compiled `npmrs` binary.
///
/// ## Panics
/// Panics if the `npmrs` binary cannot be found via `Command::cargo_bin`.
pub fn npmrs_cmd() -> Command {
    Command::cargo_bin("npmrs").expect("Failed to find npmrs binary for testing")
}

/// Temporary project directory with its own `.npmrs.toml`.
pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    /// A project whose npm executable is `program`.
    pub fn with_program(program: &str) -> Self {
        Self::with_config(&format!("[npm]\nprogram = {:?}\n", program))
    }

    /// A project with the given `.npmrs.toml` content.
    pub fn with_config(config: &str) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        // `.git` stops the project config search at the sandbox root.
        fs::create_dir(dir.path().join(".git")).expect("Failed to create .git");
        fs::create_dir(dir.path().join("xdg")).expect("Failed to create xdg dir");
        fs::write(dir.path().join(".npmrs.toml"), config).expect("Failed to write config");
        Self { dir }
    }

    /// A project whose npm executable is a shell script with `body`.
    #[cfg(unix)]
    pub fn with_script(body: &str) -> Self {
        let sandbox = Self::with_program("placeholder");
        let script = sandbox.write_script("fake-npm", body);
        let config = format!("[npm]\nprogram = {:?}\n", script.to_string_lossy());
        fs::write(sandbox.path().join(".npmrs.toml"), config).expect("Failed to write config");
        sandbox
    }

    /// Writes an executable script into the sandbox and returns its path.
    #[cfg(unix)]
    pub fn write_script(&self, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = self.path().join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("Failed to write script");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("Failed to chmod script");
        path
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// `npmrs` running inside the sandbox, isolated from the user config.
    pub fn cmd(&self) -> Command {
        let mut cmd = npmrs_cmd();
        cmd.current_dir(self.path())
            .env("XDG_CONFIG_HOME", self.path().join("xdg"))
            .env_remove("NPMRS_CWD")
            .env_remove("RUST_LOG");
        cmd
    }
}
