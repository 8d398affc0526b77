//! # npmrs Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout npmrs. There are only
//! two failure modes a caller really has to care about:
//! - an option outside the command's allow-list, rejected before any
//!   subprocess starts (`NpmError::InvalidOption`)
//! - npm exiting with a failure status (`NpmError::CommandFailed`)
//!
//! The remaining variants cover output that cannot be post-processed, unknown
//! command keys coming from the CLI, configuration problems and filesystem
//! failures while writing `package.json`.
//!
//! ## Architecture
//!
//! - `NpmError`: A custom error enum using `thiserror` for the specific cases
//! - `Result<T>`: A type alias for `anyhow::Result<T>` so context can be added
//!   freely while the typed error stays reachable through `downcast_ref`
//!
//! ## Examples
//!
//! ```rust,no_run
//! use npmrs::{Npm, NpmError};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let npm = Npm::current_dir()?;
//! match npm.ping().run().await {
//!     Ok(out) => println!("{out}"),
//!     Err(e) => match e.downcast_ref::<NpmError>() {
//!         Some(NpmError::CommandFailed { code, .. }) => eprintln!("npm exited with {code:?}"),
//!         _ => return Err(e),
//!     },
//! }
//! # Ok(())
//! # }
//! ```
//!
use thiserror::Error;

/// Custom error type for npmrs.
#[derive(Error, Debug)]
pub enum NpmError {
    #[error("Invalid npm command option '{option}' for 'npm {command}'")]
    InvalidOption { command: String, option: String },

    #[error("npm command failed: {cmd} (exit code: {}){}", exit_code(.code), stderr_suffix(.stderr))]
    CommandFailed {
        cmd: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Failed to parse output of 'npm {command}': {reason}")]
    Parse { command: String, reason: String },

    #[error("Unknown npm command '{0}'. Run `npmrs list` to see the available commands.")]
    UnknownCommand(String),

    #[error("'npm {command}' produced {found} output, expected {expected}")]
    UnexpectedOutput {
        command: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Filesystem error: {0}")]
    FileSystem(String),
}

fn exit_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "none".to_string(), |c| c.to_string())
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!("\n{stderr}")
    }
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
