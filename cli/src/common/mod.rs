//! # npmrs Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared utilities used by the npm facade that are not specific to npm:
//!
//! - **`fs`**: Writing files with contextual errors (used for `package.json`).
//! - **`process`**: Running a shell command line, capturing and optionally
//!   streaming its output.
//!

/// Utilities for filesystem operations.
pub mod fs;
/// Utilities for executing external processes and capturing their output.
pub mod process;
