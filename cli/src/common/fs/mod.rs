//! # npmrs Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!
//! ## Overview
//!
//! Filesystem helpers for the few operations npmrs performs without npm,
//! currently writing `package.json` for `Npm::init`.
//!

/// Contains file write operations (e.g., `write_string_to_file`, `write_json_pretty`).
pub mod io;
