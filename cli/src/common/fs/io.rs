//! # npmrs Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//!
//! ## Overview
//!
//! Thin wrappers around `std::fs` that add context to I/O failures:
//! - **`write_string_to_file`**: Writes a string into an existing directory,
//!   overwriting any previous file. The parent directory is not created; a
//!   missing parent is reported as `NpmError::FileSystem`.
//! - **`write_json_pretty`**: Serializes a value as two-space indented JSON
//!   (the layout npm itself uses for `package.json`) and writes it.
//!
use crate::core::error::{NpmError, Result};
use anyhow::Context;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

/// Writes string content to `path`, overwriting it if it exists.
///
/// # Errors
///
/// Returns an `Err` if the parent directory does not exist or the write fails.
pub fn write_string_to_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.is_dir() {
            anyhow::bail!(NpmError::FileSystem(format!(
                "Directory does not exist: {:?}",
                parent
            )));
        }
    }
    fs::write(path, content).with_context(|| format!("Failed to write to file {:?}", path))?;
    info!("Wrote content to file: {:?}", path);
    Ok(())
}

/// Serializes `value` as pretty JSON and writes it to `path`.
pub fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize JSON for {:?}", path))?;
    write_string_to_file(path, &json)
}
