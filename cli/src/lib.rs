//! # npmrs Library Root
//!
//! File: cli/src/lib.rs
//!
//! ## Overview
//!
//! An async facade over the `npm` command-line tool. Every method builds an
//! npm command line, runs it as a subprocess and turns its output into a
//! structured value. See [`Npm`] for the full method list.
//!
//! ## Architecture
//!
//! - `core`: Configuration loading and the error types
//! - `common`: Subprocess execution and filesystem helpers
//! - `npm`: The facade, its command table, option handling and output parsers
//!
//! ```rust,no_run
//! use npmrs::Npm;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let npm = Npm::current_dir()?;
//! let hits = npm.search().arg("left-pad").run().await?;
//! let owners = npm.owner().list().arg("left-pad").run().await?;
//! # let _ = (hits, owners);
//! # Ok(())
//! # }
//! ```
//!
pub mod common;
pub mod core;
pub mod npm;

pub use crate::core::error::{NpmError, Result};
pub use crate::npm::{CommandOptions, Invocation, Npm, NpmBuilder, OptionValue, Output};
