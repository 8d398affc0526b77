//! # npmrs Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the core infrastructure shared by the facade and
//! the command-line front end:
//! - `config`: Configuration loading, merging, and validation
//! - `error`: Error types and the crate-wide `Result` alias
//!
//! ```rust
//! use npmrs::core::config; // For loading configuration
//! use npmrs::core::error::{NpmError, Result}; // For error handling
//! ```
//!
pub mod config;
pub mod error;
