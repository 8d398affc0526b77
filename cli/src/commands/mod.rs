//! # npmrs Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! The subcommands of the `npmrs` binary. Each module defines its clap
//! arguments struct and an async handler that receives the configured
//! [`Npm`](npmrs::Npm) facade.
//!
//! ## Command Groups
//!
//! - `exec`: Run any entry of the command table and print its result
//! - `init`: Write a `package.json` without invoking npm
//! - `list`: Print the command table
//!

/// `npmrs exec <KEY>`: runs one npm command through the facade.
pub mod exec;
/// `npmrs init`: writes `package.json` in the working directory.
pub mod init;
/// `npmrs list`: prints every command key the facade knows.
pub mod list;
