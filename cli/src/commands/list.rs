//! # npmrs List Handler
//!
//! File: cli/src/commands/list.rs
//!
//! ## Overview
//!
//! Implements `npmrs list`: prints every key of the command table with the
//! npm subcommand it runs and how its output is post-processed. Commands
//! with an option allow-list show it in the last column.
//!
use clap::Parser;
use npmrs::npm::table::COMMANDS;
use npmrs::{npm::CommandSpec, Result};

/// # List Arguments (`ListArgs`)
#[derive(Parser, Debug, Default)]
#[command(about = "List the npm commands available to `npmrs exec`")]
pub struct ListArgs {}

pub async fn handle_list(_args: ListArgs) -> Result<()> {
    for spec in COMMANDS {
        println!("{}", format_row(spec));
    }
    Ok(())
}

fn format_row(spec: &CommandSpec) -> String {
    let row = format!(
        "{:<28} npm {:<24} {}",
        spec.key, spec.command, spec.post_process
    );
    match spec.allowed_options {
        Some(allowed) => format!("{:<66} [{}]", row, allowed.join(", ")),
        None => row.trim_end().to_string(),
    }
}
