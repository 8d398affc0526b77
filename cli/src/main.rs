//! # npmrs Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! The `npmrs` binary is a thin command-line front end over the library:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Loading configuration and building the `Npm` facade
//! - Routing execution to the subcommand handlers
//!
//! ## Examples
//!
//! ```bash
//! # Show the command table
//! npmrs list
//!
//! # Run `npm search --json left-pad` with debug logging
//! npmrs -vv exec search left-pad
//!
//! # Install into another directory while echoing npm's output
//! npmrs --cwd ./my-package --stream exec install
//! ```
//!
//! Command processing flow:
//! 1. Parse command-line args via Clap
//! 2. Configure logging based on verbosity level
//! 3. Load configuration, then apply `--cwd` / `--stream` on top of it
//! 4. Route to the appropriate command handler
//! 5. Format and display any errors that occur
//!
use clap::Parser;
use npmrs::core::config;
use npmrs::Npm;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "npmrs",
    about = "Run npm commands and get structured results",
    long_about = "Runs npm subcommands through the npmrs facade and prints their\n\
                  post-processed output (JSON, parsed config, line lists or raw text).",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Directory npm runs in (overrides the configured working directory).
    #[arg(long, global = true, env = "NPMRS_CWD")]
    cwd: Option<PathBuf>,
    /// Echo npm's stdout while it runs.
    #[arg(long, global = true)]
    stream: bool,
}

/// Enum defining all available top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    #[command(alias = "x")]
    Exec(commands::exec::ExecArgs),
    #[command(alias = "ls")]
    List(commands::list::ListArgs),
    Init(commands::init::InitArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    if let Err(e) = run(cli).await {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut cfg = config::load_config()?;
    if let Some(cwd) = &cli.cwd {
        cfg.npm.working_dir = Some(cwd.to_string_lossy().into_owned());
    }
    if cli.stream {
        cfg.npm.stream_output = true;
    }
    let npm = Npm::from_config(&cfg)?;

    match cli.command {
        Commands::Exec(args) => {
            commands::exec::handle_exec(args, &npm, cfg.npm.stream_output).await
        }
        Commands::List(args) => commands::list::handle_list(args).await,
        Commands::Init(args) => commands::init::handle_init(args, &npm).await,
    }
}
