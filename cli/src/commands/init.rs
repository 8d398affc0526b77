//! # npmrs Init Handler
//!
//! File: cli/src/commands/init.rs
//!
//! ## Overview
//!
//! Implements `npmrs init`, which writes `package.json` in the working
//! directory without running npm. The manifest starts from `--json` (an
//! object, default `{}`) and each `--field key=value` sets a string field on
//! top of it.
//!
//! ## Usage
//!
//! ```bash
//! npmrs init --field name=my-package --field version=1.0.0
//! npmrs --cwd ./pkg init --json '{"private": true}' --field name=pkg
//! ```
//!
use anyhow::{bail, Context};
use clap::Parser;
use npmrs::{Npm, Result};
use serde_json::{Map, Value};
use tracing::info;

/// # Init Arguments (`InitArgs`)
#[derive(Parser, Debug, Default)]
#[command(about = "Write package.json in the working directory")]
pub struct InitArgs {
    /// Field set on the manifest as KEY=VALUE. Repeatable; later values win.
    #[arg(short, long = "field", value_name = "KEY=VALUE")]
    fields: Vec<String>,

    /// Base manifest as a JSON object.
    #[arg(long)]
    json: Option<String>,
}

pub async fn handle_init(args: InitArgs, npm: &Npm) -> Result<()> {
    let manifest = build_manifest(&args)?;
    let path = npm.init(&manifest)?;
    info!("Wrote manifest with {} fields", manifest.len());
    println!("Wrote {}", path.display());
    Ok(())
}

fn build_manifest(args: &InitArgs) -> Result<Map<String, Value>> {
    let mut manifest = match &args.json {
        Some(text) => match serde_json::from_str::<Value>(text).context("Invalid --json value")? {
            Value::Object(map) => map,
            _ => bail!("--json must be a JSON object"),
        },
        None => Map::new(),
    };
    for field in &args.fields {
        let Some((key, value)) = field.split_once('=') else {
            bail!("Invalid --field '{}': expected KEY=VALUE", field);
        };
        if key.is_empty() {
            bail!("Invalid --field '{}': empty key", field);
        }
        manifest.insert(key.to_string(), Value::String(value.to_string()));
    }
    Ok(manifest)
}
