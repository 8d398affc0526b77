//! # npmrs Exec Handler
//!
//! File: cli/src/commands/exec.rs
//!
//! ## Overview
//!
//! Implements `npmrs exec`, which runs one entry of the command table with
//! positional arguments and options and prints the post-processed result:
//! structured values as pretty JSON, line lists one entry per line, and raw
//! text verbatim.
//!
//! ## Usage
//!
//! ```bash
//! # npm search --json --searchlimit=5 left-pad
//! npmrs exec search left-pad -o searchlimit=5
//!
//! # npm install --save-dev typescript
//! npmrs exec install typescript -o save-dev
//!
//! # npm config get registry, read as a literal
//! npmrs exec config.get registry
//! ```
//!
use anyhow::Context;
use clap::Parser;
use npmrs::{CommandOptions, Npm, Output, Result};
use tracing::info;

/// # Exec Arguments (`ExecArgs`)
#[derive(Parser, Debug)]
#[command(about = "Run an npm command through the facade and print its result")]
pub struct ExecArgs {
    /// Command key from `npmrs list` (e.g. `install`, `config.get`, `dist_tags.list`).
    key: String,

    /// Positional arguments passed to npm after the options.
    args: Vec<String>,

    /// Option passed to npm as `--KEY` or `--KEY=VALUE`. Repeatable.
    #[arg(short = 'o', long = "option", value_name = "KEY[=VALUE]")]
    options: Vec<String>,
}

/// # Handle Exec Command (`handle_exec`)
///
/// Parses the options, runs the command and prints the result to stdout.
/// Raw text is not printed again when stdout was already streamed.
pub async fn handle_exec(args: ExecArgs, npm: &Npm, streamed: bool) -> Result<()> {
    info!("Handling exec for '{}' with args {:?}", args.key, args.args);
    let options = CommandOptions::from_pairs(&args.options).context("Invalid --option value")?;

    let output = npm
        .dispatch(&args.key)
        .args(args.args)
        .options(options)
        .run()
        .await?;

    if let Some(rendered) = render_output(&output, streamed)? {
        println!("{rendered}");
    }
    Ok(())
}

fn render_output(output: &Output, streamed: bool) -> Result<Option<String>> {
    Ok(match output {
        Output::Text(_) if streamed => None,
        Output::Text(text) if text.is_empty() => None,
        Output::Text(text) => Some(text.clone()),
        Output::Value(value) => Some(
            serde_json::to_string_pretty(value).context("Failed to render JSON output")?,
        ),
        Output::Lines(lines) if lines.is_empty() => None,
        Output::Lines(lines) => Some(lines.join("\n")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_exec_args_parsing() {
        let args = ExecArgs::try_parse_from([
            "exec", "install", "lodash", "-o", "save-dev", "--option", "tag=next",
        ])
        .unwrap();
        assert_eq!(args.key, "install");
        assert_eq!(args.args, vec!["lodash"]);
        assert_eq!(args.options, vec!["save-dev", "tag=next"]);
    }

    #[test]
    fn test_exec_requires_key() {
        assert!(ExecArgs::try_parse_from(["exec"]).is_err());
    }

    #[test]
    fn test_render_output() {
        assert_eq!(
            render_output(&Output::Text("done".into()), false).unwrap(),
            Some("done".to_string())
        );
        assert_eq!(render_output(&Output::Text("done".into()), true).unwrap(), None);
        assert_eq!(
            render_output(&Output::Value(json!({ "a": 1 })), true).unwrap(),
            Some("{\n  \"a\": 1\n}".to_string())
        );
        assert_eq!(
            render_output(&Output::Lines(vec!["x".into(), "y".into()]), false).unwrap(),
            Some("x\ny".to_string())
        );
        assert_eq!(render_output(&Output::Lines(vec![]), false).unwrap(), None);
    }
}
