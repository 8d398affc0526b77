//! # npm Command Definitions and Invocation Builder (`npm::command`)
//!
//! File: cli/src/npm/command.rs
//!
//! ## Overview
//!
//! Every facade method is described by a [`CommandSpec`]: the npm subcommand
//! words, an optional allow-list of option names, options that are always
//! appended, and how stdout is post-processed. Calling a facade method yields
//! an [`Invocation`], a builder that collects positional arguments, options
//! and an optional completion callback, and finally runs npm.
//!
//! ## Architecture
//!
//! `Invocation::run` performs, in order:
//! 1. Allow-list check (fails before anything is spawned)
//! 2. Merge of the caller's options with the command's fixed options
//! 3. Rendering of `"{program} {command} {flags} {args}"`
//! 4. Execution through `common::process::run_shell`
//! 5. Post-processing into an [`Output`], converted to the method's result type
//! 6. Notification of the callback, if any, with the outcome
//!
//! ```rust,no_run
//! use npmrs::Npm;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let npm = Npm::current_dir()?;
//! let results = npm
//!     .search()
//!     .arg("left-pad")
//!     .option("searchlimit", 5i64)
//!     .on_complete(|res| println!("search finished (ok: {})", res.is_ok()))
//!     .run()
//!     .await?;
//! println!("{results:#}");
//! # Ok(())
//! # }
//! ```
//!
use crate::common::process;
use crate::core::error::{NpmError, Result};
use crate::npm::options::{check_options, CommandOptions, OptionValue};
use crate::npm::{parse, table, Npm};
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use tracing::{debug, info};

/// How a command's stdout is turned into a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostProcess {
    /// Stdout as-is.
    Raw,
    /// Stdout parsed as JSON.
    Json,
    /// Stdout read as a single config value.
    ConfigValue,
    /// Stdout parsed as an ini document.
    Ini,
    /// Stdout split into non-empty lines.
    Lines,
}

impl PostProcess {
    pub fn apply(self, command: &str, stdout: String) -> Result<Output> {
        Ok(match self {
            PostProcess::Raw => Output::Text(stdout),
            PostProcess::Json => Output::Value(parse::parse_json(command, &stdout)?),
            PostProcess::ConfigValue => Output::Value(parse::parse_config_value(&stdout)),
            PostProcess::Ini => Output::Value(parse::parse_ini(&stdout)),
            PostProcess::Lines => Output::Lines(parse::parse_list(&stdout)),
        })
    }
}

impl fmt::Display for PostProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PostProcess::Raw => "raw",
            PostProcess::Json => "json",
            PostProcess::ConfigValue => "config-value",
            PostProcess::Ini => "ini",
            PostProcess::Lines => "lines",
        })
    }
}

/// Static description of one facade method.
#[derive(Debug)]
pub struct CommandSpec {
    /// Dotted facade path, e.g. `dist_tags.list`.
    pub key: &'static str,
    /// npm subcommand words, e.g. `dist-tag ls`.
    pub command: &'static str,
    /// Option names the command accepts; `None` accepts anything.
    pub allowed_options: Option<&'static [&'static str]>,
    /// Options always passed, overriding the caller's.
    pub fixed_options: &'static [(&'static str, OptionValue)],
    pub post_process: PostProcess,
}

impl CommandSpec {
    pub const fn new(key: &'static str, command: &'static str, post_process: PostProcess) -> Self {
        Self {
            key,
            command,
            allowed_options: None,
            fixed_options: &[],
            post_process,
        }
    }

    pub const fn raw(key: &'static str, command: &'static str) -> Self {
        Self::new(key, command, PostProcess::Raw)
    }

    pub const fn allow(self, options: &'static [&'static str]) -> Self {
        Self {
            allowed_options: Some(options),
            ..self
        }
    }

    pub const fn fixed(self, options: &'static [(&'static str, OptionValue)]) -> Self {
        Self {
            fixed_options: options,
            ..self
        }
    }
}

/// Builds the shell line: `program command flags... args...`.
///
/// Empty segments are skipped. Positional arguments are inserted verbatim.
pub fn render_command_line<S: AsRef<str>>(
    program: &str,
    command: &str,
    options: &CommandOptions,
    args: &[S],
) -> String {
    let flags = options.to_flags();
    std::iter::once(program)
        .chain(std::iter::once(command))
        .chain(flags.iter().map(String::as_str))
        .chain(args.iter().map(|arg| arg.as_ref()))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Post-processed output of a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Text(String),
    Value(Value),
    Lines(Vec<String>),
}

impl Output {
    pub fn kind(&self) -> &'static str {
        match self {
            Output::Text(_) => "text",
            Output::Value(_) => "structured",
            Output::Lines(_) => "line-list",
        }
    }
}

/// Conversion from [`Output`] into the type a facade method returns.
pub trait FromOutput: Sized {
    const KIND: &'static str;

    fn from_output(command: &str, output: Output) -> Result<Self>;
}

fn mismatch<T: FromOutput>(command: &str, output: &Output) -> anyhow::Error {
    NpmError::UnexpectedOutput {
        command: command.to_string(),
        expected: T::KIND,
        found: output.kind(),
    }
    .into()
}

impl FromOutput for Output {
    const KIND: &'static str = "any";

    fn from_output(_command: &str, output: Output) -> Result<Self> {
        Ok(output)
    }
}

impl FromOutput for String {
    const KIND: &'static str = "text";

    fn from_output(command: &str, output: Output) -> Result<Self> {
        match output {
            Output::Text(text) => Ok(text),
            other => Err(mismatch::<Self>(command, &other)),
        }
    }
}

impl FromOutput for Value {
    const KIND: &'static str = "structured";

    fn from_output(command: &str, output: Output) -> Result<Self> {
        match output {
            Output::Value(value) => Ok(value),
            other => Err(mismatch::<Self>(command, &other)),
        }
    }
}

impl FromOutput for Vec<String> {
    const KIND: &'static str = "line-list";

    fn from_output(command: &str, output: Output) -> Result<Self> {
        match output {
            Output::Lines(lines) => Ok(lines),
            other => Err(mismatch::<Self>(command, &other)),
        }
    }
}

type Callback<'a, T> = Box<dyn FnOnce(std::result::Result<&T, &anyhow::Error>) + Send + 'a>;

/// A pending npm call. Nothing runs until [`run`](Invocation::run) is awaited.
#[must_use = "an Invocation does nothing until `.run().await` is called"]
pub struct Invocation<'a, T> {
    npm: &'a Npm,
    key: String,
    args: Vec<String>,
    options: CommandOptions,
    callback: Option<Callback<'a, T>>,
    _output: PhantomData<fn() -> T>,
}

impl<'a, T: FromOutput> Invocation<'a, T> {
    pub(crate) fn new(npm: &'a Npm, key: impl Into<String>) -> Self {
        Self {
            npm,
            key: key.into(),
            args: Vec::new(),
            options: CommandOptions::new(),
            callback: None,
            _output: PhantomData,
        }
    }

    /// Appends a positional argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several positional arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets one option.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.options.insert(key, value);
        self
    }

    /// Replaces the whole option map.
    pub fn options(mut self, options: CommandOptions) -> Self {
        self.options = options;
        self
    }

    /// Registers a callback notified with the outcome of the npm process.
    ///
    /// It is not called when the options are rejected, since no process runs.
    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(std::result::Result<&T, &anyhow::Error>) + Send + 'a,
    {
        self.callback = Some(Box::new(callback));
        self
    }

    /// The shell line this invocation would execute.
    pub fn command_line(&self) -> Result<String> {
        let spec = table::lookup(&self.key)?;
        let options = self.options.merged(spec.fixed_options);
        Ok(render_command_line(
            &self.npm.program,
            spec.command,
            &options,
            &self.args,
        ))
    }

    /// Validates options, runs npm and post-processes its output.
    pub async fn run(self) -> Result<T> {
        let spec = table::lookup(&self.key)?;
        check_options(spec.command, spec.allowed_options, &self.options)?;

        let options = self.options.merged(spec.fixed_options);
        let line = render_command_line(&self.npm.program, spec.command, &options, &self.args);
        info!("Running npm command `{}`", line);

        let result = match process::run_shell(&line, &self.npm.exec).await {
            Ok(stdout) => spec
                .post_process
                .apply(spec.command, stdout)
                .and_then(|output| T::from_output(spec.command, output)),
            Err(e) => Err(e),
        };
        debug!("`{}` completed (ok: {})", line, result.is_ok());

        if let Some(callback) = self.callback {
            callback(result.as_ref());
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_command_line() {
        let options = CommandOptions::new().with("save-dev", true).with("tag", "next");
        assert_eq!(
            render_command_line("npm", "install", &options, &["lodash", "react"]),
            "npm install --save-dev --tag=next lodash react"
        );
    }

    #[test]
    fn test_render_command_line_skips_empty_segments() {
        let none: [&str; 0] = [];
        assert_eq!(
            render_command_line("npm", "whoami", &CommandOptions::new(), &none),
            "npm whoami"
        );
        assert_eq!(
            render_command_line("npm", "ping", &CommandOptions::new().with("json", false), &none),
            "npm ping"
        );
    }

    #[test]
    fn test_post_process_apply() {
        assert_eq!(
            PostProcess::Raw.apply("bin", "/a/node_modules/.bin".into()).unwrap(),
            Output::Text("/a/node_modules/.bin".into())
        );
        assert_eq!(
            PostProcess::Json.apply("search", "[]".into()).unwrap(),
            Output::Value(json!([]))
        );
        assert_eq!(
            PostProcess::ConfigValue.apply("config get", "true".into()).unwrap(),
            Output::Value(json!(true))
        );
        assert_eq!(
            PostProcess::Ini.apply("config list", "a = 1".into()).unwrap(),
            Output::Value(json!({ "a": "1" }))
        );
        assert_eq!(
            PostProcess::Lines.apply("owner ls", "x\ny".into()).unwrap(),
            Output::Lines(vec!["x".into(), "y".into()])
        );
        assert!(PostProcess::Json.apply("search", "oops".into()).is_err());
    }

    #[test]
    fn test_from_output_mismatch() {
        let err = String::from_output("search", Output::Value(json!([]))).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<NpmError>(),
            Some(NpmError::UnexpectedOutput { expected: "text", found: "structured", .. })
        ));
        assert_eq!(
            Vec::<String>::from_output("owner ls", Output::Lines(vec![])).unwrap(),
            Vec::<String>::new()
        );
    }
}
