//! # npm Facade (`npm`)
//!
//! File: cli/src/npm/mod.rs
//!
//! ## Overview
//!
//! [`Npm`] is the entry point of the library. It remembers where npm runs
//! (working directory, executable, extra environment, optional stdout sink)
//! and exposes one method per npm subcommand. Related subcommands are grouped
//! behind handles: `npm.access()`, `npm.cache()`, `npm.config()`,
//! `npm.dist_tags()`, `npm.owner()` and `npm.team()`.
//!
//! Each method returns an [`Invocation`] typed by how its output is
//! post-processed:
//!
//! | Result type | Methods |
//! |-------------|---------|
//! | `serde_json::Value` | `search`, `access().list_packages/list_collaborators`, `team().list`, `config().get`, `config().list` |
//! | `Vec<String>` | `dist_tags().list`, `owner().list` |
//! | `String` | everything else (npm's stdout without the final newline) |
//!
//! `init` is the one operation that does not spawn npm: it writes the given
//! manifest as `package.json` in the working directory.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use npmrs::Npm;
//! use serde_json::json;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let npm = Npm::builder().cwd("./my-package").stream_to_stdout().build();
//! npm.init(&json!({ "name": "my-package", "version": "1.0.0" }))?;
//! npm.install().arg("left-pad").option("save-exact", true).run().await?;
//! let registry = npm.config().get().arg("registry").run().await?;
//! let tags = npm.dist_tags().list().arg("left-pad").run().await?;
//! # let _ = (registry, tags);
//! # Ok(())
//! # }
//! ```
//!
pub mod command;
pub mod options;
pub mod parse;
pub mod table;

use crate::common::fs::io;
use crate::common::process::{self, ExecOptions, OutputSink};
use crate::core::config::Config;
use crate::core::error::Result;
use anyhow::Context;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

pub use command::{CommandSpec, FromOutput, Invocation, Output, PostProcess};
pub use options::{CommandOptions, OptionValue};

const MANIFEST_FILENAME: &str = "package.json";

/// Handle on the npm executable for one working directory.
#[derive(Debug, Clone)]
pub struct Npm {
    program: String,
    exec: ExecOptions,
}

/// Builder for [`Npm`].
#[derive(Debug, Clone)]
pub struct NpmBuilder {
    program: String,
    exec: ExecOptions,
}

impl NpmBuilder {
    /// Directory npm runs in.
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.exec.cwd = cwd.into();
        self
    }

    /// Executable to invoke instead of `npm`.
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Adds an environment variable for the npm process.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.exec.env.insert(key.into(), value.into());
        self
    }

    /// Adds several environment variables for the npm process.
    pub fn envs(mut self, vars: HashMap<String, String>) -> Self {
        self.exec.env.extend(vars);
        self
    }

    /// Mirrors npm's stdout into `sink` while it runs.
    pub fn stream(mut self, sink: OutputSink) -> Self {
        self.exec.sink = Some(sink);
        self
    }

    /// Mirrors npm's stdout to this process's stdout.
    pub fn stream_to_stdout(self) -> Self {
        self.stream(process::sink(std::io::stdout()))
    }

    pub fn build(self) -> Npm {
        Npm {
            program: self.program,
            exec: self.exec,
        }
    }
}

impl Npm {
    /// npm in `cwd`, no streaming.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self::builder().cwd(cwd).build()
    }

    /// npm in the process's current directory.
    pub fn current_dir() -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        Ok(Self::new(cwd))
    }

    pub fn builder() -> NpmBuilder {
        NpmBuilder {
            program: "npm".to_string(),
            exec: ExecOptions::new(PathBuf::from(".")),
        }
    }

    /// Builds an `Npm` from loaded configuration.
    ///
    /// Without a configured working directory the process's current
    /// directory is used.
    pub fn from_config(config: &Config) -> Result<Self> {
        let cwd = match &config.npm.working_dir {
            Some(dir) => PathBuf::from(dir),
            None => std::env::current_dir().context("Failed to get current directory")?,
        };
        let mut builder = Self::builder()
            .cwd(cwd)
            .program(config.npm.program.clone())
            .envs(config.npm.env.clone());
        if config.npm.stream_output {
            builder = builder.stream_to_stdout();
        }
        Ok(builder.build())
    }

    pub fn cwd(&self) -> &Path {
        &self.exec.cwd
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// An invocation of any table entry, returning the untyped [`Output`].
    pub fn dispatch(&self, key: &str) -> Invocation<'_, Output> {
        Invocation::new(self, key)
    }

    fn invoke<T: FromOutput>(&self, key: &'static str) -> Invocation<'_, T> {
        Invocation::new(self, key)
    }

    /// Writes `package` as `package.json` in the working directory.
    pub fn init<T: Serialize + ?Sized>(&self, package: &T) -> Result<PathBuf> {
        let path = self.exec.cwd.join(MANIFEST_FILENAME);
        io::write_json_pretty(&path, package)?;
        info!("Initialized {}", path.display());
        Ok(path)
    }

    pub fn access(&self) -> Access<'_> {
        Access(self)
    }

    pub fn cache(&self) -> Cache<'_> {
        Cache(self)
    }

    pub fn config(&self) -> NpmConfigCommands<'_> {
        NpmConfigCommands(self)
    }

    pub fn dist_tags(&self) -> DistTags<'_> {
        DistTags(self)
    }

    pub fn owner(&self) -> Owner<'_> {
        Owner(self)
    }

    pub fn team(&self) -> Team<'_> {
        Team(self)
    }

    /// `npm search --json`, parsed.
    pub fn search(&self) -> Invocation<'_, Value> {
        self.invoke("search")
    }
}

/// Declares methods that forward to table entries.
macro_rules! npm_methods {
    ($($(#[$doc:meta])* $name:ident => $key:literal : $ty:ty;)*) => {
        $(
            $(#[$doc])*
            pub fn $name(&self) -> Invocation<'_, $ty> {
                self.invoke($key)
            }
        )*
    };
}

impl Npm {
    npm_methods! {
        /// `npm adduser` (interactive; requires a TTY).
        add_user => "add_user": String;
        /// `npm login` (interactive; requires a TTY).
        login => "login": String;
        bin => "bin": String;
        build => "build": String;
        dedupe => "dedupe": String;
        deprecate => "deprecate": String;
        install => "install": String;
        link => "link": String;
        list => "list": String;
        outdated => "outdated": String;
        pack => "pack": String;
        ping => "ping": String;
        prefix => "prefix": String;
        prune => "prune": String;
        publish => "publish": String;
        rebuild => "rebuild": String;
        restart => "restart": String;
        root => "root": String;
        run => "run": String;
        shrinkwrap => "shrinkwrap": String;
        star => "star": String;
        unstar => "unstar": String;
        stars => "stars": String;
        start => "start": String;
        stop => "stop": String;
        test => "test": String;
        uninstall => "uninstall": String;
        unpublish => "unpublish": String;
        update => "update": String;
        version => "version": String;
        view => "view": String;
        /// Alias of `view`.
        show => "show": String;
        /// Alias of `view`.
        info => "info": String;
        whoami => "whoami": String;
    }
}

/// `npm access ...` (requires auth).
#[derive(Debug, Clone, Copy)]
pub struct Access<'a>(&'a Npm);

/// `npm cache ...`.
#[derive(Debug, Clone, Copy)]
pub struct Cache<'a>(&'a Npm);

/// `npm config ...`.
#[derive(Debug, Clone, Copy)]
pub struct NpmConfigCommands<'a>(&'a Npm);

/// `npm dist-tag ...` (requires auth).
#[derive(Debug, Clone, Copy)]
pub struct DistTags<'a>(&'a Npm);

/// `npm owner ...` (requires auth).
#[derive(Debug, Clone, Copy)]
pub struct Owner<'a>(&'a Npm);

/// `npm team ...`.
#[derive(Debug, Clone, Copy)]
pub struct Team<'a>(&'a Npm);

/// Same as `npm_methods!`, for the group handles wrapping `&Npm`.
macro_rules! group_methods {
    ($group:ident { $($(#[$doc:meta])* $name:ident => $key:literal : $ty:ty;)* }) => {
        impl<'a> $group<'a> {
            $(
                $(#[$doc])*
                pub fn $name(&self) -> Invocation<'a, $ty> {
                    self.0.invoke($key)
                }
            )*
        }
    };
}

group_methods!(Access {
    public => "access.public": String;
    restricted => "access.restricted": String;
    grant => "access.grant": String;
    revoke => "access.revoke": String;
    list_packages => "access.list_packages": Value;
    list_collaborators => "access.list_collaborators": Value;
});

group_methods!(Cache {
    add => "cache.add": String;
    clean => "cache.clean": String;
    verify => "cache.verify": String;
});

group_methods!(NpmConfigCommands {
    /// `npm config get <key>`, read as a literal where possible.
    get => "config.get": Value;
    set => "config.set": String;
    delete => "config.delete": String;
    /// `npm config list`, parsed from its ini output.
    list => "config.list": Value;
});

group_methods!(DistTags {
    add => "dist_tags.add": String;
    remove => "dist_tags.remove": String;
    /// `npm dist-tag ls`, one `tag: version` entry per element.
    list => "dist_tags.list": Vec<String>;
});

group_methods!(Owner {
    add => "owner.add": String;
    remove => "owner.remove": String;
    list => "owner.list": Vec<String>;
});

group_methods!(Team {
    create => "team.create": String;
    destroy => "team.destroy": String;
    add => "team.add": String;
    remove => "team.remove": String;
    list => "team.list": Value;
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::NpmConfig;
    use crate::core::error::NpmError;
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;

    /// An `Npm` whose "executable" is `echo`, so stdout is the rendered line.
    fn echo_npm(dir: &Path) -> Npm {
        Npm::builder().cwd(dir).program("echo").build()
    }

    #[test]
    fn test_every_facade_method_resolves() {
        let npm = Npm::new(".");
        let lines = [
            npm.access().public().command_line(),
            npm.access().list_collaborators().command_line(),
            npm.cache().verify().command_line(),
            npm.config().delete().command_line(),
            npm.dist_tags().remove().command_line(),
            npm.owner().list().command_line(),
            npm.team().remove().command_line(),
            npm.add_user().command_line(),
            npm.whoami().command_line(),
            npm.unstar().command_line(),
            npm.info().command_line(),
        ];
        let lines: Vec<String> = lines.into_iter().map(|l| l.unwrap()).collect();
        assert_eq!(
            lines,
            vec![
                "npm access public",
                "npm access ls-collaborators",
                "npm cache verify",
                "npm config delete",
                "npm dist-tag rm",
                "npm owner ls",
                "npm team rm",
                "npm adduser",
                "npm whoami",
                "npm unstar",
                "npm info",
            ]
        );
    }

    #[test]
    fn test_search_command_line_includes_fixed_json() {
        let npm = Npm::new(".");
        let line = npm
            .search()
            .arg("left-pad")
            .option("long", true)
            .command_line()
            .unwrap();
        assert_eq!(line, "npm search --long --json left-pad");
    }

    #[test]
    fn test_search_caller_json_renders_once() {
        let npm = Npm::new(".");
        let line = npm
            .search()
            .arg("x")
            .option("json", true)
            .command_line()
            .unwrap();
        assert_eq!(line, "npm search --json x");

        let line = npm
            .search()
            .arg("x")
            .option("json", false)
            .command_line()
            .unwrap();
        assert_eq!(line, "npm search --json x");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_output_flags_pass_allow_lists() {
        let dir = tempdir().unwrap();
        let npm = echo_npm(dir.path());
        let out = npm.whoami().option("json", true).run().await.unwrap();
        assert_eq!(out, "whoami --json");
        let out = npm.ping().option("json", true).run().await.unwrap();
        assert_eq!(out, "ping --json");
        let tags = npm
            .dist_tags()
            .list()
            .arg("left-pad")
            .option("json", true)
            .run()
            .await
            .unwrap();
        assert_eq!(tags, vec!["dist-tag ls --json left-pad"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_errors_name_the_npm_subcommand() {
        let dir = tempdir().unwrap();
        let npm = echo_npm(dir.path());

        // Typed as text although `config get` yields a structured value.
        let err = Invocation::<String>::new(&npm, "config.get")
            .arg("registry")
            .run()
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<NpmError>(),
            Some(NpmError::UnexpectedOutput { command, .. }) if command == "config get"
        ));

        let err = npm.team().list().arg("myorg").run().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<NpmError>(),
            Some(NpmError::Parse { command, .. }) if command == "team ls"
        ));
    }

    #[test]
    fn test_from_config() {
        let dir = tempdir().unwrap();
        let config = Config {
            npm: NpmConfig {
                program: "/opt/node/bin/npm".into(),
                working_dir: Some(dir.path().to_string_lossy().to_string()),
                ..Default::default()
            },
        };
        let npm = Npm::from_config(&config).unwrap();
        assert_eq!(npm.program(), "/opt/node/bin/npm");
        assert_eq!(npm.cwd(), dir.path());
    }

    #[test]
    fn test_init_writes_package_json() {
        let dir = tempdir().unwrap();
        let npm = Npm::new(dir.path());
        let path = npm
            .init(&json!({ "name": "demo", "version": "0.1.0" }))
            .unwrap();
        assert_eq!(path, dir.path().join("package.json"));
        assert_eq!(
            std::fs::read_to_string(path).unwrap(),
            "{\n  \"name\": \"demo\",\n  \"version\": \"0.1.0\"\n}"
        );
    }

    #[test]
    fn test_init_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let npm = Npm::new(dir.path().join("missing"));
        assert!(npm.init(&json!({})).is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_renders_and_executes() {
        let dir = tempdir().unwrap();
        let npm = echo_npm(dir.path());
        let out = npm
            .install()
            .args(["lodash", "react"])
            .option("save-dev", true)
            .option("global", false)
            .run()
            .await
            .unwrap();
        assert_eq!(out, "install --save-dev lodash react");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_lines_post_processing() {
        let dir = tempdir().unwrap();
        let npm = echo_npm(dir.path());
        let tags = npm.dist_tags().list().arg("left-pad").run().await.unwrap();
        assert_eq!(tags, vec!["dist-tag ls left-pad"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_json_post_processing_failure_reaches_callback() {
        let dir = tempdir().unwrap();
        let npm = echo_npm(dir.path());
        let seen = Arc::new(Mutex::new(None));
        let seen_cb = Arc::clone(&seen);

        let result = npm
            .team()
            .list()
            .arg("myorg")
            .on_complete(move |res| {
                *seen_cb.lock().unwrap() = Some(res.is_err());
            })
            .run()
            .await;

        assert!(result.is_err());
        assert_eq!(*seen.lock().unwrap(), Some(true));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_callback_receives_value() {
        let dir = tempdir().unwrap();
        let npm = echo_npm(dir.path());
        let seen = Arc::new(Mutex::new(String::new()));
        let seen_cb = Arc::clone(&seen);

        let out = npm
            .whoami()
            .on_complete(move |res| {
                if let Ok(value) = res {
                    seen_cb.lock().unwrap().push_str(value);
                }
            })
            .run()
            .await
            .unwrap();

        assert_eq!(out, "whoami");
        assert_eq!(*seen.lock().unwrap(), "whoami");
    }

    #[tokio::test]
    async fn test_invalid_option_rejected_before_spawn() {
        // A program that cannot exist proves nothing was spawned.
        let dir = tempdir().unwrap();
        let npm = Npm::builder()
            .cwd(dir.path())
            .program("definitely-not-npm-98765")
            .build();
        let called = Arc::new(Mutex::new(false));
        let called_cb = Arc::clone(&called);

        let err = npm
            .ping()
            .option("frobnicate", true)
            .on_complete(move |_| *called_cb.lock().unwrap() = true)
            .run()
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<NpmError>(),
            Some(NpmError::InvalidOption { option, .. }) if option == "frobnicate"
        ));
        assert!(!*called.lock().unwrap());
    }

    #[tokio::test]
    async fn test_dispatch_unknown_key() {
        let npm = Npm::new(".");
        let err = npm.dispatch("frobnicate").run().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<NpmError>(),
            Some(NpmError::UnknownCommand(_))
        ));
    }
}
