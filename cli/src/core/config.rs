//! # npmrs Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module loads, merges and validates the settings that shape how npm is
//! invoked: which executable to run, the working directory, whether stdout is
//! echoed while npm runs, and extra environment variables for the child.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Project-specific `.npmrs.toml` in the current directory or its ancestors
//!    (the search stops at the first directory containing `.git`)
//! 2. User-specific `config.toml` in the platform config directory
//!    (e.g. `~/.config/npmrs/config.toml` on Linux)
//! 3. Default values defined in the code
//!
//! ## Examples
//!
//! ```toml
//! [npm]
//! program = "npm"
//! working_dir = "~/code/my-package"
//! stream_output = true
//!
//! [npm.env]
//! NPM_CONFIG_REGISTRY = "https://registry.npmjs.org/"
//! ```
//!
use crate::core::error::{NpmError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::collections::HashMap;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub npm: NpmConfig,
}

/// Settings for spawning the npm executable.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct NpmConfig {
    /// Executable invoked for every command.
    #[serde(default = "default_program")]
    pub program: String,
    /// Directory npm runs in (can use ~). Defaults to the process's current directory.
    #[serde(default)]
    pub working_dir: Option<String>,
    /// Echo npm's stdout to the terminal while it runs.
    #[serde(default)]
    pub stream_output: bool,
    /// Extra environment variables for the npm process.
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl Default for NpmConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            working_dir: None,
            stream_output: false,
            env: HashMap::new(),
        }
    }
}

fn default_program() -> String {
    "npm".to_string()
}

const PROJECT_CONFIG_FILENAME: &str = ".npmrs.toml";

/// Loads the merged, expanded and validated configuration.
pub fn load_config() -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config()?;
    let mut merged_config = merge_configs(user_config.unwrap_or_default(), project_config);
    expand_config_paths(&mut merged_config).context("Failed to expand paths in configuration")?;
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<Config>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "npmrs", "npmrs") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<Config>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(project_config_path) = find_project_config_path(&current_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file (.npmrs.toml) found in current directory or ancestors.");
        Ok(None)
    }
}

fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let Some(project) = project else {
        return user;
    };
    let (user, project) = (user.npm, project.npm);
    let program = if project.program != default_program() {
        project.program
    } else {
        user.program
    };
    // Project env vars extend the user's; same keys take the project value.
    let mut env = user.env;
    env.extend(project.env);
    Config {
        npm: NpmConfig {
            program,
            working_dir: project.working_dir.or(user.working_dir),
            stream_output: project.stream_output || user.stream_output,
            env,
        },
    }
}

fn expand_config_paths(config: &mut Config) -> Result<()> {
    if let Some(dir) = config.npm.working_dir.as_mut() {
        *dir = shellexpand::tilde(dir.as_str()).into_owned();
        debug!("Expanded working directory: {}", dir);
    }
    Ok(())
}

fn validate_config(config: &Config) -> Result<()> {
    info!("Validating final configuration...");
    if config.npm.program.trim().is_empty() {
        return Err(anyhow!(NpmError::Config(
            "'npm.program' must not be empty.".to_string()
        )));
    }
    if let Some(dir) = &config.npm.working_dir {
        let dir = PathBuf::from(dir);
        if !dir.exists() {
            warn!("Configured working directory '{}' does not exist.", dir.display());
        } else if !dir.is_dir() {
            return Err(anyhow!(NpmError::Config(format!(
                "Configured working directory '{}' exists but is not a directory.",
                dir.display()
            ))));
        }
    }
    info!("Configuration validation successful.");
    Ok(())
}
