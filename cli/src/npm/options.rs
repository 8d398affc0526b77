//! # npm Command Options (`npm::options`)
//!
//! File: cli/src/npm/options.rs
//!
//! ## Overview
//!
//! The options map a caller attaches to one invocation, its validation
//! against a command's allow-list, and its rendering into `--flag` /
//! `--flag=value` tokens.
//!
//! Rendering rules:
//! - falsy values (`false`, `""`, `0`) are left out entirely
//! - `true` renders as a bare `--key`
//! - everything else renders as `--key=value`
//! - tokens keep insertion order
//!
use crate::core::error::{NpmError, Result};
use std::fmt;

/// A single option value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Flag(bool),
    Text(String),
    Number(i64),
}

impl OptionValue {
    fn is_falsy(&self) -> bool {
        match self {
            OptionValue::Flag(b) => !b,
            OptionValue::Text(s) => s.is_empty(),
            OptionValue::Number(n) => *n == 0,
        }
    }

    /// Parses a CLI-supplied value: integers become numbers, `true`/`false` flags.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "true" => OptionValue::Flag(true),
            "false" => OptionValue::Flag(false),
            _ => raw
                .parse::<i64>()
                .map(OptionValue::Number)
                .unwrap_or_else(|_| OptionValue::Text(raw.to_string())),
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Flag(b) => write!(f, "{b}"),
            OptionValue::Text(s) => f.write_str(s),
            OptionValue::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Flag(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Text(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::Text(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Number(value)
    }
}

/// Insertion-ordered option map for a single invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOptions {
    entries: Vec<(String, OptionValue)>,
}

impl CommandOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key`. An existing key keeps its position and takes the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Parses `key` / `key=value` pairs as given on the command line.
    ///
    /// Leading dashes are accepted and dropped, so `--save-dev` and
    /// `save-dev` are the same option.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::new();
        for pair in pairs {
            let pair = pair.as_ref().trim_start_matches('-');
            let (key, value) = match pair.split_once('=') {
                Some((key, raw)) => (key, OptionValue::parse(raw)),
                None => (pair, OptionValue::Flag(true)),
            };
            if key.is_empty() {
                anyhow::bail!("Option name missing in '{}'", pair);
            }
            options.insert(key, value);
        }
        Ok(options)
    }

    /// Overlays `fixed` on a copy of `self`; fixed values win.
    pub fn merged(&self, fixed: &[(&str, OptionValue)]) -> Self {
        let mut merged = self.clone();
        for (key, value) in fixed {
            merged.insert(*key, value.clone());
        }
        merged
    }

    /// Renders the truthy options as npm flags, in insertion order.
    pub fn to_flags(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, value)| !value.is_falsy())
            .map(|(key, value)| match value {
                OptionValue::Flag(_) => format!("--{key}"),
                other => format!("--{key}={other}"),
            })
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for CommandOptions
where
    K: Into<String>,
    V: Into<OptionValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut options = Self::new();
        for (key, value) in iter {
            options.insert(key, value);
        }
        options
    }
}

/// Rejects any option whose name is not in `allowed`.
///
/// `None` means the command accepts any option.
pub fn check_options(
    command: &str,
    allowed: Option<&[&str]>,
    options: &CommandOptions,
) -> Result<()> {
    let Some(allowed) = allowed else {
        return Ok(());
    };
    if let Some(bad) = options.keys().find(|key| !allowed.contains(key)) {
        return Err(NpmError::InvalidOption {
            command: command.to_string(),
            option: bad.to_string(),
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_flags_renders_in_insertion_order() {
        let options = CommandOptions::new()
            .with("save-dev", true)
            .with("registry", "https://r.example")
            .with("depth", 2i64);
        assert_eq!(
            options.to_flags(),
            vec!["--save-dev", "--registry=https://r.example", "--depth=2"]
        );
    }

    #[test]
    fn test_to_flags_drops_falsy_values() {
        let options = CommandOptions::new()
            .with("global", false)
            .with("tag", "")
            .with("depth", 0i64)
            .with("json", true);
        assert_eq!(options.to_flags(), vec!["--json"]);
    }

    #[test]
    fn test_insert_keeps_position_of_existing_key() {
        let mut options = CommandOptions::new().with("a", true).with("b", true);
        options.insert("a", "x");
        assert_eq!(options.to_flags(), vec!["--a=x", "--b"]);
    }

    #[test]
    fn test_merged_fixed_options_win() {
        let options = CommandOptions::new().with("json", false).with("long", true);
        let merged = options.merged(&[("json", OptionValue::Flag(true))]);
        assert_eq!(merged.to_flags(), vec!["--json", "--long"]);
        // The caller's map is untouched.
        assert_eq!(options.get("json"), Some(&OptionValue::Flag(false)));
    }

    #[test]
    fn test_from_pairs() {
        let options =
            CommandOptions::from_pairs(["--save-dev", "depth=3", "tag=next", "global=false"])
                .unwrap();
        assert_eq!(options.get("save-dev"), Some(&OptionValue::Flag(true)));
        assert_eq!(options.get("depth"), Some(&OptionValue::Number(3)));
        assert_eq!(options.get("tag"), Some(&OptionValue::Text("next".into())));
        assert_eq!(options.get("global"), Some(&OptionValue::Flag(false)));

        assert!(CommandOptions::from_pairs(["=oops"]).is_err());
    }

    #[test]
    fn test_check_options_allow_list() {
        let options = CommandOptions::new().with("long", true).with("nope", true);

        assert!(check_options("search", None, &options).is_ok());
        assert!(check_options("search", Some(&["long", "nope"]), &options).is_ok());

        let err = check_options("search", Some(&["long"]), &options).unwrap_err();
        match err.downcast_ref::<NpmError>() {
            Some(NpmError::InvalidOption { command, option }) => {
                assert_eq!(command, "search");
                assert_eq!(option, "nope");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_collect_from_tuples() {
        let options: CommandOptions = [("a", "1"), ("b", "two")].into_iter().collect();
        assert_eq!(options.to_flags(), vec!["--a=1", "--b=two"]);
    }
}
