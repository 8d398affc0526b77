//! # npm Output Post-Processors (`npm::parse`)
//!
//! File: cli/src/npm/parse.rs
//!
//! ## Overview
//!
//! Turns the text npm prints into structured values:
//! - `parse_json`: output of `--json` style commands
//! - `parse_list`: one entry per non-empty line (`dist-tag ls`, `owner ls`)
//! - `parse_config_value`: the single value printed by `npm config get`
//! - `parse_ini`: the ini-formatted dump printed by `npm config list`
//!
//! The INI reader follows npm's own `ini` package: `;`/`#` comments,
//! `[section]` headers where dotted names nest (`\.` keeps a literal dot),
//! bare keys meaning `true`, `key[]` collecting arrays, `true`/`false`/`null`
//! becoming JSON literals, and quotes stripped from keys and values.
//!
use crate::core::error::{NpmError, Result};
use serde_json::{Map, Value};

/// Parses npm's JSON output.
pub fn parse_json(command: &str, stdout: &str) -> Result<Value> {
    serde_json::from_str(stdout).map_err(|e| {
        NpmError::Parse {
            command: command.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Splits output into lines, dropping empty ones.
pub fn parse_list(stdout: &str) -> Vec<String> {
    stdout
        .split('\n')
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reads a config value as a literal when it is one, otherwise keeps the text.
///
/// Empty output is the empty string; `undefined` is `null`; JSON literals
/// (numbers, booleans, `null`, strings, arrays, objects) and single-quoted
/// strings are decoded. Anything else comes back unchanged.
pub fn parse_config_value(stdout: &str) -> Value {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Value::String(String::new());
    }
    if trimmed == "undefined" {
        return Value::Null;
    }
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return value;
    }
    if let Some(inner) = single_quoted(trimmed) {
        return Value::String(inner.replace("\\'", "'"));
    }
    Value::String(stdout.to_string())
}

fn single_quoted(text: &str) -> Option<&str> {
    let inner = text.strip_prefix('\'')?.strip_suffix('\'')?;
    // An unescaped quote inside means this is not one string literal.
    let mut escaped = false;
    for c in inner.chars() {
        match c {
            '\\' if !escaped => escaped = true,
            '\'' if !escaped => return None,
            _ => escaped = false,
        }
    }
    Some(inner)
}

enum Section {
    Root,
    Named(String),
    /// Lines under `[__proto__]` are read and thrown away.
    Discarded,
}

/// Parses ini-formatted text into a JSON object.
pub fn parse_ini(text: &str) -> Value {
    let mut out = Map::new();
    let mut section = Section::Root;

    for line in text.split(|c: char| c == '\r' || c == '\n') {
        if line.is_empty() || is_comment(line) {
            continue;
        }

        if let Some(name) = section_header(line) {
            let name = unquote(name);
            section = if name == "__proto__" {
                Section::Discarded
            } else {
                child_map(&mut out, &name);
                Section::Named(name)
            };
            continue;
        }

        let Some((raw_key, raw_value)) = split_pair(line) else {
            continue;
        };
        let mut key = unquote(raw_key);
        if key == "__proto__" {
            continue;
        }
        let value = match raw_value {
            Some(raw) => literal(decode(raw)),
            None => Value::Bool(true),
        };

        let target = match &section {
            Section::Root => &mut out,
            Section::Named(name) => match out.get_mut(name).and_then(Value::as_object_mut) {
                Some(map) => map,
                None => continue,
            },
            Section::Discarded => continue,
        };

        if key.len() > 2 && key.ends_with("[]") {
            key.truncate(key.len() - 2);
            if key == "__proto__" {
                continue;
            }
            match target.get_mut(&key) {
                None => {
                    target.insert(key.clone(), Value::Array(Vec::new()));
                }
                Some(existing) if !existing.is_array() => {
                    let previous = existing.take();
                    *existing = Value::Array(vec![previous]);
                }
                Some(_) => {}
            }
        }

        match target.get_mut(&key) {
            Some(Value::Array(items)) => items.push(value),
            _ => {
                target.insert(key, value);
            }
        }
    }

    nest_dotted_sections(&mut out);
    Value::Object(out)
}

fn is_comment(line: &str) -> bool {
    matches!(line.trim_start().chars().next(), Some(';') | Some('#'))
}

fn section_header(line: &str) -> Option<&str> {
    let inner = line.strip_prefix('[')?.strip_suffix(']')?;
    (!inner.contains(']')).then_some(inner)
}

/// Splits `key = value`; a line without `=` is a bare key.
fn split_pair(line: &str) -> Option<(&str, Option<&str>)> {
    match line.split_once('=') {
        Some(("", _)) => None,
        Some((key, value)) => Some((key, Some(value))),
        None => Some((line, None)),
    }
}

/// `true`/`false`/`null` text becomes the JSON literal, quoted or not.
fn literal(value: Value) -> Value {
    match value.as_str() {
        Some("true") => Value::Bool(true),
        Some("false") => Value::Bool(false),
        Some("null") => Value::Null,
        _ => value,
    }
}

/// Decodes a key or section name; non-string JSON is kept as its text.
fn unquote(raw: &str) -> String {
    match decode(raw) {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

/// Trims, decodes quoted text as JSON, and cuts unquoted text at `;`/`#`.
///
/// Single quotes are removed before decoding, so `'123'` is the number 123.
/// Quoted text that is not valid JSON is kept as written.
fn decode(raw: &str) -> Value {
    let val = raw.trim();
    let quoted = val.len() >= 2
        && ((val.starts_with('"') && val.ends_with('"'))
            || (val.starts_with('\'') && val.ends_with('\'')));
    if quoted {
        let body = if val.starts_with('\'') {
            &val[1..val.len() - 1]
        } else {
            val
        };
        return serde_json::from_str::<Value>(body)
            .unwrap_or_else(|_| Value::String(body.to_string()));
    }

    let mut unescaped = String::with_capacity(val.len());
    let mut escaped = false;
    for c in val.chars() {
        if escaped {
            if !matches!(c, '\\' | ';' | '#') {
                unescaped.push('\\');
            }
            unescaped.push(c);
            escaped = false;
        } else if c == ';' || c == '#' {
            break;
        } else if c == '\\' {
            escaped = true;
        } else {
            unescaped.push(c);
        }
    }
    if escaped {
        unescaped.push('\\');
    }
    Value::String(unescaped.trim().to_string())
}

/// Splits a section name on unescaped dots. `\.` stays escaped in every part.
fn dot_split(name: &str) -> Vec<String> {
    let mut parts = vec![String::new()];
    let mut chars = name.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'.') => {
                chars.next();
                if let Some(last) = parts.last_mut() {
                    last.push_str("\\.");
                }
            }
            '.' => parts.push(String::new()),
            _ => {
                if let Some(last) = parts.last_mut() {
                    last.push(c);
                }
            }
        }
    }
    parts
}

/// Moves `{"a.b": {..}}` sections under `{"a": {"b": {..}}}`.
fn nest_dotted_sections(out: &mut Map<String, Value>) {
    let dotted: Vec<String> = out
        .iter()
        .filter(|(name, value)| value.is_object() && (name.contains('.')))
        .map(|(name, _)| name.clone())
        .collect();

    for name in dotted {
        let mut parts = dot_split(&name);
        let leaf = parts.pop().unwrap_or_default();
        parts.retain(|part| part != "__proto__");
        // Only the leaf is unescaped; parent names keep `\.` as written.
        let unescaped_leaf = leaf.replace("\\.", ".");
        if parts.is_empty() && unescaped_leaf == leaf {
            continue;
        }
        // `shift_remove` keeps the remaining sections in file order.
        let Some(section) = out.shift_remove(&name) else {
            continue;
        };
        let mut cursor = &mut *out;
        for part in &parts {
            cursor = child_map(cursor, part);
        }
        cursor.insert(unescaped_leaf, section);
    }
}

/// Returns the object stored under `key`, replacing any non-object value.
fn child_map<'a>(map: &'a mut Map<String, Value>, key: &str) -> &'a mut Map<String, Value> {
    let slot = map
        .entry(key)
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(child) => child,
        _ => unreachable!("slot was just replaced with an object"),
    }
}
