//! # npm Command Table (`npm::table`)
//!
//! File: cli/src/npm/table.rs
//!
//! ## Overview
//!
//! The flat list of every command the facade exposes. Each entry is keyed by
//! the dotted path of its facade method (`access.list_packages`,
//! `config.get`, `install`) so the typed methods on [`Npm`](crate::Npm) and
//! the dynamic `npmrs exec <KEY>` front end resolve commands the same way.
//!
//! Most commands accept any option. The ones listed with an allow-list have a
//! narrow, stable option surface, so typos are rejected before npm runs.
//!
use crate::core::error::{NpmError, Result};
use crate::npm::command::{CommandSpec, PostProcess};
use crate::npm::options::OptionValue;

const REGISTRY_OPTIONS: &[&str] = &[
    "registry",
    "scope",
    "otp",
    "json",
    "loglevel",
    "userconfig",
];
const SEARCH_OPTIONS: &[&str] = &[
    "long",
    "json",
    "parseable",
    "color",
    "description",
    "searchopts",
    "searchexclude",
    "searchlimit",
    "searchstaleness",
    "prefer-online",
    "prefer-offline",
    "offline",
    "registry",
    "loglevel",
    "userconfig",
];
const LOCATION_OPTIONS: &[&str] = &["global", "prefix", "json", "loglevel", "userconfig"];
const CACHE_VERIFY_OPTIONS: &[&str] = &["cache", "json", "loglevel", "userconfig"];
const SEARCH_FIXED: &[(&str, OptionValue)] = &[("json", OptionValue::Flag(true))];

/// Every command the facade exposes.
pub static COMMANDS: &[CommandSpec] = &[
    // access (requires auth)
    CommandSpec::raw("access.public", "access public"),
    CommandSpec::raw("access.restricted", "access restricted"),
    CommandSpec::raw("access.grant", "access grant"),
    CommandSpec::raw("access.revoke", "access revoke"),
    CommandSpec::new("access.list_packages", "access ls-packages", PostProcess::Json),
    CommandSpec::new(
        "access.list_collaborators",
        "access ls-collaborators",
        PostProcess::Json,
    ),
    // auth
    CommandSpec::raw("add_user", "adduser"),
    CommandSpec::raw("login", "login"),
    CommandSpec::raw("bin", "bin").allow(LOCATION_OPTIONS),
    CommandSpec::raw("build", "build"),
    // cache
    CommandSpec::raw("cache.add", "cache add"),
    CommandSpec::raw("cache.clean", "cache clean"),
    CommandSpec::raw("cache.verify", "cache verify").allow(CACHE_VERIFY_OPTIONS),
    // config
    CommandSpec::new("config.get", "config get", PostProcess::ConfigValue),
    CommandSpec::raw("config.set", "config set"),
    CommandSpec::raw("config.delete", "config delete"),
    CommandSpec::new("config.list", "config list", PostProcess::Ini),
    CommandSpec::raw("dedupe", "dedupe"),
    CommandSpec::raw("deprecate", "deprecate"),
    // dist-tag (requires auth)
    CommandSpec::raw("dist_tags.add", "dist-tag add"),
    CommandSpec::raw("dist_tags.remove", "dist-tag rm"),
    CommandSpec::new("dist_tags.list", "dist-tag ls", PostProcess::Lines).allow(REGISTRY_OPTIONS),
    CommandSpec::raw("install", "install"),
    CommandSpec::raw("link", "link"),
    CommandSpec::raw("list", "list"),
    CommandSpec::raw("outdated", "outdated"),
    // owner (requires auth)
    CommandSpec::raw("owner.add", "owner add"),
    CommandSpec::raw("owner.remove", "owner rm"),
    CommandSpec::new("owner.list", "owner ls", PostProcess::Lines).allow(REGISTRY_OPTIONS),
    CommandSpec::raw("pack", "pack"),
    CommandSpec::raw("ping", "ping").allow(REGISTRY_OPTIONS),
    CommandSpec::raw("prefix", "prefix").allow(LOCATION_OPTIONS),
    CommandSpec::raw("prune", "prune"),
    CommandSpec::raw("publish", "publish"),
    CommandSpec::raw("rebuild", "rebuild"),
    CommandSpec::raw("restart", "restart"),
    CommandSpec::raw("root", "root").allow(LOCATION_OPTIONS),
    CommandSpec::raw("run", "run"),
    CommandSpec::new("search", "search", PostProcess::Json)
        .allow(SEARCH_OPTIONS)
        .fixed(SEARCH_FIXED),
    CommandSpec::raw("shrinkwrap", "shrinkwrap"),
    CommandSpec::raw("star", "star"),
    CommandSpec::raw("unstar", "unstar"),
    CommandSpec::raw("stars", "stars"),
    CommandSpec::raw("start", "start"),
    CommandSpec::raw("stop", "stop"),
    // team
    CommandSpec::raw("team.create", "team create"),
    CommandSpec::raw("team.destroy", "team destroy"),
    CommandSpec::raw("team.add", "team add"),
    CommandSpec::raw("team.remove", "team rm"),
    CommandSpec::new("team.list", "team ls", PostProcess::Json),
    CommandSpec::raw("test", "test"),
    CommandSpec::raw("uninstall", "uninstall"),
    CommandSpec::raw("unpublish", "unpublish"),
    CommandSpec::raw("update", "update"),
    CommandSpec::raw("version", "version"),
    CommandSpec::raw("view", "view"),
    CommandSpec::raw("show", "show"),
    CommandSpec::raw("info", "info"),
    CommandSpec::raw("whoami", "whoami").allow(REGISTRY_OPTIONS),
];

/// Finds the command registered under `key`.
pub fn lookup(key: &str) -> Result<&'static CommandSpec> {
    COMMANDS
        .iter()
        .find(|spec| spec.key == key)
        .ok_or_else(|| NpmError::UnknownCommand(key.to_string()).into())
}
