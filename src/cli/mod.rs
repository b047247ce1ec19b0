//! CLI command definitions for settings-tree
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod assign;

use crate::config::{EnvOverride, LocalOverride, SettingsBuilder, Source};
use crate::format::OutputFormat;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Resolve and inspect layered YAML settings
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Primary settings document (default: first of the conventional locations)
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Top-level key to narrow the primary document to (numbers and booleans
    /// match keys of that type as well as their text form)
    #[arg(short, long, global = true)]
    pub scope: Option<String>,

    /// Merge `<name>.local.<ext>` next to the primary document, if present
    #[arg(long, global = true, conflicts_with = "local_file")]
    pub local: bool,

    /// Merge this local override document, if present
    #[arg(long, global = true)]
    pub local_file: Option<PathBuf>,

    /// Explicit override, `dotted.key=value` (value parsed as YAML; repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE", global = true)]
    pub assignments: Vec<String>,

    /// Environment variable to apply, creating keys as needed (repeatable)
    #[arg(long = "env", value_name = "NAME", global = true, conflicts_with = "env_all")]
    pub env_names: Vec<String>,

    /// Apply the whole environment, updating existing keys only
    #[arg(long, global = true)]
    pub env_all: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the resolved settings (default if no subcommand given)
    Show(ShowArgs),

    /// Print one setting by dotted path
    Get(GetArgs),

    /// List the keys at the root or under a dotted path
    Keys(KeysArgs),

    /// List the stages that contributed to the resolved settings
    Sources,
}

#[derive(Args, Debug, Default)]
pub struct ShowArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Dotted path, e.g. `database.pool.size`
    pub path: String,

    /// Output format for subtrees and non-text values
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct KeysArgs {
    /// Dotted path of the node to list (default: root)
    pub path: Option<String>,
}

impl Cli {
    /// Translate the global options into a settings builder.
    pub fn settings_builder(&self) -> Result<SettingsBuilder> {
        let mut builder = SettingsBuilder::new();

        if let Some(file) = &self.file {
            builder = builder.source(Source::Document(file.clone()));
        }
        if let Some(scope) = &self.scope {
            builder = builder.scope(assign::parse_scalar(scope));
        }

        if let Some(local_file) = &self.local_file {
            builder = builder.local(LocalOverride::Path(local_file.clone()));
        } else if self.local {
            builder = builder.local(LocalOverride::Adjacent);
        }

        if !self.assignments.is_empty() {
            builder = builder.overrides(assign::overrides_from_assignments(&self.assignments)?);
        }

        if self.env_all {
            builder = builder.environment(EnvOverride::All);
        } else if !self.env_names.is_empty() {
            builder = builder.environment(EnvOverride::Named(self.env_names.clone()));
        }

        Ok(builder)
    }
}

/// Split a dotted path into keys, ignoring empty segments.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('.').filter(|segment| !segment.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DefaultLocations, MapEnv};

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::parse_from(["settings-tree"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.log, "2");
    }

    #[test]
    fn test_parse_global_options() {
        let cli = Cli::parse_from([
            "settings-tree",
            "--file",
            "app.yml",
            "--scope",
            "dev",
            "--set",
            "a.b=1",
            "--set",
            "c=x",
            "--env",
            "HOME",
            "get",
            "a.b",
        ]);
        assert_eq!(cli.file, Some(PathBuf::from("app.yml")));
        assert_eq!(cli.scope.as_deref(), Some("dev"));
        assert_eq!(cli.assignments, vec!["a.b=1", "c=x"]);
        assert_eq!(cli.env_names, vec!["HOME"]);
        assert!(matches!(cli.command, Some(Command::Get(ref args)) if args.path == "a.b"));
    }

    #[test]
    fn test_env_modes_conflict() {
        let result = Cli::try_parse_from(["settings-tree", "--env", "A", "--env-all"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_from_options() {
        let cli = Cli::parse_from(["settings-tree", "--set", "db.port=5433", "--env", "MODE"]);
        let settings = cli
            .settings_builder()
            .unwrap()
            .source(Source::Mapping(serde_yaml::from_str("db: {port: 5432, host: h}").unwrap()))
            .env_source(MapEnv::new().with("MODE", "fast"))
            .default_locations(DefaultLocations::none())
            .build()
            .unwrap();
        assert_eq!(settings.dig(["db", "port"]).unwrap(), &5433);
        assert_eq!(settings.dig(["db", "host"]).unwrap(), &"h");
        assert_eq!(settings.get("mode").unwrap(), &"fast");
    }

    #[test]
    fn test_numeric_scope_selects_numeric_key() {
        let cli = Cli::parse_from(["settings-tree", "--scope", "2024"]);
        let settings = cli
            .settings_builder()
            .unwrap()
            .source(Source::Mapping(
                serde_yaml::from_str("2024: {release: spring}
2023: {release: fall}").unwrap(),
            ))
            .default_locations(DefaultLocations::none())
            .build()
            .unwrap();
        assert_eq!(settings.get("release").unwrap(), &"spring");
        assert_eq!(settings.scope().map(|key| key.as_str()), Some("2024"));
    }

    #[test]
    fn test_text_scope_still_matches_symbol_key() {
        let cli = Cli::parse_from(["settings-tree", "--scope", "dev"]);
        let settings = cli
            .settings_builder()
            .unwrap()
            .source(Source::Mapping(serde_yaml::from_str(":dev: {a: 1}").unwrap()))
            .default_locations(DefaultLocations::none())
            .build()
            .unwrap();
        assert_eq!(settings.get("a").unwrap(), &1);
    }

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("a.b.c"), vec!["a", "b", "c"]);
        assert_eq!(split_path(".a..b."), vec!["a", "b"]);
        assert!(split_path("").is_empty());
    }
}
