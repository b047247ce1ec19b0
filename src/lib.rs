//! Layered settings resolver
//!
//! Builds an immutable settings tree from a YAML document or mapping, then
//! applies a scope, a local override, explicit overrides and environment
//! variables, in that order.
//!
//! ```
//! use settings_tree::config::{EnvOverride, MapEnv, Settings};
//!
//! let base: serde_yaml::Mapping = serde_yaml::from_str(
//!     "development:\n  database: {host: localhost, port: 5432}\nproduction:\n  database: {host: db}",
//! )
//! .unwrap();
//!
//! let settings = Settings::builder()
//!     .source(base)
//!     .scope("development")
//!     .environment(EnvOverride::All)
//!     .env_source(MapEnv::new().with("DATABASE__PORT", "6543"))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(settings.dig(["database", "host"]).unwrap(), &"localhost");
//! assert_eq!(settings.dig(["database", "port"]).unwrap(), &"6543");
//! assert!(!settings.contains_key("production"));
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;

pub use config::{ConfigNode, Key, Setting, Settings};
pub use error::{Result, SettingsError};
