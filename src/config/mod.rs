//! Layered settings resolution.
//!
//! Settings are built once, in this order, each stage deep-merging over the last:
//! 1. **Primary** - a parsed mapping or YAML document, optionally narrowed to a scope
//! 2. **Local** - a machine-local document such as `settings.local.yml` (skipped if absent)
//! 3. **Explicit** - a mapping supplied by the caller
//! 4. **Environment** - `SECTION__KEY=value` variables
//!
//! ## Merge Strategy
//! - Nested mappings merge key by key into existing nodes
//! - Scalars, sequences and nulls replace whatever was there, subtrees included
//!
//! ## Environment Variables
//! - [`EnvOverride::Named`] - only the listed variables; missing keys are created
//! - [`EnvOverride::All`] - the whole environment; only existing keys are updated
//!
//! ## Default Locations
//! - `config/settings.yml`, `config/settings.yaml`, `settings.yml`, `settings.yaml`
//! - `<user config dir>/settings-tree/settings.yml`

mod document;
mod env;
mod key;
mod loader;
mod merge;
mod node;
mod pipeline;
mod scope;

pub use document::{adjacent_local_path, load_document, load_optional_document, parse_document};
pub use env::{EnvSource, MapEnv, PATH_SEPARATOR, ProcessEnv, env_path};
pub use key::Key;
pub use loader::{DefaultLocations, EnvOverride, LocalOverride, Settings, SettingsBuilder, Source};
pub use node::{ConfigNode, Setting};
pub use pipeline::{AppliedSource, OverrideStage};
pub use scope::select_scope;
