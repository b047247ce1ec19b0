//! Settings construction.
//!
//! [`SettingsBuilder`] resolves the primary source (falling back to the
//! default locations), selects the scope, then runs the override stages.
//! The resulting [`Settings`] cannot be changed afterwards.

use super::document::{adjacent_local_path, load_document, load_optional_document};
use super::env::{EnvSource, MapEnv, ProcessEnv};
use super::key::Key;
use super::node::{ConfigNode, Setting};
use super::pipeline::{AppliedSource, EnvironmentInput, LocalInput, OverrideStage, apply_overrides};
use super::scope::select_scope;
use crate::error::{Result, SettingsError};
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application directory name under the user config directory.
const APP_DIR: &str = "settings-tree";

/// Where the primary settings come from.
#[derive(Debug, Clone, Default)]
pub enum Source {
    /// An already parsed mapping.
    Mapping(Mapping),
    /// A YAML document to load.
    Document(PathBuf),
    /// Use the first existing default location.
    #[default]
    Unspecified,
}

impl From<Mapping> for Source {
    fn from(mapping: Mapping) -> Self {
        Source::Mapping(mapping)
    }
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        Source::Document(path)
    }
}

impl From<&Path> for Source {
    fn from(path: &Path) -> Self {
        Source::Document(path.to_path_buf())
    }
}

/// Machine-local override directive.
#[derive(Debug, Clone, Default)]
pub enum LocalOverride {
    #[default]
    Disabled,
    /// `<stem>.local.<ext>` next to the primary document.
    Adjacent,
    /// A specific document. Relative paths are resolved against the primary
    /// document's directory.
    Path(PathBuf),
    /// An already parsed mapping.
    Mapping(Mapping),
}

/// Environment override directive.
#[derive(Debug, Clone, Default)]
pub enum EnvOverride {
    #[default]
    Disabled,
    /// Only these variables. Missing keys and intermediate nodes are created.
    Named(Vec<String>),
    /// These name/value pairs instead of the environment source, with the
    /// same creation rules as `Named`.
    Vars(MapEnv),
    /// Every variable, but only keys that already exist are updated.
    All,
}

impl EnvOverride {
    /// Whether this mode may add keys that no earlier stage defined.
    pub fn creates_missing(&self) -> bool {
        matches!(self, EnvOverride::Named(_) | EnvOverride::Vars(_))
    }
}

/// Default locations searched when no primary source is given.
#[derive(Debug, Clone)]
pub struct DefaultLocations {
    candidates: Vec<PathBuf>,
}

impl Default for DefaultLocations {
    fn default() -> Self {
        Self::discover()
    }
}

impl DefaultLocations {
    /// The conventional locations, relative to the current directory, then
    /// the user config directory.
    pub fn discover() -> Self {
        let mut candidates: Vec<PathBuf> = [
            "config/settings.yml",
            "config/settings.yaml",
            "settings.yml",
            "settings.yaml",
        ]
        .iter()
        .map(PathBuf::from)
        .collect();

        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join(APP_DIR).join("settings.yml"));
        }

        Self { candidates }
    }

    /// Search exactly these paths, in order.
    pub fn with_paths(paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            candidates: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Search nowhere.
    pub fn none() -> Self {
        Self {
            candidates: Vec::new(),
        }
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// First candidate that exists.
    pub fn find(&self) -> Option<&Path> {
        self.candidates
            .iter()
            .map(PathBuf::as_path)
            .find(|path| path.is_file())
    }
}

/// Builder for [`Settings`].
pub struct SettingsBuilder {
    source: Source,
    scope: Option<Value>,
    local: LocalOverride,
    overrides: Option<Mapping>,
    environment: EnvOverride,
    env_source: Box<dyn EnvSource>,
    defaults: DefaultLocations,
}

impl Default for SettingsBuilder {
    fn default() -> Self {
        Self {
            source: Source::Unspecified,
            scope: None,
            local: LocalOverride::Disabled,
            overrides: None,
            environment: EnvOverride::Disabled,
            env_source: Box::new(ProcessEnv),
            defaults: DefaultLocations::discover(),
        }
    }
}

impl SettingsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(mut self, source: impl Into<Source>) -> Self {
        self.source = source.into();
        self
    }

    /// Narrow the primary source to the mapping under this top-level key.
    pub fn scope(mut self, scope: impl Into<Value>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn local(mut self, local: LocalOverride) -> Self {
        self.local = local;
        self
    }

    /// Programmatic overrides, applied after the local override.
    pub fn overrides(mut self, overrides: Mapping) -> Self {
        self.overrides = Some(overrides);
        self
    }

    pub fn environment(mut self, environment: EnvOverride) -> Self {
        self.environment = environment;
        self
    }

    /// Where environment variables are read from. Defaults to the process environment.
    pub fn env_source(mut self, env_source: impl EnvSource + 'static) -> Self {
        self.env_source = Box::new(env_source);
        self
    }

    pub fn default_locations(mut self, defaults: DefaultLocations) -> Self {
        self.defaults = defaults;
        self
    }

    /// Resolve every source and build the tree.
    pub fn build(self) -> Result<Settings> {
        let (primary, primary_path) = self.resolve_primary()?;

        let scope = self.scope.as_ref().map(Key::normalize);
        let mut root = match &self.scope {
            Some(requested) => match select_scope(&primary, requested) {
                Some(scoped) => ConfigNode::build(scoped),
                None => {
                    debug!(scope = ?requested, "Scope not present in primary source, using empty settings");
                    ConfigNode::default()
                }
            },
            None => ConfigNode::build(&primary),
        };

        let mut sources = vec![AppliedSource {
            stage: OverrideStage::Primary,
            path: primary_path.clone(),
            entries: root.len(),
        }];

        let local = self.resolve_local(primary_path.as_deref())?;
        let environment = self.collect_environment();
        sources.extend(apply_overrides(
            &mut root,
            local,
            self.overrides.as_ref(),
            environment,
        ));

        Ok(Settings {
            root,
            scope,
            primary_path,
            sources,
        })
    }

    fn resolve_primary(&self) -> Result<(Mapping, Option<PathBuf>)> {
        match &self.source {
            Source::Mapping(mapping) => Ok((mapping.clone(), None)),
            Source::Document(path) => Ok((load_document(path)?, Some(path.clone()))),
            Source::Unspecified => {
                let Some(path) = self.defaults.find() else {
                    return Err(SettingsError::ConfigurationMissing {
                        searched: self.defaults.candidates().to_vec(),
                    });
                };
                debug!(path = %path.display(), "Using default settings location");
                Ok((load_document(path)?, Some(path.to_path_buf())))
            }
        }
    }

    fn resolve_local(&self, primary_path: Option<&Path>) -> Result<Option<LocalInput>> {
        let path = match &self.local {
            LocalOverride::Disabled => return Ok(None),
            LocalOverride::Mapping(mapping) => {
                return Ok(Some(LocalInput {
                    mapping: mapping.clone(),
                    path: None,
                }));
            }
            LocalOverride::Adjacent => match primary_path {
                Some(primary) => adjacent_local_path(primary),
                None => {
                    debug!("Primary source is not a document, no adjacent local override");
                    return Ok(None);
                }
            },
            LocalOverride::Path(path) => resolve_relative(path, primary_path),
        };

        Ok(load_optional_document(&path)?.map(|mapping| LocalInput {
            mapping,
            path: Some(path),
        }))
    }

    fn collect_environment(&self) -> Option<EnvironmentInput> {
        let vars = match &self.environment {
            EnvOverride::Disabled => return None,
            EnvOverride::Named(names) => names
                .iter()
                .filter_map(|name| Some((name.clone(), self.env_source.var(name)?)))
                .collect(),
            EnvOverride::Vars(vars) => vars.vars(),
            EnvOverride::All => self.env_source.vars(),
        };
        Some(EnvironmentInput {
            vars,
            create_missing: self.environment.creates_missing(),
        })
    }
}

fn resolve_relative(path: &Path, primary_path: Option<&Path>) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match primary_path.and_then(Path::parent) {
        Some(dir) => dir.join(path),
        None => path.to_path_buf(),
    }
}

/// A fully resolved, immutable settings tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    root: ConfigNode,
    scope: Option<Key>,
    primary_path: Option<PathBuf>,
    sources: Vec<AppliedSource>,
}

impl Settings {
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::new()
    }

    /// Settings from a single document, with no scope or overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::builder().source(path.as_ref()).build()
    }

    /// Settings from a parsed mapping, with no scope or overrides.
    pub fn from_mapping(mapping: &Mapping) -> Self {
        let root = ConfigNode::build(mapping);
        let sources = vec![AppliedSource {
            stage: OverrideStage::Primary,
            path: None,
            entries: root.len(),
        }];
        Self {
            root,
            scope: None,
            primary_path: None,
            sources,
        }
    }

    pub fn root(&self) -> &ConfigNode {
        &self.root
    }

    pub fn get(&self, key: impl AsRef<str>) -> Option<&Setting> {
        self.root.get(key)
    }

    pub fn contains_key(&self, key: impl AsRef<str>) -> bool {
        self.root.contains_key(key)
    }

    pub fn attr(&self, name: impl AsRef<str>) -> Result<&Setting> {
        self.root.attr(name)
    }

    pub fn dig<I, K>(&self, path: I) -> Option<&Setting>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        self.root.dig(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Setting)> {
        self.root.iter()
    }

    /// The scope that was requested, canonicalized.
    pub fn scope(&self) -> Option<&Key> {
        self.scope.as_ref()
    }

    /// The primary document, if the primary source was a file.
    pub fn primary_path(&self) -> Option<&Path> {
        self.primary_path.as_deref()
    }

    /// The stages that contributed, in application order.
    pub fn sources(&self) -> &[AppliedSource] {
        &self.sources
    }
}
