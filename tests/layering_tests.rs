//! Integration tests for layered settings construction.
//!
//! Covers the primary source, scopes, local overrides, explicit overrides and
//! default-location fallback, using documents written to temp directories.

use serde_yaml::{Mapping, Value};
use settings_tree::config::{
    DefaultLocations, EnvOverride, Key, LocalOverride, MapEnv, OverrideStage, Settings, Source,
};
use settings_tree::SettingsError;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

fn mapping(text: &str) -> Mapping {
    serde_yaml::from_str(text).expect("valid YAML mapping")
}

/// Write a document into `dir` and return its path.
fn write_doc(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write settings document");
    path
}

fn app_document() -> &'static str {
    r#"
defaults: &defaults
  name: shop
  database:
    host: localhost
    port: 5432
    pool: 5

development:
  <<: *defaults
  debug: true

production:
  name: shop
  database:
    host: db.internal
    port: 5432
  debug: false
"#
}

#[test]
fn key_representations_are_equivalent() {
    let settings = Settings::from_mapping(&mapping(":name: app\nport: 80"));
    assert_eq!(settings.get("name"), settings.get(Key::from("name")));
    assert_eq!(settings.get("name").unwrap(), &"app");
    assert_eq!(settings.get("port"), settings.get(Key::normalize(&Value::from(":port"))));
}

#[test]
fn scope_isolates_primary_document() {
    let settings = Settings::builder()
        .source(mapping("dev: {foo: 1}\nprod: {foo: 2}"))
        .scope("dev")
        .build()
        .unwrap();
    assert_eq!(settings.get("foo").unwrap(), &1);
    assert!(!settings.contains_key("prod"));
    assert!(!settings.contains_key("dev"));
}

#[test]
fn scope_selects_from_document_with_merge_keys() {
    let temp = TempDir::new().unwrap();
    let path = write_doc(temp.path(), "settings.yml", app_document());

    let development = Settings::builder()
        .source(path.as_path())
        .scope("development")
        .build()
        .unwrap();
    assert_eq!(development.get("name").unwrap(), &"shop");
    assert_eq!(development.dig(["database", "pool"]).unwrap(), &5);
    assert_eq!(development.get("debug").unwrap(), &true);
    assert!(!development.contains_key("<<"));

    let settings = Settings::builder()
        .source(path.as_path())
        .scope("production")
        .build()
        .unwrap();
    assert_eq!(settings.dig(["database", "host"]).unwrap(), &"db.internal");
    assert_eq!(settings.get("debug").unwrap(), &false);
    assert_eq!(settings.primary_path(), Some(path.as_path()));
}

#[test]
fn adjacent_local_override_updates_leaves_only() {
    let temp = TempDir::new().unwrap();
    let path = write_doc(
        temp.path(),
        "settings.yml",
        "development:\n  database: {host: localhost, port: 5432}\n  name: shop",
    );
    write_doc(
        temp.path(),
        "settings.local.yml",
        "database:\n  port: 6000\nextra: from-local",
    );

    let settings = Settings::builder()
        .source(path.as_path())
        .scope("development")
        .local(LocalOverride::Adjacent)
        .build()
        .unwrap();

    assert_eq!(settings.dig(["database", "port"]).unwrap(), &6000);
    assert_eq!(settings.dig(["database", "host"]).unwrap(), &"localhost");
    assert_eq!(settings.get("name").unwrap(), &"shop");
    assert_eq!(settings.get("extra").unwrap(), &"from-local");

    let local = &settings.sources()[1];
    assert_eq!(local.stage, OverrideStage::Local);
    assert_eq!(local.path.as_deref(), Some(temp.path().join("settings.local.yml").as_path()));
}

#[test]
fn missing_local_override_is_skipped() {
    let temp = TempDir::new().unwrap();
    let path = write_doc(temp.path(), "settings.yml", "a: 1");

    let settings = Settings::builder()
        .source(path.as_path())
        .local(LocalOverride::Adjacent)
        .build()
        .unwrap();
    assert_eq!(settings.get("a").unwrap(), &1);
    assert_eq!(settings.sources().len(), 1);

    let settings = Settings::builder()
        .source(path.as_path())
        .local(LocalOverride::Path(PathBuf::from("nowhere.yml")))
        .build()
        .unwrap();
    assert_eq!(settings.sources().len(), 1);
}

#[test]
fn relative_local_path_resolves_next_to_primary() {
    let temp = TempDir::new().unwrap();
    let path = write_doc(temp.path(), "settings.yml", "a: 1\nb: 1");
    write_doc(temp.path(), "machine.yml", "b: 2");

    let settings = Settings::builder()
        .source(path.as_path())
        .local(LocalOverride::Path(PathBuf::from("machine.yml")))
        .build()
        .unwrap();
    assert_eq!(settings.get("a").unwrap(), &1);
    assert_eq!(settings.get("b").unwrap(), &2);
}

#[test]
fn broken_local_override_is_an_error() {
    let temp = TempDir::new().unwrap();
    let path = write_doc(temp.path(), "settings.yml", "a: 1");
    write_doc(temp.path(), "settings.local.yml", "a: [1, 2");

    let err = Settings::builder()
        .source(path.as_path())
        .local(LocalOverride::Adjacent)
        .build()
        .unwrap_err();
    assert!(matches!(err, SettingsError::ParseYaml { .. }));
}

#[test]
fn explicit_overrides_apply_after_local() {
    let settings = Settings::builder()
        .source(mapping("db: {host: a, port: 1}"))
        .local(LocalOverride::Mapping(mapping("db: {host: b}")))
        .overrides(mapping("db: {host: c}"))
        .build()
        .unwrap();
    assert_eq!(settings.dig(["db", "host"]).unwrap(), &"c");
    assert_eq!(settings.dig(["db", "port"]).unwrap(), &1);

    let stages: Vec<OverrideStage> = settings.sources().iter().map(|s| s.stage).collect();
    assert_eq!(
        stages,
        vec![OverrideStage::Primary, OverrideStage::Local, OverrideStage::Explicit]
    );
}

#[test]
fn overrides_are_not_scoped() {
    let settings = Settings::builder()
        .source(mapping("dev: {foo: 1}"))
        .scope("dev")
        .overrides(mapping("dev: {foo: 9}"))
        .build()
        .unwrap();
    assert_eq!(settings.get("foo").unwrap(), &1);
    assert_eq!(settings.dig(["dev", "foo"]).unwrap(), &9);
}

#[test]
fn scalar_override_discards_subtree() {
    let settings = Settings::builder()
        .source(mapping("a: {x: 1}"))
        .overrides(mapping("a: 5"))
        .build()
        .unwrap();
    assert_eq!(settings.get("a").unwrap(), &5);
}

#[test]
fn deep_merge_preserves_siblings_across_stages() {
    let settings = Settings::builder()
        .source(mapping("a: {x: 1}"))
        .overrides(mapping("a: {y: 2}"))
        .build()
        .unwrap();
    let a = settings.get("a").unwrap().as_node().unwrap();
    assert_eq!(a.len(), 2);
    assert_eq!(a.get("x").unwrap(), &1);
    assert_eq!(a.get("y").unwrap(), &2);
}

#[test]
fn missing_source_is_fatal_only_without_defaults() {
    let temp = TempDir::new().unwrap();
    let absent = temp.path().join("settings.yml");

    let err = Settings::builder()
        .default_locations(DefaultLocations::with_paths([absent.clone()]))
        .build()
        .unwrap_err();
    match err {
        SettingsError::ConfigurationMissing { searched } => assert_eq!(searched, vec![absent]),
        other => panic!("expected ConfigurationMissing, got {other:?}"),
    }

    let settings = Settings::builder()
        .source(Source::Mapping(Mapping::new()))
        .default_locations(DefaultLocations::none())
        .build()
        .unwrap();
    assert!(settings.root().is_empty());
}

#[test]
fn default_location_is_used_when_unspecified() {
    let temp = TempDir::new().unwrap();
    let config_dir = temp.path().join("config");
    fs::create_dir_all(&config_dir).unwrap();
    let path = write_doc(&config_dir, "settings.yml", "dev: {from: default}");

    let settings = Settings::builder()
        .default_locations(DefaultLocations::with_paths([
            temp.path().join("missing.yml"),
            path.clone(),
        ]))
        .scope("dev")
        .local(LocalOverride::Adjacent)
        .build()
        .unwrap();
    assert_eq!(settings.get("from").unwrap(), &"default");
    assert_eq!(settings.primary_path(), Some(path.as_path()));
}

#[test]
fn named_document_that_does_not_exist_is_a_read_error() {
    let temp = TempDir::new().unwrap();
    let err = Settings::load(temp.path().join("absent.yml")).unwrap_err();
    assert!(matches!(err, SettingsError::ReadFile { .. }));
}

#[test]
fn attribute_access_fails_for_absent_keys() {
    let settings = Settings::from_mapping(&mapping("present: 1"));
    assert_eq!(settings.attr("present").unwrap(), &1);
    let err = settings.attr("absent").unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "unknown setting 'absent'");
}

#[test]
fn lookups_are_stable_and_shareable_across_threads() {
    let settings = Arc::new(
        Settings::builder()
            .source(mapping("a: {b: 1}"))
            .environment(EnvOverride::Named(vec!["C".into()]))
            .env_source(MapEnv::new().with("C", "x"))
            .build()
            .unwrap(),
    );
    let first = settings.get("a").cloned();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let settings = Arc::clone(&settings);
            std::thread::spawn(move || {
                (
                    settings.dig(["a", "b"]).cloned(),
                    settings.get("c").cloned(),
                )
            })
        })
        .collect();
    for handle in handles {
        let (b, c) = handle.join().unwrap();
        assert_eq!(b.unwrap(), 1);
        assert_eq!(c.unwrap(), "x");
    }

    assert_eq!(settings.get("a").cloned(), first);
}
