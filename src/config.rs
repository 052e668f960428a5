//! Layered smell configuration.
//!
//! Configuration comes from `whiff.toml` files discovered up the directory
//! tree, merged in order of increasing precedence: detector defaults, then
//! each file from the outermost directory down, then inline directives on
//! the enclosing contexts. Resolution is a pure fold over that layer list.
//!
//! Merging rule: scalars overwrite; sequences concatenate then deduplicate
//! preserving first-seen order. Reserved keys recognized by every detector:
//! `enabled`, `exclude`, `exceptions`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use toml::Value;
use toml::value::Table;

use crate::context::{ContextId, ContextTree};
use crate::error::{Error, Result};
use crate::smell::SmellDescriptor;

/// Default file name that whiff searches for.
pub const DEFAULT_CONFIG_FILE_NAME: &str = "whiff.toml";

/// Reserved key: is the detector enabled for the context?
pub const ENABLED_KEY: &str = "enabled";
/// Reserved key: context-name patterns skipped entirely.
pub const EXCLUDE_KEY: &str = "exclude";
/// Reserved key: context-name patterns exempt from reporting.
pub const EXCEPTIONS_KEY: &str = "exceptions";

/// One configuration layer, as loaded from a `whiff.toml` file.
///
/// The file surface is a hierarchical mapping
/// `[detectors.<smell_class>.<smell_subclass>]` with detector settings
/// beneath.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct WhiffConfig {
    #[serde(default)]
    pub detectors: BTreeMap<String, BTreeMap<String, Table>>,
}

impl WhiffConfig {
    /// The settings table for one detector, if present in this layer.
    pub fn detector_table(&self, smell_class: &str, smell_subclass: &str) -> Option<&Table> {
        self.detectors.get(smell_class)?.get(smell_subclass)
    }

    /// Reject settings for detectors outside `known`.
    ///
    /// A misspelled detector name in a config file is a configuration error
    /// fatal to the run, never silently ignored.
    pub fn validate(&self, path: &Path, known: &[&'static SmellDescriptor]) -> Result<()> {
        for (class, subclasses) in &self.detectors {
            for subclass in subclasses.keys() {
                let recognized = known
                    .iter()
                    .any(|d| d.smell_class == class && d.smell_subclass == subclass);
                if !recognized {
                    return Err(Error::config(
                        path,
                        format!("unknown detector: {class}/{subclass}"),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Walk up from `start_dir` collecting every `whiff.toml`, outermost first.
pub fn find_config_files(start_dir: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut cur = Some(start_dir);
    while let Some(dir) = cur {
        let candidate = dir.join(DEFAULT_CONFIG_FILE_NAME);
        if candidate.is_file() {
            found.push(candidate);
        }
        cur = dir.parent();
    }
    found.reverse();
    found
}

/// Load and parse a configuration file from disk.
pub fn load_config_file(path: &Path) -> Result<WhiffConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| Error::config(path, format!("failed to read: {e}")))?;
    let cfg: WhiffConfig = toml::from_str(&raw)
        .map_err(|e| Error::config(path, format!("failed to parse: {e}")))?;
    Ok(cfg)
}

/// Load the layer list for sources under `start_dir`: either the explicit
/// file alone, or every file discovered up the directory tree.
pub fn load_layers(
    explicit_path: Option<&Path>,
    start_dir: &Path,
    known: &[&'static SmellDescriptor],
) -> Result<Vec<WhiffConfig>> {
    let paths = match explicit_path {
        Some(p) => vec![p.to_path_buf()],
        None => find_config_files(start_dir),
    };

    let mut layers = Vec::with_capacity(paths.len());
    for path in paths {
        let cfg = load_config_file(&path)?;
        cfg.validate(&path, known)?;
        layers.push(cfg);
    }
    Ok(layers)
}

/// Effective configuration for one (detector, context) pair.
#[derive(Debug, Clone, Default)]
pub struct DetectorConfig(Table);

impl DetectorConfig {
    pub fn from_table(table: Table) -> Self {
        DetectorConfig(table)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// `enabled`, defaulting to true.
    pub fn enabled(&self) -> bool {
        self.boolean(ENABLED_KEY, true)
    }

    /// `exclude` patterns: matching contexts are skipped entirely.
    pub fn exclude(&self) -> Vec<String> {
        self.string_list(EXCLUDE_KEY)
    }

    /// `exceptions` patterns: matching contexts are exempt from reporting.
    pub fn exceptions(&self) -> Vec<String> {
        self.string_list(EXCEPTIONS_KEY)
    }

    pub fn boolean(&self, key: &str, default: bool) -> bool {
        match self.0.get(key) {
            Some(Value::Boolean(b)) => *b,
            _ => default,
        }
    }

    pub fn integer(&self, key: &str, default: i64) -> i64 {
        match self.0.get(key) {
            Some(Value::Integer(i)) => *i,
            _ => default,
        }
    }

    pub fn string_list(&self, key: &str) -> Vec<String> {
        match self.0.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_owned))
                .collect(),
            Some(Value::String(s)) => vec![s.clone()],
            _ => Vec::new(),
        }
    }
}

/// Merge `src` into `dst`: scalars overwrite, arrays concatenate then
/// deduplicate preserving first-seen order.
pub fn merge_into(dst: &mut Table, src: &Table) {
    for (key, value) in src {
        match (dst.get_mut(key), value) {
            (Some(Value::Array(existing)), Value::Array(incoming)) => {
                for item in incoming {
                    if !existing.contains(item) {
                        existing.push(item.clone());
                    }
                }
            }
            _ => {
                dst.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Resolves effective configuration per (detector, context) pair.
///
/// Layers are shared read-only; a resolver borrows them for the duration of
/// one examination.
#[derive(Debug, Clone, Copy)]
pub struct ConfigResolver<'a> {
    layers: &'a [WhiffConfig],
}

impl<'a> ConfigResolver<'a> {
    pub fn new(layers: &'a [WhiffConfig]) -> Self {
        ConfigResolver { layers }
    }

    /// Fold defaults, file layers, and the context lineage's directives into
    /// one effective table. Directives on outer contexts apply before inner
    /// ones, so the innermost annotation wins.
    pub fn resolve(
        &self,
        descriptor: &SmellDescriptor,
        defaults: Table,
        tree: &ContextTree<'_>,
        context: ContextId,
    ) -> DetectorConfig {
        let mut table = defaults;
        for layer in self.layers {
            if let Some(overrides) =
                layer.detector_table(descriptor.smell_class, descriptor.smell_subclass)
            {
                merge_into(&mut table, overrides);
            }
        }
        for id in tree.lineage(context) {
            for directive in tree.get(id).directives() {
                if directive.detector == descriptor.smell_subclass {
                    merge_into(&mut table, &directive.overrides);
                }
            }
        }
        DetectorConfig(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(text: &str) -> Table {
        toml::from_str(text).expect("test table should parse")
    }

    #[test]
    fn scalars_overwrite() {
        let mut dst = table("max_params = 4\nenabled = true");
        merge_into(&mut dst, &table("max_params = 6"));
        assert_eq!(dst.get("max_params"), Some(&Value::Integer(6)));
        assert_eq!(dst.get("enabled"), Some(&Value::Boolean(true)));
    }

    #[test]
    fn sequences_concatenate_and_deduplicate() {
        let mut dst = table(r#"exceptions = ["a", "b"]"#);
        merge_into(&mut dst, &table(r#"exceptions = ["b", "c"]"#));
        let merged = DetectorConfig::from_table(dst);
        assert_eq!(merged.exceptions(), vec!["a", "b", "c"]);
    }

    #[test]
    fn later_layer_may_disable() {
        let mut dst = table("enabled = true");
        merge_into(&mut dst, &table("enabled = false"));
        assert!(!DetectorConfig::from_table(dst).enabled());
    }

    #[test]
    fn reserved_key_defaults() {
        let cfg = DetectorConfig::default();
        assert!(cfg.enabled());
        assert!(cfg.exclude().is_empty());
        assert!(cfg.exceptions().is_empty());
        assert_eq!(cfg.integer("max_params", 4), 4);
    }

    #[test]
    fn config_file_surface() {
        let cfg: WhiffConfig = toml::from_str(
            r#"
            [detectors.complexity.long_parameter_list]
            max_params = 6
            exclude = ["C#legacy"]
            "#,
        )
        .unwrap();
        let t = cfg
            .detector_table("complexity", "long_parameter_list")
            .unwrap();
        assert_eq!(t.get("max_params"), Some(&Value::Integer(6)));
        assert!(cfg.detector_table("complexity", "too_many_methods").is_none());
    }
}
