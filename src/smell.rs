//! Detector framework: descriptors, the detector contract, and the
//! registry.
//!
//! A detector advertises a stable (smell_class, smell_subclass) identity,
//! accepts configuration through the resolver, and exposes two queries: a
//! cheap `applies_to` filter on context kind and a fallible `examine` that
//! yields warnings. The registry is an explicit value handed to the
//! examiner; there is no process-wide detector list.

use std::collections::HashSet;

use toml::value::Table;

use crate::config::DetectorConfig;
use crate::context::{CodeContext, ContextId, ContextTree};
use crate::error::{Error, Result};
use crate::warning::SmellWarning;

/// Static metadata describing a smell detector.
#[derive(Debug)]
pub struct SmellDescriptor {
    /// Stable family identifier, e.g. `complexity`.
    pub smell_class: &'static str,
    /// Stable detector identifier, e.g. `long_parameter_list`.
    pub smell_subclass: &'static str,
    /// Human-readable description of the smell.
    pub description: &'static str,
}

/// A single smell detector that can inspect code contexts.
pub trait SmellDetector: Send + Sync {
    fn descriptor(&self) -> &'static SmellDescriptor;

    /// Ship-with-code default configuration; the lowest-precedence layer.
    fn defaults(&self) -> Table {
        Table::new()
    }

    /// Cheap filter on context kind.
    fn applies_to(&self, context: &CodeContext<'_>) -> bool;

    /// Examine one context, returning any warnings.
    fn examine(
        &self,
        context: ContextId,
        tree: &ContextTree<'_>,
        config: &DetectorConfig,
        source: &str,
    ) -> Result<Vec<SmellWarning>>;
}

/// Match a candidate string against configured patterns.
///
/// A `/…/`-delimited pattern is a regular expression; anything else matches
/// as a literal substring. Used for context names (`exclude`, `exceptions`)
/// and for the naming detectors' accept/reject lists.
pub fn matches_any(patterns: &[String], candidate: &str) -> bool {
    patterns.iter().any(|pattern| {
        if let Some(inner) = pattern
            .strip_prefix('/')
            .and_then(|p| p.strip_suffix('/'))
        {
            regex::Regex::new(inner).is_ok_and(|re| re.is_match(candidate))
        } else {
            !pattern.is_empty() && candidate.contains(pattern.as_str())
        }
    })
}

/// True when `context` is exempt from the detector's report.
pub fn is_excepted(config: &DetectorConfig, context: &CodeContext<'_>) -> bool {
    matches_any(&config.exceptions(), context.full_name())
}

/// Registry of smell detectors used by the examiner.
pub struct DetectorRegistry {
    detectors: Vec<Box<dyn SmellDetector>>,
}

impl std::fmt::Debug for DetectorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetectorRegistry")
            .field("detectors", &self.detectors.len())
            .finish()
    }
}

impl Default for DetectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            detectors: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_detector(mut self, detector: impl SmellDetector + 'static) -> Self {
        self.detectors.push(Box::new(detector));
        self
    }

    /// Detectors in registration order.
    pub fn detectors(&self) -> impl Iterator<Item = &Box<dyn SmellDetector>> {
        self.detectors.iter()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &'static SmellDescriptor> + '_ {
        self.detectors.iter().map(|d| d.descriptor())
    }

    pub fn find_descriptor(&self, smell_subclass: &str) -> Option<&'static SmellDescriptor> {
        self.descriptors()
            .find(|d| d.smell_subclass == smell_subclass)
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    /// The full shipped battery.
    #[must_use = "registry should be handed to an examiner"]
    pub fn default_detectors() -> Self {
        crate::detectors::default_detectors()
    }

    /// The shipped battery restricted by subclass name.
    ///
    /// # Errors
    ///
    /// Returns an error if any name in `only` or `skip` is unknown.
    pub fn default_detectors_filtered(only: &[String], skip: &[String]) -> Result<Self> {
        let all = Self::default_detectors();
        let known: HashSet<&str> = all.descriptors().map(|d| d.smell_subclass).collect();

        for name in only.iter().chain(skip.iter()) {
            if !known.contains(name.as_str()) {
                return Err(Error::unknown_detector(name));
            }
        }

        let only_set: Option<HashSet<&str>> = if only.is_empty() {
            None
        } else {
            Some(only.iter().map(String::as_str).collect())
        };
        let skip_set: HashSet<&str> = skip.iter().map(String::as_str).collect();

        let mut registry = Self::new();
        for detector in all.detectors {
            let name = detector.descriptor().smell_subclass;
            if let Some(ref only) = only_set
                && !only.contains(name)
            {
                continue;
            }
            if skip_set.contains(name) {
                continue;
            }
            registry.detectors.push(detector);
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_patterns_match_as_substrings() {
        let patterns = vec!["C#legacy".to_string()];
        assert!(matches_any(&patterns, "M::C#legacy"));
        assert!(matches_any(&patterns, "C#legacy"));
        assert!(!matches_any(&patterns, "C#fresh"));
    }

    #[test]
    fn slash_delimited_patterns_match_as_regexes() {
        let patterns = vec!["/#build_.*$/".to_string()];
        assert!(matches_any(&patterns, "Factory#build_widget"));
        assert!(!matches_any(&patterns, "Factory#assemble"));
    }

    #[test]
    fn empty_pattern_list_matches_nothing() {
        assert!(!matches_any(&[], "M::C#foo"));
        assert!(!matches_any(&[String::new()], "M::C#foo"));
    }

    #[test]
    fn invalid_regex_matches_nothing() {
        let patterns = vec!["/[unclosed/".to_string()];
        assert!(!matches_any(&patterns, "anything"));
    }

    #[test]
    fn filtered_registry_rejects_unknown_names() {
        let err =
            DetectorRegistry::default_detectors_filtered(&["no_such_smell".to_string()], &[])
                .unwrap_err();
        assert!(matches!(err, Error::UnknownDetector(_)));
    }

    #[test]
    fn filtered_registry_narrows_and_skips() {
        let only = DetectorRegistry::default_detectors_filtered(
            &["long_parameter_list".to_string()],
            &[],
        )
        .unwrap();
        assert_eq!(only.descriptors().count(), 1);

        let skipped = DetectorRegistry::default_detectors_filtered(
            &[],
            &["long_parameter_list".to_string()],
        )
        .unwrap();
        assert!(
            skipped
                .descriptors()
                .all(|d| d.smell_subclass != "long_parameter_list")
        );
    }
}
