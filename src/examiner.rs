//! The examiner: top-level façade over the analysis pipeline.
//!
//! Reads one source, classifies it, builds the context tree, dispatches the
//! detector battery, and collects warnings. All file-local error conditions
//! are converted to pseudo-warnings here so callers always receive a warning
//! list; only configuration and I/O failures surface as errors, and those
//! are raised by the configuration loader before an examiner exists.

use std::collections::HashSet;

use tracing::debug;

use crate::ast::{Child, Node};
use crate::config::{ConfigResolver, WhiffConfig};
use crate::context::build_context_tree;
use crate::error::Error;
use crate::smell::{DetectorRegistry, is_excepted, matches_any};
use crate::warning::{
    BAD_DIRECTIVE, DETECTOR_ERROR, SYNTAX_ERROR, SmellWarning, UNKNOWN_NODE_ROLE,
};

/// Which detectors run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExamineStrategy {
    /// Run only detectors enabled by the resolved configuration.
    #[default]
    ActiveSmellsOnly,
    /// Run every registered detector regardless of `enabled`; `exceptions`
    /// are still honoured.
    ShowAll,
}

/// Result of examining one source: an ordered warning sequence.
#[derive(Debug)]
pub struct Examiner {
    description: String,
    smells: Vec<SmellWarning>,
}

impl Examiner {
    /// Examine a serialized source dump.
    pub fn from_source(
        source_name: &str,
        text: &str,
        layers: &[WhiffConfig],
        registry: &DetectorRegistry,
        strategy: ExamineStrategy,
    ) -> Examiner {
        match Node::read(text) {
            Ok(Some(ast)) => Self::from_ast(source_name, &ast, layers, registry, strategy),
            Ok(None) => Examiner {
                description: source_name.to_string(),
                smells: Vec::new(),
            },
            Err(err) => Examiner {
                description: source_name.to_string(),
                smells: vec![pseudo_warning(source_name, &err)],
            },
        }
    }

    /// Examine a pre-built AST.
    pub fn from_ast(
        source_name: &str,
        ast: &Node,
        layers: &[WhiffConfig],
        registry: &DetectorRegistry,
        strategy: ExamineStrategy,
    ) -> Examiner {
        if let Some(warning) = reject_unknown_directives(source_name, ast, registry) {
            return Examiner {
                description: source_name.to_string(),
                smells: vec![warning],
            };
        }

        let tree = build_context_tree(ast);
        debug!(
            source = source_name,
            contexts = tree.len(),
            "context tree built"
        );

        let resolver = ConfigResolver::new(layers);
        let mut smells = Vec::new();

        for (id, context) in tree.contexts() {
            for detector in registry.detectors() {
                let descriptor = detector.descriptor();
                let config = resolver.resolve(descriptor, detector.defaults(), &tree, id);

                if strategy == ExamineStrategy::ActiveSmellsOnly && !config.enabled() {
                    continue;
                }
                if matches_any(&config.exclude(), context.full_name()) {
                    continue;
                }
                if !detector.applies_to(context) {
                    continue;
                }

                match detector.examine(id, &tree, &config, source_name) {
                    Ok(warnings) => {
                        if !is_excepted(&config, context) {
                            smells.extend(warnings);
                        }
                    }
                    Err(err) => {
                        let lines = context.line().map(|l| vec![l]).unwrap_or_default();
                        smells.push(
                            SmellWarning::new(
                                &DETECTOR_ERROR,
                                source_name,
                                context.full_name(),
                                lines,
                                format!(
                                    "detector `{}` failed: {err}",
                                    descriptor.smell_subclass
                                ),
                            )
                            .with_parameter(
                                "detector",
                                toml::Value::String(descriptor.smell_subclass.to_string()),
                            ),
                        );
                    }
                }
            }
        }

        debug!(source = source_name, warnings = smells.len(), "examined");
        Examiner {
            description: source_name.to_string(),
            smells,
        }
    }

    /// Name of the examined source.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The ordered warning sequence.
    pub fn smells(&self) -> &[SmellWarning] {
        &self.smells
    }

    /// True when any warning was collected.
    pub fn smelly(&self) -> bool {
        !self.smells.is_empty()
    }

    pub fn into_smells(self) -> Vec<SmellWarning> {
        self.smells
    }
}

/// Convert a file-local error into its pseudo-warning.
fn pseudo_warning(source_name: &str, err: &Error) -> SmellWarning {
    match err {
        Error::Syntax { line, message } => SmellWarning::new(
            &SYNTAX_ERROR,
            source_name,
            "",
            vec![*line],
            message.clone(),
        ),
        Error::UnknownNodeRole { tag, line } => SmellWarning::new(
            &UNKNOWN_NODE_ROLE,
            source_name,
            "",
            vec![*line],
            format!("unknown node role `{tag}`"),
        )
        .with_parameter("tag", toml::Value::String(tag.clone())),
        Error::Directive { line, message } => SmellWarning::new(
            &BAD_DIRECTIVE,
            source_name,
            "",
            vec![*line],
            message.clone(),
        ),
        other => SmellWarning::new(
            &SYNTAX_ERROR,
            source_name,
            "",
            Vec::new(),
            other.to_string(),
        ),
    }
}

/// A directive naming a detector outside the registry aborts the file.
fn reject_unknown_directives(
    source_name: &str,
    ast: &Node,
    registry: &DetectorRegistry,
) -> Option<SmellWarning> {
    let known: HashSet<&str> = registry.descriptors().map(|d| d.smell_subclass).collect();
    let (detector, line) = find_unknown_directive(ast, &known)?;
    Some(
        SmellWarning::new(
            &BAD_DIRECTIVE,
            source_name,
            "",
            vec![line],
            format!("directive names unknown detector `{detector}`"),
        )
        .with_parameter("detector", toml::Value::String(detector)),
    )
}

fn find_unknown_directive(node: &Node, known: &HashSet<&str>) -> Option<(String, u32)> {
    for directive in node.directives() {
        if !known.contains(directive.detector.as_str()) {
            return Some((directive.detector.clone(), directive.line));
        }
    }
    for child in node.children() {
        if let Child::Node(n) = child
            && let Some(found) = find_unknown_directive(n, known)
        {
            return Some(found);
        }
    }
    None
}
