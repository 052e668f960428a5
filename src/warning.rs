//! The warning model.
//!
//! A [`SmellWarning`] is an immutable record with value equality: two
//! warnings are equal iff all fields are equal. Error conditions local to
//! one analyzed file are reported as pseudo-warnings under the `errors`
//! smell class so batch analyses never abort on one malformed file.

use std::collections::BTreeMap;

use serde::Serialize;
use toml::Value;

use crate::smell::SmellDescriptor;

/// One detected smell, or a pseudo-warning for a file-local error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmellWarning {
    /// Identifier of the examined source.
    pub source: String,
    /// Stable family identifier.
    pub smell_class: String,
    /// Stable detector identifier.
    pub smell_subclass: String,
    /// Full name of the offending context.
    pub context: String,
    /// Human-readable finding.
    pub message: String,
    /// Source lines the finding refers to.
    pub lines: Vec<u32>,
    /// Detector-specific details, string → scalar.
    pub parameters: BTreeMap<String, Value>,
}

impl SmellWarning {
    pub fn new(
        descriptor: &SmellDescriptor,
        source: impl Into<String>,
        context: impl Into<String>,
        lines: Vec<u32>,
        message: impl Into<String>,
    ) -> Self {
        SmellWarning {
            source: source.into(),
            smell_class: descriptor.smell_class.to_string(),
            smell_subclass: descriptor.smell_subclass.to_string(),
            context: context.into(),
            message: message.into(),
            lines,
            parameters: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: Value) -> Self {
        self.parameters.insert(key.into(), value);
        self
    }
}

/// Pseudo-warning identity for unreadable source dumps.
pub static SYNTAX_ERROR: SmellDescriptor = SmellDescriptor {
    smell_class: "errors",
    smell_subclass: "syntax_error",
    description: "The source dump could not be read",
};

/// Pseudo-warning identity for tags outside the closed role set.
pub static UNKNOWN_NODE_ROLE: SmellDescriptor = SmellDescriptor {
    smell_class: "errors",
    smell_subclass: "unknown_node_role",
    description: "A syntax node carried an unrecognized tag",
};

/// Pseudo-warning identity for malformed inline directives.
pub static BAD_DIRECTIVE: SmellDescriptor = SmellDescriptor {
    smell_class: "errors",
    smell_subclass: "bad_directive",
    description: "An inline directive could not be understood",
};

/// Pseudo-warning identity for detectors that raised during examination.
pub static DETECTOR_ERROR: SmellDescriptor = SmellDescriptor {
    smell_class: "errors",
    smell_subclass: "detector_error",
    description: "A detector failed while examining a context",
};
