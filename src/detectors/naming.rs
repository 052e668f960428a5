use toml::Value;
use toml::value::Table;

use crate::config::DetectorConfig;
use crate::context::{CodeContext, ContextId, ContextKind, ContextTree};
use crate::error::Result;
use crate::smell::{SmellDescriptor, SmellDetector, matches_any};
use crate::warning::SmellWarning;

const REJECT_KEY: &str = "reject";
const ACCEPT_KEY: &str = "accept";

/// Method names rejected by default: single letters, trailing digits,
/// camelCase humps.
const DEFAULT_METHOD_REJECT: &[&str] = &["/^[a-z]$/", "/[0-9]$/", "/[A-Z]/"];

/// Parameter names rejected by default: any single character, trailing
/// digits, camelCase humps.
const DEFAULT_PARAMETER_REJECT: &[&str] = &["/^.$/", "/[0-9]$/", "/[A-Z]/"];

fn pattern_defaults(reject: &[&str]) -> Table {
    let mut table = Table::new();
    table.insert(
        REJECT_KEY.to_string(),
        Value::Array(reject.iter().map(|s| Value::String((*s).to_string())).collect()),
    );
    table.insert(ACCEPT_KEY.to_string(), Value::Array(Vec::new()));
    table
}

fn name_is_rejected(config: &DetectorConfig, name: &str) -> bool {
    matches_any(&config.string_list(REJECT_KEY), name)
        && !matches_any(&config.string_list(ACCEPT_KEY), name)
}

pub struct UncommunicativeMethodNameDetector;

static UNCOMMUNICATIVE_METHOD_NAME: SmellDescriptor = SmellDescriptor {
    smell_class: "naming",
    smell_subclass: "uncommunicative_method_name",
    description: "A method name that doesn't communicate its intent",
};

impl SmellDetector for UncommunicativeMethodNameDetector {
    fn descriptor(&self) -> &'static SmellDescriptor {
        &UNCOMMUNICATIVE_METHOD_NAME
    }

    fn defaults(&self) -> Table {
        pattern_defaults(DEFAULT_METHOD_REJECT)
    }

    fn applies_to(&self, context: &CodeContext<'_>) -> bool {
        context.kind() == ContextKind::Method
    }

    fn examine(
        &self,
        context: ContextId,
        tree: &ContextTree<'_>,
        config: &DetectorConfig,
        source: &str,
    ) -> Result<Vec<SmellWarning>> {
        let ctx = tree.get(context);
        let name = ctx.name();
        if name.is_empty() || !name_is_rejected(config, name) {
            return Ok(Vec::new());
        }

        let lines = ctx.line().map(|l| vec![l]).unwrap_or_default();
        Ok(vec![
            SmellWarning::new(
                &UNCOMMUNICATIVE_METHOD_NAME,
                source,
                ctx.full_name(),
                lines,
                format!("has the name '{name}'"),
            )
            .with_parameter("name", Value::String(name.to_string())),
        ])
    }
}

pub struct UncommunicativeParameterNameDetector;

static UNCOMMUNICATIVE_PARAMETER_NAME: SmellDescriptor = SmellDescriptor {
    smell_class: "naming",
    smell_subclass: "uncommunicative_parameter_name",
    description: "A parameter name that doesn't communicate its intent",
};

impl SmellDetector for UncommunicativeParameterNameDetector {
    fn descriptor(&self) -> &'static SmellDescriptor {
        &UNCOMMUNICATIVE_PARAMETER_NAME
    }

    fn defaults(&self) -> Table {
        pattern_defaults(DEFAULT_PARAMETER_REJECT)
    }

    fn applies_to(&self, context: &CodeContext<'_>) -> bool {
        context.kind() == ContextKind::Method
    }

    fn examine(
        &self,
        context: ContextId,
        tree: &ContextTree<'_>,
        config: &DetectorConfig,
        source: &str,
    ) -> Result<Vec<SmellWarning>> {
        let ctx = tree.get(context);
        let Some(node) = ctx.node() else {
            return Ok(Vec::new());
        };

        let mut warnings = Vec::new();
        for param in node.parameters() {
            let name = param.arg_name();
            // Leading underscores mark a parameter as deliberately unused.
            if name.is_empty() || param.is_marked_unused() {
                continue;
            }
            if !name_is_rejected(config, name) {
                continue;
            }
            warnings.push(
                SmellWarning::new(
                    &UNCOMMUNICATIVE_PARAMETER_NAME,
                    source,
                    ctx.full_name(),
                    vec![param.line()],
                    format!("has the parameter name '{name}'"),
                )
                .with_parameter("name", Value::String(name.to_string())),
            );
        }
        Ok(warnings)
    }
}
