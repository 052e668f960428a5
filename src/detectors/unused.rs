use std::collections::HashSet;

use toml::Value;

use crate::ast::NodeRole;
use crate::config::DetectorConfig;
use crate::context::{CodeContext, ContextId, ContextKind, ContextTree};
use crate::error::Result;
use crate::smell::{SmellDescriptor, SmellDetector};
use crate::warning::SmellWarning;

/// Scopes a parameter cannot escape into: nested definitions do not close
/// over the enclosing method's locals. Iteration blocks do, so the scan
/// descends through them.
const SCOPE_OPENERS: &[NodeRole] = &[
    NodeRole::Module,
    NodeRole::Class,
    NodeRole::SingletonClass,
    NodeRole::Def,
    NodeRole::Defs,
    NodeRole::ConstAsgn,
];

pub struct UnusedParametersDetector;

static UNUSED_PARAMETERS: SmellDescriptor = SmellDescriptor {
    smell_class: "unused_code",
    smell_subclass: "unused_parameters",
    description: "A method accepts a parameter it never reads",
};

impl SmellDetector for UnusedParametersDetector {
    fn descriptor(&self) -> &'static SmellDescriptor {
        &UNUSED_PARAMETERS
    }

    fn applies_to(&self, context: &CodeContext<'_>) -> bool {
        context.kind() == ContextKind::Method
    }

    fn examine(
        &self,
        context: ContextId,
        tree: &ContextTree<'_>,
        _config: &DetectorConfig,
        source: &str,
    ) -> Result<Vec<SmellWarning>> {
        let ctx = tree.get(context);
        let Some(node) = ctx.node() else {
            return Ok(Vec::new());
        };

        let mut uses: HashSet<&str> = HashSet::new();
        let mut forwards_all = false;
        if let Some(body) = node.body() {
            // A bare `super` forwards every parameter implicitly.
            body.each_node(&[NodeRole::ZSuper], SCOPE_OPENERS, &mut |_| {
                forwards_all = true;
            });
            body.each_node(&[NodeRole::Lvar], SCOPE_OPENERS, &mut |n| {
                uses.insert(n.variable_name());
            });
        }
        if forwards_all {
            return Ok(Vec::new());
        }

        let mut warnings = Vec::new();
        for param in node.parameters() {
            let name = param.arg_name();
            if name.is_empty() || param.is_marked_unused() || uses.contains(name) {
                continue;
            }
            warnings.push(
                SmellWarning::new(
                    &UNUSED_PARAMETERS,
                    source,
                    ctx.full_name(),
                    vec![param.line()],
                    format!("has unused parameter '{name}'"),
                )
                .with_parameter("parameter", Value::String(name.to_string())),
            );
        }
        Ok(warnings)
    }
}
