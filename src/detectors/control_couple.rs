use toml::Value;

use crate::ast::NodeRole;
use crate::config::DetectorConfig;
use crate::context::{CodeContext, ContextId, ContextKind, ContextTree};
use crate::error::Result;
use crate::smell::{SmellDescriptor, SmellDetector};
use crate::warning::SmellWarning;

pub struct BooleanParameterDetector;

static BOOLEAN_PARAMETER: SmellDescriptor = SmellDescriptor {
    smell_class: "control_couple",
    smell_subclass: "boolean_parameter",
    description: "A parameter defaulting to a boolean invites control coupling",
};

impl SmellDetector for BooleanParameterDetector {
    fn descriptor(&self) -> &'static SmellDescriptor {
        &BOOLEAN_PARAMETER
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

        let mut warnings = Vec::new();
        for param in node.parameters() {
            let boolean_default = param
                .default_value()
                .is_some_and(|d| matches!(d.role(), NodeRole::True | NodeRole::False));
            if !boolean_default {
                continue;
            }
            warnings.push(
                SmellWarning::new(
                    &BOOLEAN_PARAMETER,
                    source,
                    ctx.full_name(),
                    vec![param.line()],
                    format!("has boolean parameter '{}'", param.arg_name()),
                )
                .with_parameter(
                    "parameter",
                    Value::String(param.arg_name().to_string()),
                ),
            );
        }
        Ok(warnings)
    }
}
