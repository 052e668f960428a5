use toml::Value;
use toml::value::Table;

use crate::config::DetectorConfig;
use crate::context::{CodeContext, ContextId, ContextKind, ContextTree};
use crate::error::Result;
use crate::smell::{SmellDescriptor, SmellDetector};
use crate::warning::SmellWarning;

pub struct UtilityFunctionDetector;

static UTILITY_FUNCTION: SmellDescriptor = SmellDescriptor {
    smell_class: "low_cohesion",
    smell_subclass: "utility_function",
    description: "An instance method that never touches instance state",
};

impl SmellDetector for UtilityFunctionDetector {
    fn descriptor(&self) -> &'static SmellDescriptor {
        &UTILITY_FUNCTION
    }

    fn defaults(&self) -> Table {
        let mut table = Table::new();
        table.insert(
            "public_methods_only".to_string(),
            Value::Boolean(false),
        );
        table
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

        // Singleton methods have no instance to depend on.
        if ctx.is_singleton() {
            return Ok(Vec::new());
        }
        let Some(node) = ctx.node() else {
            return Ok(Vec::new());
        };
        if node.body().is_none() {
            return Ok(Vec::new());
        }
        if config.boolean("public_methods_only", false) && !ctx.visibility().is_public() {
            return Ok(Vec::new());
        }
        if ctx.depends_on_instance() {
            return Ok(Vec::new());
        }

        Ok(vec![SmellWarning::new(
            &UTILITY_FUNCTION,
            source,
            ctx.full_name(),
            vec![node.line()],
            "doesn't depend on instance state",
        )])
    }
}
