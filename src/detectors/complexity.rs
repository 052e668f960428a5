use toml::Value;
use toml::value::Table;

use crate::config::DetectorConfig;
use crate::context::{CodeContext, ContextId, ContextKind, ContextTree};
use crate::error::Result;
use crate::smell::{SmellDescriptor, SmellDetector};
use crate::warning::SmellWarning;

const DEFAULT_MAX_PARAMS: i64 = 3;
const DEFAULT_MAX_METHODS: i64 = 15;
const DEFAULT_MAX_NESTING: i64 = 1;
const DEFAULT_IGNORED_ITERATORS: &[&str] = &["tap"];

pub struct LongParameterListDetector;

static LONG_PARAMETER_LIST: SmellDescriptor = SmellDescriptor {
    smell_class: "complexity",
    smell_subclass: "long_parameter_list",
    description: "A method takes more parameters than a reader can track",
};

impl SmellDetector for LongParameterListDetector {
    fn descriptor(&self) -> &'static SmellDescriptor {
        &LONG_PARAMETER_LIST
    }

    fn defaults(&self) -> Table {
        let mut table = Table::new();
        table.insert("max_params".to_string(), Value::Integer(DEFAULT_MAX_PARAMS));
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
        let Some(node) = ctx.node() else {
            return Ok(Vec::new());
        };

        let max = config.integer("max_params", DEFAULT_MAX_PARAMS);
        let count = node.parameters().len() as i64;
        if count <= max {
            return Ok(Vec::new());
        }

        Ok(vec![
            SmellWarning::new(
                &LONG_PARAMETER_LIST,
                source,
                ctx.full_name(),
                vec![node.line()],
                format!("has {count} parameters"),
            )
            .with_parameter("count", Value::Integer(count)),
        ])
    }
}

pub struct TooManyMethodsDetector;

static TOO_MANY_METHODS: SmellDescriptor = SmellDescriptor {
    smell_class: "complexity",
    smell_subclass: "too_many_methods",
    description: "A class defines more instance methods than it can cohere",
};

impl SmellDetector for TooManyMethodsDetector {
    fn descriptor(&self) -> &'static SmellDescriptor {
        &TOO_MANY_METHODS
    }

    fn defaults(&self) -> Table {
        let mut table = Table::new();
        table.insert(
            "max_methods".to_string(),
            Value::Integer(DEFAULT_MAX_METHODS),
        );
        table
    }

    fn applies_to(&self, context: &CodeContext<'_>) -> bool {
        context.kind() == ContextKind::Class
    }

    fn examine(
        &self,
        context: ContextId,
        tree: &ContextTree<'_>,
        config: &DetectorConfig,
        source: &str,
    ) -> Result<Vec<SmellWarning>> {
        let ctx = tree.get(context);
        let max = config.integer("max_methods", DEFAULT_MAX_METHODS);

        let count = ctx
            .children()
            .iter()
            .filter(|&&child| {
                let c = tree.get(child);
                c.kind() == ContextKind::Method && !c.is_singleton()
            })
            .count() as i64;
        if count <= max {
            return Ok(Vec::new());
        }

        let lines = ctx.line().map(|l| vec![l]).unwrap_or_default();
        Ok(vec![
            SmellWarning::new(
                &TOO_MANY_METHODS,
                source,
                ctx.full_name(),
                lines,
                format!("has {count} methods"),
            )
            .with_parameter("count", Value::Integer(count)),
        ])
    }
}

pub struct NestedIteratorsDetector;

static NESTED_ITERATORS: SmellDescriptor = SmellDescriptor {
    smell_class: "complexity",
    smell_subclass: "nested_iterators",
    description: "A method nests iteration blocks inside iteration blocks",
};

impl SmellDetector for NestedIteratorsDetector {
    fn descriptor(&self) -> &'static SmellDescriptor {
        &NESTED_ITERATORS
    }

    fn defaults(&self) -> Table {
        let mut table = Table::new();
        table.insert(
            "max_allowed_nesting".to_string(),
            Value::Integer(DEFAULT_MAX_NESTING),
        );
        table.insert(
            "ignored_iterators".to_string(),
            Value::Array(
                DEFAULT_IGNORED_ITERATORS
                    .iter()
                    .map(|s| Value::String((*s).to_string()))
                    .collect(),
            ),
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
        let max = config.integer("max_allowed_nesting", DEFAULT_MAX_NESTING);
        let ignored = config.string_list("ignored_iterators");

        let mut deepest: i64 = 0;
        let mut deepest_line: Option<u32> = None;

        for descendant in tree.descendants(context) {
            let block = tree.get(descendant);
            if block.kind() != ContextKind::Block {
                continue;
            }
            // Blocks inside nested method definitions belong to that method.
            if tree.enclosing_method(descendant) != Some(context) {
                continue;
            }

            let mut depth: i64 = 0;
            let mut cursor = Some(descendant);
            while let Some(id) = cursor {
                if id == context {
                    break;
                }
                let c = tree.get(id);
                if c.kind() == ContextKind::Block && !iterator_is_ignored(c, &ignored) {
                    depth += 1;
                }
                cursor = c.parent();
            }

            if depth > deepest {
                deepest = depth;
                deepest_line = block.line();
            }
        }

        if deepest <= max {
            return Ok(Vec::new());
        }

        let ctx = tree.get(context);
        Ok(vec![
            SmellWarning::new(
                &NESTED_ITERATORS,
                source,
                ctx.full_name(),
                deepest_line.map(|l| vec![l]).unwrap_or_default(),
                format!("contains iterators nested {deepest} deep"),
            )
            .with_parameter("depth", Value::Integer(deepest)),
        ])
    }
}

fn iterator_is_ignored(block: &CodeContext<'_>, ignored: &[String]) -> bool {
    block
        .node()
        .and_then(crate::ast::Node::call)
        .is_some_and(|call| ignored.iter().any(|name| name == call.method_name()))
}
