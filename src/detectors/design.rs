use std::collections::BTreeMap;

use toml::Value;

use crate::ast::{Node, NodeRole};
use crate::config::DetectorConfig;
use crate::context::{CodeContext, ContextId, ContextKind, ContextTree};
use crate::error::Result;
use crate::smell::{SmellDescriptor, SmellDetector};
use crate::warning::SmellWarning;

pub struct ClassVariableDetector;

static CLASS_VARIABLE: SmellDescriptor = SmellDescriptor {
    smell_class: "design",
    smell_subclass: "class_variable",
    description: "Class variables leak state across the whole inheritance tree",
};

impl SmellDetector for ClassVariableDetector {
    fn descriptor(&self) -> &'static SmellDescriptor {
        &CLASS_VARIABLE
    }

    fn applies_to(&self, context: &CodeContext<'_>) -> bool {
        matches!(context.kind(), ContextKind::Module | ContextKind::Class)
    }

    fn examine(
        &self,
        context: ContextId,
        tree: &ContextTree<'_>,
        _config: &DetectorConfig,
        source: &str,
    ) -> Result<Vec<SmellWarning>> {
        let ctx = tree.get(context);
        let Some(body) = ctx.node().and_then(namespace_body_of) else {
            return Ok(Vec::new());
        };

        // Occurrences inside nested namespaces belong to those contexts;
        // occurrences inside this namespace's methods belong here.
        let mut occurrences: BTreeMap<String, Vec<u32>> = BTreeMap::new();
        body.each_node(
            &[NodeRole::Cvar, NodeRole::CvAsgn],
            &[NodeRole::Module, NodeRole::Class, NodeRole::ConstAsgn],
            &mut |node| {
                occurrences
                    .entry(node.variable_name().to_string())
                    .or_default()
                    .push(node.line());
            },
        );

        Ok(occurrences
            .into_iter()
            .map(|(name, lines)| {
                SmellWarning::new(
                    &CLASS_VARIABLE,
                    source,
                    ctx.full_name(),
                    lines,
                    format!("declares the class variable '{name}'"),
                )
                .with_parameter("variable", Value::String(name))
            })
            .collect())
    }
}

/// Body of a namespace declaration, whichever shape declared it.
fn namespace_body_of(node: &Node) -> Option<&Node> {
    match node.role() {
        NodeRole::Module | NodeRole::Class => node.namespace_body(),
        NodeRole::ConstAsgn => node.value().and_then(Node::block_body),
        _ => None,
    }
}

pub struct ModuleInitializeDetector;

static MODULE_INITIALIZE: SmellDescriptor = SmellDescriptor {
    smell_class: "design",
    smell_subclass: "module_initialize",
    description: "A mixin module should not define initialize",
};

impl SmellDetector for ModuleInitializeDetector {
    fn descriptor(&self) -> &'static SmellDescriptor {
        &MODULE_INITIALIZE
    }

    fn applies_to(&self, context: &CodeContext<'_>) -> bool {
        context.kind() == ContextKind::Module
    }

    fn examine(
        &self,
        context: ContextId,
        tree: &ContextTree<'_>,
        _config: &DetectorConfig,
        source: &str,
    ) -> Result<Vec<SmellWarning>> {
        let ctx = tree.get(context);
        let initialize = ctx.children().iter().find(|&&child| {
            let c = tree.get(child);
            c.kind() == ContextKind::Method && !c.is_singleton() && c.name() == "initialize"
        });
        let Some(&initialize) = initialize else {
            return Ok(Vec::new());
        };

        let lines = tree.get(initialize).line().map(|l| vec![l]).unwrap_or_default();
        Ok(vec![SmellWarning::new(
            &MODULE_INITIALIZE,
            source,
            ctx.full_name(),
            lines,
            "has initialize method",
        )])
    }
}
