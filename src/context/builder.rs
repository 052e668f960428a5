//! Context builder: a depth-first pre-order walk of the classified AST that
//! maintains a stack of open contexts.
//!
//! Nesting in the tree corresponds exactly to lexical nesting in the source;
//! contexts are never reparented after creation. Singleton-class openers do
//! not form contexts of their own: methods defined inside them become
//! singleton methods of the enclosing context.

use std::collections::HashMap;

use crate::ast::{Node, NodeRole};
use crate::context::refs::count_references_to_self;
use crate::context::{CodeContext, ContextId, ContextKind, ContextTree, Visibility};

/// Build the context tree for one analysis.
pub fn build_context_tree(root: &Node) -> ContextTree<'_> {
    let mut builder = Builder {
        tree: ContextTree::new(),
        default_visibility: HashMap::new(),
    };
    builder.walk(root, ContextId::ROOT, false);
    builder.tree
}

struct Builder<'ast> {
    tree: ContextTree<'ast>,
    /// Per-namespace default applied to subsequently defined methods.
    default_visibility: HashMap<ContextId, Visibility>,
}

impl<'ast> Builder<'ast> {
    fn walk(&mut self, node: &'ast Node, parent: ContextId, in_singleton: bool) {
        match node.role() {
            NodeRole::Module => {
                let id = self.push_namespace(ContextKind::Module, node, parent);
                if let Some(body) = node.namespace_body() {
                    self.walk(body, id, false);
                }
            }
            NodeRole::Class => {
                let id = self.push_namespace(ContextKind::Class, node, parent);
                if let Some(body) = node.namespace_body() {
                    self.walk(body, id, false);
                }
            }
            NodeRole::SingletonClass => {
                if let Some(body) = node.body() {
                    self.walk(body, parent, true);
                }
            }
            NodeRole::ConstAsgn if node.defines_module() => {
                let id = self.push_namespace(ContextKind::Module, node, parent);
                if let Some(value) = node.value()
                    && value.role() == NodeRole::Block
                    && let Some(body) = value.block_body()
                {
                    self.walk(body, id, false);
                }
            }
            NodeRole::Def => {
                self.push_method(node, parent, in_singleton);
            }
            NodeRole::Defs => {
                self.push_method(node, parent, true);
            }
            NodeRole::Block => {
                let enclosing = self.tree.get(parent).full_name().to_string();
                let context =
                    CodeContext::new(ContextKind::Block, node, String::new(), enclosing);
                let id = self.tree.push(parent, context);
                self.walk_children(node, id, in_singleton);
            }
            role if role.is_send_family() && node.is_visibility_modifier() => {
                self.apply_visibility(node, parent, in_singleton);
            }
            _ => self.walk_children(node, parent, in_singleton),
        }
    }

    fn walk_children(&mut self, node: &'ast Node, parent: ContextId, in_singleton: bool) {
        for child in node.children() {
            if let crate::ast::Child::Node(n) = child {
                self.walk(n, parent, in_singleton);
            }
        }
    }

    fn push_namespace(
        &mut self,
        kind: ContextKind,
        node: &'ast Node,
        parent: ContextId,
    ) -> ContextId {
        let outer = self.tree.get(parent).full_name();
        let full_name = node.module_full_name(outer);
        let context = CodeContext::new(kind, node, node.module_name(), full_name);
        self.tree.push(parent, context)
    }

    fn push_method(&mut self, node: &'ast Node, parent: ContextId, singleton: bool) -> ContextId {
        let outer = self.tree.get(parent).full_name();
        let full_name = node.method_full_name(outer);

        // Singleton methods never depend on instance state: `self` inside
        // them is the class object, not an instance.
        let refs = if singleton {
            0
        } else {
            node.body().map(count_references_to_self).unwrap_or(0)
        };

        let parent_kind = self.tree.get(parent).kind();
        let visibility = if matches!(parent_kind, ContextKind::Module | ContextKind::Class) {
            self.default_visibility
                .get(&parent)
                .copied()
                .unwrap_or_default()
        } else {
            Visibility::Public
        };

        let context =
            CodeContext::new(ContextKind::Method, node, node.def_name().to_string(), full_name)
                .with_singleton(singleton)
                .with_visibility(visibility)
                .with_refs(refs);
        let id = self.tree.push(parent, context);
        if let Some(body) = node.body() {
            self.walk(body, id, false);
        }
        id
    }

    /// Apply a visibility-modifier send. A bare modifier switches the
    /// default for methods defined after it; symbol arguments retroactively
    /// set the named methods; definition arguments (`private def foo`) are
    /// walked and adjusted in place.
    fn apply_visibility(&mut self, node: &'ast Node, parent: ContextId, in_singleton: bool) {
        let visibility = Visibility::from_modifier(node.method_name());
        let in_namespace = matches!(
            self.tree.get(parent).kind(),
            ContextKind::Module | ContextKind::Class
        );
        let args = node.send_args();

        if args.is_empty() {
            if let Some(v) = visibility
                && in_namespace
            {
                self.default_visibility.insert(parent, v);
            }
            return;
        }

        for arg in args {
            match arg.role() {
                NodeRole::Sym if in_namespace => {
                    let Some(v) = visibility else { continue };
                    let target = arg.variable_name().to_string();
                    let children: Vec<ContextId> = self.tree.get(parent).children().to_vec();
                    for child in children {
                        let ctx = self.tree.get(child);
                        if ctx.kind() == ContextKind::Method && ctx.name() == target {
                            self.tree.get_mut(child).set_visibility(v);
                        }
                    }
                }
                NodeRole::Def => {
                    let id = self.push_method(arg, parent, in_singleton);
                    if let Some(v) = visibility
                        && in_namespace
                    {
                        self.tree.get_mut(id).set_visibility(v);
                    }
                }
                NodeRole::Defs => {
                    let id = self.push_method(arg, parent, true);
                    if let Some(v) = visibility
                        && in_namespace
                    {
                        self.tree.get_mut(id).set_visibility(v);
                    }
                }
                _ => self.walk(arg, parent, in_singleton),
            }
        }
    }
}
