//! Code contexts: the hierarchy detectors reason about.
//!
//! Contexts live in an arena and point at each other with integer ids, so
//! the tree has parent back-references without ownership cycles. The arena
//! is filled during a single pre-order walk of the AST; iteration order over
//! the arena is therefore tree pre-order.

mod builder;
mod refs;

pub use builder::build_context_tree;
pub use refs::count_references_to_self;

use crate::ast::Node;
use crate::reader::Directive;

/// Kind of a code context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    Root,
    Module,
    Class,
    Method,
    Block,
}

/// Method visibility, tracked from visibility-modifier sends in the
/// enclosing namespace body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    Private,
    Protected,
    ModuleFunction,
}

impl Visibility {
    pub fn is_public(self) -> bool {
        self == Visibility::Public
    }

    /// Parse a visibility-modifier method name.
    pub(crate) fn from_modifier(name: &str) -> Option<Visibility> {
        match name {
            "public" | "public_class_method" => Some(Visibility::Public),
            "private" | "private_class_method" => Some(Visibility::Private),
            "protected" => Some(Visibility::Protected),
            "module_function" => Some(Visibility::ModuleFunction),
            _ => None,
        }
    }
}

/// Index of a context in its [`ContextTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(usize);

impl ContextId {
    /// The root context's id.
    pub const ROOT: ContextId = ContextId(0);
}

/// One node of the context hierarchy.
#[derive(Debug)]
pub struct CodeContext<'ast> {
    kind: ContextKind,
    parent: Option<ContextId>,
    children: Vec<ContextId>,
    node: Option<&'ast Node>,
    name: String,
    full_name: String,
    singleton: bool,
    visibility: Visibility,
    num_refs_to_self: u32,
}

impl<'ast> CodeContext<'ast> {
    fn root() -> Self {
        CodeContext {
            kind: ContextKind::Root,
            parent: None,
            children: Vec::new(),
            node: None,
            name: String::new(),
            full_name: String::new(),
            singleton: false,
            visibility: Visibility::Public,
            num_refs_to_self: 0,
        }
    }

    pub(crate) fn new(
        kind: ContextKind,
        node: &'ast Node,
        name: String,
        full_name: String,
    ) -> Self {
        CodeContext {
            kind,
            parent: None,
            children: Vec::new(),
            node: Some(node),
            name,
            full_name,
            singleton: false,
            visibility: Visibility::Public,
            num_refs_to_self: 0,
        }
    }

    pub(crate) fn with_singleton(mut self, singleton: bool) -> Self {
        self.singleton = singleton;
        self
    }

    pub(crate) fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub(crate) fn with_refs(mut self, num_refs_to_self: u32) -> Self {
        self.num_refs_to_self = num_refs_to_self;
        self
    }

    pub fn kind(&self) -> ContextKind {
        self.kind
    }

    pub fn parent(&self) -> Option<ContextId> {
        self.parent
    }

    pub fn children(&self) -> &[ContextId] {
        &self.children
    }

    /// The defining AST node; `None` only for Root.
    pub fn node(&self) -> Option<&'ast Node> {
        self.node
    }

    /// Unqualified name. Empty for Root and Block contexts.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Qualified name computed from the chain up to Root. Block contexts
    /// are transparent: they report the enclosing context's name.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// True for methods defined on an object rather than its class.
    pub fn is_singleton(&self) -> bool {
        self.singleton
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub(crate) fn set_visibility(&mut self, visibility: Visibility) {
        self.visibility = visibility;
    }

    /// References to the implicit receiver counted by the reference
    /// collector. Fixed at zero for singleton methods.
    pub fn num_refs_to_self(&self) -> u32 {
        self.num_refs_to_self
    }

    /// True when the context's body touches instance state.
    pub fn depends_on_instance(&self) -> bool {
        self.num_refs_to_self > 0
    }

    /// Directives attached to the defining node.
    pub fn directives(&self) -> &'ast [Directive] {
        self.node.map(Node::directives).unwrap_or(&[])
    }

    /// Source line of the defining node, if any.
    pub fn line(&self) -> Option<u32> {
        self.node.map(Node::line)
    }
}

/// Arena of contexts for one analysis. Exactly one Root exists per tree.
#[derive(Debug)]
pub struct ContextTree<'ast> {
    contexts: Vec<CodeContext<'ast>>,
}

impl<'ast> ContextTree<'ast> {
    pub(crate) fn new() -> Self {
        ContextTree {
            contexts: vec![CodeContext::root()],
        }
    }

    pub fn root(&self) -> ContextId {
        ContextId::ROOT
    }

    pub fn get(&self, id: ContextId) -> &CodeContext<'ast> {
        &self.contexts[id.0]
    }

    pub(crate) fn get_mut(&mut self, id: ContextId) -> &mut CodeContext<'ast> {
        &mut self.contexts[id.0]
    }

    pub(crate) fn push(
        &mut self,
        parent: ContextId,
        mut context: CodeContext<'ast>,
    ) -> ContextId {
        let id = ContextId(self.contexts.len());
        context.parent = Some(parent);
        self.contexts.push(context);
        self.contexts[parent.0].children.push(id);
        id
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// All contexts in tree pre-order, Root first.
    pub fn contexts(&self) -> impl Iterator<Item = (ContextId, &CodeContext<'ast>)> {
        self.contexts
            .iter()
            .enumerate()
            .map(|(i, c)| (ContextId(i), c))
    }

    /// Chain from Root down to `id`, inclusive.
    pub fn lineage(&self, id: ContextId) -> Vec<ContextId> {
        let mut chain = vec![id];
        let mut cur = id;
        while let Some(parent) = self.get(cur).parent() {
            chain.push(parent);
            cur = parent;
        }
        chain.reverse();
        chain
    }

    /// Ids of every context strictly below `id`, in pre-order.
    pub fn descendants(&self, id: ContextId) -> Vec<ContextId> {
        let mut out = Vec::new();
        self.collect_descendants(id, &mut out);
        out
    }

    fn collect_descendants(&self, id: ContextId, out: &mut Vec<ContextId>) {
        for &child in self.get(id).children() {
            out.push(child);
            self.collect_descendants(child, out);
        }
    }

    /// The nearest enclosing Method context, if any, starting from `id`'s
    /// parent.
    pub fn enclosing_method(&self, id: ContextId) -> Option<ContextId> {
        let mut cur = self.get(id).parent();
        while let Some(c) = cur {
            if self.get(c).kind() == ContextKind::Method {
                return Some(c);
            }
            cur = self.get(c).parent();
        }
        None
    }
}
