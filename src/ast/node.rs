//! Classified syntax nodes and their role-specific accessors.
//!
//! A [`Node`] is the raw tree with every tag resolved to a [`NodeRole`].
//! Each role defines named semantic accessors over the children; the same
//! child index can mean different things under different roles, so all
//! accessors check the role and degrade to empty values rather than panic.

use crate::ast::role::NodeRole;
use crate::error::{Error, Result};
use crate::reader::{self, Directive, RawChild, RawNode};

/// Built-in constructor receivers whose `new` defines a module-like value,
/// e.g. `Widget = Struct.new(:a)`.
const MODULE_CREATORS: &[&str] = &["Class", "Struct", "Module"];

/// Method names that change visibility rather than perform work.
const VISIBILITY_MODIFIERS: &[&str] = &[
    "public",
    "private",
    "protected",
    "module_function",
    "private_class_method",
    "public_class_method",
];

/// Attribute macros that define writer methods outright.
const ATTRIBUTE_WRITERS: &[&str] = &["attr_writer", "attr_accessor"];

/// A syntax node classified by semantic role.
#[derive(Debug, Clone)]
pub struct Node {
    role: NodeRole,
    children: Vec<Child>,
    line: u32,
    directives: Vec<Directive>,
}

/// A child position of a classified node.
#[derive(Debug, Clone)]
pub enum Child {
    Node(Node),
    Sym(String),
    Int(i64),
    Float(f64),
    Str(String),
    None,
}

impl Child {
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Child::Node(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_sym(&self) -> Option<&str> {
        match self {
            Child::Sym(s) => Some(s),
            _ => None,
        }
    }
}

impl Node {
    /// Classify a raw tree in a single pass.
    ///
    /// Fails with [`Error::UnknownNodeRole`] on any tag outside the closed
    /// role set; this is fatal to the analysis of the offending file but not
    /// to the run.
    pub fn classify(raw: RawNode) -> Result<Node> {
        let role = NodeRole::from_tag(&raw.tag)
            .ok_or_else(|| Error::unknown_role(raw.tag.clone(), raw.line))?;
        let children = raw
            .children
            .into_iter()
            .map(|child| {
                Ok(match child {
                    RawChild::Node(n) => Child::Node(Node::classify(n)?),
                    RawChild::Sym(s) => Child::Sym(s),
                    RawChild::Int(i) => Child::Int(i),
                    RawChild::Float(f) => Child::Float(f),
                    RawChild::Str(s) => Child::Str(s),
                    RawChild::Nil => Child::None,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Node {
            role,
            children,
            line: raw.line,
            directives: raw.directives,
        })
    }

    /// Read and classify one serialized document.
    ///
    /// Returns `Ok(None)` for an empty document.
    pub fn read(text: &str) -> Result<Option<Node>> {
        match reader::read_document(text)? {
            Some(raw) => Ok(Some(Node::classify(raw)?)),
            None => Ok(None),
        }
    }

    pub fn role(&self) -> NodeRole {
        self.role
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn children(&self) -> &[Child] {
        &self.children
    }

    /// Directives attached to this node from preceding comment lines.
    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    fn child_node(&self, index: usize) -> Option<&Node> {
        self.children.get(index).and_then(Child::as_node)
    }

    fn child_sym(&self, index: usize) -> Option<&str> {
        self.children.get(index).and_then(Child::as_sym)
    }

    /// Visit this node and its descendants, calling `f` on every node whose
    /// role is in `wanted`. Children with roles in `stop_inside` are not
    /// descended into; they begin scopes of their own.
    pub fn each_node<'a>(
        &'a self,
        wanted: &[NodeRole],
        stop_inside: &[NodeRole],
        f: &mut impl FnMut(&'a Node),
    ) {
        if wanted.contains(&self.role) {
            f(self);
        }
        for child in &self.children {
            if let Child::Node(n) = child {
                if stop_inside.contains(&n.role) {
                    continue;
                }
                n.each_node(wanted, stop_inside, f);
            }
        }
    }

    // ------------------------------------------------------------------
    // Argument leaves
    // ------------------------------------------------------------------

    /// The argument's name; empty for an anonymous splat.
    pub fn arg_name(&self) -> &str {
        if self.role.is_argument() {
            self.child_sym(0).unwrap_or("")
        } else {
            ""
        }
    }

    /// Names beginning with `_` mark an argument as intentionally unused.
    pub fn is_marked_unused(&self) -> bool {
        self.arg_name().starts_with('_')
    }

    /// True for arguments carrying a default value.
    pub fn is_optional(&self) -> bool {
        matches!(self.role, NodeRole::OptArg | NodeRole::KwOptArg)
    }

    /// True for explicit block arguments (`&blk`).
    pub fn is_block(&self) -> bool {
        self.role == NodeRole::BlockArg
    }

    /// True for a rest/kwrest argument without a name (`def f(*)`).
    pub fn is_anonymous_splat(&self) -> bool {
        matches!(self.role, NodeRole::RestArg | NodeRole::KwRestArg)
            && self.child_sym(0).is_none()
    }

    /// Default value of an optional argument.
    pub fn default_value(&self) -> Option<&Node> {
        if self.is_optional() {
            self.child_node(1)
        } else {
            None
        }
    }

    // ------------------------------------------------------------------
    // Argument lists
    // ------------------------------------------------------------------

    /// Flatten an argument list into its argument leaves, through any depth
    /// of destructuring. Yields only argument-leaf roles.
    pub fn components(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        self.collect_components(&mut out);
        out
    }

    fn collect_components<'a>(&'a self, out: &mut Vec<&'a Node>) {
        for child in &self.children {
            let Child::Node(n) = child else { continue };
            if n.role.is_argument() {
                out.push(n);
            } else if matches!(n.role, NodeRole::Mlhs | NodeRole::ProcArg0) {
                n.collect_components(out);
            }
        }
    }

    // ------------------------------------------------------------------
    // Send family (plus Yield / Super sentinels)
    // ------------------------------------------------------------------

    /// Explicit receiver of a send, if any.
    pub fn receiver(&self) -> Option<&Node> {
        match self.role {
            r if r.is_send_family() => self.child_node(0),
            NodeRole::Defs => self.child_node(0),
            _ => None,
        }
    }

    /// The message name. `super` and `yield` report their sentinel names;
    /// absent names (op-assignment shapes) degrade to the empty string.
    pub fn method_name(&self) -> &str {
        match self.role {
            r if r.is_send_family() => self.child_sym(1).unwrap_or(""),
            NodeRole::Super | NodeRole::ZSuper => "super",
            NodeRole::Yield => "yield",
            _ => "",
        }
    }

    /// Argument nodes of a send, yield, or super.
    pub fn send_args(&self) -> Vec<&Node> {
        let skip = match self.role {
            r if r.is_send_family() => 2,
            NodeRole::Super | NodeRole::Yield => 0,
            _ => return Vec::new(),
        };
        self.children
            .iter()
            .skip(skip)
            .filter_map(Child::as_node)
            .collect()
    }

    /// Names of nameable arguments (variables and symbols).
    pub fn arg_names(&self) -> Vec<&str> {
        self.send_args()
            .into_iter()
            .filter_map(Node::name_like)
            .collect()
    }

    fn name_like(&self) -> Option<&str> {
        match self.role {
            NodeRole::Lvar
            | NodeRole::Ivar
            | NodeRole::Cvar
            | NodeRole::Gvar
            | NodeRole::Sym
            | NodeRole::LvAsgn
            | NodeRole::IvAsgn
            | NodeRole::CvAsgn
            | NodeRole::GvAsgn => self.child_sym(0),
            NodeRole::Const => self.child_sym(1),
            _ => None,
        }
    }

    /// True when the message is the object-construction sentinel `new`.
    pub fn is_object_creation_call(&self) -> bool {
        self.role.is_send_family() && self.method_name() == "new"
    }

    /// True for object creation whose receiver is one of the built-in
    /// class/struct constructors, e.g. `Struct.new(:a)`.
    pub fn is_module_creation_call(&self) -> bool {
        self.is_object_creation_call()
            && self.receiver().is_some_and(|recv| {
                recv.role == NodeRole::Const
                    && MODULE_CREATORS.contains(&recv.const_simple_name())
            })
    }

    /// True for receiverless sends that only change method visibility.
    pub fn is_visibility_modifier(&self) -> bool {
        self.role.is_send_family()
            && self.receiver().is_none()
            && VISIBILITY_MODIFIERS.contains(&self.method_name())
    }

    /// True for attribute macros that define writer methods, including the
    /// legacy `attr :foo, true` form (the literal `true` flags it writable).
    pub fn is_attribute_writer(&self) -> bool {
        if !self.role.is_send_family() || self.receiver().is_some() {
            return false;
        }
        let name = self.method_name();
        if ATTRIBUTE_WRITERS.contains(&name) {
            return true;
        }
        name == "attr"
            && self
                .send_args()
                .last()
                .is_some_and(|last| last.role == NodeRole::True)
    }

    // ------------------------------------------------------------------
    // Method definitions
    // ------------------------------------------------------------------

    /// Bare name of a method definition.
    pub fn def_name(&self) -> &str {
        match self.role {
            NodeRole::Def => self.child_sym(0).unwrap_or(""),
            NodeRole::Defs => self.child_sym(1).unwrap_or(""),
            _ => "",
        }
    }

    fn def_args_node(&self) -> Option<&Node> {
        match self.role {
            NodeRole::Def => self.child_node(1),
            NodeRole::Defs => self.child_node(2),
            _ => None,
        }
    }

    /// Parameters of a method definition: the flattened argument leaves with
    /// block arguments filtered out.
    pub fn parameters(&self) -> Vec<&Node> {
        self.def_args_node()
            .map(|args| {
                args.components()
                    .into_iter()
                    .filter(|p| !p.is_block())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Parameter names in declaration order.
    pub fn parameter_names(&self) -> Vec<&str> {
        self.parameters().into_iter().map(Node::arg_name).collect()
    }

    /// Body of a method definition or singleton-class opener, if non-empty.
    pub fn body(&self) -> Option<&Node> {
        match self.role {
            NodeRole::Def => self.child_node(2),
            NodeRole::Defs => self.child_node(3),
            NodeRole::SingletonClass => self.child_node(1),
            _ => None,
        }
    }

    /// Qualified method name: `outer#name` for instance methods,
    /// `outer#receiver.name` for singleton definitions.
    pub fn method_full_name(&self, outer: &str) -> String {
        let name = self.def_name();
        match self.role {
            NodeRole::Def => {
                if outer.is_empty() {
                    name.to_string()
                } else {
                    format!("{outer}#{name}")
                }
            }
            NodeRole::Defs => {
                let receiver = self
                    .receiver()
                    .map(Node::receiver_name)
                    .unwrap_or_default();
                if outer.is_empty() {
                    format!("{receiver}.{name}")
                } else {
                    format!("{outer}#{receiver}.{name}")
                }
            }
            _ => name.to_string(),
        }
    }

    fn receiver_name(&self) -> String {
        match self.role {
            NodeRole::SelfRef => "self".to_string(),
            NodeRole::Const => self.const_simple_name().to_string(),
            NodeRole::Lvar | NodeRole::Ivar | NodeRole::Gvar => {
                self.child_sym(0).unwrap_or("").to_string()
            }
            _ => String::new(),
        }
    }

    // ------------------------------------------------------------------
    // Namespaces
    // ------------------------------------------------------------------

    /// Declared name of a module, class, or module-defining constant
    /// assignment. Scoped declarations render with `::`.
    pub fn module_name(&self) -> String {
        match self.role {
            NodeRole::Module | NodeRole::Class => self
                .child_node(0)
                .map(Node::const_full_name)
                .unwrap_or_default(),
            NodeRole::ConstAsgn => self.child_sym(1).unwrap_or("").to_string(),
            _ => String::new(),
        }
    }

    /// Last segment of the declared name.
    pub fn simple_name(&self) -> String {
        let name = self.module_name();
        match name.rfind("::") {
            Some(idx) => name[idx + 2..].to_string(),
            None => name,
        }
    }

    /// Qualified namespace name: `outer::name`.
    pub fn module_full_name(&self, outer: &str) -> String {
        let name = self.module_name();
        if outer.is_empty() {
            name
        } else {
            format!("{outer}::{name}")
        }
    }

    /// Superclass expression of a class declaration.
    pub fn superclass(&self) -> Option<&Node> {
        if self.role == NodeRole::Class {
            self.child_node(1)
        } else {
            None
        }
    }

    /// Body node of a namespace declaration, if non-empty.
    pub fn namespace_body(&self) -> Option<&Node> {
        match self.role {
            NodeRole::Module => self.child_node(1),
            NodeRole::Class => self.child_node(2),
            _ => None,
        }
    }

    /// Assigned value of a constant assignment.
    pub fn value(&self) -> Option<&Node> {
        if self.role == NodeRole::ConstAsgn {
            self.child_node(2)
        } else {
            None
        }
    }

    /// True when a constant assignment defines a module-like value, directly
    /// (`C = Class.new`) or through a block (`C = Class.new { ... }`).
    pub fn defines_module(&self) -> bool {
        if self.role != NodeRole::ConstAsgn {
            return false;
        }
        match self.value() {
            Some(v) if v.role.is_send_family() => v.is_module_creation_call(),
            Some(v) if v.role == NodeRole::Block => {
                v.call().is_some_and(Node::is_module_creation_call)
            }
            _ => false,
        }
    }

    // ------------------------------------------------------------------
    // Constants
    // ------------------------------------------------------------------

    /// Last segment of a constant reference.
    pub fn const_simple_name(&self) -> &str {
        if self.role == NodeRole::Const {
            self.child_sym(1).unwrap_or("")
        } else {
            ""
        }
    }

    /// Scope chain of a constant reference joined with `::`.
    pub fn const_full_name(&self) -> String {
        if self.role != NodeRole::Const {
            return String::new();
        }
        let name = self.const_simple_name();
        match self.child_node(0) {
            Some(scope) if scope.role == NodeRole::Const => {
                format!("{}::{name}", scope.const_full_name())
            }
            _ => name.to_string(),
        }
    }

    // ------------------------------------------------------------------
    // Branching
    // ------------------------------------------------------------------

    /// Condition of a branching node.
    pub fn condition(&self) -> Option<&Node> {
        match self.role {
            NodeRole::If
            | NodeRole::Case
            | NodeRole::And
            | NodeRole::Or
            | NodeRole::While
            | NodeRole::Until => self.child_node(0),
            _ => None,
        }
    }

    /// Branch bodies of a branching node: every child node after the
    /// condition position.
    pub fn branch_nodes(&self) -> Vec<&Node> {
        match self.role {
            NodeRole::If
            | NodeRole::Case
            | NodeRole::And
            | NodeRole::Or
            | NodeRole::While
            | NodeRole::Until => self
                .children
                .iter()
                .skip(1)
                .filter_map(Child::as_node)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Condition list of a `when` clause: every child but the body.
    pub fn when_condition_list(&self) -> Vec<&Node> {
        if self.role != NodeRole::When || self.children.is_empty() {
            return Vec::new();
        }
        self.children[..self.children.len() - 1]
            .iter()
            .filter_map(Child::as_node)
            .collect()
    }

    /// Body of a `when` clause, if non-empty.
    pub fn when_body(&self) -> Option<&Node> {
        if self.role != NodeRole::When {
            return None;
        }
        self.children.last().and_then(Child::as_node)
    }

    // ------------------------------------------------------------------
    // Iteration blocks
    // ------------------------------------------------------------------

    /// The send a block is attached to.
    pub fn call(&self) -> Option<&Node> {
        if self.role == NodeRole::Block {
            self.child_node(0)
        } else {
            None
        }
    }

    /// Argument list of a block.
    pub fn block_args(&self) -> Option<&Node> {
        if self.role == NodeRole::Block {
            self.child_node(1)
        } else {
            None
        }
    }

    /// Body of a block, if non-empty.
    pub fn block_body(&self) -> Option<&Node> {
        if self.role == NodeRole::Block {
            self.child_node(2)
        } else {
            None
        }
    }

    /// Names of a block's parameters, flattened through destructuring.
    pub fn block_parameter_names(&self) -> Vec<&str> {
        self.block_args()
            .map(|args| args.components().into_iter().map(Node::arg_name).collect())
            .unwrap_or_default()
    }

    /// True for blocks declared without parameters.
    pub fn without_block_arguments(&self) -> bool {
        self.block_args().is_none_or(|args| args.components().is_empty())
    }

    // ------------------------------------------------------------------
    // Variables
    // ------------------------------------------------------------------

    /// Name of a variable read, write, or symbol literal, with its sigil
    /// (`@x`, `@@x`, `$x`).
    pub fn variable_name(&self) -> &str {
        match self.role {
            NodeRole::Lvar
            | NodeRole::Ivar
            | NodeRole::Cvar
            | NodeRole::Gvar
            | NodeRole::Sym
            | NodeRole::LvAsgn
            | NodeRole::IvAsgn
            | NodeRole::CvAsgn
            | NodeRole::GvAsgn => self.child_sym(0).unwrap_or(""),
            _ => "",
        }
    }
}
