//! Reference collector: counts syntactic references that imply dependence
//! on instance state.
//!
//! Counted: explicit `self`, instance-variable reads and writes, sends with
//! no explicit receiver, and `super` in both forms. Visibility modifiers and
//! attribute-writer macros are not counted; they configure the enclosing
//! namespace rather than touch the instance. The scan stops at nested
//! definitions, which open scopes of their own.

use crate::ast::{Node, NodeRole};

const COUNTED: &[NodeRole] = &[
    NodeRole::SelfRef,
    NodeRole::Ivar,
    NodeRole::IvAsgn,
    NodeRole::Send,
    NodeRole::CSend,
    NodeRole::Super,
    NodeRole::ZSuper,
];

const SCOPE_OPENERS: &[NodeRole] = &[
    NodeRole::Module,
    NodeRole::Class,
    NodeRole::SingletonClass,
    NodeRole::Def,
    NodeRole::Defs,
    NodeRole::ConstAsgn,
];

/// Count references to the implicit receiver within a method body.
pub fn count_references_to_self(body: &Node) -> u32 {
    let mut count = 0u32;
    body.each_node(COUNTED, SCOPE_OPENERS, &mut |node| {
        let counts = match node.role() {
            NodeRole::Send | NodeRole::CSend => {
                node.receiver().is_none()
                    && !node.is_visibility_modifier()
                    && !node.is_attribute_writer()
            }
            _ => true,
        };
        if counts {
            count += 1;
        }
    });
    count
}
