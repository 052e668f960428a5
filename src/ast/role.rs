//! The closed set of semantic roles a syntax node can play.
//!
//! Raw tags come from the parser collaborator; dumps spell multi-word tags
//! with dashes (`op-asgn`), which normalize to underscores before lookup.
//! Tags outside this set are a structural error, never silently ignored.

/// Semantic role of a classified syntax node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    // Namespaces and definitions
    Module,
    Class,
    SingletonClass,
    Def,
    Defs,
    ConstAsgn,

    // Argument lists and argument leaves
    Args,
    Mlhs,
    Arg,
    OptArg,
    RestArg,
    KwArg,
    KwOptArg,
    KwRestArg,
    BlockArg,
    ShadowArg,
    ProcArg0,

    // Message sends and their assignment-shaped aliases
    Send,
    CSend,
    OpAsgn,
    OrAsgn,
    AndAsgn,
    BlockPass,

    // Iteration
    Block,

    // Branching
    If,
    Case,
    When,
    And,
    Or,
    While,
    Until,
    For,

    // Statement sequencing and exception handling
    Begin,
    KwBegin,
    Rescue,
    Resbody,
    Ensure,
    Retry,
    Return,
    Break,
    Next,
    Redo,

    // Variables and assignment
    Lvar,
    Ivar,
    Cvar,
    Gvar,
    LvAsgn,
    IvAsgn,
    CvAsgn,
    GvAsgn,
    Masgn,

    // Constants, literals, and leaves
    Const,
    CBase,
    Sym,
    Str,
    DStr,
    DSym,
    Regexp,
    RegOpt,
    Int,
    Float,
    True,
    False,
    NilLit,
    SelfRef,
    Array,
    Hash,
    Pair,
    Splat,
    KwSplat,
    IRange,
    ERange,
    Defined,
    Alias,

    // Method-call sentinels
    Yield,
    Super,
    ZSuper,
}

impl NodeRole {
    /// Look a raw tag up in the closed role set.
    pub fn from_tag(tag: &str) -> Option<NodeRole> {
        let normalized = tag.replace('-', "_");
        let role = match normalized.as_str() {
            "module" => NodeRole::Module,
            "class" => NodeRole::Class,
            "sclass" => NodeRole::SingletonClass,
            "def" => NodeRole::Def,
            "defs" => NodeRole::Defs,
            "casgn" => NodeRole::ConstAsgn,
            "args" => NodeRole::Args,
            "mlhs" => NodeRole::Mlhs,
            "arg" => NodeRole::Arg,
            "optarg" => NodeRole::OptArg,
            "restarg" => NodeRole::RestArg,
            "kwarg" => NodeRole::KwArg,
            "kwoptarg" => NodeRole::KwOptArg,
            "kwrestarg" => NodeRole::KwRestArg,
            "blockarg" => NodeRole::BlockArg,
            "shadowarg" => NodeRole::ShadowArg,
            "procarg0" => NodeRole::ProcArg0,
            "send" => NodeRole::Send,
            "csend" => NodeRole::CSend,
            "op_asgn" => NodeRole::OpAsgn,
            "or_asgn" => NodeRole::OrAsgn,
            "and_asgn" => NodeRole::AndAsgn,
            "block_pass" => NodeRole::BlockPass,
            "block" => NodeRole::Block,
            "if" => NodeRole::If,
            "case" => NodeRole::Case,
            "when" => NodeRole::When,
            "and" => NodeRole::And,
            "or" => NodeRole::Or,
            "while" => NodeRole::While,
            "until" => NodeRole::Until,
            "for" => NodeRole::For,
            "begin" => NodeRole::Begin,
            "kwbegin" => NodeRole::KwBegin,
            "rescue" => NodeRole::Rescue,
            "resbody" => NodeRole::Resbody,
            "ensure" => NodeRole::Ensure,
            "retry" => NodeRole::Retry,
            "return" => NodeRole::Return,
            "break" => NodeRole::Break,
            "next" => NodeRole::Next,
            "redo" => NodeRole::Redo,
            "lvar" => NodeRole::Lvar,
            "ivar" => NodeRole::Ivar,
            "cvar" => NodeRole::Cvar,
            "gvar" => NodeRole::Gvar,
            "lvasgn" => NodeRole::LvAsgn,
            "ivasgn" => NodeRole::IvAsgn,
            "cvasgn" => NodeRole::CvAsgn,
            "gvasgn" => NodeRole::GvAsgn,
            "masgn" => NodeRole::Masgn,
            "const" => NodeRole::Const,
            "cbase" => NodeRole::CBase,
            "sym" => NodeRole::Sym,
            "str" => NodeRole::Str,
            "dstr" => NodeRole::DStr,
            "dsym" => NodeRole::DSym,
            "regexp" => NodeRole::Regexp,
            "regopt" => NodeRole::RegOpt,
            "int" => NodeRole::Int,
            "float" => NodeRole::Float,
            "true" => NodeRole::True,
            "false" => NodeRole::False,
            "nil" => NodeRole::NilLit,
            "self" => NodeRole::SelfRef,
            "array" => NodeRole::Array,
            "hash" => NodeRole::Hash,
            "pair" => NodeRole::Pair,
            "splat" => NodeRole::Splat,
            "kwsplat" => NodeRole::KwSplat,
            "irange" => NodeRole::IRange,
            "erange" => NodeRole::ERange,
            "defined?" => NodeRole::Defined,
            "alias" => NodeRole::Alias,
            "yield" => NodeRole::Yield,
            "super" => NodeRole::Super,
            "zsuper" => NodeRole::ZSuper,
            _ => return None,
        };
        Some(role)
    }

    /// True for argument leaves: the roles [`crate::ast::Node::components`]
    /// flattens to.
    pub fn is_argument(self) -> bool {
        matches!(
            self,
            NodeRole::Arg
                | NodeRole::OptArg
                | NodeRole::RestArg
                | NodeRole::KwArg
                | NodeRole::KwOptArg
                | NodeRole::KwRestArg
                | NodeRole::BlockArg
                | NodeRole::ShadowArg
        )
    }

    /// True for the send family. Op-assignment forms share the send surface;
    /// their absent accessors degrade to empty values.
    pub fn is_send_family(self) -> bool {
        matches!(
            self,
            NodeRole::Send
                | NodeRole::CSend
                | NodeRole::OpAsgn
                | NodeRole::OrAsgn
                | NodeRole::AndAsgn
        )
    }

    /// True for roles that open a fresh lexical scope: reference scans and
    /// smell searches do not descend through these.
    pub fn opens_scope(self) -> bool {
        matches!(
            self,
            NodeRole::Module
                | NodeRole::Class
                | NodeRole::SingletonClass
                | NodeRole::Def
                | NodeRole::Defs
                | NodeRole::ConstAsgn
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_core_tags() {
        assert_eq!(NodeRole::from_tag("def"), Some(NodeRole::Def));
        assert_eq!(NodeRole::from_tag("send"), Some(NodeRole::Send));
        assert_eq!(NodeRole::from_tag("ivar"), Some(NodeRole::Ivar));
        assert_eq!(NodeRole::from_tag("zsuper"), Some(NodeRole::ZSuper));
        assert_eq!(NodeRole::from_tag("defined?"), Some(NodeRole::Defined));
    }

    #[test]
    fn dashes_normalize_to_underscores() {
        assert_eq!(NodeRole::from_tag("op-asgn"), Some(NodeRole::OpAsgn));
        assert_eq!(NodeRole::from_tag("block-pass"), Some(NodeRole::BlockPass));
    }

    #[test]
    fn unknown_tags_are_rejected() {
        assert_eq!(NodeRole::from_tag("wibble"), None);
        assert_eq!(NodeRole::from_tag(""), None);
    }

    #[test]
    fn argument_family_membership() {
        assert!(NodeRole::Arg.is_argument());
        assert!(NodeRole::KwRestArg.is_argument());
        assert!(!NodeRole::Args.is_argument());
        assert!(!NodeRole::Mlhs.is_argument());
        assert!(!NodeRole::ProcArg0.is_argument());
    }

    #[test]
    fn send_family_membership() {
        assert!(NodeRole::Send.is_send_family());
        assert!(NodeRole::OpAsgn.is_send_family());
        assert!(!NodeRole::Block.is_send_family());
    }
}
