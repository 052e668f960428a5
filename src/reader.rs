//! Reader for serialized parser output.
//!
//! The parser collaborator dumps source trees as s-expressions of tagged
//! nodes, e.g. `(def :foo (args (arg :x)) (ivasgn :@x (int 1)))`. This
//! module deserializes one such document into a [`RawNode`] tree. It is an
//! input codec, not a source-language parser.
//!
//! Comment lines starting with `# :whiff:` are *directives*: they attach
//! detector configuration overrides to the next node in the document:
//!
//! - `# :whiff:long_parameter_list` disables the detector for that context
//! - `# :whiff:long_parameter_list { max_params = 6 }` overrides parameters

use crate::error::{Error, Result};

/// One raw node of the serialized tree: a tag plus ordered children.
///
/// Tags are passed through untouched; classification into roles happens in
/// [`crate::ast`].
#[derive(Debug, Clone)]
pub struct RawNode {
    /// The primitive tag, e.g. `def`, `send`, `ivar`.
    pub tag: String,
    /// Ordered children: nested nodes or atoms.
    pub children: Vec<RawChild>,
    /// 1-based line of the node's opening parenthesis.
    pub line: u32,
    /// Directives from the comment lines immediately preceding this node.
    pub directives: Vec<Directive>,
}

/// A child position in a raw node.
#[derive(Debug, Clone)]
pub enum RawChild {
    /// A nested node.
    Node(RawNode),
    /// A symbol atom, stored without the leading `:`.
    Sym(String),
    /// An integer atom.
    Int(i64),
    /// A float atom.
    Float(f64),
    /// A string atom.
    Str(String),
    /// The `nil` atom.
    Nil,
}

/// A detector configuration override attached to a node.
#[derive(Debug, Clone)]
pub struct Directive {
    /// The smell subclass the directive addresses.
    pub detector: String,
    /// Overrides to merge into the detector's configuration. A bare
    /// directive carries `enabled = false`.
    pub overrides: toml::value::Table,
    /// 1-based line of the directive comment.
    pub line: u32,
}

const DIRECTIVE_PREFIX: &str = ":whiff:";

/// Read one document into a raw tree.
///
/// Returns `Ok(None)` for a document containing only whitespace and
/// comments. Trailing material after the single top-level node is a syntax
/// error.
pub fn read_document(text: &str) -> Result<Option<RawNode>> {
    let mut reader = Reader::new(text);
    reader.skip_trivia()?;
    if reader.at_end() {
        return Ok(None);
    }

    let node = reader.read_node()?;
    reader.skip_trivia()?;
    if !reader.at_end() {
        return Err(Error::syntax(
            reader.line,
            "trailing material after top-level node",
        ));
    }
    Ok(Some(node))
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
    line: u32,
    pending_directives: Vec<Directive>,
}

impl<'a> Reader<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: 0,
            line: 1,
            pending_directives: Vec::new(),
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
        }
        Some(b)
    }

    /// Skip whitespace and comments, collecting pending directives.
    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            match self.peek() {
                Some(b) if b.is_ascii_whitespace() => {
                    self.bump();
                }
                Some(b'#') => {
                    let comment_line = self.line;
                    let start = self.pos + 1;
                    while let Some(b) = self.peek() {
                        if b == b'\n' {
                            break;
                        }
                        self.bump();
                    }
                    let text = std::str::from_utf8(&self.bytes[start..self.pos])
                        .map_err(|_| Error::syntax(comment_line, "comment is not valid UTF-8"))?
                        .trim();
                    if let Some(rest) = text.strip_prefix(DIRECTIVE_PREFIX) {
                        let directive = parse_directive(rest, comment_line)?;
                        self.pending_directives.push(directive);
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn read_node(&mut self) -> Result<RawNode> {
        if self.peek() != Some(b'(') {
            return Err(Error::syntax(self.line, "expected `(`"));
        }
        let line = self.line;
        self.bump();
        let directives = std::mem::take(&mut self.pending_directives);

        self.skip_trivia()?;
        let tag = self.read_word()?;
        if tag.is_empty() {
            return Err(Error::syntax(line, "node is missing a tag"));
        }

        let mut children = Vec::new();
        loop {
            self.skip_trivia()?;
            match self.peek() {
                None => return Err(Error::syntax(line, "unterminated node")),
                Some(b')') => {
                    self.bump();
                    break;
                }
                Some(b'(') => children.push(RawChild::Node(self.read_node()?)),
                Some(b':') => {
                    self.bump();
                    let sym = self.read_symbol_body();
                    if sym.is_empty() {
                        return Err(Error::syntax(self.line, "empty symbol"));
                    }
                    children.push(RawChild::Sym(sym));
                }
                Some(b'"') => children.push(RawChild::Str(self.read_string()?)),
                Some(b) if b == b'-' || b.is_ascii_digit() => {
                    children.push(self.read_number()?);
                }
                Some(_) => {
                    let word_line = self.line;
                    let word = self.read_word()?;
                    if word == "nil" {
                        children.push(RawChild::Nil);
                    } else {
                        return Err(Error::syntax(
                            word_line,
                            format!("unexpected atom `{word}`"),
                        ));
                    }
                }
            }
        }

        Ok(RawNode {
            tag,
            children,
            line,
            directives,
        })
    }

    /// A bare word: tag or `nil`. Tags may contain dashes (`op-asgn`) and a
    /// trailing `?` (`defined?`).
    fn read_word(&mut self) -> Result<String> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b'?' {
                self.bump();
            } else {
                break;
            }
        }
        std::str::from_utf8(&self.bytes[start..self.pos])
            .map(str::to_owned)
            .map_err(|_| Error::syntax(self.line, "word is not valid UTF-8"))
    }

    /// Symbol bodies are permissive: method names include operators
    /// (`:==`, `:[]=`, `:<=>`) and sigils (`:@ivar`, `:@@cvar`, `:$gvar`).
    fn read_symbol_body(&mut self) -> String {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() || b == b'(' || b == b')' || b == b'"' || b == b'#' {
                break;
            }
            self.bump();
        }
        String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned()
    }

    fn read_string(&mut self) -> Result<String> {
        let line = self.line;
        self.bump(); // opening quote
        let mut out: Vec<u8> = Vec::new();
        loop {
            match self.bump() {
                None => return Err(Error::syntax(line, "unterminated string")),
                Some(b'"') => return Ok(String::from_utf8_lossy(&out).into_owned()),
                Some(b'\\') => match self.bump() {
                    None => return Err(Error::syntax(line, "unterminated escape")),
                    Some(b'n') => out.push(b'\n'),
                    Some(b't') => out.push(b'\t'),
                    Some(b'r') => out.push(b'\r'),
                    Some(b) => out.push(b),
                },
                Some(b) => out.push(b),
            }
        }
    }

    fn read_number(&mut self) -> Result<RawChild> {
        let line = self.line;
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.bump();
        }
        let mut is_float = false;
        while let Some(b) = self.peek() {
            if b.is_ascii_digit() {
                self.bump();
            } else if b == b'.' && !is_float {
                // A dot must be followed by a digit to be a fraction.
                if self
                    .bytes
                    .get(self.pos + 1)
                    .is_some_and(u8::is_ascii_digit)
                {
                    is_float = true;
                    self.bump();
                } else {
                    break;
                }
            } else {
                break;
            }
        }
        let text = std::str::from_utf8(&self.bytes[start..self.pos])
            .map_err(|_| Error::syntax(line, "number is not valid UTF-8"))?;
        if is_float {
            text.parse::<f64>()
                .map(RawChild::Float)
                .map_err(|_| Error::syntax(line, format!("invalid float `{text}`")))
        } else {
            text.parse::<i64>()
                .map(RawChild::Int)
                .map_err(|_| Error::syntax(line, format!("invalid integer `{text}`")))
        }
    }
}

/// Parse the body of a directive comment, after the `:whiff:` prefix.
fn parse_directive(rest: &str, line: u32) -> Result<Directive> {
    let rest = rest.trim();
    let (name, tail) = match rest.find(|c: char| c.is_ascii_whitespace() || c == '{') {
        Some(idx) => (&rest[..idx], rest[idx..].trim_start()),
        None => (rest, ""),
    };

    if name.is_empty()
        || !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(Error::directive(
            line,
            format!("invalid detector name `{name}`"),
        ));
    }

    let overrides = if tail.is_empty() {
        let mut table = toml::value::Table::new();
        table.insert("enabled".to_string(), toml::Value::Boolean(false));
        table
    } else {
        if !(tail.starts_with('{') && tail.ends_with('}')) {
            return Err(Error::directive(
                line,
                "directive parameters must be a `{ key = value }` table",
            ));
        }
        let doc = format!("overrides = {tail}");
        let parsed: toml::value::Table = toml::from_str(&doc)
            .map_err(|e| Error::directive(line, format!("invalid parameter table: {e}")))?;
        match parsed.get("overrides") {
            Some(toml::Value::Table(t)) => t.clone(),
            _ => {
                return Err(Error::directive(
                    line,
                    "directive parameters must be a `{ key = value }` table",
                ));
            }
        }
    };

    Ok(Directive {
        detector: name.to_string(),
        overrides,
        line,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(text: &str) -> RawNode {
        read_document(text)
            .expect("document should read")
            .expect("document should not be empty")
    }

    #[test]
    fn reads_nested_nodes_and_atoms() {
        let node = read(r#"(send (const nil :Widget) :new (sym :a) (int 42) (str "hi"))"#);
        assert_eq!(node.tag, "send");
        assert_eq!(node.children.len(), 5);
        assert!(matches!(&node.children[0], RawChild::Node(n) if n.tag == "const"));
        assert!(matches!(&node.children[1], RawChild::Sym(s) if s == "new"));
        assert!(matches!(node.children[3], RawChild::Int(42)));
    }

    #[test]
    fn tracks_lines() {
        let node = read("(module\n  (const nil :M)\n  (def :foo (args) nil))");
        assert_eq!(node.line, 1);
        let RawChild::Node(def) = &node.children[1] else {
            panic!("expected def child");
        };
        assert_eq!(def.tag, "def");
        assert_eq!(def.line, 3);
    }

    #[test]
    fn empty_document_reads_as_none() {
        assert!(read_document("").unwrap().is_none());
        assert!(read_document("  # just a comment\n").unwrap().is_none());
    }

    #[test]
    fn rejects_trailing_material() {
        let err = read_document("(int 1) (int 2)").unwrap_err();
        assert!(matches!(err, Error::Syntax { .. }));
    }

    #[test]
    fn rejects_unterminated_node() {
        let err = read_document("(send nil :foo").unwrap_err();
        assert!(matches!(err, Error::Syntax { .. }));
    }

    #[test]
    fn symbols_carry_sigils_and_operators() {
        let node = read("(send nil :== (ivar :@x))");
        assert!(matches!(&node.children[1], RawChild::Sym(s) if s == "=="));
        let RawChild::Node(ivar) = &node.children[2] else {
            panic!("expected ivar child");
        };
        assert!(matches!(&ivar.children[0], RawChild::Sym(s) if s == "@x"));
    }

    #[test]
    fn bare_directive_disables() {
        let node = read("# :whiff:long_parameter_list\n(def :foo (args) nil)");
        assert_eq!(node.directives.len(), 1);
        let d = &node.directives[0];
        assert_eq!(d.detector, "long_parameter_list");
        assert_eq!(d.overrides.get("enabled"), Some(&toml::Value::Boolean(false)));
        assert_eq!(d.line, 1);
    }

    #[test]
    fn directive_with_parameter_table() {
        let node = read("# :whiff:long_parameter_list { max_params = 6 }\n(def :foo (args) nil)");
        let d = &node.directives[0];
        assert_eq!(
            d.overrides.get("max_params"),
            Some(&toml::Value::Integer(6))
        );
    }

    #[test]
    fn directives_attach_to_next_node_only() {
        let node = read("(begin\n# :whiff:utility_function\n(def :a (args) nil)\n(def :b (args) nil))");
        let RawChild::Node(a) = &node.children[0] else {
            panic!("expected def");
        };
        let RawChild::Node(b) = &node.children[1] else {
            panic!("expected def");
        };
        assert_eq!(a.directives.len(), 1);
        assert!(b.directives.is_empty());
    }

    #[test]
    fn malformed_directive_is_an_error() {
        let err = read_document("# :whiff:bad-Name\n(int 1)").unwrap_err();
        assert!(matches!(err, Error::Directive { .. }));

        let err = read_document("# :whiff:ok { max_params = }\n(int 1)").unwrap_err();
        assert!(matches!(err, Error::Directive { .. }));
    }

    #[test]
    fn plain_comments_are_ignored() {
        let node = read("# ordinary comment\n(int 1)");
        assert!(node.directives.is_empty());
    }
}
