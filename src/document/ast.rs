use std::fmt;
use std::sync::Arc;

/// Represents a position in the source code, both fields are 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
}

/// Represents a span in the source code (start and end positions)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceSpan {
    pub start: SourcePosition,
    pub end: SourcePosition,
}

impl SourceSpan {
    pub fn new(start: (usize, usize), end: (usize, usize)) -> Self {
        Self {
            start: SourcePosition { line: start.0, column: start.1 },
            end: SourcePosition { line: end.0, column: end.1 },
        }
    }

    /// A span covering a single line, handy for hosts that only track line numbers
    pub fn line(line: usize) -> Self {
        Self::new((line, 1), (line, 1))
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start.line, self.start.column)
    }
}

/// Where a node lives: the owning document plus the span inside it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    pub uri: Arc<str>,
    pub span: SourceSpan,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.uri, self.span)
    }
}

/// What a declaration introduces. Only used for reporting, uniqueness
/// does not distinguish between kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Process,
    Channel,
    Datatype,
    Subtype,
    Nametype,
    Function,
    Constant,
    Parameter,
    Transparent,
    External,
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeclarationKind::Process => "process",
            DeclarationKind::Channel => "channel",
            DeclarationKind::Datatype => "datatype",
            DeclarationKind::Subtype => "subtype",
            DeclarationKind::Nametype => "nametype",
            DeclarationKind::Function => "function",
            DeclarationKind::Constant => "constant",
            DeclarationKind::Parameter => "parameter",
            DeclarationKind::Transparent => "transparent",
            DeclarationKind::External => "external",
        };
        f.write_str(name)
    }
}

/// Node types of the declaration tree handed over by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Named scope boundary, `module M ... exports ... endmodule`
    Module,
    /// Anonymous nested scope, e.g. the definitions of a `let ... within`
    Block,
    Declaration(DeclarationKind),
    /// Structural node that neither declares a name nor opens a scope
    Other,
}

impl NodeKind {
    /// Modules and blocks always open a scope, see [`Node::opens_scope`] for declarations
    pub fn opens_scope(&self) -> bool {
        matches!(self, NodeKind::Module | NodeKind::Block)
    }

    pub fn is_declaration(&self) -> bool {
        matches!(self, NodeKind::Declaration(_))
    }

    pub fn requires_name(&self) -> bool {
        matches!(self, NodeKind::Module | NodeKind::Declaration(_))
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Module => f.write_str("module"),
            NodeKind::Block => f.write_str("block"),
            NodeKind::Declaration(kind) => write!(f, "{} declaration", kind),
            NodeKind::Other => f.write_str("node"),
        }
    }
}

/// A single node of the declaration tree
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub name: Option<String>,
    pub span: SourceSpan,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind, name: Option<String>, span: SourceSpan) -> Self {
        Self {
            kind,
            name,
            span,
            children: Vec::new(),
        }
    }

    pub fn declaration(kind: DeclarationKind, name: &str, span: SourceSpan) -> Self {
        Self::new(NodeKind::Declaration(kind), Some(name.to_string()), span)
    }

    pub fn module(name: &str, span: SourceSpan, children: Vec<Node>) -> Self {
        Self {
            children,
            ..Self::new(NodeKind::Module, Some(name.to_string()), span)
        }
    }

    pub fn block(span: SourceSpan, children: Vec<Node>) -> Self {
        Self {
            children,
            ..Self::new(NodeKind::Block, None, span)
        }
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Whether the children of this node live in a scope of their own.
    ///
    /// A declaration with children, e.g. the parameters of `P(x) = ...`,
    /// opens a scope for them while its own name stays in the enclosing one.
    pub fn opens_scope(&self) -> bool {
        self.kind.opens_scope() || (self.kind.is_declaration() && !self.children.is_empty())
    }

    /// The name if present and not blank
    pub fn resolved_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// unique id for each scope in a document, id = 0 is always the document root.
/// Ids are the pre-order index of the scope node, so they are stable across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeId(pub(crate) usize);

impl ScopeId {
    pub const ROOT: ScopeId = ScopeId(0);

    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope#{}", self.0)
    }
}
