use std::sync::Arc;
use crate::document::ast::*;

pub mod ast;

/// A parsed CSPM document, the unit the validator works on.
///
/// Documents are produced by the host's parser and are treated as read only,
/// a validation pass never modifies them.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub uri: Arc<str>,
    pub root: Node,
    /// uris of the documents pulled in with `include`, in source order
    pub imports: Vec<Arc<str>>,
}

impl Document {
    pub fn new(uri: &str, root: Node) -> Self {
        Self {
            uri: Arc::from(uri),
            root,
            imports: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    pub fn location(&self, span: SourceSpan) -> Location {
        Location {
            uri: self.uri.clone(),
            span,
        }
    }
}

/// Incrementally builds a declaration tree the same way a parser would,
/// opening and closing scopes as it goes.
///
/// ```ignore
/// let doc = DocumentBuilder::new("file:///a.csp")
///     .declare(DeclarationKind::Channel, "c", SourceSpan::line(1))
///     .open_module("M", SourceSpan::line(2))
///     .declare(DeclarationKind::Process, "P", SourceSpan::line(3))
///     .close()
///     .build();
/// ```
pub struct DocumentBuilder {
    uri: String,
    imports: Vec<Arc<str>>,
    // open nodes, the first entry is always the document root
    stack: Vec<Node>,
}

impl DocumentBuilder {
    pub fn new(uri: &str) -> Self {
        Self {
            uri: uri.to_string(),
            imports: Vec::new(),
            stack: vec![Node::new(NodeKind::Other, None, SourceSpan::default())],
        }
    }

    pub fn import(mut self, uri: &str) -> Self {
        self.imports.push(Arc::from(uri));
        self
    }

    pub fn declare(self, kind: DeclarationKind, name: &str, span: SourceSpan) -> Self {
        self.node(Node::declaration(kind, name, span))
    }

    /// Appends an already built node (including its subtree) to the innermost open node
    pub fn node(mut self, node: Node) -> Self {
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(node);
        }
        self
    }

    pub fn open_module(self, name: &str, span: SourceSpan) -> Self {
        self.open(Node::new(NodeKind::Module, Some(name.to_string()), span))
    }

    pub fn open_block(self, span: SourceSpan) -> Self {
        self.open(Node::new(NodeKind::Block, None, span))
    }

    /// Opens a declaration that owns nested nodes, e.g. a process whose
    /// body contains a `let ... within` block
    pub fn open_declaration(self, kind: DeclarationKind, name: &str, span: SourceSpan) -> Self {
        self.open(Node::declaration(kind, name, span))
    }

    pub fn open(mut self, node: Node) -> Self {
        self.stack.push(node);
        self
    }

    /// Closes the innermost open node, closing the root is a no-op
    pub fn close(mut self) -> Self {
        if self.stack.len() > 1 {
            if let Some(node) = self.stack.pop() {
                self = self.node(node);
            }
        }
        self
    }

    pub fn build(mut self) -> Document {
        while self.stack.len() > 1 {
            self = self.close();
        }

        let root = self
            .stack
            .pop()
            .unwrap_or_else(|| Node::new(NodeKind::Other, None, SourceSpan::default()));

        Document {
            uri: Arc::from(self.uri.as_str()),
            root,
            imports: self.imports,
        }
    }
}
