use std::collections::{BTreeMap, HashMap};
use crate::analysis::context::ScopeContext;
use crate::document::Document;
use crate::document::ast::{DeclarationKind, Location, Node, NodeKind, ScopeId, SourceSpan};
use crate::{Result, ValidationError};

/// A named entity found in a document.
///
/// Declarations are rebuilt on every walk and never outlive a validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclarationKind,
    pub location: Location,
    /// the scope the declaration belongs to, not owned
    pub scope: ScopeId,
    /// pre-order index of the declaring node, the total order tie-break
    pub order: usize,
}

impl Declaration {
    /// Sort key used everywhere a deterministic order is needed:
    /// source position first, then structural tree position
    pub fn order_key(&self) -> (usize, usize, usize) {
        let start = self.location.span.start;
        (start.line, start.column, self.order)
    }
}

/// A scope node of the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeInfo {
    pub id: ScopeId,
    pub kind: NodeKind,
    pub name: Option<String>,
    pub parent: Option<ScopeId>,
    pub span: SourceSpan,
}

/// Every scope of a document, keyed (and therefore ordered) by pre-order id
#[derive(Debug, Clone, Default)]
pub struct ScopeTree {
    scopes: BTreeMap<ScopeId, ScopeInfo>,
}

impl ScopeInfo {
    /// Scope opened by a declaration for its parameters and local definitions
    pub fn is_declaration(&self) -> bool {
        self.kind.is_declaration()
    }
}

impl ScopeTree {
    pub fn get(&self, id: ScopeId) -> Option<&ScopeInfo> {
        self.scopes.get(&id)
    }

    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.scopes.get(&id).and_then(|scope| scope.parent)
    }

    /// Scopes in pre-order, so a parent always comes before its children
    pub fn iter(&self) -> impl Iterator<Item = &ScopeInfo> {
        self.scopes.values()
    }

    pub fn ids(&self) -> Vec<ScopeId> {
        self.scopes.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Walks up from `id` until a scope satisfying `pred` is found, `id` itself included
    pub fn nearest(&self, id: ScopeId, pred: impl Fn(&ScopeInfo) -> bool) -> Option<ScopeId> {
        let mut current = Some(id);
        while let Some(scope_id) = current {
            let scope = self.scopes.get(&scope_id)?;
            if pred(scope) {
                return Some(scope_id);
            }
            current = scope.parent;
        }
        None
    }
}

/// Read only traversal over a document's declaration tree
pub struct DeclarationWalker<'doc> {
    document: &'doc Document,
}

impl<'doc> DeclarationWalker<'doc> {
    pub fn new(document: &'doc Document) -> Self {
        Self { document }
    }

    /// Lazily yields every declaration in document pre-order. Each call starts
    /// over from the root and yields the same sequence.
    pub fn declarations(&self) -> Declarations<'doc> {
        Declarations {
            document: self.document,
            stack: vec![Frame {
                node: &self.document.root,
                scope: ScopeId::ROOT,
            }],
            next_order: 0,
            failed: false,
        }
    }

    /// Declarations belonging directly to `context`, in document order
    pub fn declarations_in<'a>(
        &'a self,
        context: &'a ScopeContext,
    ) -> impl Iterator<Item = Result<Declaration>> + 'a {
        self.declarations().filter(move |item| match item {
            Ok(decl) => context.owns(decl.scope),
            Err(_) => true,
        })
    }

    /// Walks the document once and groups every declaration by its scope
    pub fn index(&self) -> Result<DeclarationIndex> {
        let mut by_scope: HashMap<ScopeId, Vec<Declaration>> = HashMap::new();
        for decl in self.declarations() {
            let decl = decl?;
            by_scope.entry(decl.scope).or_default().push(decl);
        }
        Ok(DeclarationIndex { by_scope })
    }

    /// Builds the scope tree. Fails on the first module or declaration
    /// scope without a name.
    pub fn scope_tree(&self) -> Result<ScopeTree> {
        let mut tree = ScopeTree::default();
        tree.scopes.insert(
            ScopeId::ROOT,
            ScopeInfo {
                id: ScopeId::ROOT,
                kind: self.document.root.kind,
                name: self.document.root.resolved_name().map(str::to_string),
                parent: None,
                span: self.document.root.span,
            },
        );

        let mut stack = vec![(&self.document.root, ScopeId::ROOT)];
        let mut order = 0;
        while let Some((node, scope)) = stack.pop() {
            let child_scope = if order > 0 && node.opens_scope() {
                let id = ScopeId(order);
                let name = match node.kind {
                    NodeKind::Module | NodeKind::Declaration(_) => {
                        Some(self.required_name(node)?.to_string())
                    }
                    _ => None,
                };
                tree.scopes.insert(
                    id,
                    ScopeInfo {
                        id,
                        kind: node.kind,
                        name,
                        parent: Some(scope),
                        span: node.span,
                    },
                );
                id
            } else {
                scope
            };
            order += 1;

            for child in node.children.iter().rev() {
                stack.push((child, child_scope));
            }
        }

        Ok(tree)
    }

    fn required_name(&self, node: &'doc Node) -> Result<&'doc str> {
        node.resolved_name().ok_or_else(|| malformed(self.document, node))
    }
}

fn malformed(document: &Document, node: &Node) -> ValidationError {
    ValidationError::MalformedTree {
        kind: node.kind,
        location: document.location(node.span),
    }
}

/// Declarations of one document grouped by the scope they belong to
#[derive(Debug, Clone, Default)]
pub struct DeclarationIndex {
    by_scope: HashMap<ScopeId, Vec<Declaration>>,
}

impl DeclarationIndex {
    pub fn in_scope(&self, scope: ScopeId) -> &[Declaration] {
        self.by_scope.get(&scope).map(Vec::as_slice).unwrap_or_default()
    }

    /// Declarations belonging directly to `context`, in document order
    pub fn in_context(&self, context: &ScopeContext) -> Vec<Declaration> {
        let mut declarations: Vec<Declaration> = context
            .scopes
            .iter()
            .flat_map(|scope| self.in_scope(*scope))
            .cloned()
            .collect();
        declarations.sort_by_key(|decl| decl.order);
        declarations
    }

    pub fn len(&self) -> usize {
        self.by_scope.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_scope.is_empty()
    }
}

struct Frame<'doc> {
    node: &'doc Node,
    scope: ScopeId,
}

/// Iterator returned by [`DeclarationWalker::declarations`]
pub struct Declarations<'doc> {
    document: &'doc Document,
    stack: Vec<Frame<'doc>>,
    // frames pop in pre-order, so counting pops gives each node its index
    next_order: usize,
    failed: bool,
}

impl<'doc> Iterator for Declarations<'doc> {
    type Item = Result<Declaration>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        while let Some(frame) = self.stack.pop() {
            let node = frame.node;
            let order = self.next_order;
            self.next_order += 1;

            if node.kind.requires_name() && node.resolved_name().is_none() {
                self.failed = true;
                self.stack.clear();
                return Some(Err(malformed(self.document, node)));
            }

            let child_scope = if order > 0 && node.opens_scope() {
                ScopeId(order)
            } else {
                frame.scope
            };
            for child in node.children.iter().rev() {
                self.stack.push(Frame {
                    node: child,
                    scope: child_scope,
                });
            }

            if let NodeKind::Declaration(kind) = node.kind {
                if let Some(name) = node.resolved_name() {
                    return Some(Ok(Declaration {
                        name: name.to_string(),
                        kind,
                        location: self.document.location(node.span),
                        scope: frame.scope,
                        order,
                    }));
                }
            }
        }

        None
    }
}
