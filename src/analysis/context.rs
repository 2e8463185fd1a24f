use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;
use crate::analysis::walker::Declaration;
use crate::document::ast::ScopeId;

/// Identifies a context inside one [`ContextSet`]. Ids are positions in the
/// set and carry no meaning across validation passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContextId(pub usize);

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "context#{}", self.0)
    }
}

/// A boundary within which every declared name must be unique
#[derive(Debug, Clone)]
pub struct ScopeContext {
    pub id: ContextId,
    pub label: String,
    /// scopes whose declarations belong directly to this context
    pub scopes: BTreeSet<ScopeId>,
    pub parent: Option<ContextId>,
    /// declarations from outside the document that already own their names
    pub external: Arc<[Declaration]>,
}

impl ScopeContext {
    pub fn owns(&self, scope: ScopeId) -> bool {
        self.scopes.contains(&scope)
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Ordered contexts of one document.
///
/// A parent context is always pushed before its children and every scope is
/// owned by at most one context.
#[derive(Debug, Clone, Default)]
pub struct ContextSet {
    contexts: Vec<ScopeContext>,
    by_scope: HashMap<ScopeId, ContextId>,
}

impl ContextSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a new context and returns its id. Scopes already owned by another
    /// context stay with their first owner.
    pub fn push(
        &mut self,
        label: impl Into<String>,
        scopes: impl IntoIterator<Item = ScopeId>,
        parent: Option<ContextId>,
    ) -> ContextId {
        let id = ContextId(self.contexts.len());
        let parent = parent.filter(|p| p.0 < id.0);

        let mut owned = BTreeSet::new();
        for scope in scopes {
            if !self.by_scope.contains_key(&scope) {
                self.by_scope.insert(scope, id);
                owned.insert(scope);
            }
        }

        self.contexts.push(ScopeContext {
            id,
            label: label.into(),
            scopes: owned,
            parent,
            external: Arc::from(Vec::new()),
        });
        id
    }

    /// Moves `scope` into an existing context, used when a scope folds into
    /// an enclosing boundary
    pub fn assign(&mut self, scope: ScopeId, context: ContextId) {
        if self.by_scope.contains_key(&scope) {
            return;
        }
        if let Some(ctx) = self.contexts.get_mut(context.0) {
            ctx.scopes.insert(scope);
            self.by_scope.insert(scope, context);
        }
    }

    pub fn set_external(&mut self, context: ContextId, external: Arc<[Declaration]>) {
        if let Some(ctx) = self.contexts.get_mut(context.0) {
            ctx.external = external;
        }
    }

    pub fn get(&self, id: ContextId) -> Option<&ScopeContext> {
        self.contexts.get(id.0)
    }

    pub fn context_of(&self, scope: ScopeId) -> Option<ContextId> {
        self.by_scope.get(&scope).copied()
    }

    /// Ancestors of `id`, outermost first, `id` itself excluded
    pub fn ancestors(&self, id: ContextId) -> Vec<ContextId> {
        let mut chain = Vec::new();
        let mut current = self.get(id).and_then(|ctx| ctx.parent);
        while let Some(parent) = current {
            chain.push(parent);
            current = self.get(parent).and_then(|ctx| ctx.parent);
        }
        chain.reverse();
        chain
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScopeContext> {
        self.contexts.iter()
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}

impl<'a> IntoIterator for &'a ContextSet {
    type Item = &'a ScopeContext;
    type IntoIter = std::slice::Iter<'a, ScopeContext>;

    fn into_iter(self) -> Self::IntoIter {
        self.contexts.iter()
    }
}
