pub mod imports;
pub mod nested;
pub mod per_module;
pub mod whole_document;

use crate::analysis::context::ContextSet;
use crate::analysis::walker::{ScopeInfo, ScopeTree};
use crate::document::Document;
use crate::document::ast::NodeKind;

/// Gives every boundary scope a context, parented to the context of the
/// nearest enclosing boundary. Other scopes fold into the context of their
/// nearest boundary. The document root is always a boundary.
pub(crate) fn fold_into_boundaries(
    document: &Document,
    tree: &ScopeTree,
    is_boundary: impl Fn(&ScopeInfo) -> bool,
) -> ContextSet {
    let boundary = |scope: &ScopeInfo| scope.parent.is_none() || is_boundary(scope);
    let mut contexts = ContextSet::new();

    // pre-order guarantees the enclosing boundary already has a context
    for scope in tree.iter() {
        let enclosing = scope
            .parent
            .and_then(|parent| tree.nearest(parent, &boundary))
            .and_then(|outer| contexts.context_of(outer));

        if boundary(scope) {
            contexts.push(label(document, scope), [scope.id], enclosing);
        } else if let Some(context) = enclosing {
            contexts.assign(scope.id, context);
        }
    }
    contexts
}

pub(crate) fn label(document: &Document, scope: &ScopeInfo) -> String {
    match (scope.kind, &scope.name) {
        _ if scope.parent.is_none() => document.uri.to_string(),
        (NodeKind::Module, Some(name)) => format!("module {}", name),
        (NodeKind::Declaration(kind), Some(name)) => format!("{} {}", kind, name),
        _ => format!("block at {}", scope.span),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::document::ast::{DeclarationKind, SourceSpan};
    use crate::document::{Document, DocumentBuilder};

    /// channel a; module M { P; let { x } }; module N { P }; Q
    pub fn modules_document() -> Document {
        DocumentBuilder::new("file:///modules.csp")
            .declare(DeclarationKind::Channel, "a", SourceSpan::line(1))
            .open_module("M", SourceSpan::line(2))
            .declare(DeclarationKind::Process, "P", SourceSpan::line(3))
            .open_block(SourceSpan::line(4))
            .declare(DeclarationKind::Constant, "x", SourceSpan::line(5))
            .close()
            .close()
            .open_module("N", SourceSpan::line(7))
            .declare(DeclarationKind::Process, "P", SourceSpan::line(8))
            .close()
            .declare(DeclarationKind::Process, "Q", SourceSpan::line(10))
            .build()
    }

    /// module M { P(x) = let { y } ; Q(x) }, every `x` is a parameter
    pub fn parameters_document() -> Document {
        DocumentBuilder::new("file:///params.csp")
            .open_module("M", SourceSpan::line(1))
            .open_declaration(DeclarationKind::Process, "P", SourceSpan::line(2))
            .declare(DeclarationKind::Parameter, "x", SourceSpan::new((2, 3), (2, 4)))
            .open_block(SourceSpan::line(3))
            .declare(DeclarationKind::Constant, "y", SourceSpan::line(3))
            .close()
            .close()
            .open_declaration(DeclarationKind::Process, "Q", SourceSpan::line(5))
            .declare(DeclarationKind::Parameter, "x", SourceSpan::new((5, 3), (5, 4)))
            .build()
    }
}
