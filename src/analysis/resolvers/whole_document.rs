use log::debug;
use crate::analysis::context::ContextSet;
use crate::analysis::resolver::ScopeContextResolver;
use crate::analysis::resolvers::fold_into_boundaries;
use crate::analysis::walker::DeclarationWalker;
use crate::cancel::CancelSignal;
use crate::document::Document;
use crate::Result;

/// The whole document is one uniqueness boundary, nested modules and blocks
/// included. This is the default profile.
///
/// Parameters and other names local to a declaration get a context of their
/// own under the document's, so `P(x)` and `Q(x)` do not clash.
#[derive(Debug, Clone, Copy, Default)]
pub struct WholeDocumentResolver;

impl WholeDocumentResolver {
    pub const ID: &'static str = "whole-document";
}

impl ScopeContextResolver for WholeDocumentResolver {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn description(&self) -> &'static str {
        "One context per document"
    }

    fn resolve(&self, document: &Document, _cancel: &dyn CancelSignal) -> Result<ContextSet> {
        // Nothing here is expensive enough to be worth a cancellation point
        let tree = DeclarationWalker::new(document).scope_tree()?;
        let contexts = fold_into_boundaries(document, &tree, |scope| scope.is_declaration());

        debug!(
            "{}: {} scopes in {} context(s)",
            document.uri,
            tree.len(),
            contexts.len()
        );
        Ok(contexts)
    }
}
