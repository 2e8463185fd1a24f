use log::debug;
use crate::analysis::context::ContextSet;
use crate::analysis::resolver::ScopeContextResolver;
use crate::analysis::resolvers::label;
use crate::analysis::walker::DeclarationWalker;
use crate::cancel::CancelSignal;
use crate::document::Document;
use crate::Result;

/// Every scope node (document, module, block, declaration with locals) is
/// its own context, linked to the context of its enclosing scope.
///
/// Combine with `inherit_enclosing` to forbid shadowing of outer names.
#[derive(Debug, Clone, Copy, Default)]
pub struct NestedScopeResolver;

impl NestedScopeResolver {
    pub const ID: &'static str = "nested-scopes";
}

impl ScopeContextResolver for NestedScopeResolver {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn description(&self) -> &'static str {
        "One context per lexical scope"
    }

    fn resolve(&self, document: &Document, _cancel: &dyn CancelSignal) -> Result<ContextSet> {
        let tree = DeclarationWalker::new(document).scope_tree()?;
        let mut contexts = ContextSet::new();

        for scope in tree.iter() {
            let parent = scope.parent.and_then(|p| contexts.context_of(p));
            contexts.push(label(document, scope), [scope.id], parent);
        }

        debug!("{}: {} nested contexts", document.uri, contexts.len());
        Ok(contexts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::context::ContextId;
    use crate::analysis::resolvers::test_support::{modules_document, parameters_document};
    use crate::cancel::NeverCancel;
    use crate::document::ast::ScopeId;

    #[test]
    fn test_one_context_per_scope() {
        let doc = modules_document();
        let contexts = NestedScopeResolver.resolve(&doc, &NeverCancel).unwrap();

        assert_eq!(contexts.len(), 4);
        let block = contexts.context_of(ScopeId(4)).unwrap();
        assert_eq!(contexts.ancestors(block), vec![ContextId(0), ContextId(1)]);
        assert_eq!(contexts.get(block).unwrap().label, "block at 4:1");
        assert_eq!(contexts.get(ContextId(3)).unwrap().parent, Some(ContextId(0)));
        assert_eq!(contexts.get(ContextId(3)).unwrap().label, "module N");
    }

    #[test]
    fn test_declaration_scope_sits_between_module_and_block() {
        let doc = parameters_document();
        let contexts = NestedScopeResolver.resolve(&doc, &NeverCancel).unwrap();

        // document, M, P, let block, Q
        assert_eq!(contexts.len(), 5);
        let block = contexts.context_of(ScopeId(4)).unwrap();
        assert_eq!(
            contexts.ancestors(block),
            vec![ContextId(0), ContextId(1), ContextId(2)]
        );
        assert_eq!(contexts.get(ContextId(2)).unwrap().label, "process P");
    }
}
