use log::debug;
use crate::analysis::context::ContextSet;
use crate::analysis::resolver::ScopeContextResolver;
use crate::analysis::resolvers::fold_into_boundaries;
use crate::analysis::walker::{DeclarationWalker, ScopeInfo};
use crate::cancel::CancelSignal;
use crate::document::Document;
use crate::document::ast::NodeKind;
use crate::Result;

/// Every module is its own boundary; blocks fold into the nearest enclosing
/// module, or into the document when they sit at the top level. Names local
/// to a declaration form a context under the declaration's module.
#[derive(Debug, Clone, Copy, Default)]
pub struct PerModuleResolver;

impl PerModuleResolver {
    pub const ID: &'static str = "per-module";
}

impl ScopeContextResolver for PerModuleResolver {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn description(&self) -> &'static str {
        "One context per module, plus one for the top level of the document"
    }

    fn resolve(&self, document: &Document, _cancel: &dyn CancelSignal) -> Result<ContextSet> {
        let tree = DeclarationWalker::new(document).scope_tree()?;
        let contexts = fold_into_boundaries(document, &tree, is_boundary);

        debug!("{}: {} module contexts", document.uri, contexts.len());
        Ok(contexts)
    }
}

fn is_boundary(scope: &ScopeInfo) -> bool {
    scope.kind == NodeKind::Module || scope.is_declaration()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::context::ContextId;
    use crate::analysis::resolvers::test_support::{modules_document, parameters_document};
    use crate::cancel::NeverCancel;
    use crate::document::ast::ScopeId;

    #[test]
    fn test_modules_are_boundaries() {
        let doc = modules_document();
        let contexts = PerModuleResolver.resolve(&doc, &NeverCancel).unwrap();

        assert_eq!(contexts.len(), 3);
        assert_eq!(contexts.context_of(ScopeId::ROOT), Some(ContextId(0)));
        assert_eq!(contexts.context_of(ScopeId(2)), Some(ContextId(1)));
        // the let block inside M folds into M
        assert_eq!(contexts.context_of(ScopeId(4)), Some(ContextId(1)));
        assert_eq!(contexts.context_of(ScopeId(6)), Some(ContextId(2)));

        let module_m = contexts.get(ContextId(1)).unwrap();
        assert_eq!(module_m.label, "module M");
        assert_eq!(module_m.parent, Some(ContextId(0)));
    }

    #[test]
    fn test_declaration_scopes_nest_under_their_module() {
        let doc = parameters_document();
        let contexts = PerModuleResolver.resolve(&doc, &NeverCancel).unwrap();

        // document, M, P (with its let block), Q
        assert_eq!(contexts.len(), 4);
        assert_eq!(contexts.context_of(ScopeId(4)), Some(ContextId(2)));
        assert_eq!(contexts.ancestors(ContextId(2)), vec![ContextId(0), ContextId(1)]);
        assert_eq!(contexts.get(ContextId(3)).unwrap().parent, Some(ContextId(1)));
    }
}
