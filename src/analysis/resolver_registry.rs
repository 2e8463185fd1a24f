use std::collections::BTreeMap;
use std::sync::Arc;
use crate::analysis::resolver::ScopeContextResolver;
use crate::analysis::resolvers::nested::NestedScopeResolver;
use crate::analysis::resolvers::per_module::PerModuleResolver;
use crate::analysis::resolvers::whole_document::WholeDocumentResolver;

/// Named uniqueness profiles a configuration can pick from
pub struct ResolverRegistry {
    resolvers: BTreeMap<String, Arc<dyn ScopeContextResolver>>,
}

impl ResolverRegistry {
    pub fn new() -> Self {
        Self {
            resolvers: BTreeMap::new(),
        }
    }

    /// The document local profiles, cross document ones need a provider and
    /// are registered by the host
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(WholeDocumentResolver);
        registry.register(PerModuleResolver);
        registry.register(NestedScopeResolver);
        registry
    }

    /// Registers `resolver` under its id, replacing any earlier one with the same id
    pub fn register<R: ScopeContextResolver + 'static>(&mut self, resolver: R) {
        let resolver_id = resolver.id().to_string();
        self.resolvers.insert(resolver_id, Arc::new(resolver));
    }

    pub fn get_resolver(&self, resolver_id: &str) -> Option<Arc<dyn ScopeContextResolver>> {
        self.resolvers.get(resolver_id).cloned()
    }

    pub fn get_all_resolvers(&self) -> Vec<&dyn ScopeContextResolver> {
        self.resolvers.values().map(|r| r.as_ref()).collect()
    }
}

impl Default for ResolverRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_registered() {
        let registry = ResolverRegistry::with_defaults();
        let ids: Vec<&str> = registry.get_all_resolvers().iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["nested-scopes", "per-module", "whole-document"]);
        assert!(registry.get_resolver("imports").is_none());
        assert!(ResolverRegistry::new().get_all_resolvers().is_empty());
    }
}
