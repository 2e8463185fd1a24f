use std::sync::Arc;
use crate::analysis::NamesAreUniqueValidator;
use crate::analysis::resolver::ScopeContextResolver;
use crate::analysis::resolver_registry::ResolverRegistry;
use crate::analysis::resolvers::whole_document::WholeDocumentResolver;
use crate::{Result, ValidationError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatorConfig {
    /// Registry id of the uniqueness profile, `whole-document` when unset
    pub profile: Option<String>,
    /// Names held by enclosing contexts may not be declared again in nested ones
    pub inherit_enclosing: bool,
    /// Stop the pass once this many findings were produced
    pub finding_limit: Option<usize>,
}

impl ValidatorConfig {
    pub fn profile(mut self, profile: &str) -> Self {
        self.profile = Some(profile.to_string());
        self
    }

    pub fn inherit_enclosing(mut self, inherit: bool) -> Self {
        self.inherit_enclosing = inherit;
        self
    }

    pub fn finding_limit(mut self, limit: usize) -> Self {
        self.finding_limit = Some(limit);
        self
    }
}

impl NamesAreUniqueValidator {
    /// Builds a validator from configuration.
    ///
    /// A configured profile must exist in `registry`; it is never replaced by
    /// the default. The default is only used when no profile is configured.
    pub fn from_config(config: ValidatorConfig, registry: &ResolverRegistry) -> Result<Self> {
        let resolver: Arc<dyn ScopeContextResolver> = match &config.profile {
            Some(profile) => registry
                .get_resolver(profile)
                .ok_or_else(|| ValidationError::UnknownProfile(profile.clone()))?,
            None => Arc::new(WholeDocumentResolver),
        };

        Ok(Self::with_shared_resolver(resolver).configure(config))
    }

    // Method to get all available profiles
    pub fn list_profiles(registry: &ResolverRegistry) -> Vec<(&'static str, &'static str)> {
        registry
            .get_all_resolvers()
            .iter()
            .map(|resolver| (resolver.id(), resolver.description()))
            .collect()
    }
}
