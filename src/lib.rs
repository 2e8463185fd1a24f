//! Scoped name-uniqueness validation for parsed CSPM documents.
//!
//! The host parses a document into a declaration tree, picks a uniqueness
//! profile (a [`ScopeContextResolver`]) and hands both to a
//! [`NamesAreUniqueValidator`], which reports every repeated name as a
//! [`Finding`].

use thiserror::Error;

pub mod analysis;
pub mod cancel;
pub mod document;

pub use analysis::checker::UniquenessChecker;
pub use analysis::config::ValidatorConfig;
pub use analysis::context::{ContextId, ContextSet, ScopeContext};
pub use analysis::diagnostic::{Finding, FindingCollector, Severity};
pub use analysis::resolver::ScopeContextResolver;
pub use analysis::resolver_registry::ResolverRegistry;
pub use analysis::resolvers::imports::{DocumentProvider, ExportCache, ImportingResolver};
pub use analysis::resolvers::nested::NestedScopeResolver;
pub use analysis::resolvers::per_module::PerModuleResolver;
pub use analysis::resolvers::whole_document::WholeDocumentResolver;
pub use analysis::walker::{Declaration, DeclarationIndex, DeclarationWalker, ScopeInfo, ScopeTree};
pub use analysis::{NamesAreUniqueValidator, ValidationReport};
pub use cancel::{CancelFlag, CancelSignal, NeverCancel};
pub use document::ast::{
    DeclarationKind, Location, Node, NodeKind, ScopeId, SourcePosition, SourceSpan,
};
pub use document::{Document, DocumentBuilder};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Malformed declaration tree: {kind} at {location} has no name")]
    MalformedTree { kind: NodeKind, location: Location },
    #[error("Validation cancelled while {during}")]
    Cancelled { during: String },
    #[error("Unknown uniqueness profile: {0}")]
    UnknownProfile(String),
}

impl ValidationError {
    pub fn cancelled(during: impl Into<String>) -> Self {
        ValidationError::Cancelled {
            during: during.into(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ValidationError::Cancelled { .. })
    }
}

pub type Result<T> = std::result::Result<T, ValidationError>;
