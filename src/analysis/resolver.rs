use crate::analysis::context::ContextSet;
use crate::cancel::CancelSignal;
use crate::document::Document;
use crate::Result;

/// Decides where uniqueness boundaries lie for a document.
///
/// Language profiles disagree on this (single file, module, nested block,
/// imported documents), so each profile is its own resolver and the validator
/// is handed one at construction.
pub trait ScopeContextResolver: Send + Sync {
    // Unique identifier, also the profile name used in configuration
    fn id(&self) -> &'static str;

    // Short description of where this resolver draws boundaries
    fn description(&self) -> &'static str;

    // Produce the ordered contexts for `document`. Resolvers that do expensive
    // lookups poll `cancel` first and fail with `Cancelled` instead of
    // returning a half resolved set.
    fn resolve(&self, document: &Document, cancel: &dyn CancelSignal) -> Result<ContextSet>;
}
