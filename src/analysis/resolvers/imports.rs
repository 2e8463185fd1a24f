use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use dashmap::DashMap;
use log::{debug, warn};
use crate::analysis::context::{ContextId, ContextSet};
use crate::analysis::resolver::ScopeContextResolver;
use crate::analysis::resolvers::whole_document::WholeDocumentResolver;
use crate::analysis::walker::{Declaration, DeclarationWalker};
use crate::cancel::CancelSignal;
use crate::document::Document;
use crate::document::ast::ScopeId;
use crate::{Result, ValidationError};

/// Hands out already parsed documents by uri, usually backed by the host's
/// resource set
pub trait DocumentProvider: Send + Sync {
    fn load(&self, uri: &str) -> Option<Arc<Document>>;
}

impl DocumentProvider for HashMap<String, Arc<Document>> {
    fn load(&self, uri: &str) -> Option<Arc<Document>> {
        self.get(uri).cloned()
    }
}

/// What one document contributes to its importers
#[derive(Debug)]
pub struct Exports {
    /// top level declarations, in document order
    pub declarations: Arc<[Declaration]>,
    pub imports: Vec<Arc<str>>,
}

/// Read-through cache of document exports, shared between validation passes.
///
/// Entries are immutable once inserted. When two passes race on the same
/// uri the first insert wins and both read the same entry.
#[derive(Debug, Default)]
pub struct ExportCache {
    exports: DashMap<Arc<str>, Arc<Exports>>,
}

impl ExportCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load(
        &self,
        uri: &str,
        provider: &dyn DocumentProvider,
    ) -> Result<Option<Arc<Exports>>> {
        if let Some(entry) = self.exports.get(uri) {
            return Ok(Some(entry.value().clone()));
        }

        let Some(document) = provider.load(uri) else {
            return Ok(None);
        };
        let exports = Arc::new(exports_of(&document)?);

        let entry = self
            .exports
            .entry(Arc::from(uri))
            .or_insert(exports)
            .value()
            .clone();
        Ok(Some(entry))
    }

    /// Drops the entry for `uri`, to be called by the host when the document changes
    pub fn invalidate(&self, uri: &str) {
        self.exports.remove(uri);
    }

    pub fn len(&self) -> usize {
        self.exports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exports.is_empty()
    }
}

fn exports_of(document: &Document) -> Result<Exports> {
    let declarations = DeclarationWalker::new(document)
        .declarations()
        .filter(|item| match item {
            Ok(decl) => decl.scope == ScopeId::ROOT,
            Err(_) => true,
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Exports {
        declarations: Arc::from(declarations),
        imports: document.imports.clone(),
    })
}

/// Extends another profile across document boundaries: the top level
/// declarations of every (transitively) imported document are prior claims
/// in each top level context of the importing document.
pub struct ImportingResolver {
    inner: Box<dyn ScopeContextResolver>,
    provider: Arc<dyn DocumentProvider>,
    cache: Arc<ExportCache>,
}

impl ImportingResolver {
    pub const ID: &'static str = "imports";

    pub fn new(provider: Arc<dyn DocumentProvider>) -> Self {
        Self::wrapping(Box::new(WholeDocumentResolver), provider)
    }

    pub fn wrapping(inner: Box<dyn ScopeContextResolver>, provider: Arc<dyn DocumentProvider>) -> Self {
        Self {
            inner,
            provider,
            cache: Arc::new(ExportCache::new()),
        }
    }

    /// Shares `cache` with other resolvers, e.g. one per worker thread
    pub fn with_cache(mut self, cache: Arc<ExportCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn cache(&self) -> &Arc<ExportCache> {
        &self.cache
    }

    /// Breadth first over the import graph, each document visited once
    fn imported_declarations(
        &self,
        document: &Document,
        cancel: &dyn CancelSignal,
    ) -> Result<Vec<Declaration>> {
        let mut visited: HashSet<Arc<str>> = HashSet::new();
        visited.insert(document.uri.clone());

        let mut queue: VecDeque<Arc<str>> = document.imports.iter().cloned().collect();
        let mut declarations = Vec::new();

        while let Some(uri) = queue.pop_front() {
            if !visited.insert(uri.clone()) {
                continue;
            }
            if cancel.is_cancelled() {
                return Err(ValidationError::cancelled(format!("resolving import {}", uri)));
            }

            match self.cache.get_or_load(&uri, self.provider.as_ref())? {
                Some(exports) => {
                    declarations.extend(exports.declarations.iter().cloned());
                    queue.extend(exports.imports.iter().cloned());
                }
                None => warn!("{}: import {} could not be resolved", document.uri, uri),
            }
        }

        Ok(declarations)
    }
}

impl ScopeContextResolver for ImportingResolver {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn description(&self) -> &'static str {
        "Top level names must also be unique against imported documents"
    }

    fn resolve(&self, document: &Document, cancel: &dyn CancelSignal) -> Result<ContextSet> {
        let mut contexts = self.inner.resolve(document, cancel)?;
        let imported = self.imported_declarations(document, cancel)?;
        if imported.is_empty() {
            return Ok(contexts);
        }

        debug!(
            "{}: {} imported declarations from {} import(s)",
            document.uri,
            imported.len(),
            document.imports.len()
        );

        let external: Arc<[Declaration]> = Arc::from(imported);
        let roots: Vec<ContextId> = contexts
            .iter()
            .filter(|ctx| ctx.is_root())
            .map(|ctx| ctx.id)
            .collect();
        for id in roots {
            contexts.set_external(id, external.clone());
        }

        Ok(contexts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::resolvers::per_module::PerModuleResolver;
    use crate::cancel::{CancelFlag, NeverCancel};
    use crate::document::DocumentBuilder;
    use crate::document::ast::{DeclarationKind, SourceSpan};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        documents: HashMap<String, Arc<Document>>,
        loads: AtomicUsize,
    }

    impl DocumentProvider for CountingProvider {
        fn load(&self, uri: &str) -> Option<Arc<Document>> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            self.documents.load(uri)
        }
    }

    fn library() -> CountingProvider {
        let base = DocumentBuilder::new("file:///base.csp")
            .declare(DeclarationKind::Channel, "tick", SourceSpan::line(1))
            .open_module("Hidden", SourceSpan::line(2))
            .declare(DeclarationKind::Process, "Inner", SourceSpan::line(3))
            .build();
        // imports base back, the cycle must not loop forever
        let lib = DocumentBuilder::new("file:///lib.csp")
            .import("file:///base.csp")
            .import("file:///lib.csp")
            .declare(DeclarationKind::Datatype, "Colour", SourceSpan::line(1))
            .build();

        let mut documents = HashMap::new();
        documents.insert("file:///base.csp".to_string(), Arc::new(base));
        documents.insert("file:///lib.csp".to_string(), Arc::new(lib));
        CountingProvider {
            documents,
            loads: AtomicUsize::new(0),
        }
    }

    fn importer() -> Document {
        DocumentBuilder::new("file:///main.csp")
            .import("file:///lib.csp")
            .import("file:///missing.csp")
            .declare(DeclarationKind::Process, "P", SourceSpan::line(1))
            .open_module("M", SourceSpan::line(2))
            .close()
            .build()
    }

    #[test]
    fn test_transitive_exports_become_external_claims() {
        let resolver = ImportingResolver::wrapping(Box::new(PerModuleResolver), Arc::new(library()));
        let contexts = resolver.resolve(&importer(), &NeverCancel).unwrap();

        let root = contexts.get(ContextId(0)).unwrap();
        let names: Vec<&str> = root.external.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Colour", "tick"]);

        // only top level contexts see imports
        let module = contexts.get(ContextId(1)).unwrap();
        assert!(module.external.is_empty());
    }

    #[test]
    fn test_cache_is_read_through() {
        let provider = Arc::new(library());
        let resolver = ImportingResolver::new(provider.clone());
        let doc = importer();

        resolver.resolve(&doc, &NeverCancel).unwrap();
        let after_first = provider.loads.load(Ordering::SeqCst);
        resolver.resolve(&doc, &NeverCancel).unwrap();

        // only the missing import goes back to the provider
        assert_eq!(provider.loads.load(Ordering::SeqCst), after_first + 1);
        assert_eq!(resolver.cache().len(), 2);

        resolver.cache().invalidate("file:///lib.csp");
        assert_eq!(resolver.cache().len(), 1);
    }

    #[test]
    fn test_cancel_fails_fast() {
        let resolver = ImportingResolver::new(Arc::new(library()));
        let flag = CancelFlag::new();
        flag.cancel();

        let result = resolver.resolve(&importer(), &flag);
        assert!(matches!(result, Err(ValidationError::Cancelled { .. })));
    }

    #[test]
    fn test_no_imports_skips_cancel_checks() {
        let resolver = ImportingResolver::new(Arc::new(library()));
        let flag = CancelFlag::new();
        flag.cancel();

        let doc = DocumentBuilder::new("file:///alone.csp")
            .declare(DeclarationKind::Process, "P", SourceSpan::line(1))
            .build();
        assert_eq!(resolver.resolve(&doc, &flag).unwrap().len(), 1);
    }
}
