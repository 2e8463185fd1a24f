pub mod checker;
pub mod config;
pub mod context;
pub mod diagnostic;
pub mod resolver;
pub mod resolver_registry;
pub mod resolvers;
pub mod walker;


use std::collections::HashMap;
use std::sync::Arc;
use log::{debug, error, info};
use crate::analysis::checker::UniquenessChecker;
use crate::analysis::config::ValidatorConfig;
use crate::analysis::context::ContextId;
use crate::analysis::diagnostic::{Finding, FindingCollector};
use crate::analysis::resolver::ScopeContextResolver;
use crate::analysis::resolvers::whole_document::WholeDocumentResolver;
use crate::analysis::walker::{Declaration, DeclarationWalker};
use crate::cancel::CancelSignal;
use crate::document::Document;
use crate::{Result, ValidationError};

/// Outcome of one validation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub findings: Vec<Finding>,
    pub contexts_checked: usize,
    pub contexts_total: usize,
    /// the host cancelled between contexts, `findings` holds what was done
    pub cancelled: bool,
    /// the finding limit dropped findings or left contexts unchecked
    pub truncated: bool,
}

impl ValidationReport {
    pub fn is_complete(&self) -> bool {
        !self.cancelled && !self.truncated && self.contexts_checked == self.contexts_total
    }
}

/// Checks that names are unique within every scope context of a document.
///
/// The resolver deciding where contexts lie is fixed at construction. The
/// validator keeps no state between passes, so one instance can serve any
/// number of documents, from several threads.
pub struct NamesAreUniqueValidator {
    resolver: Arc<dyn ScopeContextResolver>,
    checker: UniquenessChecker,
    config: ValidatorConfig,
}

impl NamesAreUniqueValidator {
    /// A validator using the `whole-document` profile
    pub fn new() -> Self {
        Self::with_resolver(WholeDocumentResolver)
    }

    pub fn with_resolver<R: ScopeContextResolver + 'static>(resolver: R) -> Self {
        Self::with_shared_resolver(Arc::new(resolver))
    }

    pub fn with_shared_resolver(resolver: Arc<dyn ScopeContextResolver>) -> Self {
        Self {
            resolver,
            checker: UniquenessChecker::new(),
            config: ValidatorConfig::default(),
        }
    }

    /// Applies everything but the profile, the resolver given at construction stays
    pub fn configure(mut self, config: ValidatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn resolver_id(&self) -> &'static str {
        self.resolver.id()
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn validate(&self, document: &Document, cancel: &dyn CancelSignal) -> Result<Vec<Finding>> {
        self.validate_report(document, cancel).map(|report| report.findings)
    }

    pub fn validate_report(
        &self,
        document: &Document,
        cancel: &dyn CancelSignal,
    ) -> Result<ValidationReport> {
        debug!("validating {} with profile {}", document.uri, self.resolver.id());

        let contexts = self
            .resolver
            .resolve(document, cancel)
            .map_err(|err| failed(document, err))?;

        let index = DeclarationWalker::new(document)
            .index()
            .map_err(|err| failed(document, err))?;
        let mut collector = FindingCollector::with_limit(self.config.finding_limit);
        // own declarations of finished contexts, only kept when nested contexts inherit
        let mut declared: HashMap<ContextId, Vec<Declaration>> = HashMap::new();

        let mut report = ValidationReport {
            findings: Vec::new(),
            contexts_checked: 0,
            contexts_total: contexts.len(),
            cancelled: false,
            truncated: false,
        };

        for context in &contexts {
            if cancel.is_cancelled() {
                info!(
                    "{}: cancelled after {} of {} contexts",
                    document.uri, report.contexts_checked, report.contexts_total
                );
                report.cancelled = true;
                break;
            }

            let own = index.in_context(context);

            let findings = if self.config.inherit_enclosing {
                // ancestors outermost first, each with its imported claims
                // ahead of its own declarations
                let mut inherited: Vec<&[Declaration]> = Vec::new();
                for id in contexts.ancestors(context.id) {
                    if let Some(ancestor) = contexts.get(id) {
                        inherited.push(&ancestor.external[..]);
                    }
                    if let Some(decls) = declared.get(&id) {
                        inherited.push(decls.as_slice());
                    }
                }
                self.checker.check(context, &own, &inherited)
            } else {
                self.checker.check(context, &own, &[])
            };

            debug!(
                "{}: {} has {} declarations, {} duplicates",
                document.uri,
                context.label,
                own.len(),
                findings.len()
            );

            report.contexts_checked += 1;
            let dropped = collector.extend(findings);
            if self.config.inherit_enclosing {
                declared.insert(context.id, own);
            }

            if collector.is_full() {
                let unchecked = report.contexts_total - report.contexts_checked;
                if dropped > 0 || unchecked > 0 {
                    info!(
                        "{}: finding limit reached, {} dropped, {} contexts unchecked",
                        document.uri, dropped, unchecked
                    );
                    report.truncated = true;
                }
                break;
            }
        }

        report.findings = collector.into_findings();
        Ok(report)
    }
}

impl Default for NamesAreUniqueValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn failed(document: &Document, err: ValidationError) -> ValidationError {
    if err.is_cancelled() {
        info!("{}: {}", document.uri, err);
    } else {
        error!("{}: {}", document.uri, err);
    }
    err
}
