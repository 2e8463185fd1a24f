use std::collections::HashMap;
use crate::analysis::context::ScopeContext;
use crate::analysis::diagnostic::Finding;
use crate::analysis::walker::Declaration;

/// Detects names declared more than once within one scope context
#[derive(Debug, Clone, Copy, Default)]
pub struct UniquenessChecker;

impl UniquenessChecker {
    pub fn new() -> Self {
        Self
    }

    /// Checks the declarations owned by `context`.
    ///
    /// `inherited` holds the declarations of enclosing contexts, outermost
    /// first. Inherited and external declarations are prior claims: they win
    /// every name they hold, and only the context's own declarations are
    /// reported. Own declarations are visited by source position with the
    /// pre-order index as tie-break, so equal input always gives equal output.
    pub fn check(
        &self,
        context: &ScopeContext,
        own: &[Declaration],
        inherited: &[&[Declaration]],
    ) -> Vec<Finding> {
        let mut first_seen: HashMap<&str, &Declaration> = HashMap::new();

        for claims in inherited {
            for decl in sorted(claims) {
                first_seen.entry(decl.name.as_str()).or_insert(decl);
            }
        }
        // external claims arrive in import order, which is already deterministic
        for decl in context.external.iter() {
            first_seen.entry(decl.name.as_str()).or_insert(decl);
        }

        let mut findings = Vec::new();
        for decl in sorted(own) {
            match first_seen.get(decl.name.as_str()) {
                Some(first) => findings.push(Finding::duplicate(context.id, decl, first)),
                None => {
                    first_seen.insert(decl.name.as_str(), decl);
                }
            }
        }

        findings
    }
}

fn sorted(declarations: &[Declaration]) -> Vec<&Declaration> {
    let mut ordered: Vec<&Declaration> = declarations.iter().collect();
    ordered.sort_by_key(|decl| decl.order_key());
    ordered
}
