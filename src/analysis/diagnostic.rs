use std::fmt;
use crate::analysis::context::ContextId;
use crate::analysis::walker::Declaration;
use crate::document::ast::Location;

pub const DUPLICATE_NAME: &str = "duplicate-name";

/// Duplicate names are always errors, there is no way to downgrade them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
        }
    }
}

/// A repeated name, pointing back at the declaration that claimed it first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub severity: Severity,
    pub rule_id: &'static str,
    pub name: String,
    pub location: Location,
    pub first_location: Location,
    pub context: ContextId,
}

impl Finding {
    pub fn duplicate(context: ContextId, duplicate: &Declaration, first: &Declaration) -> Self {
        Self {
            severity: Severity::Error,
            rule_id: DUPLICATE_NAME,
            name: duplicate.name.clone(),
            location: duplicate.location.clone(),
            first_location: first.location.clone(),
            context,
        }
    }

    pub fn message(&self) -> String {
        format!(
            "duplicate name '{}' (first declared at {})",
            self.name, self.first_location
        )
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.location, self.severity, self.message())
    }
}

/// Accumulates findings for one validation pass, optionally capped
#[derive(Debug, Default)]
pub struct FindingCollector {
    findings: Vec<Finding>,
    limit: Option<usize>,
}

impl FindingCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            findings: Vec::new(),
            limit,
        }
    }

    /// Adds findings until the limit is hit, returns how many did not fit
    pub fn extend(&mut self, findings: impl IntoIterator<Item = Finding>) -> usize {
        let mut dropped = 0;
        for finding in findings {
            if self.is_full() {
                dropped += 1;
            } else {
                self.findings.push(finding);
            }
        }
        dropped
    }

    pub fn is_full(&self) -> bool {
        self.limit.is_some_and(|limit| self.findings.len() >= limit)
    }

    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::Error)
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn into_findings(self) -> Vec<Finding> {
        self.findings
    }
}

/// One line per finding, in the order they were produced
pub fn render(findings: &[Finding]) -> String {
    let mut out = String::new();
    for finding in findings {
        out.push_str(&finding.to_string());
        out.push('\n');
    }
    out
}
