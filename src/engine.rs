//! Rule engine: one preorder traversal per rule, isolated failures,
//! deterministic diagnostic ordering.

use std::cmp::Ordering;

use tree_sitter::Node;

use crate::document::{self, Document, Grammar};
use crate::error::Error;
use crate::types::{Diagnostic, Edit};

/// Identity of a rule: the grammar it inspects and its reported name.
#[derive(Debug, Clone, Copy)]
pub struct RuleMeta {
    /// Grammar this rule is dispatched on.
    pub grammar: Grammar,
    /// Stable rule name used in reports, config, and conflict messages.
    pub name: &'static str,
}

/// A compatibility rule. The engine walks each matching document once per
/// rule and calls `visit` for every node in preorder; rules never observe
/// each other's traversal and never mutate the tree.
pub trait Rule: Send + Sync {
    /// The rule's grammar and name.
    fn meta(&self) -> RuleMeta;

    /// Inspect one node, emitting diagnostics and edits into the sink.
    ///
    /// # Errors
    ///
    /// A returned error aborts this rule's traversal of the current file;
    /// its partial output is discarded.
    fn visit(&self, doc: &Document, node: Node<'_>, sink: &mut RuleSink) -> Result<(), Error>;
}

/// Explicit per-file, per-rule accumulator. Rules write here instead of
/// into any shared state.
#[derive(Default)]
pub struct RuleSink {
    diagnostics: Vec<Diagnostic>,
    edits: Vec<Edit>,
}

impl RuleSink {
    /// Record one finding.
    pub fn add_result(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Queue one proposed fix.
    pub fn add_edit(&mut self, edit: Edit) {
        self.edits.push(edit);
    }
}

/// Everything one analysis pass produced for one file.
#[derive(Default)]
pub struct FileAnalysis {
    /// Findings, sorted by the reporting contract.
    pub diagnostics: Vec<Diagnostic>,
    /// Proposed fixes from all surviving rules.
    pub edits: Vec<Edit>,
    /// Rule-level failures; each discarded that rule's partial output.
    pub failures: Vec<Error>,
}

/// Run every matching rule over one document, in registration order.
///
/// A failing rule contributes nothing (its partial diagnostics and edits
/// are dropped) and is recorded in `failures`; other rules are unaffected.
pub fn run(rules: &[Box<dyn Rule>], doc: &Document) -> FileAnalysis {
    let mut analysis = FileAnalysis::default();

    for rule in rules {
        let meta = rule.meta();
        if meta.grammar != doc.grammar {
            continue;
        }
        let mut sink = RuleSink::default();
        match visit_all(rule.as_ref(), doc, &mut sink) {
            Ok(()) => {
                analysis.diagnostics.append(&mut sink.diagnostics);
                analysis.edits.append(&mut sink.edits);
            },
            Err(e) => analysis.failures.push(Error::RuleFailed {
                file: doc.path.clone(),
                reason: e.to_string(),
                rule: meta.name.to_string(),
            }),
        }
    }

    analysis.diagnostics.sort_by(diagnostic_order);
    analysis
}

/// The reporting order contract: severity descending, then rule name,
/// then subname, both lexicographic. Reproduced exactly on every run.
pub fn diagnostic_order(a: &Diagnostic, b: &Diagnostic) -> Ordering {
    b.severity
        .cmp(&a.severity)
        .then_with(|| a.name.cmp(b.name))
        .then_with(|| a.subname.cmp(&b.subname))
}

fn visit_all(rule: &dyn Rule, doc: &Document, sink: &mut RuleSink) -> Result<(), Error> {
    for node in document::preorder(doc.root()) {
        rule.visit(doc, node, sink)?;
    }
    Ok(())
}
