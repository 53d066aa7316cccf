use regex::Regex;
use tree_sitter::Node;

use crate::document::{self, Document, Grammar};
use crate::engine::{Rule, RuleMeta, RuleSink};
use crate::error::Error;
use crate::types::{Diagnostic, Severity};

/// Skyline's style engine does not evaluate `calc()` expressions.
pub struct NoCalc {
    pattern: Regex,
}

impl NoCalc {
    /// Compile the value matcher once; the registry constructs rules a
    /// single time per run.
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded pattern is invalid (compile-time invariant).
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"\bcalc\(").expect("valid regex"),
        }
    }
}

impl Rule for NoCalc {
    fn meta(&self) -> RuleMeta {
        RuleMeta { grammar: Grammar::Style, name: "no-calc" }
    }

    fn visit(&self, doc: &Document, node: Node<'_>, sink: &mut RuleSink) -> Result<(), Error> {
        if node.kind() != "declaration" {
            return Ok(());
        }
        let Some(property) = document::declaration_property(doc, node) else {
            return Ok(());
        };

        let value = document::declaration_value_text(doc, node);
        if self.pattern.is_match(&value) {
            sink.add_result(Diagnostic {
                advice: Some("precompute the value, or size the box with flex".to_string()),
                description: format!("calc() is not supported in {property}"),
                fixable: false,
                name: "no-calc",
                severity: Severity::Error,
                span: Some(doc.span(node)),
                subname: property.to_string(),
            });
        }
        Ok(())
    }
}
