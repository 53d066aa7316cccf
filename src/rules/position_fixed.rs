use tree_sitter::Node;

use crate::document::{self, Document, Grammar};
use crate::engine::{Rule, RuleMeta, RuleSink};
use crate::error::Error;
use crate::types::{Diagnostic, Severity};

/// Fixed positioning does not escape the page under skyline.
pub struct PositionFixed;

impl Rule for PositionFixed {
    fn meta(&self) -> RuleMeta {
        RuleMeta { grammar: Grammar::Style, name: "position-fixed" }
    }

    fn visit(&self, doc: &Document, node: Node<'_>, sink: &mut RuleSink) -> Result<(), Error> {
        if node.kind() != "declaration"
            || document::declaration_property(doc, node) != Some("position")
        {
            return Ok(());
        }

        for value in document::declaration_values(node) {
            if doc.node_text(value) != "fixed" {
                continue;
            }
            sink.add_result(Diagnostic {
                advice: Some("anchor the node inside a root-portal instead".to_string()),
                description: "position: fixed is not supported".to_string(),
                fixable: false,
                name: "position-fixed",
                severity: Severity::Error,
                span: Some(doc.span(node)),
                subname: "fixed".to_string(),
            });
        }
        Ok(())
    }
}
