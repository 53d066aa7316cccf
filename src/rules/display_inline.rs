use tree_sitter::Node;

use crate::document::{self, Document, Grammar};
use crate::engine::{Rule, RuleMeta, RuleSink};
use crate::error::Error;
use crate::types::{Diagnostic, Severity};

/// Skyline has no inline formatting context; `display: inline` and
/// `display: inline-block` both degrade to block boxes.
pub struct DisplayInline;

impl Rule for DisplayInline {
    fn meta(&self) -> RuleMeta {
        RuleMeta { grammar: Grammar::Style, name: "display-inline" }
    }

    fn visit(&self, doc: &Document, node: Node<'_>, sink: &mut RuleSink) -> Result<(), Error> {
        if node.kind() != "declaration"
            || document::declaration_property(doc, node) != Some("display")
        {
            return Ok(());
        }

        for value in document::declaration_values(node) {
            let text = doc.node_text(value);
            if text != "inline" && text != "inline-block" {
                continue;
            }
            sink.add_result(Diagnostic {
                advice: Some("lay the children out with flex instead".to_string()),
                description: format!("display: {text} is not supported"),
                fixable: false,
                name: "display-inline",
                severity: Severity::Error,
                span: Some(doc.span(node)),
                subname: text.to_string(),
            });
        }
        Ok(())
    }
}
