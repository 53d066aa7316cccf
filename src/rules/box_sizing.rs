use tree_sitter::Node;

use crate::document::{self, Document, Grammar};
use crate::engine::{Rule, RuleMeta, RuleSink};
use crate::error::Error;
use crate::types::{Diagnostic, Edit, Severity};

/// Skyline lays every box out with border-box sizing; `content-box` is
/// silently ignored, so the declaration is rewritten.
pub struct BoxSizing;

impl Rule for BoxSizing {
    fn meta(&self) -> RuleMeta {
        RuleMeta { grammar: Grammar::Style, name: "box-sizing" }
    }

    fn visit(&self, doc: &Document, node: Node<'_>, sink: &mut RuleSink) -> Result<(), Error> {
        if node.kind() != "declaration"
            || document::declaration_property(doc, node) != Some("box-sizing")
        {
            return Ok(());
        }

        for value in document::declaration_values(node) {
            if doc.node_text(value) != "content-box" {
                continue;
            }
            let span = doc.span(value);
            sink.add_result(Diagnostic {
                advice: Some("skyline always sizes with border-box".to_string()),
                description: "box-sizing: content-box is not supported".to_string(),
                fixable: true,
                name: "box-sizing",
                severity: Severity::Warn,
                span: Some(doc.span(node)),
                subname: "content-box".to_string(),
            });
            sink.add_edit(Edit {
                end: span.end,
                replacement: "border-box".to_string(),
                rule: "box-sizing",
                start: span.start,
            });
        }
        Ok(())
    }
}
