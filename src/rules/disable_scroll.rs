use tree_sitter::Node;

use crate::document::{self, Document, Grammar};
use crate::engine::{Rule, RuleMeta, RuleSink};
use crate::error::Error;
use crate::types::{Diagnostic, Edit, Severity};

/// Page scrolling under skyline is owned by `scroll-view`; the
/// `disableScroll` page flag has no effect and is rewritten to `false`.
pub struct DisableScroll;

impl Rule for DisableScroll {
    fn meta(&self) -> RuleMeta {
        RuleMeta { grammar: Grammar::Config, name: "disable-scroll" }
    }

    fn visit(&self, doc: &Document, node: Node<'_>, sink: &mut RuleSink) -> Result<(), Error> {
        if node.kind() != "pair"
            || document::pair_key(doc, node).as_deref() != Some("disableScroll")
        {
            return Ok(());
        }
        let Some(value) = document::pair_value(node) else {
            return Ok(());
        };
        if value.kind() != "true" {
            return Ok(());
        }

        let span = doc.span(value);
        sink.add_result(Diagnostic {
            advice: Some("skyline pages scroll through scroll-view; the flag is ignored".to_string()),
            description: "disableScroll has no effect".to_string(),
            fixable: true,
            name: "disable-scroll",
            severity: Severity::Warn,
            span: Some(doc.span(node)),
            subname: "enabled".to_string(),
        });
        sink.add_edit(Edit {
            end: span.end,
            replacement: "false".to_string(),
            rule: "disable-scroll",
            start: span.start,
        });
        Ok(())
    }
}
