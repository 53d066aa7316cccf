use tree_sitter::Node;

use crate::document::{self, Document, Grammar};
use crate::engine::{Rule, RuleMeta, RuleSink};
use crate::error::Error;
use crate::types::{Diagnostic, Severity};

/// `scroll-view` scrolls nothing under skyline unless an axis is declared,
/// and cannot scroll on both axes at once.
pub struct ScrollView;

impl Rule for ScrollView {
    fn meta(&self) -> RuleMeta {
        RuleMeta { grammar: Grammar::Markup, name: "scroll-view" }
    }

    fn visit(&self, doc: &Document, node: Node<'_>, sink: &mut RuleSink) -> Result<(), Error> {
        if node.kind() != "element" || document::element_name(doc, node) != Some("scroll-view") {
            return Ok(());
        }

        // Attribute values may be template expressions, so presence is the
        // only reliable signal.
        let attributes = document::element_attributes(doc, node);
        let horizontal = attributes.contains_key("scroll-x");
        let vertical = attributes.contains_key("scroll-y");

        if !horizontal && !vertical {
            sink.add_result(Diagnostic {
                advice: Some("declare scroll-x or scroll-y so the scrolling axis is explicit".to_string()),
                description: "scroll-view must declare its scroll direction".to_string(),
                fixable: false,
                name: "scroll-view",
                severity: Severity::Warn,
                span: Some(doc.span(node)),
                subname: "missing-direction".to_string(),
            });
        }
        if horizontal && vertical {
            sink.add_result(Diagnostic {
                advice: Some("split into nested scroll-views, one axis each".to_string()),
                description: "scroll-view cannot scroll on both axes".to_string(),
                fixable: false,
                name: "scroll-view",
                severity: Severity::Warn,
                span: Some(doc.span(node)),
                subname: "both-directions".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::run_rule;

    #[test]
    fn missing_direction_is_flagged() {
        let analysis = run_rule(
            ScrollView,
            Grammar::Markup,
            "<scroll-view class=\"list\"><view>item</view></scroll-view>",
        );
        assert_eq!(analysis.diagnostics.len(), 1);
        let finding = analysis.diagnostics.first().unwrap();
        assert_eq!(finding.subname, "missing-direction");
        assert!(finding.span.is_some());
    }

    #[test]
    fn both_directions_are_flagged() {
        let analysis = run_rule(
            ScrollView,
            Grammar::Markup,
            "<scroll-view scroll-x=\"true\" scroll-y=\"true\"></scroll-view>",
        );
        assert_eq!(analysis.diagnostics.len(), 1);
        assert_eq!(analysis.diagnostics.first().unwrap().subname, "both-directions");
    }

    #[test]
    fn single_axis_is_clean() {
        let analysis = run_rule(
            ScrollView,
            Grammar::Markup,
            "<scroll-view scroll-y=\"true\"><view>item</view></scroll-view>",
        );
        assert!(analysis.diagnostics.is_empty());
    }
}
