use tree_sitter::Node;

use crate::document::{self, Document, Grammar};
use crate::engine::{Rule, RuleMeta, RuleSink};
use crate::error::Error;
use crate::types::{Diagnostic, Edit, Severity};

/// A unit config should opt into the skyline renderer. A wrong value is
/// replaced; a missing declaration is inserted. Component configs (those
/// declaring `"component": true`) inherit from their host and are skipped.
pub struct RendererSkyline;

impl Rule for RendererSkyline {
    fn meta(&self) -> RuleMeta {
        RuleMeta { grammar: Grammar::Config, name: "renderer-skyline" }
    }

    fn visit(&self, doc: &Document, node: Node<'_>, sink: &mut RuleSink) -> Result<(), Error> {
        // The whole check works off the top-level object, so only the
        // document node is inspected.
        if node.kind() != "document" {
            return Ok(());
        }
        let Some(object) = document::root_object(doc) else {
            return Ok(());
        };

        let pairs = document::object_pairs(object);
        let mut renderer = None;
        for pair in &pairs {
            match document::pair_key(doc, *pair).as_deref() {
                Some("component") => {
                    if document::pair_value(*pair).is_some_and(|v| v.kind() == "true") {
                        return Ok(());
                    }
                },
                Some("renderer") => renderer = document::pair_value(*pair),
                _ => {},
            }
        }

        match renderer {
            Some(value) => {
                if document::string_content(doc, value).as_deref() == Some("skyline") {
                    return Ok(());
                }
                let span = doc.span(value);
                sink.add_result(Diagnostic {
                    advice: Some("set \"renderer\": \"skyline\" to render with skyline".to_string()),
                    description: "unit does not target the skyline renderer".to_string(),
                    fixable: true,
                    name: "renderer-skyline",
                    severity: Severity::Warn,
                    span: Some(span),
                    subname: "wrong-value".to_string(),
                });
                sink.add_edit(Edit {
                    end: span.end,
                    replacement: "\"skyline\"".to_string(),
                    rule: "renderer-skyline",
                    start: span.start,
                });
            },
            None => {
                sink.add_result(Diagnostic {
                    advice: Some("declare \"renderer\": \"skyline\" in the unit config".to_string()),
                    description: "unit config does not declare a renderer".to_string(),
                    fixable: true,
                    name: "renderer-skyline",
                    severity: Severity::Info,
                    span: Some(doc.span(object)),
                    subname: "missing".to_string(),
                });
                let insertion = if pairs.is_empty() {
                    "\n  \"renderer\": \"skyline\"\n".to_string()
                } else {
                    "\n  \"renderer\": \"skyline\",".to_string()
                };
                // Insert just after the object's opening brace.
                let offset = doc.span(object).start.saturating_add(1);
                sink.add_edit(Edit {
                    end: offset,
                    replacement: insertion,
                    rule: "renderer-skyline",
                    start: offset,
                });
            },
        }
        Ok(())
    }
}
