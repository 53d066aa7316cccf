//! DocumentParser facade: three grammars behind one node surface.
//!
//! The rule engine never special-cases by grammar beyond dispatch; everything
//! it needs from a tree (kind, children, spans, text, and the per-grammar
//! accessors below) comes through this module.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use tree_sitter::{Language, Node, Parser, Tree};

use crate::error::Error;
use crate::types::Span;

/// Grammar tag of a source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    /// JSON configuration (`.json`).
    Config,
    /// Markup documents (`.wxml`).
    Markup,
    /// Style sheets (`.wxss`).
    Style,
}

impl Grammar {
    /// Map a file extension to its grammar.
    pub fn for_path(path: &Path) -> Option<Self> {
        let ext = path.extension().and_then(|e| return e.to_str())?;
        return match ext {
            "json" => Some(Grammar::Config),
            "wxml" => Some(Grammar::Markup),
            "wxss" => Some(Grammar::Style),
            _ => None,
        };
    }

    fn language(self) -> Language {
        return match self {
            Grammar::Config => tree_sitter_json::LANGUAGE.into(),
            Grammar::Markup => tree_sitter_html::LANGUAGE.into(),
            Grammar::Style => tree_sitter_css::LANGUAGE.into(),
        };
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Grammar::Config => "config",
            Grammar::Markup => "markup",
            Grammar::Style => "style",
        };
        return write!(f, "{label}");
    }
}

/// One parsed source file: raw text, grammar tag, and the syntax tree.
/// Read-only once constructed; owned by a single analysis pass.
pub struct Document {
    /// Grammar the text was parsed with.
    pub grammar: Grammar,
    /// Path the text was read from.
    pub path: PathBuf,
    /// The raw source text.
    pub text: String,
    tree: Tree,
}

impl Document {
    /// Parse raw text with the given grammar.
    ///
    /// # Errors
    ///
    /// Returns `Error::ParseFailed` naming the grammar and the byte offset
    /// of the first syntax error. Fatal for this file only.
    pub fn parse(grammar: Grammar, path: &Path, text: String) -> Result<Self, Error> {
        let mut parser = Parser::new();
        parser
            .set_language(&grammar.language())
            .map_err(|e| Error::ParseFailed {
                file: path.to_path_buf(),
                grammar,
                offset: 0,
                reason: e.to_string(),
            })?;

        let tree = parser.parse(&text, None).ok_or_else(|| Error::ParseFailed {
            file: path.to_path_buf(),
            grammar,
            offset: 0,
            reason: "parser returned no tree".to_string(),
        })?;

        if tree.root_node().has_error() {
            return Err(Error::ParseFailed {
                file: path.to_path_buf(),
                grammar,
                offset: first_error_offset(tree.root_node()),
                reason: "syntax error".to_string(),
            });
        }

        Ok(Self {
            grammar,
            path: path.to_path_buf(),
            text,
            tree,
        })
    }

    /// Root node of the syntax tree.
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Source text covered by a node.
    pub fn node_text(&self, node: Node<'_>) -> &str {
        node.utf8_text(self.text.as_bytes()).unwrap_or("")
    }

    /// Location span of a node, resolvable to line and column.
    pub fn span(&self, node: Node<'_>) -> Span {
        let position = node.start_position();
        Span {
            column: position.column.saturating_add(1),
            end: node.end_byte(),
            line: position.row.saturating_add(1),
            start: node.start_byte(),
        }
    }
}

/// Byte offset of the first error or missing node under `root`.
fn first_error_offset(root: Node<'_>) -> usize {
    for node in preorder(root) {
        if node.is_error() || node.is_missing() {
            return node.start_byte();
        }
    }
    0
}

/// Preorder traversal over a subtree. Each document pass walks the tree
/// exactly once per rule through this iterator.
pub struct Preorder<'t> {
    stack: Vec<Node<'t>>,
}

/// Iterate a subtree in preorder, `root` first.
pub fn preorder(root: Node<'_>) -> Preorder<'_> {
    Preorder { stack: vec![root] }
}

impl<'t> Iterator for Preorder<'t> {
    type Item = Node<'t>;

    fn next(&mut self) -> Option<Node<'t>> {
        let node = self.stack.pop()?;
        let mut cursor = node.walk();
        let mut children: Vec<Node<'t>> = node.children(&mut cursor).collect();
        children.reverse();
        self.stack.extend(children);
        Some(node)
    }
}

// ── Markup ─────────────────────────────────────────────────────────────

/// Tag name of a markup `element` node.
pub fn element_name<'d>(doc: &'d Document, element: Node<'_>) -> Option<&'d str> {
    let tag = opening_tag(element)?;
    let mut cursor = tag.walk();
    for part in tag.children(&mut cursor) {
        if part.kind() == "tag_name" {
            return Some(doc.node_text(part));
        }
    }
    None
}

/// Attribute mapping of a markup `element` node. Valueless attributes map
/// to `None`. Values may be template expressions; they are returned as
/// written, never evaluated.
pub fn element_attributes(doc: &Document, element: Node<'_>) -> BTreeMap<String, Option<String>> {
    let mut attributes = BTreeMap::new();
    let Some(tag) = opening_tag(element) else {
        return attributes;
    };

    let mut cursor = tag.walk();
    for part in tag.children(&mut cursor) {
        if part.kind() != "attribute" {
            continue;
        }
        let mut name = None;
        let mut value = None;
        let mut inner = part.walk();
        for piece in part.children(&mut inner) {
            match piece.kind() {
                "attribute_name" => name = Some(doc.node_text(piece).to_string()),
                "attribute_value" => value = Some(doc.node_text(piece).to_string()),
                "quoted_attribute_value" => value = Some(unquote_attribute(doc, piece)),
                _ => {}
            }
        }
        if let Some(name) = name {
            attributes.insert(name, value);
        }
    }
    attributes
}

/// The `start_tag` or `self_closing_tag` child of an element.
fn opening_tag(element: Node<'_>) -> Option<Node<'_>> {
    if element.kind() != "element" {
        return None;
    }
    let mut cursor = element.walk();
    element
        .children(&mut cursor)
        .find(|c| c.kind() == "start_tag" || c.kind() == "self_closing_tag")
}

/// Inner text of a `quoted_attribute_value`, quotes stripped.
fn unquote_attribute(doc: &Document, quoted: Node<'_>) -> String {
    let mut cursor = quoted.walk();
    for inner in quoted.children(&mut cursor) {
        if inner.kind() == "attribute_value" {
            return doc.node_text(inner).to_string();
        }
    }
    String::new()
}

// ── Style ──────────────────────────────────────────────────────────────

/// Property name of a style `declaration` node.
pub fn declaration_property<'d>(doc: &'d Document, declaration: Node<'_>) -> Option<&'d str> {
    let mut cursor = declaration.walk();
    declaration
        .children(&mut cursor)
        .find(|c| c.kind() == "property_name")
        .map(|c| doc.node_text(c))
}

/// Value nodes of a style `declaration`, property name and punctuation
/// excluded.
pub fn declaration_values(declaration: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = declaration.walk();
    declaration
        .children(&mut cursor)
        .filter(|c| c.is_named() && c.kind() != "property_name")
        .collect()
}

/// Raw value text of a style `declaration`: everything after the colon,
/// trailing semicolon trimmed.
pub fn declaration_value_text(doc: &Document, declaration: Node<'_>) -> String {
    let text = doc.node_text(declaration);
    match text.split_once(':') {
        Some((_, value)) => value.trim_end_matches(';').trim().to_string(),
        None => String::new(),
    }
}

/// Import targets of a style document, quotes stripped, in source order.
pub fn style_imports(doc: &Document) -> Vec<String> {
    let mut targets = Vec::new();
    for node in preorder(doc.root()) {
        if node.kind() != "import_statement" {
            continue;
        }
        for inner in preorder(node) {
            if inner.kind() == "string_value" {
                let raw = doc.node_text(inner);
                targets.push(raw.trim_matches(['"', '\'']).to_string());
                break;
            }
        }
    }
    targets
}

// ── Config ─────────────────────────────────────────────────────────────

/// The top-level object of a config document, if the document is one.
pub fn root_object(doc: &Document) -> Option<Node<'_>> {
    let root = doc.root();
    let mut cursor = root.walk();
    root.named_children(&mut cursor).find(|c| c.kind() == "object")
}

/// The `pair` children of a config `object` node.
pub fn object_pairs(object: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = object.walk();
    object
        .children(&mut cursor)
        .filter(|c| c.kind() == "pair")
        .collect()
}

/// Key of a config `pair` node, quotes stripped.
pub fn pair_key(doc: &Document, pair: Node<'_>) -> Option<String> {
    let key = pair.child_by_field_name("key")?;
    Some(string_content(doc, key).unwrap_or_default())
}

/// Value node of a config `pair`.
pub fn pair_value(pair: Node<'_>) -> Option<Node<'_>> {
    pair.child_by_field_name("value")
}

/// Inner text of a JSON `string` node. `Some("")` for the empty string,
/// `None` when the node is not a string.
pub fn string_content(doc: &Document, node: Node<'_>) -> Option<String> {
    if node.kind() != "string" {
        return None;
    }
    let mut cursor = node.walk();
    let content = node
        .children(&mut cursor)
        .find(|c| c.kind() == "string_content")
        .map(|c| doc.node_text(c).to_string());
    Some(content.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn parse(grammar: Grammar, text: &str) -> Document {
        Document::parse(grammar, Path::new("test.src"), text.to_string()).expect("fixture parses")
    }

    #[test]
    fn grammar_by_extension() {
        assert_eq!(Grammar::for_path(Path::new("a/b.wxml")), Some(Grammar::Markup));
        assert_eq!(Grammar::for_path(Path::new("a/b.wxss")), Some(Grammar::Style));
        assert_eq!(Grammar::for_path(Path::new("a/b.json")), Some(Grammar::Config));
        assert_eq!(Grammar::for_path(Path::new("a/b.js")), None);
    }

    #[test]
    fn malformed_config_reports_offset() {
        let result = Document::parse(
            Grammar::Config,
            Path::new("broken.json"),
            "{\"a\": }".to_string(),
        );
        let Err(Error::ParseFailed { grammar, offset, .. }) = result else {
            panic!("expected ParseFailed");
        };
        assert_eq!(grammar, Grammar::Config);
        assert!(offset <= "{\"a\": }".len());
    }

    #[test]
    fn markup_element_attributes() {
        let doc = parse(
            Grammar::Markup,
            "<scroll-view scroll-y=\"true\" bounces></scroll-view>",
        );
        let element = preorder(doc.root())
            .find(|n| n.kind() == "element")
            .expect("element present");
        assert_eq!(element_name(&doc, element), Some("scroll-view"));

        let attributes = element_attributes(&doc, element);
        assert_eq!(attributes.get("scroll-y"), Some(&Some("true".to_string())));
        assert_eq!(attributes.get("bounces"), Some(&None));
    }

    #[test]
    fn style_declaration_surface() {
        let doc = parse(Grammar::Style, ".a { width: calc(100% - 10px); }");
        let declaration = preorder(doc.root())
            .find(|n| n.kind() == "declaration")
            .expect("declaration present");
        assert_eq!(declaration_property(&doc, declaration), Some("width"));
        assert_eq!(declaration_value_text(&doc, declaration), "calc(100% - 10px)");
    }

    #[test]
    fn style_imports_resolve_strings() {
        let doc = parse(Grammar::Style, "@import \"shared.wxss\";\n.a { color: red; }");
        assert_eq!(style_imports(&doc), vec!["shared.wxss".to_string()]);
    }

    #[test]
    fn config_pair_surface() {
        let doc = parse(Grammar::Config, "{\"renderer\": \"skyline\", \"n\": 1}");
        let object = root_object(&doc).expect("root object");
        let pairs = object_pairs(object);
        assert_eq!(pairs.len(), 2);

        let first = pairs.first().copied().expect("first pair");
        assert_eq!(pair_key(&doc, first), Some("renderer".to_string()));
        let value = pair_value(first).expect("value node");
        assert_eq!(string_content(&doc, value), Some("skyline".to_string()));
    }
}
