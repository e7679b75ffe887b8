//! Mutable HTML document tree.

use ego_tree::{NodeId, NodeRef};
use html5ever::{QualName, local_name, ns};
use scraper::node::{Element, Text};
use scraper::{ElementRef, Html, Node};
use tendril::StrTendril;
use tracing::instrument;

use crate::consts;
use crate::script::Script;

/// A parsed HTML document.
///
/// The tree is an arena of nodes addressed by [`NodeId`]; removing a node
/// detaches it from its parent but leaves it in the arena, so handles never
/// dangle. The document is the only owner of its tree.
#[derive(Debug, Clone)]
pub struct Document {
    html: Html,
}
impl Document {
    /// Parses a full HTML document.
    ///
    /// Parsing never fails: the HTML5 tree builder recovers from malformed
    /// input and synthesizes missing `<html>`, `<head>` and `<body>` elements.
    #[instrument(skip(html), fields(html_size = html.len()))]
    pub fn parse(html: &str) -> Self {
        Self { html: Html::parse_document(html) }
    }

    /// Returns every `<script>` element, in document order.
    ///
    /// Walks the whole tree depth-first, so scripts nested anywhere (inside
    /// `<head>`, or deep inside `<body>`) are found, not only direct children.
    pub fn scripts(&self) -> Vec<NodeId> {
        self.html
            .tree
            .root()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|element| consts::SCRIPT_SELECTOR.matches(element))
            .map(|element| element.id())
            .collect()
    }

    /// Removes every `<script>` element from the tree and describes each one.
    ///
    /// The returned scripts are in document order; that order is the
    /// evaluation order of the generated imports. Scripts with neither a `src`
    /// nor text content are removed too.
    #[instrument(skip(self))]
    pub fn extract_scripts(&mut self) -> Vec<Script> {
        let located = self.scripts();
        let mut scripts = Vec::with_capacity(located.len());
        for (index, id) in located.into_iter().enumerate() {
            let Some(node) = self.html.tree.get(id) else {
                continue;
            };
            let script = Self::describe(index, node);
            if let Some(mut node) = self.html.tree.get_mut(id) {
                node.detach();
            }
            tracing::trace!(?script, "extracted script");
            scripts.push(script);
        }
        scripts
    }

    fn describe(index: usize, node: NodeRef<'_, Node>) -> Script {
        // An empty `src` attribute is treated as absent.
        let src = node
            .value()
            .as_element()
            .and_then(|element| element.attr(consts::SRC_ATTRIBUTE))
            .filter(|src| !src.is_empty());
        if let Some(src) = src {
            return Script::External { index, src: src.to_string() };
        }
        match node.first_child().and_then(|child| child.value().as_text()) {
            Some(text) => Script::Inline { index, text: text.text.to_string() },
            None => Script::Empty { index },
        }
    }

    /// Returns the first `<body>` element in document order.
    pub fn body(&self) -> Option<NodeId> {
        self.html
            .tree
            .root()
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|element| consts::BODY_SELECTOR.matches(element))
            .map(|element| element.id())
    }

    /// Appends `<script>{code}</script>` to the first `<body>` and serializes
    /// the whole document.
    ///
    /// Unless `retain` is set, the appended script is detached again once the
    /// document has been serialized, leaving the tree exactly as extraction
    /// left it. Returns `None` when the document has no `<body>` (e.g. a
    /// `<frameset>` document).
    #[instrument(skip(self, code), fields(code_size = code.len()))]
    pub fn render_with_script(&mut self, code: &str, retain: bool) -> Option<String> {
        let body = self.body()?;
        let injected = {
            let mut body = self.html.tree.get_mut(body)?;
            let name = QualName::new(None, ns!(html), local_name!("script"));
            let mut script = body.append(Node::Element(Element::new(name, Vec::new())));
            script.append(Node::Text(Text { text: StrTendril::from(code) }));
            script.id()
        };
        let html = self.html();
        if !retain && let Some(mut script) = self.html.tree.get_mut(injected) {
            script.detach();
        }
        Some(html)
    }

    /// Serializes the document, including its doctype.
    pub fn html(&self) -> String {
        self.html.html()
    }
}
