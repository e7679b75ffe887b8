//! Turning an HTML source into module code.

use htmlentry_dom::{Document, Script};
use tracing::instrument;

use crate::id::{InlineScriptId, SourceId};

/// A parsed HTML entry: its document with every script removed, and the
/// generated module code that imports those scripts in document order.
#[derive(Debug, Clone)]
pub struct ParsedEntry {
    pub(crate) document: Document,
    pub code: String,
}

/// Everything one extraction produced for a single source.
///
/// Nothing is shared until the extraction is committed to a
/// [`Session`](crate::Session), so a discarded extraction leaves no trace.
#[derive(Debug)]
pub struct Extraction {
    pub entry: ParsedEntry,
    /// Inline script texts, in document order.
    pub inline_scripts: Vec<(InlineScriptId, String)>,
}
impl Extraction {
    /// Parses `html`, lifts its scripts out and generates the import code.
    ///
    /// External scripts are imported by their `src` value verbatim, the bundler
    /// resolves them. Inline scripts are imported by their [`InlineScriptId`].
    /// Empty scripts contribute nothing.
    #[instrument(skip_all, fields(source = %source, html_size = html.len()))]
    pub fn new(source: &SourceId, html: &str) -> Self {
        let mut document = Document::parse(html);
        let mut inline_scripts = Vec::new();
        let mut lines = Vec::new();
        for script in document.extract_scripts() {
            match script {
                Script::External { src, .. } => lines.push(import_line(&src)),
                Script::Inline { index, text } => {
                    let id = InlineScriptId::new(source.clone(), index);
                    lines.push(import_line(&id.to_string()));
                    inline_scripts.push((id, text));
                },
                Script::Empty { .. } => {},
            }
        }
        tracing::debug!(imports = lines.len(), inline = inline_scripts.len(), "extracted html entry");
        Self {
            entry: ParsedEntry { document, code: lines.join("\n") },
            inline_scripts,
        }
    }
}

fn import_line(target: &str) -> String {
    format!("import '{}';", target.replace('\\', "\\\\").replace('\'', "\\'"))
}
