//! Per-build plugin state.

use htmlentry_config::Injection;
use std::cell::RefCell;
use std::collections::HashMap;
use tracing::instrument;

use crate::entry::{Extraction, ParsedEntry};
use crate::id::{InlineScriptId, SourceId};

#[derive(Debug, Default)]
struct State {
    entries: HashMap<SourceId, ParsedEntry>,
    inline_scripts: HashMap<InlineScriptId, String>,
    /// Inline scripts each entry produced, in document order.
    owners: HashMap<SourceId, Vec<InlineScriptId>>,
}

/// Caches shared by every hook of one plugin instance.
///
/// Holds the parsed entries, the inline script texts and the index from each
/// entry to the inline scripts it produced. An entry and its inline scripts are
/// always added and removed together, in one step.
///
/// Every method borrows the state only for its own duration and never across
/// an `.await`, so hooks may interleave freely on a single-threaded executor.
/// The session is not `Sync`; the parsed documents are not `Send` either.
#[derive(Debug, Default)]
pub struct Session {
    state: RefCell<State>,
}
impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generated code of a cached entry.
    pub fn cached_code(&self, source: &SourceId) -> Option<String> {
        self.state.borrow().entries.get(source).map(|entry| entry.code.clone())
    }

    pub fn contains_entry(&self, source: &SourceId) -> bool {
        self.state.borrow().entries.contains_key(source)
    }

    /// Text of an inline script.
    pub fn inline_script(&self, id: &InlineScriptId) -> Option<String> {
        self.state.borrow().inline_scripts.get(id).cloned()
    }

    pub fn contains_inline(&self, id: &InlineScriptId) -> bool {
        self.state.borrow().inline_scripts.contains_key(id)
    }

    /// Stores an extraction and returns the code now cached for `source`.
    ///
    /// When another load of the same source committed first, that entry is
    /// kept and `extraction` is dropped whole.
    #[instrument(skip_all, fields(source = %source))]
    pub fn commit(&self, source: SourceId, extraction: Extraction) -> String {
        let mut state = self.state.borrow_mut();
        if let Some(existing) = state.entries.get(&source) {
            tracing::debug!("entry already committed by a concurrent load; discarding extraction");
            return existing.code.clone();
        }
        let Extraction { entry, inline_scripts } = extraction;
        let code = entry.code.clone();
        let mut owned = Vec::with_capacity(inline_scripts.len());
        for (id, text) in inline_scripts {
            owned.push(id.clone());
            state.inline_scripts.insert(id, text);
        }
        if !owned.is_empty() {
            state.owners.insert(source.clone(), owned);
        }
        state.entries.insert(source, entry);
        code
    }

    /// Injects `code` into the cached document of `source` and serializes it.
    ///
    /// Returns `None` when nothing is cached for `source` or its document has
    /// no `<body>`.
    #[instrument(skip_all, fields(source = %source, code_size = code.len(), ?injection))]
    pub fn render(&self, source: &SourceId, code: &str, injection: Injection) -> Option<String> {
        let mut state = self.state.borrow_mut();
        let entry = state.entries.get_mut(source)?;
        let html = entry.document.render_with_script(code, injection == Injection::Retain);
        if html.is_none() {
            tracing::debug!("cached document has no body");
        }
        html
    }

    /// Forgets `source` and every inline script it produced.
    ///
    /// Returns whether anything was cached. Invalidating an unknown source is a
    /// no-op.
    #[instrument(skip_all, fields(source = %source))]
    pub fn invalidate(&self, source: &SourceId) -> bool {
        let mut state = self.state.borrow_mut();
        let entry = state.entries.remove(source);
        let owned = state.owners.remove(source).unwrap_or_default();
        for id in &owned {
            state.inline_scripts.remove(id);
        }
        let cached = entry.is_some() || !owned.is_empty();
        if cached {
            tracing::debug!(inline = owned.len(), "invalidated html entry");
        }
        cached
    }

    /// Drops everything.
    pub fn reset(&self) {
        let mut state = self.state.borrow_mut();
        tracing::debug!(entries = state.entries.len(), inline = state.inline_scripts.len(), "resetting session");
        *state = State::default();
    }

    pub fn entry_count(&self) -> usize {
        self.state.borrow().entries.len()
    }

    pub fn inline_count(&self) -> usize {
        self.state.borrow().inline_scripts.len()
    }

    /// Inline scripts recorded for `source`, in document order.
    pub fn owned_by(&self, source: &SourceId) -> Vec<InlineScriptId> {
        self.state.borrow().owners.get(source).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "<!DOCTYPE html><html><head></head><body><script>one();</script><script src=\"./two.js\"></script><script>three();</script></body></html>";

    fn committed(session: &Session, path: &str) -> SourceId {
        let source = SourceId::from(path);
        session.commit(source.clone(), Extraction::new(&source, PAGE));
        source
    }

    #[test]
    fn test_commit_populates_everything_together() {
        let session = Session::new();
        let source = committed(&session, "/src/index.html");
        assert!(session.contains_entry(&source));
        assert_eq!(session.entry_count(), 1);
        assert_eq!(session.inline_count(), 2);
        let owned = session.owned_by(&source);
        assert_eq!(owned.iter().map(|id| id.index).collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(session.inline_script(&owned[0]).as_deref(), Some("one();"));
        assert_eq!(session.inline_script(&owned[1]).as_deref(), Some("three();"));
        assert!(session.cached_code(&source).unwrap().contains("import './two.js';"));
    }

    #[test]
    fn test_first_commit_wins() {
        let session = Session::new();
        let source = SourceId::from("/src/index.html");
        let first = session.commit(source.clone(), Extraction::new(&source, PAGE));
        let other = "<html><body><script>other();</script></body></html>";
        let second = session.commit(source.clone(), Extraction::new(&source, other));
        assert_eq!(first, second);
        assert_eq!(session.inline_count(), 2);
        assert_eq!(session.owned_by(&source).len(), 2);
        assert!(!session.state.borrow().inline_scripts.values().any(|text| text == "other();"));
    }

    #[test]
    fn test_invalidate_cascades() {
        let session = Session::new();
        let source = committed(&session, "/src/index.html");
        let other = committed(&session, "/src/other.html");
        let owned = session.owned_by(&source);

        assert!(session.invalidate(&source));
        assert!(!session.contains_entry(&source));
        assert!(session.cached_code(&source).is_none());
        assert!(session.owned_by(&source).is_empty());
        assert!(owned.iter().all(|id| !session.contains_inline(id)));
        // Other entries are untouched.
        assert!(session.contains_entry(&other));
        assert_eq!(session.inline_count(), 2);
        // Idempotent.
        assert!(!session.invalidate(&source));
        assert!(!session.invalidate(&SourceId::from("/src/never.html")));
    }

    #[test]
    fn test_render_restores_document() {
        let session = Session::new();
        let source = committed(&session, "/src/index.html");
        let first = session.render(&source, "bundle();", Injection::Restore).unwrap();
        assert_eq!(first, "<!DOCTYPE html><html><head></head><body><script>bundle();</script></body></html>");
        let second = session.render(&source, "bundle();", Injection::Restore).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_render_retain_accumulates() {
        let session = Session::new();
        let source = committed(&session, "/src/index.html");
        session.render(&source, "a();", Injection::Retain).unwrap();
        let html = session.render(&source, "b();", Injection::Retain).unwrap();
        assert!(html.contains("<script>a();</script><script>b();</script></body>"));
    }

    #[test]
    fn test_render_missing_entry_or_body() {
        let session = Session::new();
        assert!(session.render(&SourceId::from("/src/index.html"), "x", Injection::Restore).is_none());
        let source = SourceId::from("/src/frames.html");
        let frames = "<!DOCTYPE html><html><head></head><frameset></frameset></html>";
        session.commit(source.clone(), Extraction::new(&source, frames));
        assert!(session.render(&source, "x", Injection::Restore).is_none());
    }

    #[test]
    fn test_reset() {
        let session = Session::new();
        committed(&session, "/src/index.html");
        session.reset();
        assert_eq!(session.entry_count(), 0);
        assert_eq!(session.inline_count(), 0);
    }
}
