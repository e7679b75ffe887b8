use async_trait::async_trait;
use exn::ResultExt;
use htmlentry_config::Config;
use htmlentry_storage::BackendHandle;
use regex::Regex;
use std::collections::HashSet;
use tracing::instrument;

use crate::entry::Extraction;
use crate::error::{ErrorKind, Result};
use crate::hooks::Plugin;
use crate::id::{ModuleId, SourceId};
use crate::output::OutputMap;
use crate::session::Session;

/// Lets a bundler build from HTML files.
///
/// Loading an HTML entry yields module code importing each of its `<script>`
/// elements; inline scripts are served back by [`resolve_id`](Plugin::resolve_id)
/// and [`load`](Plugin::load). Once the bundle is generated, each entry chunk
/// is written into the `<body>` of its document and renamed after the HTML
/// file.
///
/// # Examples
///
/// ```
/// use htmlentry_config::Config;
/// use htmlentry_plugin::{HtmlEntryPlugin, ModuleId, Plugin};
/// use htmlentry_storage::backend::LocalBackend;
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dir = tempfile::tempdir()?;
/// let page = dir.path().join("index.html");
/// std::fs::write(&page, "<html><body><script src=\"./main.js\"></script></body></html>")?;
///
/// let backend = Arc::new(LocalBackend::new("local", dir.path())?);
/// let plugin = HtmlEntryPlugin::new(Config::default(), backend)?;
/// let code = plugin.load(&ModuleId::from(page.to_str().unwrap())).await?;
/// assert_eq!(code.as_deref(), Some("import './main.js';"));
/// # Ok(())
/// # }
/// ```
pub struct HtmlEntryPlugin {
    config: Config,
    entry_pattern: Regex,
    backend: BackendHandle,
    session: Session,
}
impl HtmlEntryPlugin {
    pub const NAME: &str = "html-entry";

    pub fn new(config: Config, backend: BackendHandle) -> Result<Self> {
        let entry_pattern = config.entry_regex().or_raise(|| ErrorKind::Config)?;
        Ok(Self {
            config,
            entry_pattern,
            backend,
            session: Session::new(),
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether `source` names an HTML entry.
    pub fn is_entry(&self, source: &SourceId) -> bool {
        self.entry_pattern.is_match(&source.path().to_string_lossy())
    }

    async fn load_entry(&self, source: &SourceId) -> Result<String> {
        if let Some(code) = self.session.cached_code(source) {
            tracing::trace!("entry cache hit");
            return Ok(code);
        }
        tracing::trace!(backend = self.backend.name(), "entry cache miss");
        let html = self
            .backend
            .read_to_string(source.path())
            .await
            .or_raise(|| ErrorKind::Load(source.path().to_path_buf()))?;
        let extraction = Extraction::new(source, &html);
        Ok(self.session.commit(source.clone(), extraction))
    }
}

#[async_trait(?Send)]
impl Plugin for HtmlEntryPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn build_start(&self) {
        // Entries that changed were already dropped by `watch_change`.
        tracing::debug!(entries = self.session.entry_count(), "build started");
    }

    fn resolve_id(&self, candidate: &str, _importer: Option<&ModuleId>) -> Option<ModuleId> {
        match ModuleId::parse(candidate) {
            ModuleId::Inline(id) if self.session.contains_inline(&id) => Some(ModuleId::Inline(id)),
            _ => None,
        }
    }

    #[instrument(skip_all, fields(id = %id))]
    async fn load(&self, id: &ModuleId) -> Result<Option<String>> {
        match id {
            ModuleId::Inline(inline) => Ok(self.session.inline_script(inline)),
            ModuleId::Source(source) if self.is_entry(source) => self.load_entry(source).await.map(Some),
            ModuleId::Source(_) => Ok(None),
        }
    }

    #[instrument(skip_all, fields(outputs = bundle.len()))]
    fn generate_bundle(&self, bundle: &mut OutputMap) {
        let names: Vec<String> = bundle.keys().cloned().collect();
        let mut written = HashSet::new();
        for name in names {
            if written.contains(&name) {
                continue;
            }
            let Some(output) = bundle.get(&name) else {
                continue;
            };
            let Some(ModuleId::Source(source)) = &output.facade_module_id else {
                continue;
            };
            if !output.is_entry || !self.is_entry(source) {
                continue;
            }
            let Some(file_name) = source.file_name() else {
                continue;
            };
            let Some(html) = self.session.render(source, &output.code, self.config.injection) else {
                continue;
            };
            let Some(mut output) = bundle.remove(&name) else {
                continue;
            };
            output.code = html;
            output.file_name = file_name.clone();
            tracing::debug!(from = %name, to = %file_name, "wrote bundle into html entry");
            if let Some(replaced) = bundle.insert(file_name.clone(), output) {
                tracing::warn!(
                    name = %file_name,
                    replaced = ?replaced.facade_module_id,
                    "html entry output replaces an existing output of the same name"
                );
            }
            written.insert(file_name);
        }
    }

    fn watch_change(&self, id: &SourceId) {
        self.session.invalidate(id);
    }

    fn close(&self) {
        self.session.reset();
    }
}
