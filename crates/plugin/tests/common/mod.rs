//! A tiny bundler host for driving the plugin end to end.
//!
//! It follows `import '...';` statements, loads each module once, concatenates
//! modules dependencies-first with their imports stripped, and names every
//! entry chunk after a CRC32 of its code, the way a content-hashing bundler
//! would.

use exn::ResultExt;
use htmlentry_plugin::error::{ErrorKind, Result};
use htmlentry_plugin::{ModuleId, OutputBundle, OutputMap, Plugin, SourceId};
use htmlentry_storage::backend::{MockBackend, StorageBackend};
use htmlentry_storage::normalize_path;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::LazyLock;

pub const PREFIX: &str = "<!DOCTYPE html><html lang=\"en\"><head>\n    <meta charset=\"UTF-8\">\n    <title>Index</title>\n</head><body>";
pub const SUFFIX: &str = "</body></html>";

static IMPORT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"import '((?:[^'\\]|\\.)*)';\n?").unwrap());
static ESCAPE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\\(.)").unwrap());

pub fn page(body: &str) -> String {
    format!("{PREFIX}{body}{SUFFIX}")
}

struct Module {
    code: String,
    imports: Vec<ModuleId>,
}

pub struct Host<'a> {
    pub plugin: &'a dyn Plugin,
    pub backend: &'a MockBackend,
}
impl Host<'_> {
    /// Runs one build over `entries` and returns the output map after the
    /// plugin's `generate_bundle` hook.
    pub async fn build(&self, entries: &[&str]) -> Result<OutputMap> {
        self.plugin.build_start();
        let mut modules = HashMap::new();
        let mut outputs = OutputMap::new();
        for entry in entries {
            let entry = ModuleId::from(*entry);
            self.load_graph(&entry, &mut modules).await?;
            let mut order = Vec::new();
            postorder(&entry, &modules, &mut HashSet::new(), &mut order);
            let code = order
                .iter()
                .map(|id| modules[id].code.as_str())
                .filter(|code| !code.is_empty())
                .collect::<Vec<_>>()
                .join("\n");
            let stem = match &entry {
                ModuleId::Source(source) => source.path().file_stem().map(|s| s.to_string_lossy().into_owned()),
                ModuleId::Inline(_) => None,
            };
            let file_name = format!("{}-{:08x}.js", stem.unwrap_or_default(), crc32fast::hash(code.as_bytes()));
            outputs.insert(
                file_name.clone(),
                OutputBundle {
                    file_name,
                    code,
                    facade_module_id: Some(entry),
                    is_entry: true,
                },
            );
        }
        self.plugin.generate_bundle(&mut outputs);
        Ok(outputs)
    }

    async fn load_graph(&self, entry: &ModuleId, modules: &mut HashMap<ModuleId, Module>) -> Result<()> {
        let mut pending = vec![entry.clone()];
        while let Some(id) = pending.pop() {
            if modules.contains_key(&id) {
                continue;
            }
            let source = self.load(&id).await?;
            let mut imports = Vec::new();
            for capture in IMPORT.captures_iter(&source) {
                let specifier = ESCAPE.replace_all(&capture[1], "$1");
                let resolved = match self.plugin.resolve_id(&specifier, Some(&id)) {
                    Some(resolved) => resolved,
                    None => resolve_relative(&id, &specifier)?,
                };
                pending.push(resolved.clone());
                imports.push(resolved);
            }
            let code = IMPORT.replace_all(&source, "").trim().to_string();
            modules.insert(id, Module { code, imports });
        }
        Ok(())
    }

    async fn load(&self, id: &ModuleId) -> Result<String> {
        if let Some(code) = self.plugin.load(id).await? {
            return Ok(code);
        }
        let ModuleId::Source(source) = id else {
            exn::bail!(ErrorKind::Load(id.to_string().into()));
        };
        self.backend
            .read_to_string(source.path())
            .await
            .or_raise(|| ErrorKind::Load(source.path().to_path_buf()))
    }
}

fn resolve_relative(importer: &ModuleId, specifier: &str) -> Result<ModuleId> {
    let base = match importer {
        ModuleId::Source(source) => source.path().parent().unwrap_or(Path::new("/")).to_path_buf(),
        ModuleId::Inline(inline) => inline.owner.path().parent().unwrap_or(Path::new("/")).to_path_buf(),
    };
    let path = normalize_path(base.join(specifier)).or_raise(|| ErrorKind::Load(specifier.into()))?;
    Ok(ModuleId::Source(SourceId::from(path)))
}

/// Dependencies first, in import order, each module once.
fn postorder(id: &ModuleId, modules: &HashMap<ModuleId, Module>, visited: &mut HashSet<ModuleId>, order: &mut Vec<ModuleId>) {
    if !visited.insert(id.clone()) {
        return;
    }
    let Some(module) = modules.get(id) else {
        return;
    };
    for import in &module.imports {
        postorder(import, modules, visited, order);
    }
    order.push(id.clone());
}
