//! The seam between a bundler and its plugins.

use async_trait::async_trait;

use crate::error::Result;
use crate::id::{ModuleId, SourceId};
use crate::output::OutputMap;

/// Build hooks a bundler host calls, in roughly this order: [`build_start`],
/// then [`resolve_id`] and [`load`] for every module it discovers,
/// [`generate_bundle`] once all chunks are rendered, and [`close`] at the end.
/// [`watch_change`] may be called between builds in watch mode.
///
/// Every hook except [`name`] does nothing by default.
///
/// [`build_start`]: Plugin::build_start
/// [`resolve_id`]: Plugin::resolve_id
/// [`load`]: Plugin::load
/// [`generate_bundle`]: Plugin::generate_bundle
/// [`close`]: Plugin::close
/// [`watch_change`]: Plugin::watch_change
/// [`name`]: Plugin::name
#[async_trait(?Send)]
pub trait Plugin {
    fn name(&self) -> &str;

    fn build_start(&self) {}

    /// Claims `candidate` as a module of this plugin, or declines with `None`
    /// so the host resolves it itself.
    fn resolve_id(&self, _candidate: &str, _importer: Option<&ModuleId>) -> Option<ModuleId> {
        None
    }

    /// Source code of `id`, or `None` when this plugin does not provide it.
    async fn load(&self, _id: &ModuleId) -> Result<Option<String>> {
        Ok(None)
    }

    fn generate_bundle(&self, _bundle: &mut OutputMap) {}

    fn watch_change(&self, _id: &SourceId) {}

    fn close(&self) {}
}
