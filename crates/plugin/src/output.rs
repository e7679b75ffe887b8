use std::collections::BTreeMap;

use crate::id::ModuleId;

/// One emitted chunk, as produced by the bundler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputBundle {
    pub file_name: String,
    pub code: String,
    /// Module the chunk was built from, if it was built from exactly one.
    pub facade_module_id: Option<ModuleId>,
    pub is_entry: bool,
}

/// Output chunks keyed by their file name.
pub type OutputMap = BTreeMap<String, OutputBundle>;
