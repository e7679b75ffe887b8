//! HTML files as bundler entry points.
//!
//! [`HtmlEntryPlugin`] hands a bundler the `<script>` elements of an HTML file
//! as ordinary module imports, then writes the finished bundle back into the
//! document's `<body>`. The host talks to it through the [`Plugin`] hooks.

mod entry;
pub mod error;
mod hooks;
mod id;
mod output;
mod plugin;
mod session;

pub use crate::entry::{Extraction, ParsedEntry};
pub use crate::hooks::Plugin;
pub use crate::id::{INLINE_PREFIX, InlineScriptId, ModuleId, SourceId};
pub use crate::output::{OutputBundle, OutputMap};
pub use crate::plugin::HtmlEntryPlugin;
pub use crate::session::Session;
