//! Module identities.
//!
//! A bundler only speaks in strings, but inside the plugin a module is either a
//! source file or an inline script lifted out of one. Inline scripts are written
//! into generated code with a leading NUL byte, which cannot appear in a file
//! path, and parsed back into [`ModuleId::Inline`] at the hook boundary.

use derive_more::Display;
use std::fmt;
use std::path::{Path, PathBuf};

/// Prefix of an inline script identity in generated code.
pub const INLINE_PREFIX: &str = "\0inline:";

/// Identity of a source file, as handed over by the bundler.
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display("{}", _0.display())]
pub struct SourceId(PathBuf);
impl SourceId {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Base file name, with every directory stripped.
    pub fn file_name(&self) -> Option<String> {
        self.0.file_name().map(|name| name.to_string_lossy().into_owned())
    }
}
impl From<&str> for SourceId {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}
impl From<&Path> for SourceId {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}
impl From<PathBuf> for SourceId {
    fn from(path: PathBuf) -> Self {
        Self(path)
    }
}

/// Identity of an inline `<script>`: the file it came from and its position
/// among all scripts of that file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InlineScriptId {
    pub owner: SourceId,
    pub index: usize,
}
impl InlineScriptId {
    pub fn new(owner: SourceId, index: usize) -> Self {
        Self { owner, index }
    }

    /// Parses the form written by [`Display`](fmt::Display).
    pub fn parse(candidate: &str) -> Option<Self> {
        let (index, owner) = candidate.strip_prefix(INLINE_PREFIX)?.split_once(':')?;
        if owner.is_empty() {
            return None;
        }
        Some(Self::new(SourceId::from(owner), index.parse().ok()?))
    }
}
impl fmt::Display for InlineScriptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{INLINE_PREFIX}{}:{}", self.index, self.owner)
    }
}

/// A module reference: either a file on disk or an inline script.
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash)]
pub enum ModuleId {
    #[display("{_0}")]
    Source(SourceId),
    #[display("{_0}")]
    Inline(InlineScriptId),
}
impl ModuleId {
    /// Sorts a candidate string into the right variant. Anything that is not a
    /// well-formed inline identity is a path.
    pub fn parse(candidate: &str) -> Self {
        match InlineScriptId::parse(candidate) {
            Some(inline) => Self::Inline(inline),
            None => Self::Source(SourceId::from(candidate)),
        }
    }
}
impl From<&str> for ModuleId {
    fn from(candidate: &str) -> Self {
        Self::parse(candidate)
    }
}
impl From<SourceId> for ModuleId {
    fn from(source: SourceId) -> Self {
        Self::Source(source)
    }
}
impl From<InlineScriptId> for ModuleId {
    fn from(inline: InlineScriptId) -> Self {
        Self::Inline(inline)
    }
}
