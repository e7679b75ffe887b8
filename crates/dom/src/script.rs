/// A `<script>` element lifted out of a [`Document`](crate::Document).
///
/// `index` is the position of the element among all scripts of the document,
/// counting every kind, so it stays stable for a given source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Script {
    /// `<script src="...">`, the bundler resolves the value itself.
    External { index: usize, src: String },
    /// Script whose first child is a text node.
    Inline { index: usize, text: String },
    /// Neither a `src` attribute nor text, e.g. `<script></script>`.
    Empty { index: usize },
}
impl Script {
    pub fn index(&self) -> usize {
        match self {
            Self::External { index, .. } | Self::Inline { index, .. } | Self::Empty { index } => *index,
        }
    }
}
