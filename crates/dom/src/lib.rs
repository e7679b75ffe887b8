//! HTML document handling for HTML entry points.
//!
//! Parses an HTML source into a mutable arena tree ([`ego_tree`], via
//! [`scraper`]), lifts its `<script>` elements out so a bundler can treat them
//! as modules, and later splices the bundled code back into the `<body>`.

mod consts;
mod document;
mod script;

pub use crate::document::Document;
pub use crate::script::Script;
pub use ego_tree::NodeId;
