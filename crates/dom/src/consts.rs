use scraper::Selector;
use std::sync::LazyLock;

macro_rules! selector {
    ($name:ident, $css:expr) => {
        pub(crate) static $name: LazyLock<Selector> = LazyLock::new(|| Selector::parse($css).unwrap());
    };
}

selector!(SCRIPT_SELECTOR, "script");
selector!(BODY_SELECTOR, "body");

/// Attribute naming an external script.
pub(crate) const SRC_ATTRIBUTE: &str = "src";
