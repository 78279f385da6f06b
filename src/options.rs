//! Parser configuration.

use pulldown_cmark::Options;

/// Markdown extensions recognised when building the document tree.
///
/// The default only turns on tables, which is the syntax the PukiWiki writer
/// has a bespoke rule for. The remaining extensions produce nodes that are
/// rendered through the generic children fallback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    pub tables: bool,
    pub strikethrough: bool,
    pub tasklists: bool,
    pub footnotes: bool,
    pub definition_lists: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            tables: true,
            strikethrough: false,
            tasklists: false,
            footnotes: false,
            definition_lists: false,
        }
    }
}

impl ParseOptions {
    /// Every supported extension enabled.
    pub fn gfm() -> Self {
        ParseOptions {
            tables: true,
            strikethrough: true,
            tasklists: true,
            footnotes: true,
            definition_lists: true,
        }
    }

    pub fn to_pulldown(&self) -> Options {
        let mut opts = Options::empty();
        opts.set(Options::ENABLE_TABLES, self.tables);
        opts.set(Options::ENABLE_STRIKETHROUGH, self.strikethrough);
        opts.set(Options::ENABLE_TASKLISTS, self.tasklists);
        opts.set(Options::ENABLE_FOOTNOTES, self.footnotes);
        opts.set(Options::ENABLE_DEFINITION_LIST, self.definition_lists);
        opts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_enables_tables_only() {
        let opts = ParseOptions::default().to_pulldown();
        assert!(opts.contains(Options::ENABLE_TABLES));
        assert!(!opts.contains(Options::ENABLE_STRIKETHROUGH));
        assert!(!opts.contains(Options::ENABLE_FOOTNOTES));
    }

    #[test]
    fn gfm_enables_everything() {
        let opts = ParseOptions::gfm().to_pulldown();
        assert!(opts.contains(Options::ENABLE_TABLES));
        assert!(opts.contains(Options::ENABLE_STRIKETHROUGH));
        assert!(opts.contains(Options::ENABLE_TASKLISTS));
        assert!(opts.contains(Options::ENABLE_FOOTNOTES));
        assert!(opts.contains(Options::ENABLE_DEFINITION_LIST));
    }
}
