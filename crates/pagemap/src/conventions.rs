/// Naming conventions for page files and emitted routes
///
/// Every reserved token the compiler recognizes lives here explicitly;
/// there is no hidden module state. Construct with `Conventions::default()`
/// and override individual tokens with the `with_*` builders.

use serde::{Deserialize, Serialize};

/// Reserved lexical tokens of the pages directory and the emitted table.
///
/// The defaults mirror the common `pages/` convention:
///
/// | Token | Default | Meaning |
/// |-------|---------|---------|
/// | `index_stem` | `index` | file stem that maps to the enclosing directory itself |
/// | `dynamic_prefix` | `_` | leading marker for dynamic segments (`_id` → `:id`) |
/// | `catch_all_stem` | `_` | bare stem that matches any remaining path (`_` → `*`) |
/// | `name_separator` | `-` | joins segment names into route names (`posts-id`) |
///
/// # Examples
///
/// ```
/// use pagemap::Conventions;
///
/// let conventions = Conventions::default()
///     .with_dynamic_prefix('$')
///     .with_page_extensions(vec!["rsx".to_string()]);
///
/// assert_eq!(conventions.dynamic_prefix, '$');
/// assert_eq!(conventions.index_stem, "index");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conventions {
    /// File stem that routes to the enclosing directory (default: "index")
    pub index_stem: String,

    /// Leading marker turning a segment dynamic (default: '_')
    pub dynamic_prefix: char,

    /// Bare stem acting as a catch-all (default: "_")
    pub catch_all_stem: String,

    /// Separator between segment names in route names (default: '-')
    pub name_separator: char,

    /// Separator between tokens in emitted paths (default: '/')
    pub path_separator: char,

    /// Prefix for dynamic parameters in emitted paths (default: ':')
    pub param_prefix: char,

    /// Token emitted for catch-all segments (default: '*')
    pub catch_all_token: char,

    /// Suffix marking an optional parameter in emitted paths (default: '?')
    pub optional_suffix: char,

    /// Name contributed by a catch-all segment (default: "all")
    pub catch_all_name: String,

    /// File extensions recognized as pages (default: ["vue", "js"])
    pub page_extensions: Vec<String>,
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            index_stem: "index".to_string(),
            dynamic_prefix: '_',
            catch_all_stem: "_".to_string(),
            name_separator: '-',
            path_separator: '/',
            param_prefix: ':',
            catch_all_token: '*',
            optional_suffix: '?',
            catch_all_name: "all".to_string(),
            page_extensions: vec!["vue".to_string(), "js".to_string()],
        }
    }
}

impl Conventions {
    /// Sets the index file stem (immutable builder)
    pub fn with_index_stem(mut self, stem: impl Into<String>) -> Self {
        self.index_stem = stem.into();
        self
    }

    /// Sets the dynamic segment marker (immutable builder)
    pub fn with_dynamic_prefix(mut self, prefix: char) -> Self {
        self.dynamic_prefix = prefix;
        self
    }

    /// Sets the catch-all file stem (immutable builder)
    pub fn with_catch_all_stem(mut self, stem: impl Into<String>) -> Self {
        self.catch_all_stem = stem.into();
        self
    }

    /// Sets the route name separator (immutable builder)
    pub fn with_name_separator(mut self, separator: char) -> Self {
        self.name_separator = separator;
        self
    }

    /// Sets the recognized page extensions (immutable builder)
    pub fn with_page_extensions(mut self, extensions: Vec<String>) -> Self {
        self.page_extensions = extensions;
        self
    }

    /// Returns true if `extension` is a recognized page extension
    pub fn recognizes_extension(&self, extension: &str) -> bool {
        self.page_extensions.iter().any(|ext| ext == extension)
    }
}
