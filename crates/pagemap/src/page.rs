/// Page file parsing and segment classification
///
/// Pure functional parsing of page file paths into typed segments.
/// All functions are **pure**: same input → same output, no side effects.

use serde::{Deserialize, Serialize};

use crate::{Conventions, RouteError};

/// Represents the different kinds of route segments a file name can encode
///
/// Functional sum type computed once per segment; the rest of the compiler
/// pattern-matches on it instead of re-inspecting raw strings.
///
/// # Examples
///
/// ```
/// use pagemap::{classify_segment, Conventions, SegmentKind};
///
/// let conventions = Conventions::default();
///
/// assert_eq!(classify_segment("about", &conventions), SegmentKind::Static("about".to_string()));
/// assert_eq!(classify_segment("index", &conventions), SegmentKind::Index);
/// assert_eq!(classify_segment("_id", &conventions), SegmentKind::Dynamic("id".to_string()));
/// assert_eq!(classify_segment("__id", &conventions), SegmentKind::OptionalDynamic("id".to_string()));
/// assert_eq!(classify_segment("_", &conventions), SegmentKind::CatchAll);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentKind {
    /// Plain text segment, emitted verbatim
    Static(String),
    /// The index stem, routing to the enclosing directory
    Index,
    /// Dynamic parameter: `_id` → `:id`
    Dynamic(String),
    /// Explicitly optional dynamic parameter: `__id` → `:id?`
    OptionalDynamic(String),
    /// Catch-all: `_` → `*`
    CatchAll,
}

/// Classifies a segment into its route kind (pure function)
///
/// # Rules (evaluated in order)
///
/// 1. **Catch-all**: the bare catch-all stem (`_`)
/// 2. **Index**: the index stem (`index`)
/// 3. **Optional dynamic**: doubled dynamic marker (`__name`)
/// 4. **Dynamic**: single dynamic marker (`_name`)
/// 5. **Static**: any other text
pub fn classify_segment(segment: &str, conventions: &Conventions) -> SegmentKind {
    if segment == conventions.catch_all_stem {
        return SegmentKind::CatchAll;
    }
    if segment == conventions.index_stem {
        return SegmentKind::Index;
    }
    if let Some(rest) = segment.strip_prefix(conventions.dynamic_prefix) {
        return match rest.strip_prefix(conventions.dynamic_prefix) {
            Some(inner) => SegmentKind::OptionalDynamic(inner.to_string()),
            None => SegmentKind::Dynamic(rest.to_string()),
        };
    }
    SegmentKind::Static(segment.to_string())
}

impl SegmentKind {
    /// The token this segment contributes to a route path.
    ///
    /// Index segments contribute nothing (the empty token); the caller is
    /// responsible for mapping the root index to `/`.
    pub fn path_token(&self, conventions: &Conventions) -> String {
        match self {
            SegmentKind::Static(text) => text.clone(),
            SegmentKind::Index => String::new(),
            SegmentKind::Dynamic(name) => format!("{}{}", conventions.param_prefix, name),
            SegmentKind::OptionalDynamic(name) => format!(
                "{}{}{}",
                conventions.param_prefix, name, conventions.optional_suffix
            ),
            SegmentKind::CatchAll => conventions.catch_all_token.to_string(),
        }
    }

    /// The part this segment contributes to a route name, if any.
    ///
    /// Dynamic markers are stripped, catch-alls become the literal
    /// catch-all name, index segments contribute nothing.
    pub fn name_part(&self, conventions: &Conventions) -> Option<String> {
        match self {
            SegmentKind::Static(text) => Some(text.clone()),
            SegmentKind::Index => None,
            SegmentKind::Dynamic(name) | SegmentKind::OptionalDynamic(name) => Some(name.clone()),
            SegmentKind::CatchAll => Some(conventions.catch_all_name.clone()),
        }
    }

    /// True for `Dynamic` and `OptionalDynamic`
    pub fn is_dynamic(&self) -> bool {
        matches!(self, SegmentKind::Dynamic(_) | SegmentKind::OptionalDynamic(_))
    }
}

/// A validated page file: normalized relative path plus its route segments.
///
/// The segments are the directory components followed by the
/// extension-stripped file stem. Construction rejects paths that cannot be
/// turned into route segments with [`RouteError::MalformedFilename`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFile {
    rel_path: String,
    segments: Vec<String>,
}

impl PageFile {
    /// Parses and validates a relative page file path.
    ///
    /// Backslashes are normalized to forward slashes and a leading `./` is
    /// stripped. Rejected inputs: absolute paths, empty segments (double
    /// slashes), `.`/`..` components, empty stems, disallowed characters,
    /// and dynamic markers without a parameter name.
    pub fn parse(rel_path: &str, conventions: &Conventions) -> Result<Self, RouteError> {
        let normalized = rel_path.replace('\\', "/");
        let trimmed = normalized.strip_prefix("./").unwrap_or(&normalized);

        if trimmed.is_empty() {
            return Err(malformed(rel_path, "empty path"));
        }
        if trimmed.starts_with('/') {
            return Err(malformed(rel_path, "path must be relative"));
        }

        let mut segments: Vec<String> = trimmed.split('/').map(str::to_string).collect();

        // Replace the final component with its extension-stripped stem.
        let file_name = segments.pop().unwrap_or_default();
        let stem = match file_name.rsplit_once('.') {
            Some((stem, ext)) if conventions.recognizes_extension(ext) => stem.to_string(),
            _ => file_name,
        };
        segments.push(stem);

        for segment in &segments {
            validate_segment(rel_path, segment, conventions)?;
        }

        Ok(Self {
            rel_path: trimmed.to_string(),
            segments,
        })
    }

    /// The normalized relative path, as given (extension included)
    pub fn rel_path(&self) -> &str {
        &self.rel_path
    }

    /// Directory components plus the extension-stripped stem
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The extension-stripped file stem
    pub fn stem(&self) -> &str {
        self.segments
            .last()
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn is_index(&self, conventions: &Conventions) -> bool {
        matches!(classify_segment(self.stem(), conventions), SegmentKind::Index)
    }

    pub fn is_dynamic(&self, conventions: &Conventions) -> bool {
        classify_segment(self.stem(), conventions).is_dynamic()
    }

    pub fn is_optional_dynamic(&self, conventions: &Conventions) -> bool {
        matches!(
            classify_segment(self.stem(), conventions),
            SegmentKind::OptionalDynamic(_)
        )
    }

    pub fn is_catch_all(&self, conventions: &Conventions) -> bool {
        matches!(classify_segment(self.stem(), conventions), SegmentKind::CatchAll)
    }
}

fn validate_segment(
    rel_path: &str,
    segment: &str,
    conventions: &Conventions,
) -> Result<(), RouteError> {
    if segment.is_empty() {
        return Err(malformed(rel_path, "empty path segment"));
    }
    if segment == "." || segment == ".." {
        return Err(malformed(rel_path, "path traversal segments are not allowed"));
    }

    let allowed = |c: char| {
        c.is_ascii_alphanumeric()
            || matches!(c, '-' | '_' | '.')
            || c == conventions.dynamic_prefix
    };
    if !segment.chars().all(allowed) {
        return Err(malformed(
            rel_path,
            &format!("segment `{segment}` contains disallowed characters"),
        ));
    }

    // A marker with nothing behind it names no parameter.
    match classify_segment(segment, conventions) {
        SegmentKind::Dynamic(name) | SegmentKind::OptionalDynamic(name) if name.is_empty() => Err(
            malformed(rel_path, "dynamic segment without a parameter name"),
        ),
        _ => Ok(()),
    }
}

fn malformed(path: &str, reason: &str) -> RouteError {
    RouteError::MalformedFilename {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}
