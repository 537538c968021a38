/// Route tree assembly
///
/// Builds the compiled route table from a full snapshot of page files.
/// The build is a pure function of the input list: all files are parsed
/// and validated up front, then assembled into a directory-shaped slot
/// tree, then finalized into ordered [`RouteNode`]s.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::order::compare_paths;
use crate::page::{classify_segment, PageFile, SegmentKind};
use crate::{Conventions, RouteError};

/// A single compiled route.
///
/// Top-level paths are absolute (`/posts`); child paths are relative to
/// their parent (`:id?`, `child`), with the empty path marking an index
/// child. `component` is the originating page file, absent on pure
/// grouping nodes. `name` is absent on grouping nodes and on nodes whose
/// index child carries the name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteNode {
    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteNode>,
}

impl RouteNode {
    /// Depth-first iterator over this node and all descendants
    pub fn iter(&self) -> impl Iterator<Item = &RouteNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}

/// The ordered, compiled route table.
///
/// Immutable once built; rebuild from a fresh snapshot after any
/// filesystem change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
    pub routes: Vec<RouteNode>,
}

impl RouteTable {
    /// Top-level routes in match order
    pub fn routes(&self) -> &[RouteNode] {
        &self.routes
    }

    /// Number of top-level routes
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Depth-first iterator over every route in the table
    pub fn iter(&self) -> impl Iterator<Item = &RouteNode> {
        self.routes.iter().flat_map(RouteNode::iter)
    }

    /// Finds a route anywhere in the tree by its name
    pub fn find_by_name(&self, name: &str) -> Option<&RouteNode> {
        self.iter().find(|node| node.name.as_deref() == Some(name))
    }
}

/// Compiles a list of page file paths into a route table.
///
/// Paths are relative to the pages directory (`posts/_id.vue`). The whole
/// list is validated before any assembly; the first error aborts the
/// build.
///
/// # Examples
///
/// ```
/// use pagemap::{build_route_table, Conventions};
///
/// let conventions = Conventions::default();
/// let table = build_route_table(&["posts.vue", "posts/_id.vue"], &conventions).unwrap();
///
/// let posts = &table.routes[0];
/// assert_eq!(posts.path, "/posts");
/// assert_eq!(posts.name.as_deref(), Some("posts"));
/// assert_eq!(posts.children[0].path, ":id?");
/// assert_eq!(posts.children[0].name.as_deref(), Some("posts-id"));
/// ```
pub fn build_route_table<S: AsRef<str>>(
    paths: &[S],
    conventions: &Conventions,
) -> Result<RouteTable, RouteError> {
    let pages = paths
        .iter()
        .map(|path| PageFile::parse(path.as_ref(), conventions))
        .collect::<Result<Vec<_>, _>>()?;
    build_from_pages(&pages, conventions)
}

/// Compiles already-parsed page files into a route table.
pub fn build_from_pages(
    pages: &[PageFile],
    conventions: &Conventions,
) -> Result<RouteTable, RouteError> {
    let mut root: Vec<Slot> = Vec::new();
    for index in 0..pages.len() {
        insert_page(&mut root, pages, index, conventions)?;
    }

    let routes = finalize_level(&root, pages, "", 0, conventions)?;
    debug!(pages = pages.len(), routes = routes.len(), "compiled route table");

    Ok(RouteTable { routes })
}

// ============================================================================
// Slot tree (assembly intermediate)
// ============================================================================

/// One entry in a sibling list during assembly.
///
/// Directories become `Dir` slots that may later gain an owning page
/// (`posts.vue` next to `posts/`). Page files become `Leaf` slots; a leaf
/// carries a token tail rather than a single token so that files beneath a
/// catch-all directory can flatten into their parent level.
enum Slot {
    Dir(DirSlot),
    Leaf(LeafSlot),
}

struct DirSlot {
    segment: String,
    own_page: Option<usize>,
    slots: Vec<Slot>,
}

struct LeafSlot {
    tail: Vec<String>,
    page: usize,
}

fn insert_page(
    root: &mut Vec<Slot>,
    pages: &[PageFile],
    index: usize,
    conventions: &Conventions,
) -> Result<(), RouteError> {
    let segments = pages[index].segments();
    let last = segments.len() - 1;
    let mut cursor: &mut Vec<Slot> = root;
    let mut trail = String::new();

    for (depth, segment) in segments.iter().enumerate() {
        if depth == last {
            attach_stem(cursor, pages, index, segment, &trail, conventions)?;
            return Ok(());
        }

        // A catch-all directory consumes the rest of the path, so nothing
        // beneath it is reachable as a child; flatten the remainder here.
        if matches!(classify_segment(segment, conventions), SegmentKind::CatchAll) {
            cursor.push(Slot::Leaf(LeafSlot {
                tail: segments[depth..].to_vec(),
                page: index,
            }));
            return Ok(());
        }

        let position = match cursor
            .iter()
            .position(|slot| matches!(slot, Slot::Dir(dir) if dir.segment == *segment))
        {
            Some(position) => position,
            None => {
                // A page of the directory's own name becomes the node's
                // component; upgrade the leaf in place to keep its spot.
                // An index page is the directory's child, never its owner,
                // so a directory literally named like the index stem must
                // not swallow it.
                let mergeable =
                    !matches!(classify_segment(segment, conventions), SegmentKind::Index);
                let merge = if mergeable {
                    cursor.iter().position(
                        |slot| matches!(slot, Slot::Leaf(leaf) if leaf.tail.len() == 1 && leaf.tail[0] == *segment),
                    )
                } else {
                    None
                };
                match merge {
                    Some(position) => {
                        let page = match &cursor[position] {
                            Slot::Leaf(leaf) => leaf.page,
                            Slot::Dir(_) => unreachable!("merge position is a leaf"),
                        };
                        cursor[position] = Slot::Dir(DirSlot {
                            segment: segment.clone(),
                            own_page: Some(page),
                            slots: Vec::new(),
                        });
                        position
                    }
                    None => {
                        cursor.push(Slot::Dir(DirSlot {
                            segment: segment.clone(),
                            own_page: None,
                            slots: Vec::new(),
                        }));
                        cursor.len() - 1
                    }
                }
            }
        };

        trail.push(conventions.path_separator);
        trail.push_str(&dir_kind(segment, conventions).path_token(conventions));

        cursor = match &mut cursor[position] {
            Slot::Dir(dir) => &mut dir.slots,
            Slot::Leaf(_) => unreachable!("descended into a leaf"),
        };
    }

    unreachable!("segments are never empty")
}

fn attach_stem(
    cursor: &mut Vec<Slot>,
    pages: &[PageFile],
    index: usize,
    stem: &str,
    trail: &str,
    conventions: &Conventions,
) -> Result<(), RouteError> {
    let kind = classify_segment(stem, conventions);

    // A non-index page backing an already-created directory of the same
    // name provides that node's component.
    if !matches!(kind, SegmentKind::Index) {
        if let Some(position) = cursor
            .iter()
            .position(|slot| matches!(slot, Slot::Dir(dir) if dir.segment == *stem))
        {
            if let Slot::Dir(dir) = &mut cursor[position] {
                if let Some(first) = dir.own_page {
                    return Err(RouteError::DuplicateRoute {
                        path: format!(
                            "{trail}{}{}",
                            conventions.path_separator,
                            kind.path_token(conventions)
                        ),
                        first: pages[first].rel_path().to_string(),
                        second: pages[index].rel_path().to_string(),
                    });
                }
                dir.own_page = Some(index);
            }
            return Ok(());
        }
    }

    cursor.push(Slot::Leaf(LeafSlot {
        tail: vec![stem.to_string()],
        page: index,
    }));
    Ok(())
}

/// Classification of a directory segment.
///
/// The index stem is only meaningful as a file stem; a directory literally
/// named like it is static text.
fn dir_kind(segment: &str, conventions: &Conventions) -> SegmentKind {
    match classify_segment(segment, conventions) {
        SegmentKind::Index => SegmentKind::Static(segment.to_string()),
        kind => kind,
    }
}

// ============================================================================
// Finalization
// ============================================================================

fn finalize_level(
    slots: &[Slot],
    pages: &[PageFile],
    name_prefix: &str,
    depth: usize,
    conventions: &Conventions,
) -> Result<Vec<RouteNode>, RouteError> {
    let mut nodes = Vec::with_capacity(slots.len());

    for slot in slots {
        match slot {
            Slot::Dir(dir) => nodes.push(finalize_dir(dir, pages, name_prefix, depth, conventions)?),
            Slot::Leaf(leaf) => nodes.push(finalize_leaf(leaf, pages, name_prefix, depth, conventions)),
        }
    }

    apply_optionality(&mut nodes, conventions);
    check_unique_paths(&nodes, conventions)?;
    nodes.sort_by(|a, b| compare_paths(&a.path, &b.path, conventions));

    Ok(nodes)
}

fn finalize_dir(
    dir: &DirSlot,
    pages: &[PageFile],
    name_prefix: &str,
    depth: usize,
    conventions: &Conventions,
) -> Result<RouteNode, RouteError> {
    let kind = dir_kind(&dir.segment, conventions);
    let token = kind.path_token(conventions);
    let chain = match kind.name_part(conventions) {
        Some(part) => join_name(name_prefix, &part, conventions),
        None => name_prefix.to_string(),
    };

    let children = finalize_level(&dir.slots, pages, &chain, depth + 1, conventions)?;

    let component = dir.own_page.map(|page| pages[page].rel_path().to_string());
    // An index child is the node's content and carries the name; a node
    // without a component is a pure grouping parent and has none either.
    let has_index_child = children.iter().any(|child| child.path.is_empty());
    let name = match (&component, has_index_child) {
        (Some(_), false) => Some(chain),
        _ => None,
    };

    Ok(RouteNode {
        path: absolutize(token, depth, conventions),
        name,
        component,
        children,
    })
}

fn finalize_leaf(
    leaf: &LeafSlot,
    pages: &[PageFile],
    name_prefix: &str,
    depth: usize,
    conventions: &Conventions,
) -> RouteNode {
    let component = Some(pages[leaf.page].rel_path().to_string());

    // A plain index leaf routes to the enclosing directory itself.
    let sole_index = leaf.tail.len() == 1
        && matches!(
            classify_segment(&leaf.tail[0], conventions),
            SegmentKind::Index
        );
    if sole_index {
        return if depth == 0 {
            RouteNode {
                path: conventions.path_separator.to_string(),
                name: Some(conventions.index_stem.clone()),
                component,
                children: Vec::new(),
            }
        } else {
            RouteNode {
                path: String::new(),
                name: Some(name_prefix.to_string()),
                component,
                children: Vec::new(),
            }
        };
    }

    // Flattened tails join token by token; a trailing index stem
    // contributes nothing, an interior one is static text.
    let mut tokens = Vec::with_capacity(leaf.tail.len());
    let mut name = name_prefix.to_string();
    for (i, segment) in leaf.tail.iter().enumerate() {
        let kind = if i + 1 == leaf.tail.len() {
            classify_segment(segment, conventions)
        } else {
            dir_kind(segment, conventions)
        };
        if matches!(kind, SegmentKind::Index) {
            continue;
        }
        tokens.push(kind.path_token(conventions));
        if let Some(part) = kind.name_part(conventions) {
            name = join_name(&name, &part, conventions);
        }
    }

    let rel = tokens.join(&conventions.path_separator.to_string());
    RouteNode {
        path: absolutize(rel, depth, conventions),
        name: Some(name),
        component,
        children: Vec::new(),
    }
}

/// Makes a plain dynamic route optional when it is alone at its level.
///
/// Explicitly optional segments already carry the suffix; catch-alls and
/// multi-token paths are never eligible.
fn apply_optionality(nodes: &mut [RouteNode], conventions: &Conventions) {
    let [node] = nodes else { return };

    let token = node
        .path
        .strip_prefix(conventions.path_separator)
        .unwrap_or(&node.path);
    let is_sole_dynamic = token.starts_with(conventions.param_prefix)
        && !token.contains(conventions.path_separator)
        && !token.ends_with(conventions.optional_suffix);

    if is_sole_dynamic {
        node.path.push(conventions.optional_suffix);
    }
}

fn check_unique_paths(
    nodes: &[RouteNode],
    conventions: &Conventions,
) -> Result<(), RouteError> {
    let mut seen: HashMap<&str, &RouteNode> = HashMap::new();
    for node in nodes {
        // `:id` and `:id?` match the same URLs, so the suffix does not
        // disambiguate siblings
        let key = node
            .path
            .strip_suffix(conventions.optional_suffix)
            .unwrap_or(&node.path);
        if let Some(first) = seen.insert(key, node) {
            return Err(RouteError::DuplicateRoute {
                path: node.path.clone(),
                first: describe(first),
                second: describe(node),
            });
        }
    }
    Ok(())
}

fn describe(node: &RouteNode) -> String {
    node.component
        .clone()
        .unwrap_or_else(|| format!("directory `{}`", node.path))
}

fn join_name(prefix: &str, part: &str, conventions: &Conventions) -> String {
    if prefix.is_empty() {
        part.to_string()
    } else {
        format!("{prefix}{}{part}", conventions.name_separator)
    }
}

fn absolutize(token: String, depth: usize, conventions: &Conventions) -> String {
    if depth == 0 {
        format!("{}{token}", conventions.path_separator)
    } else {
        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn conv() -> Conventions {
        Conventions::default()
    }

    fn build(paths: &[&str]) -> RouteTable {
        build_route_table(paths, &conv()).unwrap()
    }

    #[test]
    fn test_single_static_page() {
        let table = build(&["about.vue"]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.routes[0].path, "/about");
        assert_eq!(table.routes[0].name.as_deref(), Some("about"));
        assert_eq!(table.routes[0].component.as_deref(), Some("about.vue"));
        assert!(table.routes[0].children.is_empty());
    }

    #[test]
    fn test_root_index() {
        let table = build(&["index.vue"]);
        assert_eq!(table.routes[0].path, "/");
        assert_eq!(table.routes[0].name.as_deref(), Some("index"));
    }

    #[test]
    fn test_sole_dynamic_becomes_optional() {
        let table = build(&["users/_id.vue"]);
        let users = &table.routes[0];
        assert_eq!(users.path, "/users");
        assert_eq!(users.name, None);
        assert_eq!(users.component, None);
        assert_eq!(users.children[0].path, ":id?");
        assert_eq!(users.children[0].name.as_deref(), Some("users-id"));
    }

    #[test]
    fn test_sibling_forces_required_dynamic() {
        let table = build(&["blog/_slug.vue", "blog/archive.vue"]);
        let blog = &table.routes[0];
        assert_eq!(blog.children[0].path, "archive");
        assert_eq!(blog.children[1].path, ":slug");
    }

    #[test]
    fn test_explicit_optional_keeps_suffix_with_siblings() {
        let table = build(&["docs/__page.vue", "docs/intro.vue"]);
        let docs = &table.routes[0];
        assert_eq!(docs.children[0].path, "intro");
        assert_eq!(docs.children[1].path, ":page?");
    }

    #[test]
    fn test_page_merges_with_directory() {
        let table = build(&["posts.vue", "posts/_id.vue"]);
        let posts = &table.routes[0];
        assert_eq!(posts.path, "/posts");
        assert_eq!(posts.name.as_deref(), Some("posts"));
        assert_eq!(posts.component.as_deref(), Some("posts.vue"));
        assert_eq!(posts.children.len(), 1);
    }

    #[test]
    fn test_directory_then_page_merges_too() {
        // order of discovery must not matter
        let a = build(&["posts.vue", "posts/_id.vue"]);
        let b = build(&["posts/_id.vue", "posts.vue"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_index_child_carries_name() {
        let table = build(&["parent.vue", "parent/index.vue", "parent/child.vue"]);
        let parent = &table.routes[0];
        assert_eq!(parent.path, "/parent");
        assert_eq!(parent.name, None);
        assert_eq!(parent.component.as_deref(), Some("parent.vue"));
        // static children sort ahead of the index child
        assert_eq!(parent.children[0].path, "child");
        assert_eq!(parent.children[0].name.as_deref(), Some("parent-child"));
        assert_eq!(parent.children[1].path, "");
        assert_eq!(parent.children[1].name.as_deref(), Some("parent"));
    }

    #[test]
    fn test_index_page_survives_directory_named_index() {
        // "index.vue" is the root route, not the owner of "index/"
        let table = build(&["index.vue", "index/foo.vue"]);
        assert_eq!(table.len(), 2);

        let dir = &table.routes[0];
        assert_eq!(dir.path, "/index");
        assert_eq!(dir.name, None);
        assert_eq!(dir.component, None);
        assert_eq!(dir.children[0].path, "foo");
        assert_eq!(dir.children[0].name.as_deref(), Some("index-foo"));

        let root = &table.routes[1];
        assert_eq!(root.path, "/");
        assert_eq!(root.name.as_deref(), Some("index"));
        assert_eq!(root.component.as_deref(), Some("index.vue"));
    }

    #[test]
    fn test_index_page_and_index_directory_in_either_order() {
        let a = build(&["index.vue", "index/foo.vue"]);
        let b = build(&["index/foo.vue", "index.vue"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_top_level_catch_all() {
        let table = build(&["_.vue"]);
        assert_eq!(table.routes[0].path, "/*");
        assert_eq!(table.routes[0].name.as_deref(), Some("all"));
    }

    #[test]
    fn test_catch_all_directory_flattens() {
        let table = build(&["_/_.vue"]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.routes[0].path, "/*/*");
        assert_eq!(table.routes[0].name.as_deref(), Some("all-all"));
        assert!(table.routes[0].children.is_empty());
    }

    #[test]
    fn test_catch_all_directory_with_static_interior() {
        let table = build(&["_/p/_.vue"]);
        assert_eq!(table.routes[0].path, "/*/p/*");
        assert_eq!(table.routes[0].name.as_deref(), Some("all-p-all"));
    }

    #[test]
    fn test_nested_dynamic_grouping() {
        let table = build(&["_key/_id.vue"]);
        let key = &table.routes[0];
        // alone at the top level, so the parameter itself is optional
        assert_eq!(key.path, "/:key?");
        assert_eq!(key.name, None);
        assert_eq!(key.children[0].path, ":id?");
        assert_eq!(key.children[0].name.as_deref(), Some("key-id"));
    }

    #[test]
    fn test_duplicate_stems_across_extensions() {
        let err = build_route_table(&["foo.vue", "foo.js"], &conv()).unwrap_err();
        assert_eq!(
            err,
            RouteError::DuplicateRoute {
                path: "/foo".to_string(),
                first: "foo.vue".to_string(),
                second: "foo.js".to_string(),
            }
        );
    }

    #[test]
    fn test_duplicate_directory_components() {
        let err =
            build_route_table(&["posts/_id.vue", "posts.vue", "posts.js"], &conv()).unwrap_err();
        assert!(matches!(err, RouteError::DuplicateRoute { .. }));
    }

    #[test]
    fn test_optional_and_required_params_collide() {
        // `:id` and `:id?` match the same URLs
        let err =
            build_route_table(&["things/_id.vue", "things/__id.vue"], &conv()).unwrap_err();
        assert!(matches!(err, RouteError::DuplicateRoute { .. }));
    }

    #[test]
    fn test_malformed_aborts_whole_build() {
        let err = build_route_table(&["ok.vue", "a b.vue"], &conv()).unwrap_err();
        assert!(matches!(err, RouteError::MalformedFilename { .. }));
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let paths = ["index.vue", "about.vue", "users/_id.vue", "_.vue"];
        assert_eq!(build(&paths), build(&paths));
    }

    #[test]
    fn test_find_by_name() {
        let table = build(&["posts.vue", "posts/_id.vue"]);
        let node = table.find_by_name("posts-id").unwrap();
        assert_eq!(node.path, ":id?");
        assert!(table.find_by_name("missing").is_none());
    }

    #[test]
    fn test_serialization_skips_empty_fields() {
        let table = build(&["users/_id.vue"]);
        let json = serde_json::to_value(&table).unwrap();
        let users = &json["routes"][0];
        assert_eq!(users["path"], "/users");
        assert!(users.get("name").is_none());
        assert!(users.get("component").is_none());
        assert_eq!(users["children"][0]["path"], ":id?");
        assert!(users["children"][0].get("children").is_none());
    }
}
