/// Sibling ordering for the compiled route table
///
/// Routes are compared token by token so that more specific paths always
/// match first: static tokens, then the root index, then dynamic
/// parameters, then catch-alls. The comparator is total and stable sorts
/// keep input order for ties, which makes rebuilds idempotent.

use std::cmp::Ordering;

use crate::Conventions;

const RANK_STATIC: u8 = 0;
const RANK_ROOT_INDEX: u8 = 1;
const RANK_DYNAMIC: u8 = 2;
const RANK_CATCH_ALL: u8 = 3;

/// Rank of a single emitted path token (lower = matched earlier)
fn token_rank(token: &str, conventions: &Conventions) -> u8 {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c == conventions.catch_all_token => RANK_CATCH_ALL,
        (Some(c), _) if c == conventions.param_prefix => RANK_DYNAMIC,
        _ => RANK_STATIC,
    }
}

/// Ranks of every token in a route path.
///
/// The root index path (`/`) and the empty index child path rank between
/// statics and dynamics: an index must not shadow static siblings but must
/// win over parameterized ones.
fn path_ranks(path: &str, conventions: &Conventions) -> Vec<u8> {
    let separator = conventions.path_separator;
    if path.chars().all(|c| c == separator) {
        return vec![RANK_ROOT_INDEX];
    }
    path.split(separator)
        .filter(|token| !token.is_empty())
        .map(|token| token_rank(token, conventions))
        .collect()
}

/// Total order over route paths (pure function).
///
/// Token ranks are compared position by position. When one path is a
/// strict prefix of the other, the shorter path wins unless the boundary
/// token is a catch-all, in which case the deeper path is the more
/// specific one and sorts first.
pub fn compare_paths(a: &str, b: &str, conventions: &Conventions) -> Ordering {
    let ranks_a = path_ranks(a, conventions);
    let ranks_b = path_ranks(b, conventions);

    let common = ranks_a.len().min(ranks_b.len());
    for i in 0..common {
        match ranks_a[i].cmp(&ranks_b[i]) {
            Ordering::Equal => {}
            other => return other,
        }
    }

    if ranks_a.len() == ranks_b.len() {
        return Ordering::Equal;
    }

    let boundary_is_catch_all = common > 0 && ranks_a[common - 1] == RANK_CATCH_ALL;
    if boundary_is_catch_all {
        ranks_b.len().cmp(&ranks_a.len())
    } else {
        ranks_a.len().cmp(&ranks_b.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conv() -> Conventions {
        Conventions::default()
    }

    fn sorted(mut paths: Vec<&str>) -> Vec<&str> {
        paths.sort_by(|a, b| compare_paths(a, b, &conv()));
        paths
    }

    #[test]
    fn test_static_before_dynamic_before_catch_all() {
        assert_eq!(
            sorted(vec!["/*", "/:slug", "/about"]),
            vec!["/about", "/:slug", "/*"]
        );
    }

    #[test]
    fn test_root_index_between_static_and_dynamic() {
        assert_eq!(
            sorted(vec!["/:slug", "/", "/about"]),
            vec!["/about", "/", "/:slug"]
        );
    }

    #[test]
    fn test_empty_child_path_ranks_as_index() {
        // sibling list inside a grouping node: index child first except statics
        assert_eq!(
            sorted(vec![":id", "", "toto"]),
            vec!["toto", "", ":id"]
        );
    }

    #[test]
    fn test_catch_all_prefix_prefers_deeper() {
        // the deeper catch-all is more specific and must match first
        assert_eq!(
            sorted(vec!["/*", "/*/*", "/*/p/*"]),
            vec!["/*/p/*", "/*/*", "/*"]
        );
    }

    #[test]
    fn test_static_prefix_prefers_shorter() {
        assert_eq!(sorted(vec!["/a/b", "/a"]), vec!["/a", "/a/b"]);
    }

    #[test]
    fn test_token_by_token_not_lexicographic() {
        // a static second token does not rescue a dynamic first token
        assert_eq!(
            sorted(vec![":id/teub", "projects"]),
            vec!["projects", ":id/teub"]
        );
    }

    #[test]
    fn test_optional_suffix_does_not_change_rank() {
        assert_eq!(
            compare_paths(":id?", ":id", &conv()),
            std::cmp::Ordering::Equal
        );
    }
}
