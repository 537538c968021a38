//! # Pagemap
//!
//! A filesystem-to-route compiler: derives a deterministic route table
//! from a pages directory, with support for:
//! - Static routes (`about.vue` → `/about`)
//! - Index routes (`index.vue` → `/`, `parent/index.vue` → nested `''`)
//! - Dynamic parameters (`_id.vue` → `:id`)
//! - Optional parameters (`:id?` when alone at its level, `__id.vue` always)
//! - Catch-all routes (`_.vue` → `*`)
//! - Nested children via directories, with grouping parents and
//!   page-plus-directory merging (`posts.vue` + `posts/`)
//!
//! ## Functional Programming Approach
//!
//! The compiler is a pure function of its input: the full file list is
//! parsed and validated up front, assembled into an immutable table, and
//! any error aborts the build. Rebuilding from the same snapshot always
//! yields the same table.
//!
//! ## Determinism
//!
//! Sibling routes are ordered by token rank (static, then index, then
//! dynamic, then catch-all) with input order breaking ties, so the table
//! never depends on filesystem enumeration quirks.
//!
//! ## Example
//!
//! ```
//! use pagemap::{build_route_table, Conventions};
//!
//! let conventions = Conventions::default();
//! let table = build_route_table(
//!     &["index.vue", "posts.vue", "posts/_id.vue"],
//!     &conventions,
//! ).unwrap();
//!
//! let posts = table.find_by_name("posts").unwrap();
//! assert_eq!(posts.path, "/posts");
//! assert_eq!(posts.children[0].path, ":id?");
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

mod config;
mod conventions;
mod error;
pub mod order;
pub mod page;
mod scan;
mod tree;

// Re-export public types
pub use config::{Config, ConventionsConfig, RoutingConfig};
pub use conventions::Conventions;
pub use error::RouteError;
pub use order::compare_paths;
pub use page::{classify_segment, PageFile, SegmentKind};
pub use scan::scan_pages_dir;
pub use tree::{build_from_pages, build_route_table, RouteNode, RouteTable};
