/// Error types for route compilation
///
/// The compiler has no partial-success mode: the first error aborts the
/// build and surfaces to the caller.

use thiserror::Error;

/// Errors produced while compiling a pages directory into a route table
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// Two sibling files resolve to the same route path
    #[error("duplicate route `{path}`: `{first}` and `{second}` resolve to the same path")]
    DuplicateRoute {
        /// The colliding route path
        path: String,
        /// Page file that claimed the path first
        first: String,
        /// Page file that collided with it
        second: String,
    },

    /// A page file name cannot be turned into a route segment
    #[error("malformed page file `{path}`: {reason}")]
    MalformedFilename {
        /// The offending relative path
        path: String,
        /// Why it was rejected
        reason: String,
    },
}
