//! Route compilation errors.

use thiserror::Error;

/// Errors raised while compiling a route shape into a matcher.
///
/// Resolution never fails: an unmatched path is `None`, not an error.
#[derive(Debug, Error)]
pub enum RouteError {
    /// The param-path string is not well formed.
    #[error("invalid param path `{spec}`: {reason}")]
    InvalidPathSpec { spec: String, reason: &'static str },

    /// A custom parameter pattern (or the assembled route pattern) is not a valid regex.
    #[error("invalid route pattern `{pattern}`: {source}")]
    InvalidRoutePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The same parameter name appears twice in one param-path.
    #[error("parameter `{name}` is declared more than once in `{spec}`")]
    DuplicateParam { spec: String, name: String },
}

impl RouteError {
    pub(crate) fn invalid_spec(spec: &str, reason: &'static str) -> Self {
        RouteError::InvalidPathSpec {
            spec: spec.to_string(),
            reason,
        }
    }
}
