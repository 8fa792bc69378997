//! Inbound path splitting.
//!
//! The transport hands over the raw path after the application context; this
//! splits off the controller and action tokens. Everything past the second
//! token is left for param-path matching.

use serde::Serialize;

use crate::routing::param_path::PATH_ELEMENT_SEPARATOR;

const QUERY_MARKER: char = '?';

/// The leading tokens of an incoming path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RoutedRequest<'a> {
    pub controller: Option<&'a str>,
    pub action: Option<&'a str>,
    pub remainder: Option<&'a str>,
}

/// Stateless splitter for raw request paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestRouter;

impl RequestRouter {
    pub fn route(path: &str) -> RoutedRequest<'_> {
        let body = path
            .strip_prefix(PATH_ELEMENT_SEPARATOR)
            .unwrap_or(path);

        let mut tokens = body.splitn(3, PATH_ELEMENT_SEPARATOR);
        let controller = tokens.next().filter(|t| !t.is_empty());
        let action = tokens
            .next()
            .map(|t| t.split(QUERY_MARKER).next().unwrap_or(t))
            .filter(|t| !t.is_empty());
        let remainder = tokens.next().filter(|t| !t.is_empty());

        RoutedRequest {
            controller,
            action,
            remainder,
        }
    }
}

/// Remove the application context prefix from a raw request path.
///
/// Returns `None` when the path is outside the context. An empty context
/// accepts every path; the bare context maps to `/`.
pub fn strip_context_path<'a>(context: &str, raw: &'a str) -> Option<&'a str> {
    if context.is_empty() {
        return Some(raw);
    }

    let rest = raw.strip_prefix(context)?;
    if rest.is_empty() {
        Some("/")
    } else if rest.starts_with(PATH_ELEMENT_SEPARATOR) {
        Some(rest)
    } else {
        None
    }
}
