//! Param-path parsing.
//!
//! # Grammar
//! ```text
//! param-path := token ("/" token)*
//! token      := literal | ":" name | ":" name "<" regex ">"
//! ```
//!
//! # Design Decisions
//! - A single leading `/` is tolerated and stripped, as are trailing ones
//! - Segments borrow from the spec string; nothing is allocated while parsing
//! - Custom patterns are returned verbatim; they are validated when the route is compiled
//! - Empty inner segments (`a//b`) are rejected

use crate::routing::RouteError;

pub const PATH_ELEMENT_SEPARATOR: char = '/';
pub const PARAM_PREFIX: char = ':';
pub const CUSTOM_PATTERN_START: char = '<';
pub const CUSTOM_PATTERN_END: char = '>';

/// One `/`-separated element of a param-path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamPathSegment<'a> {
    /// Matched verbatim.
    Literal(&'a str),
    /// Binds one path element (any non-`/` characters) to `name`.
    Param(&'a str),
    /// Binds one path element matching `pattern` to `name`.
    ParamWithPattern { name: &'a str, pattern: &'a str },
}

impl<'a> ParamPathSegment<'a> {
    /// The parameter name, if this segment binds one.
    pub fn param_name(&self) -> Option<&'a str> {
        match *self {
            ParamPathSegment::Literal(_) => None,
            ParamPathSegment::Param(name) => Some(name),
            ParamPathSegment::ParamWithPattern { name, .. } => Some(name),
        }
    }
}

/// Lazy iterator over the segments of a param-path.
///
/// Yields an error for the first malformed token; callers normally stop there.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    spec: &'a str,
    tokens: std::str::Split<'a, char>,
}

impl<'a> Iterator for Segments<'a> {
    type Item = Result<ParamPathSegment<'a>, RouteError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.tokens.next().map(|token| parse_token(self.spec, token))
    }
}

/// Start parsing a param-path.
pub fn segments(spec: &str) -> Result<Segments<'_>, RouteError> {
    let trimmed = spec.trim();
    let body = trimmed
        .strip_prefix(PATH_ELEMENT_SEPARATOR)
        .unwrap_or(trimmed)
        .trim_end_matches(PATH_ELEMENT_SEPARATOR);

    if body.is_empty() {
        return Err(RouteError::invalid_spec(spec, "path cannot be empty"));
    }

    Ok(Segments {
        spec,
        tokens: body.split(PATH_ELEMENT_SEPARATOR),
    })
}

/// Parse a param-path into its segments.
pub fn compile(spec: &str) -> Result<Vec<ParamPathSegment<'_>>, RouteError> {
    segments(spec)?.collect()
}

/// Names of the parameters declared by a param-path, left to right.
pub fn param_names(spec: &str) -> Result<Vec<&str>, RouteError> {
    let mut names = Vec::new();
    for segment in segments(spec)? {
        if let Some(name) = segment?.param_name() {
            names.push(name);
        }
    }
    Ok(names)
}

fn parse_token<'a>(spec: &str, token: &'a str) -> Result<ParamPathSegment<'a>, RouteError> {
    if token.is_empty() {
        return Err(RouteError::invalid_spec(spec, "empty path segment"));
    }

    let Some(param) = token.strip_prefix(PARAM_PREFIX) else {
        return Ok(ParamPathSegment::Literal(token));
    };

    let segment = match param.find(CUSTOM_PATTERN_START) {
        Some(start) => {
            let pattern = param[start + 1..]
                .strip_suffix(CUSTOM_PATTERN_END)
                .ok_or_else(|| RouteError::invalid_spec(spec, "unterminated custom pattern"))?;
            if pattern.is_empty() {
                return Err(RouteError::invalid_spec(spec, "empty custom pattern"));
            }
            ParamPathSegment::ParamWithPattern {
                name: &param[..start],
                pattern,
            }
        }
        None => ParamPathSegment::Param(param),
    };

    match segment.param_name() {
        Some("") => Err(RouteError::invalid_spec(spec, "parameter name cannot be empty")),
        _ => Ok(segment),
    }
}
