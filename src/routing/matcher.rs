//! Route pattern compilation.
//!
//! # Responsibilities
//! - Turn a `RouteSpec` into one anchored regex
//! - Classify the route as literal or parameterized
//! - Extract parameter bindings from a matching path
//!
//! # Design Decisions
//! - Controller and action tokens are always literals (regex-escaped)
//! - Custom parameter patterns are validated here, at build time, not on first request
//! - Parameters are bound by capture group index; groups inside a custom pattern are
//!   counted so they never shift later bindings

use std::fmt;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::routing::param_path::{self, ParamPathSegment, PATH_ELEMENT_SEPARATOR};
use crate::routing::RouteError;

/// Sub-pattern used for a parameter without a custom pattern.
pub const DEFAULT_PARAM_PATTERN: &str = "[^/]+";

/// A declared, routable endpoint shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteSpec {
    pub controller: Option<String>,
    pub action: Option<String>,
    pub param_path: Option<String>,
}

impl RouteSpec {
    /// The root route (`/`).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_controller(mut self, controller: impl Into<String>) -> Self {
        self.controller = Some(controller.into());
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_param_path(mut self, param_path: impl Into<String>) -> Self {
        self.param_path = Some(param_path.into());
        self
    }
}

impl fmt::Display for RouteSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = [&self.controller, &self.action, &self.param_path];
        let mut wrote = false;
        for part in parts.into_iter().flatten() {
            write!(f, "/{}", part.trim_start_matches(PATH_ELEMENT_SEPARATOR))?;
            wrote = true;
        }
        if !wrote {
            write!(f, "/")?;
        }
        Ok(())
    }
}

/// Specificity class used to order resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteClass {
    /// No parameter segments.
    Literal,
    /// At least one parameter segment.
    Parameterized,
}

impl RouteClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteClass::Literal => "literal",
            RouteClass::Parameterized => "parameterized",
        }
    }
}

/// Parameter values extracted from a matched path, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    bindings: Vec<(String, String)>,
}

impl RouteParams {
    /// Value bound to `name`, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl Serialize for RouteParams {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// A route shape compiled into an anchored matcher.
#[derive(Debug, Clone)]
pub struct CompiledRoute {
    spec: RouteSpec,
    pattern: Regex,
    /// (parameter name, capture group index)
    params: Vec<(String, usize)>,
    class: RouteClass,
}

impl CompiledRoute {
    /// Compile a route shape.
    pub fn compile(spec: RouteSpec) -> Result<Self, RouteError> {
        let mut source = String::from("^");
        let mut params: Vec<(String, usize)> = Vec::new();
        let mut next_group = 1;

        for literal in [&spec.controller, &spec.action].into_iter().flatten() {
            source.push(PATH_ELEMENT_SEPARATOR);
            source.push_str(&regex::escape(literal));
        }

        if let Some(param_path) = &spec.param_path {
            for segment in param_path::segments(param_path)? {
                source.push(PATH_ELEMENT_SEPARATOR);
                let segment = segment?;
                let sub_pattern = match segment {
                    ParamPathSegment::Literal(text) => {
                        source.push_str(&regex::escape(text));
                        continue;
                    }
                    ParamPathSegment::Param(_) => DEFAULT_PARAM_PATTERN,
                    ParamPathSegment::ParamWithPattern { pattern, .. } => pattern,
                };

                // Validate the custom pattern on its own so errors point at it,
                // and count its groups so later parameters keep the right index.
                let inner = Regex::new(sub_pattern).map_err(|source| {
                    RouteError::InvalidRoutePattern {
                        pattern: sub_pattern.to_string(),
                        source,
                    }
                })?;

                let name = segment.param_name().unwrap_or_default();
                if params.iter().any(|(existing, _)| existing == name) {
                    return Err(RouteError::DuplicateParam {
                        spec: param_path.clone(),
                        name: name.to_string(),
                    });
                }
                params.push((name.to_string(), next_group));
                next_group += inner.captures_len();

                source.push('(');
                source.push_str(sub_pattern);
                source.push(')');
            }
        }

        if source.len() == 1 {
            source.push(PATH_ELEMENT_SEPARATOR);
        }
        source.push('$');

        let pattern = Regex::new(&source).map_err(|source_err| RouteError::InvalidRoutePattern {
            pattern: source.clone(),
            source: source_err,
        })?;

        let class = if params.is_empty() {
            RouteClass::Literal
        } else {
            RouteClass::Parameterized
        };

        Ok(Self {
            spec,
            pattern,
            params,
            class,
        })
    }

    pub fn spec(&self) -> &RouteSpec {
        &self.spec
    }

    pub fn class(&self) -> RouteClass {
        self.class
    }

    /// The anchored regex source, e.g. `^/cntrl/actn/clients/([^/]+)$`.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Parameter names in binding order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|(name, _)| name.as_str())
    }

    /// Match a full path, returning the parameter bindings on success.
    pub fn matches(&self, path: &str) -> Option<RouteParams> {
        self.pattern.captures(path).map(|caps| self.bind(&caps))
    }

    fn bind(&self, caps: &Captures<'_>) -> RouteParams {
        let bindings = self
            .params
            .iter()
            .filter_map(|(name, group)| {
                caps.get(*group)
                    .map(|m| (name.clone(), m.as_str().to_string()))
            })
            .collect();
        RouteParams { bindings }
    }
}
