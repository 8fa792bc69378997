//! Route lookup.
//!
//! # Responsibilities
//! - Store compiled routes
//! - Resolve a path to exactly one route plus its parameter bindings
//! - Return an explicit miss rather than an error
//!
//! # Design Decisions
//! - Immutable once handed to an `Application` (thread-safe without locks)
//! - Literal routes are scanned before parameterized ones, each in registration order
//! - O(n) scan over anchored patterns (acceptable for typical route counts)

use tracing::trace;

use crate::routing::matcher::{CompiledRoute, RouteClass, RouteParams, RouteSpec};
use crate::routing::RouteError;

/// A successful resolution.
#[derive(Debug, Clone)]
pub struct ResolvedRoute<'a> {
    pub route: &'a CompiledRoute,
    pub params: RouteParams,
}

impl<'a> ResolvedRoute<'a> {
    pub fn spec(&self) -> &'a RouteSpec {
        self.route.spec()
    }
}

/// All compiled routes, partitioned by specificity class.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    literal: Vec<CompiledRoute>,
    parameterized: Vec<CompiledRoute>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile and register a route shape.
    pub fn add(&mut self, spec: RouteSpec) -> Result<(), RouteError> {
        let route = CompiledRoute::compile(spec)?;
        trace!(route = %route.spec(), pattern = route.pattern(), class = route.class().as_str(), "Route compiled");

        match route.class() {
            RouteClass::Literal => self.literal.push(route),
            RouteClass::Parameterized => self.parameterized.push(route),
        }
        Ok(())
    }

    /// Whether an identical shape is already registered.
    pub fn contains(&self, spec: &RouteSpec) -> bool {
        self.iter().any(|route| route.spec() == spec)
    }

    /// Resolve a path. `None` means no route matches (a 404, not a failure).
    pub fn resolve(&self, path: &str) -> Option<ResolvedRoute<'_>> {
        self.iter().find_map(|route| {
            route
                .matches(path)
                .map(|params| ResolvedRoute { route, params })
        })
    }

    pub fn len(&self) -> usize {
        self.literal.len() + self.parameterized.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Routes in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &CompiledRoute> {
        self.literal.iter().chain(self.parameterized.iter())
    }
}
