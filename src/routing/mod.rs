//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     RouteSpec (controller?, action?, param-path?)
//!     → param_path.rs (split into literal / param segments)
//!     → matcher.rs (anchored regex + specificity class)
//!     → router.rs (RouteTable, partitioned by class)
//!
//! Incoming Request (path):
//!     → request.rs (strip context, split leading tokens)
//!     → router.rs (literal routes first, then parameterized)
//!     → Return: matched route + bindings, or None
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Custom patterns validated at compile time, never on first request
//! - Deterministic: same input always matches same route
//! - A miss is `None`, never an error

pub mod error;
pub mod matcher;
pub mod param_path;
pub mod request;
pub mod router;

pub use error::RouteError;
pub use matcher::{CompiledRoute, RouteClass, RouteParams, RouteSpec};
pub use param_path::ParamPathSegment;
pub use request::{strip_context_path, RequestRouter, RoutedRequest};
pub use router::{ResolvedRoute, RouteTable};
