//! Controller and interceptor metadata.
//!
//! # Data Flow
//! ```text
//! ControllerDecl[] / InterceptorDecl[]  (manifest or builder calls)
//!     → interceptor.rs (validate hooks)
//!     → controller.rs (validate lifecycle, actions, hooks, interceptor lists)
//!     → registry.rs (registry-wide rules, lookup tables)
//!     → Immutable MetadataRegistry
//! ```
//!
//! # Design Decisions
//! - Declarations replace reflective discovery; nothing is scanned at runtime
//! - Validation happens at build time only; lookups never fail with an error
//! - Descriptors are immutable and shared read-only across requests

pub mod controller;
pub mod decl;
pub mod error;
pub mod interceptor;
pub mod registry;
pub mod signature;

pub use controller::{ControllerDescriptor, Lifecycle};
pub use decl::{
    ControllerDecl, ControllerMarker, DeclError, HttpMethod, InterceptorDecl, MethodAnnotation, MethodDecl,
    OutputKind, ParamDecl, ReturnType,
};
pub use error::ConfigurationError;
pub use interceptor::InterceptorDescriptor;
pub use registry::MetadataRegistry;
pub use signature::{ActionKey, ActionSignature, HookKind};
