//! Route matching and controller metadata for an MVC dispatcher.
//!
//! Two subsystems, built once at startup and read concurrently afterwards:
//! - `routing`: compiles route shapes into anchored matchers and resolves a
//!   path to exactly one route plus its parameter bindings
//! - `metadata`: validates controller and interceptor declarations into an
//!   immutable registry of action contracts and interceptor chains
//!
//! `dispatch::Application` ties them together; the rest is the service around it.

pub mod admin;
pub mod config;
pub mod dispatch;
pub mod http;
pub mod lifecycle;
pub mod metadata;
pub mod observability;
pub mod routing;

pub use config::schema::AppConfig;
pub use dispatch::{Application, DispatchPlan};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use metadata::{ConfigurationError, MetadataRegistry};
pub use routing::{RouteError, RouteSpec, RouteTable};
