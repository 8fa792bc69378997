//! Build-time configuration errors.
//!
//! Any of these aborts registry construction; nothing is served until the
//! declaration is fixed.

use thiserror::Error;

use crate::metadata::decl::HttpMethod;
use crate::metadata::signature::HookKind;
use crate::routing::{RouteError, RouteSpec};

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("controller `{controller}` declares no lifecycle marker (stateless, stateful or singleton)")]
    MissingLifecycle { controller: String },

    #[error("controller `{controller}` declares conflicting lifecycle markers: {markers:?}")]
    ConflictingLifecycle {
        controller: String,
        markers: Vec<String>,
    },

    #[error("controller `{controller}` is marked init but is not a singleton")]
    InitRequiresSingleton { controller: String },

    #[error("controller `{controller}` declares no actions")]
    NoActions { controller: String },

    #[error("action method `{method}` of `{controller}` returns `{returns}`, which cannot be rendered")]
    NonRenderableAction {
        controller: String,
        method: String,
        returns: String,
    },

    #[error("controller `{controller}` binds {verb} to both `{first}` and `{second}`")]
    DuplicateHttpMethod {
        controller: String,
        verb: HttpMethod,
        first: String,
        second: String,
    },

    #[error("controller `{controller}` declares action `{action}` more than once")]
    DuplicateAction { controller: String, action: String },

    #[error("controller `{controller}` declares more than one default action (`{first}`, `{second}`)")]
    DuplicateDefaultAction {
        controller: String,
        first: String,
        second: String,
    },

    #[error("`{owner}` declares more than one {kind} hook (`{first}`, `{second}`)")]
    DuplicateHook {
        owner: String,
        kind: HookKind,
        first: String,
        second: String,
    },

    #[error("{kind} hook `{method}` of `{owner}` has an illegal parameter list: {reason}")]
    InvalidHookParams {
        owner: String,
        kind: HookKind,
        method: String,
        reason: &'static str,
    },

    #[error("`{owner}` lists interceptor `{interceptor}` more than once")]
    DuplicateInterceptor { owner: String, interceptor: String },

    #[error("interceptor `{interceptor}` declares neither a before nor an after hook")]
    NoInterceptorHooks { interceptor: String },

    #[error("`{owner}` references undeclared interceptor `{interceptor}`")]
    UnknownInterceptor { owner: String, interceptor: String },

    #[error("controller name `{name}` is used by both `{first}` and `{second}`")]
    DuplicateControllerName {
        name: String,
        first: String,
        second: String,
    },

    #[error("interceptor type `{interceptor}` is declared more than once")]
    DuplicateInterceptorType { interceptor: String },

    #[error("both `{first}` and `{second}` are marked as the default controller")]
    DuplicateDefaultController { first: String, second: String },

    #[error("method `{method}` of `{controller}` has an invalid param path: {source}")]
    InvalidParamPath {
        controller: String,
        method: String,
        #[source]
        source: RouteError,
    },

    #[error("route `{route}` failed to compile: {source}")]
    Route {
        route: RouteSpec,
        #[source]
        source: RouteError,
    },
}

impl ConfigurationError {
    /// Short rule identifier, used as a log field.
    pub fn rule(&self) -> &'static str {
        match self {
            ConfigurationError::MissingLifecycle { .. } => "missing_lifecycle",
            ConfigurationError::ConflictingLifecycle { .. } => "conflicting_lifecycle",
            ConfigurationError::InitRequiresSingleton { .. } => "init_requires_singleton",
            ConfigurationError::NoActions { .. } => "no_actions",
            ConfigurationError::NonRenderableAction { .. } => "non_renderable_action",
            ConfigurationError::DuplicateHttpMethod { .. } => "duplicate_http_method",
            ConfigurationError::DuplicateAction { .. } => "duplicate_action",
            ConfigurationError::DuplicateDefaultAction { .. } => "duplicate_default_action",
            ConfigurationError::DuplicateHook { .. } => "duplicate_hook",
            ConfigurationError::InvalidHookParams { .. } => "invalid_hook_params",
            ConfigurationError::DuplicateInterceptor { .. } => "duplicate_interceptor",
            ConfigurationError::NoInterceptorHooks { .. } => "no_interceptor_hooks",
            ConfigurationError::UnknownInterceptor { .. } => "unknown_interceptor",
            ConfigurationError::DuplicateControllerName { .. } => "duplicate_controller_name",
            ConfigurationError::DuplicateInterceptorType { .. } => "duplicate_interceptor_type",
            ConfigurationError::DuplicateDefaultController { .. } => "duplicate_default_controller",
            ConfigurationError::InvalidParamPath { .. } => "invalid_param_path",
            ConfigurationError::Route { .. } => "route",
        }
    }
}
