//! Request dispatch.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     declarations → MetadataRegistry → derived RouteSpecs → RouteTable
//!     → Application (immutable, shared behind ArcSwap)
//!
//! Per request (method, path):
//!     → RouteTable::resolve (route + bindings)
//!     → controller (named, or the default controller)
//!     → action (named; else verb-bound; else default action)
//!     → DispatchPlan (arguments, interceptor chain, invocation steps)
//! ```
//!
//! # Design Decisions
//! - Registry and route table are built together and swapped together
//! - A miss at any step is `None` (404), never an error
//! - A verb or default action is only chosen for a route derived from its own param-path
//! - Reload builds a new `Application`; a live one is never mutated

pub mod plan;

use tracing::{debug, error, info};

use crate::config::AppConfig;
use crate::metadata::{
    ActionKey, ActionSignature, ConfigurationError, ControllerDecl, ControllerDescriptor, HttpMethod,
    InterceptorDecl, MetadataRegistry,
};
use crate::observability::metrics;
use crate::routing::{RouteSpec, RouteTable};

pub use plan::{ArgumentBinding, DispatchPlan, Step};

/// A built registry and the route table derived from it.
#[derive(Debug, Clone, Default)]
pub struct Application {
    registry: MetadataRegistry,
    routes: RouteTable,
}

impl Application {
    pub fn build(
        controllers: &[ControllerDecl],
        interceptors: &[InterceptorDecl],
    ) -> Result<Self, ConfigurationError> {
        let result = MetadataRegistry::build(controllers, interceptors).and_then(|registry| {
            let routes = derive_routes(&registry)?;
            Ok(Self { registry, routes })
        });

        match &result {
            Ok(app) => {
                info!(
                    controllers = app.registry.controllers().len(),
                    interceptors = app.registry.interceptors().len(),
                    routes = app.routes.len(),
                    "Application built"
                );
                metrics::record_registered_routes(app.routes.len());
            }
            Err(e) => error!(rule = e.rule(), error = %e, "Invalid controller configuration"),
        }
        result
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigurationError> {
        Self::build(&config.controllers, &config.interceptors)
    }

    pub fn registry(&self) -> &MetadataRegistry {
        &self.registry
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Resolve a request to its dispatch plan; `None` means not found.
    pub fn dispatch(&self, method: HttpMethod, path: &str) -> Option<DispatchPlan<'_>> {
        let plan = self.plan(method, path);
        match &plan {
            Some(plan) => debug!(
                method = %method,
                path,
                controller = plan.controller,
                action = plan.action.name(),
                "Request dispatched"
            ),
            None => debug!(method = %method, path, "No route"),
        }
        metrics::record_dispatch(plan.as_ref().map(|p| p.route_class));
        plan
    }

    fn plan(&self, method: HttpMethod, path: &str) -> Option<DispatchPlan<'_>> {
        let resolved = self.routes.resolve(path)?;
        let route = resolved.spec();

        let controller = match &route.controller {
            Some(name) => self.registry.controller(name)?,
            None => self.registry.default_controller()?,
        };

        // An action without a name token only runs on a route shaped by its own param-path.
        let owns_route = |action: &&ActionSignature| action.param_path() == route.param_path.as_deref();
        let (selected_by, action) = match &route.action {
            Some(name) => (ActionKey::Named(name.clone()), controller.action(name)?),
            None => match controller.http_action(method).filter(owns_route) {
                Some(action) => (ActionKey::Http(method), action),
                None => (ActionKey::Default, controller.default_action().filter(owns_route)?),
            },
        };

        let arguments = action
            .param_names()
            .iter()
            .map(|name| ArgumentBinding {
                name: name.as_str(),
                value: resolved.params.get(name).map(str::to_string),
            })
            .collect();
        let interceptors = self.registry.interceptor_chain(controller, action);

        Some(DispatchPlan::new(
            controller,
            route,
            resolved.route.class(),
            selected_by,
            action,
            arguments,
            interceptors,
        ))
    }
}

/// Derive every route from the registry, in controller declaration order. The
/// default controller's shapes are registered again without a controller token,
/// after all named routes.
fn derive_routes(registry: &MetadataRegistry) -> Result<RouteTable, ConfigurationError> {
    let mut table = RouteTable::new();

    for controller in registry.controllers() {
        for spec in controller_routes(controller, Some(controller.name())) {
            add_route(&mut table, spec)?;
        }
    }
    if let Some(controller) = registry.default_controller() {
        for spec in controller_routes(controller, None) {
            add_route(&mut table, spec)?;
        }
    }

    Ok(table)
}

fn controller_routes(controller: &ControllerDescriptor, name: Option<&str>) -> Vec<RouteSpec> {
    let shape = |action: Option<&str>, param_path: Option<&str>| RouteSpec {
        controller: name.map(str::to_string),
        action: action.map(str::to_string),
        param_path: param_path.map(str::to_string),
    };

    let mut specs: Vec<RouteSpec> = controller
        .named_actions()
        .map(|(action, signature)| shape(Some(action), signature.param_path()))
        .collect();
    if let Some(signature) = controller.default_action() {
        specs.push(shape(None, signature.param_path()));
    }
    specs.extend(
        controller
            .actions()
            .iter()
            .filter(|signature| !signature.http_methods().is_empty())
            .map(|signature| shape(None, signature.param_path())),
    );
    specs
}

fn add_route(table: &mut RouteTable, spec: RouteSpec) -> Result<(), ConfigurationError> {
    if table.contains(&spec) {
        return Ok(());
    }
    table
        .add(spec.clone())
        .map_err(|source| ConfigurationError::Route { route: spec, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{MethodDecl, OutputKind, ParamDecl};

    fn app() -> Application {
        Application::build(
            &[
                ControllerDecl::stateless("Home")
                    .default_controller()
                    .method(MethodDecl::new("index").default_action().renders(OutputKind::View))
                    .method(MethodDecl::new("about").action().renders(OutputKind::Html)),
                ControllerDecl::stateless("Clients")
                    .named("clients")
                    .method(
                        MethodDecl::new("show")
                            .action()
                            .renders(OutputKind::Json)
                            .param_path(":id<[0-9]+>"),
                    )
                    .method(MethodDecl::new("all").action().renders(OutputKind::Json))
                    .method(
                        MethodDecl::new("create")
                            .http(HttpMethod::Post)
                            .param(ParamDecl::Named("name".into()))
                            .renders(OutputKind::Json),
                    )
                    .method(MethodDecl::new("list").default_action().renders(OutputKind::Json)),
                ControllerDecl::stateless("Api")
                    .named("api")
                    .method(MethodDecl::new("ping").action().renders(OutputKind::PlainText)),
            ],
            &[],
        )
        .unwrap()
    }

    #[test]
    fn test_route_derivation() {
        let app = app();
        let routes: Vec<String> = app.routes().iter().map(|r| r.spec().to_string()).collect();
        assert_eq!(
            routes,
            vec![
                "/Home/about",
                "/Home",
                "/clients/all",
                "/clients",
                "/api/ping",
                "/about",
                "/",
                "/clients/show/:id<[0-9]+>",
            ]
        );
    }

    #[test]
    fn test_dispatch_named_action() {
        let app = app();
        let plan = app.dispatch(HttpMethod::Get, "/clients/show/42").unwrap();
        assert_eq!(plan.controller, "clients");
        assert_eq!(plan.action.name(), "show");
        assert_eq!(plan.selected_by, ActionKey::Named("show".into()));
        assert_eq!(plan.argument("id"), Some("42"));

        assert!(app.dispatch(HttpMethod::Get, "/clients/show/abc").is_none());
    }

    #[test]
    fn test_dispatch_verb_then_default() {
        let app = app();
        let post = app.dispatch(HttpMethod::Post, "/clients").unwrap();
        assert_eq!(post.action.method_name(), "create");
        assert_eq!(post.selected_by, ActionKey::Http(HttpMethod::Post));
        assert_eq!(post.arguments.len(), 1);
        assert_eq!(post.argument("name"), None);

        let get = app.dispatch(HttpMethod::Get, "/clients").unwrap();
        assert_eq!(get.action.method_name(), "list");
        assert_eq!(get.selected_by, ActionKey::Default);
    }

    #[test]
    fn test_dispatch_default_controller() {
        let app = app();
        let root = app.dispatch(HttpMethod::Get, "/").unwrap();
        assert_eq!(root.controller, "Home");
        assert_eq!(root.action.method_name(), "index");

        let about = app.dispatch(HttpMethod::Get, "/about").unwrap();
        assert_eq!(about.controller, "Home");
        assert_eq!(about.action.name(), "about");
    }

    #[test]
    fn test_controller_without_default_has_no_bare_route() {
        let app = app();
        assert!(app.dispatch(HttpMethod::Get, "/api").is_none());
        assert!(app.dispatch(HttpMethod::Get, "/api/ping").is_some());
        assert!(app.dispatch(HttpMethod::Get, "/nowhere").is_none());
    }

    #[test]
    fn test_bad_route_pattern_aborts_build() {
        let err = Application::build(
            &[ControllerDecl::stateless("C").method(
                MethodDecl::new("a")
                    .action()
                    .renders(OutputKind::Json)
                    .param_path(":id<[0-9>"),
            )],
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::Route { .. }));
    }
}
