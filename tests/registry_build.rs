//! Registry construction and dispatch planning over the shop fixture.

mod common;

use action_dispatch::dispatch::{Application, Step};
use action_dispatch::metadata::{
    ActionKey, ConfigurationError, ControllerDecl, HttpMethod, Lifecycle, MethodDecl, OutputKind,
};

use common::{interceptors, json_action, shop, shop_controllers};

#[test]
fn test_registry_lookups() {
    let app = shop();
    let registry = app.registry();

    assert_eq!(registry.controllers().len(), 3);
    assert_eq!(registry.default_controller().unwrap().name(), "Storefront");
    assert_eq!(registry.http_action("products", HttpMethod::Post).unwrap().method_name(), "create");
    assert!(registry.controller("ProductController").is_none());

    let init: Vec<_> = registry.init_controllers().map(|c| c.name()).collect();
    assert_eq!(init, vec!["Warmup"]);
}

#[test]
fn test_plan_steps_order() {
    let app = shop();
    let plan = app.dispatch(HttpMethod::Get, "/products/show/12").unwrap();

    assert_eq!(plan.controller, "products");
    assert_eq!(plan.lifecycle, Lifecycle::Stateless);
    assert_eq!(plan.argument("id"), Some("12"));
    assert_eq!(
        plan.steps(),
        &[
            Step::InterceptorBefore { interceptor: "Audit", method: "before" },
            Step::ControllerBefore { method: "load" },
            Step::Action { method: "show" },
            Step::ControllerAfter { method: "cleanup" },
            Step::InterceptorAfter { interceptor: "Audit", method: "after" },
        ]
    );
}

#[test]
fn test_method_interceptors_replace_class_list() {
    let app = shop();
    let plan = app.dispatch(HttpMethod::Get, "/products/by_slug/slug/red-shoes").unwrap();
    assert_eq!(plan.argument("slug"), Some("red-shoes"));
    assert_eq!(plan.interceptor_names().collect::<Vec<_>>(), vec!["Auth", "Timing"]);

    let befores: Vec<_> = plan
        .steps()
        .iter()
        .filter_map(|s| match s {
            Step::InterceptorBefore { interceptor, .. } => Some(*interceptor),
            _ => None,
        })
        .collect();
    assert_eq!(befores, vec!["Auth", "Timing"]);
}

#[test]
fn test_verb_and_default_selection() {
    let app = shop();

    let plan = app.dispatch(HttpMethod::Post, "/products").unwrap();
    assert_eq!(plan.selected_by, ActionKey::Http(HttpMethod::Post));
    assert_eq!(plan.action.param_names(), ["name".to_string()]);
    assert_eq!(plan.argument("name"), None);

    let plan = app.dispatch(HttpMethod::Delete, "/products").unwrap();
    assert_eq!(plan.selected_by, ActionKey::Default);
    assert_eq!(plan.action.method_name(), "index");
}

#[test]
fn test_default_controller_routes() {
    let app = shop();

    let plan = app.dispatch(HttpMethod::Get, "/").unwrap();
    assert_eq!(plan.controller, "Storefront");
    assert_eq!(plan.action.method_name(), "home");
    assert!(plan.interceptors.is_empty());

    let plan = app.dispatch(HttpMethod::Get, "/about").unwrap();
    assert_eq!(plan.controller, "Storefront");
    assert_eq!(plan.selected_by, ActionKey::Named("about".into()));

    // Named controllers still win over default-controller actions.
    let plan = app.dispatch(HttpMethod::Get, "/products/all").unwrap();
    assert_eq!(plan.controller, "products");
}

#[test]
fn test_init_controller_has_no_routes() {
    let app = shop();
    assert!(app.dispatch(HttpMethod::Get, "/Warmup").is_none());
    assert!(app
        .routes()
        .iter()
        .all(|r| r.spec().controller.as_deref() != Some("Warmup")));
}

#[test]
fn test_plan_serializes() {
    let app = shop();
    let plan = app.dispatch(HttpMethod::Get, "/products/show/5").unwrap();
    let json = serde_json::to_value(&plan).unwrap();

    assert_eq!(json["controller"], "products");
    assert_eq!(json["route_class"], "parameterized");
    assert_eq!(json["selected_by"]["by"], "named");
    assert_eq!(json["action"]["output"], "json");
    assert_eq!(json["arguments"][0]["name"], "id");
    assert_eq!(json["arguments"][0]["value"], "5");
    assert_eq!(json["interceptors"][0], "Audit");
    assert_eq!(json["steps"][0]["step"], "interceptor_before");
}

#[test]
fn test_any_invalid_controller_aborts_build() {
    let mut controllers = shop_controllers();
    controllers.push(
        ControllerDecl::stateless("Broken")
            .method(MethodDecl::new("a").http(HttpMethod::Get).renders(OutputKind::Json))
            .method(MethodDecl::new("b").http(HttpMethod::Get).renders(OutputKind::Json)),
    );
    let err = Application::build(&controllers, &interceptors()).unwrap_err();
    assert!(matches!(err, ConfigurationError::DuplicateHttpMethod { .. }));
    assert!(err.to_string().contains("Broken"));
}

#[test]
fn test_unknown_interceptor_aborts_build() {
    let controllers = vec![ControllerDecl::stateless("C")
        .intercepted_by(["Audit", "Missing"])
        .method(json_action("a"))];
    let err = Application::build(&controllers, &interceptors()).unwrap_err();
    assert!(matches!(err, ConfigurationError::UnknownInterceptor { .. }));
}

#[test]
fn test_duplicate_param_aborts_build() {
    let controllers = vec![ControllerDecl::stateless("C").method(json_action("a").param_path(":id/:id"))];
    let err = Application::build(&controllers, &[]).unwrap_err();
    assert!(matches!(err, ConfigurationError::Route { .. }));
}

/// A default action without a param-path next to a PUT action that has one.
fn versioned() -> Application {
    let controllers = vec![ControllerDecl::stateless("C")
        .named("c")
        .method(MethodDecl::new("list").default_action().renders(OutputKind::Json))
        .method(
            MethodDecl::new("update")
                .http(HttpMethod::Put)
                .param_path(":id")
                .renders(OutputKind::Json),
        )];
    Application::build(&controllers, &[]).unwrap()
}

#[test]
fn test_verb_route_is_not_served_by_default_action() {
    let app = versioned();
    assert!(app.dispatch(HttpMethod::Get, "/c/5").is_none());

    let plan = app.dispatch(HttpMethod::Put, "/c/5").unwrap();
    assert_eq!(plan.action.method_name(), "update");
    assert_eq!(plan.selected_by, ActionKey::Http(HttpMethod::Put));
    assert_eq!(plan.argument("id"), Some("5"));

    let plan = app.dispatch(HttpMethod::Get, "/c").unwrap();
    assert_eq!(plan.action.method_name(), "list");
    assert_eq!(plan.selected_by, ActionKey::Default);
}

#[test]
fn test_bare_route_is_not_served_by_param_path_verb_action() {
    let app = versioned();
    let plan = app.dispatch(HttpMethod::Put, "/c").unwrap();
    assert_eq!(plan.action.method_name(), "list");
    assert_eq!(plan.selected_by, ActionKey::Default);
}

#[test]
fn test_default_action_param_path_beside_verb_action() {
    let controllers = vec![ControllerDecl::stateless("C")
        .named("c")
        .method(
            MethodDecl::new("show")
                .default_action()
                .param_path(":id<[0-9]+>")
                .renders(OutputKind::Json),
        )
        .method(MethodDecl::new("all").http(HttpMethod::Get).renders(OutputKind::Json))];
    let app = Application::build(&controllers, &[]).unwrap();

    let plan = app.dispatch(HttpMethod::Get, "/c/7").unwrap();
    assert_eq!(plan.action.method_name(), "show");
    assert_eq!(plan.selected_by, ActionKey::Default);
    assert_eq!(plan.argument("id"), Some("7"));

    let plan = app.dispatch(HttpMethod::Get, "/c").unwrap();
    assert_eq!(plan.action.method_name(), "all");
    assert_eq!(plan.selected_by, ActionKey::Http(HttpMethod::Get));
}

#[test]
fn test_hook_method_interceptors_must_be_declared() {
    let controllers = vec![ControllerDecl::stateless("C")
        .method(json_action("a"))
        .method(MethodDecl::new("b").before_action().intercepted_by(["Missing"]))];
    let err = Application::build(&controllers, &interceptors()).unwrap_err();
    assert!(matches!(
        err,
        ConfigurationError::UnknownInterceptor { ref interceptor, .. } if interceptor == "Missing"
    ));
}
