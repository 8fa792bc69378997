//! Shared fixtures for integration tests.

#![allow(dead_code)]

use action_dispatch::dispatch::Application;
use action_dispatch::metadata::{
    ControllerDecl, HttpMethod, InterceptorDecl, MethodDecl, OutputKind, ParamDecl,
};
use action_dispatch::routing::{RouteSpec, RouteTable};

/// A route table built from `specs`, in order.
pub fn route_table(specs: &[RouteSpec]) -> RouteTable {
    let mut table = RouteTable::new();
    for spec in specs {
        table.add(spec.clone()).unwrap();
    }
    table
}

pub fn route(controller: Option<&str>, action: Option<&str>, param_path: Option<&str>) -> RouteSpec {
    RouteSpec {
        controller: controller.map(str::to_string),
        action: action.map(str::to_string),
        param_path: param_path.map(str::to_string),
    }
}

/// A JSON action named after its method.
pub fn json_action(name: &str) -> MethodDecl {
    MethodDecl::new(name).action().renders(OutputKind::Json)
}

/// An interceptor with both hooks, each accepting the request context.
pub fn interceptor(type_name: &str) -> InterceptorDecl {
    InterceptorDecl::new(type_name)
        .method(MethodDecl::new("before").before_action().param(ParamDecl::Context))
        .method(MethodDecl::new("after").after_action())
}

pub fn interceptors() -> Vec<InterceptorDecl> {
    vec![interceptor("Audit"), interceptor("Auth"), interceptor("Timing")]
}

/// A small shop: a default storefront plus a guarded product controller.
pub fn shop_controllers() -> Vec<ControllerDecl> {
    vec![
        ControllerDecl::stateless("Storefront")
            .default_controller()
            .method(MethodDecl::new("home").default_action().renders(OutputKind::View))
            .method(MethodDecl::new("about").action().renders(OutputKind::Html)),
        ControllerDecl::stateless("ProductController")
            .named("products")
            .intercepted_by(["Audit"])
            .method(MethodDecl::new("load").before_action().param(ParamDecl::Context))
            .method(MethodDecl::new("cleanup").after_action())
            .method(json_action("all"))
            .method(json_action("show").param_path(":id<[0-9]+>"))
            .method(
                json_action("by_slug")
                    .param_path("slug/:slug<[a-z-]+>")
                    .intercepted_by(["Auth", "Timing"]),
            )
            .method(
                MethodDecl::new("create")
                    .http(HttpMethod::Post)
                    .param(ParamDecl::Named("name".into()))
                    .renders(OutputKind::Json),
            )
            .method(MethodDecl::new("index").default_action().renders(OutputKind::Json)),
        ControllerDecl::singleton("Warmup")
            .init_on_startup()
            .method(MethodDecl::new("prime").after_construct()),
    ]
}

pub fn shop() -> Application {
    Application::build(&shop_controllers(), &interceptors()).unwrap()
}
