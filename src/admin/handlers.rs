use axum::{extract::State, Json};
use serde::Serialize;

use crate::http::server::AppState;
use crate::metadata::{ActionSignature, ControllerDescriptor, Lifecycle};
use crate::routing::RouteClass;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub controllers: usize,
    pub interceptors: usize,
    pub routes: usize,
}

#[derive(Serialize)]
pub struct RouteSummary {
    pub route: String,
    pub pattern: String,
    pub class: RouteClass,
    pub controller: Option<String>,
    pub action: Option<String>,
    pub param_path: Option<String>,
}

#[derive(Serialize)]
pub struct ControllerSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub lifecycle: Lifecycle,
    pub is_default: bool,
    pub actions: Vec<ActionSignature>,
    pub before_action: Option<String>,
    pub after_action: Option<String>,
    pub after_construct: Option<String>,
    pub interceptors: Vec<String>,
}

impl From<&ControllerDescriptor> for ControllerSummary {
    fn from(c: &ControllerDescriptor) -> Self {
        let hook = |h: Option<&ActionSignature>| h.map(|s| s.method_name().to_string());
        Self {
            name: c.name().to_string(),
            type_name: c.type_name().to_string(),
            lifecycle: c.lifecycle(),
            is_default: c.is_default(),
            actions: c.actions().to_vec(),
            before_action: hook(c.before_action()),
            after_action: hook(c.after_action()),
            after_construct: hook(c.after_construct()),
            interceptors: c.class_interceptors().to_vec(),
        }
    }
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    let app = state.app.load_full();
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        controllers: app.registry().controllers().len(),
        interceptors: app.registry().interceptors().len(),
        routes: app.routes().len(),
    })
}

/// Compiled routes in evaluation order.
pub async fn get_routes(State(state): State<AppState>) -> Json<Vec<RouteSummary>> {
    let app = state.app.load_full();
    let routes = app
        .routes()
        .iter()
        .map(|r| RouteSummary {
            route: r.spec().to_string(),
            pattern: r.pattern().to_string(),
            class: r.class(),
            controller: r.spec().controller.clone(),
            action: r.spec().action.clone(),
            param_path: r.spec().param_path.clone(),
        })
        .collect();
    Json(routes)
}

pub async fn get_controllers(State(state): State<AppState>) -> Json<Vec<ControllerSummary>> {
    let app = state.app.load_full();
    Json(
        app.registry()
            .controllers()
            .iter()
            .map(ControllerSummary::from)
            .collect(),
    )
}
