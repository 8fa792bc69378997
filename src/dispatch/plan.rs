//! The per-request dispatch plan.

use serde::Serialize;

use crate::metadata::{ActionKey, ActionSignature, ControllerDescriptor, InterceptorDescriptor, Lifecycle};
use crate::routing::{RouteClass, RouteSpec};

/// A declared parameter and the value the path bound to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArgumentBinding<'a> {
    pub name: &'a str,
    pub value: Option<String>,
}

/// One invocation in a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step<'a> {
    InterceptorBefore { interceptor: &'a str, method: &'a str },
    ControllerBefore { method: &'a str },
    Action { method: &'a str },
    ControllerAfter { method: &'a str },
    InterceptorAfter { interceptor: &'a str, method: &'a str },
}

/// Everything the invocation layer needs for one request: which controller,
/// which action, the bound arguments, and the hooks around it.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchPlan<'a> {
    pub controller: &'a str,
    pub lifecycle: Lifecycle,
    pub route: &'a RouteSpec,
    pub route_class: RouteClass,
    pub selected_by: ActionKey,
    pub action: &'a ActionSignature,
    pub arguments: Vec<ArgumentBinding<'a>>,
    #[serde(serialize_with = "serialize_chain")]
    pub interceptors: Vec<&'a InterceptorDescriptor>,
    steps: Vec<Step<'a>>,
}

impl<'a> DispatchPlan<'a> {
    pub(crate) fn new(
        controller: &'a ControllerDescriptor,
        route: &'a RouteSpec,
        route_class: RouteClass,
        selected_by: ActionKey,
        action: &'a ActionSignature,
        arguments: Vec<ArgumentBinding<'a>>,
        interceptors: Vec<&'a InterceptorDescriptor>,
    ) -> Self {
        let steps = plan_steps(controller, action, &interceptors);
        Self {
            controller: controller.name(),
            lifecycle: controller.lifecycle(),
            route,
            route_class,
            selected_by,
            action,
            arguments,
            interceptors,
            steps,
        }
    }

    /// Invocation order: interceptor befores, controller before hook, action,
    /// controller after hook, interceptor afters.
    pub fn steps(&self) -> &[Step<'a>] {
        &self.steps
    }

    /// Bound value of a declared parameter.
    pub fn argument(&self, name: &str) -> Option<&str> {
        self.arguments
            .iter()
            .find(|a| a.name == name)
            .and_then(|a| a.value.as_deref())
    }

    pub fn interceptor_names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.interceptors.iter().map(|&i| i.type_name())
    }
}

fn plan_steps<'a>(
    controller: &'a ControllerDescriptor,
    action: &'a ActionSignature,
    interceptors: &[&'a InterceptorDescriptor],
) -> Vec<Step<'a>> {
    let mut steps = Vec::with_capacity(interceptors.len() * 2 + 3);

    for interceptor in interceptors {
        if let Some(hook) = interceptor.before() {
            steps.push(Step::InterceptorBefore {
                interceptor: interceptor.type_name(),
                method: hook.method_name(),
            });
        }
    }
    if let Some(hook) = controller.before_action() {
        steps.push(Step::ControllerBefore {
            method: hook.method_name(),
        });
    }
    steps.push(Step::Action {
        method: action.method_name(),
    });
    if let Some(hook) = controller.after_action() {
        steps.push(Step::ControllerAfter {
            method: hook.method_name(),
        });
    }
    for interceptor in interceptors {
        if let Some(hook) = interceptor.after() {
            steps.push(Step::InterceptorAfter {
                interceptor: interceptor.type_name(),
                method: hook.method_name(),
            });
        }
    }

    steps
}

fn serialize_chain<S: serde::Serializer>(
    chain: &[&InterceptorDescriptor],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(chain.iter().map(|i| i.type_name()))
}
