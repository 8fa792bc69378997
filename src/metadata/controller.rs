//! Controller descriptor builder.
//!
//! # Responsibilities
//! - Validate a controller declaration against the structural rules
//! - Produce an immutable `ControllerDescriptor` or the first violation
//!
//! # Design Decisions
//! - All-or-nothing: no partial descriptor is ever returned
//! - Method-level interceptor lists replace the class-level list (override, not merge)
//! - Hook result types are not checked; action result types must be renderable

use std::collections::BTreeMap;

use serde::Serialize;

use crate::metadata::decl::{ControllerDecl, ControllerMarker, HttpMethod, MethodAnnotation, MethodDecl, ParamDecl};
use crate::metadata::signature::{ActionSignature, HookKind};
use crate::metadata::ConfigurationError;
use crate::routing::param_path;

/// Instance lifecycle of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    Stateless,
    Stateful,
    Singleton,
    /// Singleton created at startup rather than on first use.
    InitOnStartup,
}

/// Validated metadata for one controller type.
#[derive(Debug, Clone)]
pub struct ControllerDescriptor {
    type_name: String,
    name: String,
    lifecycle: Lifecycle,
    is_default: bool,
    before_action: Option<ActionSignature>,
    after_action: Option<ActionSignature>,
    after_construct: Option<ActionSignature>,
    /// One signature per action method, in declaration order.
    actions: Vec<ActionSignature>,
    /// Action name → index into `actions`, in declaration order. Linear lookup
    /// is fine for the handful of actions a controller carries.
    named: Vec<(String, usize)>,
    by_http: BTreeMap<HttpMethod, usize>,
    default_action: Option<usize>,
    class_interceptors: Vec<String>,
    /// Action index → method-level interceptor list.
    method_interceptors: BTreeMap<usize, Vec<String>>,
    /// Lists declared on methods that are not actions. Validated, never applied.
    hook_interceptors: Vec<String>,
}

impl ControllerDescriptor {
    pub fn build(decl: &ControllerDecl) -> Result<Self, ConfigurationError> {
        let owner = decl.type_name.as_str();
        let (lifecycle, name) = resolve_lifecycle(decl)?;

        let class_interceptors = decl.interceptors.clone().unwrap_or_default();
        ensure_unique_interceptors(owner, &class_interceptors)?;

        let mut descriptor = ControllerDescriptor {
            type_name: decl.type_name.clone(),
            name,
            lifecycle,
            is_default: decl.markers.contains(&ControllerMarker::Default),
            before_action: None,
            after_action: None,
            after_construct: None,
            actions: Vec::new(),
            named: Vec::new(),
            by_http: BTreeMap::new(),
            default_action: None,
            class_interceptors,
            method_interceptors: BTreeMap::new(),
            hook_interceptors: Vec::new(),
        };

        for method in &decl.methods {
            if method.has(&MethodAnnotation::AfterConstruct) {
                set_hook(owner, HookKind::AfterConstruct, &mut descriptor.after_construct, method)?;
            }
            if method.has(&MethodAnnotation::BeforeAction) {
                set_hook(owner, HookKind::BeforeAction, &mut descriptor.before_action, method)?;
            }
            if method.has(&MethodAnnotation::AfterAction) {
                set_hook(owner, HookKind::AfterAction, &mut descriptor.after_action, method)?;
            }
            descriptor.add_action(method)?;
        }

        if descriptor.actions.is_empty() && descriptor.lifecycle != Lifecycle::InitOnStartup {
            return Err(ConfigurationError::NoActions {
                controller: descriptor.type_name,
            });
        }

        Ok(descriptor)
    }

    fn add_action(&mut self, method: &MethodDecl) -> Result<(), ConfigurationError> {
        let mut names = Vec::new();
        let mut verbs = Vec::new();
        for annotation in &method.annotations {
            match annotation {
                MethodAnnotation::Action(name) => {
                    names.push(name.clone().unwrap_or_else(|| method.name.clone()))
                }
                MethodAnnotation::HttpMethod(verb) => verbs.push(*verb),
                _ => {}
            }
        }
        verbs.sort();
        verbs.dedup();
        let is_default = method.has(&MethodAnnotation::DefaultAction);

        if let Some(interceptors) = &method.interceptors {
            ensure_unique_interceptors(&format!("{}::{}", self.type_name, method.name), interceptors)?;
        }

        if names.is_empty() && verbs.is_empty() && !is_default {
            if let Some(interceptors) = &method.interceptors {
                self.hook_interceptors.extend(interceptors.iter().cloned());
            }
            return Ok(());
        }

        let output = method
            .returns
            .output()
            .ok_or_else(|| ConfigurationError::NonRenderableAction {
                controller: self.type_name.clone(),
                method: method.name.clone(),
                returns: method.returns.to_string(),
            })?;

        let index = self.actions.len();

        for name in &names {
            if self.named.iter().any(|(existing, _)| existing == name) {
                return Err(ConfigurationError::DuplicateAction {
                    controller: self.type_name.clone(),
                    action: name.clone(),
                });
            }
            self.named.push((name.clone(), index));
        }

        for verb in &verbs {
            if let Some(&other) = self.by_http.get(verb) {
                return Err(ConfigurationError::DuplicateHttpMethod {
                    controller: self.type_name.clone(),
                    verb: *verb,
                    first: self.actions[other].method_name().to_string(),
                    second: method.name.clone(),
                });
            }
            self.by_http.insert(*verb, index);
        }

        if is_default {
            if let Some(other) = self.default_action {
                return Err(ConfigurationError::DuplicateDefaultAction {
                    controller: self.type_name.clone(),
                    first: self.actions[other].method_name().to_string(),
                    second: method.name.clone(),
                });
            }
            self.default_action = Some(index);
        }

        if let Some(interceptors) = &method.interceptors {
            self.method_interceptors.insert(index, interceptors.clone());
        }

        let param_names = declared_param_names(&self.type_name, method)?;
        let primary = names.first().cloned().unwrap_or_else(|| method.name.clone());
        self.actions.push(ActionSignature::action(
            method,
            primary,
            verbs,
            param_names,
            is_default,
            output,
        ));
        Ok(())
    }

    /// Declared type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Name used in routes.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_default(&self) -> bool {
        self.is_default
    }

    pub fn before_action(&self) -> Option<&ActionSignature> {
        self.before_action.as_ref()
    }

    pub fn after_action(&self) -> Option<&ActionSignature> {
        self.after_action.as_ref()
    }

    pub fn after_construct(&self) -> Option<&ActionSignature> {
        self.after_construct.as_ref()
    }

    /// Look up an action by name.
    pub fn action(&self, name: &str) -> Option<&ActionSignature> {
        self.named
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, i)| &self.actions[*i])
    }

    /// Look up the action bound to a verb.
    pub fn http_action(&self, verb: HttpMethod) -> Option<&ActionSignature> {
        self.by_http.get(&verb).map(|i| &self.actions[*i])
    }

    pub fn default_action(&self) -> Option<&ActionSignature> {
        self.default_action.map(|i| &self.actions[i])
    }

    /// Every action method, in declaration order.
    pub fn actions(&self) -> &[ActionSignature] {
        &self.actions
    }

    /// Named actions in declaration order.
    pub fn named_actions(&self) -> impl Iterator<Item = (&str, &ActionSignature)> {
        self.named
            .iter()
            .map(|(name, i)| (name.as_str(), &self.actions[*i]))
    }

    /// Verb bindings, ordered by verb.
    pub fn http_actions(&self) -> impl Iterator<Item = (HttpMethod, &ActionSignature)> {
        self.by_http.iter().map(|(verb, i)| (*verb, &self.actions[*i]))
    }

    pub fn class_interceptors(&self) -> &[String] {
        &self.class_interceptors
    }

    /// Interceptors guarding `action`: its own list if declared, else the class list.
    pub fn interceptors_for(&self, action: &ActionSignature) -> &[String] {
        self.actions
            .iter()
            .position(|a| a == action)
            .and_then(|i| self.method_interceptors.get(&i))
            .map(Vec::as_slice)
            .unwrap_or(&self.class_interceptors)
    }

    /// Every interceptor type referenced anywhere in this controller.
    pub(crate) fn referenced_interceptors(&self) -> impl Iterator<Item = &str> {
        self.class_interceptors
            .iter()
            .chain(self.method_interceptors.values().flatten())
            .chain(&self.hook_interceptors)
            .map(String::as_str)
    }
}

fn resolve_lifecycle(decl: &ControllerDecl) -> Result<(Lifecycle, String), ConfigurationError> {
    let markers: Vec<&ControllerMarker> = decl.markers.iter().filter(|m| m.is_lifecycle()).collect();

    let marker = match markers.as_slice() {
        [] => {
            return Err(ConfigurationError::MissingLifecycle {
                controller: decl.type_name.clone(),
            })
        }
        [one] => *one,
        many => {
            return Err(ConfigurationError::ConflictingLifecycle {
                controller: decl.type_name.clone(),
                markers: many.iter().map(|m| String::from((*m).clone())).collect(),
            })
        }
    };

    let mut lifecycle = match marker {
        ControllerMarker::Stateful(_) => Lifecycle::Stateful,
        ControllerMarker::Singleton(_) => Lifecycle::Singleton,
        _ => Lifecycle::Stateless,
    };

    if decl.markers.contains(&ControllerMarker::Init) {
        if lifecycle != Lifecycle::Singleton {
            return Err(ConfigurationError::InitRequiresSingleton {
                controller: decl.type_name.clone(),
            });
        }
        lifecycle = Lifecycle::InitOnStartup;
    }

    let name = marker
        .lifecycle_name()
        .unwrap_or(&decl.type_name)
        .to_string();
    Ok((lifecycle, name))
}

/// Record a hook, enforcing singularity and the hook calling convention.
pub(crate) fn set_hook(
    owner: &str,
    kind: HookKind,
    slot: &mut Option<ActionSignature>,
    method: &MethodDecl,
) -> Result<(), ConfigurationError> {
    if let Some(existing) = slot {
        return Err(ConfigurationError::DuplicateHook {
            owner: owner.to_string(),
            kind,
            first: existing.method_name().to_string(),
            second: method.name.clone(),
        });
    }

    let reason = match (kind, method.params.as_slice()) {
        (_, []) => None,
        (HookKind::AfterConstruct, _) => Some("after-construct hooks take no parameters"),
        (_, [ParamDecl::Context]) => None,
        _ => Some("expected no parameters or a single request context"),
    };
    if let Some(reason) = reason {
        return Err(ConfigurationError::InvalidHookParams {
            owner: owner.to_string(),
            kind,
            method: method.name.clone(),
            reason,
        });
    }

    *slot = Some(ActionSignature::hook(method));
    Ok(())
}

pub(crate) fn ensure_unique_interceptors(owner: &str, interceptors: &[String]) -> Result<(), ConfigurationError> {
    for (i, interceptor) in interceptors.iter().enumerate() {
        if interceptors[..i].contains(interceptor) {
            return Err(ConfigurationError::DuplicateInterceptor {
                owner: owner.to_string(),
                interceptor: interceptor.clone(),
            });
        }
    }
    Ok(())
}

fn declared_param_names(controller: &str, method: &MethodDecl) -> Result<Vec<String>, ConfigurationError> {
    match &method.param_path {
        Some(spec) => param_path::param_names(spec)
            .map(|names| names.into_iter().map(str::to_string).collect())
            .map_err(|source| ConfigurationError::InvalidParamPath {
                controller: controller.to_string(),
                method: method.name.clone(),
                source,
            }),
        None => Ok(method
            .params
            .iter()
            .filter_map(|p| match p {
                ParamDecl::Named(name) => Some(name.clone()),
                _ => None,
            })
            .collect()),
    }
}
