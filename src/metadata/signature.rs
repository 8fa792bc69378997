//! Calling contracts for actions and hooks.

use std::fmt;

use serde::Serialize;

use crate::metadata::decl::{HttpMethod, MethodDecl, OutputKind, ParamDecl};

/// The calling contract of an action or hook method.
///
/// Built once while a descriptor is assembled; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionSignature {
    method_name: String,
    name: String,
    http_methods: Vec<HttpMethod>,
    param_names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    param_path: Option<String>,
    is_default: bool,
    accepts_context: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<OutputKind>,
}

impl ActionSignature {
    /// Signature for a hook method; hooks are addressed by method name.
    pub(crate) fn hook(method: &MethodDecl) -> Self {
        Self {
            method_name: method.name.clone(),
            name: method.name.clone(),
            http_methods: Vec::new(),
            param_names: Vec::new(),
            param_path: None,
            is_default: false,
            accepts_context: method.params.contains(&ParamDecl::Context),
            output: method.returns.output(),
        }
    }

    pub(crate) fn action(
        method: &MethodDecl,
        name: String,
        http_methods: Vec<HttpMethod>,
        param_names: Vec<String>,
        is_default: bool,
        output: OutputKind,
    ) -> Self {
        Self {
            method_name: method.name.clone(),
            name,
            http_methods,
            param_names,
            param_path: method.param_path.clone(),
            is_default,
            accepts_context: method.params.contains(&ParamDecl::Context),
            output: Some(output),
        }
    }

    /// Name of the declaring method.
    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    /// Action name used in routes; the method name unless overridden.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Verbs this action is bound to; empty when it has no verb binding.
    pub fn http_methods(&self) -> &[HttpMethod] {
        &self.http_methods
    }

    /// Declared parameter names, in binding order.
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    pub fn param_path(&self) -> Option<&str> {
        self.param_path.as_deref()
    }

    pub fn is_default(&self) -> bool {
        self.is_default
    }

    pub fn accepts_context(&self) -> bool {
        self.accepts_context
    }

    pub fn output(&self) -> Option<OutputKind> {
        self.output
    }
}

/// The kinds of lifecycle hook a controller or interceptor may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HookKind {
    BeforeAction,
    AfterAction,
    AfterConstruct,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HookKind::BeforeAction => "before-action",
            HookKind::AfterAction => "after-action",
            HookKind::AfterConstruct => "after-construct",
        })
    }
}

/// How an action was selected for a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "by", content = "value", rename_all = "snake_case")]
pub enum ActionKey {
    Named(String),
    Http(HttpMethod),
    Default,
}
