//! Declarative type descriptions.
//!
//! Controllers and interceptors are described explicitly, either in the TOML
//! manifest or in code through the builders below. Every string grammar here is
//! what the manifest accepts:
//!
//! ```toml
//! [[controllers]]
//! type = "ClientController"
//! markers = ["stateless:clients", "default"]
//! interceptors = ["AuditInterceptor"]
//!
//! [[controllers.methods]]
//! name = "show"
//! annotations = ["action", "get"]
//! params = ["context"]
//! returns = "json"
//! param_path = "clients/:id<[0-9]+>"
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A declaration string that does not follow its grammar.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeclError {
    #[error("unknown HTTP method `{0}`")]
    UnknownHttpMethod(String),
    #[error("unknown controller marker `{0}`")]
    UnknownMarker(String),
    #[error("unknown method annotation `{0}`")]
    UnknownAnnotation(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Head,
    Options,
    Trace,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Head,
        HttpMethod::Options,
        HttpMethod::Trace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = DeclError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpMethod::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DeclError::UnknownHttpMethod(s.to_string()))
    }
}

/// Type-level markers on a controller.
///
/// Manifest form: `stateless`, `stateful`, `singleton` (each optionally
/// `:<name>`), `default`, `init`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ControllerMarker {
    Stateless(Option<String>),
    Stateful(Option<String>),
    Singleton(Option<String>),
    /// Serves paths that do not name a controller.
    Default,
    /// Singleton created at startup.
    Init,
}

impl ControllerMarker {
    /// The explicit controller name carried by a lifecycle marker.
    pub fn lifecycle_name(&self) -> Option<&str> {
        match self {
            ControllerMarker::Stateless(name)
            | ControllerMarker::Stateful(name)
            | ControllerMarker::Singleton(name) => name.as_deref(),
            _ => None,
        }
    }

    pub fn is_lifecycle(&self) -> bool {
        matches!(
            self,
            ControllerMarker::Stateless(_) | ControllerMarker::Stateful(_) | ControllerMarker::Singleton(_)
        )
    }
}

impl TryFrom<String> for ControllerMarker {
    type Error = DeclError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let (kind, name) = split_qualifier(&value);
        let name = name.map(str::to_string);
        match kind.to_ascii_lowercase().as_str() {
            "stateless" => Ok(ControllerMarker::Stateless(name)),
            "stateful" => Ok(ControllerMarker::Stateful(name)),
            "singleton" => Ok(ControllerMarker::Singleton(name)),
            "default" if name.is_none() => Ok(ControllerMarker::Default),
            "init" if name.is_none() => Ok(ControllerMarker::Init),
            _ => Err(DeclError::UnknownMarker(value)),
        }
    }
}

impl From<ControllerMarker> for String {
    fn from(marker: ControllerMarker) -> Self {
        let qualified = |kind: &str, name: Option<String>| match name {
            Some(name) => format!("{}:{}", kind, name),
            None => kind.to_string(),
        };
        match marker {
            ControllerMarker::Stateless(name) => qualified("stateless", name),
            ControllerMarker::Stateful(name) => qualified("stateful", name),
            ControllerMarker::Singleton(name) => qualified("singleton", name),
            ControllerMarker::Default => "default".to_string(),
            ControllerMarker::Init => "init".to_string(),
        }
    }
}

/// Method-level annotations.
///
/// Manifest form: `action` or `action:<name>`, `default_action`, an HTTP verb
/// (`get`, `post`, ...), `before_action`, `after_action`, `after_construct`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MethodAnnotation {
    /// Named action; the name defaults to the method name.
    Action(Option<String>),
    DefaultAction,
    HttpMethod(HttpMethod),
    BeforeAction,
    AfterAction,
    AfterConstruct,
}

impl TryFrom<String> for MethodAnnotation {
    type Error = DeclError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let (kind, name) = split_qualifier(&value);
        let annotation = match (kind.to_ascii_lowercase().as_str(), name) {
            ("action", name) => MethodAnnotation::Action(name.map(str::to_string)),
            ("default_action", None) => MethodAnnotation::DefaultAction,
            ("before_action", None) => MethodAnnotation::BeforeAction,
            ("after_action", None) => MethodAnnotation::AfterAction,
            ("after_construct", None) => MethodAnnotation::AfterConstruct,
            (verb, None) => verb
                .parse()
                .map(MethodAnnotation::HttpMethod)
                .map_err(|_| DeclError::UnknownAnnotation(value.clone()))?,
            _ => return Err(DeclError::UnknownAnnotation(value.clone())),
        };
        Ok(annotation)
    }
}

impl From<MethodAnnotation> for String {
    fn from(annotation: MethodAnnotation) -> Self {
        match annotation {
            MethodAnnotation::Action(Some(name)) => format!("action:{}", name),
            MethodAnnotation::Action(None) => "action".to_string(),
            MethodAnnotation::DefaultAction => "default_action".to_string(),
            MethodAnnotation::HttpMethod(verb) => verb.as_str().to_ascii_lowercase(),
            MethodAnnotation::BeforeAction => "before_action".to_string(),
            MethodAnnotation::AfterAction => "after_action".to_string(),
            MethodAnnotation::AfterConstruct => "after_construct".to_string(),
        }
    }
}

/// A declared method parameter.
///
/// Manifest form: `context`, `param:<name>`, anything else is an unbound type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParamDecl {
    /// Bound by name from the request.
    Named(String),
    /// The request context.
    Context,
    /// Any other parameter type.
    Unbound(String),
}

impl From<String> for ParamDecl {
    fn from(value: String) -> Self {
        if value.trim().eq_ignore_ascii_case("context") {
            return ParamDecl::Context;
        }
        match value.strip_prefix("param:") {
            Some(name) if !name.is_empty() => ParamDecl::Named(name.to_string()),
            _ => ParamDecl::Unbound(value),
        }
    }
}

impl From<ParamDecl> for String {
    fn from(param: ParamDecl) -> Self {
        match param {
            ParamDecl::Named(name) => format!("param:{}", name),
            ParamDecl::Context => "context".to_string(),
            ParamDecl::Unbound(ty) => ty,
        }
    }
}

/// The output-contract family an action may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    View,
    Html,
    Json,
    Xml,
    PlainText,
    Jsp,
    Stream,
    Redirect,
}

impl OutputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputKind::View => "view",
            OutputKind::Html => "html",
            OutputKind::Json => "json",
            OutputKind::Xml => "xml",
            OutputKind::PlainText => "plain_text",
            OutputKind::Jsp => "jsp",
            OutputKind::Stream => "stream",
            OutputKind::Redirect => "redirect",
        }
    }

    fn parse(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        let kind = match normalized.as_str() {
            "view" => OutputKind::View,
            "html" | "htmlview" | "htmlpage" => OutputKind::Html,
            "json" | "jsonview" => OutputKind::Json,
            "xml" | "xmlview" => OutputKind::Xml,
            "text" | "plaintext" | "plaintextview" | "textview" => OutputKind::PlainText,
            "jsp" | "jspview" => OutputKind::Jsp,
            "stream" | "streamview" => OutputKind::Stream,
            "redirect" | "redirectview" => OutputKind::Redirect,
            _ => return None,
        };
        Some(kind)
    }
}

/// What a method returns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReturnType {
    #[default]
    Void,
    Renderable(OutputKind),
    Other(String),
}

impl ReturnType {
    pub fn output(&self) -> Option<OutputKind> {
        match self {
            ReturnType::Renderable(kind) => Some(*kind),
            _ => None,
        }
    }
}

impl fmt::Display for ReturnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnType::Void => f.write_str("void"),
            ReturnType::Renderable(kind) => f.write_str(kind.as_str()),
            ReturnType::Other(ty) => f.write_str(ty),
        }
    }
}

impl From<String> for ReturnType {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == "()" || trimmed.eq_ignore_ascii_case("void") {
            return ReturnType::Void;
        }
        match OutputKind::parse(trimmed) {
            Some(kind) => ReturnType::Renderable(kind),
            None => ReturnType::Other(value),
        }
    }
}

impl From<ReturnType> for String {
    fn from(ret: ReturnType) -> Self {
        ret.to_string()
    }
}

/// One declared method of a controller or interceptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    #[serde(default)]
    pub annotations: Vec<MethodAnnotation>,
    #[serde(default)]
    pub params: Vec<ParamDecl>,
    #[serde(default)]
    pub returns: ReturnType,
    /// Method-level interceptors; replaces the class-level list when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interceptors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param_path: Option<String>,
}

impl MethodDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Annotate as an action named after the method.
    pub fn action(self) -> Self {
        self.annotate(MethodAnnotation::Action(None))
    }

    pub fn action_named(self, name: impl Into<String>) -> Self {
        self.annotate(MethodAnnotation::Action(Some(name.into())))
    }

    pub fn default_action(self) -> Self {
        self.annotate(MethodAnnotation::DefaultAction)
    }

    pub fn http(self, verb: HttpMethod) -> Self {
        self.annotate(MethodAnnotation::HttpMethod(verb))
    }

    pub fn before_action(self) -> Self {
        self.annotate(MethodAnnotation::BeforeAction)
    }

    pub fn after_action(self) -> Self {
        self.annotate(MethodAnnotation::AfterAction)
    }

    pub fn after_construct(self) -> Self {
        self.annotate(MethodAnnotation::AfterConstruct)
    }

    pub fn annotate(mut self, annotation: MethodAnnotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn returns(mut self, returns: ReturnType) -> Self {
        self.returns = returns;
        self
    }

    /// Shorthand for a renderable result.
    pub fn renders(self, kind: OutputKind) -> Self {
        self.returns(ReturnType::Renderable(kind))
    }

    pub fn param(mut self, param: ParamDecl) -> Self {
        self.params.push(param);
        self
    }

    pub fn param_path(mut self, param_path: impl Into<String>) -> Self {
        self.param_path = Some(param_path.into());
        self
    }

    pub fn intercepted_by<I, S>(mut self, interceptors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interceptors = Some(interceptors.into_iter().map(Into::into).collect());
        self
    }

    pub fn has(&self, annotation: &MethodAnnotation) -> bool {
        self.annotations.contains(annotation)
    }
}

/// A controller type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerDecl {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub markers: Vec<ControllerMarker>,
    /// Class-level interceptors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interceptors: Option<Vec<String>>,
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
}

impl ControllerDecl {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    pub fn stateless(type_name: impl Into<String>) -> Self {
        Self::new(type_name).marker(ControllerMarker::Stateless(None))
    }

    pub fn stateful(type_name: impl Into<String>) -> Self {
        Self::new(type_name).marker(ControllerMarker::Stateful(None))
    }

    pub fn singleton(type_name: impl Into<String>) -> Self {
        Self::new(type_name).marker(ControllerMarker::Singleton(None))
    }

    /// Give the lifecycle marker an explicit controller name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        for marker in &mut self.markers {
            match marker {
                ControllerMarker::Stateless(slot)
                | ControllerMarker::Stateful(slot)
                | ControllerMarker::Singleton(slot) => *slot = Some(name.clone()),
                _ => {}
            }
        }
        self
    }

    pub fn marker(mut self, marker: ControllerMarker) -> Self {
        self.markers.push(marker);
        self
    }

    pub fn default_controller(self) -> Self {
        self.marker(ControllerMarker::Default)
    }

    pub fn init_on_startup(self) -> Self {
        self.marker(ControllerMarker::Init)
    }

    pub fn intercepted_by<I, S>(mut self, interceptors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interceptors = Some(interceptors.into_iter().map(Into::into).collect());
        self
    }

    pub fn method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }
}

/// An interceptor type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterceptorDecl {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
}

impl InterceptorDecl {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            methods: Vec::new(),
        }
    }

    pub fn method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }
}

fn split_qualifier(value: &str) -> (&str, Option<&str>) {
    match value.trim().split_once(':') {
        Some((kind, name)) if !name.is_empty() => (kind, Some(name)),
        Some((kind, _)) => (kind, None),
        None => (value.trim(), None),
    }
}
