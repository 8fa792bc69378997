//! Interceptor descriptor builder.

use serde::Serialize;

use crate::metadata::controller::set_hook;
use crate::metadata::decl::{InterceptorDecl, MethodAnnotation};
use crate::metadata::signature::{ActionSignature, HookKind};
use crate::metadata::ConfigurationError;

/// Validated before/after hooks of one interceptor type. At least one is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterceptorDescriptor {
    type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    before: Option<ActionSignature>,
    #[serde(skip_serializing_if = "Option::is_none")]
    after: Option<ActionSignature>,
}

impl InterceptorDescriptor {
    pub fn build(decl: &InterceptorDecl) -> Result<Self, ConfigurationError> {
        let owner = decl.type_name.as_str();
        let mut before = None;
        let mut after = None;

        for method in &decl.methods {
            if method.has(&MethodAnnotation::BeforeAction) {
                set_hook(owner, HookKind::BeforeAction, &mut before, method)?;
            }
            if method.has(&MethodAnnotation::AfterAction) {
                set_hook(owner, HookKind::AfterAction, &mut after, method)?;
            }
        }

        if before.is_none() && after.is_none() {
            return Err(ConfigurationError::NoInterceptorHooks {
                interceptor: decl.type_name.clone(),
            });
        }

        Ok(Self {
            type_name: decl.type_name.clone(),
            before,
            after,
        })
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn before(&self) -> Option<&ActionSignature> {
        self.before.as_ref()
    }

    pub fn after(&self) -> Option<&ActionSignature> {
        self.after.as_ref()
    }
}
