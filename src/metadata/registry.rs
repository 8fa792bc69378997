//! The process-wide metadata registry.
//!
//! # Responsibilities
//! - Build every interceptor and controller descriptor
//! - Enforce registry-wide rules (unique names, one default controller, known interceptors)
//! - Answer lookups by controller name, verb, and default controller
//! - Resolve interceptor chains to descriptors
//!
//! # Design Decisions
//! - Constructed once, then shared read-only (no interior mutability)
//! - The first violation aborts construction; there is no partial registry

use std::collections::HashMap;

use tracing::debug;

use crate::metadata::controller::{ControllerDescriptor, Lifecycle};
use crate::metadata::decl::{ControllerDecl, HttpMethod, InterceptorDecl};
use crate::metadata::interceptor::InterceptorDescriptor;
use crate::metadata::signature::ActionSignature;
use crate::metadata::ConfigurationError;

#[derive(Debug, Clone, Default)]
pub struct MetadataRegistry {
    /// Declaration order.
    controllers: Vec<ControllerDescriptor>,
    by_name: HashMap<String, usize>,
    interceptors: Vec<InterceptorDescriptor>,
    interceptors_by_type: HashMap<String, usize>,
    default_controller: Option<usize>,
}

impl MetadataRegistry {
    pub fn build(
        controllers: &[ControllerDecl],
        interceptors: &[InterceptorDecl],
    ) -> Result<Self, ConfigurationError> {
        debug!(
            controllers = controllers.len(),
            interceptors = interceptors.len(),
            "Building metadata registry"
        );

        let mut registry = MetadataRegistry::default();

        for decl in interceptors {
            let descriptor = InterceptorDescriptor::build(decl)?;
            if registry.interceptors_by_type.contains_key(descriptor.type_name()) {
                return Err(ConfigurationError::DuplicateInterceptorType {
                    interceptor: decl.type_name.clone(),
                });
            }
            registry
                .interceptors_by_type
                .insert(descriptor.type_name().to_string(), registry.interceptors.len());
            registry.interceptors.push(descriptor);
        }

        for decl in controllers {
            let descriptor = ControllerDescriptor::build(decl)?;
            registry.add_controller(descriptor)?;
        }

        Ok(registry)
    }

    fn add_controller(&mut self, descriptor: ControllerDescriptor) -> Result<(), ConfigurationError> {
        if let Some(&existing) = self.by_name.get(descriptor.name()) {
            return Err(ConfigurationError::DuplicateControllerName {
                name: descriptor.name().to_string(),
                first: self.controllers[existing].type_name().to_string(),
                second: descriptor.type_name().to_string(),
            });
        }

        if let Some(interceptor) = descriptor
            .referenced_interceptors()
            .find(|i| !self.interceptors_by_type.contains_key(*i))
        {
            return Err(ConfigurationError::UnknownInterceptor {
                owner: descriptor.type_name().to_string(),
                interceptor: interceptor.to_string(),
            });
        }

        let index = self.controllers.len();
        if descriptor.is_default() {
            if let Some(existing) = self.default_controller {
                return Err(ConfigurationError::DuplicateDefaultController {
                    first: self.controllers[existing].type_name().to_string(),
                    second: descriptor.type_name().to_string(),
                });
            }
            self.default_controller = Some(index);
        }

        self.by_name.insert(descriptor.name().to_string(), index);
        self.controllers.push(descriptor);
        Ok(())
    }

    /// Look up a controller by its route name.
    pub fn controller(&self, name: &str) -> Option<&ControllerDescriptor> {
        self.by_name.get(name).map(|i| &self.controllers[*i])
    }

    pub fn default_controller(&self) -> Option<&ControllerDescriptor> {
        self.default_controller.map(|i| &self.controllers[i])
    }

    /// Controllers in declaration order.
    pub fn controllers(&self) -> &[ControllerDescriptor] {
        &self.controllers
    }

    pub fn interceptor(&self, type_name: &str) -> Option<&InterceptorDescriptor> {
        self.interceptors_by_type
            .get(type_name)
            .map(|i| &self.interceptors[*i])
    }

    pub fn interceptors(&self) -> &[InterceptorDescriptor] {
        &self.interceptors
    }

    /// Named action of a controller.
    pub fn action(&self, controller: &str, action: &str) -> Option<&ActionSignature> {
        self.controller(controller)?.action(action)
    }

    /// Verb-bound action of a controller.
    pub fn http_action(&self, controller: &str, verb: HttpMethod) -> Option<&ActionSignature> {
        self.controller(controller)?.http_action(verb)
    }

    /// Interceptors guarding `action`, in invocation order.
    pub fn interceptor_chain(
        &self,
        controller: &ControllerDescriptor,
        action: &ActionSignature,
    ) -> Vec<&InterceptorDescriptor> {
        // Every reference was checked during build.
        controller
            .interceptors_for(action)
            .iter()
            .filter_map(|type_name| self.interceptor(type_name))
            .collect()
    }

    /// Singletons to create at startup.
    pub fn init_controllers(&self) -> impl Iterator<Item = &ControllerDescriptor> {
        self.controllers
            .iter()
            .filter(|c| c.lifecycle() == Lifecycle::InitOnStartup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::decl::{MethodDecl, OutputKind};

    fn action(name: &str) -> MethodDecl {
        MethodDecl::new(name).action().renders(OutputKind::Json)
    }

    fn interceptor(name: &str) -> InterceptorDecl {
        InterceptorDecl::new(name).method(MethodDecl::new("before").before_action())
    }

    #[test]
    fn test_build_and_lookup() {
        let registry = MetadataRegistry::build(
            &[
                ControllerDecl::stateless("Home").default_controller().method(action("index")),
                ControllerDecl::stateful("Cart")
                    .named("cart")
                    .method(MethodDecl::new("add").http(HttpMethod::Post).renders(OutputKind::Json)),
            ],
            &[interceptor("Audit")],
        )
        .unwrap();

        assert_eq!(registry.controllers().len(), 2);
        assert_eq!(registry.default_controller().unwrap().name(), "Home");
        assert!(registry.action("Home", "index").is_some());
        assert!(registry.action("Home", "missing").is_none());
        assert_eq!(
            registry.http_action("cart", HttpMethod::Post).unwrap().method_name(),
            "add"
        );
        assert!(registry.controller("Cart").is_none());
        assert!(registry.interceptor("Audit").is_some());
    }

    #[test]
    fn test_interceptor_chain_override() {
        let registry = MetadataRegistry::build(
            &[ControllerDecl::stateless("C")
                .intercepted_by(["C1"])
                .method(action("guarded").intercepted_by(["A", "B"]))
                .method(action("plain"))],
            &[interceptor("A"), interceptor("B"), interceptor("C1")],
        )
        .unwrap();

        let controller = registry.controller("C").unwrap();
        let chain = |name: &str| -> Vec<String> {
            let action = controller.action(name).unwrap();
            registry
                .interceptor_chain(controller, action)
                .iter()
                .map(|i| i.type_name().to_string())
                .collect()
        };
        assert_eq!(chain("guarded"), vec!["A", "B"]);
        assert_eq!(chain("plain"), vec!["C1"]);
    }

    #[test]
    fn test_unknown_interceptor() {
        let err = MetadataRegistry::build(
            &[ControllerDecl::stateless("C").method(action("a").intercepted_by(["Ghost"]))],
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownInterceptor { ref interceptor, .. } if interceptor == "Ghost"));
    }

    #[test]
    fn test_registry_wide_rules() {
        let err = MetadataRegistry::build(
            &[
                ControllerDecl::stateless("A").named("x").method(action("a")),
                ControllerDecl::stateless("B").named("x").method(action("a")),
            ],
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicateControllerName { .. }));

        let err = MetadataRegistry::build(
            &[
                ControllerDecl::stateless("A").default_controller().method(action("a")),
                ControllerDecl::stateless("B").default_controller().method(action("a")),
            ],
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicateDefaultController { .. }));

        let err = MetadataRegistry::build(&[], &[interceptor("I"), interceptor("I")]).unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicateInterceptorType { .. }));
    }

    #[test]
    fn test_init_controllers() {
        let registry = MetadataRegistry::build(
            &[
                ControllerDecl::singleton("Warm")
                    .init_on_startup()
                    .method(MethodDecl::new("load").after_construct()),
                ControllerDecl::singleton("Lazy").method(action("a")),
            ],
            &[],
        )
        .unwrap();
        let names: Vec<_> = registry.init_controllers().map(|c| c.name()).collect();
        assert_eq!(names, vec!["Warm"]);
    }
}
