//! Bootstrap context and the resource protocol.
//!
//! A [`Bootstrap`] owns what resources need from the surrounding application:
//! the application path, the shared [`Container`], the [`Registry`] and,
//! when the application runs a DI container, a [`ParameterSink`].

pub mod resource;

pub use resource::Resource;

use crate::container::{Container, ParameterSink, Registry};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Bootstrap context handed to every resource
#[derive(Clone)]
pub struct Bootstrap {
    application_path: PathBuf,
    container: Arc<Container>,
    registry: Arc<Registry>,
    parameters: Option<Arc<dyn ParameterSink>>,
}

impl Bootstrap {
    /// Create a bootstrap for the application rooted at `application_path`
    pub fn new(application_path: impl Into<PathBuf>) -> Self {
        Self {
            application_path: application_path.into(),
            container: Arc::new(Container::new()),
            registry: Arc::new(Registry::new()),
            parameters: None,
        }
    }

    /// Route exported settings to a DI container instead of the registry
    pub fn with_parameters(mut self, parameters: Arc<dyn ParameterSink>) -> Self {
        self.parameters = Some(parameters);
        self
    }

    pub fn with_container(mut self, container: Arc<Container>) -> Self {
        self.container = container;
        self
    }

    pub fn with_registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn application_path(&self) -> &Path {
        &self.application_path
    }

    pub fn container(&self) -> &Arc<Container> {
        &self.container
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn parameters(&self) -> Option<&Arc<dyn ParameterSink>> {
        self.parameters.as_ref()
    }

    /// Run a single resource against this bootstrap
    pub fn bootstrap<R: Resource>(&self, resource: &R) -> Result<R::Output, R::Error> {
        tracing::debug!("Bootstrapping resource '{}'", resource.name());
        match resource.init(self) {
            Ok(output) => {
                tracing::info!("✅ Resource '{}' initialized", resource.name());
                Ok(output)
            }
            Err(e) => {
                tracing::error!("Resource '{}' failed to initialize: {}", resource.name(), e);
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for Bootstrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bootstrap")
            .field("application_path", &self.application_path)
            .field("container", &self.container)
            .field("has_parameters", &self.parameters.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::ParameterBag;
    use crate::errors::CoreError;

    struct GreetingResource {
        fail: bool,
    }

    impl Resource for GreetingResource {
        type Output = Arc<String>;
        type Error = CoreError;

        fn name(&self) -> &'static str {
            "greeting"
        }

        fn init(&self, bootstrap: &Bootstrap) -> Result<Self::Output, Self::Error> {
            if self.fail {
                return Err(CoreError::service_not_found("greeting"));
            }
            let greeting = Arc::new("hello".to_string());
            bootstrap.container().set("greeting", greeting.clone());
            Ok(greeting)
        }
    }

    #[test]
    fn test_bootstrap_defaults() {
        let bootstrap = Bootstrap::new("/srv/app");
        assert_eq!(bootstrap.application_path(), Path::new("/srv/app"));
        assert!(bootstrap.parameters().is_none());
        assert!(bootstrap.container().is_empty());
        assert!(bootstrap.registry().is_empty());
    }

    #[test]
    fn test_bootstrap_runs_resource() {
        let bootstrap = Bootstrap::new("/srv/app");
        let output = bootstrap.bootstrap(&GreetingResource { fail: false }).unwrap();

        let published = bootstrap.container().get::<String>("greeting").unwrap();
        assert!(Arc::ptr_eq(&output, &published));
    }

    #[test]
    fn test_bootstrap_propagates_error() {
        let bootstrap = Bootstrap::new("/srv/app");
        let err = bootstrap.bootstrap(&GreetingResource { fail: true }).unwrap_err();
        assert!(matches!(err, CoreError::ServiceNotFound { .. }));
        assert!(!bootstrap.container().contains("greeting"));
    }

    #[test]
    fn test_shared_collaborators() {
        let container = Arc::new(Container::new());
        let registry = Arc::new(Registry::new());
        let parameters = Arc::new(ParameterBag::new());
        let bootstrap = Bootstrap::new("/srv/app")
            .with_container(container.clone())
            .with_registry(registry.clone())
            .with_parameters(parameters);

        assert!(Arc::ptr_eq(bootstrap.container(), &container));
        assert!(Arc::ptr_eq(bootstrap.registry(), &registry));
        assert!(bootstrap.parameters().is_some());
    }
}
