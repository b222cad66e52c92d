use thiserror::Error;

/// Core error type shared by the container and bootstrap layers
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Service not found: {service_type}")]
    ServiceNotFound { service_type: String },

    #[error("Attribute '{name}' is not a {expected}")]
    TypeMismatch { name: String, expected: &'static str },
}

impl CoreError {
    /// Create a new service not found error
    pub fn service_not_found(service_type: impl Into<String>) -> Self {
        Self::ServiceNotFound {
            service_type: service_type.into(),
        }
    }
}
