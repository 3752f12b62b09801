//! Error types for the coordination core.

use crate::renderer::RenderTarget;

/// Result type alias for coordination-core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised by the coordination layer.
///
/// All of these indicate configuration or construction-order bugs and are
/// fatal to the operation that triggered them. They are never caught and
/// silently defaulted inside the core; callers decide whether to abort or
/// report. Busy-state during an in-flight action is *not* an error — it is
/// signalled through the deferral mechanism instead.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// No service is bound under the requested name.
    #[error("service '{name}' is not registered")]
    ServiceNotFound { name: String },

    /// A service was registered twice under the same name. Indicates a
    /// construction-order bug in the host widget.
    #[error("service '{name}' is already registered")]
    DuplicateService { name: String },

    /// A service is bound under the name but is not of the requested type.
    #[error("service '{name}' is registered with a different type")]
    ServiceTypeMismatch { name: String },

    /// No renderer was ever registered for the target. Aborts the render
    /// pass that needed it.
    #[error("no renderer registered for target '{target}'")]
    RendererNotRegistered { target: RenderTarget },
}

impl CoreError {
    /// Create a [`CoreError::ServiceNotFound`].
    pub fn service_not_found(name: impl Into<String>) -> Self {
        Self::ServiceNotFound { name: name.into() }
    }

    /// Create a [`CoreError::DuplicateService`].
    pub fn duplicate_service(name: impl Into<String>) -> Self {
        Self::DuplicateService { name: name.into() }
    }

    /// Create a [`CoreError::ServiceTypeMismatch`].
    pub fn service_type_mismatch(name: impl Into<String>) -> Self {
        Self::ServiceTypeMismatch { name: name.into() }
    }
}
