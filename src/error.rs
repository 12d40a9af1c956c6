//! Error types for the service registry and field injector.

use std::error::Error as StdError;
use std::sync::Arc;

use thiserror::Error;

use crate::key::Key;

/// Shared, cloneable cause of a failed factory invocation.
pub type BoxError = Arc<dyn StdError + Send + Sync>;

/// Registry errors
///
/// Represents the conditions that can make a resolution fail. Registration
/// and clearing never fail; only `resolve` and friends return these.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{DiError, ServiceRegistry};
///
/// let registry = ServiceRegistry::new();
/// match registry.resolve::<String>() {
///     Err(DiError::NotFound(type_name)) => {
///         assert_eq!(type_name, "alloc::string::String");
///     }
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use ferrous_inject::DiError;
///
/// let not_found = DiError::NotFound("MyService");
/// let panic = DiError::FactoryPanic { service: "MyService", message: "boom".into() };
///
/// assert_eq!(not_found.to_string(), "Service not registered: MyService");
/// assert_eq!(panic.to_string(), "Factory for MyService panicked: boom");
/// ```
#[derive(Debug, Clone, Error)]
pub enum DiError {
    /// No registration exists for the requested type
    #[error("Service not registered: {0}")]
    NotFound(&'static str),
    /// The registered factory returned an error
    #[error("Failed to construct {service}: {source}")]
    Construction {
        service: &'static str,
        #[source]
        source: BoxError,
    },
    /// The registered factory panicked and the panic was captured
    #[error("Factory for {service} panicked: {message}")]
    FactoryPanic {
        service: &'static str,
        message: String,
    },
    /// Stored instance did not have the requested type
    #[error("Type mismatch for: {0}")]
    TypeMismatch(&'static str),
}

impl DiError {
    /// Wraps a factory error for the given service.
    pub fn construction<E>(service: &'static str, error: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        DiError::Construction {
            service,
            source: Arc::from(error.into()),
        }
    }

    /// Returns true when the error means "nothing registered for this type".
    pub fn is_not_found(&self) -> bool {
        matches!(self, DiError::NotFound(_))
    }
}

/// Result type for registry operations
///
/// A convenience alias for `Result<T, DiError>` used throughout ferrous-inject.
pub type DiResult<T> = Result<T, DiError>;

/// A single field that could not be injected.
///
/// Field failures never propagate out of `inject_into`; they are handed to the
/// registry's observers and collected in the returned
/// [`InjectionReport`](crate::InjectionReport).
#[derive(Debug, Clone, Error)]
#[error("Cannot inject {target_type}::{field_name} ({}): {cause}", .field_type.display_name())]
pub struct FieldInjectionError {
    /// Concrete type of the injection target
    pub target_type: &'static str,
    /// Name of the marked field
    pub field_name: &'static str,
    /// Contract the field asked for
    pub field_type: Key,
    /// Why the field could not be populated
    #[source]
    pub cause: DiError,
}
