//! Service descriptors for introspection and diagnostics.

use crate::key::Key;
use crate::lifetime::Lifetime;

/// Snapshot of one registration
///
/// Returned by [`ServiceRegistry::descriptors`](crate::ServiceRegistry::descriptors)
/// for debugging and startup health checks.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{Lifetime, ServiceRegistry};
///
/// struct Database;
/// struct Request;
///
/// let registry = ServiceRegistry::new();
/// registry.register_instance(Database);
/// registry.register_factory::<Request, _>(Lifetime::Transient, || Request);
///
/// let descriptors = registry.descriptors();
/// assert_eq!(descriptors.len(), 2);
///
/// let db = descriptors.iter().find(|d| d.type_name().ends_with("Database")).unwrap();
/// assert_eq!(db.lifetime, Lifetime::Singleton);
/// assert!(db.materialized);
///
/// let request = descriptors.iter().find(|d| d.type_name().ends_with("Request")).unwrap();
/// assert!(!request.materialized);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    /// The registered contract
    pub key: Key,
    /// Service lifetime
    pub lifetime: Lifetime,
    /// Whether a singleton instance is currently cached
    pub materialized: bool,
}

impl ServiceDescriptor {
    /// Get the contract's type name.
    pub fn type_name(&self) -> &'static str {
        self.key.display_name()
    }
}
