//! Service lifetime definitions.

/// Service lifetimes controlling instance caching behavior
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{Lifetime, ServiceRegistry};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct RequestModel { id: u32 }
///
/// let registry = ServiceRegistry::new();
///
/// // Singleton: one instance for the whole registry
/// registry.register_factory::<Database, _>(Lifetime::Singleton, || Database {
///     url: "postgres://localhost".to_string(),
/// });
///
/// // Transient: new instance every time
/// registry.register_factory::<RequestModel, _>(Lifetime::Transient, || RequestModel { id: 7 });
///
/// let db1 = registry.resolve::<Database>().unwrap();
/// let db2 = registry.resolve::<Database>().unwrap();
/// assert!(Arc::ptr_eq(&db1, &db2));
///
/// let m1 = registry.resolve::<RequestModel>().unwrap();
/// let m2 = registry.resolve::<RequestModel>().unwrap();
/// assert!(!Arc::ptr_eq(&m1, &m2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
pub enum Lifetime {
    /// Single instance per registration, cached until the entry is cleared
    ///
    /// The instance is either supplied at registration time or materialized
    /// by the first successful resolution. A failed factory call caches
    /// nothing, so the next resolve tries again.
    Singleton,
    /// New instance per resolution, never cached
    Transient,
}

impl Lifetime {
    /// Returns true for [`Lifetime::Singleton`].
    pub fn is_singleton(self) -> bool {
        matches!(self, Lifetime::Singleton)
    }
}
