//! Registration entries and type-erased instance storage.

use std::any::Any;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::error::DiResult;
use crate::internal::call_guarded;
use crate::key::Key;
use crate::lifetime::Lifetime;

/// Type-erased instance as stored by the registry.
///
/// The erased value is always an `Arc<T>` for the registered contract `T`, so
/// unsized contracts such as `dyn Logger` can be stored and every clone handed
/// out points at the same allocation.
pub type AnyArc = Arc<dyn Any + Send + Sync>;

/// Deferred constructor for a registration.
pub(crate) type Factory = Arc<dyn Fn() -> DiResult<AnyArc> + Send + Sync>;

/// Erases a shared instance of contract `T`.
#[inline]
pub(crate) fn erase<T>(instance: Arc<T>) -> AnyArc
where
    T: ?Sized + Send + Sync + 'static,
{
    Arc::new(instance)
}

/// Recovers the `Arc<T>` stored by [`erase`].
///
/// Returns `None` when `instance` was not erased from an `Arc<T>`.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{downcast_instance, Key, ServiceRegistry};
///
/// let registry = ServiceRegistry::new();
/// registry.register_instance(7u32);
///
/// let erased = registry.resolve_key(&Key::of::<u32>()).unwrap();
/// assert_eq!(*downcast_instance::<u32>(&erased).unwrap(), 7);
/// assert!(downcast_instance::<u64>(&erased).is_none());
/// ```
#[inline]
pub fn downcast_instance<T>(instance: &AnyArc) -> Option<Arc<T>>
where
    T: ?Sized + Send + Sync + 'static,
{
    instance.downcast_ref::<Arc<T>>().cloned()
}

/// Registration with lifetime, factory and the singleton cache.
///
/// `cached` is written at most once, and only for singletons: eagerly for
/// instance registrations, otherwise by the first successful resolution.
pub(crate) struct RegistrationEntry {
    pub(crate) key: Key,
    pub(crate) lifetime: Lifetime,
    factory: Factory,
    cached: OnceCell<AnyArc>,
}

impl RegistrationEntry {
    /// Creates an entry whose instances come from `factory`.
    pub(crate) fn new(key: Key, lifetime: Lifetime, factory: Factory) -> Self {
        Self {
            key,
            lifetime,
            factory,
            cached: OnceCell::new(),
        }
    }

    /// Creates a singleton entry that is already materialized.
    pub(crate) fn with_instance(key: Key, instance: AnyArc) -> Self {
        let for_factory = instance.clone();
        Self {
            key,
            lifetime: Lifetime::Singleton,
            factory: Arc::new(move || Ok(for_factory.clone())),
            cached: OnceCell::with_value(instance),
        }
    }

    /// Whether a singleton instance is currently held.
    pub(crate) fn is_materialized(&self) -> bool {
        self.cached.get().is_some()
    }

    /// Produces an instance according to the entry's lifetime.
    ///
    /// Singletons are materialized without holding any lock, so two callers
    /// may run the factory concurrently. The first one to store its result
    /// wins; the other result is dropped and the winner is returned to both.
    pub(crate) fn resolve(&self, catch_panics: bool) -> DiResult<AnyArc> {
        match self.lifetime {
            Lifetime::Transient => self.invoke(catch_panics),
            Lifetime::Singleton => {
                if let Some(instance) = self.cached.get() {
                    return Ok(instance.clone());
                }

                let fresh = self.invoke(catch_panics)?;
                match self.cached.try_insert(fresh) {
                    Ok(stored) => Ok(stored.clone()),
                    Err((winner, _discarded)) => {
                        tracing::trace!(
                            service = self.key.display_name(),
                            "singleton already materialized by a concurrent resolve; discarding duplicate"
                        );
                        Ok(winner.clone())
                    }
                }
            }
        }
    }

    fn invoke(&self, catch_panics: bool) -> DiResult<AnyArc> {
        call_guarded(self.key.display_name(), catch_panics, || (self.factory)())
    }
}
