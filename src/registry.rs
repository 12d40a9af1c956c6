//! The service registry.
//!
//! A [`ServiceRegistry`] maps contract keys to registrations and hands out
//! instances according to each registration's [`Lifetime`]. It is usable as an
//! explicit context object; the process-wide instance lives in
//! [`global`](crate::global).

use std::any::type_name;
use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;

use crate::config::RegistryConfig;
use crate::contract::Implements;
use crate::descriptors::ServiceDescriptor;
use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::observer::{InjectionObserver, Observers};
use crate::registration::{downcast_instance, erase, AnyArc, Factory, RegistrationEntry};

#[cfg(feature = "ahash")]
pub(crate) type RandomState = ahash::RandomState;
#[cfg(not(feature = "ahash"))]
pub(crate) type RandomState = std::collections::hash_map::RandomState;

type EntryMap = HashMap<Key, Arc<RegistrationEntry>, RandomState>;

/// In-process service registry with singleton and transient lifetimes.
///
/// All operations take `&self` and are safe to call from many threads. The
/// entry map is guarded by a read/write lock that is never held while a
/// factory runs, so factories may resolve other services.
///
/// A later registration for the same contract replaces the earlier one.
///
/// # Examples
///
/// ```
/// use ferrous_inject::{Lifetime, ServiceRegistry};
/// use std::sync::Arc;
///
/// struct Config { port: u16 }
/// struct Server { config: Arc<Config> }
///
/// let registry = Arc::new(ServiceRegistry::new());
/// registry.register_instance(Config { port: 8080 });
///
/// let inner = registry.clone();
/// registry.register_fallible_factory::<Server, _, _>(Lifetime::Singleton, move || {
///     Ok::<_, ferrous_inject::DiError>(Server { config: inner.resolve::<Config>()? })
/// });
///
/// let server = registry.resolve::<Server>().unwrap();
/// assert_eq!(server.config.port, 8080);
/// ```
pub struct ServiceRegistry {
    entries: RwLock<EntryMap>,
    observers: RwLock<Observers>,
    config: RegistryConfig,
}

impl ServiceRegistry {
    /// Creates an empty registry with the default configuration.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Creates an empty registry with `config`.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            entries: RwLock::new(EntryMap::default()),
            observers: RwLock::new(Observers::default()),
            config,
        }
    }

    /// The configuration this registry was created with.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Adds an observer that receives resolution and injection events.
    pub fn add_observer(&self, observer: Arc<dyn InjectionObserver>) -> &Self {
        let mut observers = self.observers.write();
        *observers = observers.with(observer);
        self
    }

    pub(crate) fn observers(&self) -> Observers {
        self.observers.read().clone()
    }

    // ----- Registration -----

    /// Registers an existing instance as a singleton.
    ///
    /// Every resolution of `T` returns this very instance.
    pub fn register_instance<T>(&self, instance: T) -> &Self
    where
        T: Send + Sync + 'static,
    {
        self.register_shared::<T>(Arc::new(instance))
    }

    /// Registers an already shared instance as a singleton.
    ///
    /// Works for unsized contracts too, e.g. `Arc<dyn Logger>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrous_inject::ServiceRegistry;
    /// use std::sync::Arc;
    ///
    /// trait Logger: Send + Sync {
    ///     fn name(&self) -> &str;
    /// }
    ///
    /// struct Console;
    /// impl Logger for Console {
    ///     fn name(&self) -> &str { "console" }
    /// }
    ///
    /// let logger: Arc<dyn Logger> = Arc::new(Console);
    /// let registry = ServiceRegistry::new();
    /// registry.register_shared::<dyn Logger>(logger.clone());
    ///
    /// let resolved = registry.resolve::<dyn Logger>().unwrap();
    /// assert!(Arc::ptr_eq(&logger, &resolved));
    /// assert_eq!(resolved.name(), "console");
    /// ```
    pub fn register_shared<T>(&self, instance: Arc<T>) -> &Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let key = Key::of::<T>();
        self.insert(RegistrationEntry::with_instance(key, erase(instance)))
    }

    /// Registers a factory producing `T`.
    ///
    /// The factory is not called until `T` is resolved.
    pub fn register_factory<T, F>(&self, lifetime: Lifetime, factory: F) -> &Self
    where
        T: Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let ctor: Factory = Arc::new(move || Ok(erase(Arc::new(factory()))));
        self.insert(RegistrationEntry::new(Key::of::<T>(), lifetime, ctor))
    }

    /// Registers a factory producing a shared `T`, typically a trait object.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrous_inject::{Lifetime, ServiceRegistry};
    /// use std::sync::Arc;
    ///
    /// trait Clock: Send + Sync {
    ///     fn now(&self) -> u64;
    /// }
    ///
    /// struct Fixed(u64);
    /// impl Clock for Fixed {
    ///     fn now(&self) -> u64 { self.0 }
    /// }
    ///
    /// let registry = ServiceRegistry::new();
    /// registry.register_shared_factory::<dyn Clock, _>(Lifetime::Transient, || {
    ///     Arc::new(Fixed(42)) as Arc<dyn Clock>
    /// });
    ///
    /// assert_eq!(registry.resolve::<dyn Clock>().unwrap().now(), 42);
    /// ```
    pub fn register_shared_factory<T, F>(&self, lifetime: Lifetime, factory: F) -> &Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<T> + Send + Sync + 'static,
    {
        let ctor: Factory = Arc::new(move || Ok(erase(factory())));
        self.insert(RegistrationEntry::new(Key::of::<T>(), lifetime, ctor))
    }

    /// Registers a factory that may fail.
    ///
    /// An `Err` surfaces from `resolve` as [`DiError::Construction`] (a
    /// `DiError` returned by the factory is passed through unchanged). Failed
    /// calls are never cached, so a singleton is retried on the next resolve.
    pub fn register_fallible_factory<T, F, E>(&self, lifetime: Lifetime, factory: F) -> &Self
    where
        T: Send + Sync + 'static,
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        let service = type_name::<T>();
        let ctor: Factory = Arc::new(move || match factory() {
            Ok(instance) => Ok(erase(Arc::new(instance))),
            Err(error) => Err(into_construction_error(service, error.into())),
        });
        self.insert(RegistrationEntry::new(Key::of::<T>(), lifetime, ctor))
    }

    /// Registers `I` under the contract `C`, default-constructing `I` on demand.
    ///
    /// Construction happens at resolution time; a panicking `Default` impl is
    /// reported by `resolve`, not here.
    pub fn register_mapping<C, I>(&self, lifetime: Lifetime) -> &Self
    where
        C: ?Sized + Send + Sync + 'static,
        I: Implements<C> + Default,
    {
        let ctor: Factory = Arc::new(|| {
            let implementation = Arc::new(I::default());
            Ok(erase(<I as Implements<C>>::upcast(implementation)))
        });
        self.insert(RegistrationEntry::new(Key::of::<C>(), lifetime, ctor))
    }

    fn insert(&self, entry: RegistrationEntry) -> &Self {
        let key = entry.key;
        let lifetime = entry.lifetime;
        let replaced = self.entries.write().insert(key, Arc::new(entry)).is_some();

        if replaced {
            tracing::debug!(service = key.display_name(), ?lifetime, "replaced registration");
        } else {
            tracing::debug!(service = key.display_name(), ?lifetime, "registered");
        }
        self
    }

    // ----- Resolution -----

    /// Resolves the contract identified by `key` as a type-erased instance.
    ///
    /// Use [`downcast_instance`] to recover the typed `Arc`.
    pub fn resolve_key(&self, key: &Key) -> DiResult<AnyArc> {
        // Clone the entry out so the map lock is released before any factory runs.
        let entry = self.entries.read().get(key).cloned();
        let observers = self.observers();

        let Some(entry) = entry else {
            let error = DiError::NotFound(key.display_name());
            if observers.has_observers() {
                observers.resolution_failed(key, &error);
            }
            return Err(error);
        };

        let started = Instant::now();
        let result = entry.resolve(self.config.catch_panics);

        match &result {
            Ok(_) => {
                if self.config.trace_resolutions {
                    tracing::trace!(
                        service = key.display_name(),
                        lifetime = ?entry.lifetime,
                        elapsed = ?started.elapsed(),
                        "resolved"
                    );
                }
                if observers.has_observers() {
                    observers.resolved(key, entry.lifetime, started.elapsed());
                }
            }
            Err(error) => {
                tracing::debug!(service = key.display_name(), %error, "resolution failed");
                if observers.has_observers() {
                    observers.resolution_failed(key, error);
                }
            }
        }
        result
    }

    /// Resolves `T`.
    ///
    /// Fails with [`DiError::NotFound`] when nothing is registered for `T`;
    /// the registry is left unchanged.
    pub fn resolve<T>(&self) -> DiResult<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let instance = self.resolve_key(&Key::of::<T>())?;
        downcast_instance::<T>(&instance).ok_or(DiError::TypeMismatch(type_name::<T>()))
    }

    /// Resolves `T`, returning `None` on any failure.
    pub fn try_resolve<T>(&self) -> Option<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.resolve::<T>().ok()
    }

    // ----- Introspection -----

    /// Whether a registration exists for `T`.
    pub fn contains<T>(&self) -> bool
    where
        T: ?Sized + 'static,
    {
        self.contains_key(&Key::of::<T>())
    }

    /// Whether a registration exists for `key`.
    pub fn contains_key(&self, key: &Key) -> bool {
        self.entries.read().contains_key(key)
    }

    /// Number of registrations.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the registry has no registrations.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Describes every registration, sorted by type name.
    pub fn descriptors(&self) -> Vec<ServiceDescriptor> {
        let mut descriptors: Vec<_> = self
            .entries
            .read()
            .values()
            .map(|entry| ServiceDescriptor {
                key: entry.key,
                lifetime: entry.lifetime,
                materialized: entry.is_materialized(),
            })
            .collect();
        descriptors.sort_by(|a, b| a.type_name().cmp(b.type_name()));
        descriptors
    }

    // ----- Clearing -----

    /// Removes the registration for `T`, whatever its lifetime.
    ///
    /// Returns whether an entry was removed; clearing an absent type is a no-op.
    pub fn clear_singleton<T>(&self) -> bool
    where
        T: ?Sized + 'static,
    {
        self.clear_key(&Key::of::<T>())
    }

    /// Removes the registration for `key`.
    pub fn clear_key(&self, key: &Key) -> bool {
        let removed = self.entries.write().remove(key).is_some();
        if removed {
            tracing::debug!(service = key.display_name(), "cleared registration");
        }
        removed
    }

    /// Removes every registration.
    ///
    /// Instances already handed out stay alive as long as callers hold them.
    pub fn clear_all(&self) {
        let cleared = {
            let mut entries = self.entries.write();
            let count = entries.len();
            entries.clear();
            count
        };
        tracing::debug!(cleared, "cleared all registrations");
    }
}

fn into_construction_error(
    service: &'static str,
    error: Box<dyn StdError + Send + Sync>,
) -> DiError {
    match error.downcast::<DiError>() {
        Ok(inner) => *inner,
        Err(other) => DiError::Construction {
            service,
            source: Arc::from(other),
        },
    }
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("registrations", &self.len())
            .field("observers", &self.observers.read().len())
            .field("config", &self.config)
            .finish()
    }
}
