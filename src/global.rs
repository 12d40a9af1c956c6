//! The process-wide registry.
//!
//! The global registry is created on first use and lives until the process
//! exits. [`clear_all`] empties it at session or test boundaries so it can be
//! populated again.
//!
//! # Examples
//!
//! ```rust
//! use ferrous_inject::{global, Lifetime};
//! use std::sync::Arc;
//!
//! struct Counter;
//!
//! global::register_factory::<Counter, _>(Lifetime::Singleton, || Counter);
//! let a = global::resolve::<Counter>().unwrap();
//! let b = global::resolve::<Counter>().unwrap();
//! assert!(Arc::ptr_eq(&a, &b));
//!
//! global::clear_all();
//! assert!(global::resolve::<Counter>().is_err());
//! ```

use std::error::Error as StdError;
use std::sync::Arc;

use once_cell::sync::{Lazy, OnceCell};

use crate::config::RegistryConfig;
use crate::contract::Implements;
use crate::error::DiResult;
use crate::injection::{Injectable, InjectionReport};
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::registration::AnyArc;
use crate::registry::ServiceRegistry;

static CONFIG: OnceCell<RegistryConfig> = OnceCell::new();

// The registry claims CONFIG when it is built, so a later `configure` fails
// instead of being silently ignored.
static REGISTRY: Lazy<ServiceRegistry> =
    Lazy::new(|| ServiceRegistry::with_config(CONFIG.get_or_init(RegistryConfig::default).clone()));

/// Sets the configuration of the global registry.
///
/// Only effective before the registry is first used, and only once. Returns
/// whether `config` was applied; `true` means the global registry is, or will
/// be, built with `config`, even when other threads race to use it.
pub fn configure(config: RegistryConfig) -> bool {
    match CONFIG.set(config) {
        Ok(()) => true,
        Err(_) => {
            tracing::warn!("global registry already configured or initialized; configuration ignored");
            false
        }
    }
}

/// The global registry.
pub fn registry() -> &'static ServiceRegistry {
    &REGISTRY
}

/// Registers an existing instance as a singleton.
pub fn register_instance<T>(instance: T)
where
    T: Send + Sync + 'static,
{
    registry().register_instance(instance);
}

/// Registers an already shared instance (possibly a trait object) as a singleton.
pub fn register_shared<T>(instance: Arc<T>)
where
    T: ?Sized + Send + Sync + 'static,
{
    registry().register_shared(instance);
}

/// Registers a factory producing `T`.
pub fn register_factory<T, F>(lifetime: Lifetime, factory: F)
where
    T: Send + Sync + 'static,
    F: Fn() -> T + Send + Sync + 'static,
{
    registry().register_factory::<T, F>(lifetime, factory);
}

/// Registers a factory that may fail.
pub fn register_fallible_factory<T, F, E>(lifetime: Lifetime, factory: F)
where
    T: Send + Sync + 'static,
    F: Fn() -> Result<T, E> + Send + Sync + 'static,
    E: Into<Box<dyn StdError + Send + Sync>>,
{
    registry().register_fallible_factory::<T, F, E>(lifetime, factory);
}

/// Registers `I` under contract `C`, default-constructed at resolution time.
pub fn register_mapping<C, I>(lifetime: Lifetime)
where
    C: ?Sized + Send + Sync + 'static,
    I: Implements<C> + Default,
{
    registry().register_mapping::<C, I>(lifetime);
}

/// Resolves `T` from the global registry.
pub fn resolve<T>() -> DiResult<Arc<T>>
where
    T: ?Sized + Send + Sync + 'static,
{
    registry().resolve::<T>()
}

/// Resolves `key` from the global registry as a type-erased instance.
pub fn resolve_key(key: &Key) -> DiResult<AnyArc> {
    registry().resolve_key(key)
}

/// Resolves `T`, returning `None` on any failure.
pub fn try_resolve<T>() -> Option<Arc<T>>
where
    T: ?Sized + Send + Sync + 'static,
{
    registry().try_resolve::<T>()
}

/// Removes the registration for `T`.
pub fn clear_singleton<T>() -> bool
where
    T: ?Sized + 'static,
{
    registry().clear_singleton::<T>()
}

/// Removes every registration from the global registry.
pub fn clear_all() {
    registry().clear_all();
}

/// Populates the marked fields of `target` from the global registry.
pub fn inject_into<T: Injectable>(target: &mut T) -> InjectionReport {
    registry().inject_into(target)
}

/// Like [`inject_into`], doing nothing for `None`.
pub fn inject_into_opt<T: Injectable>(target: Option<&mut T>) -> InjectionReport {
    registry().inject_into_opt(target)
}
