//! Diagnostic observers for resolution and field injection.
//!
//! Observers are the diagnostic channel of the registry: per-field injection
//! failures are delivered here instead of being returned as errors, and every
//! resolution outcome can be watched for tracing or metrics.

use std::sync::Arc;
use std::time::Duration;

use crate::error::{DiError, FieldInjectionError};
use crate::injection::FieldDescriptor;
use crate::key::Key;
use crate::lifetime::Lifetime;

/// Observer trait for registry events.
///
/// All methods have empty default bodies, so implementors only override the
/// events they care about. Calls are made synchronously on the resolving
/// thread; keep implementations cheap.
///
/// # Examples
///
/// ```
/// use ferrous_inject::{FieldInjectionError, InjectionObserver, ServiceRegistry};
/// use std::sync::{Arc, Mutex};
///
/// #[derive(Default)]
/// struct MissingFields(Mutex<Vec<String>>);
///
/// impl InjectionObserver for MissingFields {
///     fn field_failed(&self, failure: &FieldInjectionError) {
///         self.0.lock().unwrap().push(failure.field_name.to_string());
///     }
/// }
///
/// let registry = ServiceRegistry::new();
/// let missing = Arc::new(MissingFields::default());
/// registry.add_observer(missing.clone());
/// ```
pub trait InjectionObserver: Send + Sync {
    /// Called after a successful resolution.
    fn resolved(&self, _key: &Key, _lifetime: Lifetime, _duration: Duration) {}

    /// Called when a resolution fails, including for unregistered types.
    fn resolution_failed(&self, _key: &Key, _error: &DiError) {}

    /// Called after a marked field was assigned.
    fn field_injected(&self, _field: &FieldDescriptor) {}

    /// Called for every marked field that could not be injected.
    fn field_failed(&self, _failure: &FieldInjectionError) {}
}

/// Observer that forwards events to `tracing`.
///
/// Failures are logged at `warn`, everything else at `trace`.
///
/// # Examples
///
/// ```
/// use ferrous_inject::{ServiceRegistry, TracingObserver};
/// use std::sync::Arc;
///
/// let registry = ServiceRegistry::new();
/// registry.add_observer(Arc::new(TracingObserver::new()));
/// ```
#[derive(Debug, Clone)]
pub struct TracingObserver {
    label: &'static str,
}

impl TracingObserver {
    /// Creates a tracing observer with the default label.
    pub fn new() -> Self {
        Self::with_label("ferrous-inject")
    }

    /// Creates a tracing observer whose events carry `label`.
    pub fn with_label(label: &'static str) -> Self {
        Self { label }
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl InjectionObserver for TracingObserver {
    fn resolved(&self, key: &Key, lifetime: Lifetime, duration: Duration) {
        tracing::trace!(
            label = self.label,
            service = key.display_name(),
            ?lifetime,
            ?duration,
            "resolved"
        );
    }

    fn resolution_failed(&self, key: &Key, error: &DiError) {
        tracing::warn!(label = self.label, service = key.display_name(), %error, "resolution failed");
    }

    fn field_injected(&self, field: &FieldDescriptor) {
        tracing::trace!(
            label = self.label,
            target_type = field.declaring_type,
            field = field.field_name,
            "field injected"
        );
    }

    fn field_failed(&self, failure: &FieldInjectionError) {
        tracing::warn!(
            label = self.label,
            target_type = failure.target_type,
            field = failure.field_name,
            cause = %failure.cause,
            "field injection failed"
        );
    }
}

/// Observer built from a closure that receives field failures.
///
/// # Examples
///
/// ```
/// use ferrous_inject::FailureCallback;
///
/// let sink = FailureCallback::new(|failure| eprintln!("{failure}"));
/// # let _ = &sink;
/// ```
pub struct FailureCallback<F> {
    callback: F,
}

impl<F> FailureCallback<F>
where
    F: Fn(&FieldInjectionError) + Send + Sync,
{
    /// Wraps `callback`.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> InjectionObserver for FailureCallback<F>
where
    F: Fn(&FieldInjectionError) + Send + Sync,
{
    fn field_failed(&self, failure: &FieldInjectionError) {
        (self.callback)(failure)
    }
}

/// Copy-on-write observer list held by a registry.
///
/// Snapshots are an `Arc` clone, so notifying never holds the registry's
/// observer lock.
#[derive(Clone, Default)]
pub(crate) struct Observers {
    observers: Arc<Vec<Arc<dyn InjectionObserver>>>,
}

impl Observers {
    /// Returns a list with `observer` appended.
    pub(crate) fn with(&self, observer: Arc<dyn InjectionObserver>) -> Self {
        let mut observers = Vec::with_capacity(self.observers.len() + 1);
        observers.extend(self.observers.iter().cloned());
        observers.push(observer);
        Self {
            observers: Arc::new(observers),
        }
    }

    /// Returns true if any observers are registered.
    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }
}

impl InjectionObserver for Observers {
    fn resolved(&self, key: &Key, lifetime: Lifetime, duration: Duration) {
        for observer in self.observers.iter() {
            observer.resolved(key, lifetime, duration);
        }
    }

    fn resolution_failed(&self, key: &Key, error: &DiError) {
        for observer in self.observers.iter() {
            observer.resolution_failed(key, error);
        }
    }

    fn field_injected(&self, field: &FieldDescriptor) {
        for observer in self.observers.iter() {
            observer.field_injected(field);
        }
    }

    fn field_failed(&self, failure: &FieldInjectionError) {
        for observer in self.observers.iter() {
            observer.field_failed(failure);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counting {
        resolved: AtomicUsize,
        failed: AtomicUsize,
    }

    impl InjectionObserver for Counting {
        fn resolved(&self, _: &Key, _: Lifetime, _: Duration) {
            self.resolved.fetch_add(1, Ordering::SeqCst);
        }

        fn field_failed(&self, _: &FieldInjectionError) {
            self.failed.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn observers_fan_out_and_snapshots_are_independent() {
        let first = Arc::new(Counting::default());
        let second = Arc::new(Counting::default());

        let empty = Observers::default();
        assert!(!empty.has_observers());

        let one = empty.with(first.clone());
        let two = one.with(second.clone());
        assert_eq!(one.len(), 1);
        assert_eq!(two.len(), 2);

        two.resolved(&Key::of::<u8>(), Lifetime::Singleton, Duration::ZERO);
        one.resolved(&Key::of::<u8>(), Lifetime::Singleton, Duration::ZERO);

        assert_eq!(first.resolved.load(Ordering::SeqCst), 2);
        assert_eq!(second.resolved.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failure_callback_only_sees_field_failures() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let callback = FailureCallback::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        callback.resolved(&Key::of::<u8>(), Lifetime::Transient, Duration::ZERO);
        callback.field_failed(&FieldInjectionError {
            target_type: "Target",
            field_name: "dep",
            field_type: Key::of::<u8>(),
            cause: DiError::NotFound("u8"),
        });

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
