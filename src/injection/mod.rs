//! Declarative field injection.
//!
//! A type opts fields into injection by implementing [`Injectable`], usually
//! through the [`injectable!`](crate::injectable) macro and its `#[inject]`
//! field marker. [`FieldInjector`] discovers those fields once per type and
//! fills them from a [`ServiceRegistry`].
//!
//! Injection is never implicit: whatever owns the object's lifecycle (a
//! constructor, an activation hook, a tool panel opening) must call
//! [`ServiceRegistry::inject_into`] at that moment. Calling it again simply
//! resolves every marked field again and overwrites the previous values.

mod cache;
mod macros;

use std::any::type_name;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::error::{DiError, DiResult, FieldInjectionError};
use crate::key::Key;
use crate::observer::InjectionObserver;
use crate::registration::{downcast_instance, AnyArc};
use crate::registry::ServiceRegistry;

use cache::FieldCache;

/// Types whose marked fields can be populated from a registry.
///
/// Implementations list the marked fields in declaration order. The list is
/// requested once per type and cached for the rest of the process.
///
/// # Examples
///
/// Hand-written, equivalent to what [`injectable!`](crate::injectable) generates:
///
/// ```rust
/// use ferrous_inject::{Injectable, InjectableField, ServiceRegistry};
/// use std::sync::Arc;
///
/// struct Clock;
///
/// struct Dashboard {
///     clock: Option<Arc<Clock>>,
///     title: String,
/// }
///
/// impl Injectable for Dashboard {
///     fn injectable_fields() -> Vec<InjectableField<Self>> {
///         vec![InjectableField::new("clock", |d: &mut Dashboard| &mut d.clock)]
///     }
/// }
///
/// let registry = ServiceRegistry::new();
/// registry.register_instance(Clock);
///
/// let mut dashboard = Dashboard { clock: None, title: "main".into() };
/// let report = registry.inject_into(&mut dashboard);
///
/// assert!(report.is_complete());
/// assert!(dashboard.clock.is_some());
/// assert_eq!(dashboard.title, "main");
/// ```
pub trait Injectable: Sized + 'static {
    /// The marked fields of `Self`.
    fn injectable_fields() -> Vec<InjectableField<Self>>;
}

/// Static description of a marked field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Type that declares the field
    pub declaring_type: &'static str,
    /// Field name
    pub field_name: &'static str,
    /// Contract resolved for the field
    pub field_type: Key,
}

type Assign<T> = Box<dyn Fn(&mut T, &AnyArc) -> DiResult<()> + Send + Sync>;

/// A marked field of `T`: its descriptor plus a setter.
pub struct InjectableField<T> {
    descriptor: FieldDescriptor,
    assign: Assign<T>,
}

impl<T: 'static> InjectableField<T> {
    /// Describes field `field_name`, reached through `slot`.
    ///
    /// The field's type must be `Option<Arc<S>>`; `S` is the contract that
    /// gets resolved and may be a trait object.
    pub fn new<S>(field_name: &'static str, slot: fn(&mut T) -> &mut Option<Arc<S>>) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
    {
        let field_type = Key::of::<S>();
        Self {
            descriptor: FieldDescriptor {
                declaring_type: type_name::<T>(),
                field_name,
                field_type,
            },
            assign: Box::new(move |target: &mut T, instance: &AnyArc| {
                let value = downcast_instance::<S>(instance)
                    .ok_or(DiError::TypeMismatch(field_type.display_name()))?;
                *slot(target) = Some(value);
                Ok(())
            }),
        }
    }

    /// The field's descriptor.
    pub fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    /// Stores `instance` into the field of `target`.
    pub(crate) fn assign(&self, target: &mut T, instance: &AnyArc) -> DiResult<()> {
        (self.assign)(target, instance)
    }
}

impl<T> std::fmt::Debug for InjectableField<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InjectableField")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// Outcome of one `inject_into` call.
#[derive(Debug, Clone, Default)]
pub struct InjectionReport {
    /// Concrete type of the target
    pub target_type: &'static str,
    /// Names of the fields that were assigned, in order
    pub injected: Vec<&'static str>,
    /// Fields that could not be assigned
    pub failures: Vec<FieldInjectionError>,
}

impl InjectionReport {
    fn for_type<T>() -> Self {
        Self {
            target_type: type_name::<T>(),
            ..Self::default()
        }
    }

    /// Whether every marked field was injected.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of marked fields that were looked at.
    pub fn attempted(&self) -> usize {
        self.injected.len() + self.failures.len()
    }

    /// The failure for `field_name`, if that field failed.
    pub fn failure(&self, field_name: &str) -> Option<&FieldInjectionError> {
        self.failures.iter().find(|f| f.field_name == field_name)
    }
}

static SHARED: Lazy<FieldInjector> = Lazy::new(FieldInjector::new);

/// Discovers marked fields and fills them from a registry.
///
/// The field-table cache is independent of any registry's contents, so one
/// injector serves every registry; [`FieldInjector::shared`] is the one the
/// registry methods use.
#[derive(Default)]
pub struct FieldInjector {
    cache: FieldCache,
}

impl FieldInjector {
    /// Creates an injector with an empty field cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide injector.
    pub fn shared() -> &'static FieldInjector {
        &SHARED
    }

    /// Descriptors of the marked fields of `T`, discovering them if needed.
    pub fn fields_of<T: Injectable>(&self) -> Vec<FieldDescriptor> {
        self.cache
            .fields_of::<T>()
            .iter()
            .map(|field| *field.descriptor())
            .collect()
    }

    /// Number of types whose fields have been discovered.
    pub fn cached_types(&self) -> usize {
        self.cache.len()
    }

    /// Populates the marked fields of `target` from `registry`.
    ///
    /// Each field is resolved and assigned independently. A field that fails
    /// is reported to `sink` (and logged when the registry's
    /// `log_field_failures` is set) and the remaining fields are still
    /// processed. Nothing is propagated to the caller.
    pub fn inject_into<T: Injectable>(
        &self,
        registry: &ServiceRegistry,
        target: &mut T,
        sink: &dyn InjectionObserver,
    ) -> InjectionReport {
        let mut report = InjectionReport::for_type::<T>();
        let fields = self.cache.fields_of::<T>();
        if fields.is_empty() {
            return report;
        }

        for field in fields.iter() {
            let descriptor = field.descriptor();
            let outcome = registry
                .resolve_key(&descriptor.field_type)
                .and_then(|instance| field.assign(target, &instance));

            match outcome {
                Ok(()) => {
                    sink.field_injected(descriptor);
                    report.injected.push(descriptor.field_name);
                }
                Err(cause) => {
                    let failure = FieldInjectionError {
                        target_type: report.target_type,
                        field_name: descriptor.field_name,
                        field_type: descriptor.field_type,
                        cause,
                    };
                    if registry.config().log_field_failures {
                        tracing::warn!(
                            target_type = failure.target_type,
                            field = failure.field_name,
                            contract = failure.field_type.display_name(),
                            cause = %failure.cause,
                            "field injection failed"
                        );
                    }
                    sink.field_failed(&failure);
                    report.failures.push(failure);
                }
            }
        }

        tracing::trace!(
            target_type = report.target_type,
            injected = report.injected.len(),
            failed = report.failures.len(),
            "injection finished"
        );
        report
    }
}

impl ServiceRegistry {
    /// Populates the marked fields of `target`, reporting failures to this
    /// registry's observers.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ferrous_inject::{injectable, ServiceRegistry};
    /// use std::sync::Arc;
    ///
    /// trait Foo: Send + Sync {}
    /// trait Bar: Send + Sync {}
    /// struct RealFoo;
    /// impl Foo for RealFoo {}
    ///
    /// injectable! {
    ///     #[derive(Default)]
    ///     struct Widget {
    ///         #[inject]
    ///         foo: Option<Arc<dyn Foo>>,
    ///         #[inject]
    ///         bar: Option<Arc<dyn Bar>>,
    ///         clicks: u32,
    ///     }
    /// }
    ///
    /// let registry = ServiceRegistry::new();
    /// registry.register_shared::<dyn Foo>(Arc::new(RealFoo));
    ///
    /// let mut widget = Widget::default();
    /// let report = registry.inject_into(&mut widget);
    ///
    /// assert!(widget.foo.is_some());
    /// assert!(widget.bar.is_none());
    /// assert_eq!(widget.clicks, 0);
    /// assert_eq!(report.injected, vec!["foo"]);
    /// assert!(report.failure("bar").unwrap().cause.is_not_found());
    /// ```
    pub fn inject_into<T: Injectable>(&self, target: &mut T) -> InjectionReport {
        let observers = self.observers();
        FieldInjector::shared().inject_into(self, target, &observers)
    }

    /// Like [`inject_into`](Self::inject_into), doing nothing for `None`.
    pub fn inject_into_opt<T: Injectable>(&self, target: Option<&mut T>) -> InjectionReport {
        match target {
            Some(target) => self.inject_into(target),
            None => InjectionReport::for_type::<T>(),
        }
    }

    /// Populates the marked fields of `target`, reporting to `sink` instead
    /// of the registry's observers.
    pub fn inject_into_with<T: Injectable>(
        &self,
        target: &mut T,
        sink: &dyn InjectionObserver,
    ) -> InjectionReport {
        FieldInjector::shared().inject_into(self, target, sink)
    }

    /// Default-constructs `T` and injects it once, as a construction-time hook.
    pub fn construct<T: Injectable + Default>(&self) -> (T, InjectionReport) {
        let mut target = T::default();
        let report = self.inject_into(&mut target);
        (target, report)
    }
}
