//! # ferrous-inject
//!
//! An in-process service registry with lifetime management, plus declarative
//! field injection driven by that registry.
//!
//! ## Features
//!
//! - **Lifetimes**: Singleton (one shared instance) and Transient (new instance per resolve)
//! - **Deferred factories**: registration order does not need to follow dependency order
//! - **Trait contracts**: register and resolve `dyn Trait` directly
//! - **Field injection**: opt fields in with `#[inject]`; one missing service never breaks the others
//! - **Thread-safe**: concurrent registration and resolution, at most one retained instance per singleton
//! - **Process-wide or scoped**: use the [`global`] registry or your own [`ServiceRegistry`]
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_inject::{injectable, Lifetime, ServiceRegistry};
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicU32, Ordering};
//!
//! #[derive(Default)]
//! struct HitCounter(AtomicU32);
//!
//! pub trait Greeter: Send + Sync {
//!     fn greet(&self, name: &str) -> String;
//! }
//!
//! struct Polite;
//! impl Greeter for Polite {
//!     fn greet(&self, name: &str) -> String {
//!         format!("Good day, {name}")
//!     }
//! }
//!
//! injectable! {
//!     #[derive(Default)]
//!     struct FrontDesk {
//!         #[inject]
//!         greeter: Option<Arc<dyn Greeter>>,
//!         #[inject]
//!         hits: Option<Arc<HitCounter>>,
//!         visitors: Vec<String>,
//!     }
//! }
//!
//! let registry = ServiceRegistry::new();
//! registry.register_shared::<dyn Greeter>(Arc::new(Polite));
//! registry.register_factory::<HitCounter, _>(Lifetime::Singleton, HitCounter::default);
//!
//! // Injection is an explicit lifecycle step.
//! let mut desk = FrontDesk::default();
//! let report = registry.inject_into(&mut desk);
//! assert!(report.is_complete());
//!
//! let greeting = desk.greeter.as_ref().unwrap().greet("Ada");
//! desk.hits.as_ref().unwrap().0.fetch_add(1, Ordering::SeqCst);
//!
//! assert_eq!(greeting, "Good day, Ada");
//! assert_eq!(registry.resolve::<HitCounter>().unwrap().0.load(Ordering::SeqCst), 1);
//! ```
//!
//! ## Service Lifetimes
//!
//! - **Singleton**: materialized once (eagerly for instances, lazily for
//!   factories) and shared until the registration is cleared. A failed
//!   factory call is not cached.
//! - **Transient**: the factory runs on every resolution.
//!
//! ## Registration policy
//!
//! Registering a contract again replaces the previous registration, including
//! any cached singleton.
//!
//! ## Partial injection
//!
//! ```rust
//! use ferrous_inject::{injectable, ServiceRegistry};
//! use std::sync::Arc;
//!
//! struct Foo;
//! struct Bar;
//!
//! injectable! {
//!     #[derive(Default)]
//!     struct Target {
//!         #[inject]
//!         foo: Option<Arc<Foo>>,
//!         #[inject]
//!         bar: Option<Arc<Bar>>,
//!     }
//! }
//!
//! let registry = ServiceRegistry::new();
//! registry.register_instance(Foo);
//!
//! let mut target = Target::default();
//! let report = registry.inject_into(&mut target);
//!
//! assert!(target.foo.is_some());
//! assert!(target.bar.is_none());
//! assert_eq!(report.failures.len(), 1);
//! assert_eq!(report.failures[0].field_name, "bar");
//! ```

// Module declarations
pub mod config;
pub mod contract;
pub mod descriptors;
pub mod error;
pub mod global;
pub mod injection;
pub mod key;
pub mod lifetime;
pub mod modules;
pub mod observer;
pub mod registry;

// Internal modules
mod internal;
mod registration;

// Re-export core types
pub use config::RegistryConfig;
pub use contract::Implements;
pub use descriptors::ServiceDescriptor;
pub use error::{BoxError, DiError, DiResult, FieldInjectionError};
pub use injection::{FieldDescriptor, FieldInjector, Injectable, InjectableField, InjectionReport};
pub use key::{key_of, Key};
pub use lifetime::Lifetime;
pub use modules::{RegistrationPhase, ServiceModule};
pub use observer::{FailureCallback, InjectionObserver, TracingObserver};
pub use registration::{downcast_instance, AnyArc};
pub use registry::ServiceRegistry;
