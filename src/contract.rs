//! Mapping implementation types onto the contracts they are registered under.

use std::sync::Arc;

/// Conversion from an implementation to a registered contract.
///
/// Every sized type implements `Implements<Self>`. Trait-object contracts are
/// added with the [`implements!`](crate::implements) macro, which generates the
/// unsizing coercion `Arc<Impl> -> Arc<dyn Contract>`.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{implements, Lifetime, ServiceRegistry};
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// #[derive(Default)]
/// struct English;
///
/// impl Greeter for English {
///     fn greet(&self) -> String {
///         "hello".to_string()
///     }
/// }
///
/// implements!(English => dyn Greeter);
///
/// let registry = ServiceRegistry::new();
/// registry.register_mapping::<dyn Greeter, English>(Lifetime::Singleton);
///
/// let greeter = registry.resolve::<dyn Greeter>().unwrap();
/// assert_eq!(greeter.greet(), "hello");
/// ```
pub trait Implements<C: ?Sized + 'static>: Send + Sync + 'static {
    /// Converts a shared implementation into the contract type.
    fn upcast(self: Arc<Self>) -> Arc<C>;
}

impl<T> Implements<T> for T
where
    T: Send + Sync + 'static,
{
    #[inline]
    fn upcast(self: Arc<Self>) -> Arc<T> {
        self
    }
}

/// Declares that an implementation type satisfies one or more trait-object
/// contracts.
///
/// ```rust
/// use ferrous_inject::implements;
///
/// trait Reader: Send + Sync {}
/// trait Writer: Send + Sync {}
///
/// struct FileStore;
/// impl Reader for FileStore {}
/// impl Writer for FileStore {}
///
/// implements!(FileStore => dyn Reader, dyn Writer);
/// ```
#[macro_export]
macro_rules! implements {
    ($implementation:ty => $($contract:ty),+ $(,)?) => {
        $(
            impl $crate::Implements<$contract> for $implementation {
                #[inline]
                fn upcast(self: ::std::sync::Arc<Self>) -> ::std::sync::Arc<$contract> {
                    self
                }
            }
        )+
    };
}
