//! Two-phase registration modules.
//!
//! Registrations are grouped into modules with two hooks. The static phase
//! only registers type mappings and fresh-construction factories and may run
//! at any time. The runtime phase binds instances that already exist, so it
//! runs once those instances are available. The registry does not track
//! which phase has run; it only requires that a type is registered before it
//! is resolved.

use crate::error::DiResult;
use crate::registry::ServiceRegistry;

/// Which hook of a [`ServiceModule`] to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
pub enum RegistrationPhase {
    /// Type mappings and factories only
    Static,
    /// Bindings to already existing instances
    Runtime,
}

/// A group of registrations installed into a [`ServiceRegistry`].
///
/// # Example
///
/// ```rust
/// use ferrous_inject::{DiResult, Lifetime, RegistrationPhase, ServiceModule, ServiceRegistry};
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct Inventory;
///
/// struct Window { title: String }
///
/// struct GameModule {
///     window: Arc<Window>,
/// }
///
/// impl ServiceModule for GameModule {
///     fn register_static(&self, registry: &ServiceRegistry) -> DiResult<()> {
///         registry.register_mapping::<Inventory, Inventory>(Lifetime::Singleton);
///         Ok(())
///     }
///
///     fn register_runtime(&self, registry: &ServiceRegistry) -> DiResult<()> {
///         registry.register_shared(self.window.clone());
///         Ok(())
///     }
/// }
///
/// # fn main() -> DiResult<()> {
/// let registry = ServiceRegistry::new();
/// let module = GameModule { window: Arc::new(Window { title: "main".into() }) };
///
/// registry.install(&module, RegistrationPhase::Static)?;
/// assert!(registry.contains::<Inventory>());
/// assert!(!registry.contains::<Window>());
///
/// registry.install(&module, RegistrationPhase::Runtime)?;
/// assert_eq!(registry.resolve::<Window>()?.title, "main");
/// # Ok(())
/// # }
/// ```
pub trait ServiceModule {
    /// Registers type mappings and factories.
    fn register_static(&self, registry: &ServiceRegistry) -> DiResult<()>;

    /// Registers existing instances. Does nothing by default.
    fn register_runtime(&self, _registry: &ServiceRegistry) -> DiResult<()> {
        Ok(())
    }

    /// Name used in log output.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl ServiceRegistry {
    /// Runs one phase of `module` against this registry.
    pub fn install<M>(&self, module: &M, phase: RegistrationPhase) -> DiResult<&Self>
    where
        M: ServiceModule + ?Sized,
    {
        tracing::debug!(module = module.name(), ?phase, "installing module");
        match phase {
            RegistrationPhase::Static => module.register_static(self)?,
            RegistrationPhase::Runtime => module.register_runtime(self)?,
        }
        Ok(self)
    }

    /// Runs one phase of each module in order, stopping at the first error.
    pub fn install_all(
        &self,
        modules: &[&dyn ServiceModule],
        phase: RegistrationPhase,
    ) -> DiResult<&Self> {
        for module in modules {
            self.install(*module, phase)?;
        }
        Ok(self)
    }
}
