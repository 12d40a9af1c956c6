use ferrous_inject::{
    implements, DiError, DiResult, Lifetime, RegistrationPhase, ServiceModule, ServiceRegistry,
};
use std::sync::{Arc, Mutex};

pub trait Renderer: Send + Sync {
    fn backend(&self) -> &'static str;
}

#[derive(Default)]
struct SoftwareRenderer;

impl Renderer for SoftwareRenderer {
    fn backend(&self) -> &'static str {
        "software"
    }
}

implements!(SoftwareRenderer => dyn Renderer);

#[derive(Default)]
struct Inventory {
    items: Mutex<Vec<String>>,
}

struct Window {
    title: String,
}

struct GraphicsModule;

impl ServiceModule for GraphicsModule {
    fn register_static(&self, registry: &ServiceRegistry) -> DiResult<()> {
        registry.register_mapping::<dyn Renderer, SoftwareRenderer>(Lifetime::Singleton);
        Ok(())
    }
}

struct GameModule {
    window: Arc<Window>,
}

impl ServiceModule for GameModule {
    fn register_static(&self, registry: &ServiceRegistry) -> DiResult<()> {
        registry.register_mapping::<Inventory, Inventory>(Lifetime::Singleton);
        Ok(())
    }

    fn register_runtime(&self, registry: &ServiceRegistry) -> DiResult<()> {
        registry.register_shared(self.window.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "game"
    }
}

struct BrokenModule;

impl ServiceModule for BrokenModule {
    fn register_static(&self, registry: &ServiceRegistry) -> DiResult<()> {
        // Static registration that depends on something only runtime provides
        registry.resolve::<Window>()?;
        Ok(())
    }
}

#[test]
fn test_static_phase_registers_mappings_only() {
    let registry = ServiceRegistry::new();
    let game = GameModule {
        window: Arc::new(Window { title: "main".into() }),
    };

    let modules: [&dyn ServiceModule; 2] = [&GraphicsModule, &game];
    registry.install_all(&modules, RegistrationPhase::Static).unwrap();

    assert!(registry.contains::<dyn Renderer>());
    assert!(registry.contains::<Inventory>());
    assert!(!registry.contains::<Window>());
    assert_eq!(registry.resolve::<dyn Renderer>().unwrap().backend(), "software");
}

#[test]
fn test_runtime_phase_binds_existing_instances() {
    let registry = ServiceRegistry::new();
    let window = Arc::new(Window { title: "editor".into() });
    let game = GameModule {
        window: window.clone(),
    };

    registry
        .install(&game, RegistrationPhase::Static)
        .unwrap()
        .install(&game, RegistrationPhase::Runtime)
        .unwrap();

    let resolved = registry.resolve::<Window>().unwrap();
    assert!(Arc::ptr_eq(&window, &resolved));
    assert_eq!(resolved.title, "editor");

    // Runtime phase of a module without runtime bindings does nothing
    let before = registry.len();
    registry.install(&GraphicsModule, RegistrationPhase::Runtime).unwrap();
    assert_eq!(registry.len(), before);
}

#[test]
fn test_singletons_from_modules_are_shared() {
    let registry = ServiceRegistry::new();
    let game = GameModule {
        window: Arc::new(Window { title: "main".into() }),
    };
    registry.install(&game, RegistrationPhase::Static).unwrap();

    registry
        .resolve::<Inventory>()
        .unwrap()
        .items
        .lock()
        .unwrap()
        .push("sword".into());

    assert_eq!(*registry.resolve::<Inventory>().unwrap().items.lock().unwrap(), vec!["sword"]);
}

#[test]
fn test_install_all_stops_at_first_error() {
    let registry = ServiceRegistry::new();
    let game = GameModule {
        window: Arc::new(Window { title: "main".into() }),
    };

    let modules: [&dyn ServiceModule; 3] = [&GraphicsModule, &BrokenModule, &game];
    let err = registry
        .install_all(&modules, RegistrationPhase::Static)
        .unwrap_err();

    assert!(matches!(err, DiError::NotFound(_)));
    assert!(registry.contains::<dyn Renderer>());
    assert!(!registry.contains::<Inventory>());
}

#[test]
fn test_module_names() {
    assert_eq!(GameModule { window: Arc::new(Window { title: String::new() }) }.name(), "game");
    assert!(GraphicsModule.name().ends_with("GraphicsModule"));
}
