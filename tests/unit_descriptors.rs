/// Unit tests for ServiceDescriptor and registry introspection

use ferrous_inject::{Key, Lifetime, ServiceRegistry};

struct Database;
struct Request;

#[test]
fn test_descriptors_sorted_by_type_name() {
    let registry = ServiceRegistry::new();
    registry.register_instance(3u32);
    registry.register_instance(true);
    registry.register_instance('x');

    let names: Vec<_> = registry.descriptors().iter().map(|d| d.type_name()).collect();
    assert_eq!(names, vec!["bool", "char", "u32"]);
}

#[test]
fn test_descriptor_fields() {
    let registry = ServiceRegistry::new();
    registry.register_factory::<Database, _>(Lifetime::Singleton, || Database);
    registry.register_factory::<Request, _>(Lifetime::Transient, || Request);

    let descriptors = registry.descriptors();
    let db = descriptors.iter().find(|d| d.key == Key::of::<Database>()).unwrap();
    let request = descriptors.iter().find(|d| d.key == Key::of::<Request>()).unwrap();

    assert_eq!(db.lifetime, Lifetime::Singleton);
    assert!(db.lifetime.is_singleton());
    assert!(!db.materialized);
    assert_eq!(request.lifetime, Lifetime::Transient);
    assert!(!request.lifetime.is_singleton());
}

#[test]
fn test_contains_and_len() {
    let registry = ServiceRegistry::new();
    assert!(registry.is_empty());

    registry.register_instance(Database);
    assert!(registry.contains::<Database>());
    assert!(registry.contains_key(&Key::of::<Database>()));
    assert!(!registry.contains::<Request>());
    assert_eq!(registry.len(), 1);

    assert!(registry.clear_key(&Key::of::<Database>()));
    assert!(registry.is_empty());
}
