/// Property-based tests for lifetimes and clearing
///
/// These tests verify that resolution follows the lifetime rules for any mix
/// of registrations and clears.

use ferrous_inject::{Lifetime, ServiceRegistry};
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug)]
struct ServiceA {
    value: String,
}

#[derive(Debug)]
struct ServiceB;

fn lifetime_strategy() -> impl Strategy<Value = Lifetime> {
    prop_oneof![Just(Lifetime::Singleton), Just(Lifetime::Transient)]
}

// Property: instance registrations always resolve to the registered instance
proptest! {
    #[test]
    fn instance_resolution_is_identity(value in "\\PC{0,50}", resolves in 1usize..10) {
        let registry = ServiceRegistry::new();
        let original = Arc::new(ServiceA { value: value.clone() });
        registry.register_shared(original.clone());

        for _ in 0..resolves {
            let resolved = registry.resolve::<ServiceA>().unwrap();
            prop_assert!(Arc::ptr_eq(&original, &resolved));
            prop_assert_eq!(&resolved.value, &value);
        }
    }
}

// Property: a factory runs once for singletons and once per resolve for transients
proptest! {
    #[test]
    fn factory_call_count_matches_lifetime(lifetime in lifetime_strategy(), resolves in 1usize..20) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let registry = ServiceRegistry::new();
        registry.register_factory::<ServiceA, _>(lifetime, move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            ServiceA { value: n.to_string() }
        });

        let first = registry.resolve::<ServiceA>().unwrap();
        for _ in 1..resolves {
            let next = registry.resolve::<ServiceA>().unwrap();
            prop_assert_eq!(Arc::ptr_eq(&first, &next), lifetime.is_singleton());
        }

        let expected = if lifetime.is_singleton() { 1 } else { resolves };
        prop_assert_eq!(calls.load(Ordering::SeqCst), expected);
    }
}

// Property: resolution succeeds exactly when something is registered
proptest! {
    #[test]
    fn resolution_matches_registration_state(ops in prop::collection::vec(0u8..4, 0..40)) {
        let registry = ServiceRegistry::new();
        let mut registered = false;

        for op in ops {
            match op {
                0 => {
                    registry.register_instance(ServiceB);
                    registered = true;
                }
                1 => {
                    registry.register_factory::<ServiceB, _>(Lifetime::Transient, || ServiceB);
                    registered = true;
                }
                2 => {
                    prop_assert_eq!(registry.clear_singleton::<ServiceB>(), registered);
                    registered = false;
                }
                _ => {
                    registry.clear_all();
                    registered = false;
                }
            }

            prop_assert_eq!(registry.resolve::<ServiceB>().is_ok(), registered);
            prop_assert_eq!(registry.contains::<ServiceB>(), registered);
            prop_assert_eq!(registry.len(), usize::from(registered));
        }
    }
}
