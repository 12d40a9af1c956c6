#![no_main]

use ferrous_inject::{injectable, Lifetime, ServiceRegistry};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

#[derive(Debug)]
struct Small(u8);

#[derive(Debug)]
struct Large(u64);

injectable! {
    #[derive(Default)]
    struct Target {
        #[inject]
        small: Option<Arc<Small>>,
        #[inject]
        large: Option<Arc<Large>>,
        untouched: u8,
    }
}

// Each byte pair is one operation against the registry; a shadow model
// tracks which types must be resolvable afterwards.
fuzz_target!(|data: &[u8]| {
    let registry = ServiceRegistry::new();
    let mut small_registered = false;
    let mut large_registered = false;

    for chunk in data.chunks_exact(2) {
        let (op, value) = (chunk[0], chunk[1]);
        match op % 8 {
            0 => {
                registry.register_instance(Small(value));
                small_registered = true;
            }
            1 => {
                registry.register_factory::<Small, _>(Lifetime::Transient, move || Small(value));
                small_registered = true;
            }
            2 => {
                registry.register_factory::<Large, _>(Lifetime::Singleton, move || Large(u64::from(value)));
                large_registered = true;
            }
            3 => {
                registry.register_fallible_factory::<Large, _, _>(Lifetime::Singleton, move || {
                    if value % 2 == 0 {
                        Ok(Large(u64::from(value)))
                    } else {
                        Err("odd value")
                    }
                });
                large_registered = true;
            }
            4 => {
                let removed = registry.clear_singleton::<Small>();
                assert_eq!(removed, small_registered);
                small_registered = false;
            }
            5 => {
                registry.clear_all();
                small_registered = false;
                large_registered = false;
            }
            6 => {
                let mut target = Target { untouched: value, ..Target::default() };
                let report = registry.inject_into(&mut target);
                assert_eq!(report.attempted(), 2);
                assert_eq!(target.small.is_some(), small_registered);
                assert_eq!(target.untouched, value);
            }
            _ => {
                assert_eq!(registry.resolve::<Small>().is_ok(), small_registered);
                if !large_registered {
                    assert!(registry.resolve::<Large>().unwrap_err().is_not_found());
                }
            }
        }
        assert_eq!(
            registry.len(),
            usize::from(small_registered) + usize::from(large_registered)
        );
    }
});
