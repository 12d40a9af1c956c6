use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use ferrous_inject::{injectable, Lifetime, ServiceRegistry};
use std::sync::Arc;

// ===== Resolution =====

fn bench_singleton_hit(c: &mut Criterion) {
    let registry = ServiceRegistry::new();
    registry.register_instance(42u64);

    c.bench_function("singleton_hit_u64", |b| {
        b.iter(|| {
            let v = registry.resolve::<u64>().unwrap();
            black_box(v);
        })
    });
}

fn bench_singleton_cold(c: &mut Criterion) {
    struct ExpensiveToCreate {
        data: Vec<u64>,
    }

    c.bench_function("singleton_cold_expensive", |b| {
        b.iter_batched(
            || {
                let registry = ServiceRegistry::new();
                registry.register_factory::<ExpensiveToCreate, _>(Lifetime::Singleton, || {
                    ExpensiveToCreate {
                        data: (0..1000).collect(),
                    }
                });
                registry
            },
            |registry| {
                let v = registry.resolve::<ExpensiveToCreate>().unwrap();
                black_box(v.data.len());
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_transient(c: &mut Criterion) {
    let registry = ServiceRegistry::new();
    registry.register_factory::<String, _>(Lifetime::Transient, || "transient".to_string());

    c.bench_function("transient_string", |b| {
        b.iter(|| black_box(registry.resolve::<String>().unwrap()))
    });
}

fn bench_trait_contract(c: &mut Criterion) {
    trait Clock: Send + Sync {
        fn now(&self) -> u64;
    }

    struct Fixed;
    impl Clock for Fixed {
        fn now(&self) -> u64 {
            7
        }
    }

    let registry = ServiceRegistry::new();
    registry.register_shared::<dyn Clock>(Arc::new(Fixed));

    c.bench_function("trait_object_hit", |b| {
        b.iter(|| black_box(registry.resolve::<dyn Clock>().unwrap().now()))
    });
}

fn bench_registry_size(c: &mut Criterion) {
    macro_rules! marker_types {
        ($($name:ident),*) => {
            $(struct $name;)*
            fn fill(registry: &ServiceRegistry) {
                $(registry.register_instance($name);)*
            }
        };
    }

    marker_types!(M0, M1, M2, M3, M4, M5, M6, M7, M8, M9, M10, M11, M12, M13, M14, M15);

    let mut group = c.benchmark_group("resolve_with_neighbors");
    for neighbors in [false, true] {
        let registry = ServiceRegistry::new();
        registry.register_instance(1u32);
        if neighbors {
            fill(&registry);
        }
        group.bench_with_input(BenchmarkId::from_parameter(registry.len()), &registry, |b, r| {
            b.iter(|| black_box(r.resolve::<u32>().unwrap()))
        });
    }
    group.finish();
}

// ===== Injection =====

struct Audio;
struct Physics;
struct Input;

injectable! {
    #[derive(Default)]
    struct Scene {
        #[inject]
        audio: Option<Arc<Audio>>,
        #[inject]
        physics: Option<Arc<Physics>>,
        #[inject]
        input: Option<Arc<Input>>,
        frames: u64,
    }
}

fn bench_inject(c: &mut Criterion) {
    let registry = ServiceRegistry::new();
    registry.register_instance(Audio);
    registry.register_instance(Physics);
    registry.register_instance(Input);

    c.bench_function("inject_three_fields", |b| {
        b.iter(|| {
            let (scene, report) = registry.construct::<Scene>();
            black_box((scene.frames, report.injected.len()))
        })
    });

    let partial = ServiceRegistry::with_config(
        ferrous_inject::RegistryConfig::default().with_log_field_failures(false),
    );
    partial.register_instance(Audio);

    c.bench_function("inject_with_missing_fields", |b| {
        b.iter(|| {
            let (_, report) = partial.construct::<Scene>();
            black_box(report.failures.len())
        })
    });
}

criterion_group!(
    benches,
    bench_singleton_hit,
    bench_singleton_cold,
    bench_transient,
    bench_trait_contract,
    bench_registry_size,
    bench_inject
);
criterion_main!(benches);
