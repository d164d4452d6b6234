//! Benchmarks for visibility resolution and header generation.
//!
//! Catalogs are synthetic: `n` classes under one namespace, each with a mix
//! of public, protected and private members.
//!
//! ```bash
//! cargo bench --bench resolve_benchmarks
//! ```

use bindsurface_core::{Access, Catalog, EntityKind};
use bindsurface_instantiate::{HeaderGenerator, InstantiationRequest, InstantiationTable};
use bindsurface_policy::{Policy, PolicyRule, Target, resolve};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

const MEMBERS_PER_CLASS: usize = 12;

fn synthetic_catalog(classes: usize) -> Catalog {
    let mut b = Catalog::builder();
    let ns = b
        .add("Sim", EntityKind::Namespace, Access::NotApplicable, None)
        .unwrap();
    for c in 0..classes {
        let class = b
            .add(
                format!("Sim::Body{c}"),
                EntityKind::Class,
                Access::NotApplicable,
                Some(ns),
            )
            .unwrap();
        for m in 0..MEMBERS_PER_CLASS {
            let (kind, access) = match m % 3 {
                0 => (EntityKind::Method, Access::Public),
                1 => (EntityKind::Field, Access::Protected),
                _ => (EntityKind::Field, Access::Private),
            };
            b.add_member(class, format!("m{m}"), kind, access).unwrap();
        }
    }
    b.build()
}

fn conventional_policy(classes: usize) -> Policy {
    let names: Vec<String> = (0..classes).step_by(2).map(|c| format!("Sim::Body{c}")).collect();
    Policy::conventional(&names, ["Sim::step"], ["Sim::Body1*::m0"], [Access::Private, Access::Protected])
        .unwrap()
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    for classes in [10, 100, 1000] {
        let catalog = synthetic_catalog(classes);
        let policy = conventional_policy(classes);
        group.throughput(Throughput::Elements(catalog.len() as u64));
        group.bench_with_input(BenchmarkId::new("conventional", classes), &classes, |b, _| {
            b.iter(|| resolve(black_box(&catalog), black_box(&policy)))
        });
    }

    let catalog = synthetic_catalog(1000);
    let mut glob = Policy::new();
    glob.push(PolicyRule::Include(Target::parse("Sim::*").unwrap()))
        .push(PolicyRule::ExcludeAccess(Access::Private));
    group.bench_function("glob_include_1000", |b| {
        b.iter(|| resolve(black_box(&catalog), black_box(&glob)))
    });
    group.finish();
}

fn bench_header(c: &mut Criterion) {
    let table: InstantiationTable = (0..500)
        .map(|i| {
            InstantiationRequest::new(
                "Sim::interaction",
                [format!("Sim::pot{i}"), "std::vector<double>".to_string()],
                format!("interaction_{i}"),
            )
        })
        .collect();
    let headers = ["sim/sim.h", "sim/potentials.h"];
    let generator = HeaderGenerator::default();
    c.bench_function("header_500_instantiations", |b| {
        b.iter(|| generator.generate(black_box(&headers), black_box(&table)).unwrap())
    });
}

criterion_group!(benches, bench_resolve, bench_header);
criterion_main!(benches);
