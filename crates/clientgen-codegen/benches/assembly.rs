//! Benchmarks for client assembly.
//!
//! Measures library loading, a single pet store unit per target version and
//! all built-in versions at once.
//!
//! Run with: cargo bench --package clientgen-codegen

use clientgen_codegen::{Generator, TemplateLibrary};
use clientgen_core::{ApiDescription, ClientSettings, EntitySchema, FieldSpec, FieldType};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

const PETSTORE: &str = include_str!("../tests/fixtures/petstore.json");

fn petstore() -> ApiDescription {
    ApiDescription::from_json_str(PETSTORE).unwrap()
}

/// Pet store plus `count` copies of `Pet` with their own operations.
fn scaled_petstore(count: usize) -> ApiDescription {
    let base = petstore();
    let mut api = base.clone();
    let pet = base.entity("Pet").unwrap();

    for i in 0..count {
        let name = format!("Pet{i}");
        api.entities.push(EntitySchema {
            name: name.clone(),
            fields: pet
                .fields
                .iter()
                .cloned()
                .chain(std::iter::once(FieldSpec {
                    name: format!("extra{i}"),
                    schema: FieldType::String,
                    required: false,
                }))
                .collect(),
        });
        for op in base.operations_for("Pet") {
            let mut copy = op.clone();
            copy.name = format!("{}{i}", op.name);
            copy.entity = name.clone();
            copy.path = op.path.replacen("/pet", &format!("/pet{i}"), 1);
            api.operations.push(copy);
        }
    }
    api
}

fn bench_library_load(c: &mut Criterion) {
    c.bench_function("library_load", |b| {
        b.iter(|| black_box(TemplateLibrary::builtin().unwrap()));
    });
}

fn bench_single_unit(c: &mut Criterion) {
    let generator = Generator::builtin().unwrap();
    let api = petstore();
    let settings = ClientSettings::default();

    let mut group = c.benchmark_group("petstore_unit");
    for version in ["legacy-1", "modern-5"] {
        group.bench_with_input(BenchmarkId::from_parameter(version), &version, |b, version| {
            b.iter(|| black_box(generator.run(version, &api, &settings).unwrap()));
        });
    }
    group.finish();
}

fn bench_entity_scaling(c: &mut Criterion) {
    let generator = Generator::builtin().unwrap();
    let settings = ClientSettings::default();

    let mut group = c.benchmark_group("entity_scaling");
    for count in [1, 10, 50] {
        let api = scaled_petstore(count);
        group.throughput(Throughput::Elements(api.entities.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &api, |b, api| {
            b.iter(|| black_box(generator.run("modern-5", api, &settings).unwrap()));
        });
    }
    group.finish();
}

fn bench_all_versions(c: &mut Criterion) {
    let generator = Generator::builtin().unwrap();
    let api = petstore();
    let settings = ClientSettings::default();
    let versions: Vec<String> = generator.matrix().targets().map(|t| t.id().to_string()).collect();

    c.bench_function("run_many_builtin", |b| {
        b.iter(|| black_box(generator.run_many(&versions, &api, &settings)));
    });
}

criterion_group!(
    benches,
    bench_library_load,
    bench_single_unit,
    bench_entity_scaling,
    bench_all_versions
);
criterion_main!(benches);
