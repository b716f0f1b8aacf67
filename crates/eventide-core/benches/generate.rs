//! Benchmark suite for wrapper generation
//!
//! Measures end-to-end generation over synthetic assemblies, sequential
//! against parallel synthesis, and the cost of heavy cross-assembly
//! duplication.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use eventide_core::{
    Assembly, DelegateSignature, Generator, GeneratorConfig, MemberDescriptor, MemberKind,
    TypeDescriptor,
};

/// Generate `count` assemblies with `types` types of eight members each
fn generate_test_assemblies(count: usize, types: usize, prefix: &str) -> Vec<Assembly> {
    (0..count)
        .map(|a| {
            let mut assembly = Assembly::new(format!("{prefix}.Library{a}"));
            for t in 0..types {
                let mut ty = TypeDescriptor::new(format!("Bench.Ns{}", t % 4), format!("Control{t}"));
                for e in 0..6 {
                    ty = ty.with_member(MemberDescriptor::event(
                        format!("Changed{e}"),
                        DelegateSignature::event_handler("System.EventArgs"),
                    ));
                }
                let mut method = MemberDescriptor::new("Refresh", MemberKind::Method)
                    .with_parameter("force", "bool");
                method.return_type = Some("int".to_string());
                ty = ty
                    .with_member(method)
                    .with_member(MemberDescriptor::new("Text", MemberKind::Property));
                assembly = assembly.with_type(ty);
            }
            assembly
        })
        .collect()
}

fn config() -> GeneratorConfig {
    let mut config = GeneratorConfig::default();
    config.include_methods = true;
    config
}

/// Benchmark sequential generation across input sizes
fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");

    for types in [10, 100, 1_000].iter() {
        let assemblies = generate_test_assemblies(4, *types, "Unique");
        group.throughput(Throughput::Elements((*types * 4) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(types), &assemblies, |b, assemblies| {
            b.iter(|| {
                let mut output = Vec::with_capacity(1 << 20);
                let mut generator = Generator::new(config());
                black_box(generator.generate(assemblies, &mut output).ok());
                output
            });
        });
    }

    group.finish();
}

/// Benchmark parallel synthesis against sequential
fn bench_parallel(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel");
    let assemblies = generate_test_assemblies(16, 200, "Unique");

    for parallel in [false, true].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(parallel),
            parallel,
            |b, &parallel| {
                b.iter(|| {
                    let mut output = Vec::with_capacity(1 << 22);
                    let mut generator = Generator::new(config()).with_parallelism(parallel);
                    black_box(generator.generate(&assemblies, &mut output).ok());
                    output
                });
            },
        );
    }

    group.finish();
}

/// Benchmark inputs where every assembly repeats the same types
fn bench_duplicates(c: &mut Criterion) {
    let assemblies: Vec<Assembly> = (0..8)
        .flat_map(|i| generate_test_assemblies(1, 200, &format!("Facade{i}")))
        .map(|mut assembly| {
            for ty in &mut assembly.types {
                ty.namespace = "Bench.Shared".to_string();
            }
            assembly
        })
        .collect();

    c.bench_function("duplicates", |b| {
        b.iter(|| {
            let mut output = Vec::with_capacity(1 << 20);
            let mut generator = Generator::new(config());
            black_box(generator.generate(&assemblies, &mut output).ok());
            output
        });
    });
}

criterion_group!(benches, bench_generate, bench_parallel, bench_duplicates);
criterion_main!(benches);
