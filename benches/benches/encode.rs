use criterion::{criterion_group, criterion_main, Criterion};
use sidefx_preset::{factory::factory_shapes, EncodeOptions, PresetLibrary, ShapeDefinition};

fn wide_table() -> Vec<ShapeDefinition> {
    let base = factory_shapes();
    (0..100)
        .flat_map(|round| {
            base.iter().cloned().map(move |mut shape| {
                shape.name = format!("{}_{round}", shape.name);
                shape
            })
        })
        .collect()
}

fn encode_library(c: &mut Criterion) {
    let mut group = c.benchmark_group("library");
    let factory = factory_shapes();
    let wide = wide_table();

    group.bench_function("factory_sequential", |b| {
        b.iter(|| PresetLibrary::build(&factory, &EncodeOptions::default()).expect("build"));
    });

    for parallel in [false, true] {
        let options = EncodeOptions {
            parallel,
            ..EncodeOptions::default()
        };
        let label = if parallel { "1000_parallel" } else { "1000_sequential" };
        group.bench_function(label, |b| {
            b.iter(|| PresetLibrary::build(&wide, &options).expect("build"));
        });
    }

    group.finish();
}

fn parse_library(c: &mut Criterion) {
    let text = PresetLibrary::build(&wide_table(), &EncodeOptions::default())
        .expect("build")
        .to_string();
    c.bench_function("parse_1000", |b| {
        b.iter(|| PresetLibrary::parse(&text).expect("parse"));
    });
}

criterion_group!(benches, encode_library, parse_library);
criterion_main!(benches);
