use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use fprep_core::EngineConfig;
use fprep_engine::cast::cast_range;
use fprep_engine::Dataset;

fn synthetic_csv(lines: usize) -> String {
    let mut text = String::from("a,b,c,d\n");
    for i in 0..lines {
        let x = i as f32;
        text.push_str(&format!("{},{},{},{}\n", x * 0.125, -x / 3.0, x * 1.5e3, 1.0 / (x + 1.0)));
    }
    text
}

fn bench_cast_range(c: &mut Criterion) {
    let text = synthetic_csv(50_000);
    let body = &text.as_bytes()[text.find('\n').map_or(0, |i| i + 1)..];

    let mut group = c.benchmark_group("cast");
    group.throughput(Throughput::Bytes(body.len() as u64));
    group.bench_function("cast_range_single_thread", |b| {
        b.iter(|| black_box(cast_range(black_box(body), b',', b'\n', 0)))
    });
    group.finish();
}

fn bench_dataset_load(c: &mut Criterion) {
    let text = synthetic_csv(200_000);

    let mut group = c.benchmark_group("load");
    group.throughput(Throughput::Bytes(text.len() as u64));
    group.sample_size(10);
    for workers in [1, 2, 4] {
        let config = EngineConfig {
            workers,
            ..EngineConfig::default()
        };
        group.bench_function(format!("dataset_load_{}_workers", workers), |b| {
            b.iter(|| black_box(Dataset::load(text.as_bytes(), config.clone()).unwrap().count()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_cast_range, bench_dataset_load);
criterion_main!(benches);
