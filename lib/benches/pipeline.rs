use std::path::Path;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rossmann_rs::dataset::decode_json;
use rossmann_rs::PredictionService;
use serde_json::{json, Value};

fn fixtures() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures"))
}

fn batch(n: usize) -> String {
    let records: Vec<Value> = (0..n)
        .map(|i| {
            json!({
                "Store": i % 1115 + 1,
                "DayOfWeek": i % 7 + 1,
                "Date": format!("2015-{:02}-{:02}", i % 12 + 1, i % 28 + 1),
                "Open": 1,
                "Promo": i % 2,
                "StateHoliday": ["0", "a", "b", "c"][i % 4],
                "SchoolHoliday": 0,
                "StoreType": ["a", "b", "c", "d"][i % 4],
                "Assortment": ["a", "b", "c"][i % 3],
                "CompetitionDistance": if i % 10 == 0 { Value::Null } else { json!(100.0 * i as f64) },
                "CompetitionOpenSinceMonth": i % 12 + 1,
                "CompetitionOpenSinceYear": 2000 + i % 15,
                "Promo2": 1,
                "Promo2SinceWeek": i % 52 + 1,
                "Promo2SinceYear": 2009 + i % 6,
                "PromoInterval": "Jan,Apr,Jul,Oct"
            })
        })
        .collect();
    Value::Array(records).to_string()
}

fn bench_handle(c: &mut Criterion) {
    let service = PredictionService::load(
        fixtures().join("model/model_rossmann.json"),
        fixtures().join("parameter"),
    )
    .expect("fixture artifacts");

    let mut group = c.benchmark_group("handle");
    for size in [1, 100, 1000, 10000].iter() {
        let body = batch(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &body, |b, body| {
            b.iter(|| {
                let response = service.handle(black_box(body)).expect("valid batch");
                black_box(response);
            });
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    for size in [100, 10000].iter() {
        let body = batch(*size);
        c.bench_with_input(BenchmarkId::new("decode_json", size), &body, |b, body| {
            b.iter(|| black_box(decode_json(black_box(body)).expect("valid json")));
        });
    }
}

criterion_group!(benches, bench_handle, bench_decode);
criterion_main!(benches);
