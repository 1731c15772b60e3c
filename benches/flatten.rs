use chrono::{DateTime, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use flatnote::{from_serialize, inspect, modifier, Flattener, Mode};
use std::collections::BTreeMap;

struct Reading {
    sensor: String,
    value: f64,
    ok: bool,
}
inspect!(Reading { sensor, value, ok });

struct Station {
    name: String,
    altitude: f64,
    readings: Vec<Reading>,
    tags: BTreeMap<String, u32>,
    updated: DateTime<Utc>,
}
inspect!(Station {
    name,
    altitude,
    readings,
    tags,
    updated,
});

#[derive(serde::Serialize)]
struct SerdeStation {
    name: String,
    altitude: f64,
    values: Vec<f64>,
}

fn station(readings: usize) -> Station {
    let mut tags = BTreeMap::new();
    tags.insert("region".to_string(), 4);
    tags.insert("tier".to_string(), 2);
    Station {
        name: "K2-18".to_string(),
        altitude: 3200.0,
        readings: (0..readings)
            .map(|i| Reading {
                sensor: format!("s{i}"),
                value: i as f64 * 0.25,
                ok: i % 3 != 0,
            })
            .collect(),
        tags,
        updated: DateTime::from_timestamp(1_700_000_000, 0).unwrap_or_default(),
    }
}

fn bench_flatten(c: &mut Criterion) {
    let small = station(4);
    let large = station(256);

    let keep = Flattener::new(Mode::NoSkipEmpty, ".").register_modifier(modifier::timestamp());
    let skip = Flattener::new(Mode::SkipEmpty, ".").register_modifier(modifier::timestamp());

    c.bench_function("flatten_small_keep", |b| {
        b.iter(|| keep.notation(black_box(&small)))
    });
    c.bench_function("flatten_small_skip", |b| {
        b.iter(|| skip.notation(black_box(&small)))
    });
    c.bench_function("flatten_large_keep", |b| {
        b.iter(|| keep.notation(black_box(&large)))
    });
}

fn bench_serde_bridge(c: &mut Criterion) {
    let station = SerdeStation {
        name: "K2-18".to_string(),
        altitude: 3200.0,
        values: (0..256).map(|i| i as f64 * 0.25).collect(),
    };

    c.bench_function("bridge_large_keep", |b| {
        b.iter(|| from_serialize(black_box(&station), Mode::NoSkipEmpty, "."))
    });
}

criterion_group!(benches, bench_flatten, bench_serde_bridge);
criterion_main!(benches);
