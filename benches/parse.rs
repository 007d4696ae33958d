use std::time::Duration;

use criterion::measurement::WallTime;
use criterion::{
    black_box, criterion_group, criterion_main, BenchmarkGroup, BenchmarkId, Criterion,
    Throughput,
};
use nested_query::ParseOptions;
use serde::Deserialize;

#[derive(Deserialize)]
#[allow(dead_code)]
struct User {
    id: u64,
    name: String,
    email: String,
    role: String,
}

#[derive(Deserialize)]
#[allow(dead_code)]
struct Roster {
    users: Vec<User>,
}

fn make_flat(count: usize) -> String {
    (0..count)
        .map(|i| format!("key{i}=value+{i}%21"))
        .collect::<Vec<_>>()
        .join("&")
}

fn make_records(count: usize) -> String {
    (0..count)
        .map(|i| {
            format!(
                "users[][id]={i}&users[][name]=user+{i}&users[][email]=u{i}%40example.com&users[][role]=member"
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn make_nested(count: usize) -> String {
    (0..count)
        .map(|i| {
            format!(
                "org[teams][][data][attrs][id]={i}&org[teams][][data][attrs][name]=team{i}&org[teams][][data][tags][]=t{i}"
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn bench_parse(group: &mut BenchmarkGroup<'_, WallTime>, name: &str, query: &str) {
    let options = ParseOptions::default();
    group.throughput(Throughput::Bytes(query.len() as u64));
    group.bench_function(BenchmarkId::new("tree", name), |b| {
        b.iter(|| {
            let map = nested_query::parse_with_options(black_box(query), &options).unwrap();
            black_box(map);
        })
    });
}

fn quick_parse(query: &str) {
    let map = nested_query::parse(black_box(query)).unwrap();
    black_box(map);
}

fn criterion_config() -> Criterion {
    if std::env::var("NQS_BENCH_MINIMAL").is_ok() {
        Criterion::default()
            .warm_up_time(Duration::from_secs(0))
            .measurement_time(Duration::from_millis(10))
            .sample_size(10)
            .nresamples(1)
    } else {
        Criterion::default()
    }
}

fn criterion_benchmark(c: &mut Criterion) {
    let flat = make_flat(2000);
    let records = make_records(2000);
    let nested = make_nested(1000);
    let encoded = nested_query::encode::to_query_string(
        &nested_query::parse(&records).expect("records parse"),
    );
    let urlencoded = encoded
        .replace('[', "%5B")
        .replace(']', "%5D")
        .replace('=', "%3D")
        .replace('&', "%26");

    if std::env::var("NQS_BENCH_QUICK").is_ok() {
        quick_parse(&flat);
        quick_parse(&records);
        quick_parse(&nested);
        return;
    }

    let mut parse = c.benchmark_group("parse");
    bench_parse(&mut parse, "flat_pairs", &flat);
    bench_parse(&mut parse, "array_of_hashes", &records);
    bench_parse(&mut parse, "nested_records", &nested);
    parse.finish();

    let mut body = c.benchmark_group("urlencoded");
    body.throughput(Throughput::Bytes(urlencoded.len() as u64));
    body.bench_function("array_of_hashes", |b| {
        b.iter(|| {
            let map = nested_query::parse_urlencoded(black_box(urlencoded.as_str())).unwrap();
            black_box(map);
        })
    });
    body.finish();

    let mut typed = c.benchmark_group("typed");
    typed.throughput(Throughput::Bytes(records.len() as u64));
    typed.bench_function("roster", |b| {
        b.iter(|| {
            let roster: Roster = nested_query::from_str(black_box(&records)).unwrap();
            black_box(roster);
        })
    });
    typed.finish();

    let tree = nested_query::parse(&records).expect("records parse");
    let mut encode = c.benchmark_group("encode");
    encode.bench_function("array_of_hashes", |b| {
        b.iter(|| black_box(nested_query::encode::to_query_string(black_box(&tree))))
    });
    encode.finish();
}

criterion_group! {
    name = benches;
    config = criterion_config();
    targets = criterion_benchmark
}
criterion_main!(benches);
