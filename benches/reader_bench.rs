//! Benchmarks grouped by payload shape, each sized so `Throughput::Bytes`
//! reports a meaningful bytes/sec figure.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use jscan::{Reader, StrSource};

fn flat_array_of_numbers(count: usize) -> String {
    let mut s = String::from("[");
    for i in 0..count {
        if i > 0 {
            s.push(',');
        }
        s.push_str(&i.to_string());
    }
    s.push(']');
    s
}

fn drain_flat_array(input: &str) {
    let mut r = Reader::new(StrSource::new(input));
    r.begin_array().unwrap();
    while r.has_next().unwrap() {
        black_box(r.next_long().unwrap());
    }
    r.end_array().unwrap();
}

fn nested_object_tree(depth: usize) -> String {
    let mut s = String::new();
    for i in 0..depth {
        s.push_str(&format!(r#"{{"child{i}":"#));
    }
    s.push_str(r#"{"leaf":true}"#);
    for _ in 0..depth {
        s.push('}');
    }
    s
}

fn drain_nested_object_tree(input: &str, depth: usize) {
    let mut r = Reader::new(StrSource::new(input));
    for i in 0..depth {
        r.begin_object().unwrap();
        assert_eq!(r.next_name().unwrap(), format!("child{i}"));
    }
    r.begin_object().unwrap();
    assert_eq!(r.next_name().unwrap(), "leaf");
    black_box(r.next_boolean().unwrap());
    r.end_object().unwrap();
    for _ in 0..depth {
        r.end_object().unwrap();
    }
}

fn long_strings_array(count: usize, len: usize) -> String {
    let value = "x".repeat(len);
    let mut s = String::from("[");
    for i in 0..count {
        if i > 0 {
            s.push(',');
        }
        s.push('"');
        s.push_str(&value);
        s.push('"');
    }
    s.push(']');
    s
}

fn drain_long_strings(input: &str) {
    let mut r = Reader::new(StrSource::new(input));
    r.begin_array().unwrap();
    while r.has_next().unwrap() {
        black_box(r.next_string().unwrap());
    }
    r.end_array().unwrap();
}

fn bench_flat_array(c: &mut Criterion) {
    let input = flat_array_of_numbers(10_000);
    let mut group = c.benchmark_group("flat_array_of_numbers");
    group.throughput(Throughput::Bytes(input.len() as u64));
    group.bench_function("10k_numbers", |b| {
        b.iter(|| drain_flat_array(black_box(&input)))
    });
    group.finish();
}

fn bench_nested_object_tree(c: &mut Criterion) {
    let depth = 64;
    let input = nested_object_tree(depth);
    let mut group = c.benchmark_group("nested_object_tree");
    group.throughput(Throughput::Bytes(input.len() as u64));
    group.bench_function("depth_64", |b| {
        b.iter(|| drain_nested_object_tree(black_box(&input), depth))
    });
    group.finish();
}

fn bench_long_strings(c: &mut Criterion) {
    let input = long_strings_array(200, 2_048);
    let mut group = c.benchmark_group("long_strings");
    group.throughput(Throughput::Bytes(input.len() as u64));
    group.bench_function("200x2kb", |b| {
        b.iter(|| drain_long_strings(black_box(&input)))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_flat_array,
    bench_nested_object_tree,
    bench_long_strings
);
criterion_main!(benches);
