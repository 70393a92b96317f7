#![allow(clippy::expect_used)]

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use xmlpp::{KeyedDocument, PrintOptions};

// ---------------------------------------------------------------------------
// Document generators
// ---------------------------------------------------------------------------

/// Builds a catalog with `n` appended records of four fields each.
fn build_wide(n: usize) -> KeyedDocument {
    let mut doc = KeyedDocument::with_declaration("1.0", "UTF-8", None);
    let mut catalog = doc.child("catalog");
    for i in 0..n {
        let mut book = catalog.append("book");
        book.set_attribute("id", &format!("bk{i}"));
        book.child("title").set(format_args!("Title {i}"));
        book.child("author").set(format_args!("Author {i}"));
        book.child("price").set(10.99 + f64::from(u32::try_from(i).unwrap_or(0)));
        book.child("year").set(1990 + i);
    }
    doc
}

/// Builds a single chain of `depth` nested elements through keyed access.
fn build_deep(depth: usize) -> KeyedDocument {
    let mut doc = KeyedDocument::new();
    let mut node = doc.child("root");
    for _ in 0..depth {
        node = node.into_child("level");
    }
    node.set("bottom");
    doc
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for n in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("wide", n), &n, |b, &n| {
            b.iter(|| build_wide(black_box(n)));
        });
    }
    for depth in [10, 100] {
        group.bench_with_input(BenchmarkId::new("deep", depth), &depth, |b, &depth| {
            b.iter(|| build_deep(black_box(depth)));
        });
    }
    group.finish();
}

fn bench_keyed_lookup(c: &mut Criterion) {
    let mut doc = build_wide(100);
    c.bench_function("keyed_lookup_hit", |b| {
        b.iter(|| {
            let mut catalog = doc.child(black_box("catalog"));
            black_box(catalog.child(black_box("book")).child("price").as_f64())
        });
    });
}

fn bench_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize");
    let mut pretty = build_wide(1000);
    group.bench_function("pretty_1000", |b| {
        b.iter(|| black_box(pretty.serialize().len()));
    });
    let mut compact = build_wide(1000);
    compact.set_print_options(PrintOptions::compact());
    group.bench_function("compact_1000", |b| {
        b.iter(|| black_box(compact.serialize().len()));
    });
    group.bench_function("to_bytes_1000", |b| {
        b.iter(|| black_box(compact.to_bytes().len()));
    });
    group.finish();
}

criterion_group!(benches, bench_build, bench_keyed_lookup, bench_serialize);
criterion_main!(benches);
