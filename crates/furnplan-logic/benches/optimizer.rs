//! Criterion benchmarks for the optimizer and codec.
//!
//! Benchmarks:
//!   - optimize an empty 16×16 room per builtin building
//!   - re-optimize an already full room (pure validation scan)
//!   - encode / decode a full room, both wire formats
//!
//! Run with: cargo bench -p furnplan-logic --bench optimizer

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use furnplan_logic::catalog::Catalog;
use furnplan_logic::codec::{decode, encode, EncodeMode};
use furnplan_logic::optimizer::{optimize, OptimizeOptions};
use furnplan_logic::plan::Plan;

// ---------------------------------------------------------------------------
// Benchmark: optimize
// ---------------------------------------------------------------------------

fn bench_optimize(c: &mut Criterion) {
    let catalog = Catalog::builtin().expect("builtin catalog");
    let options = OptimizeOptions::default();
    let mut group = c.benchmark_group("optimize_16x16");
    group.sample_size(20);

    for id in ["SMITHY", "TAVERN", "WAREHOUSE"] {
        let (building, set) = catalog.resolve(id).expect("builtin building");
        let mut room = Plan::new(id, 16, 16);
        room.add_door(0, 8);

        group.bench_function(format!("empty_{}", id.to_lowercase()), |b| {
            b.iter(|| black_box(optimize(building, set, black_box(&room), &options)));
        });

        let full = optimize(building, set, &room, &options).plan;
        group.bench_function(format!("full_{}", id.to_lowercase()), |b| {
            b.iter(|| black_box(optimize(building, set, black_box(&full), &options)));
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: codec
// ---------------------------------------------------------------------------

fn bench_codec(c: &mut Criterion) {
    let catalog = Catalog::builtin().expect("builtin catalog");
    let (building, set) = catalog.resolve("WAREHOUSE").expect("builtin building");
    let plan = optimize(building, set, &Plan::new("WAREHOUSE", 32, 32), &OptimizeOptions::default()).plan;
    let mut group = c.benchmark_group("codec_32x32");

    for (name, mode) in [("binary", EncodeMode::Uncompressed), ("deflate", EncodeMode::Compressed)] {
        let text = encode(&plan, mode).expect("encode");
        group.bench_function(format!("encode_{}", name), |b| {
            b.iter(|| black_box(encode(black_box(&plan), mode)));
        });
        group.bench_function(format!("decode_{}", name), |b| {
            b.iter(|| black_box(decode(black_box(&text))));
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Register groups
// ---------------------------------------------------------------------------

criterion_group!(benches, bench_optimize, bench_codec);
criterion_main!(benches);
