//! Benchmarks for database lookups.
//!
//! Run with: cargo bench
//!
//! This benchmark suite measures:
//! - Lookup throughput against databases of different sizes
//! - Cache hit performance
//! - Full enumeration cost

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use qqwry::{
    CachedDatabase, CachedDatabaseConfig, Database, DatabaseConfig, DatabaseWriter, TextEncoding,
};
use std::net::Ipv4Addr;

/// Generate a database of `count` equal-sized ranges covering all of IPv4.
fn generate_database(count: u32) -> Vec<u8> {
    let countries = ["China", "United States", "Japan", "Germany", "France"];
    let areas = ["Telecom", "Unicom", "Mobile", "Data Center", ""];
    let step = u32::MAX / count;

    let mut writer = DatabaseWriter::new().with_redirects();
    for i in 0..count {
        let start = i * step;
        let end = if i == count - 1 { u32::MAX } else { start + step - 1 };
        writer.add_range(
            start,
            end,
            countries[(i % 5) as usize],
            areas[((i / 5) % 5) as usize],
        );
    }
    writer.write().unwrap()
}

fn open(count: u32) -> Database {
    let config = DatabaseConfig::default().with_encoding(TextEncoding::Utf8);
    Database::from_bytes_with_config(generate_database(count), config).unwrap()
}

/// Deterministic spread of query addresses.
fn generate_queries(count: usize) -> Vec<Ipv4Addr> {
    (0..count as u32)
        .map(|i| Ipv4Addr::from(i.wrapping_mul(2_654_435_761)))
        .collect()
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");
    let queries = generate_queries(1000);
    group.throughput(Throughput::Elements(queries.len() as u64));

    for count in [1_000u32, 100_000, 500_000] {
        let db = open(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &db, |b, db| {
            b.iter(|| {
                for ip in &queries {
                    black_box(db.lookup_ip(*ip));
                }
            })
        });
    }

    group.finish();
}

fn bench_lookup_str(c: &mut Criterion) {
    let db = open(100_000);
    let queries: Vec<String> = generate_queries(1000).iter().map(|ip| ip.to_string()).collect();

    c.bench_function("lookup_str", |b| {
        b.iter(|| {
            for ip in &queries {
                black_box(db.lookup(ip));
            }
        })
    });
}

fn bench_cached_lookup(c: &mut Criterion) {
    let db = CachedDatabase::new(open(100_000), CachedDatabaseConfig::default());
    let queries = generate_queries(100);

    // Warm the cache
    for ip in &queries {
        db.lookup_ip(*ip);
    }

    c.bench_function("cached_lookup_hit", |b| {
        b.iter(|| {
            for ip in &queries {
                black_box(db.lookup_ip(*ip));
            }
        })
    });
}

fn bench_enumerate(c: &mut Criterion) {
    let db = open(100_000);

    c.bench_function("enumerate_all", |b| {
        b.iter(|| black_box(db.enumerate_all().count()))
    });
}

criterion_group!(
    benches,
    bench_lookup,
    bench_lookup_str,
    bench_cached_lookup,
    bench_enumerate
);
criterion_main!(benches);
