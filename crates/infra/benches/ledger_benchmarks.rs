use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use stockledger_core::OwnerRef;
use stockledger_events::NullSink;
use stockledger_infra::{InMemoryLedgerStore, InventoryLedger, LedgerConfig};
use stockledger_inventory::Comparison;

type Ledger = InventoryLedger<InMemoryLedgerStore, NullSink>;

fn ledger(serialize_per_owner: bool) -> Ledger {
    let config = LedgerConfig {
        serialize_per_owner,
        ..LedgerConfig::default()
    };
    InventoryLedger::new(InMemoryLedgerStore::new(), NullSink, config).unwrap()
}

/// `owners` products, each with `depth` entries; owner `i` ends at quantity `i % 5`.
fn seeded(owners: usize, depth: usize) -> Ledger {
    let ledger = ledger(false);
    for i in 0..owners {
        let owner = OwnerRef::new("product", i.to_string());
        for _ in 1..depth {
            ledger.add_quantity(&owner, 3, None).unwrap();
        }
        ledger.set_quantity(&owner, (i % 5) as i64, None).unwrap();
    }
    ledger
}

fn bench_mutation_latency(c: &mut Criterion) {
    let mut group = c.benchmark_group("mutation_latency");
    group.sample_size(500);

    for serialize in [false, true] {
        let label = if serialize { "serialized" } else { "unserialized" };

        group.bench_function(BenchmarkId::new("set_quantity", label), |b| {
            let ledger = ledger(serialize);
            let owner = OwnerRef::new("product", "1");
            b.iter(|| ledger.set_quantity(black_box(&owner), black_box(10), None).unwrap());
        });

        group.bench_function(BenchmarkId::new("add_then_subtract", label), |b| {
            let ledger = ledger(serialize);
            let owner = OwnerRef::new("product", "1");
            ledger.set_quantity(&owner, 1, None).unwrap();
            b.iter(|| {
                ledger.add_quantity(black_box(&owner), 5, None).unwrap();
                ledger.subtract_quantity(black_box(&owner), 5, None).unwrap();
            });
        });
    }

    group.bench_function("rejected_subtract", |b| {
        let ledger = ledger(false);
        let owner = OwnerRef::new("product", "1");
        ledger.set_quantity(&owner, 1, None).unwrap();
        b.iter(|| ledger.subtract_quantity(black_box(&owner), 2, None).unwrap_err());
    });

    group.finish();
}

fn bench_current_entry_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("current_entry_lookup");

    for depth in [1usize, 100, 1000] {
        let ledger = seeded(1, depth);
        let owner = OwnerRef::new("product", "0");
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, _| {
            b.iter(|| ledger.current_entry(black_box(&owner)).unwrap());
        });
    }

    group.finish();
}

fn bench_quantity_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("quantity_query");

    for owners in [10usize, 100, 1000] {
        let ledger = seeded(owners, 10);
        let restricted: Vec<String> = (0..owners).step_by(2).map(|i| i.to_string()).collect();
        group.throughput(Throughput::Elements(owners as u64));

        group.bench_with_input(BenchmarkId::new("equal_zero", owners), &owners, |b, _| {
            b.iter(|| {
                ledger
                    .query_by_quantity("product", black_box(0), Comparison::Eq, None)
                    .unwrap()
            });
        });

        group.bench_with_input(BenchmarkId::new("not_zero_restricted", owners), &owners, |b, _| {
            b.iter(|| {
                ledger
                    .query_by_quantity_not("product", black_box(0), Some(&restricted))
                    .unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_mutation_latency,
    bench_current_entry_lookup,
    bench_quantity_query
);
criterion_main!(benches);
