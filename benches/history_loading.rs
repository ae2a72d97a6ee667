use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use record_history::models::{MsgRecord, SubPayload, category};
use record_history::store::HistoryStore;
use tempfile::TempDir;

/// Generate a synthetic history tree with N message records, one second apart
fn generate_history(num_records: u32) -> TempDir {
    let temp = TempDir::new().unwrap();
    let store = HistoryStore::new(temp.path());

    for i in 0..num_records {
        let record = MsgRecord::new(1_600_000_000 + i, (i % 3) as u8 + 1, SubPayload::new(0x0A, 0x0B, 0x0C));
        store.try_persist(category::ECS_MSG_MODEL, &record).unwrap();
    }

    temp
}

fn bench_load_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_all");

    for size in [100, 1_000, 10_000].iter() {
        let temp = generate_history(*size);
        let store = HistoryStore::new(temp.path());

        group.throughput(Throughput::Elements(u64::from(*size)));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let records: Vec<MsgRecord> = store.load_all(black_box(category::ECS_MSG_MODEL));
                records
            });
        });
    }

    group.finish();
}

fn bench_list_files(c: &mut Criterion) {
    let temp = generate_history(10_000);
    let store = HistoryStore::new(temp.path());

    c.bench_function("list_files_10000", |b| {
        b.iter(|| store.list_files(black_box(category::ECS_MSG_MODEL)).unwrap());
    });
}

criterion_group!(benches, bench_load_all, bench_list_files);
criterion_main!(benches);
