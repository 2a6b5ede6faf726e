use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::time::Duration;

use squalldb_storage::Store;

fn bench_set_get_sequential(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("set_get_sequential_10k", |b| {
        b.iter(|| {
            rt.block_on(async {
                let store = Store::new();
                for i in 0..10_000 {
                    let key = format!("key:{i}");
                    store
                        .set(key.clone(), format!("value:{i}"), Duration::ZERO)
                        .await
                        .unwrap();
                    black_box(store.get(key).await.unwrap());
                }
            });
        })
    });
}

fn bench_set_concurrent(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("set_concurrent_4_tasks_10k", |b| {
        b.iter(|| {
            rt.block_on(async {
                let store = Store::new();
                let mut handles = Vec::new();

                for t in 0..4 {
                    let store = store.clone();
                    handles.push(tokio::spawn(async move {
                        for i in 0..2_500 {
                            store
                                .set(format!("key:{t}:{i}"), "v", Duration::ZERO)
                                .await
                                .unwrap();
                        }
                    }));
                }

                for h in handles {
                    h.await.unwrap();
                }
            });
        })
    });
}

fn bench_list_operations(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("push_pop_1k", |b| {
        b.iter(|| {
            rt.block_on(async {
                let store = Store::new();
                for i in 0..1_000 {
                    store.push("list", format!("item:{i}")).await.unwrap();
                }
                for _ in 0..1_000 {
                    black_box(store.pop("list").await.unwrap());
                }
            });
        })
    });
}

criterion_group!(
    benches,
    bench_set_get_sequential,
    bench_set_concurrent,
    bench_list_operations,
);
criterion_main!(benches);
