use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use idworker::{
    CallerTag, GatedIdWorker, IdWorker, SystemClock, TWITTER_EPOCH, TimeSource, epoch_instant,
};
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::{Instant, UNIX_EPOCH},
};

struct FixedMockTime {
    millis: i64,
}

impl TimeSource for FixedMockTime {
    fn current_millis(&self) -> i64 {
        self.millis
    }
}

// Number of IDs generated per benchmark iteration. Exactly one millisecond's
// worth of sequence values, so a fixed clock never has to spin.
const TOTAL_IDS: usize = 4096;

/// Benchmarks the hot path against a fixed clock.
fn bench_generator<T>(
    c: &mut Criterion,
    group_name: &str,
    generator_factory: impl Fn() -> IdWorker<T>,
) where
    T: TimeSource,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator = generator_factory();
                for _ in 0..TOTAL_IDS {
                    black_box(generator.next_id().unwrap());
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks one shared generator across threads.
fn bench_generator_contended<T>(
    c: &mut Criterion,
    group_name: &str,
    generator_fn: impl Fn() -> IdWorker<T>,
) where
    T: TimeSource + Send + Sync,
{
    let mut group = c.benchmark_group(group_name);

    for thread_count in [1, 2, 4, 8, 16] {
        let ids_per_thread = TOTAL_IDS / thread_count;

        group.throughput(Throughput::Elements(TOTAL_IDS as u64));
        group.bench_function(format!("elems/{TOTAL_IDS}/threads/{thread_count}"), |b| {
            b.iter_custom(|iters| {
                let start = Instant::now();

                for _ in 0..iters {
                    let generator = Arc::new(generator_fn());
                    let barrier = Arc::new(Barrier::new(thread_count + 1));
                    scope(|s| {
                        for _ in 0..thread_count {
                            let generator = Arc::clone(&generator);
                            let barrier = Arc::clone(&barrier);
                            s.spawn(move || {
                                barrier.wait();
                                for _ in 0..ids_per_thread {
                                    black_box(generator.next_id().unwrap());
                                }
                            });
                        }
                        barrier.wait();
                    });
                }

                start.elapsed()
            });
        });
    }

    group.finish();
}

fn benchmark_mock_sequential(c: &mut Criterion) {
    bench_generator(c, "mock/sequential/idworker", || {
        IdWorker::with_clock(1, 1, UNIX_EPOCH, FixedMockTime { millis: 1 }).unwrap()
    });
}

fn benchmark_mock_contended(c: &mut Criterion) {
    bench_generator_contended(c, "mock/contended/idworker", || {
        IdWorker::with_clock(1, 1, UNIX_EPOCH, FixedMockTime { millis: 1 }).unwrap()
    });
}

fn benchmark_system_sequential(c: &mut Criterion) {
    bench_generator(c, "system/sequential/idworker", || {
        IdWorker::with_clock(1, 1, epoch_instant(TWITTER_EPOCH), SystemClock).unwrap()
    });
}

fn benchmark_system_threaded(c: &mut Criterion) {
    bench_generator_contended(c, "system/threaded/idworker", || {
        IdWorker::with_clock(1, 1, epoch_instant(TWITTER_EPOCH), SystemClock).unwrap()
    });
}

fn benchmark_gated_sequential(c: &mut Criterion) {
    let mut group = c.benchmark_group("system/sequential/gated");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let worker = IdWorker::new(1, 1, epoch_instant(TWITTER_EPOCH)).unwrap();
                let gate = GatedIdWorker::new(worker, CallerTag);
                for _ in 0..TOTAL_IDS {
                    black_box(gate.get_id(black_box("infra-dm")).unwrap());
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    // Mock clock
    benchmark_mock_sequential,
    benchmark_mock_contended,
    // System clock (may spin on rollover)
    benchmark_system_sequential,
    benchmark_system_threaded,
    benchmark_gated_sequential,
);
criterion_main!(benches);
