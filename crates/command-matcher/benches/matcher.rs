//! Throughput of both matching disciplines on a noisy command stream

use byte_queue::{ByteQueue, OverflowPolicy};
use command_matcher::{PatternSet, Recognizer};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const PATTERNS: [&str; 7] = [
    "$RATE,0", "$RATE,1", "$RATE,2", "$RATE,4", "$RATE,5", "$RATE,10", "$RATE,",
];

fn stream() -> Vec<u8> {
    b"$MAG,12,-40,7*\n$RATE,5\nnoise$RATE,10\n$YAW,45*\n"
        .iter()
        .copied()
        .cycle()
        .take(4096)
        .collect()
}

fn bench_consume_on_match(c: &mut Criterion) {
    let patterns = PatternSet::new(PATTERNS).unwrap();
    let input = stream();

    c.bench_function("consume_on_match_4k", |b| {
        b.iter(|| {
            let mut recognizer = Recognizer::new(patterns.clone());
            let mut queue = ByteQueue::new(64, OverflowPolicy::RejectOnFull).unwrap();
            for chunk in input.chunks(32) {
                for byte in chunk {
                    queue.enqueue(*byte);
                }
                black_box(recognizer.drain(&mut queue));
            }
        })
    });
}

fn bench_carryover(c: &mut Criterion) {
    let patterns = PatternSet::new(PATTERNS).unwrap();
    let input = stream();

    c.bench_function("carryover_4k", |b| {
        b.iter(|| {
            let mut recognizer = Recognizer::new(patterns.clone());
            for chunk in input.chunks(32) {
                black_box(recognizer.feed(chunk));
            }
        })
    });
}

criterion_group!(benches, bench_consume_on_match, bench_carryover);
criterion_main!(benches);
