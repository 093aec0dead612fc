//! Search benchmarks.
//!
//! Run with: `cargo bench`
//!
//! These benchmarks measure:
//! - Full searches with varying iteration counts
//! - Raw rollouts from the empty board
//! - Single moves and win checks on the bit-packed state

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gomoku_mcts::core::{has_five, GameRng, State};
use gomoku_mcts::mcts::{MCTSConfig, MCTSSearch, MCTSTree, SearchContext};

// =============================================================================
// Full Search Benchmarks
// =============================================================================

fn bench_search_iterations(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_iterations");
    group.sample_size(10);

    for iterations in [1_000u32, 5_000, 20_000] {
        group.throughput(Throughput::Elements(u64::from(iterations)));
        group.bench_with_input(
            BenchmarkId::new("standard", iterations),
            &iterations,
            |b, &iterations| {
                let config = MCTSConfig::default().with_inline_teardown();
                b.iter(|| {
                    let mut search = MCTSSearch::<15>::new(config.clone()).unwrap();
                    let state = State::<15>::new();
                    black_box(search.explore(&state, iterations).unwrap().len())
                });
            },
        );
    }

    group.finish();
}

fn bench_search_rave(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_rave");
    group.sample_size(10);
    group.throughput(Throughput::Elements(5_000));

    group.bench_function("standard_5000", |b| {
        let config = MCTSConfig::default().with_rave(0.4).with_inline_teardown();
        b.iter(|| {
            let mut search = MCTSSearch::<15>::new(config.clone()).unwrap();
            let state = State::<15>::new();
            black_box(search.explore(&state, 5_000).unwrap().len())
        });
    });

    group.finish();
}

// =============================================================================
// Rollout Benchmarks
// =============================================================================

fn bench_rollouts(c: &mut Criterion) {
    let mut group = c.benchmark_group("rollouts");
    group.throughput(Throughput::Elements(1));

    group.bench_function("empty_15x15", |b| {
        let mut ctx = SearchContext::new(MCTSConfig::default());
        let mut tree = MCTSTree::new(State::<15>::new(), &mut ctx);
        let root = tree.root();
        b.iter(|| black_box(tree.rollout(root, &mut ctx)));
    });

    group.finish();
}

// =============================================================================
// State Benchmarks
// =============================================================================

fn bench_state(c: &mut Criterion) {
    let mut group = c.benchmark_group("state");

    let mut rng = GameRng::new(7);
    let mut moves = State::<15>::new().possible_actions();
    rng.shuffle(&mut moves);

    group.bench_function("action", |b| {
        b.iter(|| {
            let mut state = State::<15>::new();
            for &action in moves.iter().take(40) {
                state.action(black_box(action));
                if state.terminal() {
                    break;
                }
            }
            black_box(state.hash())
        });
    });

    group.bench_function("has_five", |b| {
        b.iter(|| {
            let mut found = 0u32;
            for word in 0u64..4096 {
                found += u32::from(has_five(black_box(word)));
            }
            found
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_search_iterations,
    bench_search_rave,
    bench_rollouts,
    bench_state,
);
criterion_main!(benches);
