//! Criterion harness for the two diagnostic endpoints the simulator exposes:
//! feature extraction and bandit inference. Each is a single end-to-end call
//! per iteration rather than the batched `benchmark_*` helpers, so Criterion's
//! own statistics (not our own `Instant` timing) drive the reported numbers.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use zapzap_engine::feature_extractor::FeatureExtractor;
use zapzap_engine::game_state::GameState;
use zapzap_engine::strategies::{BanditStrategy, BotStrategy};

fn feature_extraction_benchmark(c: &mut Criterion) {
    let state = GameState::new(4);
    c.bench_function("feature_extraction", |b| {
        b.iter(|| black_box(FeatureExtractor::extract(black_box(&state), black_box(0))))
    });
}

fn dqn_inference_benchmark(c: &mut Criterion) {
    let mut bandit = BanditStrategy::with_seed(0, 1);
    let state = GameState::new(4);
    let hand: Vec<u8> = (0..5).collect();
    c.bench_function("dqn_inference", |b| {
        b.iter(|| black_box(bandit.select_play(black_box(&hand), black_box(&state))))
    });
}

fn batch_match_benchmark(c: &mut Criterion) {
    use zapzap_engine::{run_batch, BatchConfig, StrategyKind};

    c.bench_function("batch_16_matches", |b| {
        b.iter(|| {
            run_batch(black_box(&BatchConfig {
                seed: 1,
                strategies: vec![StrategyKind::Hard, StrategyKind::Easy, StrategyKind::Medium, StrategyKind::Thibot],
                matches: 16,
            }))
        })
    });
}

criterion_group!(benches, feature_extraction_benchmark, dqn_inference_benchmark, batch_match_benchmark);
criterion_main!(benches);
