//! Batch Simulator - runs many independent matches end to end with no
//! network, persistence, or event sink: just `GameState` + strategies +
//! state machine, looped until a winner falls out. Matches are independent
//! and farmed out across threads with rayon.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::time::Instant;

use crate::bot_driver::{self, TurnOutcome};
use crate::feature_extractor::FeatureExtractor;
use crate::game_state::{GameAction, GameState, MAX_PLAYERS};
use crate::lifecycle;
use crate::probability::ProbabilityTracker;
use crate::state_machine::DrawSource;
use crate::strategies::{BanditStrategy, BotStrategy, EasyStrategy, HardStrategy, MctsStrategy, MediumStrategy, ThibotStrategy};

/// Folds one driven turn into every seat's tracker. Each `ProbabilityTracker`
/// is fed every public action regardless of actor, the same as a real bot
/// would observe the table; only its own hand observations are privileged.
fn record_outcome(trackers: &mut [ProbabilityTracker], player: u8, outcome: &TurnOutcome) {
    for tracker in trackers.iter_mut() {
        match outcome {
            TurnOutcome::HandSizeSelected(size) => tracker.observe_hand_size(player, *size),
            TurnOutcome::Played(cards) => tracker.observe_play(player, cards),
            TurnOutcome::ZapZapCalled(result) => tracker.observe_zapzap(result.caller),
            TurnOutcome::Drew { source: DrawSource::Deck, .. } => tracker.observe_draw_from_deck(player),
            TurnOutcome::Drew { source: DrawSource::TopRegion(_), card } => tracker.observe_draw_from_top(player, *card),
        }
    }
}

/// Picks a concrete strategy for a simulated player. Kept separate from the
/// `BotStrategy` trait object itself so a batch config can be described with
/// `serde`-friendly plain data and turned into boxed strategies per match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum StrategyKind {
    Easy,
    Medium,
    Hard,
    Thibot,
    Bandit,
    Mcts,
}

impl StrategyKind {
    fn build(self, player_index: u8, seed: u64) -> Box<dyn BotStrategy + Send> {
        match self {
            StrategyKind::Easy => Box::new(EasyStrategy::with_seed(seed)),
            StrategyKind::Medium => Box::new(MediumStrategy),
            StrategyKind::Hard => Box::new(HardStrategy::with_seed(seed)),
            StrategyKind::Thibot => Box::new(ThibotStrategy::with_seed(seed)),
            StrategyKind::Bandit => Box::new(BanditStrategy::with_seed(player_index, seed)),
            StrategyKind::Mcts => Box::new(MctsStrategy::with_rollouts(seed, 32)),
        }
    }
}

/// Configuration for a single `RunBatch` call.
pub struct BatchConfig {
    pub seed: u64,
    pub strategies: Vec<StrategyKind>,
    pub matches: u32,
}

/// Aggregate result of a batch run.
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub wins_by_index: Vec<u32>,
    pub avg_rounds: f64,
    pub total_ms: f64,
}

const MAX_ROUNDS_PER_MATCH: u16 = 200;
const MAX_TURNS_PER_ROUND: u32 = 2000;

/// Runs one complete match to a winner, driving every bot turn through
/// `bot_driver` and every round boundary through `lifecycle`.
fn run_single_match(strategy_kinds: &[StrategyKind], seed: u64) -> (u8, u16) {
    let player_count = strategy_kinds.len() as u8;
    let mut state = GameState::new(player_count);
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut strategies: Vec<Box<dyn BotStrategy + Send>> = strategy_kinds
        .iter()
        .enumerate()
        .map(|(i, kind)| kind.build(i as u8, seed.wrapping_add(i as u64 + 1)))
        .collect();

    state.current_action = GameAction::SelectHandSize;

    let mut trackers: Vec<ProbabilityTracker> = (0..player_count)
        .map(|p| ProbabilityTracker::new(p, state.get_hand(p)))
        .collect();

    let mut rounds = 0u16;
    while !lifecycle::is_match_over(&state) && rounds < MAX_ROUNDS_PER_MATCH {
        let mut turns = 0u32;
        while state.current_action != GameAction::Finished && turns < MAX_TURNS_PER_ROUND {
            let player = state.current_turn;
            if state.is_eliminated(player) {
                state.advance_turn();
                turns += 1;
                continue;
            }
            let strategy = strategies[player as usize].as_mut();
            match bot_driver::drive_turn(strategy, &mut state, player, &mut rng) {
                Ok(outcome) => {
                    let is_zapzap = matches!(outcome, TurnOutcome::ZapZapCalled(_));
                    record_outcome(&mut trackers, player, &outcome);
                    if is_zapzap {
                        break;
                    }
                }
                Err(err) => {
                    tracing::warn!(?err, player, "bot turn failed mid-round, ending round");
                    break;
                }
            }
            turns += 1;
        }

        rounds += 1;
        if lifecycle::advance_to_next_round(&mut state).is_err() {
            break;
        }
        for (p, tracker) in trackers.iter_mut().enumerate() {
            tracker.reset_for_round(state.get_hand(p as u8));
        }
    }

    (lifecycle::determine_winner(&state), rounds)
}

/// `RunBatch`: plays `config.matches` independent matches, one per
/// deterministic sub-seed derived from `config.seed`, in parallel.
pub fn run_batch(config: &BatchConfig) -> BatchResult {
    let started = Instant::now();
    let player_count = config.strategies.len();

    let results: Vec<(u8, u16)> = (0..config.matches)
        .into_par_iter()
        .map(|i| {
            let match_seed = config.seed.wrapping_add((i as u64).wrapping_mul(0x9E3779B97F4A7C15));
            run_single_match(&config.strategies, match_seed)
        })
        .collect();

    let mut wins_by_index = vec![0u32; player_count.max(MAX_PLAYERS)];
    let mut round_total: u64 = 0;
    for (winner, rounds) in &results {
        wins_by_index[*winner as usize] += 1;
        round_total += *rounds as u64;
    }
    wins_by_index.truncate(player_count);

    let avg_rounds = if results.is_empty() {
        0.0
    } else {
        round_total as f64 / results.len() as f64
    };

    BatchResult {
        wins_by_index,
        avg_rounds,
        total_ms: started.elapsed().as_secs_f64() * 1000.0,
    }
}

/// Diagnostic endpoint: times `n` feature extractions against a fixed state.
pub fn benchmark_feature_extraction(n: u32) -> f64 {
    let state = GameState::new(4);
    let started = Instant::now();
    for _ in 0..n {
        let _ = std::hint::black_box(FeatureExtractor::extract(&state, 0));
    }
    started.elapsed().as_secs_f64() * 1000.0
}

/// Diagnostic endpoint: times `n` bandit inference calls against a fixed state.
pub fn benchmark_dqn_inference(n: u32) -> f64 {
    let mut bandit = BanditStrategy::with_seed(0, 1);
    let state = GameState::new(4);
    let hand: Vec<u8> = (0..5).collect();
    let started = Instant::now();
    for _ in 0..n {
        let _ = std::hint::black_box(bandit.select_play(&hand, &state));
    }
    started.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_batch_is_deterministic_for_a_fixed_seed() {
        let config = BatchConfig {
            seed: 42,
            strategies: vec![StrategyKind::Hard, StrategyKind::Easy, StrategyKind::Medium],
            matches: 8,
        };
        let a = run_batch(&config);
        let b = run_batch(&config);
        assert_eq!(a.wins_by_index, b.wins_by_index);
        assert!(a.avg_rounds > 0.0);
    }

    #[test]
    fn every_match_produces_a_winner_among_entrants() {
        let config = BatchConfig {
            seed: 7,
            strategies: vec![StrategyKind::Hard, StrategyKind::Thibot],
            matches: 4,
        };
        let result = run_batch(&config);
        let total: u32 = result.wins_by_index.iter().sum();
        assert_eq!(total, 4);
    }
}
