//! ZapZap engine: card rules, state machine, round/match lifecycle, bot
//! strategies, and a batch simulator for strategy comparison and learner
//! training. HTTP routing, auth, persistence, push delivery, and the
//! LLM-backed strategy's transport are external collaborators; this crate
//! specifies them as the `Store`, `EventSink`, and `ExternalDecisionProvider`
//! traits rather than implementing them.

#![deny(clippy::all)]

pub mod api;
pub mod bot_driver;
pub mod card_analyzer;
pub mod config;
pub mod error;
pub mod fast_dqn;
pub mod feature_extractor;
pub mod game_state;
pub mod lifecycle;
pub mod probability;
pub mod simulator;
pub mod state_machine;
pub mod strategies;
pub mod training;

pub use api::{create_match, apply_transition, get_public_view, EventSink, MatchSnapshot, Observation, PublicView, Store, Transition};
pub use error::{EngineError, EngineResult};
pub use game_state::GameState;
pub use simulator::{run_batch, BatchConfig, BatchResult, StrategyKind};

/// Initializes a process-wide `tracing` subscriber from `RUST_LOG` (or a
/// sensible default). Library code never calls this itself; only binaries
/// and test harnesses that want formatted output on stderr should.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_match_starts_at_select_hand_size() {
        let snapshot = create_match("p1", 4, 0, 1);
        assert_eq!(snapshot.state.current_action, game_state::GameAction::SelectHandSize);
    }
}
