//! Bot strategies: {Easy, Medium, Hard, Thibot, Bandit, MCTS, External-LLM}.
//!
//! Every strategy exposes the same four decisions over public state and its
//! own hand. Implementations own whatever internal RNG or model state they
//! need, so all trait methods take `&mut self`.

mod bandit;
mod easy;
mod external_llm;
mod hard;
mod mcts;
mod medium;
mod thibot;

pub use bandit::BanditStrategy;
pub use easy::EasyStrategy;
pub use external_llm::{ExternalDecisionProvider, ExternalLlmStrategy};
pub use hard::HardStrategy;
pub use mcts::MctsStrategy;
pub use medium::MediumStrategy;
pub use thibot::ThibotStrategy;

use crate::game_state::GameState;
use smallvec::SmallVec;

/// Polymorphic decision policy. Consumes public state + own hand; returns
/// one action per call.
pub trait BotStrategy {
    /// Select hand size for the upcoming round, in the legal range.
    fn select_hand_size(&mut self, active_player_count: u8, is_golden_score: bool) -> u8;

    /// Select cards to play from hand. `None` means no legal/desired play
    /// (callers should fall back to the lowest single card).
    fn select_play(&mut self, hand: &[u8], state: &GameState) -> Option<SmallVec<[u8; 8]>>;

    /// Decide whether to call ZapZap. Only ever consulted when eligibility
    /// already holds (hand value <= 5).
    fn should_zapzap(&mut self, hand: &[u8], state: &GameState) -> bool;

    /// Select a draw source. `Some(card_id)` picks that specific card out of
    /// the top region; `None` draws from the deck.
    fn select_draw_source(&mut self, hand: &[u8], top_region: &[u8], state: &GameState) -> Option<u8>;
}

#[cfg(test)]
pub(crate) fn sample_state(players: u8) -> GameState {
    GameState::new(players)
}
