//! EasyStrategy - near-random baseline opponent.

use super::BotStrategy;
use crate::card_analyzer;
use crate::game_state::GameState;
use smallvec::SmallVec;

/// Plays a uniformly random valid play, calls ZapZap whenever eligible, and
/// only takes from the top region when it strictly lowers eligibility points
/// versus a guaranteed deck draw's expectation.
pub struct EasyStrategy {
    rng_state: u64,
}

impl EasyStrategy {
    pub fn new() -> Self {
        EasyStrategy { rng_state: 0x9E3779B97F4A7C15 }
    }

    pub fn with_seed(seed: u64) -> Self {
        EasyStrategy { rng_state: seed.max(1) }
    }

    fn next_random(&mut self) -> u64 {
        let mut x = self.rng_state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.rng_state = x;
        x
    }

    fn random_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        (self.next_random() % len as u64) as usize
    }
}

impl Default for EasyStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl BotStrategy for EasyStrategy {
    fn select_hand_size(&mut self, _active_player_count: u8, is_golden_score: bool) -> u8 {
        let max = if is_golden_score { 10 } else { 7 };
        let span = max - 4 + 1;
        4 + (self.next_random() % span as u64) as u8
    }

    fn select_play(&mut self, hand: &[u8], _state: &GameState) -> Option<SmallVec<[u8; 8]>> {
        if hand.is_empty() {
            return None;
        }
        let plays = card_analyzer::find_all_valid_plays(hand);
        if plays.is_empty() {
            return None;
        }
        let idx = self.random_index(plays.len());
        Some(plays[idx].clone())
    }

    fn should_zapzap(&mut self, hand: &[u8], _state: &GameState) -> bool {
        card_analyzer::can_call_zapzap(hand)
    }

    fn select_draw_source(&mut self, hand: &[u8], top_region: &[u8], _state: &GameState) -> Option<u8> {
        let hand_value = card_analyzer::calculate_hand_value(hand) as i32;
        top_region
            .iter()
            .copied()
            .find(|&c| (card_analyzer::get_card_points(c) as i32) < hand_value.min(5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_calls_when_eligible() {
        let mut strategy = EasyStrategy::with_seed(1);
        let state = GameState::new(4);
        assert!(strategy.should_zapzap(&[52, 53], &state));
        assert!(!strategy.should_zapzap(&[0, 1, 2], &state));
    }

    #[test]
    fn select_play_returns_a_valid_play() {
        let mut strategy = EasyStrategy::with_seed(99);
        let state = GameState::new(4);
        let hand = vec![0, 13, 5];
        let play = strategy.select_play(&hand, &state).unwrap();
        assert!(card_analyzer::is_valid_play(&play));
    }
}
