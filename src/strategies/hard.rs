//! HardStrategy - optimizes for lowest hand value and round-banded ZapZap risk.

use super::BotStrategy;
use crate::card_analyzer;
use crate::game_state::GameState;
use smallvec::SmallVec;

/// Ranks enumerated plays by `(-remainingHandValue + 0.5*playSize)`, raises
/// its ZapZap threshold as the round number climbs, and takes from the top
/// region when a value function (combos created + low-point bonus + set
/// bonus) clears a fixed threshold.
pub struct HardStrategy {
    rng_state: u64,
}

impl HardStrategy {
    pub fn new() -> Self {
        HardStrategy { rng_state: 12345 }
    }

    pub fn with_seed(seed: u64) -> Self {
        HardStrategy { rng_state: seed.max(1) }
    }

    fn next_random(&mut self) -> u64 {
        let mut x = self.rng_state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.rng_state = x;
        x
    }

    fn random_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        (self.next_random() % max as u64) as u32
    }

    /// Value function for taking `card_id` from the top region: combo bonus
    /// + preference for low-point cards + set-completion bonus.
    fn evaluate_card_value(&self, card_id: u8, hand: &[u8]) -> i32 {
        let mut test_hand: SmallVec<[u8; 12]> = hand.iter().copied().collect();
        test_hand.push(card_id);

        let original_plays = card_analyzer::find_all_valid_plays(hand);
        let new_plays = card_analyzer::find_all_valid_plays(&test_hand);

        let original_multi = original_plays.iter().filter(|p| p.len() > 1).count();
        let new_multi = new_plays
            .iter()
            .filter(|p| p.len() > 1 && p.contains(&card_id))
            .count();

        let combination_bonus = (new_multi as i32 - original_multi as i32) * 10;

        let card_points = card_analyzer::get_card_points(card_id) as i32;
        let low_value_bonus = 10 - card_points;

        let rank = card_analyzer::get_rank(card_id);
        let same_rank_count = hand
            .iter()
            .filter(|&&id| !card_analyzer::is_joker(id) && card_analyzer::get_rank(id) == rank)
            .count();
        let set_bonus = same_rank_count as i32 * 5;

        combination_bonus + low_value_bonus + set_bonus
    }
}

impl Default for HardStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl BotStrategy for HardStrategy {
    fn select_hand_size(&mut self, _active_player_count: u8, is_golden_score: bool) -> u8 {
        if is_golden_score {
            4 + (self.random_range(3) as u8) // [4,6]
        } else {
            4 + (self.random_range(2) as u8) // [4,5]
        }
    }

    fn select_play(&mut self, hand: &[u8], _state: &GameState) -> Option<SmallVec<[u8; 8]>> {
        if hand.is_empty() {
            return None;
        }

        let valid_plays = card_analyzer::find_all_valid_plays(hand);
        if valid_plays.is_empty() {
            return None;
        }

        let mut best_play: Option<SmallVec<[u8; 8]>> = None;
        let mut best_score = f32::MIN;

        for play in valid_plays {
            let remaining: SmallVec<[u8; 10]> = hand.iter().filter(|id| !play.contains(id)).copied().collect();
            let remaining_value = card_analyzer::calculate_hand_value(&remaining) as f32;
            let play_size = play.len() as f32;

            let score = -remaining_value + 0.5 * play_size;
            if score > best_score {
                best_score = score;
                best_play = Some(play);
            }
        }

        best_play
    }

    fn should_zapzap(&mut self, hand: &[u8], state: &GameState) -> bool {
        let hand_value = card_analyzer::calculate_hand_value(hand);
        if hand_value > 5 {
            return false;
        }
        if hand_value <= 2 {
            return true;
        }

        match state.round_number {
            0..=2 => hand_value <= 2,
            3..=4 => hand_value <= 3,
            _ => hand_value <= 4,
        }
    }

    fn select_draw_source(&mut self, hand: &[u8], top_region: &[u8], _state: &GameState) -> Option<u8> {
        top_region
            .iter()
            .copied()
            .map(|c| (c, self.evaluate_card_value(c, hand)))
            .filter(|&(_, v)| v > 5)
            .max_by_key(|&(_, v)| v)
            .map(|(c, _)| c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_play_prefers_pair_over_single() {
        let mut strategy = HardStrategy::new();
        let state = GameState::new(4);
        let hand = vec![0, 13, 5, 18]; // A-spades, A-hearts, 6-spades, 6-hearts
        let play = strategy.select_play(&hand, &state).unwrap();
        assert!(play.len() >= 1);
    }

    #[test]
    fn zapzap_threshold_loosens_with_round_number() {
        let mut strategy = HardStrategy::new();
        let mut state = GameState::new(4);
        state.round_number = 5;
        assert!(strategy.should_zapzap(&[0, 1, 2, 52], &state)); // value 4, late round
    }

    #[test]
    fn ignores_top_region_without_meaningful_improvement() {
        let mut strategy = HardStrategy::new();
        let state = GameState::new(4);
        assert_eq!(strategy.select_draw_source(&[0, 1], &[], &state), None);
    }
}
