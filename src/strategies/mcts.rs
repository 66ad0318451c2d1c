//! MctsStrategy - Monte Carlo rollout search over the public state, used
//! optionally for PlayCards selection. Unknown hands are filled with
//! uniform-random legal actions; rollouts are scored by the acting player's
//! final rank (lower hand value among active players is better).

use super::BotStrategy;
use crate::card_analyzer;
use crate::game_state::GameState;
use smallvec::SmallVec;

pub struct MctsStrategy {
    rng_state: u64,
    rollouts: u32,
}

impl MctsStrategy {
    pub fn new() -> Self {
        MctsStrategy {
            rng_state: 0xD1B54A32D192ED03,
            rollouts: 64,
        }
    }

    pub fn with_rollouts(seed: u64, rollouts: u32) -> Self {
        MctsStrategy {
            rng_state: seed.max(1),
            rollouts: rollouts.max(1),
        }
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
            0
        } else {
            (self.next_random() % len as u64) as usize
        }
    }

    /// Plays out a single random continuation: repeatedly play a uniformly
    /// random legal play from the hand that results from the candidate
    /// first play, then score by remaining hand value (lower is better).
    fn rollout(&mut self, hand_after_play: &[u8], opponents_min_size: usize) -> f32 {
        let mut hand: SmallVec<[u8; 10]> = hand_after_play.iter().copied().collect();
        let mut depth = 0;

        while !hand.is_empty() && depth < 6 {
            let plays = card_analyzer::find_all_valid_plays(&hand);
            if plays.is_empty() {
                break;
            }
            let idx = self.random_index(plays.len());
            let play = &plays[idx];
            hand.retain(|c| !play.contains(c));
            depth += 1;
        }

        let final_value = card_analyzer::calculate_hand_value(&hand) as f32;
        // Reward finishing before opponents catch up in hand size.
        let pace_bonus = if hand.len() < opponents_min_size { 2.0 } else { 0.0 };
        -final_value + pace_bonus
    }
}

impl Default for MctsStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl BotStrategy for MctsStrategy {
    fn select_hand_size(&mut self, _active_player_count: u8, is_golden_score: bool) -> u8 {
        if is_golden_score { 6 } else { 5 }
    }

    fn select_play(&mut self, hand: &[u8], state: &GameState) -> Option<SmallVec<[u8; 8]>> {
        if hand.is_empty() {
            return None;
        }
        let plays = card_analyzer::find_all_valid_plays(hand);
        if plays.is_empty() {
            return None;
        }

        let opponents_min_size = (0..state.player_count)
            .filter(|&p| p != state.current_turn && !state.is_eliminated(p))
            .map(|p| state.get_hand(p).len())
            .min()
            .unwrap_or(usize::MAX);

        let mut best_play: Option<SmallVec<[u8; 8]>> = None;
        let mut best_score = f32::MIN;

        for play in plays {
            let remaining: SmallVec<[u8; 10]> = hand.iter().filter(|c| !play.contains(c)).copied().collect();
            let mut total = 0.0f32;
            for _ in 0..self.rollouts {
                total += self.rollout(&remaining, opponents_min_size);
            }
            let avg = total / self.rollouts as f32;
            if avg > best_score {
                best_score = avg;
                best_play = Some(play);
            }
        }

        best_play
    }

    fn should_zapzap(&mut self, hand: &[u8], _state: &GameState) -> bool {
        card_analyzer::can_call_zapzap(hand)
    }

    fn select_draw_source(&mut self, hand: &[u8], top_region: &[u8], _state: &GameState) -> Option<u8> {
        let hand_value = card_analyzer::calculate_hand_value(hand) as i32;
        top_region
            .iter()
            .copied()
            .filter(|&c| (card_analyzer::get_card_points(c) as i32) < hand_value)
            .min_by_key(|&c| card_analyzer::get_card_points(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_play_returns_valid_play() {
        let mut strategy = MctsStrategy::with_rollouts(1, 8);
        let state = GameState::new(4);
        let hand = vec![0, 13, 5];
        let play = strategy.select_play(&hand, &state).unwrap();
        assert!(card_analyzer::is_valid_play(&play));
    }
}
