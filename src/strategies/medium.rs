//! MediumStrategy - face-card-hungry intermediate opponent.

use super::BotStrategy;
use crate::card_analyzer;
use crate::game_state::GameState;
use smallvec::SmallVec;

const FACE_RANKS: [u8; 3] = [10, 11, 12]; // J, Q, K

fn face_card_count(play: &[u8]) -> usize {
    play.iter()
        .filter(|&&c| !card_analyzer::is_joker(c) && FACE_RANKS.contains(&card_analyzer::get_rank(c)))
        .count()
}

/// Plays the enumerated play with the most face cards (ties broken by more
/// cards played), calls ZapZap at a moderate threshold, and takes from the
/// top region whenever doing so would unlock a new multi-card play.
pub struct MediumStrategy;

impl MediumStrategy {
    pub fn new() -> Self {
        MediumStrategy
    }
}

impl Default for MediumStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl BotStrategy for MediumStrategy {
    fn select_hand_size(&mut self, _active_player_count: u8, is_golden_score: bool) -> u8 {
        if is_golden_score { 6 } else { 5 }
    }

    fn select_play(&mut self, hand: &[u8], _state: &GameState) -> Option<SmallVec<[u8; 8]>> {
        if hand.is_empty() {
            return None;
        }
        let plays = card_analyzer::find_all_valid_plays(hand);
        plays.into_iter().max_by_key(|p| (face_card_count(p), p.len()))
    }

    fn should_zapzap(&mut self, hand: &[u8], _state: &GameState) -> bool {
        card_analyzer::calculate_hand_value(hand) <= 3
    }

    fn select_draw_source(&mut self, hand: &[u8], top_region: &[u8], _state: &GameState) -> Option<u8> {
        let baseline_multi = card_analyzer::find_all_valid_plays(hand)
            .iter()
            .filter(|p| p.len() > 1)
            .count();

        top_region.iter().copied().find(|&card| {
            let mut test_hand: SmallVec<[u8; 12]> = hand.iter().copied().collect();
            test_hand.push(card);
            let new_multi = card_analyzer::find_all_valid_plays(&test_hand)
                .iter()
                .filter(|p| p.len() > 1 && p.contains(&card))
                .count();
            new_multi > baseline_multi
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_play_with_most_face_cards() {
        let mut strategy = MediumStrategy::new();
        let state = GameState::new(4);
        // J,Q pair of same rank is not possible (different ranks), so use a
        // same-rank jack pair plus a low single to confirm face cards win out.
        let hand = vec![10, 23, 0]; // J-spades, J-hearts, A-spades
        let play = strategy.select_play(&hand, &state).unwrap();
        assert!(play.contains(&10) && play.contains(&23));
    }

    #[test]
    fn zapzap_threshold_is_three() {
        let mut strategy = MediumStrategy::new();
        let state = GameState::new(4);
        assert!(strategy.should_zapzap(&[0, 1], &state)); // value 3
        assert!(!strategy.should_zapzap(&[0, 1, 2], &state)); // value 6
    }
}
