//! BanditStrategy - four contextual bandits (one per decision type) over a
//! fixed feature vector, backed by the fast dueling-DQN inference path.
//!
//! Action spaces:
//! - `HandSize`: 7 actions, hand size 4..10.
//! - `ZapZap`: 2 actions, {no, yes}.
//! - `PlayType`: 5 actions, {optimal, single_high, multi_high, avoid_joker, use_joker_combo}.
//! - `DrawSource`: 2 actions, {Deck, TopRegion}.
//!
//! Two hard rules act as safety nets and override the bandit outright: in
//! Golden Score, never play a joker; if any opponent holds <= 2 cards,
//! prefer joker-inclusive combos.

use super::BotStrategy;
use crate::card_analyzer;
use crate::fast_dqn::{DecisionType, FastDQN};
use crate::feature_extractor::{FeatureExtractor, Features};
use crate::game_state::GameState;
use smallvec::SmallVec;

/// `PlayType` bandit actions, named as in the decision contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayType {
    Optimal,
    SingleHigh,
    MultiHigh,
    AvoidJoker,
    UseJokerCombo,
}

impl PlayType {
    fn from_action(action: usize) -> Self {
        match action {
            0 => PlayType::Optimal,
            1 => PlayType::SingleHigh,
            2 => PlayType::MultiHigh,
            3 => PlayType::AvoidJoker,
            _ => PlayType::UseJokerCombo,
        }
    }
}

pub struct BanditStrategy {
    player_index: u8,
    dqn: FastDQN,
    epsilon: f32,
    features_buf: Features,
}

impl BanditStrategy {
    pub fn new(player_index: u8) -> Self {
        BanditStrategy {
            player_index,
            dqn: FastDQN::new(),
            epsilon: 0.1,
            features_buf: [0.0; crate::feature_extractor::FEATURE_DIM],
        }
    }

    pub fn with_seed(player_index: u8, seed: u64) -> Self {
        BanditStrategy {
            player_index,
            dqn: FastDQN::with_seed(seed),
            epsilon: 0.1,
            features_buf: [0.0; crate::feature_extractor::FEATURE_DIM],
        }
    }

    pub fn with_epsilon(player_index: u8, epsilon: f32) -> Self {
        let mut s = Self::new(player_index);
        s.epsilon = epsilon.clamp(0.0, 1.0);
        s
    }

    pub fn set_epsilon(&mut self, epsilon: f32) {
        self.epsilon = epsilon.clamp(0.0, 1.0);
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    pub fn load_weights(&mut self, weights: &[f32]) {
        self.dqn.set_weights_flat(weights);
    }

    fn refresh_features(&mut self, state: &GameState) {
        self.features_buf = FeatureExtractor::extract(state, self.player_index);
    }

    fn any_opponent_low_on_cards(&self, state: &GameState) -> bool {
        (0..state.player_count).any(|p| {
            p != self.player_index
                && !state.is_eliminated(p)
                && state.get_hand(p).len() <= 2
        })
    }

    fn play_optimal(hand: &[u8]) -> Option<SmallVec<[u8; 8]>> {
        card_analyzer::find_all_valid_plays(hand).into_iter().max_by_key(|play| {
            let remaining: SmallVec<[u8; 10]> = hand.iter().filter(|c| !play.contains(c)).copied().collect();
            -(card_analyzer::calculate_hand_value(&remaining) as i32)
        })
    }

    fn play_single_high(hand: &[u8]) -> Option<SmallVec<[u8; 8]>> {
        hand.iter()
            .filter(|&&c| !card_analyzer::is_joker(c))
            .max_by_key(|&&c| card_analyzer::get_card_points(c))
            .or_else(|| hand.first())
            .map(|&c| SmallVec::from_slice(&[c]))
    }

    fn play_multi_high(hand: &[u8]) -> Option<SmallVec<[u8; 8]>> {
        card_analyzer::find_all_valid_plays(hand)
            .into_iter()
            .filter(|p| p.len() > 1)
            .max_by_key(|p| p.iter().map(|&c| card_analyzer::get_card_points(c) as u32).sum::<u32>())
            .or_else(|| Self::play_single_high(hand))
    }

    fn play_avoid_joker(hand: &[u8]) -> Option<SmallVec<[u8; 8]>> {
        card_analyzer::find_all_valid_plays(hand)
            .into_iter()
            .filter(|p| !p.iter().any(|&c| card_analyzer::is_joker(c)))
            .max_by_key(|p| p.iter().map(|&c| card_analyzer::get_card_points(c) as u32).sum::<u32>())
            .or_else(|| Self::play_optimal(hand))
    }

    fn play_use_joker_combo(hand: &[u8]) -> Option<SmallVec<[u8; 8]>> {
        card_analyzer::find_all_valid_plays(hand)
            .into_iter()
            .filter(|p| p.len() > 1 && p.iter().any(|&c| card_analyzer::is_joker(c)))
            .max_by_key(|p| p.len())
            .or_else(|| Self::play_optimal(hand))
    }

    fn action_to_play(play_type: PlayType, hand: &[u8]) -> Option<SmallVec<[u8; 8]>> {
        match play_type {
            PlayType::Optimal => Self::play_optimal(hand),
            PlayType::SingleHigh => Self::play_single_high(hand),
            PlayType::MultiHigh => Self::play_multi_high(hand),
            PlayType::AvoidJoker => Self::play_avoid_joker(hand),
            PlayType::UseJokerCombo => Self::play_use_joker_combo(hand),
        }
    }
}

impl BotStrategy for BanditStrategy {
    fn select_hand_size(&mut self, _active_player_count: u8, is_golden_score: bool) -> u8 {
        let state = GameState {
            is_golden_score,
            ..GameState::new(4)
        };
        self.refresh_features(&state);
        let action = self.dqn.select_action(&self.features_buf, DecisionType::HandSize, self.epsilon);
        4 + action as u8
    }

    fn select_play(&mut self, hand: &[u8], state: &GameState) -> Option<SmallVec<[u8; 8]>> {
        if hand.is_empty() {
            return None;
        }
        self.refresh_features(state);
        let action = self.dqn.select_action(&self.features_buf, DecisionType::PlayType, self.epsilon);
        let mut play_type = PlayType::from_action(action);

        // Hard rule: in Golden Score, never play a joker.
        if state.is_golden_score {
            if play_type == PlayType::UseJokerCombo {
                play_type = PlayType::Optimal;
            }
            if let Some(play) = Self::action_to_play(play_type, hand) {
                if !play.iter().any(|&c| card_analyzer::is_joker(c)) {
                    return Some(play);
                }
                return Self::play_avoid_joker(hand).or_else(|| Self::play_optimal(hand));
            }
        }

        // Hard rule: if any opponent is close to zapzap, prefer joker combos.
        if self.any_opponent_low_on_cards(state) {
            if let Some(play) = Self::play_use_joker_combo(hand) {
                return Some(play);
            }
        }

        Self::action_to_play(play_type, hand).or_else(|| hand.first().map(|&c| SmallVec::from_slice(&[c])))
    }

    fn should_zapzap(&mut self, hand: &[u8], state: &GameState) -> bool {
        if !card_analyzer::can_call_zapzap(hand) {
            return false;
        }
        self.refresh_features(state);
        self.dqn.select_action(&self.features_buf, DecisionType::ZapZap, self.epsilon) == 1
    }

    fn select_draw_source(&mut self, hand: &[u8], top_region: &[u8], state: &GameState) -> Option<u8> {
        if top_region.is_empty() {
            return None;
        }
        self.refresh_features(state);
        let action = self.dqn.select_action(&self.features_buf, DecisionType::DrawSource, self.epsilon);
        if action == 1 {
            // Picking from the top region: take whichever card most improves
            // eligibility points, a reasonable default "pick" policy.
            let hand_value = card_analyzer::calculate_hand_value(hand) as i32;
            top_region
                .iter()
                .copied()
                .min_by_key(|&c| card_analyzer::get_card_points(c))
                .filter(|&c| (card_analyzer::get_card_points(c) as i32) <= hand_value.max(5))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn golden_score_never_plays_a_joker() {
        let mut bandit = BanditStrategy::with_seed(0, 7);
        bandit.set_epsilon(0.0);
        let mut state = GameState::new(4);
        state.is_golden_score = true;
        let hand = vec![52, 0, 1];
        let play = bandit.select_play(&hand, &state).unwrap();
        assert!(!play.iter().any(|&c| card_analyzer::is_joker(c)));
    }

    #[test]
    fn zapzap_not_considered_below_eligibility() {
        let mut bandit = BanditStrategy::new(0);
        let state = GameState::new(4);
        assert!(!bandit.should_zapzap(&[9, 10, 11], &state));
    }
}
