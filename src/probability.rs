//! Probability Tracker — per-bot, per-round observer of public actions.
//!
//! Generalizes the reference engine's scattered `CardTracker` bitmask and the
//! ad hoc opponent-analysis helpers sprinkled through the Thibot and Bandit
//! strategies into one append-only, recomputable model: two trackers fed the
//! same observations end up in identical states.

use crate::card_analyzer;
use crate::game_state::MAX_PLAYERS;

const TOTAL_CARDS: u16 = 54;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreatLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayStyle {
    /// Mostly plays singles, rarely touches combos.
    Cautious,
    /// Regularly plays multi-card combos.
    Aggressive,
    /// Few observations yet, can't characterize.
    Unknown,
}

/// Per-opponent behavioral aggregate, rebuilt purely from observed actions.
#[derive(Debug, Clone)]
pub struct OpponentModel {
    pub draws_from_top: u32,
    pub draws_from_deck: u32,
    pub total_plays: u32,
    pub multi_card_plays: u32,
    pub zap_called: u32,

    /// Cards this opponent is known to have picked from the top region and
    /// not yet played back.
    pub picked_cards_still_held: Vec<u8>,

    /// Histogram of ranks (0-12) picked from the top region, revealing rank
    /// preference.
    pub rank_preference: [u32; 13],

    pub hand_size: u8,
    pub min_estimated_value: u16,
    pub max_estimated_value: u16,
}

impl Default for OpponentModel {
    fn default() -> Self {
        OpponentModel {
            draws_from_top: 0,
            draws_from_deck: 0,
            total_plays: 0,
            multi_card_plays: 0,
            zap_called: 0,
            picked_cards_still_held: Vec::new(),
            rank_preference: [0; 13],
            hand_size: 0,
            min_estimated_value: 0,
            max_estimated_value: u16::MAX,
        }
    }
}

impl OpponentModel {
    pub fn threat_level(&self) -> ThreatLevel {
        match self.hand_size {
            0..=2 => ThreatLevel::High,
            3..=5 => ThreatLevel::Medium,
            _ => ThreatLevel::Low,
        }
    }

    pub fn play_style(&self) -> PlayStyle {
        if self.total_plays < 3 {
            return PlayStyle::Unknown;
        }
        if self.multi_card_plays * 2 >= self.total_plays {
            PlayStyle::Aggressive
        } else {
            PlayStyle::Cautious
        }
    }

    /// Combines hand size, estimated value envelope, and joker presence into
    /// a single [0,1] risk-of-imminent-zapzap estimate.
    pub fn zap_risk(&self) -> f32 {
        let size_factor: f32 = match self.hand_size {
            0 => 1.0,
            1 => 0.9,
            2 => 0.7,
            3 => 0.4,
            4 => 0.2,
            _ => 0.05,
        };
        let value_factor = if self.max_estimated_value <= 5 {
            1.0
        } else if self.max_estimated_value <= 10 {
            0.5
        } else {
            0.1
        };
        let joker_bonus = if self
            .picked_cards_still_held
            .iter()
            .any(|&c| card_analyzer::is_joker(c))
        {
            0.1
        } else {
            0.0
        };
        (size_factor * 0.6 + value_factor * 0.4 + joker_bonus).min(1.0)
    }

    fn record_pick_from_top(&mut self, card: u8) {
        self.draws_from_top += 1;
        self.picked_cards_still_held.push(card);
        if !card_analyzer::is_joker(card) {
            self.rank_preference[card_analyzer::get_rank(card) as usize] += 1;
        }
    }

    fn record_pick_from_deck(&mut self) {
        self.draws_from_deck += 1;
    }

    fn record_play(&mut self, cards: &[u8]) {
        self.total_plays += 1;
        if cards.len() > 1 {
            self.multi_card_plays += 1;
        }
        self.picked_cards_still_held.retain(|c| !cards.contains(c));

        // A large or high-value play can only lower our upper bound on what
        // remains in their hand.
        let played_value: u16 = cards.iter().map(|&c| card_analyzer::get_card_points(c) as u16).sum();
        if cards.len() >= 3 || played_value >= 15 {
            self.max_estimated_value = self.max_estimated_value.saturating_sub(played_value / 2);
        }
    }

    fn record_zapzap(&mut self) {
        self.zap_called += 1;
        self.max_estimated_value = self.max_estimated_value.min(5);
    }
}

/// Per-bot, per-round card-counting and opponent-behavior tracker.
#[derive(Debug, Clone)]
pub struct ProbabilityTracker {
    self_index: u8,

    /// Cards in my own hand.
    in_my_hand: Vec<u8>,
    /// Cards currently visible in the top region.
    in_top_region: Vec<u8>,
    /// Cards publicly played and no longer pickable (the reshuffle reservoir).
    history: Vec<u8>,

    opponents: [OpponentModel; MAX_PLAYERS],
}

impl ProbabilityTracker {
    pub fn new(self_index: u8, my_hand: &[u8]) -> Self {
        ProbabilityTracker {
            self_index,
            in_my_hand: my_hand.to_vec(),
            in_top_region: Vec::new(),
            history: Vec::new(),
            opponents: Default::default(),
        }
    }

    /// Resets per-round tracked sets at a round boundary while preserving
    /// opponent behavioral aggregates across rounds.
    pub fn reset_for_round(&mut self, my_hand: &[u8]) {
        self.in_my_hand = my_hand.to_vec();
        self.in_top_region.clear();
        self.history.clear();
        for model in &mut self.opponents {
            model.picked_cards_still_held.clear();
        }
    }

    pub fn observe_hand_size(&mut self, player: u8, size: u8) {
        if player != self.self_index && (player as usize) < MAX_PLAYERS {
            self.opponents[player as usize].hand_size = size;
        }
    }

    pub fn observe_play(&mut self, player: u8, cards: &[u8]) {
        // Whatever was in the top region moves to history; the new play
        // becomes the top region.
        self.history.append(&mut self.in_top_region);
        self.in_top_region = cards.to_vec();

        if player == self.self_index {
            self.in_my_hand.retain(|c| !cards.contains(c));
        } else if (player as usize) < MAX_PLAYERS {
            self.opponents[player as usize].record_play(cards);
        }
    }

    pub fn observe_draw_from_deck(&mut self, player: u8) {
        if player != self.self_index && (player as usize) < MAX_PLAYERS {
            self.opponents[player as usize].record_pick_from_deck();
        }
    }

    pub fn observe_draw_from_top(&mut self, player: u8, card: u8) {
        self.in_top_region.retain(|&c| c != card);
        if player == self.self_index {
            self.in_my_hand.push(card);
        } else if (player as usize) < MAX_PLAYERS {
            self.opponents[player as usize].record_pick_from_top(card);
        }
    }

    pub fn observe_zapzap(&mut self, caller: u8) {
        if caller != self.self_index && (caller as usize) < MAX_PLAYERS {
            self.opponents[caller as usize].record_zapzap();
        }
    }

    pub fn observe_reshuffle(&mut self) {
        self.history.clear();
    }

    fn known_count(&self) -> u16 {
        (self.in_my_hand.len() + self.in_top_region.len() + self.history.len()) as u16
    }

    fn is_known(&self, card: u8) -> bool {
        self.in_my_hand.contains(&card) || self.in_top_region.contains(&card) || self.history.contains(&card)
            || self
                .opponents
                .iter()
                .any(|o| o.picked_cards_still_held.contains(&card))
    }

    /// Probability that card `c` currently sits in the deck.
    pub fn probability_in_deck(&self, card: u8, deck_size: u16) -> f32 {
        if self.is_known(card) {
            return 0.0;
        }
        let mut known = self.known_count();
        for o in &self.opponents {
            known += o.picked_cards_still_held.len() as u16;
        }
        let unknown = TOTAL_CARDS.saturating_sub(known).max(1);
        deck_size as f32 / unknown as f32
    }

    /// Probability that opponent `j` holds a specific unseen card.
    pub fn probability_opponent_holds(&self, opponent: u8, card: u8) -> f32 {
        if (opponent as usize) >= MAX_PLAYERS {
            return 0.0;
        }
        let model = &self.opponents[opponent as usize];
        if model.picked_cards_still_held.contains(&card) {
            return 0.8;
        }
        if self.is_known(card) {
            return 0.0;
        }
        let mut known = self.known_count();
        for o in &self.opponents {
            known += o.picked_cards_still_held.len() as u16;
        }
        let unknown = TOTAL_CARDS.saturating_sub(known).max(1);
        model.hand_size as f32 / unknown as f32
    }

    pub fn opponent(&self, player: u8) -> Option<&OpponentModel> {
        self.opponents.get(player as usize)
    }

    pub fn min_opponent_hand_size(&self, active_players: &[u8]) -> u8 {
        active_players
            .iter()
            .filter(|&&p| p != self.self_index)
            .map(|&p| self.opponents[p as usize].hand_size)
            .filter(|&s| s > 0)
            .min()
            .unwrap_or(u8::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_cards_have_zero_deck_probability() {
        let tracker = ProbabilityTracker::new(0, &[0, 1, 2]);
        assert_eq!(tracker.probability_in_deck(0, 30), 0.0);
    }

    #[test]
    fn picked_and_held_card_has_high_opponent_probability() {
        let mut tracker = ProbabilityTracker::new(0, &[0]);
        tracker.observe_hand_size(1, 5);
        tracker.observe_draw_from_top(1, 20);
        assert_eq!(tracker.probability_opponent_holds(1, 20), 0.8);
    }

    #[test]
    fn zapzap_caps_estimated_value() {
        let mut tracker = ProbabilityTracker::new(0, &[]);
        tracker.observe_zapzap(1);
        assert!(tracker.opponent(1).unwrap().max_estimated_value <= 5);
    }
}
