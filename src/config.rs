//! Engine-level configuration: elimination threshold, hand-size ranges, and
//! RNG seeding policy. Mirrors the shape of `training::TrainingConfig` (plain
//! `serde` struct, `Default` impl, loadable from JSON) but covers the match
//! rules rather than the learner.

use serde::{Deserialize, Serialize};

/// How a batch run or a single match seeds its RNG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeedPolicy {
    /// Every match/round draws from OS entropy; not reproducible.
    Entropy,
    /// Derived deterministically from a fixed base seed, reproducible across runs.
    Fixed(u64),
}

impl Default for SeedPolicy {
    fn default() -> Self {
        SeedPolicy::Entropy
    }
}

/// Match-rule configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Score strictly above this eliminates a player between rounds.
    pub elimination_threshold: u16,
    /// Legal hand-size range outside Golden Score, inclusive.
    pub normal_hand_size_range: (u8, u8),
    /// Legal hand-size range once Golden Score begins, inclusive.
    pub golden_hand_size_range: (u8, u8),
    /// ZapZap eligibility ceiling (hand value, joker = 0).
    pub zapzap_eligibility_max: u16,
    /// Flat per-active-player multiplier applied to a counteracted caller's penalty.
    pub counteract_penalty_per_player: u16,
    pub seed_policy: SeedPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            elimination_threshold: 100,
            normal_hand_size_range: (4, 7),
            golden_hand_size_range: (4, 10),
            zapzap_eligibility_max: 5,
            counteract_penalty_per_player: 5,
            seed_policy: SeedPolicy::Entropy,
        }
    }
}

impl EngineConfig {
    /// Loads a config from a JSON string, failing fast on malformed input
    /// rather than falling back to defaults silently.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn hand_size_range(&self, is_golden_score: bool) -> (u8, u8) {
        if is_golden_score {
            self.golden_hand_size_range
        } else {
            self.normal_hand_size_range
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_engine_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.elimination_threshold, 100);
        assert_eq!(config.hand_size_range(false), (4, 7));
        assert_eq!(config.hand_size_range(true), (4, 10));
    }

    #[test]
    fn round_trips_through_json() {
        let config = EngineConfig::default();
        let json = config.to_json().unwrap();
        let parsed = EngineConfig::from_json(&json).unwrap();
        assert_eq!(parsed.elimination_threshold, config.elimination_threshold);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(EngineConfig::from_json("{not json").is_err());
    }
}
