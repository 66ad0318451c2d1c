//! ExternalLlmStrategy - treats an external model as a collaborator rather
//! than an in-process policy. The synchronous `BotStrategy` trait can't
//! express an out-of-process call, so this type is driven separately by the
//! Bot Driver: it returns a pending future per decision, bounded by a
//! timeout, and the driver falls back to the Hard strategy on timeout or
//! error. Purely in-process strategies never pay this cost.

use async_trait::async_trait;
use std::time::Duration;

use super::{BotStrategy, HardStrategy};
use crate::game_state::GameState;
use smallvec::SmallVec;

/// Implemented by whatever transport reaches the external model (HTTP, a
/// local subprocess, ...). Kept separate from `BotStrategy` since it is
/// async and fallible where the in-process strategies are neither.
#[async_trait]
pub trait ExternalDecisionProvider: Send + Sync {
    async fn select_hand_size(&self, active_player_count: u8, is_golden_score: bool) -> anyhow::Result<u8>;
    async fn select_play(&self, hand: &[u8], state: &GameState) -> anyhow::Result<Option<SmallVec<[u8; 8]>>>;
    async fn should_zapzap(&self, hand: &[u8], state: &GameState) -> anyhow::Result<bool>;
    async fn select_draw_source(
        &self,
        hand: &[u8],
        top_region: &[u8],
        state: &GameState,
    ) -> anyhow::Result<Option<u8>>;
}

/// Drives an `ExternalDecisionProvider` with a bounded timeout, falling back
/// to the Hard strategy on timeout or provider error.
pub struct ExternalLlmStrategy<P: ExternalDecisionProvider> {
    provider: P,
    timeout: Duration,
    fallback: HardStrategy,
}

impl<P: ExternalDecisionProvider> ExternalLlmStrategy<P> {
    pub fn new(provider: P, timeout: Duration) -> Self {
        ExternalLlmStrategy {
            provider,
            timeout,
            fallback: HardStrategy::new(),
        }
    }

    pub async fn select_hand_size(&mut self, active_player_count: u8, is_golden_score: bool) -> u8 {
        match tokio::time::timeout(self.timeout, self.provider.select_hand_size(active_player_count, is_golden_score))
            .await
        {
            Ok(Ok(size)) => size,
            _ => {
                tracing::warn!("external-llm timed out or errored on select_hand_size, falling back to hard");
                self.fallback.select_hand_size(active_player_count, is_golden_score)
            }
        }
    }

    pub async fn select_play(&mut self, hand: &[u8], state: &GameState) -> Option<SmallVec<[u8; 8]>> {
        match tokio::time::timeout(self.timeout, self.provider.select_play(hand, state)).await {
            Ok(Ok(play)) => play,
            _ => {
                tracing::warn!("external-llm timed out or errored on select_play, falling back to hard");
                self.fallback.select_play(hand, state)
            }
        }
    }

    pub async fn should_zapzap(&mut self, hand: &[u8], state: &GameState) -> bool {
        match tokio::time::timeout(self.timeout, self.provider.should_zapzap(hand, state)).await {
            Ok(Ok(v)) => v,
            _ => {
                tracing::warn!("external-llm timed out or errored on should_zapzap, falling back to hard");
                self.fallback.should_zapzap(hand, state)
            }
        }
    }

    pub async fn select_draw_source(&mut self, hand: &[u8], top_region: &[u8], state: &GameState) -> Option<u8> {
        match tokio::time::timeout(self.timeout, self.provider.select_draw_source(hand, top_region, state)).await {
            Ok(Ok(choice)) => choice,
            _ => {
                tracing::warn!("external-llm timed out or errored on select_draw_source, falling back to hard");
                self.fallback.select_draw_source(hand, top_region, state)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysFailsProvider;

    #[async_trait]
    impl ExternalDecisionProvider for AlwaysFailsProvider {
        async fn select_hand_size(&self, _active_player_count: u8, _is_golden_score: bool) -> anyhow::Result<u8> {
            anyhow::bail!("unreachable")
        }
        async fn select_play(&self, _hand: &[u8], _state: &GameState) -> anyhow::Result<Option<SmallVec<[u8; 8]>>> {
            anyhow::bail!("unreachable")
        }
        async fn should_zapzap(&self, _hand: &[u8], _state: &GameState) -> anyhow::Result<bool> {
            anyhow::bail!("unreachable")
        }
        async fn select_draw_source(
            &self,
            _hand: &[u8],
            _top_region: &[u8],
            _state: &GameState,
        ) -> anyhow::Result<Option<u8>> {
            anyhow::bail!("unreachable")
        }
    }

    #[tokio::test]
    async fn falls_back_to_hard_on_provider_error() {
        let mut strategy = ExternalLlmStrategy::new(AlwaysFailsProvider, Duration::from_millis(50));
        let state = GameState::new(4);
        assert!(!strategy.should_zapzap(&[10, 11], &state).await);
    }
}
