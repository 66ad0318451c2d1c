//! BotDriver - given it is a bot's turn, asks that bot's strategy for a
//! decision appropriate to the current phase and submits it through the
//! state machine. Strategies never touch `GameState` mutably themselves;
//! the driver is the only thing that calls into `state_machine`.

use rand::Rng;
use smallvec::SmallVec;

use crate::card_analyzer;
use crate::error::EngineResult;
use crate::game_state::{GameAction, GameState};
use crate::state_machine::{self, DrawSource, ZapZapOutcome};
use crate::strategies::BotStrategy;

/// Outcome of one driven bot turn, detailed enough for a `ProbabilityTracker`
/// to fold the turn into its observations without re-deriving it from state.
pub enum TurnOutcome {
    HandSizeSelected(u8),
    Played(SmallVec<[u8; 8]>),
    ZapZapCalled(ZapZapOutcome),
    Drew { source: DrawSource, card: u8 },
}

/// Drives a single bot decision for `player` given the phase `state` is
/// currently in. Callers own the turn loop; this only resolves one step.
pub fn drive_turn<R: Rng>(
    strategy: &mut dyn BotStrategy,
    state: &mut GameState,
    player: u8,
    rng: &mut R,
) -> EngineResult<TurnOutcome> {
    match state.current_action {
        GameAction::SelectHandSize => {
            let active = state.active_player_count();
            let requested = strategy.select_hand_size(active, state.is_golden_score);
            state_machine::select_hand_size(state, player, requested, state.round_number, rng)?;
            Ok(TurnOutcome::HandSizeSelected(requested))
        }
        GameAction::Play => {
            let hand = state.get_hand(player).clone();
            if card_analyzer::can_call_zapzap(&hand) && strategy.should_zapzap(&hand, state) {
                let outcome = state_machine::call_zapzap(state, player)?;
                return Ok(TurnOutcome::ZapZapCalled(outcome));
            }

            let play = strategy
                .select_play(&hand, state)
                .unwrap_or_else(|| smallvec::smallvec![hand[0]]);
            state_machine::play_cards(state, player, &play)?;
            Ok(TurnOutcome::Played(play))
        }
        GameAction::Draw => {
            let hand = state.get_hand(player).clone();
            let top_region = state.last_cards_played.clone();
            let source = match strategy.select_draw_source(&hand, &top_region, state) {
                Some(card_id) => DrawSource::TopRegion(card_id),
                None => DrawSource::Deck,
            };
            let card = state_machine::draw_card(state, player, source, rng)?;
            Ok(TurnOutcome::Drew { source, card })
        }
        GameAction::Finished => Err(crate::error::TransitionError::MatchFinished.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::HardStrategy;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn drives_full_round_to_completion() {
        let mut state = GameState::new(2);
        let mut rng = SmallRng::seed_from_u64(9);
        let mut strategies: [HardStrategy; 2] = [HardStrategy::with_seed(1), HardStrategy::with_seed(2)];

        let mut guard = 0;
        while state.current_action != GameAction::Finished && guard < 500 {
            let player = state.current_turn;
            let outcome = drive_turn(&mut strategies[player as usize], &mut state, player, &mut rng);
            assert!(outcome.is_ok(), "turn failed: {:?}", outcome.err());
            guard += 1;
        }
        assert!(guard < 500, "round did not terminate");
    }
}
