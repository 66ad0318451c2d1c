//! The four canonical transitions: SelectHandSize, PlayCards, DrawCard, CallZapZap.
//!
//! Each function validates turn order and phase, mutates the `GameState` in
//! place, and returns an `EngineError` rather than silently skipping a turn
//! or returning a bare string, unlike the reference engine's ad hoc handling
//! of edge cases.

use rand::Rng;

use crate::card_analyzer;
use crate::error::{CallError, DrawError, EngineResult, PlayError, StructuralError, TransitionError};
use crate::game_state::{GameAction, GameState, LastAction};

/// Where a drawn card comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawSource {
    Deck,
    /// Pick a specific card out of the top region (any card there is
    /// pickable, not just the most recently played one).
    TopRegion(u8),
}

/// Outcome of a successful `CallZapZap`.
#[derive(Debug, Clone)]
pub struct ZapZapOutcome {
    pub caller: u8,
    pub counteracted: bool,
    pub scores_delta: Vec<(u8, u16)>,
}

fn require_active(state: &GameState, player: u8) -> EngineResult<()> {
    if player >= state.player_count {
        return Err(StructuralError::PlayerIndexOutOfRange(player).into());
    }
    if state.is_eliminated(player) {
        return Err(TransitionError::PlayerEliminated(player).into());
    }
    Ok(())
}

fn require_turn(state: &GameState, player: u8) -> EngineResult<()> {
    require_active(state, player)?;
    if state.current_action == GameAction::Finished {
        return Err(TransitionError::MatchFinished.into());
    }
    if state.current_turn != player {
        return Err(TransitionError::NotYourTurn(player).into());
    }
    Ok(())
}

fn require_phase(state: &GameState, expected: GameAction) -> EngineResult<()> {
    if state.current_action != expected {
        return Err(TransitionError::WrongPhase {
            expected,
            actual: state.current_action,
        }
        .into());
    }
    Ok(())
}

/// T1: SelectHandSize. Collects every active player's cards back into the
/// deck, shuffles, and deals fresh hands of the requested size. Golden Score
/// widens the allowed range to `[4, 10]`; otherwise `[4, 7]`.
pub fn select_hand_size<R: Rng>(
    state: &mut GameState,
    player: u8,
    requested_size: u8,
    starting_round: u16,
    rng: &mut R,
) -> EngineResult<()> {
    require_turn(state, player)?;
    require_phase(state, GameAction::SelectHandSize)?;

    let max = if state.is_golden_score { 10 } else { 7 };
    if requested_size < 4 || requested_size > max {
        return Err(crate::error::LifecycleError::InvalidHandSize(requested_size).into());
    }

    let active = state.active_players();
    let mut deck: Vec<u8> = (0..54).collect();
    use rand::seq::SliceRandom;
    deck.shuffle(rng);

    for i in 0..state.player_count {
        state.hands[i as usize].clear();
    }
    for &p in &active {
        for _ in 0..requested_size {
            if let Some(card) = deck.pop() {
                state.hands[p as usize].push(card);
            }
        }
    }

    let flipped = deck.pop();
    state.deck = deck;
    state.last_cards_played.clear();
    if let Some(card) = flipped {
        state.last_cards_played.push(card);
    }
    state.cards_played.clear();
    state.discard_pile.clear();
    state.current_turn = player;
    state.current_action = GameAction::Play;
    state.round_number = starting_round;

    tracing::info!(round = starting_round, hand_size = requested_size, "round dealt");
    Ok(())
}

/// T2: PlayCards. The played cards must all be in the acting player's hand
/// and form either a same-rank group or a sequence (a single card is always
/// valid). Moves the previous top-region contents into history.
pub fn play_cards(state: &mut GameState, player: u8, cards: &[u8]) -> EngineResult<()> {
    require_turn(state, player)?;
    require_phase(state, GameAction::Play)?;

    if cards.is_empty() {
        return Err(PlayError::EmptyPlay.into());
    }
    {
        let hand = state.get_hand(player);
        if !cards.iter().all(|c| hand.contains(c)) {
            return Err(PlayError::CardsNotInHand.into());
        }
    }
    if !card_analyzer::is_valid_play(cards) {
        return Err(PlayError::InvalidCombination(card_analyzer::classify_invalid_play(cards)).into());
    }

    state.track_cards_played(player, cards);
    state.get_hand_mut(player).retain(|id| !cards.contains(id));

    let is_first_play_of_round = state.cards_played.is_empty() && state.last_cards_played.is_empty();
    if !is_first_play_of_round {
        state.discard_pile.extend(state.last_cards_played.drain(..));
        state.last_cards_played.clear();
        state.last_cards_played.extend(state.cards_played.drain(..));
    }

    state.cards_played.clear();
    state.cards_played.extend_from_slice(cards);
    state.current_action = GameAction::Draw;

    tracing::debug!(player, cards = ?cards, "cards played");
    Ok(())
}

/// T3: DrawCard. Three-tier fallback when the deck is empty: reshuffle the
/// history pile into the deck, and if history was also empty, redirect the
/// draw to the top region (picking its single available card). Only errors
/// with `DeckEmpty` if deck, history, and top region are all exhausted.
pub fn draw_card<R: Rng>(state: &mut GameState, player: u8, source: DrawSource, rng: &mut R) -> EngineResult<u8> {
    require_turn(state, player)?;
    require_phase(state, GameAction::Draw)?;
    if state.get_hand(player).len() >= crate::game_state::MAX_HAND_SIZE {
        return Err(DrawError::HandFull.into());
    }

    let (drawn, from_top_region) = match source {
        DrawSource::TopRegion(card_id) => {
            let card = state
                .take_from_top_region(card_id)
                .ok_or(DrawError::CardNotInTopRegion(card_id))?;
            (card, true)
        }
        DrawSource::Deck => {
            if state.deck.is_empty() {
                if !state.discard_pile.is_empty() {
                    let moved = state.reshuffle_history_into_deck(rng);
                    tracing::info!(moved, "history reshuffled into deck");
                } else if !state.last_cards_played.is_empty() {
                    // Last resort: redirect to the top region's lone card.
                    let drawn = state.last_cards_played.pop().unwrap();
                    state.get_hand_mut(player).push(drawn);
                    state.track_card_taken(player, drawn);
                    state.advance_turn();
                    state.current_action = GameAction::Play;
                    state.cards_played.clear();
                    tracing::warn!("deck and history empty, drew from top region as last resort");
                    return Ok(drawn);
                } else {
                    return Err(DrawError::DeckEmpty.into());
                }
            }
            let card = state.deck.pop().ok_or(DrawError::DeckEmpty)?;
            (card, false)
        }
    };

    if from_top_region {
        state.track_card_taken(player, drawn);
    }
    state.get_hand_mut(player).push(drawn);
    state.advance_turn();
    state.current_action = GameAction::Play;
    state.cards_played.clear();

    tracing::debug!(player, card = drawn, from_top_region, "card drawn");
    Ok(drawn)
}

/// T4: CallZapZap. The caller must hold a hand with eligibility value <= 5.
/// `lowest` is the active player (caller included) with the minimum
/// eligibility value, ties broken toward the smaller index. If `lowest` is
/// not the caller, the call is counteracted: the caller is penalized
/// `score(caller) + 5 * N` (`N` = number of active players) and every active
/// player other than the caller and `lowest` scores their hand's value
/// (jokers = 25). If `lowest` is the caller (including a tie the caller's own
/// index wins), the caller scores 0 and everyone else scores their hand's
/// value.
pub fn call_zapzap(state: &mut GameState, caller: u8) -> EngineResult<ZapZapOutcome> {
    require_turn(state, caller)?;
    require_phase(state, GameAction::Play)?;

    let caller_hand = state.get_hand(caller).clone();
    let caller_eligibility = card_analyzer::calculate_hand_value(&caller_hand);
    if caller_eligibility > 5 {
        return Err(CallError::NotEligible(caller_eligibility).into());
    }

    let active = state.active_players();
    let mut eligibility = [0u16; crate::game_state::MAX_PLAYERS];
    for &p in &active {
        eligibility[p as usize] = card_analyzer::calculate_hand_value(state.get_hand(p));
    }

    // lowest := argmin_i eligibility[i] over all active players (caller
    // included), ties broken by the smaller index. `active` is already
    // ascending by index, so the first minimum encountered wins the tie.
    let lowest_index = active
        .iter()
        .copied()
        .min_by_key(|&p| eligibility[p as usize])
        .unwrap_or(caller);
    let counteracted = lowest_index != caller;

    let mut scores = [0u16; crate::game_state::MAX_PLAYERS];
    for &p in &active {
        scores[p as usize] = card_analyzer::calculate_hand_score(state.get_hand(p), false);
    }

    let mut deltas = Vec::with_capacity(active.len());
    if counteracted {
        let active_count = active.len() as u16;
        let penalty = scores[caller as usize] + 5 * active_count;
        state.add_score(caller, penalty);
        deltas.push((caller, penalty));

        for &p in &active {
            if p == caller || p == lowest_index {
                continue;
            }
            state.add_score(p, scores[p as usize]);
            deltas.push((p, scores[p as usize]));
        }
    } else {
        for &p in &active {
            if p != caller {
                state.add_score(p, scores[p as usize]);
                deltas.push((p, scores[p as usize]));
            }
        }
    }

    state.current_action = GameAction::Finished;
    state.last_action = LastAction {
        action_type: 3,
        player_index: caller,
        was_counteracted: counteracted,
        caller_hand_points: caller_eligibility.min(255) as u8,
    };

    tracing::info!(caller, counteracted, "zapzap called");
    Ok(ZapZapOutcome {
        caller,
        counteracted,
        scores_delta: deltas,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn fresh_state(players: u8) -> GameState {
        GameState::new(players)
    }

    #[test]
    fn select_hand_size_rejects_out_of_range() {
        let mut state = fresh_state(4);
        let mut rng = SmallRng::seed_from_u64(1);
        let err = select_hand_size(&mut state, 0, 20, 1, &mut rng).unwrap_err();
        assert!(matches!(err, crate::error::EngineError::Lifecycle(_)));
    }

    #[test]
    fn play_then_draw_cycle() {
        let mut state = fresh_state(2);
        let mut rng = SmallRng::seed_from_u64(42);
        select_hand_size(&mut state, 0, 4, 1, &mut rng).unwrap();

        let card = state.get_hand(0)[0];
        play_cards(&mut state, 0, &[card]).unwrap();
        assert_eq!(state.current_action, GameAction::Draw);

        let before = state.get_hand(0).len();
        draw_card(&mut state, 0, DrawSource::Deck, &mut rng).unwrap();
        assert_eq!(state.get_hand(0).len(), before + 1);
        assert_eq!(state.current_action, GameAction::Play);
    }

    #[test]
    fn zapzap_counteract_uses_active_player_count() {
        let mut state = fresh_state(3);
        // Ace, ace = eligibility 2 for the caller; an opponent at a strictly
        // lower eligibility (a single ace, 1) forces a counteract regardless
        // of index tie-break, since the caller (index 0) can never lose a tie.
        state.hands[0] = smallvec::smallvec![0, 13];
        state.hands[1] = smallvec::smallvec![26];
        state.hands[2] = smallvec::smallvec![9, 10, 11];
        state.current_turn = 0;
        state.current_action = GameAction::Play;

        let outcome = call_zapzap(&mut state, 0).unwrap();
        assert!(outcome.counteracted);
        // penalty = score(caller) + 5*3 = 2 + 15 = 17
        assert_eq!(state.get_score(0), 17);
    }

    #[test]
    fn zapzap_tie_favors_the_lower_index() {
        let mut state = fresh_state(3);
        // Caller (index 0) ties with player 1 at eligibility 2. Per the
        // index tie-break, the caller is `lowest`, so the call succeeds.
        state.hands[0] = smallvec::smallvec![0, 13];
        state.hands[1] = smallvec::smallvec![26, 39];
        state.hands[2] = smallvec::smallvec![9, 10, 11];
        state.current_turn = 0;
        state.current_action = GameAction::Play;

        let outcome = call_zapzap(&mut state, 0).unwrap();
        assert!(!outcome.counteracted);
        assert_eq!(state.get_score(0), 0);
    }

    #[test]
    fn zapzap_tie_counteracts_when_the_lower_index_is_not_the_caller() {
        let mut state = fresh_state(3);
        // Player 1 calls while tied with player 0 at eligibility 2. Player 0
        // holds the lower index, so player 0 is `lowest` and the call is
        // counteracted even though the caller's hand also qualifies.
        state.hands[0] = smallvec::smallvec![0, 13];
        state.hands[1] = smallvec::smallvec![26, 39];
        state.hands[2] = smallvec::smallvec![9, 10, 11];
        state.current_turn = 1;
        state.current_action = GameAction::Play;

        let outcome = call_zapzap(&mut state, 1).unwrap();
        assert!(outcome.counteracted);
    }

    #[test]
    fn draw_falls_back_to_top_region_when_deck_and_history_empty() {
        let mut state = fresh_state(2);
        state.hands[0] = smallvec::smallvec![0];
        state.last_cards_played = smallvec::smallvec![5];
        state.current_turn = 0;
        state.current_action = GameAction::Draw;

        let mut rng = SmallRng::seed_from_u64(7);
        let drawn = draw_card(&mut state, 0, DrawSource::Deck, &mut rng).unwrap();
        assert_eq!(drawn, 5);
        assert!(state.last_cards_played.is_empty());
    }
}
