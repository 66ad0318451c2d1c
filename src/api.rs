//! Core API: `CreateMatch`, `ApplyTransition`, `GetPublicView`. HTTP routing,
//! auth, persistence and push delivery are external collaborators,
//! represented here only as the `Store` and `EventSink` traits a real server
//! would implement; nothing in this module performs I/O.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::game_state::{GameAction, GameState};
use crate::state_machine::{self, DrawSource};

/// Durable representation of one match, as written to a `Store`. Carries the
/// match's base seed and a monotonic cursor so `ApplyTransition` can derive a
/// fresh, reproducible RNG per call without persisting RNG internals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub party_id: String,
    pub seed: u64,
    pub rng_cursor: u64,
    pub state: GameState,
}

/// What a viewer is allowed to see: their own hand in full, everyone else's
/// hand size only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicView {
    pub party_id: String,
    pub viewer_id: u8,
    pub own_hand: Vec<u8>,
    pub opponent_hand_sizes: Vec<u8>,
    pub scores: Vec<u16>,
    pub round_number: u16,
    pub current_turn: u8,
    pub current_action: GameAction,
    pub is_golden_score: bool,
    pub top_region: Vec<u8>,
    pub eliminated: Vec<bool>,
}

/// Where a draw should come from, as requested over the wire. `TopRegion`
/// with no `opt_card_id` is rejected; the caller must name the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawRequest {
    Deck,
    TopRegion,
}

/// A tagged transition request, one variant per canonical state-machine
/// operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Transition {
    SelectHandSize { h: u8 },
    Play { cards: Vec<u8> },
    Draw { source: DrawRequest, opt_card_id: Option<u8> },
    Call,
    NextRound,
}

/// Handed to the `EventSink` (and, in a full server, to the per-bot
/// `ProbabilityTracker`) after a successful transition. Never includes
/// unrevealed cards: a deck draw is visible only to the drawer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub party_id: String,
    pub round_number: u16,
    pub actor: u8,
    pub transition_kind: &'static str,
}

/// Reads and writes match snapshots. The Store write is the durability
/// boundary: a transition has not "happened" until it succeeds.
pub trait Store {
    fn load(&self, party_id: &str) -> EngineResult<Option<MatchSnapshot>>;
    fn save(&self, snapshot: &MatchSnapshot) -> EngineResult<()>;
}

/// Notified only after a successful Store write. Within a match, delivery
/// order mirrors the commit order of transitions; no cross-match ordering is
/// promised.
pub trait EventSink {
    fn notify(&self, observation: &Observation);
}

/// `CreateMatch(partyId, players, ownerId, seed) -> MatchSnapshot`. `ownerId`
/// is not consulted by the engine itself (authorization is the HTTP layer's
/// concern) and is accepted only to match the documented signature.
pub fn create_match(party_id: &str, player_count: u8, _owner_id: u8, seed: u64) -> MatchSnapshot {
    let mut state = GameState::new(player_count);
    state.current_action = GameAction::SelectHandSize;
    MatchSnapshot {
        party_id: party_id.to_string(),
        seed,
        rng_cursor: 0,
        state,
    }
}

fn derive_rng(snapshot: &mut MatchSnapshot) -> SmallRng {
    let rng = SmallRng::seed_from_u64(snapshot.seed ^ snapshot.rng_cursor.wrapping_mul(0x9E3779B97F4A7C15));
    snapshot.rng_cursor = snapshot.rng_cursor.wrapping_add(1);
    rng
}

fn transition_kind(transition: &Transition) -> &'static str {
    match transition {
        Transition::SelectHandSize { .. } => "select_hand_size",
        Transition::Play { .. } => "play",
        Transition::Draw { .. } => "draw",
        Transition::Call => "call",
        Transition::NextRound => "next_round",
    }
}

/// `ApplyTransition(partyId, actorId, transition) -> (newSnapshot, observation) | error`.
/// Mutates `snapshot` in place only on success; a returned error leaves it
/// untouched, preserving the "transitions are total" invariant.
pub fn apply_transition(
    snapshot: &mut MatchSnapshot,
    actor_id: u8,
    transition: Transition,
) -> EngineResult<Observation> {
    let kind = transition_kind(&transition);
    let round_number = snapshot.state.round_number;

    match transition {
        Transition::SelectHandSize { h } => {
            let mut rng = derive_rng(snapshot);
            state_machine::select_hand_size(&mut snapshot.state, actor_id, h, round_number, &mut rng)?;
        }
        Transition::Play { cards } => {
            state_machine::play_cards(&mut snapshot.state, actor_id, &cards)?;
        }
        Transition::Draw { source, opt_card_id } => {
            let mut rng = derive_rng(snapshot);
            let draw_source = match source {
                DrawRequest::Deck => DrawSource::Deck,
                DrawRequest::TopRegion => {
                    let card_id = opt_card_id.ok_or(crate::error::DrawError::NoCardSelected)?;
                    DrawSource::TopRegion(card_id)
                }
            };
            state_machine::draw_card(&mut snapshot.state, actor_id, draw_source, &mut rng)?;
        }
        Transition::Call => {
            state_machine::call_zapzap(&mut snapshot.state, actor_id)?;
        }
        Transition::NextRound => {
            crate::lifecycle::advance_to_next_round(&mut snapshot.state)?;
        }
    }

    tracing::info!(party_id = %snapshot.party_id, actor = actor_id, kind, "transition applied");
    Ok(Observation {
        party_id: snapshot.party_id.clone(),
        round_number: snapshot.state.round_number,
        actor: actor_id,
        transition_kind: kind,
    })
}

/// `GetPublicView(partyId, viewerId) -> redacted snapshot`.
pub fn get_public_view(snapshot: &MatchSnapshot, viewer_id: u8) -> PublicView {
    let state = &snapshot.state;
    let opponent_hand_sizes = (0..state.player_count)
        .map(|p| if p == viewer_id { 0 } else { state.get_hand(p).len() as u8 })
        .collect();
    let eliminated = (0..state.player_count).map(|p| state.is_eliminated(p)).collect();

    PublicView {
        party_id: snapshot.party_id.clone(),
        viewer_id,
        own_hand: state.get_hand(viewer_id).to_vec(),
        opponent_hand_sizes,
        scores: state.scores[..state.player_count as usize].to_vec(),
        round_number: state.round_number,
        current_turn: state.current_turn,
        current_action: state.current_action,
        is_golden_score: state.is_golden_score,
        top_region: state.last_cards_played.to_vec(),
        eliminated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_view_hides_opponent_hands() {
        let snapshot = create_match("party-1", 3, 0, 42);
        let view = get_public_view(&snapshot, 0);
        assert_eq!(view.opponent_hand_sizes.len(), 3);
        assert_eq!(view.opponent_hand_sizes[0], 0);
    }

    #[test]
    fn apply_transition_leaves_snapshot_untouched_on_error() {
        let mut snapshot = create_match("party-2", 2, 0, 7);
        let before_cursor = snapshot.rng_cursor;
        let err = apply_transition(&mut snapshot, 0, Transition::Play { cards: vec![0] }).unwrap_err();
        assert!(matches!(err, crate::error::EngineError::Transition(_)));
        assert_eq!(snapshot.rng_cursor, before_cursor);
    }

    #[test]
    fn full_round_via_transitions() {
        let mut snapshot = create_match("party-3", 2, 0, 99);
        apply_transition(&mut snapshot, 0, Transition::SelectHandSize { h: 4 }).unwrap();
        assert_eq!(snapshot.state.current_action, GameAction::Play);

        let card = snapshot.state.get_hand(0)[0];
        apply_transition(&mut snapshot, 0, Transition::Play { cards: vec![card] }).unwrap();
        assert_eq!(snapshot.state.current_action, GameAction::Draw);

        apply_transition(&mut snapshot, 0, Transition::Draw { source: DrawRequest::Deck, opt_card_id: None }).unwrap();
        assert_eq!(snapshot.state.current_action, GameAction::Play);
    }
}
