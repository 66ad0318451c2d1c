//! Unified error taxonomy for the engine's public API.
//!
//! Every fallible transition returns an `EngineError`. Sub-enums group errors
//! by the concern that raises them, mirroring the per-use-case error enums in
//! the source project's application layer (`DrawCardError`, `CallZapZapError`,
//! `SelectHandSizeError`) but collapsed into one taxonomy so callers outside
//! this crate only need to match on a single type.

use thiserror::Error;

/// Errors that indicate the caller built or passed a malformed state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StructuralError {
    #[error("player index {0} is out of range")]
    PlayerIndexOutOfRange(u8),
    #[error("player count {0} is out of the supported range")]
    InvalidPlayerCount(u8),
    #[error("card id {0} is not a valid card")]
    InvalidCardId(u8),
}

/// Errors raised when a transition is attempted out of turn or phase.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("it is not player {0}'s turn")]
    NotYourTurn(u8),
    #[error("expected action {expected:?}, got a request for {actual:?}")]
    WrongPhase {
        expected: crate::game_state::GameAction,
        actual: crate::game_state::GameAction,
    },
    #[error("player {0} is eliminated and cannot act")]
    PlayerEliminated(u8),
    #[error("the match has already finished")]
    MatchFinished,
}

/// Errors specific to `PlayCards`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlayError {
    #[error("no cards were selected")]
    EmptyPlay,
    #[error("player does not hold all of the selected cards")]
    CardsNotInHand,
    #[error("the selected cards are neither a same-rank group nor a sequence: {0}")]
    InvalidCombination(crate::card_analyzer::PlayReason),
}

/// Errors specific to `DrawCard`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DrawError {
    #[error("no card is available to draw from deck, history, or top region")]
    DeckEmpty,
    #[error("the requested card id is not present in the top region")]
    CardNotInTopRegion(u8),
    #[error("player's hand is already at the maximum size")]
    HandFull,
    #[error("a top-region draw was requested without naming which card to take")]
    NoCardSelected,
}

/// Errors specific to `CallZapZap`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CallError {
    #[error("hand value {0} exceeds the ZapZap eligibility threshold")]
    NotEligible(u16),
}

/// Errors raised by round/match lifecycle operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("requested hand size {0} is outside the allowed range")]
    InvalidHandSize(u8),
    #[error("round cannot start: fewer than two active players remain")]
    NotEnoughActivePlayers,
    #[error("the match is already over")]
    MatchAlreadyOver,
}

/// Top-level error type returned by the engine's public API.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Structural(#[from] StructuralError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Play(#[from] PlayError),
    #[error(transparent)]
    Draw(#[from] DrawError),
    #[error(transparent)]
    Call(#[from] CallError),
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

pub type EngineResult<T> = Result<T, EngineError>;
