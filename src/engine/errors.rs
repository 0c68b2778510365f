use thiserror::Error;

use crate::arena::GameError;
use crate::domain::{Chips, PlayerId};
use crate::eval::EvalError;

/// Ошибки движка покера.
///
/// Тексты уходят агенту как объяснение отказа, поэтому они на английском
/// и подсказывают, что делать дальше.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("Player {0} is not seated at this table.")]
    PlayerNotAtTable(PlayerId),

    #[error("Not enough players with chips to deal a hand.")]
    NotEnoughPlayers,

    #[error("No hand is in progress.")]
    NoActiveHand,

    #[error("It is not {0}'s turn to act.")]
    NotPlayersTurn(PlayerId),

    #[error("Player {0} has folded or is all-in and cannot act.")]
    CannotAct(PlayerId),

    #[error("Cannot check -- there is a bet of {current_bet} to match. Call, raise, or fold.")]
    CannotCheck { current_bet: Chips },

    #[error("Nothing to call -- use check instead.")]
    NothingToCall,

    #[error("Cannot bet -- there is already a bet of {current_bet}. Use call or raise_to.")]
    BetAlreadyOpen { current_bet: Chips },

    #[error("Amount must be positive.")]
    InvalidAmount,

    #[error("No bet to raise -- use bet instead.")]
    NoBetToRaise,

    #[error("Raise must be more than the current bet of {current_bet}.")]
    RaiseNotAboveCurrent { current_bet: Chips },

    #[error("Minimum raise is to {min_raise}. Raise more or go all-in.")]
    RaiseTooSmall { min_raise: Chips },

    #[error("The deck ran out of cards.")]
    DeckExhausted,

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error("internal engine error: {0}")]
    Internal(&'static str),
}

impl From<EngineError> for GameError {
    fn from(err: EngineError) -> Self {
        GameError::Rules(err.to_string())
    }
}
