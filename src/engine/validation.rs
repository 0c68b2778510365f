use crate::domain::chips::Chips;
use crate::domain::player::Seat;
use crate::domain::SeatIndex;
use crate::engine::actions::PokerAction;
use crate::engine::betting::BettingState;
use crate::engine::errors::EngineError;

/// Проверка, может ли игрок выполнить это действие при текущем состоянии ставок.
/// Очерёдность хода проверяет движок, здесь только правила ставок.
pub fn validate_action(
    seat_idx: SeatIndex,
    seat: &Seat,
    action: &PokerAction,
    betting: &BettingState,
) -> Result<(), EngineError> {
    if !seat.can_act() {
        return Err(EngineError::CannotAct(seat.player_id.clone()));
    }

    let stack = seat.stack;
    let round_bet = betting.round_bet(seat_idx);
    let to_call = betting.to_call(seat_idx);

    match action {
        PokerAction::Fold => Ok(()),

        PokerAction::Check => {
            if to_call.is_zero() {
                Ok(())
            } else {
                Err(EngineError::CannotCheck {
                    current_bet: betting.current_bet,
                })
            }
        }

        // Call больше стека это олл-ин колл, движок обрежет его сам.
        PokerAction::Call => {
            if to_call.is_zero() {
                Err(EngineError::NothingToCall)
            } else {
                Ok(())
            }
        }

        PokerAction::Bet(amount) => {
            if !betting.current_bet.is_zero() {
                return Err(EngineError::BetAlreadyOpen {
                    current_bet: betting.current_bet,
                });
            }
            if amount.is_zero() {
                return Err(EngineError::InvalidAmount);
            }
            Ok(())
        }

        PokerAction::RaiseTo(total) => {
            if betting.current_bet.is_zero() {
                // Когда нет ставки – это bet, а не raise
                return Err(EngineError::NoBetToRaise);
            }
            if *total <= betting.current_bet {
                return Err(EngineError::RaiseNotAboveCurrent {
                    current_bet: betting.current_bet,
                });
            }

            // Меньше минимального можно только олл-ином на весь стек.
            let additional = Chips(total.0 - round_bet.0);
            if *total < betting.min_raise && additional < stack {
                return Err(EngineError::RaiseTooSmall {
                    min_raise: betting.min_raise,
                });
            }

            Ok(())
        }
    }
}
