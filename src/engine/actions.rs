use core::fmt;

use serde::{Deserialize, Serialize};

use crate::arena::ActionChoice;
use crate::domain::Chips;

/// Действие игрока, как его понимает движок.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PokerAction {
    Fold,
    Check,
    Call,
    /// Bet на улице, где ещё нет ставки.
    Bet(Chips),
    /// Поднять текущую ставку до указанной суммы за улицу.
    RaiseTo(Chips),
}

impl PokerAction {
    pub const FOLD: &'static str = "fold";
    pub const CHECK: &'static str = "check";
    pub const CALL: &'static str = "call";
    pub const BET: &'static str = "bet";
    pub const RAISE_TO: &'static str = "raise_to";

    /// Каноническое имя действия для лога.
    pub fn name(&self) -> &'static str {
        match self {
            PokerAction::Fold => Self::FOLD,
            PokerAction::Check => Self::CHECK,
            PokerAction::Call => Self::CALL,
            PokerAction::Bet(_) => Self::BET,
            PokerAction::RaiseTo(_) => Self::RAISE_TO,
        }
    }

    /// Разобрать выбор агента. Ошибка: текст для агента.
    pub fn from_choice(choice: &ActionChoice) -> Result<Self, String> {
        match choice.name.trim().to_ascii_lowercase().as_str() {
            Self::FOLD => Ok(PokerAction::Fold),
            Self::CHECK => Ok(PokerAction::Check),
            Self::CALL => Ok(PokerAction::Call),
            Self::BET => choice.int_arg("amount").map(|a| PokerAction::Bet(Chips(a))),
            // `raise_bet` это старое имя, агенты его ещё присылают.
            Self::RAISE_TO | "raise" | "raise_bet" => choice
                .int_arg("total")
                .or_else(|e| choice.int_arg("total_amount").map_err(|_| e))
                .map(|t| PokerAction::RaiseTo(Chips(t))),
            other => Err(format!(
                "Unknown action '{other}'. Choose one of: fold, check, call, bet, raise_to."
            )),
        }
    }
}

/// Что фактически произошло после применения действия (суммы уже обрезаны по стеку).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppliedAction {
    pub action: PokerAction,
    /// Сколько фишек ушло из стека в банк.
    pub paid: Chips,
    pub all_in: bool,
}

impl fmt::Display for AppliedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.action {
            PokerAction::Fold => f.write_str("Folded")?,
            PokerAction::Check => f.write_str("Checked")?,
            PokerAction::Call => write!(f, "Called {} chips", self.paid)?,
            PokerAction::Bet(amount) => write!(f, "Bet {amount} chips")?,
            PokerAction::RaiseTo(total) => write!(f, "Raised to {total} chips total")?,
        }
        if self.all_in {
            f.write_str(" (all-in)")?;
        }
        f.write_str(".")
    }
}
