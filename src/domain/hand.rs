use core::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::player::PlayerId;
use crate::eval::HandRank;

/// Улица раздачи.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Street {
    /// Следующая улица и сколько карт борда на ней открывается.
    pub fn next(self) -> Option<(Street, usize)> {
        match self {
            Street::Preflop => Some((Street::Flop, 3)),
            Street::Flop => Some((Street::Turn, 1)),
            Street::Turn => Some((Street::River, 1)),
            Street::River => Some((Street::Showdown, 0)),
            Street::Showdown => None,
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Street::Preflop => "Pre-flop",
            Street::Flop => "Flop",
            Street::Turn => "Turn",
            Street::River => "River",
            Street::Showdown => "Showdown",
        };
        f.write_str(name)
    }
}

/// Результат конкретного игрока в раздаче.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerHandResult {
    pub player_id: PlayerId,
    /// Итоговая рука (если дошёл до шоудауна).
    pub rank: Option<HandRank>,
    /// Сколько фишек внёс в банк за раздачу.
    pub contributed: Chips,
    /// Сколько фишек получил из банка.
    pub won: Chips,
    /// Является ли игрок победителем (включая сплит).
    pub is_winner: bool,
}

/// Краткое описание завершённой раздачи.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandSummary {
    pub hand_number: u32,
    pub street_reached: Street,
    pub board: Vec<Card>,
    pub total_pot: Chips,
    /// Дошло ли до вскрытия (иначе все, кроме одного, сфолдили).
    pub showdown: bool,
    pub results: Vec<PlayerHandResult>,
    /// Кто вылетел по итогам раздачи.
    pub eliminated: Vec<PlayerId>,
}

impl HandSummary {
    pub fn winners(&self) -> impl Iterator<Item = &PlayerId> {
        self.results
            .iter()
            .filter(|r| r.is_winner)
            .map(|r| &r.player_id)
    }

    pub fn total_paid_out(&self) -> Chips {
        self.results.iter().map(|r| r.won).sum()
    }
}
