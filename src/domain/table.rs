use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::player::{PlayerId, Seat};

/// Индекс места за столом (0..seats.len()-1).
pub type SeatIndex = usize;

/// Стейки стола (SB/BB).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableStakes {
    pub small_blind: Chips,
    pub big_blind: Chips,
}

impl TableStakes {
    pub fn new(sb: Chips, bb: Chips) -> Self {
        Self {
            small_blind: sb,
            big_blind: bb,
        }
    }
}

/// Параметры покерного матча.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PokerConfig {
    pub starting_chips: Chips,
    pub stakes: TableStakes,
    /// Страховочный лимит на число раздач в матче.
    pub max_hands: u32,
    /// Seed колоды; `None`: системный RNG.
    pub seed: Option<u64>,
}

impl Default for PokerConfig {
    fn default() -> Self {
        Self {
            starting_chips: Chips(1000),
            stakes: TableStakes::new(Chips(10), Chips(20)),
            max_hands: 250,
            seed: None,
        }
    }
}

/// Состояние стола, которое живёт между раздачами: места, стеки, кнопка.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Table {
    pub stakes: TableStakes,

    /// Места в порядке рассадки. Вылетевшие остаются на месте со статусом Eliminated.
    pub seats: Vec<Seat>,

    /// Место дилерской кнопки в следующей/текущей раздаче.
    pub dealer_button: SeatIndex,

    /// Сколько раздач уже начато.
    pub hands_played: u32,
}

impl Table {
    /// Посадить игроков по порядку, всем одинаковый стартовый стек.
    pub fn new(stakes: TableStakes, players: &[PlayerId], starting_chips: Chips) -> Self {
        let seats = players
            .iter()
            .map(|id| Seat::new(id.clone(), starting_chips))
            .collect();
        Self {
            stakes,
            seats,
            dealer_button: 0,
            hands_played: 0,
        }
    }

    pub fn seat_of(&self, player: &PlayerId) -> Option<SeatIndex> {
        self.seats.iter().position(|s| &s.player_id == player)
    }

    /// Сколько мест ещё в матче.
    pub fn seated_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_seated()).count()
    }

    /// Сумма всех стеков (без банка текущей раздачи).
    pub fn total_stacks(&self) -> Chips {
        self.seats.iter().map(|s| s.stack).sum()
    }
}
