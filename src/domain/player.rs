use core::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;

/// Стабильный идентификатор игрока (обычно имя модели агента).
/// Отображаемое имя живёт отдельно и для поиска не используется.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        PlayerId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        PlayerId(s.to_string())
    }
}

/// Статус места в контексте текущей раздачи / матча.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum SeatStatus {
    /// Игрок активен в текущей раздаче.
    Active,
    /// Игрок сфолдил и больше не участвует в банке.
    Folded,
    /// Игрок в олл-ине – не может больше делать ставки.
    AllIn,
    /// Игрок вылетел из матча (нулевой стек после раздачи).
    Eliminated,
}

/// Место за столом. Стек меняет только движок раздачи.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Seat {
    pub player_id: PlayerId,
    pub stack: Chips,
    pub status: SeatStatus,
}

impl Seat {
    pub fn new(player_id: PlayerId, stack: Chips) -> Self {
        Self {
            player_id,
            stack,
            status: SeatStatus::Active,
        }
    }

    /// Участвует в матче (не вылетел).
    pub fn is_seated(&self) -> bool {
        !matches!(self.status, SeatStatus::Eliminated)
    }

    /// Претендует на банк текущей раздачи.
    pub fn is_in_hand(&self) -> bool {
        matches!(self.status, SeatStatus::Active | SeatStatus::AllIn)
    }

    /// Может ещё делать ставки на этой улице.
    pub fn can_act(&self) -> bool {
        matches!(self.status, SeatStatus::Active)
    }
}
