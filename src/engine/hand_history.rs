use core::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::card::{format_cards, Card};
use crate::domain::chips::Chips;
use crate::domain::hand::Street;
use crate::domain::PlayerId;
use crate::engine::actions::AppliedAction;
use crate::eval::HandRank;

/// Тип события в раздаче. Карманные карты сюда попадают только на вскрытии,
/// поэтому историю можно показывать всем.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum HandEventKind {
    /// Новая раздача началась.
    HandStarted { hand_number: u32, dealer: PlayerId },

    SmallBlindPosted { player_id: PlayerId, amount: Chips },

    BigBlindPosted { player_id: PlayerId, amount: Chips },

    /// Действие игрока.
    PlayerActed {
        player_id: PlayerId,
        action: AppliedAction,
    },

    /// Открыты общие карты; `board`: весь борд после открытия.
    BoardDealt { street: Street, board: Vec<Card> },

    /// Шоудаун – открытие карт.
    ShowdownReveal {
        player_id: PlayerId,
        hole_cards: Vec<Card>,
        rank: HandRank,
    },

    /// Выплата банка.
    PotAwarded {
        player_id: PlayerId,
        amount: Chips,
        /// `None`: все остальные сфолдили.
        rank: Option<HandRank>,
    },

    /// Игрок вылетел из матча.
    Eliminated { player_id: PlayerId },
}

impl HandEventKind {
    /// Строка истории; игроки подписываются через `name`.
    pub fn render<F>(&self, name: F) -> String
    where
        F: Fn(&PlayerId) -> String,
    {
        match self {
            HandEventKind::HandStarted { hand_number, dealer } => {
                format!("Hand #{hand_number}, dealer {}", name(dealer))
            }
            HandEventKind::SmallBlindPosted { player_id, amount } => {
                format!("  {} posts small blind {amount}", name(player_id))
            }
            HandEventKind::BigBlindPosted { player_id, amount } => {
                format!("  {} posts big blind {amount}", name(player_id))
            }
            HandEventKind::PlayerActed { player_id, action } => {
                format!("  {}: {action}", name(player_id))
            }
            HandEventKind::BoardDealt { street, board } => {
                format!("  --- {street}: {} ---", format_cards(board))
            }
            HandEventKind::ShowdownReveal {
                player_id,
                hole_cards,
                rank,
            } => format!(
                "  {} shows {} -- {}",
                name(player_id),
                format_cards(hole_cards),
                rank.category()
            ),
            HandEventKind::PotAwarded {
                player_id,
                amount,
                rank: Some(rank),
            } => format!(
                "  {} wins {amount} chips with {}.",
                name(player_id),
                rank.category()
            ),
            HandEventKind::PotAwarded {
                player_id,
                amount,
                rank: None,
            } => format!("  {} wins {amount} chips (all others folded).", name(player_id)),
            HandEventKind::Eliminated { player_id } => {
                format!("  {} is eliminated!", name(player_id))
            }
        }
    }
}

impl fmt::Display for HandEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(|id| id.to_string()))
    }
}

/// Событие в раздаче с порядковым номером.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandEvent {
    pub index: u32,
    pub kind: HandEventKind,
}

/// Полная история раздачи. Только дописывается.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandHistory {
    pub events: Vec<HandEvent>,
}

impl HandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: HandEventKind) {
        let idx = self.events.len() as u32;
        self.events.push(HandEvent { index: idx, kind });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Последние `n` событий в виде строк, игроки под именами из `name`.
    pub fn tail_lines<F>(&self, n: usize, name: F) -> Vec<String>
    where
        F: Fn(&PlayerId) -> String,
    {
        let start = self.events.len().saturating_sub(n);
        self.events[start..]
            .iter()
            .map(|e| e.kind.render(&name))
            .collect()
    }

    /// Вся история, игроки по id.
    pub fn lines(&self) -> Vec<String> {
        self.tail_lines(self.events.len(), |id| id.to_string())
    }
}
