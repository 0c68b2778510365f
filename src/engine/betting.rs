use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::hand::Street;
use crate::domain::SeatIndex;

/// Состояние раунда ставок (на конкретной улице).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BettingState {
    /// Улица, к которой относится этот раунд.
    pub street: Street,
    /// Текущая целевая ставка, до которой должны дотянуться игроки (BB, bet, raise).
    pub current_bet: Chips,
    /// Минимальная сумма, до которой можно поднять (raise-to), не уходя в олл-ин.
    pub min_raise: Chips,
    /// Сколько каждое место поставило на этой улице. Индекс = SeatIndex.
    pub round_bets: Vec<Chips>,
    /// Очередь ходящих: кто ещё должен сделать действие на этой улице. Голова: чей ход.
    pub to_act: VecDeque<SeatIndex>,
    /// Кто уже действовал после последнего открытия торговли.
    pub acted: HashSet<SeatIndex>,
    /// Seat последнего агрессора (bet/raise).
    pub last_aggressor: Option<SeatIndex>,
}

impl BettingState {
    pub fn new(street: Street, seats: usize, min_raise: Chips, to_act: Vec<SeatIndex>) -> Self {
        Self {
            street,
            current_bet: Chips::ZERO,
            min_raise,
            round_bets: vec![Chips::ZERO; seats],
            to_act: to_act.into(),
            acted: HashSet::new(),
            last_aggressor: None,
        }
    }

    pub fn round_bet(&self, seat: SeatIndex) -> Chips {
        self.round_bets.get(seat).copied().unwrap_or(Chips::ZERO)
    }

    pub fn add_round_bet(&mut self, seat: SeatIndex, amount: Chips) {
        if let Some(bet) = self.round_bets.get_mut(seat) {
            *bet += amount;
        }
    }

    /// Сколько месту не хватает до текущей ставки.
    pub fn to_call(&self, seat: SeatIndex) -> Chips {
        self.current_bet.saturating_sub(self.round_bet(seat))
    }

    /// Чей сейчас ход.
    pub fn next_to_act(&self) -> Option<SeatIndex> {
        self.to_act.front().copied()
    }

    /// Место сходило: убрать из очереди, запомнить.
    pub fn mark_acted(&mut self, seat: SeatIndex) {
        self.to_act.retain(|s| *s != seat);
        self.acted.insert(seat);
    }

    /// После bet/raise торговля открывается заново: ответить должны все
    /// остальные, кто ещё может ставить, начиная сразу после агрессора.
    pub fn reopen(&mut self, aggressor: SeatIndex, new_to_act: Vec<SeatIndex>) {
        self.last_aggressor = Some(aggressor);
        self.to_act = new_to_act.into();
        self.acted.clear();
        self.acted.insert(aggressor);
    }

    /// Раунд ставок закрыт, если каждый из `can_act` сходил и уравнял ставку.
    ///
    /// Одиночный игрок, которому нечего доставлять, считается закрывшим раунд,
    /// если он уже ходил или его никто не ждёт в очереди.
    pub fn is_complete(&self, can_act: &[SeatIndex]) -> bool {
        match can_act {
            [] => true,
            [lone] => {
                self.round_bet(*lone) >= self.current_bet
                    && (self.acted.contains(lone) || self.to_act.is_empty())
            }
            _ => can_act
                .iter()
                .all(|s| self.acted.contains(s) && self.round_bet(*s) == self.current_bet),
        }
    }
}
