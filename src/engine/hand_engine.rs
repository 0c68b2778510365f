use tracing::{debug, info};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::deck::Deck;
use crate::domain::hand::{HandSummary, PlayerHandResult, Street};
use crate::domain::player::{PlayerId, SeatStatus};
use crate::domain::table::{SeatIndex, Table};
use crate::engine::actions::{AppliedAction, PokerAction};
use crate::engine::betting::BettingState;
use crate::engine::errors::EngineError;
use crate::engine::hand_history::{HandEventKind, HandHistory};
use crate::engine::positions::{
    actors_after, actors_from, dealer_for_new_hand, next_dealer, seated_from,
};
use crate::engine::pot::Pot;
use crate::engine::validation::validate_action;
use crate::engine::RandomSource;
use crate::eval::{compare_hands, evaluate, HandRank};

/// Состояние одной раздачи. Стеки и статусы мест живут в `Table`,
/// движок меняет их только через свои методы.
#[derive(Clone, Debug)]
pub struct HandEngine {
    pub hand_number: u32,
    pub street: Street,
    pub deck: Deck,
    /// Общие карты, 0..=5, только дописываются.
    pub board: Vec<Card>,
    /// Карманные карты по индексу места; пусто: место не сдавалось.
    hole_cards: Vec<Vec<Card>>,
    /// Кому сдали карты, по возрастанию индекса места.
    pub dealt_in: Vec<SeatIndex>,
    pub dealer: SeatIndex,
    pub small_blind_seat: SeatIndex,
    pub big_blind_seat: SeatIndex,
    pub betting: BettingState,
    pub pot: Pot,
    /// Сколько всего фишек внёс каждый seat за раздачу.
    pub contributions: Vec<Chips>,
    pub history: HandHistory,
    big_blind: Chips,
}

impl HandEngine {
    /// Старт новой раздачи:
    /// - выбирает дилера;
    /// - раздаёт карманные карты;
    /// - постит блайнды (не больше стека);
    /// - настраивает BettingState и префлоп-очередь.
    pub fn start<R: RandomSource>(table: &mut Table, rng: &mut R) -> Result<Self, EngineError> {
        if table.seated_count() < 2 {
            return Err(EngineError::NotEnoughPlayers);
        }
        let dealer = dealer_for_new_hand(table).ok_or(EngineError::NotEnoughPlayers)?;
        table.dealer_button = dealer;
        table.hands_played += 1;

        for seat in table.seats.iter_mut().filter(|s| s.is_seated()) {
            seat.status = SeatStatus::Active;
        }

        let seats_len = table.seats.len();
        let mut deck = Deck::shuffled(rng);

        let mut hole_cards = vec![Vec::new(); seats_len];
        let dealt_in = seated_from(table, 0);
        for &seat in &dealt_in {
            let cards = deck.draw_n(2);
            if cards.len() < 2 {
                return Err(EngineError::DeckExhausted);
            }
            hole_cards[seat] = cards;
        }

        // Хедз-ап: дилер ставит малый блайнд, второй большой.
        let order = seated_from(table, dealer);
        let (sb_seat, bb_seat) = if order.len() == 2 {
            (order[0], order[1])
        } else {
            (order[1], order[2])
        };

        let stakes = table.stakes.clone();
        let mut engine = Self {
            hand_number: table.hands_played,
            street: Street::Preflop,
            deck,
            board: Vec::with_capacity(5),
            hole_cards,
            dealt_in,
            dealer,
            small_blind_seat: sb_seat,
            big_blind_seat: bb_seat,
            betting: BettingState::new(Street::Preflop, seats_len, stakes.big_blind, Vec::new()),
            pot: Pot::new(),
            contributions: vec![Chips::ZERO; seats_len],
            history: HandHistory::new(),
            big_blind: stakes.big_blind,
        };

        engine.history.push(HandEventKind::HandStarted {
            hand_number: engine.hand_number,
            dealer: table.seats[dealer].player_id.clone(),
        });

        let sb_paid = engine.commit(table, sb_seat, stakes.small_blind);
        engine.history.push(HandEventKind::SmallBlindPosted {
            player_id: table.seats[sb_seat].player_id.clone(),
            amount: sb_paid,
        });
        let bb_paid = engine.commit(table, bb_seat, stakes.big_blind);
        engine.history.push(HandEventKind::BigBlindPosted {
            player_id: table.seats[bb_seat].player_id.clone(),
            amount: bb_paid,
        });

        engine.betting.current_bet = sb_paid.max(bb_paid);
        engine.betting.min_raise = Chips(engine.betting.current_bet.0 * 2);
        engine.betting.last_aggressor = Some(bb_seat);

        // Префлоп начинается слева от BB; олл-ины с блайндов не ходят.
        engine.betting.to_act = actors_from(table, bb_seat + 1).into();

        debug!(
            hand = engine.hand_number,
            dealer = %table.seats[dealer].player_id,
            small_blind = %sb_paid,
            big_blind = %bb_paid,
            queue = engine.betting.to_act.len(),
            "hand started"
        );

        Ok(engine)
    }

    pub fn hole_cards(&self, seat: SeatIndex) -> &[Card] {
        self.hole_cards.get(seat).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn current_bet(&self) -> Chips {
        self.betting.current_bet
    }

    pub fn min_raise(&self) -> Chips {
        self.betting.min_raise
    }

    /// Чей ход. Места, которые уже не могут ставить, из головы очереди выкидываются.
    pub fn next_to_act(&mut self, table: &Table) -> Option<SeatIndex> {
        while let Some(seat) = self.betting.next_to_act() {
            if table.seats.get(seat).map_or(false, |s| s.can_act()) {
                return Some(seat);
            }
            self.betting.to_act.pop_front();
        }
        None
    }

    /// Места, которые ещё претендуют на банк.
    pub fn in_hand_seats(&self, table: &Table) -> Vec<SeatIndex> {
        self.dealt_in
            .iter()
            .copied()
            .filter(|&s| table.seats[s].is_in_hand())
            .collect()
    }

    /// Места, которые ещё могут ставить (не сфолдили, не в олл-ине).
    pub fn can_act_seats(&self, table: &Table) -> Vec<SeatIndex> {
        self.dealt_in
            .iter()
            .copied()
            .filter(|&s| table.seats[s].can_act())
            .collect()
    }

    pub fn is_betting_complete(&self, table: &Table) -> bool {
        self.betting.is_complete(&self.can_act_seats(table))
    }

    /// Раздача закончена: дошли до вскрытия или остался один претендент.
    pub fn is_hand_over(&self, table: &Table) -> bool {
        self.street == Street::Showdown || self.in_hand_seats(table).len() <= 1
    }

    pub fn bet(&mut self, table: &mut Table, player: &PlayerId, amount: Chips) -> Result<AppliedAction, EngineError> {
        self.apply(table, player, PokerAction::Bet(amount))
    }

    pub fn call(&mut self, table: &mut Table, player: &PlayerId) -> Result<AppliedAction, EngineError> {
        self.apply(table, player, PokerAction::Call)
    }

    pub fn raise_to(&mut self, table: &mut Table, player: &PlayerId, total: Chips) -> Result<AppliedAction, EngineError> {
        self.apply(table, player, PokerAction::RaiseTo(total))
    }

    pub fn check(&mut self, table: &mut Table, player: &PlayerId) -> Result<AppliedAction, EngineError> {
        self.apply(table, player, PokerAction::Check)
    }

    pub fn fold(&mut self, table: &mut Table, player: &PlayerId) -> Result<AppliedAction, EngineError> {
        self.apply(table, player, PokerAction::Fold)
    }

    /// Применить действие игрока, стоящего в голове очереди.
    /// При ошибке состояние не меняется и игрок остаётся в голове очереди.
    pub fn apply(
        &mut self,
        table: &mut Table,
        player: &PlayerId,
        action: PokerAction,
    ) -> Result<AppliedAction, EngineError> {
        if self.street == Street::Showdown {
            return Err(EngineError::NoActiveHand);
        }
        let seat = table
            .seat_of(player)
            .ok_or_else(|| EngineError::PlayerNotAtTable(player.clone()))?;
        if self.betting.next_to_act() != Some(seat) {
            return Err(EngineError::NotPlayersTurn(player.clone()));
        }
        validate_action(seat, &table.seats[seat], &action, &self.betting)?;

        let applied = match action {
            PokerAction::Fold => {
                table.seats[seat].status = SeatStatus::Folded;
                self.betting.mark_acted(seat);
                AppliedAction {
                    action,
                    paid: Chips::ZERO,
                    all_in: false,
                }
            }
            PokerAction::Check => {
                self.betting.mark_acted(seat);
                AppliedAction {
                    action,
                    paid: Chips::ZERO,
                    all_in: false,
                }
            }
            PokerAction::Call => {
                let paid = self.commit(table, seat, self.betting.to_call(seat));
                self.betting.mark_acted(seat);
                AppliedAction {
                    action,
                    paid,
                    all_in: table.seats[seat].status == SeatStatus::AllIn,
                }
            }
            PokerAction::Bet(amount) => {
                let paid = self.commit(table, seat, amount);
                let total = self.betting.round_bet(seat);
                self.betting.current_bet = total;
                self.betting.min_raise = Chips(total.0 * 2);
                self.betting.mark_acted(seat);
                self.betting.reopen(seat, actors_after(table, seat));
                AppliedAction {
                    action: PokerAction::Bet(paid),
                    paid,
                    all_in: table.seats[seat].status == SeatStatus::AllIn,
                }
            }
            PokerAction::RaiseTo(total) => self.raise(table, seat, total),
        };

        self.history.push(HandEventKind::PlayerActed {
            player_id: player.clone(),
            action: applied,
        });
        debug!(
            hand = self.hand_number,
            street = %self.street,
            player = %player,
            pot = %self.pot.total,
            "{applied}"
        );

        Ok(applied)
    }

    fn raise(&mut self, table: &mut Table, seat: SeatIndex, total: Chips) -> AppliedAction {
        let before = self.betting.round_bet(seat);
        let paid = self.commit(table, seat, total.saturating_sub(before));
        let new_total = self.betting.round_bet(seat);
        let all_in = table.seats[seat].status == SeatStatus::AllIn;
        self.betting.mark_acted(seat);

        if new_total <= self.betting.current_bet {
            // Олл-ин не дотянул даже до текущей ставки: это колл, торговля не открывается.
            return AppliedAction {
                action: PokerAction::Call,
                paid,
                all_in,
            };
        }

        let increment = new_total.0 - self.betting.current_bet.0;
        self.betting.current_bet = new_total;
        self.betting.min_raise = Chips(new_total.0 + increment.max(1));
        self.betting.reopen(seat, actors_after(table, seat));

        AppliedAction {
            action: PokerAction::RaiseTo(new_total),
            paid,
            all_in,
        }
    }

    /// Перевести фишки из стека в банк (не больше стека). Пустой стек: олл-ин.
    fn commit(&mut self, table: &mut Table, seat: SeatIndex, amount: Chips) -> Chips {
        let player = &mut table.seats[seat];
        let paid = amount.min(player.stack);
        player.stack -= paid;
        if player.stack.is_zero() && player.status == SeatStatus::Active {
            player.status = SeatStatus::AllIn;
        }
        self.betting.add_round_bet(seat, paid);
        self.contributions[seat] += paid;
        self.pot.add(paid);
        paid
    }

    /// Открыть следующую улицу и сбросить ставки.
    ///
    /// Если ставить могут меньше двух мест, очередь остаётся пустой:
    /// вызывающий докладывает борд через `run_out_board`.
    pub fn advance_street(&mut self, table: &Table) -> Result<Street, EngineError> {
        let Some((next, cards)) = self.street.next() else {
            return Ok(self.street);
        };

        if cards > 0 {
            self.deal_board(cards)?;
            self.history.push(HandEventKind::BoardDealt {
                street: next,
                board: self.board.clone(),
            });
        }
        self.street = next;

        let queue = if next != Street::Showdown && self.can_act_seats(table).len() >= 2 {
            // Постфлоп начинается слева от дилера.
            actors_from(table, self.dealer + 1)
        } else {
            Vec::new()
        };
        self.betting = BettingState::new(next, table.seats.len(), self.big_blind, queue);

        debug!(
            hand = self.hand_number,
            street = %next,
            queue = self.betting.to_act.len(),
            "street advanced"
        );
        Ok(next)
    }

    /// Доложить борд до пяти карт и перейти к вскрытию (все в олл-ине или ставить некому).
    pub fn run_out_board(&mut self) -> Result<(), EngineError> {
        let missing = 5usize.saturating_sub(self.board.len());
        self.deal_board(missing)?;
        self.street = Street::Showdown;
        self.betting.to_act.clear();
        Ok(())
    }

    fn deal_board(&mut self, n: usize) -> Result<(), EngineError> {
        for _ in 0..n {
            let card = self.deck.draw_one().ok_or(EngineError::DeckExhausted)?;
            self.board.push(card);
        }
        Ok(())
    }

    /// Выплатить банк и закрыть раздачу:
    /// - один претендент забирает банк без вскрытия;
    /// - иначе борд докладывается, руки сравниваются, банк делится поровну,
    ///   остаток: по фишке победителям начиная с первого;
    /// - места с нулевым стеком вылетают, кнопка сдвигается.
    pub fn resolve(mut self, table: &mut Table) -> Result<(HandSummary, HandHistory), EngineError> {
        let in_hand = self.in_hand_seats(table);
        let seats_len = table.seats.len();
        let mut won = vec![Chips::ZERO; seats_len];
        let mut ranks: Vec<Option<HandRank>> = vec![None; seats_len];
        let mut winners: Vec<SeatIndex> = Vec::new();
        let total_pot = self.pot.total;
        let showdown = in_hand.len() > 1;

        match in_hand.as_slice() {
            [] => return Err(EngineError::Internal("no players left in the hand")),
            [sole] => {
                let amount = self.pot.pay(self.pot.total)?;
                won[*sole] = amount;
                winners.push(*sole);
                self.history.push(HandEventKind::PotAwarded {
                    player_id: table.seats[*sole].player_id.clone(),
                    amount,
                    rank: None,
                });
            }
            contenders => {
                self.run_out_board()?;
                self.history.push(HandEventKind::BoardDealt {
                    street: Street::Showdown,
                    board: self.board.clone(),
                });

                let mut scored = Vec::with_capacity(contenders.len());
                for &seat in contenders {
                    let hole = self.hole_cards(seat).to_vec();
                    let rank = evaluate(&hole, &self.board)?;
                    self.history.push(HandEventKind::ShowdownReveal {
                        player_id: table.seats[seat].player_id.clone(),
                        hole_cards: hole,
                        rank: rank.clone(),
                    });
                    ranks[seat] = Some(rank.clone());
                    scored.push(rank);
                }

                let best = compare_hands(&scored);
                let (share, remainder) = total_pot.split(best.len());
                for (k, &idx) in best.iter().enumerate() {
                    let seat = contenders[idx];
                    let bonus = if (k as u64) < remainder.0 { Chips(1) } else { Chips::ZERO };
                    let amount = self.pot.pay(share + bonus)?;
                    won[seat] = amount;
                    winners.push(seat);
                    self.history.push(HandEventKind::PotAwarded {
                        player_id: table.seats[seat].player_id.clone(),
                        amount,
                        rank: ranks[seat].clone(),
                    });
                }
            }
        }

        if !self.pot.is_empty() {
            return Err(EngineError::Internal("pot not fully distributed"));
        }

        for (seat, amount) in won.iter().enumerate() {
            table.seats[seat].stack += *amount;
        }

        let mut eliminated = Vec::new();
        for &seat in &self.dealt_in {
            let s = &mut table.seats[seat];
            if s.stack.is_zero() {
                s.status = SeatStatus::Eliminated;
                eliminated.push(s.player_id.clone());
                self.history.push(HandEventKind::Eliminated {
                    player_id: s.player_id.clone(),
                });
                info!(hand = self.hand_number, player = %s.player_id, "player eliminated");
            } else {
                s.status = SeatStatus::Active;
            }
        }

        if let Some(next) = next_dealer(table) {
            table.dealer_button = next;
        }

        let results = self
            .dealt_in
            .iter()
            .map(|&seat| PlayerHandResult {
                player_id: table.seats[seat].player_id.clone(),
                rank: ranks[seat].clone(),
                contributed: self.contributions[seat],
                won: won[seat],
                is_winner: winners.contains(&seat),
            })
            .collect();

        let summary = HandSummary {
            hand_number: self.hand_number,
            street_reached: self.street,
            board: self.board.clone(),
            total_pot,
            showdown,
            results,
            eliminated,
        };

        info!(
            hand = summary.hand_number,
            pot = %total_pot,
            showdown,
            winners = ?summary.winners().collect::<Vec<_>>(),
            "hand resolved"
        );

        // Карманные карты живут только в раздаче.
        self.hole_cards.clear();
        Ok((summary, self.history))
    }
}
